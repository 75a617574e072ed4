//! End-to-end handler tests against a seeded local index.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use rebuild_lookup::{
    HttpDependencyGraph, IndexSource, LookupService, PomClient, TransitiveExpander,
};
use rebuild_server::{create_router, AppState};
use rebuild_types::{
    Badge, DependencyIndex, FileStats, Gav, ProjectIndex, RegistryTable, VersionRecord,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

fn record(module_ok: u32, module_ko: u32, project_ok: u32, project_ko: u32) -> VersionRecord {
    let mut record = VersionRecord {
        file_stats: FileStats {
            module_reproducible_files: module_ok,
            module_non_reproducible_files: module_ko,
            project_reproducible_files: project_ok,
            project_non_reproducible_files: project_ko,
        },
        ..Default::default()
    };
    record.update_reproducible();
    record
}

fn seed_index(dir: &Path) {
    let versions = BTreeMap::from([
        ("1.1.0".to_string(), record(1, 2, 1, 2)),
        ("1.2.0".to_string(), record(2, 0, 3, 0)),
    ]);

    let index = DependencyIndex {
        group_id: "org.example".to_string(),
        artifact_id: "demo".to_string(),
        overview_url: "https://example.com/org.example/README.md".to_string(),
        versions: versions.clone(),
        latest: "1.2.0".to_string(),
    };
    let base = dir.join("maven/mavencentral/org/example/demo");
    fs::create_dir_all(&base).unwrap();
    fs::write(base.join("index.json"), serde_json::to_vec(&index).unwrap()).unwrap();

    let project = ProjectIndex {
        group_id: "org.example".to_string(),
        artifact_id: "demo".to_string(),
        overview_url: index.overview_url.clone(),
        modules: vec!["org.example:demo".to_string()],
        versions,
        latest: "1.2.0".to_string(),
    };
    let base = dir.join("project/mavencentral/org/example/demo");
    fs::create_dir_all(&base).unwrap();
    fs::write(
        base.join("index.json"),
        serde_json::to_vec(&project).unwrap(),
    )
    .unwrap();
}

fn router(dir: &Path) -> axum::Router {
    let lookup = Arc::new(LookupService::new(
        RegistryTable::new(),
        IndexSource::local(dir),
    ));
    let graph = Arc::new(HttpDependencyGraph::new(HttpDependencyGraph::DEFAULT_ENDPOINT).unwrap());
    let expander = Arc::new(TransitiveExpander::new(PomClient::new().unwrap(), graph));
    create_router(AppState::new(lookup, expander), true)
}

async fn get_badge(app: axum::Router, uri: &str) -> (StatusCode, Badge) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let response = router(dir.path())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_dependency_badge_for_reproducible_version() {
    let dir = tempfile::tempdir().unwrap();
    seed_index(dir.path());

    let (status, badge) = get_badge(
        router(dir.path()),
        "/v1/badge/reproducible/maven/org.example:demo/1.2.0",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(badge.message, "3/3 ok");
    assert_eq!(badge.color, "brightgreen");
    assert!(!badge.is_error);
}

#[tokio::test]
async fn test_dependency_badge_latest_with_module_scope() {
    let dir = tempfile::tempdir().unwrap();
    seed_index(dir.path());

    let (status, badge) = get_badge(
        router(dir.path()),
        "/v1/badge/reproducible/maven/org.example:demo/latest?scope=module",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(badge.message, "2/2 ok");
}

#[tokio::test]
async fn test_dependency_badge_counts_against_failures() {
    let dir = tempfile::tempdir().unwrap();
    seed_index(dir.path());

    let (_, badge) = get_badge(
        router(dir.path()),
        "/v1/badge/reproducible/maven/org.example:demo/1.1.0",
    )
    .await;

    assert_eq!(badge.message, "1/3 ok");
    assert_eq!(badge.color, "crimson");
    assert!(badge.is_error);
}

#[tokio::test]
async fn test_unknown_coordinate_yields_not_configured() {
    let dir = tempfile::tempdir().unwrap();
    seed_index(dir.path());

    let (status, badge) = get_badge(
        router(dir.path()),
        "/v1/badge/reproducible/maven/org.example:absent/1.0.0",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(badge.message, "not configured");
    assert!(badge.is_error);
}

#[tokio::test]
async fn test_unknown_registry_yields_repository_not_configured() {
    let dir = tempfile::tempdir().unwrap();
    seed_index(dir.path());

    let (status, badge) = get_badge(
        router(dir.path()),
        "/v1/badge/reproducible/maven/jitpack.io/org.example:demo/1.2.0",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(badge.message, "repository not configured");
}

#[tokio::test]
async fn test_registry_host_alias_in_path() {
    let dir = tempfile::tempdir().unwrap();
    seed_index(dir.path());

    let (status, badge) = get_badge(
        router(dir.path()),
        "/v1/badge/reproducible/maven/repo.maven.apache.org%2Fmaven2/org.example:demo/1.2.0",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(badge.message, "3/3 ok");
}

#[tokio::test]
async fn test_unindexed_version_is_pending_verification() {
    let dir = tempfile::tempdir().unwrap();
    seed_index(dir.path());

    let (status, badge) = get_badge(
        router(dir.path()),
        "/v1/badge/reproducible/maven/org.example:demo/9.9.9",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(badge.message, "pending verification");
    assert_eq!(badge.color, "orangered");
}

#[tokio::test]
async fn test_project_badge_includes_version_in_message() {
    let dir = tempfile::tempdir().unwrap();
    seed_index(dir.path());

    let (status, badge) = get_badge(
        router(dir.path()),
        "/v1/badge/reproducible/project/org.example:demo/latest",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(badge.message, "1.2.0 - 3/3 ok");
    assert_eq!(badge.color, "brightgreen");
}

#[tokio::test]
async fn test_invalid_coordinate_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    seed_index(dir.path());

    assert!(Gav::parse("org.example:demo!!").is_err());
    let response = router(dir.path())
        .oneshot(
            Request::builder()
                .uri("/v1/badge/reproducible/maven/org.example:demo!!/1.0.0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_redirect_to_overview_page() {
    let dir = tempfile::tempdir().unwrap();
    seed_index(dir.path());

    let response = router(dir.path())
        .oneshot(
            Request::builder()
                .uri("/v1/redirect/reproducible/maven/org.example:demo/latest")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get("location").unwrap(),
        "https://example.com/org.example/README.md"
    );
}

#[tokio::test]
async fn test_redirect_falls_back_to_documentation() {
    let dir = tempfile::tempdir().unwrap();
    seed_index(dir.path());

    let response = router(dir.path())
        .oneshot(
            Request::builder()
                .uri("/v1/redirect/reproducible/maven/org.example:absent/latest")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get("location").unwrap(),
        "https://reproducible-builds.org/docs/jvm/"
    );
}
