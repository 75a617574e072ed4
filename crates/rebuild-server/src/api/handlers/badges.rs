//! Badge handlers
//!
//! Every badge request resolves to HTTP 200 with a badge document, even when
//! the coordinate is unknown. Only malformed requests and infrastructure
//! failures surface as error status codes, so embedding a badge never breaks
//! a page.

use crate::api::state::AppState;
use crate::badge::{status_badge, BadgeStatus};
use crate::error::{ApiError, ApiResult};
use axum::extract::{Path, Query, State};
use axum::Json;
use rebuild_lookup::service::LATEST_TOKEN;
use rebuild_lookup::LookupError;
use rebuild_types::{Badge, Gav};
use serde::Deserialize;

/// Optional query parameters shared by the badge endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct BadgeParams {
    /// Rendering theme, e.g. `renovate`
    #[serde(default)]
    pub theme: String,

    /// Count scope for module badges, `module` or `project`
    #[serde(default)]
    pub scope: String,
}

fn parse_versioned(coordinate: &str, version: &str) -> ApiResult<Gav> {
    Gav::parse_versioned(&format!("{coordinate}:{version}"))
        .map_err(|_| ApiError::BadRequest("invalid maven coordinate".to_string()))
}

/// Map a failed index lookup to either a badge or an API error.
fn lookup_failure_badge(error: LookupError, theme: &str) -> ApiResult<Json<Badge>> {
    match error {
        LookupError::RegistryNotRecognized(_) => Ok(Json(status_badge(
            "repository not configured",
            BadgeStatus::Error,
            theme,
        ))),
        error if error.is_not_found() => Ok(Json(status_badge(
            "not configured",
            BadgeStatus::Error,
            theme,
        ))),
        error => {
            tracing::error!(%error, "index lookup failed");
            Err(ApiError::Internal("index lookup failed".to_string()))
        }
    }
}

pub async fn dependency_badge(
    State(state): State<AppState>,
    Path((coordinate, version)): Path<(String, String)>,
    Query(params): Query<BadgeParams>,
) -> ApiResult<Json<Badge>> {
    let registry = state.default_registry().to_string();
    render_dependency_badge(&state, &registry, &coordinate, version, &params).await
}

pub async fn dependency_badge_in_registry(
    State(state): State<AppState>,
    Path((registry, coordinate, version)): Path<(String, String, String)>,
    Query(params): Query<BadgeParams>,
) -> ApiResult<Json<Badge>> {
    render_dependency_badge(&state, &registry, &coordinate, version, &params).await
}

async fn render_dependency_badge(
    state: &AppState,
    registry: &str,
    coordinate: &str,
    mut version: String,
    params: &BadgeParams,
) -> ApiResult<Json<Badge>> {
    let gav = parse_versioned(coordinate, &version)?;

    let index = match state.lookup.lookup_dependency(registry, &gav).await {
        Ok(index) => index,
        Err(error) => return lookup_failure_badge(error, &params.theme),
    };

    if version == LATEST_TOKEN {
        version = index.latest.clone();
    }
    let Some(record) = index.versions.get(&version) else {
        return Ok(Json(status_badge(
            "pending verification",
            BadgeStatus::Warning,
            &params.theme,
        )));
    };

    let stats = &record.file_stats;
    let (ok_files, ko_files) = if params.scope == "module" {
        (
            stats.module_reproducible_files,
            stats.module_non_reproducible_files,
        )
    } else {
        (
            stats.project_reproducible_files,
            stats.project_non_reproducible_files,
        )
    };
    let status = if ko_files == 0 {
        BadgeStatus::Success
    } else {
        BadgeStatus::Error
    };

    Ok(Json(status_badge(
        &format!("{ok_files}/{} ok", ok_files + ko_files),
        status,
        &params.theme,
    )))
}

pub async fn project_badge(
    State(state): State<AppState>,
    Path((coordinate, version)): Path<(String, String)>,
    Query(params): Query<BadgeParams>,
) -> ApiResult<Json<Badge>> {
    let registry = state.default_registry().to_string();
    render_project_badge(&state, &registry, &coordinate, version, &params).await
}

pub async fn project_badge_in_registry(
    State(state): State<AppState>,
    Path((registry, coordinate, version)): Path<(String, String, String)>,
    Query(params): Query<BadgeParams>,
) -> ApiResult<Json<Badge>> {
    render_project_badge(&state, &registry, &coordinate, version, &params).await
}

async fn render_project_badge(
    state: &AppState,
    registry: &str,
    coordinate: &str,
    mut version: String,
    params: &BadgeParams,
) -> ApiResult<Json<Badge>> {
    let gav = parse_versioned(coordinate, &version)?;

    let index = match state.lookup.lookup_project(registry, &gav).await {
        Ok(index) => index,
        Err(error) => return lookup_failure_badge(error, &params.theme),
    };

    if version == LATEST_TOKEN {
        version = index.latest.clone();
    }
    let Some(record) = index.versions.get(&version) else {
        return Ok(Json(status_badge(
            "pending verification",
            BadgeStatus::Warning,
            &params.theme,
        )));
    };

    let stats = &record.file_stats;
    let total = stats.project_reproducible_files + stats.project_non_reproducible_files;
    let status = if record.reproducible {
        BadgeStatus::Success
    } else {
        BadgeStatus::Error
    };

    Ok(Json(status_badge(
        &format!("{version} - {}/{total} ok", stats.project_reproducible_files),
        status,
        &params.theme,
    )))
}

pub async fn transitive_badge(
    State(state): State<AppState>,
    Path((coordinate, version)): Path<(String, String)>,
    Query(params): Query<BadgeParams>,
) -> ApiResult<Json<Badge>> {
    let registry = state.default_registry().to_string();
    render_transitive_badge(&state, &registry, &coordinate, &version, &params).await
}

pub async fn transitive_badge_in_registry(
    State(state): State<AppState>,
    Path((registry, coordinate, version)): Path<(String, String, String)>,
    Query(params): Query<BadgeParams>,
) -> ApiResult<Json<Badge>> {
    render_transitive_badge(&state, &registry, &coordinate, &version, &params).await
}

async fn render_transitive_badge(
    state: &AppState,
    registry: &str,
    coordinate: &str,
    version: &str,
    params: &BadgeParams,
) -> ApiResult<Json<Badge>> {
    let gav = parse_versioned(coordinate, version)?;

    let report = match state.expander.report(&state.lookup, registry, &gav).await {
        Ok(report) => report,
        Err(error) => {
            tracing::error!(%error, "transitive dependency expansion failed");
            return Err(ApiError::Internal(
                "transitive dependency expansion failed".to_string(),
            ));
        }
    };

    let status = if report.all_reproducible() {
        BadgeStatus::Success
    } else {
        BadgeStatus::Warning
    };

    Ok(Json(status_badge(
        &format!("{}/{} dep(s)", report.reproducible, report.total),
        status,
        &params.theme,
    )))
}
