//! API Router configuration

use super::handlers;
use super::state::AppState;
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main API router
pub fn create_router(state: AppState, enable_cors: bool) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health_check))
        // Per-module badges
        .route(
            "/v1/badge/reproducible/maven/:coordinate/:version",
            get(handlers::dependency_badge),
        )
        .route(
            "/v1/badge/reproducible/maven/:registry/:coordinate/:version",
            get(handlers::dependency_badge_in_registry),
        )
        // Project badges
        .route(
            "/v1/badge/reproducible/project/:coordinate/:version",
            get(handlers::project_badge),
        )
        .route(
            "/v1/badge/reproducible/project/:registry/:coordinate/:version",
            get(handlers::project_badge_in_registry),
        )
        // Transitive dependency badges
        .route(
            "/v1/badge/reproducible-dependencies/maven/:coordinate/:version",
            get(handlers::transitive_badge),
        )
        .route(
            "/v1/badge/reproducible-dependencies/maven/:registry/:coordinate/:version",
            get(handlers::transitive_badge_in_registry),
        )
        // Overview redirects
        .route(
            "/v1/redirect/reproducible/maven/:coordinate/:version",
            get(handlers::overview_redirect),
        )
        .route(
            "/v1/redirect/reproducible/maven/:registry/:coordinate/:version",
            get(handlers::overview_redirect_in_registry),
        )
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router.with_state(state)
}
