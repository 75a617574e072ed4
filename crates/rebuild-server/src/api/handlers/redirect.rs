//! Overview redirect handler

use crate::api::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use rebuild_lookup::LookupError;
use rebuild_types::Gav;

/// Fallback target for coordinates without an indexed overview page.
const DOCUMENTATION_URL: &str = "https://reproducible-builds.org/docs/jvm/";

pub async fn overview_redirect(
    State(state): State<AppState>,
    Path((coordinate, _version)): Path<(String, String)>,
) -> ApiResult<Response> {
    let registry = state.default_registry().to_string();
    render_redirect(&state, &registry, &coordinate).await
}

pub async fn overview_redirect_in_registry(
    State(state): State<AppState>,
    Path((registry, coordinate, _version)): Path<(String, String, String)>,
) -> ApiResult<Response> {
    render_redirect(&state, &registry, &coordinate).await
}

async fn render_redirect(state: &AppState, registry: &str, coordinate: &str) -> ApiResult<Response> {
    let gav = Gav::parse(coordinate)
        .map_err(|_| ApiError::BadRequest("invalid maven coordinate".to_string()))?;

    match state.lookup.lookup_dependency(registry, &gav).await {
        Ok(index) if !index.overview_url.is_empty() => Ok(found(&index.overview_url)),
        Ok(_) => Ok(found(DOCUMENTATION_URL)),
        Err(LookupError::RegistryNotRecognized(_)) => Err(ApiError::BadRequest(
            "repository not configured".to_string(),
        )),
        Err(error) if error.is_not_found() => Ok(found(DOCUMENTATION_URL)),
        Err(error) => {
            tracing::error!(%error, "index lookup failed");
            Err(ApiError::Internal("index lookup failed".to_string()))
        }
    }
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
