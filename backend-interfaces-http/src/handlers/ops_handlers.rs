use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use backend_application::commands::dataset_commands;
use backend_application::queries::dataset_queries;
use backend_application::AppState;
use backend_domain::DatasetSummary;

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn get_dataset(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DatasetSummary>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(dataset_queries::dataset_summary(&state).await))
}

pub async fn reload_dataset(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DatasetSummary>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let summary = dataset_commands::reload_dataset(&state).await?;
    Ok(Json(summary))
}

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn metrics_prometheus(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !authorize(&state.config, &headers) {
        return (StatusCode::UNAUTHORIZED, "unauthorized".to_string()).into_response();
    }
    let payload = state.metrics.render_prometheus();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    (headers, payload).into_response()
}
