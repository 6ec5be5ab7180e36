use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use backend_application::queries::dataset_queries;
use backend_application::AppState;
use backend_domain::FilterOptions;

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn list_columns(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<String>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(dataset_queries::list_numeric_columns(&state).await))
}

pub async fn list_filters(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<FilterOptions>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(dataset_queries::list_filter_options(&state).await))
}
