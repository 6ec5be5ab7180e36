use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use backend_application::commands::benford_commands::{self, BenfordOutcome, BenfordRun};
use backend_application::dtos::BenfordResponse;
use backend_application::AppState;
use backend_domain::{BenfordQuery, ChartImage};

use crate::error::HttpError;
use crate::middleware::{authorize, parse_benford_request};

pub async fn analyze_dataset(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<BenfordQuery>,
) -> Result<Json<BenfordResponse>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let run = benford_commands::run_benford(&state, query).await?;
    Ok(Json(BenfordResponse::from(run)))
}

pub async fn analyze_records(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<BenfordResponse>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let request = parse_benford_request(&headers, &body).map_err(|err| {
        error!("failed to parse benford request body: {}", err);
        HttpError::BadRequest(err.to_string())
    })?;
    let run = benford_commands::run_benford_on_records(&state, request).await?;
    Ok(Json(BenfordResponse::from(run)))
}

/// Raw PNG for the same query as `analyze_dataset`. Warning outcomes come
/// back as the JSON analysis response since there is nothing to draw.
pub async fn chart_png(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<BenfordQuery>,
) -> Result<Response, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let run = benford_commands::run_benford(&state, query).await?;
    let analysis_id = run.analysis_id;
    let report = match run.outcome {
        BenfordOutcome::Completed(report) => report,
        outcome => {
            let response = BenfordResponse::from(BenfordRun {
                analysis_id,
                outcome,
            });
            return Ok(Json(response).into_response());
        }
    };
    match report.chart {
        Some(chart) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(ChartImage::MIME_TYPE),
            );
            headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
            Ok((headers, chart.png).into_response())
        }
        None => {
            let reason = report
                .chart_error
                .unwrap_or_else(|| "chart not rendered".to_string());
            warn!(%analysis_id, "chart unavailable: {}", reason);
            Err(HttpError::Unavailable(format!("chart unavailable: {}", reason)))
        }
    }
}
