use std::sync::Arc;

use anyhow::anyhow;
use tracing::{info, warn};
use uuid::Uuid;

use backend_domain::{
    BenfordError, BenfordQuery, BenfordReport, BenfordRequest, Dataset, RuntimeConfig,
};

use crate::AppError;
use crate::AppState;

#[derive(Debug, Clone)]
pub enum BenfordOutcome {
    Completed(BenfordReport),
    ColumnNotFound {
        column: String,
    },
    NoNumericData {
        column: String,
    },
    InsufficientData {
        column: String,
        observations: usize,
        required: usize,
    },
}

impl BenfordOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            BenfordOutcome::Completed(_) => "ok",
            BenfordOutcome::ColumnNotFound { .. } => "column_not_found",
            BenfordOutcome::NoNumericData { .. } => "no_numeric_data",
            BenfordOutcome::InsufficientData { .. } => "insufficient_data",
        }
    }

    /// Text shown to the user in place of, or above, the chart.
    pub fn message(&self) -> String {
        match self {
            BenfordOutcome::Completed(report) => report.summary.clone(),
            BenfordOutcome::ColumnNotFound { column } => {
                format!("Column '{}' not found.", column)
            }
            BenfordOutcome::NoNumericData { column } => {
                format!("No valid numeric data in '{}'.", column)
            }
            BenfordOutcome::InsufficientData {
                column,
                observations,
                required,
            } => format!(
                "Too few samples in '{}' ({} valid entries, need at least {}).",
                column, observations, required
            ),
        }
    }

    pub fn report(&self) -> Option<&BenfordReport> {
        match self {
            BenfordOutcome::Completed(report) => Some(report),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BenfordRun {
    pub analysis_id: Uuid,
    pub outcome: BenfordOutcome,
}

/// Runs the analysis over the loaded dataset, narrowed by the query filters.
pub async fn run_benford(state: &AppState, query: BenfordQuery) -> Result<BenfordRun, AppError> {
    let column = resolve_column(&state.config, query.column.as_deref())?;
    let snapshot = state.snapshot().await;
    let filter = query.filter();
    let view = if filter.is_empty() {
        snapshot.dataset
    } else {
        Arc::new(snapshot.dataset.filtered(&filter))
    };
    analyze(state, view, column).await
}

/// Runs the analysis over records supplied by the caller.
pub async fn run_benford_on_records(
    state: &AppState,
    request: BenfordRequest,
) -> Result<BenfordRun, AppError> {
    let column = resolve_column(&state.config, request.column.as_deref())?;
    if request.records.is_empty() {
        return Err(AppError::BadRequest("records is empty".to_string()));
    }
    let dataset = Arc::new(Dataset::from_records(request.records));
    analyze(state, dataset, column).await
}

fn resolve_column(config: &RuntimeConfig, requested: Option<&str>) -> Result<String, AppError> {
    let column = requested
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| config.default_column.trim());
    if column.is_empty() {
        return Err(AppError::BadRequest("column is required".to_string()));
    }
    Ok(column.to_string())
}

async fn analyze(
    state: &AppState,
    dataset: Arc<Dataset>,
    column: String,
) -> Result<BenfordRun, AppError> {
    let analysis_id = Uuid::new_v4();

    if !dataset.has_column(&column) {
        return Ok(warning(
            state,
            analysis_id,
            BenfordOutcome::ColumnNotFound { column },
        ));
    }

    let view = dataset.numeric_view(&column);
    if view.is_empty() {
        return Ok(warning(
            state,
            analysis_id,
            BenfordOutcome::NoNumericData { column },
        ));
    }
    let dropped = dataset.len() - view.len();

    let analyzer = state.analyzer();
    let renderer = state.chart_renderer.clone();
    let target = column.clone();
    let result = tokio::task::spawn_blocking(move || {
        analyzer.analyze_column(&view, &target, renderer.as_ref())
    })
    .await
    .map_err(|err| AppError::Internal(anyhow!("benford analysis task failed: {}", err)))?;

    let outcome = match result {
        Ok(mut report) => {
            report.discarded += dropped;
            if let Some(err) = &report.chart_error {
                warn!(%analysis_id, column = %report.column, "chart rendering failed: {}", err);
                state.metrics.record_chart_failure();
            }
            info!(
                %analysis_id,
                column = %report.column,
                observations = report.observations,
                discarded = report.discarded,
                chi_square = report.chi_square_statistic,
                p_value = report.p_value,
                suspicious = ?report.suspicious_digits,
                "benford analysis completed"
            );
            state.metrics.record_analysis(report.suspicious_digits.len());
            BenfordOutcome::Completed(report)
        }
        Err(BenfordError::ColumnNotFound { column }) => {
            return Ok(warning(
                state,
                analysis_id,
                BenfordOutcome::ColumnNotFound { column },
            ));
        }
        Err(BenfordError::InsufficientData {
            column,
            observations,
            required,
        }) => {
            return Ok(warning(
                state,
                analysis_id,
                BenfordOutcome::InsufficientData {
                    column,
                    observations,
                    required,
                },
            ));
        }
    };

    Ok(BenfordRun {
        analysis_id,
        outcome,
    })
}

fn warning(state: &AppState, analysis_id: Uuid, outcome: BenfordOutcome) -> BenfordRun {
    info!(%analysis_id, status = outcome.status(), "{}", outcome.message());
    state.metrics.record_analysis_warning();
    BenfordRun {
        analysis_id,
        outcome,
    }
}
