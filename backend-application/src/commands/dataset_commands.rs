use tracing::{error, info};

use backend_domain::DatasetSummary;

use crate::queries::dataset_queries;
use crate::{AppError, AppState, DatasetSnapshot};

/// Reloads the dataset file and swaps the shared snapshot. On failure the
/// previous snapshot stays in place.
pub async fn reload_dataset(state: &AppState) -> Result<DatasetSummary, AppError> {
    let path = state.config.dataset_path.clone();
    let dataset = state
        .dataset_repo
        .load_dataset(&path)
        .await
        .map_err(|err| {
            error!("failed to reload dataset from {}: {}", path, err);
            state.metrics.record_dataset_reload_error();
            AppError::DatasetUnavailable(err.to_string())
        })?;

    info!(rows = dataset.len(), columns = dataset.columns().len(), "dataset reloaded from {}", path);
    let snapshot = DatasetSnapshot::new(dataset, path);
    *state.dataset.write().await = snapshot;
    state.metrics.record_dataset_reload();

    Ok(dataset_queries::dataset_summary(state).await)
}
