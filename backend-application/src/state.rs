use std::sync::Arc;

use backend_domain::ports::{ChartRenderer, DatasetRepository};
use backend_domain::{BenfordAnalyzer, Dataset, RuntimeConfig};
use tokio::sync::RwLock;

use crate::Metrics;

/// Loaded dataset plus its load time. Requests clone the `Arc` and work on
/// that snapshot; a reload replaces it without touching running analyses.
#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    pub dataset: Arc<Dataset>,
    pub source: String,
    pub loaded_at: i64,
}

impl DatasetSnapshot {
    pub fn new(dataset: Dataset, source: impl Into<String>) -> Self {
        Self {
            dataset: Arc::new(dataset),
            source: source.into(),
            loaded_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub dataset: Arc<RwLock<DatasetSnapshot>>,
    pub dataset_repo: Arc<dyn DatasetRepository>,
    pub chart_renderer: Arc<dyn ChartRenderer>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub async fn snapshot(&self) -> DatasetSnapshot {
        self.dataset.read().await.clone()
    }

    pub fn analyzer(&self) -> BenfordAnalyzer {
        BenfordAnalyzer::new(self.config.benford_settings())
    }
}
