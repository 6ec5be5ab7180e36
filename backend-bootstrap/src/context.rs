use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tracing::info;

use backend_application::{AppState, DatasetSnapshot, Metrics};
use backend_domain::DatasetRepository;
use backend_infrastructure::{AppConfig, JsonDatasetRepository, PlottersChartRenderer};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        Self::from_config(&config).await
    }

    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();

        let dataset_repo = Arc::new(JsonDatasetRepository::new());
        let dataset = dataset_repo
            .load_dataset(&runtime_config.dataset_path)
            .await
            .context("initial dataset load failed")?;
        info!(
            rows = dataset.len(),
            numeric_columns = ?dataset.numeric_columns(),
            "serving dataset {}",
            runtime_config.dataset_path
        );
        let snapshot = DatasetSnapshot::new(dataset, runtime_config.dataset_path.clone());

        let chart_renderer = Arc::new(PlottersChartRenderer::new(
            runtime_config.chart_width,
            runtime_config.chart_height,
        ));

        let state = AppState {
            config: runtime_config,
            dataset: Arc::new(RwLock::new(snapshot)),
            dataset_repo,
            chart_renderer,
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state })
    }
}
