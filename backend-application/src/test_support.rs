use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use backend_domain::ports::{ChartRenderer, DatasetRepository};
use backend_domain::{
    CellValue, ChartError, ChartImage, Dataset, Record, RuntimeConfig, DIGIT_BUCKETS,
};

use crate::{AppState, DatasetSnapshot, Metrics};

pub struct StaticRenderer;

impl ChartRenderer for StaticRenderer {
    fn render_comparison(
        &self,
        _column: &str,
        _expected: &[f64; DIGIT_BUCKETS],
        _observed: &[f64; DIGIT_BUCKETS],
    ) -> Result<ChartImage, ChartError> {
        Ok(ChartImage::new(vec![0x89, b'P', b'N', b'G']))
    }
}

pub struct FailingRenderer;

impl ChartRenderer for FailingRenderer {
    fn render_comparison(
        &self,
        _column: &str,
        _expected: &[f64; DIGIT_BUCKETS],
        _observed: &[f64; DIGIT_BUCKETS],
    ) -> Result<ChartImage, ChartError> {
        Err(ChartError::Drawing("backend unavailable".to_string()))
    }
}

/// Serves a fixed set of records, or fails when none are configured.
pub struct MemoryDatasetRepository {
    pub records: Option<Vec<Record>>,
}

#[async_trait]
impl DatasetRepository for MemoryDatasetRepository {
    async fn load_dataset(&self, path: &str) -> anyhow::Result<Dataset> {
        match &self.records {
            Some(records) => Ok(Dataset::from_records(records.clone())),
            None => Err(anyhow::anyhow!("dataset {} is unreadable", path)),
        }
    }
}

pub fn record(pairs: &[(&str, CellValue)]) -> Record {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

pub fn numeric_records(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            let (buyer, year) = if i % 2 == 0 {
                ("Ministry of Health", 2021.0)
            } else {
                ("County of Nairobi", 2022.0)
            };
            record(&[
                ("buyer_name", CellValue::from(buyer)),
                ("year", CellValue::Number(year)),
                ("total_value_kes", CellValue::Number((i as f64 + 1.0) * 37.0)),
                ("title", CellValue::from(format!("Tender {}", i))),
            ])
        })
        .collect()
}

pub fn test_config() -> RuntimeConfig {
    RuntimeConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        api_token: None,
        dataset_path: "./records.json".to_string(),
        default_column: "total_value_kes".to_string(),
        min_sample_size: 30,
        deviation_threshold_pct: 15.0,
        sample_rows: 10,
        chart_width: 600,
        chart_height: 400,
        max_body_bytes: 1024 * 1024,
        request_timeout_seconds: 5,
    }
}

pub fn test_state(records: Vec<Record>) -> AppState {
    let dataset = Dataset::from_records(records.clone());
    AppState {
        config: test_config(),
        dataset: Arc::new(RwLock::new(DatasetSnapshot::new(dataset, "memory"))),
        dataset_repo: Arc::new(MemoryDatasetRepository {
            records: Some(records),
        }),
        chart_renderer: Arc::new(StaticRenderer),
        metrics: Arc::new(Metrics::default()),
    }
}
