// Runtime configuration shared across layers

use crate::entities::BenfordSettings;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub dataset_path: String,
    pub default_column: String,
    pub min_sample_size: usize,
    pub deviation_threshold_pct: f64,
    pub sample_rows: usize,
    pub chart_width: u32,
    pub chart_height: u32,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl RuntimeConfig {
    pub fn benford_settings(&self) -> BenfordSettings {
        BenfordSettings {
            min_sample_size: self.min_sample_size,
            deviation_threshold_pct: self.deviation_threshold_pct,
            sample_rows: self.sample_rows,
        }
    }
}
