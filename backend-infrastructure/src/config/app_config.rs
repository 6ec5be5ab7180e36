use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::RuntimeConfig;

use crate::config::validation::validate_column_name;
use crate::utils::{blank_to_none, resolve_path};

pub const CONFIG_ENV: &str = "TENDERSCOPE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./config.toml";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
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

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8050".to_string(),
            api_token: None,
            dataset_path: "./records.json".to_string(),
            default_column: "total_value_kes".to_string(),
            min_sample_size: 30,
            deviation_threshold_pct: 15.0,
            sample_rows: 10,
            chart_width: 600,
            chart_height: 400,
            max_body_bytes: 16 * 1024 * 1024,
            request_timeout_seconds: 30,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path), |key| env::var(key).ok()).await
    }

    /// Reads `file_path` when it exists, then applies overrides from `lookup`
    /// (the process environment outside of tests).
    pub async fn load_from<F>(file_path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            toml::from_str::<AppConfig>(&content)
                .map_err(|err| anyhow!("invalid config {}: {}", file_path.display(), err))?
        } else {
            warn!("{} not found, using defaults", file_path.display());
            AppConfig::default()
        };
        config.apply_overrides(lookup);
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        self.api_token = blank_to_none(self.api_token.take());
        self.bind_addr = self.bind_addr.trim().to_string();
        self.default_column = self.default_column.trim().to_string();
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.dataset_path = resolve_path(base, &self.dataset_path);
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.dataset_path.trim().is_empty() {
            return Err(anyhow!("dataset_path must not be empty"));
        }
        validate_column_name(&self.default_column)
            .map_err(|err| anyhow!("invalid default_column: {}", err))?;
        if self.min_sample_size == 0 {
            return Err(anyhow!("min_sample_size must be greater than 0"));
        }
        if !self.deviation_threshold_pct.is_finite() || self.deviation_threshold_pct <= 0.0 {
            return Err(anyhow!("deviation_threshold_pct must be a positive number"));
        }
        if self.sample_rows > 1000 {
            return Err(anyhow!("sample_rows must be at most 1000"));
        }
        if !(100..=4000).contains(&self.chart_width) || !(100..=4000).contains(&self.chart_height) {
            return Err(anyhow!("chart_width and chart_height must be within 100..=4000"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            dataset_path: self.dataset_path.clone(),
            default_column: self.default_column.clone(),
            min_sample_size: self.min_sample_size,
            deviation_threshold_pct: self.deviation_threshold_pct,
            sample_rows: self.sample_rows,
            chart_width: self.chart_width,
            chart_height: self.chart_height,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("TENDERSCOPE_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Some(value) = lookup("TENDERSCOPE_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Some(value) = lookup("TENDERSCOPE_DATASET_PATH") {
            self.dataset_path = value;
        }
        if let Some(value) = lookup("TENDERSCOPE_DEFAULT_COLUMN") {
            self.default_column = value;
        }
        if let Some(value) = lookup("TENDERSCOPE_MIN_SAMPLE_SIZE") {
            self.min_sample_size = value.parse().unwrap_or(self.min_sample_size);
        }
        if let Some(value) = lookup("TENDERSCOPE_DEVIATION_THRESHOLD_PCT") {
            self.deviation_threshold_pct = value.parse().unwrap_or(self.deviation_threshold_pct);
        }
        if let Some(value) = lookup("TENDERSCOPE_SAMPLE_ROWS") {
            self.sample_rows = value.parse().unwrap_or(self.sample_rows);
        }
        if let Some(value) = lookup("TENDERSCOPE_CHART_WIDTH") {
            self.chart_width = value.parse().unwrap_or(self.chart_width);
        }
        if let Some(value) = lookup("TENDERSCOPE_CHART_HEIGHT") {
            self.chart_height = value.parse().unwrap_or(self.chart_height);
        }
        if let Some(value) = lookup("TENDERSCOPE_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Some(value) = lookup("TENDERSCOPE_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
    }
}
