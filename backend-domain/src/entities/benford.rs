// Benford analysis entities

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::entities::Record;

pub const DIGIT_BUCKETS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenfordSettings {
    pub min_sample_size: usize,
    pub deviation_threshold_pct: f64,
    pub sample_rows: usize,
}

impl Default for BenfordSettings {
    fn default() -> Self {
        Self {
            min_sample_size: 30,
            deviation_threshold_pct: 15.0,
            sample_rows: 10,
        }
    }
}

/// Numeric values of a column after coercion, with the count of entries
/// that were missing or failed to coerce.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoercedColumn {
    pub values: Vec<f64>,
    pub discarded: usize,
}

impl CoercedColumn {
    pub fn valid(&self) -> usize {
        self.values.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DigitStat {
    pub digit: u8,
    pub expected: f64,
    pub observed: f64,
    pub count: u64,
    pub deviation_pct: f64,
    pub suspicious: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    pub png: Vec<u8>,
}

impl ChartImage {
    pub const MIME_TYPE: &'static str = "image/png";

    pub fn new(png: Vec<u8>) -> Self {
        Self { png }
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", Self::MIME_TYPE, STANDARD.encode(&self.png))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BenfordReport {
    pub column: String,
    pub observations: usize,
    pub discarded: usize,
    pub chi_square_statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: u32,
    pub digits: Vec<DigitStat>,
    pub suspicious_digits: Vec<u8>,
    pub summary: String,
    pub sample_records: Vec<Record>,
    #[serde(skip)]
    pub chart: Option<ChartImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_error: Option<String>,
}

impl BenfordReport {
    pub fn observed_distribution(&self) -> [f64; DIGIT_BUCKETS] {
        let mut out = [0.0; DIGIT_BUCKETS];
        for stat in &self.digits {
            out[usize::from(stat.digit - 1)] = stat.observed;
        }
        out
    }

    pub fn chart_data_uri(&self) -> Option<String> {
        self.chart.as_ref().map(ChartImage::to_data_uri)
    }
}
