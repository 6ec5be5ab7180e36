use std::path::Path;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tracing::{info, warn};

use backend_domain::{CellValue, Dataset, DatasetRepository, Record};

/// Loads the contract table from a JSON array of flat objects.
pub struct JsonDatasetRepository;

impl JsonDatasetRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonDatasetRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatasetRepository for JsonDatasetRepository {
    async fn load_dataset(&self, path: &str) -> anyhow::Result<Dataset> {
        if !Path::new(path).exists() {
            warn!("dataset {} not found, serving placeholder row", path);
            return Ok(Dataset::from_records(vec![placeholder_record()]));
        }
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read dataset {}", path))?;
        let dataset = parse_records(&content)
            .with_context(|| format!("failed to parse dataset {}", path))?;
        info!(
            rows = dataset.len(),
            columns = dataset.columns().len(),
            "dataset loaded from {}",
            path
        );
        Ok(dataset)
    }
}

pub fn parse_records(content: &str) -> anyhow::Result<Dataset> {
    let value: Value = serde_json::from_str(content)?;
    let Value::Array(items) = value else {
        return Err(anyhow!("expected a JSON array of records"));
    };
    let mut rows = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let Value::Object(fields) = item else {
            return Err(anyhow!("record {} is not an object", index));
        };
        let row: Record = fields
            .into_iter()
            .map(|(key, value)| (key, to_cell(value)))
            .collect();
        rows.push(row);
    }
    Ok(Dataset::from_records(rows))
}

fn to_cell(value: Value) -> CellValue {
    match value {
        Value::Null => CellValue::Null,
        Value::Bool(flag) => CellValue::Bool(flag),
        Value::Number(number) => number
            .as_f64()
            .map(CellValue::Number)
            .unwrap_or(CellValue::Null),
        Value::String(text) => CellValue::Text(text),
        nested => CellValue::Text(nested.to_string()),
    }
}

/// Single empty row so the dashboard still renders before data is exported.
pub fn placeholder_record() -> Record {
    [
        ("buyer_name", CellValue::from("(no data)")),
        ("year", CellValue::Number(0.0)),
        ("total_value_kes", CellValue::Number(0.0)),
        ("is_anomaly", CellValue::Number(0.0)),
        ("contract_duration_days", CellValue::Number(0.0)),
        ("cluster", CellValue::from("N/A")),
        ("tender_procurementmethod", CellValue::from("N/A")),
        ("anomaly_score", CellValue::Number(0.0)),
        ("identifier_legalname", CellValue::from("")),
        ("title", CellValue::from("")),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect()
}
