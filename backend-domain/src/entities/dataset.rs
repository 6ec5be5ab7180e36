// Dataset entity
// Immutable snapshot of procurement records; filtering produces new views

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

pub const BUYER_COLUMN: &str = "buyer_name";
pub const YEAR_COLUMN: &str = "year";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric coercion: booleans, unparseable text and NaN are treated as
    /// missing.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            CellValue::Null | CellValue::Bool(_) => return None,
            CellValue::Number(value) => *value,
            CellValue::Text(raw) => raw.trim().parse::<f64>().ok()?,
        };
        if value.is_nan() {
            None
        } else {
            Some(value)
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(flag) => write!(f, "{}", flag),
            CellValue::Number(value) => write!(f, "{}", value),
            CellValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

pub type Record = BTreeMap<String, CellValue>;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Dataset {
    pub fn from_records(rows: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut seen = BTreeSet::new();
        for row in &rows {
            for key in row.keys() {
                if seen.insert(key.clone()) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, rows }
    }

    fn with_schema(columns: Vec<String>, rows: Vec<Record>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|name| name == column)
    }

    /// Values of one column in row order; rows without the key yield `Null`.
    pub fn column_values(&self, column: &str) -> Vec<CellValue> {
        self.rows
            .iter()
            .map(|row| row.get(column).cloned().unwrap_or_default())
            .collect()
    }

    /// A column counts as numeric when it holds at least one number and
    /// every non-null value is a number.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|column| {
                let mut any_number = false;
                for row in &self.rows {
                    match row.get(column.as_str()) {
                        None | Some(CellValue::Null) => {}
                        Some(CellValue::Number(_)) => any_number = true,
                        Some(_) => return false,
                    }
                }
                any_number
            })
            .cloned()
            .collect()
    }

    pub fn filtered(&self, filter: &DatasetFilter) -> Dataset {
        if filter.is_empty() {
            return self.clone();
        }
        let rows = self
            .rows
            .iter()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect();
        Dataset::with_schema(self.columns.clone(), rows)
    }

    /// Rows whose `column` coerces to a number, with that cell replaced by
    /// the coerced value. The schema is kept as is.
    pub fn numeric_view(&self, column: &str) -> Dataset {
        let rows = self
            .rows
            .iter()
            .filter_map(|row| {
                let value = row.get(column)?.as_f64()?;
                let mut row = row.clone();
                row.insert(column.to_string(), CellValue::Number(value));
                Some(row)
            })
            .collect();
        Dataset::with_schema(self.columns.clone(), rows)
    }

    /// First `limit` rows restricted to a single column.
    pub fn head_of_column(&self, column: &str, limit: usize) -> Vec<Record> {
        self.rows
            .iter()
            .take(limit)
            .map(|row| {
                let mut restricted = Record::new();
                restricted.insert(
                    column.to_string(),
                    row.get(column).cloned().unwrap_or_default(),
                );
                restricted
            })
            .collect()
    }

    pub fn distinct_text(&self, column: &str) -> Vec<String> {
        let values: BTreeSet<String> = self
            .rows
            .iter()
            .filter_map(|row| row.get(column))
            .filter_map(|value| value.as_text())
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(ToString::to_string)
            .collect();
        values.into_iter().collect()
    }

    pub fn distinct_years(&self, column: &str) -> Vec<i64> {
        let values: BTreeSet<i64> = self
            .rows
            .iter()
            .filter_map(|row| row.get(column))
            .filter_map(CellValue::as_f64)
            .filter(|value| value.fract() == 0.0 && *value > 0.0)
            .map(|value| value as i64)
            .collect();
        values.into_iter().collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetFilter {
    pub buyer: Option<String>,
    pub year: Option<i64>,
}

impl DatasetFilter {
    pub fn is_empty(&self) -> bool {
        self.buyer.is_none() && self.year.is_none()
    }

    pub fn matches(&self, row: &Record) -> bool {
        if let Some(buyer) = &self.buyer {
            let matched = row
                .get(BUYER_COLUMN)
                .and_then(CellValue::as_text)
                .map(|value| value == buyer)
                .unwrap_or(false);
            if !matched {
                return false;
            }
        }
        if let Some(year) = self.year {
            let matched = row
                .get(YEAR_COLUMN)
                .and_then(CellValue::as_f64)
                .map(|value| value == year as f64)
                .unwrap_or(false);
            if !matched {
                return false;
            }
        }
        true
    }
}
