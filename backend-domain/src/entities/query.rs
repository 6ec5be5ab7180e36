// Query and payload types exchanged with the interface layer

use serde::{Deserialize, Deserializer, Serialize};

use crate::entities::{DatasetFilter, Record};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BenfordQuery {
    pub column: Option<String>,
    pub buyer: Option<String>,
    #[serde(default, deserialize_with = "blank_year")]
    pub year: Option<i64>,
}

// `year=` arrives from an unset dropdown; anything non-numeric is no filter.
fn blank_year<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.trim().parse::<i64>().ok()))
}

impl BenfordQuery {
    /// Blank filter values mean "no filter", as the dropdowns send them.
    pub fn filter(&self) -> DatasetFilter {
        DatasetFilter {
            buyer: self
                .buyer
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToString::to_string),
            year: self.year.filter(|year| *year > 0),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BenfordRequest {
    pub column: Option<String>,
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterOptions {
    pub buyers: Vec<String>,
    pub years: Vec<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub source: String,
    pub rows: usize,
    pub columns: Vec<String>,
    pub numeric_columns: Vec<String>,
    pub loaded_at: i64,
}
