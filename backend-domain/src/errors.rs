// Domain errors
// Column lookup and sample size failures are expected outcomes, not faults

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BenfordError {
    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },
    #[error("too few samples in '{column}' ({observations} valid entries, need at least {required})")]
    InsufficientData {
        column: String,
        observations: usize,
        required: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("invalid chart data: {0}")]
    InvalidData(String),
    #[error("failed to create drawing area: {0}")]
    DrawingArea(String),
    #[error("failed to draw chart elements: {0}")]
    Drawing(String),
    #[error("failed to encode chart image: {0}")]
    Encode(String),
}
