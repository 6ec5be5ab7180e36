use crate::entities::{ChartImage, DIGIT_BUCKETS};
use crate::errors::ChartError;

/// Renders the expected-vs-observed comparison for one column.
pub trait ChartRenderer: Send + Sync {
    fn render_comparison(
        &self,
        column: &str,
        expected: &[f64; DIGIT_BUCKETS],
        observed: &[f64; DIGIT_BUCKETS],
    ) -> Result<ChartImage, ChartError>;
}
