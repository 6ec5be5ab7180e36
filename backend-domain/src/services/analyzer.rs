use crate::entities::{
    BenfordReport, BenfordSettings, CellValue, CoercedColumn, Dataset, DigitStat, DIGIT_BUCKETS,
};
use crate::errors::BenfordError;
use crate::ports::ChartRenderer;
use crate::utils::{chi_square_statistic, chi_square_survival};
use crate::value_objects::LeadingDigit;

/// Nine digit buckets, one constraint (proportions sum to one).
pub const DEGREES_OF_FREEDOM: u32 = (DIGIT_BUCKETS - 1) as u32;

/// Benford's expected proportion for each leading digit, `log10(1 + 1/d)`.
pub fn expected_benford_distribution() -> [f64; DIGIT_BUCKETS] {
    let mut expected = [0.0; DIGIT_BUCKETS];
    for digit in LeadingDigit::ALL {
        expected[digit.index()] = (1.0 + 1.0 / f64::from(digit.get())).log10();
    }
    expected
}

/// Leading digits of every value that has one, in input order.
///
/// Nulls are dropped, everything else is rendered as text and stripped of
/// non-digits and leading zeros before the first digit is taken.
pub fn extract_leading_digits(values: &[CellValue]) -> Vec<LeadingDigit> {
    values.iter().filter_map(leading_digit_of).collect()
}

fn leading_digit_of(value: &CellValue) -> Option<LeadingDigit> {
    match value {
        CellValue::Null => None,
        CellValue::Text(raw) => LeadingDigit::from_text(raw),
        other => LeadingDigit::from_text(&other.to_string()),
    }
}

fn leading_digit_of_number(value: f64) -> Option<LeadingDigit> {
    LeadingDigit::from_text(&value.to_string())
}

pub fn coerce_numeric(values: &[CellValue]) -> CoercedColumn {
    let mut coerced = CoercedColumn::default();
    for value in values {
        match value.as_f64() {
            Some(number) => coerced.values.push(number),
            None => coerced.discarded += 1,
        }
    }
    coerced
}

pub fn digit_counts(digits: &[LeadingDigit]) -> [u64; DIGIT_BUCKETS] {
    let mut counts = [0u64; DIGIT_BUCKETS];
    for digit in digits {
        counts[digit.index()] += 1;
    }
    counts
}

pub fn relative_deviation_pct(observed: f64, expected: f64) -> f64 {
    (observed - expected).abs() / expected * 100.0
}

#[derive(Debug, Clone, Default)]
pub struct BenfordAnalyzer {
    settings: BenfordSettings,
}

impl BenfordAnalyzer {
    pub fn new(settings: BenfordSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &BenfordSettings {
        &self.settings
    }

    pub fn analyze_column(
        &self,
        dataset: &Dataset,
        column: &str,
        renderer: &dyn ChartRenderer,
    ) -> Result<BenfordReport, BenfordError> {
        if !dataset.has_column(column) {
            return Err(BenfordError::ColumnNotFound {
                column: column.to_string(),
            });
        }

        let coerced = coerce_numeric(&dataset.column_values(column));
        let digits: Vec<LeadingDigit> = coerced
            .values
            .iter()
            .filter_map(|value| leading_digit_of_number(*value))
            .collect();
        if digits.len() < self.settings.min_sample_size {
            return Err(BenfordError::InsufficientData {
                column: column.to_string(),
                observations: digits.len(),
                required: self.settings.min_sample_size,
            });
        }

        let total = digits.len() as f64;
        let counts = digit_counts(&digits);
        let expected = expected_benford_distribution();
        let mut observed = [0.0; DIGIT_BUCKETS];
        for (slot, count) in observed.iter_mut().zip(counts.iter()) {
            *slot = *count as f64 / total;
        }

        let observed_counts: Vec<f64> = observed.iter().map(|p| p * total).collect();
        let expected_counts: Vec<f64> = expected.iter().map(|p| p * total).collect();
        let chi_square = chi_square_statistic(&observed_counts, &expected_counts);
        let p_value = chi_square_survival(chi_square, DEGREES_OF_FREEDOM);

        let digit_stats: Vec<DigitStat> = LeadingDigit::ALL
            .iter()
            .map(|digit| {
                let index = digit.index();
                let deviation_pct = relative_deviation_pct(observed[index], expected[index]);
                DigitStat {
                    digit: digit.get(),
                    expected: expected[index],
                    observed: observed[index],
                    count: counts[index],
                    deviation_pct,
                    suspicious: deviation_pct > self.settings.deviation_threshold_pct,
                }
            })
            .collect();
        let suspicious_digits: Vec<u8> = digit_stats
            .iter()
            .filter(|stat| stat.suspicious)
            .map(|stat| stat.digit)
            .collect();

        let (chart, chart_error) = match renderer.render_comparison(column, &expected, &observed) {
            Ok(image) => (Some(image), None),
            Err(err) => (None, Some(err.to_string())),
        };

        Ok(BenfordReport {
            column: column.to_string(),
            observations: digits.len(),
            discarded: coerced.discarded,
            chi_square_statistic: chi_square,
            p_value,
            degrees_of_freedom: DEGREES_OF_FREEDOM,
            summary: format_summary(
                column,
                chi_square,
                p_value,
                &suspicious_digits,
                self.settings.deviation_threshold_pct,
            ),
            digits: digit_stats,
            suspicious_digits,
            sample_records: dataset.head_of_column(column, self.settings.sample_rows),
            chart,
            chart_error,
        })
    }
}

fn format_summary(
    column: &str,
    chi_square: f64,
    p_value: f64,
    suspicious: &[u8],
    threshold_pct: f64,
) -> String {
    let flagged = if suspicious.is_empty() {
        "none".to_string()
    } else {
        format!("{:?}", suspicious)
    };
    format!(
        "Column '{}': chi2={:.2}, p={:.4}. Suspicious digits (>{}% deviation): {}",
        column, chi_square, p_value, threshold_pct, flagged
    )
}
