//! Expected-vs-observed leading digit chart.
//!
//! Drawn with [`plotters`] on its bitmap backend. The backend encodes PNG
//! only when writing to a path, so each render goes through a scratch file.

use std::path::Path;

use plotters::prelude::*;

use backend_domain::{ChartError, ChartImage, ChartRenderer, DIGIT_BUCKETS};

const EXPECTED_COLOR: RGBColor = RGBColor(31, 119, 180);
const ACTUAL_COLOR: RGBColor = RGBColor(255, 127, 14);
const BAR_WIDTH: f64 = 0.4;

pub struct PlottersChartRenderer {
    width: u32,
    height: u32,
}

impl PlottersChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn draw(
        &self,
        output_path: &Path,
        column: &str,
        expected: &[f64; DIGIT_BUCKETS],
        observed: &[f64; DIGIT_BUCKETS],
    ) -> Result<(), ChartError> {
        let root = BitMapBackend::new(output_path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| ChartError::DrawingArea(e.to_string()))?;

        let peak = expected
            .iter()
            .chain(observed.iter())
            .copied()
            .fold(0.0_f64, f64::max);
        let y_max = (peak * 1.15).max(0.05);

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("Benford's Law - {}", column), ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(55)
            .build_cartesian_2d(0.5_f64..9.5_f64, 0.0_f64..y_max)
            .map_err(|e| ChartError::DrawingArea(e.to_string()))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(DIGIT_BUCKETS)
            .x_label_formatter(&|x| format!("{:.0}", x))
            .y_label_formatter(&|y| format!("{:.2}", y))
            .x_desc("Leading Digit")
            .y_desc("Proportion")
            .draw()
            .map_err(|e| ChartError::Drawing(e.to_string()))?;

        chart
            .draw_series(expected.iter().enumerate().map(|(index, value)| {
                let digit = (index + 1) as f64;
                Rectangle::new(
                    [(digit - BAR_WIDTH, 0.0), (digit, *value)],
                    EXPECTED_COLOR.filled(),
                )
            }))
            .map_err(|e| ChartError::Drawing(e.to_string()))?
            .label("Expected (Benford)")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], EXPECTED_COLOR.filled()));

        chart
            .draw_series(observed.iter().enumerate().map(|(index, value)| {
                let digit = (index + 1) as f64;
                Rectangle::new(
                    [(digit, 0.0), (digit + BAR_WIDTH, *value)],
                    ACTUAL_COLOR.filled(),
                )
            }))
            .map_err(|e| ChartError::Drawing(e.to_string()))?
            .label("Actual")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], ACTUAL_COLOR.filled()));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .draw()
            .map_err(|e| ChartError::Drawing(e.to_string()))?;

        root.present()
            .map_err(|e| ChartError::Drawing(e.to_string()))?;
        Ok(())
    }
}

impl ChartRenderer for PlottersChartRenderer {
    fn render_comparison(
        &self,
        column: &str,
        expected: &[f64; DIGIT_BUCKETS],
        observed: &[f64; DIGIT_BUCKETS],
    ) -> Result<ChartImage, ChartError> {
        if self.width == 0 || self.height == 0 {
            return Err(ChartError::InvalidData(format!(
                "chart size {}x{} is empty",
                self.width, self.height
            )));
        }
        if let Some(value) = expected
            .iter()
            .chain(observed.iter())
            .find(|value| !value.is_finite() || **value < 0.0)
        {
            return Err(ChartError::InvalidData(format!(
                "proportion {} is not a finite non-negative number",
                value
            )));
        }

        let scratch = tempfile::Builder::new()
            .prefix("benford-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| ChartError::Encode(e.to_string()))?;
        self.draw(scratch.path(), column, expected, observed)?;

        let png = std::fs::read(scratch.path()).map_err(|e| ChartError::Encode(e.to_string()))?;
        if png.is_empty() {
            return Err(ChartError::Encode("encoder produced no output".to_string()));
        }
        Ok(ChartImage::new(png))
    }
}
