//! Static Chart Renderer
//! Writes SVG versions of the hours-worked and histogram charts with plotters,
//! for use outside a browser.

use super::plotter::quantile_opacity;
use super::ChartError;
use crate::stats::{QuantileSeries, XySeries, AGE, HOURS_PER_WEEK};
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 600;

// Colors (RGB), matching the Plotly palette
const QUANTILE_BLUE: RGBColor = RGBColor(76, 114, 176);
const MEAN_RED: RGBColor = RGBColor(196, 78, 82);

const BIN_START: f64 = 0.0;
const BIN_END: f64 = 100.0;
const BIN_SIZE: f64 = 3.0;

fn render_err(e: impl std::fmt::Display) -> ChartError {
    ChartError::Render(e.to_string())
}

/// Fraction of `values` falling in each `[lo, lo + size)` bin between
/// `start` and `end`. The last bin is closed on the right.
pub fn probability_bins(values: &[f64], start: f64, end: f64, size: f64) -> Vec<(f64, f64, f64)> {
    if values.is_empty() || size <= 0.0 || end <= start {
        return Vec::new();
    }

    let n_bins = ((end - start) / size).ceil() as usize;
    let mut counts = vec![0usize; n_bins];
    for &v in values {
        if v < start || v > end || v.is_nan() {
            continue;
        }
        let idx = (((v - start) / size).floor() as usize).min(n_bins - 1);
        counts[idx] += 1;
    }

    let total = values.len() as f64;
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let lo = start + i as f64 * size;
            (lo, (lo + size).min(end), count as f64 / total)
        })
        .collect()
}

fn xy_points(series: &XySeries) -> Vec<(f64, f64)> {
    series
        .x
        .iter()
        .zip(series.y.iter())
        .filter_map(|(x, &y)| Some((x.as_f64()?, y)))
        .filter(|(_, y)| y.is_finite())
        .collect()
}

fn padded_range(values: impl Iterator<Item = f64>, fallback: Range<f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return fallback;
    }
    let pad = ((max - min) * 0.05).max(1.0);
    (min - pad)..(max + pad)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Quantile bands and mean of hours worked by age.
    pub fn render_hours_worked_svg(
        path: &Path,
        quantiles: &[QuantileSeries],
        mean: &XySeries,
    ) -> Result<(), ChartError> {
        let quantile_points: Vec<(f64, Vec<(f64, f64)>)> = quantiles
            .iter()
            .map(|q| (q.quantile, xy_points(&q.series)))
            .collect();
        let mean_points = xy_points(mean);

        let all = quantile_points
            .iter()
            .flat_map(|(_, pts)| pts.iter())
            .chain(mean_points.iter());
        let x_range = padded_range(all.clone().map(|p| p.0), 0.0..100.0);
        let y_range = padded_range(all.map(|p| p.1), 0.0..100.0);

        let root = SVGBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Hours Per Week Worked by Age", ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, y_range)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc(AGE)
            .y_desc(HOURS_PER_WEEK)
            .draw()
            .map_err(render_err)?;

        for (quantile, points) in quantile_points {
            let color = QUANTILE_BLUE.mix(quantile_opacity(quantile));
            chart
                .draw_series(LineSeries::new(points, color.stroke_width(2)))
                .map_err(render_err)?
                .label(format!("{} Quantile", quantile))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        chart
            .draw_series(LineSeries::new(mean_points, MEAN_RED.stroke_width(3)))
            .map_err(render_err)?
            .label("Mean hours worked at each age")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], MEAN_RED));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        Ok(())
    }

    /// Overlapping probability histograms of hours worked.
    pub fn render_histogram_svg(
        path: &Path,
        over_50k: &[f64],
        under_50k: &[f64],
    ) -> Result<(), ChartError> {
        let traces = [
            (
                "Over $50K",
                MEAN_RED,
                probability_bins(over_50k, BIN_START, BIN_END, BIN_SIZE),
            ),
            (
                "Under $50K",
                QUANTILE_BLUE,
                probability_bins(under_50k, BIN_START, BIN_END, BIN_SIZE),
            ),
        ];

        let y_max = traces
            .iter()
            .flat_map(|(_, _, bins)| bins.iter().map(|b| b.2))
            .fold(0.0f64, f64::max)
            .max(0.01)
            * 1.1;

        let root = SVGBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Probability of Hours Worked Per Week by Income", ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(BIN_START..BIN_END, 0.0..y_max)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc("Hours Worked per Week")
            .y_desc("Probability")
            .draw()
            .map_err(render_err)?;

        for (name, color, bins) in traces {
            let fill = color.mix(0.5);
            chart
                .draw_series(bins.into_iter().map(move |(lo, hi, p)| {
                    Rectangle::new([(lo, 0.0), (hi, p)], fill.filled())
                }))
                .map_err(render_err)?
                .label(name)
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], fill.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        Ok(())
    }
}
