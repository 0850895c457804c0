//! Chart Plotter Module
//! Builds Plotly figures (trace list + layout) for the dashboard charts.
//!
//! Every trace is described by a plain style record and turned into JSON by
//! one builder function per trace type.

use super::ChartError;
use crate::stats::{QuantileSeries, XySeries, AGE, HOURS_PER_WEEK};
use serde::Serialize;
use serde_json::{json, Value};

/// Seaborn default palette
pub const BLUE: &str = "rgba(76, 114, 176, 1.0)";
pub const GREEN: &str = "rgba(85, 168, 104, 1.0)";
pub const RED: &str = "rgba(196, 78, 82, 1.0)";
pub const PURPLE: &str = "rgba(129, 114, 178, 1.0)";
pub const YELLOW: &str = "rgba(204, 185, 116, 1.0)";
pub const TURQUOISE: &str = "rgba(100, 181, 205, 1.0)";
pub const LIGHT_GRAY: &str = "rgba(240, 240, 240, 1.0)";

pub const PALETTE: [&str; 6] = [RED, BLUE, GREEN, PURPLE, YELLOW, TURQUOISE];

/// Color for the `index`-th trace, wrapping around the palette.
pub fn pick_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Outer quantile bands fade out.
pub fn quantile_opacity(quantile: f64) -> f64 {
    const OPACITY: [(f64, f64); 5] = [(0.1, 0.3), (0.25, 0.7), (0.5, 1.0), (0.75, 0.7), (0.9, 0.3)];
    OPACITY
        .iter()
        .find(|(q, _)| (q - quantile).abs() < 1e-9)
        .map(|(_, opacity)| *opacity)
        .unwrap_or(1.0)
}

/// A Plotly figure ready to hand to `Plotly.newPlot`.
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Value>,
    pub layout: Value,
}

impl Figure {
    pub fn to_json(&self) -> Result<String, ChartError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone)]
pub struct ScatterStyle {
    pub name: String,
    pub mode: &'static str,
    pub color: &'static str,
    pub marker_size: u32,
    pub opacity: f64,
}

#[derive(Debug, Clone)]
pub struct HistogramStyle {
    pub name: String,
    pub color: &'static str,
    pub opacity: f64,
    pub line_width: u32,
    pub histnorm: &'static str,
    pub bin_start: f64,
    pub bin_end: f64,
    pub bin_size: f64,
}

impl HistogramStyle {
    pub fn probability(name: &str, color: &'static str) -> Self {
        Self {
            name: name.to_string(),
            color,
            opacity: 0.5,
            line_width: 1,
            histnorm: "probability",
            bin_start: 0.0,
            bin_end: 100.0,
            bin_size: 3.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayoutStyle {
    pub title: &'static str,
    pub x_title: &'static str,
    pub y_title: &'static str,
    pub height: u32,
}

fn scatter_trace(series: &XySeries, style: &ScatterStyle) -> Value {
    json!({
        "type": "scatter",
        "x": series.x,
        "y": series.y,
        "mode": style.mode,
        "name": style.name,
        "opacity": style.opacity,
        "marker": {
            "color": style.color,
            "size": style.marker_size,
            "opacity": style.opacity,
        },
    })
}

fn histogram_trace(values: &[f64], style: &HistogramStyle) -> Value {
    json!({
        "type": "histogram",
        "x": values,
        "name": style.name,
        "opacity": style.opacity,
        "histnorm": style.histnorm,
        "autobinx": false,
        "xbins": {
            "start": style.bin_start,
            "end": style.bin_end,
            "size": style.bin_size,
        },
        "marker": {
            "color": style.color,
            "line": { "width": style.line_width },
        },
    })
}

fn layout(style: &LayoutStyle) -> Value {
    json!({
        "title": style.title,
        "height": style.height,
        "xaxis": { "title": style.x_title },
        "yaxis": { "title": style.y_title },
    })
}

/// Creates the dashboard figures.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Quantile bands of hours worked by age plus the mean trace.
    pub fn hours_worked_figure(quantiles: &[QuantileSeries], mean: &XySeries) -> Figure {
        let mut data: Vec<Value> = quantiles
            .iter()
            .map(|q| {
                let style = ScatterStyle {
                    name: format!("{} Quantile", q.quantile),
                    mode: "lines+markers",
                    color: BLUE,
                    marker_size: 5,
                    opacity: quantile_opacity(q.quantile),
                };
                scatter_trace(&q.series, &style)
            })
            .collect();

        let mean_style = ScatterStyle {
            name: "Mean hours worked<br>at each age".to_string(),
            mode: "lines+markers",
            color: RED,
            marker_size: 8,
            opacity: 1.0,
        };
        data.push(scatter_trace(mean, &mean_style));

        Figure {
            data,
            layout: layout(&LayoutStyle {
                title: "<b>Hours Per Week Worked by Age</b><br><i>with average hours worked by age</i>",
                x_title: AGE,
                y_title: HOURS_PER_WEEK,
                height: 600,
            }),
        }
    }

    /// Overlapping probability histograms of hours worked, over and under 50k.
    pub fn histogram_figure(over_50k: &[f64], under_50k: &[f64]) -> Figure {
        let data = vec![
            histogram_trace(over_50k, &HistogramStyle::probability("Over $50K", pick_color(0))),
            histogram_trace(under_50k, &HistogramStyle::probability("Under $50K", pick_color(1))),
        ];

        let mut layout = layout(&LayoutStyle {
            title: "<b>Probability Histogram of Hours Worked Per Week for<br>People with Incomes over and under 50k</b>",
            x_title: "Hours Worked per Week",
            y_title: "Probability of Working X Hours Per Week",
            height: 600,
        });
        layout["barmode"] = json!("overlay");

        Figure { data, layout }
    }

    /// Choropleth of over-50k respondent counts by home country.
    pub fn choropleth_figure(counts: &[(String, usize)]) -> Figure {
        let (countries, z): (Vec<&str>, Vec<usize>) =
            counts.iter().map(|(c, n)| (c.as_str(), *n)).unzip();

        let trace = json!({
            "type": "choropleth",
            "locationmode": "country names",
            "locations": countries,
            "z": z,
            "text": countries,
            "marker": { "line": { "color": LIGHT_GRAY } },
        });

        let layout = json!({
            "title": "<b>Home Country of Respondents Who Make<br>More Than $50K</b>",
            "height": 500,
            "geo": {
                "showframe": true,
                "showcoastlines": true,
                "projection": { "type": "Mercator" },
            },
        });

        Figure {
            data: vec![trace],
            layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::KeyValue;

    fn series(y: Vec<f64>) -> XySeries {
        XySeries {
            x: vec![KeyValue::Int(20), KeyValue::Int(30)],
            y,
        }
    }

    #[test]
    fn test_pick_color_wraps() {
        assert_eq!(pick_color(0), RED);
        assert_eq!(pick_color(1), BLUE);
        assert_eq!(pick_color(6), RED);
        assert_eq!(pick_color(13), BLUE);
    }

    #[test]
    fn test_quantile_opacity() {
        assert_eq!(quantile_opacity(0.1), 0.3);
        assert_eq!(quantile_opacity(0.5), 1.0);
        assert_eq!(quantile_opacity(0.75), 0.7);
        assert_eq!(quantile_opacity(0.33), 1.0);
    }

    #[test]
    fn test_hours_worked_figure() {
        let quantiles = vec![QuantileSeries {
            quantile: 0.25,
            series: series(vec![40.0, 45.0]),
        }];
        let figure = ChartPlotter::hours_worked_figure(&quantiles, &series(vec![41.5, 47.0]));

        assert_eq!(figure.data.len(), 2);
        assert_eq!(figure.data[0]["name"], "0.25 Quantile");
        assert_eq!(figure.data[0]["opacity"], 0.7);
        assert_eq!(figure.data[0]["x"], json!([20, 30]));
        assert_eq!(figure.data[1]["marker"]["color"], RED);
        assert_eq!(figure.data[1]["marker"]["size"], 8);
        assert_eq!(figure.layout["height"], 600);
    }

    #[test]
    fn test_histogram_figure_overlays() {
        let figure = ChartPlotter::histogram_figure(&[40.0, 50.0], &[20.0]);
        assert_eq!(figure.layout["barmode"], "overlay");
        assert_eq!(figure.data[0]["name"], "Over $50K");
        assert_eq!(figure.data[0]["marker"]["color"], RED);
        assert_eq!(figure.data[1]["marker"]["color"], BLUE);
        assert_eq!(figure.data[1]["xbins"]["size"], 3.0);
        assert_eq!(figure.data[1]["histnorm"], "probability");
    }

    #[test]
    fn test_choropleth_figure() {
        let counts = vec![("Cuba".to_string(), 3), ("India".to_string(), 7)];
        let figure = ChartPlotter::choropleth_figure(&counts);
        assert_eq!(figure.data[0]["locations"], json!(["Cuba", "India"]));
        assert_eq!(figure.data[0]["z"], json!([3, 7]));
        assert_eq!(figure.layout["geo"]["projection"]["type"], "Mercator");

        let encoded = figure.to_json().unwrap();
        assert!(encoded.starts_with("{\"data\":["));
    }
}
