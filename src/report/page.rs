//! Full HTML documents for the dashboard and the raw-data viewer.

use super::table::escape_html;
use crate::charts::{ChartError, Figure};
use crate::views::{DataView, IndexView};
use std::fmt::Write;

const BOOTSTRAP_CSS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@4.6.2/dist/css/bootstrap.min.css";
const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

fn document_head(title: &str, with_plotly: bool) -> String {
    let mut head = String::new();
    head.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    head.push_str("  <meta charset=\"utf-8\">\n");
    let _ = writeln!(head, "  <title>{}</title>", escape_html(title));
    let _ = writeln!(head, "  <link rel=\"stylesheet\" href=\"{}\">", BOOTSTRAP_CSS);
    if with_plotly {
        let _ = writeln!(head, "  <script src=\"{}\"></script>", PLOTLY_JS);
    }
    head.push_str("</head>\n<body>\n<div class=\"container-fluid\">\n");
    let _ = writeln!(head, "<h1>{}</h1>", escape_html(title));
    head
}

const DOCUMENT_TAIL: &str = "</div>\n</body>\n</html>\n";

/// A `<div>` plus the script that draws `figure` into it.
pub fn plotly_div(id: &str, figure: &Figure) -> Result<String, ChartError> {
    let json = figure.to_json()?.replace("</", "<\\/");
    Ok(format!(
        "<div id=\"{id}\"></div>\n<script>\n  (function () {{\n    var figure = {json};\n    Plotly.newPlot(\"{id}\", figure.data, figure.layout, {{\"showLink\": false}});\n  }})();\n</script>\n"
    ))
}

/// The dashboard page: summary table, grouped table and three charts.
pub fn render_index_page(title: &str, view: &IndexView) -> Result<String, ChartError> {
    let mut html = document_head(title, true);

    html.push_str("<h2>Summary Statistics</h2>\n");
    html.push_str(&view.summary_html);
    html.push_str("\n<h2>Over 50K by Married and Race</h2>\n");
    html.push_str(&view.aggregate_html);
    html.push('\n');

    for (id, figure) in [
        ("hours-worked", &view.hours_worked),
        ("histogram-hours-worked", &view.histogram),
        ("map-over-50k", &view.choropleth),
    ] {
        html.push_str(&plotly_div(id, figure)?);
    }

    let _ = writeln!(
        html,
        "<p><a href=\"{}\">Browse the raw data</a></p>",
        escape_html(&view.data_page)
    );
    html.push_str(DOCUMENT_TAIL);
    Ok(html)
}

/// One page of the raw data with first/previous/next/last links.
pub fn render_data_page(title: &str, view: &DataView) -> String {
    let mut html = document_head(title, false);

    let _ = writeln!(
        html,
        "<p>Page {} of {} ({} rows)</p>",
        view.page, view.last, view.total_rows
    );

    html.push_str("<nav><ul class=\"pagination\">\n");
    for (label, target) in [
        ("First", view.first),
        ("Previous", view.previous),
        ("Next", view.next),
        ("Last", view.last),
    ] {
        let _ = writeln!(
            html,
            "  <li class=\"page-item\"><a class=\"page-link\" href=\"?page={}\">{}</a></li>",
            target, label
        );
    }
    html.push_str("</ul></nav>\n");

    html.push_str(&view.table_html);
    html.push('\n');
    html.push_str(DOCUMENT_TAIL);
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plotly_div_escapes_script_close() {
        let figure = Figure {
            data: vec![json!({ "name": "</script>" })],
            layout: json!({}),
        };
        let div = plotly_div("chart", &figure).unwrap();
        assert!(div.starts_with("<div id=\"chart\"></div>"));
        assert!(div.contains("Plotly.newPlot(\"chart\""));
        assert!(!div.contains("\"</script>\""));
    }

    #[test]
    fn test_data_page_navigation() {
        let view = DataView {
            table_html: "<table></table>".to_string(),
            page: 2,
            first: 1,
            previous: 1,
            next: 3,
            last: 3,
            total_rows: 25,
        };
        let html = render_data_page("Census <Data>", &view);
        assert!(html.contains("<title>Census &lt;Data&gt;</title>"));
        assert!(html.contains("Page 2 of 3 (25 rows)"));
        assert!(html.contains("href=\"?page=3\">Next</a>"));
        assert!(html.contains("href=\"?page=1\">First</a>"));
        assert!(!html.contains("plotly"));
    }

    #[test]
    fn test_index_page_links_to_data_page() {
        let empty = || Figure {
            data: Vec::new(),
            layout: json!({}),
        };
        let view = IndexView {
            summary_html: "<table></table>".to_string(),
            aggregate_html: "<table></table>".to_string(),
            hours_worked: empty(),
            histogram: empty(),
            choropleth: empty(),
            data_page: "raw/show_data.html".to_string(),
        };
        let html = render_index_page("Census", &view).unwrap();
        assert!(html.contains("<a href=\"raw/show_data.html\">Browse the raw data</a>"));
        assert!(html.contains("Plotly.newPlot(\"hours-worked\""));
    }
}
