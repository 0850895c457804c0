//! HTML table rendering for describe output, aggregate tables and data pages.

use crate::stats::{key_values, AggregateTable, DescribeTable, DESCRIBE_ROWS};
use polars::prelude::*;
use std::fmt::Write;

/// Swaps applied to the default table markup.
const CSS_CHANGES: [(&str, &str); 2] = [
    (
        "class=\"dataframe\"",
        "class=\"table table-sm table-striped table-hover table-bordered\"",
    ),
    ("border=\"1\"", ""),
];

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Replace the default table class and border with the dashboard styling.
pub fn change_table_css_class(html: &str) -> String {
    CSS_CHANGES
        .iter()
        .fold(html.to_string(), |acc, (old, new)| acc.replace(old, new))
}

fn format_number(value: f64, decimals: u32) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.*}", decimals as usize, value)
    }
}

#[derive(Debug, Clone, Default)]
pub struct HtmlRow {
    pub index: Vec<String>,
    pub cells: Vec<String>,
}

/// A labelled table: index columns on the left, data columns on the right.
#[derive(Debug, Clone, Default)]
pub struct HtmlTable {
    pub index_names: Vec<String>,
    pub columns: Vec<String>,
    pub rows: Vec<HtmlRow>,
}

impl HtmlTable {
    /// Default markup, one `<th>` per index level and one `<td>` per cell.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        html.push_str("<table border=\"1\" class=\"dataframe\">\n");
        html.push_str("  <thead>\n    <tr style=\"text-align: right;\">\n");
        for name in &self.index_names {
            let _ = writeln!(html, "      <th>{}</th>", escape_html(name));
        }
        for column in &self.columns {
            let _ = writeln!(html, "      <th>{}</th>", escape_html(column));
        }
        html.push_str("    </tr>\n  </thead>\n  <tbody>\n");

        for row in &self.rows {
            html.push_str("    <tr>\n");
            for label in &row.index {
                let _ = writeln!(html, "      <th>{}</th>", escape_html(label));
            }
            for cell in &row.cells {
                let _ = writeln!(html, "      <td>{}</td>", escape_html(cell));
            }
            html.push_str("    </tr>\n");
        }

        html.push_str("  </tbody>\n</table>");
        html
    }

    /// Markup with the dashboard table classes.
    pub fn to_styled_html(&self) -> String {
        change_table_css_class(&self.to_html())
    }

    /// One row per cell of `df`, indexed by absolute row number starting at
    /// `first_row`. Nulls render as empty cells.
    pub fn from_frame(df: &DataFrame, first_row: usize) -> PolarsResult<Self> {
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let values = df
            .get_columns()
            .iter()
            .map(key_values)
            .collect::<PolarsResult<Vec<_>>>()?;

        let rows = (0..df.height())
            .map(|row| HtmlRow {
                index: vec![(first_row + row).to_string()],
                cells: values
                    .iter()
                    .map(|column| column[row].as_ref().map(|v| v.to_string()).unwrap_or_default())
                    .collect(),
            })
            .collect();

        Ok(Self {
            index_names: vec![String::new()],
            columns,
            rows,
        })
    }
}

impl From<&DescribeTable> for HtmlTable {
    fn from(table: &DescribeTable) -> Self {
        let rows = DESCRIBE_ROWS
            .iter()
            .enumerate()
            .map(|(i, label)| HtmlRow {
                index: vec![label.to_string()],
                cells: table
                    .summaries
                    .iter()
                    .map(|s| format_number(s.values()[i], table.decimals))
                    .collect(),
            })
            .collect();

        Self {
            index_names: vec![String::new()],
            columns: table.summaries.iter().map(|s| s.column.clone()).collect(),
            rows,
        }
    }
}

impl From<&AggregateTable> for HtmlTable {
    fn from(table: &AggregateTable) -> Self {
        let rows = table
            .rows
            .iter()
            .map(|(key, values)| HtmlRow {
                index: key.iter().map(|k| k.to_string()).collect(),
                cells: values
                    .iter()
                    .map(|v| format_number(*v, table.decimals))
                    .collect(),
            })
            .collect();

        Self {
            index_names: table.key_names.clone(),
            columns: table
                .columns
                .iter()
                .map(|(column, statistic)| format!("{} {}", column, statistic))
                .collect(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{GroupBy, Statistic, StatsCalculator};

    #[test]
    fn test_change_table_css_class() {
        let html = "<table border=\"1\" class=\"dataframe\"></table>";
        assert_eq!(
            change_table_css_class(html),
            "<table  class=\"table table-sm table-striped table-hover table-bordered\"></table>"
        );
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
    }

    #[test]
    fn test_describe_table_html() {
        let df = DataFrame::new(vec![Column::new("Age".into(), vec![20i64, 30])]).unwrap();
        let describe = StatsCalculator::describe(&df, 3).unwrap();
        let table = HtmlTable::from(&describe);

        assert_eq!(table.columns, vec!["Age"]);
        assert_eq!(table.rows.len(), 8);
        assert_eq!(table.rows[0].index, vec!["count"]);
        assert_eq!(table.rows[0].cells, vec!["2.000"]);
        assert_eq!(table.rows[1].cells, vec!["25.000"]);

        let html = table.to_styled_html();
        assert!(html.contains("class=\"table table-sm table-striped table-hover table-bordered\""));
        assert!(!html.contains("border=\"1\""));
        assert!(html.contains("<th>25%</th>"));
    }

    #[test]
    fn test_aggregate_table_html() {
        let df = DataFrame::new(vec![
            Column::new("Race".into(), vec!["White", "Black", "White"]),
            Column::new("Age".into(), vec![30i64, 40, 35]),
        ])
        .unwrap();
        let aggregate = GroupBy::new(&df, &["Race"])
            .unwrap()
            .aggregate(&[("Age", &[Statistic::Mean])])
            .unwrap();
        let table = HtmlTable::from(&aggregate);

        assert_eq!(table.index_names, vec!["Race"]);
        assert_eq!(table.columns, vec!["Age mean"]);
        assert_eq!(table.rows[0].index, vec!["Black"]);
        assert_eq!(table.rows[0].cells, vec!["40.00"]);
        assert_eq!(table.rows[1].cells, vec!["32.50"]);
    }

    #[test]
    fn test_frame_table_indexes_from_offset() {
        let df = DataFrame::new(vec![
            Column::new("Country".into(), vec![Some("<Cuba>"), None]),
            Column::new("Married".into(), vec![true, false]),
        ])
        .unwrap();
        let table = HtmlTable::from_frame(&df, 20).unwrap();

        assert_eq!(table.rows[0].index, vec!["20"]);
        assert_eq!(table.rows[1].index, vec!["21"]);
        assert_eq!(table.rows[0].cells, vec!["<Cuba>", "True"]);
        assert_eq!(table.rows[1].cells, vec!["", "False"]);
        assert!(table.to_html().contains("<td>&lt;Cuba&gt;</td>"));
    }

    #[test]
    fn test_frame_table_float_cells_keep_decimal() {
        let df = DataFrame::new(vec![
            Column::new("Age".into(), vec![40i64]),
            Column::new("Hours Per Week".into(), vec![40.0f64]),
        ])
        .unwrap();
        let table = HtmlTable::from_frame(&df, 0).unwrap();
        assert_eq!(table.rows[0].cells, vec!["40", "40.0"]);
    }

    #[test]
    fn test_frame_table_float_cells_are_rounded_for_display() {
        let df = DataFrame::new(vec![Column::new("Ratio".into(), vec![0.1f64 + 0.2, 2.0 / 3.0])])
            .unwrap();
        let table = HtmlTable::from_frame(&df, 0).unwrap();
        assert_eq!(table.rows[0].cells, vec!["0.3"]);
        assert_eq!(table.rows[1].cells, vec!["0.666667"]);
    }
}
