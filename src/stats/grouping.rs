//! Group-by and aggregation over the census table.

use super::calculator::{is_numeric_dtype, round_decimals, StatsCalculator};
use super::StatsError;
use polars::prelude::*;
use serde::Serialize;
use std::fmt;

/// Decimal places for grouped aggregates.
const AGGREGATE_DECIMALS: u32 = 2;

/// A single cell value, as a group key or a chart axis point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum KeyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl KeyValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            KeyValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            KeyValue::Int(i) => Some(*i as f64),
            KeyValue::Float(f) => Some(*f),
            KeyValue::Text(_) => None,
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Bool(true) => write!(f, "True"),
            KeyValue::Bool(false) => write!(f, "False"),
            KeyValue::Int(i) => write!(f, "{}", i),
            KeyValue::Float(v) => f.write_str(&format_float(*v)),
            KeyValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// At most six decimals, trailing zeros dropped. Whole floats keep one
/// decimal so they read apart from integers.
fn format_float(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let fixed = format!("{:.6}", v);
    let trimmed = fixed.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{}0", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Tuple of key values, one per grouping column.
pub type GroupKey = Vec<KeyValue>;

/// Read a column as key values. Nulls stay `None`.
pub fn key_values(column: &Column) -> PolarsResult<Vec<Option<KeyValue>>> {
    let values: Vec<Option<KeyValue>> = match column.dtype() {
        DataType::Boolean => column
            .bool()?
            .into_iter()
            .map(|v| v.map(KeyValue::Bool))
            .collect(),
        DataType::String => column
            .str()?
            .into_iter()
            .map(|v| v.map(|s| KeyValue::Text(s.to_string())))
            .collect(),
        DataType::Float32 | DataType::Float64 => column
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.map(KeyValue::Float))
            .collect(),
        dtype if is_numeric_dtype(dtype) => column
            .cast(&DataType::Int64)?
            .i64()?
            .into_iter()
            .map(|v| v.map(KeyValue::Int))
            .collect(),
        _ => column
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(|v| v.map(|s| KeyValue::Text(s.to_string())))
            .collect(),
    };
    Ok(values)
}

/// Aggregation functions available to `GroupBy::aggregate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Count,
    Mean,
    Sum,
    Min,
    Max,
    Std,
}

impl Statistic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Statistic::Count => "count",
            Statistic::Mean => "mean",
            Statistic::Sum => "sum",
            Statistic::Min => "min",
            Statistic::Max => "max",
            Statistic::Std => "std",
        }
    }

    /// `count` works on any column; everything else needs numbers.
    pub fn requires_numeric(&self) -> bool {
        !matches!(self, Statistic::Count)
    }

    /// Aggregation expression over `column`. Nulls are skipped.
    fn expr(&self, column: &str) -> Expr {
        let column = col(column);
        match self {
            Statistic::Count => column.count(),
            Statistic::Mean => column.mean(),
            Statistic::Sum => column.sum(),
            Statistic::Min => column.min(),
            Statistic::Max => column.max(),
            Statistic::Std => column.std(1),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output column name of one aggregate in the grouped frame.
fn aggregate_name(column: &str, statistic: Statistic) -> String {
    format!("{} {}", column, statistic)
}

/// A table partitioned by the values of one or more key columns.
///
/// Groups come out in ascending key order. Rows with a null in any key
/// column belong to no group.
pub struct GroupBy<'a> {
    df: &'a DataFrame,
    keys: Vec<String>,
}

impl<'a> GroupBy<'a> {
    pub fn new(df: &'a DataFrame, keys: &[&str]) -> Result<Self, StatsError> {
        for key in keys {
            StatsCalculator::column(df, key)?;
        }

        Ok(Self {
            df,
            keys: keys.iter().map(|s| s.to_string()).collect(),
        })
    }

    fn key_exprs(&self) -> Vec<Expr> {
        self.keys.iter().map(|key| col(key.as_str())).collect()
    }

    /// Evaluate `exprs` once per group. The result holds the key columns
    /// followed by one column per expression, one row per group.
    pub fn agg(&self, exprs: Vec<Expr>) -> Result<DataFrame, StatsError> {
        let keys = self.key_exprs();
        let mut lf = self.df.clone().lazy();
        if let Some(keys_present) = keys
            .iter()
            .map(|key| key.clone().is_not_null())
            .reduce(|a, b| a.and(b))
        {
            lf = lf.filter(keys_present);
        }

        let grouped = lf
            .group_by(keys.clone())
            .agg(exprs)
            .sort_by_exprs(keys, SortMultipleOptions::default())
            .collect()?;
        Ok(grouped)
    }

    /// Pair each row of a frame produced by `agg` with the float values of
    /// `value_columns`. Null aggregates read as NaN.
    pub(crate) fn rows(
        &self,
        grouped: &DataFrame,
        value_columns: &[String],
    ) -> Result<Vec<(GroupKey, Vec<f64>)>, StatsError> {
        let keys = self
            .keys
            .iter()
            .map(|key| key_values(grouped.column(key)?))
            .collect::<PolarsResult<Vec<_>>>()?;
        let values = value_columns
            .iter()
            .map(|name| -> PolarsResult<Vec<Option<f64>>> {
                let floats = grouped.column(name)?.cast(&DataType::Float64)?;
                Ok(floats.f64()?.into_iter().collect())
            })
            .collect::<PolarsResult<Vec<_>>>()?;

        Ok((0..grouped.height())
            .filter_map(|row| {
                let key = keys
                    .iter()
                    .map(|column| column[row].clone())
                    .collect::<Option<GroupKey>>()?;
                let row_values = values
                    .iter()
                    .map(|column| column[row].unwrap_or(f64::NAN))
                    .collect();
                Some((key, row_values))
            })
            .collect())
    }

    /// Compute each (column, statistic) pair of `plan` per group, rounded to
    /// two decimals.
    pub fn aggregate(&self, plan: &[(&str, &[Statistic])]) -> Result<AggregateTable, StatsError> {
        let mut columns: Vec<(String, Statistic)> = Vec::new();
        let mut exprs: Vec<Expr> = Vec::new();

        for (column_name, statistics) in plan {
            for statistic in statistics.iter() {
                if statistic.requires_numeric() {
                    StatsCalculator::numeric_column(self.df, column_name, statistic.as_str())?;
                } else {
                    StatsCalculator::column(self.df, column_name)?;
                }
                exprs.push(
                    statistic
                        .expr(column_name)
                        .alias(aggregate_name(column_name, *statistic)),
                );
                columns.push((column_name.to_string(), *statistic));
            }
        }

        let grouped = self.agg(exprs)?;
        let names: Vec<String> = columns
            .iter()
            .map(|(column, statistic)| aggregate_name(column, *statistic))
            .collect();
        let rows = self
            .rows(&grouped, &names)?
            .into_iter()
            .map(|(key, values)| {
                let rounded = values
                    .into_iter()
                    .map(|v| round_decimals(v, AGGREGATE_DECIMALS))
                    .collect();
                (key, rounded)
            })
            .collect();

        Ok(AggregateTable {
            key_names: self.keys.clone(),
            columns,
            rows,
            decimals: AGGREGATE_DECIMALS,
        })
    }
}

/// Aggregate results indexed by group key.
#[derive(Debug, Clone)]
pub struct AggregateTable {
    pub key_names: Vec<String>,
    pub columns: Vec<(String, Statistic)>,
    pub rows: Vec<(GroupKey, Vec<f64>)>,
    pub decimals: u32,
}

impl AggregateTable {
    pub fn get(&self, key: &[KeyValue], column: &str, statistic: Statistic) -> Option<f64> {
        let idx = self
            .columns
            .iter()
            .position(|(c, s)| c == column && *s == statistic)?;
        self.rows
            .iter()
            .find(|(k, _)| k.as_slice() == key)
            .map(|(_, values)| values[idx])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
