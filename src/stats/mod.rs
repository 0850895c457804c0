//! Statistics module - descriptive statistics, grouped aggregates and
//! chart series

mod calculator;
mod grouping;
mod series;

use polars::prelude::PolarsError;
use thiserror::Error;

pub use calculator::{
    is_numeric_dtype, round_decimals, ColumnSummary, DescribeTable, StatsCalculator,
    DESCRIBE_ROWS,
};
pub use grouping::{key_values, AggregateTable, GroupBy, GroupKey, KeyValue, Statistic};
pub use series::{
    country_counts, hours_by_income, mean_series, quantile_series, QuantileSeries, XySeries,
    DEFAULT_QUANTILES,
};

/// Normalized census column labels used by the dashboard.
pub const AGE: &str = "Age";
pub const HOURS_PER_WEEK: &str = "Hours Per Week";
pub const OVER_50K: &str = "Over 50K";
pub const EDUCATION_NUM: &str = "Education Num";
pub const RACE: &str = "Race";
pub const COUNTRY: &str = "Country";

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Missing column: {0}")]
    MissingColumn(String),
    #[error("Cannot compute {statistic} over non-numeric column '{column}'")]
    InvalidAggregation { column: String, statistic: String },
    #[error("Quantile {0} is outside [0, 1]")]
    InvalidQuantile(f64),
}
