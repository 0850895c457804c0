//! Statistics Calculator Module
//! Descriptive statistics over the numeric columns of the census table.

use super::StatsError;
use polars::prelude::*;
use rayon::prelude::*;
use statrs::statistics::Statistics;

/// Row labels of a describe table, in display order.
pub const DESCRIBE_ROWS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Summary of a single numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    /// Values in `DESCRIBE_ROWS` order.
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.q50,
            self.q75,
            self.max,
        ]
    }

    fn rounded(mut self, decimals: u32) -> Self {
        self.mean = round_decimals(self.mean, decimals);
        self.std = round_decimals(self.std, decimals);
        self.min = round_decimals(self.min, decimals);
        self.q25 = round_decimals(self.q25, decimals);
        self.q50 = round_decimals(self.q50, decimals);
        self.q75 = round_decimals(self.q75, decimals);
        self.max = round_decimals(self.max, decimals);
        self
    }
}

/// Result of `describe`: one summary per numeric column, in table order.
#[derive(Debug, Clone)]
pub struct DescribeTable {
    pub decimals: u32,
    pub summaries: Vec<ColumnSummary>,
}

/// Round half away from zero to `decimals` places. Non-finite values pass
/// through unchanged.
pub fn round_decimals(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Integer and float columns. Booleans and strings are excluded.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    pub fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, StatsError> {
        df.column(name)
            .map_err(|_| StatsError::MissingColumn(name.to_string()))
    }

    /// The named column, which must hold integers or floats.
    ///
    /// `statistic` names what the caller intends to compute, for the error.
    pub fn numeric_column<'a>(
        df: &'a DataFrame,
        name: &str,
        statistic: &str,
    ) -> Result<&'a Column, StatsError> {
        let column = Self::column(df, name)?;
        if !is_numeric_dtype(column.dtype()) {
            return Err(StatsError::InvalidAggregation {
                column: name.to_string(),
                statistic: statistic.to_string(),
            });
        }
        Ok(column)
    }

    /// Values of a numeric column as f64 with nulls preserved.
    pub fn numeric_values(
        df: &DataFrame,
        name: &str,
        statistic: &str,
    ) -> Result<Vec<Option<f64>>, StatsError> {
        let values = Self::numeric_column(df, name, statistic)?.cast(&DataType::Float64)?;
        Ok(values.f64()?.into_iter().collect())
    }

    /// count, mean, std, min, quartiles and max for every numeric column,
    /// rounded to `decimals` places.
    pub fn describe(df: &DataFrame, decimals: u32) -> Result<DescribeTable, StatsError> {
        let names: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .map(|col| col.name().to_string())
            .collect();

        // Use rayon for parallel computation
        let summaries = names
            .par_iter()
            .map(|name| -> Result<ColumnSummary, StatsError> {
                let values: Vec<f64> = Self::numeric_values(df, name, "describe")?
                    .into_iter()
                    .flatten()
                    .filter(|v| !v.is_nan())
                    .collect();
                let mut summary = Self::compute_descriptive_stats(&values);
                summary.column = name.clone();
                Ok(summary.rounded(decimals))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DescribeTable {
            decimals,
            summaries,
        })
    }

    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> ColumnSummary {
        let n = values.len();
        if n == 0 {
            return ColumnSummary {
                column: String::new(),
                count: 0,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                q25: f64::NAN,
                q50: f64::NAN,
                q75: f64::NAN,
                max: f64::NAN,
            };
        }

        let sorted = Self::sorted(values);

        ColumnSummary {
            column: String::new(),
            count: n,
            mean: values.iter().mean(),
            // Sample standard deviation; NaN for a single value.
            std: values.iter().std_dev(),
            min: sorted[0],
            q25: Self::quantile(&sorted, 0.25),
            q50: Self::quantile(&sorted, 0.5),
            q75: Self::quantile(&sorted, 0.75),
            max: sorted[n - 1],
        }
    }

    pub fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        sorted
    }

    /// Quantile `q` in [0, 1] using linear interpolation (NumPy compatible).
    pub fn quantile(sorted_values: &[f64], q: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = q * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_decimals() {
        assert_eq!(round_decimals(3.14159, 3), 3.142);
        assert_eq!(round_decimals(2.5, 0), 3.0);
        assert_eq!(round_decimals(-2.5, 0), -3.0);
        assert_eq!(round_decimals(38.58164, 2), 38.58);
        assert!(round_decimals(f64::NAN, 3).is_nan());
    }

    #[test]
    fn test_quantile_linear_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(StatsCalculator::quantile(&sorted, 0.0), 1.0);
        assert_eq!(StatsCalculator::quantile(&sorted, 0.5), 2.5);
        assert_eq!(StatsCalculator::quantile(&sorted, 0.25), 1.75);
        assert_eq!(StatsCalculator::quantile(&sorted, 1.0), 4.0);
        assert_eq!(StatsCalculator::quantile(&[7.0], 0.9), 7.0);
        assert!(StatsCalculator::quantile(&[], 0.5).is_nan());
    }

    #[test]
    fn test_describe_rounds_mean() {
        let df = DataFrame::new(vec![
            Column::new("Value".into(), vec![3.14159f64, 3.14159, 3.14159]),
            Column::new("Name".into(), vec!["a", "b", "c"]),
        ])
        .unwrap();

        let table = StatsCalculator::describe(&df, 3).unwrap();
        assert_eq!(table.summaries.len(), 1);

        let summary = &table.summaries[0];
        assert_eq!(summary.column, "Value");
        assert_eq!(summary.count, 3);
        assert_eq!(summary.mean, 3.142);
        assert_eq!(summary.std, 0.0);
        assert_eq!(summary.max, 3.142);
    }

    #[test]
    fn test_describe_quartiles_and_std() {
        let df = DataFrame::new(vec![Column::new("Age".into(), vec![20i64, 30, 40, 50])]).unwrap();
        let summary = StatsCalculator::describe(&df, 3).unwrap().summaries.remove(0);

        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, 35.0);
        assert_eq!(summary.std, 12.91);
        assert_eq!(summary.min, 20.0);
        assert_eq!(summary.q25, 27.5);
        assert_eq!(summary.q50, 35.0);
        assert_eq!(summary.q75, 42.5);
        assert_eq!(summary.max, 50.0);
    }

    #[test]
    fn test_describe_skips_nulls_and_booleans() {
        let df = DataFrame::new(vec![
            Column::new("Hours".into(), vec![Some(10i64), None, Some(30)]),
            Column::new("Married".into(), vec![true, false, true]),
        ])
        .unwrap();

        let table = StatsCalculator::describe(&df, 3).unwrap();
        assert_eq!(table.summaries.len(), 1);
        assert_eq!(table.summaries[0].count, 2);
        assert_eq!(table.summaries[0].mean, 20.0);
    }

    #[test]
    fn test_numeric_values_rejects_text() {
        let df = DataFrame::new(vec![Column::new("Race".into(), vec!["White"])]).unwrap();
        let err = StatsCalculator::numeric_values(&df, "Race", "mean").unwrap_err();
        assert!(matches!(err, StatsError::InvalidAggregation { .. }));

        let err = StatsCalculator::numeric_values(&df, "Nope", "mean").unwrap_err();
        assert!(matches!(err, StatsError::MissingColumn(_)));
    }
}
