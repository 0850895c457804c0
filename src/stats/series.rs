//! Ordered x/y series and filtered subsets feeding the dashboard charts.

use super::calculator::StatsCalculator;
use super::grouping::{GroupBy, KeyValue, Statistic};
use super::{StatsError, COUNTRY, HOURS_PER_WEEK, OVER_50K};
use polars::prelude::*;
use serde::Serialize;

pub const DEFAULT_QUANTILES: [f64; 5] = [0.1, 0.25, 0.5, 0.75, 0.9];

/// Countries left out of the over-50k origin map.
const EXCLUDED_COUNTRIES: [&str; 2] = ["United-States", "?"];

/// x ascending by group key, y the statistic at that key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XySeries {
    pub x: Vec<KeyValue>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuantileSeries {
    pub quantile: f64,
    pub series: XySeries,
}

/// One series per requested quantile of `value_key`, grouped by `group_key`.
/// Quantiles interpolate linearly between neighbouring values.
pub fn quantile_series(
    df: &DataFrame,
    quantiles: &[f64],
    group_key: &str,
    value_key: &str,
) -> Result<Vec<QuantileSeries>, StatsError> {
    if let Some(&q) = quantiles.iter().find(|q| !(0.0..=1.0).contains(*q)) {
        return Err(StatsError::InvalidQuantile(q));
    }
    StatsCalculator::numeric_column(df, value_key, "quantile")?;

    let groups = GroupBy::new(df, &[group_key])?;
    let names: Vec<String> = (0..quantiles.len()).map(|i| format!("q{}", i)).collect();
    let exprs = quantiles
        .iter()
        .zip(&names)
        .map(|(&q, name)| {
            col(value_key)
                .quantile(lit(q), QuantileMethod::Linear)
                .alias(name.as_str())
        })
        .collect();
    let rows = groups.rows(&groups.agg(exprs)?, &names)?;

    let x: Vec<KeyValue> = rows.iter().map(|(key, _)| key[0].clone()).collect();
    Ok(quantiles
        .iter()
        .enumerate()
        .map(|(i, &q)| QuantileSeries {
            quantile: q,
            series: XySeries {
                x: x.clone(),
                y: rows.iter().map(|(_, values)| values[i]).collect(),
            },
        })
        .collect())
}

/// Mean of `value_key` per `group_key`, rounded to two decimals by the
/// aggregate.
pub fn mean_series(
    df: &DataFrame,
    group_key: &str,
    value_key: &str,
) -> Result<XySeries, StatsError> {
    let table = GroupBy::new(df, &[group_key])?.aggregate(&[(value_key, &[Statistic::Mean])])?;
    let (x, y) = table
        .rows
        .into_iter()
        .map(|(mut key, values)| (key.remove(0), values[0]))
        .unzip();

    Ok(XySeries { x, y })
}

/// True where the income flag is 1, 1.0 or `true`.
fn over_50k_flag() -> Expr {
    col(OVER_50K)
        .cast(DataType::Float64)
        .eq(lit(1.0))
        .fill_null(lit(false))
}

/// Non-null values of a numeric column as f64.
fn float_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, StatsError> {
    let values = df.column(name)?.cast(&DataType::Float64)?;
    Ok(values.f64()?.into_iter().flatten().collect())
}

/// Hours worked per week split into (over 50k, under 50k).
pub fn hours_by_income(df: &DataFrame) -> Result<(Vec<f64>, Vec<f64>), StatsError> {
    StatsCalculator::column(df, OVER_50K)?;
    StatsCalculator::numeric_column(df, HOURS_PER_WEEK, "histogram")?;

    let hours = df
        .clone()
        .lazy()
        .select([over_50k_flag().alias("over"), col(HOURS_PER_WEEK)]);
    let over = hours.clone().filter(col("over")).collect()?;
    let under = hours.filter(col("over").not()).collect()?;

    Ok((
        float_values(&over, HOURS_PER_WEEK)?,
        float_values(&under, HOURS_PER_WEEK)?,
    ))
}

/// Count of over-50k respondents by home country, US and unknown excluded,
/// sorted by country name.
pub fn country_counts(df: &DataFrame) -> Result<Vec<(String, usize)>, StatsError> {
    StatsCalculator::column(df, OVER_50K)?;
    let country = StatsCalculator::column(df, COUNTRY)?;
    if country.dtype() != &DataType::String {
        return Ok(Vec::new());
    }

    let listed = EXCLUDED_COUNTRIES
        .iter()
        .fold(col(COUNTRY).neq(lit("")), |acc, excluded| {
            acc.and(col(COUNTRY).neq(lit(*excluded)))
        });
    let counts = df
        .clone()
        .lazy()
        .filter(over_50k_flag().and(col(COUNTRY).is_not_null()).and(listed))
        .group_by([col(COUNTRY)])
        .agg([len().alias("count")])
        .sort_by_exprs([col(COUNTRY)], SortMultipleOptions::default())
        .collect()?;

    let names = counts.column(COUNTRY)?.str()?;
    let totals = counts.column("count")?.cast(&DataType::UInt64)?;
    Ok(names
        .into_iter()
        .zip(totals.u64()?)
        .filter_map(|(name, total)| Some((name?.to_string(), total? as usize)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::AGE;

    fn ages_and_hours() -> DataFrame {
        DataFrame::new(vec![
            Column::new(AGE.into(), vec![20i64, 20, 30, 30]),
            Column::new(HOURS_PER_WEEK.into(), vec![40i64, 60, 50, 50]),
        ])
        .unwrap()
    }

    #[test]
    fn test_median_series() {
        let df = ages_and_hours();
        let series = quantile_series(&df, &[0.5], AGE, HOURS_PER_WEEK).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].series.x, vec![KeyValue::Int(20), KeyValue::Int(30)]);
        assert_eq!(series[0].series.y, vec![50.0, 50.0]);
    }

    #[test]
    fn test_default_quantiles_produce_one_series_each() {
        let df = ages_and_hours();
        let series = quantile_series(&df, &DEFAULT_QUANTILES, AGE, HOURS_PER_WEEK).unwrap();
        let qs: Vec<f64> = series.iter().map(|s| s.quantile).collect();
        assert_eq!(qs, DEFAULT_QUANTILES.to_vec());
        // 0.1 quantile of [40, 60] is 40 + 0.1 * 20
        assert!((series[0].series.y[0] - 42.0).abs() < 1e-9);
        assert_eq!(series[0].series.y[1], 50.0);
    }

    #[test]
    fn test_invalid_quantile() {
        let df = ages_and_hours();
        let err = quantile_series(&df, &[1.5], AGE, HOURS_PER_WEEK).unwrap_err();
        assert!(matches!(err, StatsError::InvalidQuantile(q) if q == 1.5));
    }

    #[test]
    fn test_mean_series() {
        let df = DataFrame::new(vec![
            Column::new(AGE.into(), vec![30i64, 20, 20, 20]),
            Column::new(HOURS_PER_WEEK.into(), vec![10.0f64, 40.0, 41.0, 41.0]),
        ])
        .unwrap();
        let series = mean_series(&df, AGE, HOURS_PER_WEEK).unwrap();
        assert_eq!(series.x, vec![KeyValue::Int(20), KeyValue::Int(30)]);
        assert_eq!(series.y, vec![40.67, 10.0]);
    }

    #[test]
    fn test_income_split_and_countries() {
        let df = DataFrame::new(vec![
            Column::new(OVER_50K.into(), vec![1i64, 1, 0, 1, 1]),
            Column::new(HOURS_PER_WEEK.into(), vec![50i64, 45, 20, 60, 40]),
            Column::new(
                COUNTRY.into(),
                vec!["India", "United-States", "India", "?", "Cuba"],
            ),
        ])
        .unwrap();

        let (over, under) = hours_by_income(&df).unwrap();
        assert_eq!(over, vec![50.0, 45.0, 60.0, 40.0]);
        assert_eq!(under, vec![20.0]);

        let counts = country_counts(&df).unwrap();
        assert_eq!(counts, vec![("Cuba".to_string(), 1), ("India".to_string(), 1)]);
    }

    #[test]
    fn test_country_counts_with_boolean_flag_and_missing_countries() {
        let df = DataFrame::new(vec![
            Column::new(OVER_50K.into(), vec![true, true, true, false, true]),
            Column::new(
                COUNTRY.into(),
                vec![Some("Cuba"), None, Some(""), Some("Cuba"), Some("Cuba")],
            ),
        ])
        .unwrap();
        let counts = country_counts(&df).unwrap();
        assert_eq!(counts, vec![("Cuba".to_string(), 2)]);
    }

    #[test]
    fn test_quantile_over_text_is_invalid() {
        let df = DataFrame::new(vec![
            Column::new(AGE.into(), vec![20i64]),
            Column::new(COUNTRY.into(), vec!["Cuba"]),
        ])
        .unwrap();
        let err = quantile_series(&df, &[0.5], AGE, COUNTRY).unwrap_err();
        assert!(matches!(
            err,
            StatsError::InvalidAggregation { ref column, .. } if column == COUNTRY
        ));
    }
}
