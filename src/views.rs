//! The two dashboard views, computed from a ready `AppContext`.

use crate::charts::{ChartPlotter, Figure};
use crate::context::AppContext;
use crate::data::MARRIED;
use crate::error::AppError;
use crate::report::HtmlTable;
use crate::stats::{
    country_counts, hours_by_income, mean_series, quantile_series, AggregateTable, GroupBy,
    Statistic, StatsCalculator, AGE, DEFAULT_QUANTILES, EDUCATION_NUM, HOURS_PER_WEEK, OVER_50K,
    RACE,
};
use tracing::debug;

/// Decimal places of the index page summary table.
pub const SUMMARY_DECIMALS: u32 = 3;

/// Everything the dashboard page shows.
#[derive(Debug, Clone)]
pub struct IndexView {
    pub summary_html: String,
    pub aggregate_html: String,
    pub hours_worked: Figure,
    pub histogram: Figure,
    pub choropleth: Figure,
    /// Link target of the raw-data viewer.
    pub data_page: String,
}

/// One page of the raw-data viewer plus navigation targets.
#[derive(Debug, Clone, PartialEq)]
pub struct DataView {
    pub table_html: String,
    pub page: usize,
    pub first: usize,
    pub previous: usize,
    pub next: usize,
    pub last: usize,
    pub total_rows: usize,
}

/// Married count and mean age, hours and education, grouped by income flag,
/// married flag and race.
pub fn over_50k_married_race(ctx: &AppContext) -> Result<AggregateTable, AppError> {
    let groups = GroupBy::new(ctx.census(), &[OVER_50K, MARRIED, RACE])?;
    let table = groups.aggregate(&[
        (MARRIED, &[Statistic::Count]),
        (AGE, &[Statistic::Mean]),
        (HOURS_PER_WEEK, &[Statistic::Mean]),
        (EDUCATION_NUM, &[Statistic::Mean]),
    ])?;
    Ok(table)
}

pub fn hours_worked_figure(ctx: &AppContext) -> Result<Figure, AppError> {
    let quantiles = quantile_series(ctx.census(), &DEFAULT_QUANTILES, AGE, HOURS_PER_WEEK)?;
    let mean = mean_series(ctx.census(), AGE, HOURS_PER_WEEK)?;
    Ok(ChartPlotter::hours_worked_figure(&quantiles, &mean))
}

pub fn histogram_figure(ctx: &AppContext) -> Result<Figure, AppError> {
    let (over, under) = hours_by_income(ctx.census())?;
    Ok(ChartPlotter::histogram_figure(&over, &under))
}

pub fn choropleth_figure(ctx: &AppContext) -> Result<Figure, AppError> {
    let counts = country_counts(ctx.census())?;
    Ok(ChartPlotter::choropleth_figure(&counts))
}

pub fn index_view(ctx: &AppContext) -> Result<IndexView, AppError> {
    let summary = StatsCalculator::describe(ctx.census(), SUMMARY_DECIMALS)?;
    let aggregate = over_50k_married_race(ctx)?;
    debug!(
        summary_columns = summary.summaries.len(),
        groups = aggregate.len(),
        "Computed index tables"
    );

    Ok(IndexView {
        summary_html: HtmlTable::from(&summary).to_styled_html(),
        aggregate_html: HtmlTable::from(&aggregate).to_styled_html(),
        hours_worked: hours_worked_figure(ctx)?,
        histogram: histogram_figure(ctx)?,
        choropleth: choropleth_figure(ctx)?,
        data_page: ctx.config().data_page.clone(),
    })
}

/// Page `requested` (default 1), clamped into the valid range. An empty
/// table yields an empty view with every page number set to 0.
pub fn show_data_view(ctx: &AppContext, requested: Option<i64>) -> Result<DataView, AppError> {
    let pages = ctx.pages();
    let total_rows = ctx.census().height();

    let Some(page) = pages.get_page(requested.unwrap_or(1)) else {
        return Ok(DataView {
            table_html: HtmlTable::default().to_styled_html(),
            page: 0,
            first: 0,
            previous: 0,
            next: 0,
            last: 0,
            total_rows,
        });
    };

    let last = pages.page_count();
    let first_row = (page.number - 1) * pages.page_length;
    let table = HtmlTable::from_frame(&page.frame, first_row)?;
    debug!(page = page.number, requested = ?requested, "Rendering data page");

    Ok(DataView {
        table_html: table.to_styled_html(),
        page: page.number,
        first: 1,
        previous: page.number.saturating_sub(1).max(1),
        next: (page.number + 1).min(last),
        last,
        total_rows,
    })
}
