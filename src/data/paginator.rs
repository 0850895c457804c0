//! Paginator Module
//! Splits the normalized table into fixed-size pages for the raw-data view.

use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

/// Placeholder the census extract uses for unknown values.
pub const PLACEHOLDER: &str = "?";

#[derive(Error, Debug)]
pub enum PaginateError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Page length must be at least 1")]
    InvalidPageLength,
}

/// One contiguous slice of the table. `number` is 1-indexed.
#[derive(Debug, Clone)]
pub struct Page {
    pub number: usize,
    pub frame: DataFrame,
}

/// All pages of a table split at a fixed length.
#[derive(Debug, Clone)]
pub struct Pages {
    pub page_length: usize,
    pub pages: Vec<Page>,
}

impl Pages {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Clamp `requested` into `[1, page_count]` and return that page.
    /// Returns `None` only when there are no pages at all.
    pub fn get_page(&self, requested: i64) -> Option<&Page> {
        let number = self.clamp(requested)?;
        self.pages.get(number - 1)
    }

    /// The page number `requested` resolves to.
    pub fn clamp(&self, requested: i64) -> Option<usize> {
        let count = self.page_count();
        if count == 0 {
            return None;
        }
        Some(requested.clamp(1, count as i64) as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }
}

/// Builds pages from a DataFrame.
pub struct Paginator;

impl Paginator {
    /// Replace the placeholder with an empty string, then split into
    /// consecutive non-overlapping pages of at most `page_length` rows.
    pub fn paginate(df: &DataFrame, page_length: usize) -> Result<Pages, PaginateError> {
        if page_length == 0 {
            return Err(PaginateError::InvalidPageLength);
        }

        let cleaned = Self::blank_placeholders(df)?;
        let height = cleaned.height();

        let pages: Vec<Page> = (0..height)
            .step_by(page_length)
            .enumerate()
            .map(|(i, offset)| Page {
                number: i + 1,
                frame: cleaned.slice(offset as i64, page_length),
            })
            .collect();

        debug!(
            rows = height,
            page_length,
            page_count = pages.len(),
            "Paginated table"
        );

        Ok(Pages { page_length, pages })
    }

    /// Replace the `"?"` placeholder with `""` in every string column.
    pub fn blank_placeholders(df: &DataFrame) -> PolarsResult<DataFrame> {
        let blanks: Vec<Expr> = df
            .get_columns()
            .iter()
            .filter(|column| column.dtype() == &DataType::String)
            .map(|column| {
                let name = column.name().clone();
                when(col(name.clone()).eq(lit(PLACEHOLDER)))
                    .then(lit(""))
                    .otherwise(col(name.clone()))
                    .alias(name)
            })
            .collect();

        df.clone().lazy().with_columns(blanks).collect()
    }
}
