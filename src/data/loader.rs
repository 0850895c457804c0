//! CSV Data Loader Module
//! Reads the flattened census CSV into a Polars DataFrame.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("CSV file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file, trimming every cell and inferring numeric types
    /// from the whole trimmed column.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame, LoaderError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        // Read everything as text; types are decided after trimming.
        let mut df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;
        df.as_single_chunk_par();

        let df = Self::clean_frame(df)?;
        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "Loaded CSV"
        );
        Ok(df)
    }

    /// Trim whitespace in string columns. Columns whose trimmed values all
    /// parse as integers (or floats) are converted to that type.
    pub fn clean_frame(df: DataFrame) -> PolarsResult<DataFrame> {
        let trims: Vec<Expr> = df
            .get_columns()
            .iter()
            .filter(|column| column.dtype() == &DataType::String)
            .map(|column| col(column.name().clone()).str().strip_chars(lit(NULL)))
            .collect();
        let trimmed = df.lazy().with_columns(trims).collect()?;

        let columns = trimmed
            .get_columns()
            .iter()
            .map(|column| match column.dtype() {
                DataType::String => Self::infer_numeric(column),
                _ => Ok(column.clone()),
            })
            .collect::<PolarsResult<Vec<Column>>>()?;

        DataFrame::new(columns)
    }

    fn infer_numeric(column: &Column) -> PolarsResult<Column> {
        // An all-null column carries no type evidence; keep it as text.
        if column.null_count() == column.len() {
            return Ok(column.clone());
        }

        // Unparseable values cast to null; the type holds only if none did.
        let nulls = column.null_count();
        for dtype in [DataType::Int64, DataType::Float64] {
            let cast = column.cast(&dtype)?;
            if cast.null_count() == nulls {
                debug!(column = %column.name(), ?dtype, "Inferred numeric column");
                return Ok(cast);
            }
        }

        Ok(column.clone())
    }
}
