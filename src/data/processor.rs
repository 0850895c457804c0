//! Data Processor Module
//! Column label normalization and the derived "Married" indicator.

use polars::prelude::*;
use thiserror::Error;
use tracing::info;

/// Column holding the categorical marital status after normalization.
pub const MARITAL_STATUS: &str = "Marital Status";
/// Derived boolean column.
pub const MARRIED: &str = "Married";

const MARRIED_PREFIX: &str = "Married";

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Missing column: {0}")]
    MissingColumn(String),
}

/// Does the status begin with the word "Married".
pub fn is_record_married(status: &str) -> bool {
    status.starts_with(MARRIED_PREFIX)
}

/// Replace underscores with spaces and title-case every word.
///
/// A run of letters starts with an uppercase letter and continues in
/// lowercase; any non-letter ends the run, so `over_50k` becomes `Over 50K`.
pub fn normalize_column_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_word = false;

    for ch in name.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }

    out
}

/// Handles the one-time reshaping of the loaded census table.
pub struct DataProcessor;

impl DataProcessor {
    /// Rename columns and add the "Married" column.
    pub fn normalize(df: &mut DataFrame) -> Result<(), ProcessorError> {
        Self::fix_names(df)?;
        Self::create_married_column(df)?;
        info!(columns = df.width(), "Normalized census table");
        Ok(())
    }

    /// Remove underscores from column names and put them in title case.
    pub fn fix_names(df: &mut DataFrame) -> Result<(), ProcessorError> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        for name in names {
            let normalized = normalize_column_name(&name);
            if normalized != name {
                df.rename(&name, normalized.into())?;
            }
        }

        Ok(())
    }

    /// Add a boolean "Married" column derived from "Marital Status".
    ///
    /// Fails when the status column is absent, is not text, or holds no
    /// values at all.
    pub fn create_married_column(df: &mut DataFrame) -> Result<(), ProcessorError> {
        let missing = || ProcessorError::MissingColumn(MARITAL_STATUS.to_string());

        let status = df.column(MARITAL_STATUS).map_err(|_| missing())?;
        if status.dtype() != &DataType::String || status.null_count() == status.len() {
            return Err(missing());
        }

        let married: Vec<bool> = status
            .str()?
            .into_iter()
            .map(|value| value.is_some_and(is_record_married))
            .collect();

        df.with_column(Column::new(MARRIED.into(), married))?;
        Ok(())
    }
}
