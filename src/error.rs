//! Crate-level error collecting every pipeline stage.

use crate::charts::ChartError;
use crate::config::ConfigError;
use crate::data::{ExtractError, LoaderError, PaginateError, ProcessorError};
use crate::stats::StatsError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error(transparent)]
    Paginate(#[from] PaginateError),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}
