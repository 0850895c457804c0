//! Data module - extraction, CSV loading, normalization and pagination

pub mod extractor;
mod loader;
mod paginator;
mod processor;

pub use extractor::{DataSource, ExtractError, SqliteSource};
pub use loader::{DataLoader, LoaderError};
pub use paginator::{Page, Pages, PaginateError, Paginator, PLACEHOLDER};
pub use processor::{
    is_record_married, normalize_column_name, DataProcessor, ProcessorError, MARITAL_STATUS,
    MARRIED,
};
