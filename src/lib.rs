//! Census Dashboard - census income CSV analysis rendered as HTML pages
//!
//! Pipeline: SQLite extract → CSV → normalized Polars table → summary tables,
//! grouped aggregates, paginated raw data and Plotly chart payloads.

pub mod charts;
pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod report;
pub mod stats;
pub mod views;

pub use config::AppConfig;
pub use context::AppContext;
pub use error::AppError;
