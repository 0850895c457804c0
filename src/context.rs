//! Process-wide dashboard state.
//!
//! `AppContext::initialize` is the single startup step: extract (when asked
//! or when the CSV is missing), load, normalize and split into pages. The
//! resulting context is read-only and is passed by reference to every view.

use crate::config::AppConfig;
use crate::data::{extractor, DataLoader, DataProcessor, Pages, Paginator};
use crate::error::AppError;
use polars::prelude::*;
use tracing::info;

pub struct AppContext {
    config: AppConfig,
    census: DataFrame,
    pages: Pages,
}

impl AppContext {
    pub fn initialize(config: AppConfig) -> Result<Self, AppError> {
        config.validate()?;

        let csv_path = config.csv_path();
        let sqlite_path = config.sqlite_path();
        if config.extract_on_start || (!csv_path.exists() && sqlite_path.exists()) {
            info!(database = %sqlite_path.display(), "Extracting census records");
            extractor::extract(&sqlite_path, &config.query_path(), &csv_path)?;
        }

        let census = DataLoader::load_csv(&csv_path)?;
        Self::from_frame(config, census)
    }

    /// Build a context around an already loaded, not yet normalized table.
    pub fn from_frame(config: AppConfig, mut census: DataFrame) -> Result<Self, AppError> {
        config.validate()?;
        DataProcessor::normalize(&mut census)?;
        let pages = Paginator::paginate(&census, config.page_length)?;

        info!(
            rows = census.height(),
            pages = pages.page_count(),
            page_length = config.page_length,
            "Dashboard context ready"
        );

        Ok(Self {
            config,
            census,
            pages,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The normalized census table.
    pub fn census(&self) -> &DataFrame {
        &self.census
    }

    /// Page split memoized at startup for the configured page length.
    pub fn pages(&self) -> &Pages {
        &self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MARRIED;

    #[test]
    fn test_from_frame_normalizes_and_paginates() {
        let df = DataFrame::new(vec![
            Column::new("age".into(), vec![25i64, 40, 61]),
            Column::new(
                "marital_status".into(),
                vec!["Never-married", "Married-AF-spouse", "Widowed"],
            ),
        ])
        .unwrap();
        let config = AppConfig {
            page_length: 2,
            ..AppConfig::default()
        };

        let ctx = AppContext::from_frame(config, df).unwrap();
        assert!(ctx.census().column(MARRIED).is_ok());
        assert!(ctx.census().column("Age").is_ok());
        assert_eq!(ctx.pages().page_count(), 2);
    }

    #[test]
    fn test_missing_status_column_is_fatal() {
        let df = DataFrame::new(vec![Column::new("age".into(), vec![25i64])]).unwrap();
        let result = AppContext::from_frame(AppConfig::default(), df);
        assert!(matches!(result, Err(AppError::Processor(_))));
    }
}
