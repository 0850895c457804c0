//! Census Dashboard - command-line entry point
//!
//! Renders the dashboard and raw-data pages as HTML, runs the SQL extract,
//! or exports static SVG charts.

use anyhow::{Context, Result};
use census_dashboard::charts::StaticChartRenderer;
use census_dashboard::data::extractor;
use census_dashboard::report::{render_data_page, render_index_page};
use census_dashboard::stats::{
    hours_by_income, mean_series, quantile_series, AGE, DEFAULT_QUANTILES, HOURS_PER_WEEK,
};
use census_dashboard::{views, AppConfig, AppContext};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "census_dashboard", version, about = "Census income dashboard")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the database, query and CSV files
    #[arg(long, global = true)]
    resource_dir: Option<PathBuf>,

    /// Rows per raw-data page
    #[arg(long, global = true)]
    page_length: Option<usize>,

    /// Re-run the SQL extraction before loading the CSV
    #[arg(long, global = true)]
    extract: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Query the SQLite database and write the flattened CSV
    Extract,
    /// Render the dashboard page
    Index {
        #[arg(long)]
        out: Option<PathBuf>,
        /// Open the written file in the default application
        #[arg(long, requires = "out")]
        open: bool,
    },
    /// Render one page of the raw data
    ShowData {
        #[arg(long, allow_negative_numbers = true)]
        page: Option<i64>,
        /// Output file; the dashboard links to the configured `data_page`
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, requires = "out")]
        open: bool,
    },
    /// Write static SVG versions of the hours-worked and histogram charts
    ExportCharts {
        #[arg(long)]
        out_dir: PathBuf,
    },
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };

    if let Some(dir) = &cli.resource_dir {
        config.resource_dir = dir.clone();
    }
    if let Some(page_length) = cli.page_length {
        config.page_length = page_length;
    }
    if cli.extract {
        config.extract_on_start = true;
    }

    config.validate()?;
    Ok(config)
}

fn emit(html: &str, out: Option<&Path>, open: bool) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, html).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), bytes = html.len(), "Wrote page");
            if open {
                if let Err(e) = open::that(path) {
                    warn!(error = %e, "Could not open page");
                }
            }
        }
        None => println!("{}", html),
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Command::Extract => {
            let rows = extractor::extract(
                &config.sqlite_path(),
                &config.query_path(),
                &config.csv_path(),
            )
            .context("extracting census records")?;
            info!(rows, "Extraction complete");
        }
        Command::Index { out, open } => {
            let ctx = AppContext::initialize(config).context("initializing dashboard")?;
            let view = views::index_view(&ctx)?;
            let html = render_index_page(&ctx.config().title, &view)?;
            emit(&html, out.as_deref(), open)?;
        }
        Command::ShowData { page, out, open } => {
            let ctx = AppContext::initialize(config).context("initializing dashboard")?;
            let view = views::show_data_view(&ctx, page)?;
            let html = render_data_page(&ctx.config().title, &view);
            emit(&html, out.as_deref(), open)?;
        }
        Command::ExportCharts { out_dir } => {
            let ctx = AppContext::initialize(config).context("initializing dashboard")?;
            fs::create_dir_all(&out_dir)
                .with_context(|| format!("creating {}", out_dir.display()))?;

            let quantiles = quantile_series(ctx.census(), &DEFAULT_QUANTILES, AGE, HOURS_PER_WEEK)?;
            let mean = mean_series(ctx.census(), AGE, HOURS_PER_WEEK)?;
            let hours_path = out_dir.join("hours_worked.svg");
            StaticChartRenderer::render_hours_worked_svg(&hours_path, &quantiles, &mean)?;

            let (over, under) = hours_by_income(ctx.census())?;
            let histogram_path = out_dir.join("histogram_hours_worked.svg");
            StaticChartRenderer::render_histogram_svg(&histogram_path, &over, &under)?;

            info!(dir = %out_dir.display(), "Exported static charts");
        }
    }

    Ok(())
}
