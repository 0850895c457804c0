//! SQL Extractor Module
//! Runs the flattening query against the SQLite database and writes the
//! result set to CSV.

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A relational source able to run a query and hand back string rows.
pub trait DataSource {
    /// Column names followed by every row, formatted as strings.
    /// NULL becomes an empty string.
    fn query(&self, sql: &str) -> Result<(Vec<String>, Vec<Vec<String>>), ExtractError>;
}

/// SQLite database file.
pub struct SqliteSource {
    conn: Connection,
}

impl SqliteSource {
    pub fn open(path: &Path) -> Result<Self, ExtractError> {
        if !path.is_file() {
            return Err(ExtractError::NotFound(path.to_path_buf()));
        }
        Ok(Self::from_connection(Connection::open(path)?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

impl DataSource for SqliteSource {
    fn query(&self, sql: &str) -> Result<(Vec<String>, Vec<Vec<String>>), ExtractError> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
        let width = columns.len();

        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Vec::with_capacity(width);
            for i in 0..width {
                record.push(format_value(row.get_ref(i)?));
            }
            records.push(record);
        }

        Ok((columns, records))
    }
}

fn format_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

/// Read a query file, stripping leading and trailing whitespace.
pub fn read_query(path: &Path) -> Result<String, ExtractError> {
    if !path.is_file() {
        return Err(ExtractError::NotFound(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?.trim().to_string())
}

/// Execute `query` against `source` and write the full result to `csv_path`.
/// Returns the number of data rows written.
pub fn write_csv_file(
    source: &dyn DataSource,
    query: &str,
    csv_path: &Path,
) -> Result<usize, ExtractError> {
    let (columns, rows) = source.query(query)?;

    let mut writer = csv::Writer::from_path(csv_path)?;
    writer.write_record(&columns)?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    info!(
        path = %csv_path.display(),
        rows = rows.len(),
        columns = columns.len(),
        "Wrote extracted CSV"
    );
    Ok(rows.len())
}

/// Open the database, run the query file and write the CSV.
pub fn extract(
    sqlite_file: &Path,
    query_file: &Path,
    csv_file: &Path,
) -> Result<usize, ExtractError> {
    let source = SqliteSource::open(sqlite_file)?;
    let query = read_query(query_file)?;
    write_csv_file(&source, &query, csv_file)
}
