//! SQLite persistence for the rate table and normalized vacancies.

mod rates;
mod vacancies;

pub use rates::RateStore;
pub use vacancies::{AreaSalaryRow, AreaShareRow, SqlSummary, VacancyStore, YearValue};

use rusqlite::Connection;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("failed to prepare database location: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid rate CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("rate CSV has no header row")]
    EmptyRates,
}

/// Opens `path`, creating its parent directory first.
pub(crate) fn open_connection(path: &Path) -> Result<Connection, StoreError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(Connection::open(path)?)
}

/// Double-quotes an SQL identifier such as a currency code column.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
