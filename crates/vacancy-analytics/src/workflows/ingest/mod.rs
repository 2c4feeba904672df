//! Turns raw vacancy exports into rouble-denominated records.
//!
//! Import runs two passes over the source: the first builds the header index
//! and the currency histogram, the second validates and converts every row.

mod domain;
mod frequency;
mod parser;
pub mod salary;
mod validator;

pub use domain::{
    is_empty_csv, read_normalized_csv, write_normalized_csv, NormalizedVacancy,
    NORMALIZED_COLUMNS,
};
pub use frequency::CurrencyFrequency;
pub use parser::{HeaderIndex, RawVacancyRow, VacancyField};
pub use validator::{Rejection, RowValidator};

use super::currency::ExchangeRateTable;
use super::source::{open_csv, raw_reader, skip_bom};
use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read vacancy export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid vacancy CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("vacancy export has no header row")]
    EmptyInput,
    #[error("vacancy export header is not valid UTF-8")]
    InvalidHeader,
    #[error("vacancy export is missing the '{0}' column")]
    MissingColumn(&'static str),
}

/// Row counts of one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub rows_read: usize,
    pub accepted: usize,
    pub rejected: BTreeMap<Rejection, usize>,
}

impl ImportSummary {
    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    pub vacancies: Vec<NormalizedVacancy>,
    pub summary: ImportSummary,
}

pub struct VacancyImporter<'a> {
    rates: &'a ExchangeRateTable,
    min_currency_count: usize,
}

impl<'a> VacancyImporter<'a> {
    pub fn new(rates: &'a ExchangeRateTable, min_currency_count: usize) -> Self {
        Self {
            rates,
            min_currency_count,
        }
    }

    /// Streams the file twice instead of holding it in memory.
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<ImportOutcome, ImportError> {
        let path = path.as_ref();
        info!(path = %path.display(), "scanning vacancy export");
        let (index, frequency) = scan(open_csv(path)?)?;
        self.normalize(open_csv(path)?, &index, &frequency)
    }

    pub fn from_reader<R: Read>(&self, mut reader: R) -> Result<ImportOutcome, ImportError> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        let (index, frequency) = scan(skip_bom(Cursor::new(buffer.as_slice()))?)?;
        self.normalize(skip_bom(Cursor::new(buffer.as_slice()))?, &index, &frequency)
    }

    fn normalize<R: Read>(
        &self,
        reader: R,
        index: &HeaderIndex,
        frequency: &CurrencyFrequency,
    ) -> Result<ImportOutcome, ImportError> {
        let validator = RowValidator::new(index, frequency, self.rates, self.min_currency_count);
        let mut outcome = ImportOutcome::default();

        let mut csv_reader = raw_reader(reader);
        let mut records = csv_reader.byte_records();
        records.next().transpose()?;

        for (line, record) in records.enumerate() {
            let record = record?;
            outcome.summary.rows_read += 1;
            let normalized = RawVacancyRow::from_byte_record(record)
                .map_err(|_| Rejection::Malformed)
                .and_then(|row| validator.normalize(&row));
            match normalized {
                Ok(vacancy) => outcome.vacancies.push(vacancy),
                Err(reason) => {
                    debug!(row = line + 1, reason = reason.label(), "vacancy row rejected");
                    *outcome.summary.rejected.entry(reason).or_insert(0) += 1;
                }
            }
        }

        outcome.summary.accepted = outcome.vacancies.len();
        info!(
            rows = outcome.summary.rows_read,
            accepted = outcome.summary.accepted,
            rejected = outcome.summary.rejected_total(),
            "vacancy export normalized"
        );
        Ok(outcome)
    }
}

fn scan<R: Read>(reader: R) -> Result<(HeaderIndex, CurrencyFrequency), ImportError> {
    let mut csv_reader = raw_reader(reader);
    let mut records = csv_reader.byte_records();

    let header = records.next().ok_or(ImportError::EmptyInput)??;
    let header =
        RawVacancyRow::from_byte_record(header).map_err(|_| ImportError::InvalidHeader)?;
    let index = HeaderIndex::from_header(&header)?;

    // Rows that are not UTF-8 carry no readable currency; the second pass
    // rejects them.
    let mut frequency = CurrencyFrequency::default();
    for record in records {
        if let Ok(row) = RawVacancyRow::from_byte_record(record?) {
            frequency.observe(&index, &row);
        }
    }

    info!(currencies = frequency.len(), "currency histogram built");
    Ok((index, frequency))
}
