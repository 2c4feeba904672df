//! Console table over the full vacancy export: filter, sort, window and
//! project columns chosen by the user.

pub mod domain;
mod query;
mod table;
mod vacancy;

pub use domain::{premium_label, Column, Currency, Experience, ListingField};
pub use query::{parse_columns, parse_reverse, Filter, ListingQuery, QueryError, RowRange, SortKey};
pub use table::{render_grid, render_listing, MAX_COLUMN_WIDTH};
pub use vacancy::{clean_cell, group_thousands, truncate_cell, ListingVacancy, MAX_CELL_CHARS};

use super::source::{open_csv, raw_reader};
use std::fmt;
use std::io::Read;
use std::path::Path;
use tracing::info;
use vacancy::ListingHeader;

/// Problems with the listing file that are reported to the user as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    EmptyFile,
    NoData,
    NothingFound,
}

impl InputError {
    pub const fn message(self) -> &'static str {
        match self {
            Self::EmptyFile => "Пустой файл",
            Self::NoData => "Нет данных",
            Self::NothingFound => "Ничего не найдено",
        }
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for InputError {}

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("failed to read listing file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid listing CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("listing file is missing the '{0}' column")]
    MissingColumn(&'static str),
    #[error("{0}")]
    Input(#[from] InputError),
    #[error("{0}")]
    Query(#[from] QueryError),
}

impl ListingError {
    /// Message for the console when the failure is the user's to fix.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::Input(err) => Some(err.message()),
            Self::Query(err) => Some(err.message()),
            _ => None,
        }
    }
}

pub fn load_listing<P: AsRef<Path>>(path: P) -> Result<Vec<ListingVacancy>, ListingError> {
    let path = path.as_ref();
    let vacancies = read_listing(open_csv(path)?)?;
    info!(path = %path.display(), vacancies = vacancies.len(), "listing file loaded");
    Ok(vacancies)
}

/// Reads cleaned vacancies; a missing header or a header without rows are
/// input errors.
pub fn read_listing<R: Read>(reader: R) -> Result<Vec<ListingVacancy>, ListingError> {
    let mut csv_reader = raw_reader(reader);
    let mut records = csv_reader.records();

    let header = records.next().ok_or(InputError::EmptyFile)??;
    let mut rows = records.peekable();
    if rows.peek().is_none() {
        return Err(InputError::NoData.into());
    }

    let header = ListingHeader::from_header(&header)?;
    let mut vacancies = Vec::new();
    for record in rows {
        if let Some(vacancy) = header.vacancy(&record?) {
            vacancies.push(vacancy);
        }
    }
    Ok(vacancies)
}

/// Applies `query` and renders the table, or reports that nothing matched.
pub fn render(vacancies: &[ListingVacancy], query: &ListingQuery) -> Result<String, InputError> {
    let selected = query.select(vacancies);
    if selected.is_empty() {
        return Err(InputError::NothingFound);
    }
    Ok(render_listing(&selected, query.range, &query.columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "name,description,key_skills,experience_id,premium,employer_name,\
salary_from,salary_to,salary_gross,salary_currency,area_name,published_at\n";

    fn listing(rows: &str) -> Vec<ListingVacancy> {
        read_listing(Cursor::new(format!("{HEADER}{rows}"))).expect("listing")
    }

    #[test]
    fn empty_and_header_only_files_are_input_errors() {
        assert!(matches!(
            read_listing(Cursor::new("")),
            Err(ListingError::Input(InputError::EmptyFile))
        ));
        assert!(matches!(
            read_listing(Cursor::new(HEADER)),
            Err(ListingError::Input(InputError::NoData))
        ));
    }

    #[test]
    fn rows_with_blank_fields_are_skipped() {
        let vacancies = listing(
            "a,d,Python,noExperience,False,E,100,200,True,RUR,Москва,2022-07-05T10:00:00+0300\n\
b,d,,noExperience,False,E,100,200,True,RUR,Москва,2022-07-05T10:00:00+0300\n",
        );
        assert_eq!(vacancies.len(), 1);
        assert_eq!(vacancies[0].name, "a");
    }

    #[test]
    fn nothing_found_when_filter_rejects_all() {
        let vacancies = listing(
            "a,d,Python,noExperience,False,E,100,200,True,RUR,Москва,2022-07-05T10:00:00+0300\n",
        );
        let query = ListingQuery::parse("Название региона: Казань", "", "", "", "").expect("query");
        assert_eq!(render(&vacancies, &query), Err(InputError::NothingFound));
    }

    #[test]
    fn user_messages_cover_input_and_query_errors() {
        assert_eq!(
            ListingError::from(QueryError::UnknownSort).user_message(),
            Some("Параметр сортировки некорректен")
        );
        assert_eq!(
            ListingError::from(InputError::NoData).user_message(),
            Some("Нет данных")
        );
        assert_eq!(ListingError::MissingColumn("name").user_message(), None);
    }
}
