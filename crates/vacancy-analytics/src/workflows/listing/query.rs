use super::domain::{Column, ListingField};
use super::vacancy::ListingVacancy;
use std::cmp::Ordering;
use std::fmt;

/// Rejected console input. `Display` yields the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryError {
    FilterFormat,
    UnknownFilter,
    UnknownSort,
    InvalidOrder,
    InvalidRange,
    InvalidColumns,
}

impl QueryError {
    pub const fn message(self) -> &'static str {
        match self {
            Self::FilterFormat => "Формат ввода некорректен",
            Self::UnknownFilter => "Параметр поиска некорректен",
            Self::UnknownSort => "Параметр сортировки некорректен",
            Self::InvalidOrder => "Порядок сортировки задан некорректно",
            Self::InvalidRange => "Диапазон вывода задан некорректно",
            Self::InvalidColumns => "Столбцы заданы некорректно",
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for QueryError {}

/// A resolved `"<label>: <value>"` filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every listed skill must be present.
    Skills(Vec<String>),
    /// The value must lie within the salary bounds.
    Salary(i64),
    Currency(String),
    Experience(String),
    Premium(String),
    /// `DD.MM.YYYY`.
    PublishedAt(String),
    Name(String),
    AreaName(String),
    Employer(String),
}

impl Filter {
    pub fn parse(raw: &str) -> Result<Option<Self>, QueryError> {
        if raw.is_empty() {
            return Ok(None);
        }

        let (label, value) = raw.split_once(": ").ok_or(QueryError::FilterFormat)?;
        let field = ListingField::from_label(label).ok_or(QueryError::UnknownFilter)?;
        let value = value.to_string();

        let filter = match field {
            ListingField::Skills => {
                Self::Skills(value.split(", ").map(str::to_string).collect())
            }
            ListingField::Salary => Self::Salary(
                value
                    .trim()
                    .parse()
                    .map_err(|_| QueryError::FilterFormat)?,
            ),
            ListingField::Currency => Self::Currency(value),
            ListingField::Experience => Self::Experience(value),
            ListingField::Premium => Self::Premium(value),
            ListingField::PublishedAt => Self::PublishedAt(value),
            ListingField::Name => Self::Name(value),
            ListingField::AreaName => Self::AreaName(value),
            ListingField::Employer => Self::Employer(value),
        };
        Ok(Some(filter))
    }

    pub fn matches(&self, vacancy: &ListingVacancy) -> bool {
        match self {
            Self::Skills(wanted) => wanted
                .iter()
                .all(|skill| vacancy.skills.iter().any(|have| have == skill)),
            Self::Salary(value) => vacancy.salary_from <= *value && *value <= vacancy.salary_to,
            Self::Currency(label) => vacancy.currency_label() == label,
            Self::Experience(label) => vacancy.experience_label() == label,
            Self::Premium(label) => vacancy.premium_text() == label,
            Self::PublishedAt(date) => vacancy.published_date == *date,
            Self::Name(name) => vacancy.name == *name,
            Self::AreaName(area) => vacancy.area_name == *area,
            Self::Employer(employer) => vacancy.employer_name == *employer,
        }
    }
}

/// Ordering key chosen by its Russian label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey(ListingField);

impl SortKey {
    pub fn parse(raw: &str) -> Result<Option<Self>, QueryError> {
        if raw.is_empty() {
            return Ok(None);
        }
        ListingField::from_label(raw)
            .map(|field| Some(Self(field)))
            .ok_or(QueryError::UnknownSort)
    }

    pub fn field(self) -> ListingField {
        self.0
    }

    pub fn compare(self, left: &ListingVacancy, right: &ListingVacancy) -> Ordering {
        match self.0 {
            ListingField::Salary => left.salary_rub().total_cmp(&right.salary_rub()),
            ListingField::Skills => left.skills.len().cmp(&right.skills.len()),
            ListingField::Experience => experience_rank(left).cmp(&experience_rank(right)),
            ListingField::PublishedAt => left.published_at.cmp(&right.published_at),
            ListingField::Premium => left.premium.cmp(&right.premium),
            ListingField::Currency => left.salary_currency.cmp(&right.salary_currency),
            ListingField::Name => left.name.cmp(&right.name),
            ListingField::AreaName => left.area_name.cmp(&right.area_name),
            ListingField::Employer => left.employer_name.cmp(&right.employer_name),
        }
    }
}

fn experience_rank(vacancy: &ListingVacancy) -> u8 {
    vacancy.experience.map_or(0, |experience| experience.rank())
}

/// `"Да"` reverses, `"Нет"` or nothing keeps ascending order.
pub fn parse_reverse(raw: &str) -> Result<bool, QueryError> {
    match raw {
        "" | "Нет" => Ok(false),
        "Да" => Ok(true),
        _ => Err(QueryError::InvalidOrder),
    }
}

/// 1-based `"start [end]"` window; both ends are included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: usize,
    pub end: Option<usize>,
}

impl Default for RowRange {
    fn default() -> Self {
        Self {
            start: 1,
            end: None,
        }
    }
}

impl RowRange {
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let mut parts = raw.split_whitespace();
        let Some(start) = parts.next() else {
            return Ok(Self::default());
        };

        let start = parse_position(start)?;
        let end = parts.next().map(parse_position).transpose()?;
        if parts.next().is_some() {
            return Err(QueryError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Index bounds into a list of `len` rows, clamped to the list.
    pub fn bounds(&self, len: usize) -> (usize, usize) {
        let start = (self.start - 1).min(len);
        let end = self.end.map_or(len, |end| end.min(len));
        (start, end.max(start))
    }
}

fn parse_position(raw: &str) -> Result<usize, QueryError> {
    match raw.parse::<usize>() {
        Ok(position) if position >= 1 => Ok(position),
        _ => Err(QueryError::InvalidRange),
    }
}

/// Columns to print, always in table order and always with `№`.
pub fn parse_columns(raw: &str) -> Result<Vec<Column>, QueryError> {
    if raw.is_empty() {
        return Ok(Column::ordered().to_vec());
    }

    let mut requested = vec![Column::Number];
    for header in raw.split(", ") {
        requested.push(Column::from_header(header).ok_or(QueryError::InvalidColumns)?);
    }

    Ok(Column::ordered()
        .into_iter()
        .filter(|column| requested.contains(column))
        .collect())
}

/// Everything the user asked of the listing, validated up front.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub filter: Option<Filter>,
    pub sort: Option<SortKey>,
    pub reverse: bool,
    pub range: RowRange,
    pub columns: Vec<Column>,
}

impl ListingQuery {
    pub fn parse(
        filter: &str,
        sort: &str,
        reverse: &str,
        range: &str,
        columns: &str,
    ) -> Result<Self, QueryError> {
        Ok(Self {
            filter: Filter::parse(filter)?,
            sort: SortKey::parse(sort)?,
            reverse: parse_reverse(reverse)?,
            range: RowRange::parse(range)?,
            columns: parse_columns(columns)?,
        })
    }

    /// Filters then stably sorts. Reversal keeps equal rows in file order.
    pub fn select<'v>(&self, vacancies: &'v [ListingVacancy]) -> Vec<&'v ListingVacancy> {
        let mut selected: Vec<&ListingVacancy> = vacancies
            .iter()
            .filter(|vacancy| {
                self.filter
                    .as_ref()
                    .map_or(true, |filter| filter.matches(vacancy))
            })
            .collect();

        if let Some(key) = self.sort {
            if self.reverse {
                selected.sort_by(|left, right| key.compare(right, left));
            } else {
                selected.sort_by(|left, right| key.compare(left, right));
            }
        }
        selected
    }
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            filter: None,
            sort: None,
            reverse: false,
            range: RowRange::default(),
            columns: Column::ordered().to_vec(),
        }
    }
}
