use super::domain::{premium_label, Column, Currency, Experience};
use super::ListingError;
use crate::workflows::source::char_prefix;
use csv::StringRecord;
use regex::Regex;
use std::sync::OnceLock;

/// Longest cell text shown before it is cut and marked with `...`.
pub const MAX_CELL_CHARS: usize = 100;

const LISTING_COLUMNS: [&str; 12] = [
    "name",
    "description",
    "key_skills",
    "experience_id",
    "premium",
    "employer_name",
    "salary_from",
    "salary_to",
    "salary_gross",
    "salary_currency",
    "area_name",
    "published_at",
];

static HTML_TAG: OnceLock<Regex> = OnceLock::new();
static WHITESPACE: OnceLock<Regex> = OnceLock::new();

fn html_tag() -> &'static Regex {
    HTML_TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("static html tag pattern"))
}

fn whitespace() -> &'static Regex {
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("static whitespace pattern"))
}

/// Strips markup and surrounding blanks. Multi-line text keeps its line
/// breaks without carriage returns; single-line text has whitespace runs
/// collapsed to one space.
pub fn clean_cell(raw: &str) -> String {
    let stripped = html_tag().replace_all(raw, "");
    let trimmed = stripped.trim();
    if trimmed.contains('\n') {
        trimmed.replace('\r', "")
    } else {
        whitespace().replace_all(trimmed, " ").into_owned()
    }
}

/// Cuts text of [`MAX_CELL_CHARS`] characters or more and appends `...`.
pub fn truncate_cell(value: &str) -> String {
    if value.chars().count() < MAX_CELL_CHARS {
        value.to_string()
    } else {
        format!("{}...", char_prefix(value, MAX_CELL_CHARS))
    }
}

/// Header positions of the twelve listing columns.
#[derive(Debug, Clone)]
pub(crate) struct ListingHeader {
    width: usize,
    positions: [usize; 12],
}

impl ListingHeader {
    pub(crate) fn from_header(header: &StringRecord) -> Result<Self, ListingError> {
        let mut positions = [0; 12];
        for (slot, column) in LISTING_COLUMNS.into_iter().enumerate() {
            positions[slot] = header
                .iter()
                .position(|name| name.trim_start_matches('\u{feff}') == column)
                .ok_or(ListingError::MissingColumn(column))?;
        }
        Ok(Self {
            width: header.len(),
            positions,
        })
    }

    /// Builds a vacancy from a raw row. Rows with a different width, any
    /// empty field or unreadable salary bounds yield `None`.
    pub(crate) fn vacancy(&self, row: &StringRecord) -> Option<ListingVacancy> {
        if row.len() != self.width || row.iter().any(str::is_empty) {
            return None;
        }

        let field = |slot: usize| clean_cell(&row[self.positions[slot]]);

        let key_skills = field(2);
        let experience_id = field(3);
        let premium = field(4);
        let salary_currency = field(9);
        let published_at = field(11);

        Some(ListingVacancy {
            name: field(0),
            description: field(1),
            skills: key_skills.split('\n').map(str::to_string).collect(),
            key_skills,
            experience: Experience::from_code(&experience_id),
            experience_id,
            premium_label: premium_label(&premium).map(str::to_string),
            premium,
            employer_name: field(5),
            salary_from: parse_floor(&field(6))?,
            salary_to: parse_floor(&field(7))?,
            salary_gross: field(8) == "True",
            currency: Currency::from_code(&salary_currency),
            salary_currency,
            area_name: field(10),
            published_date: display_date(&published_at),
            published_at,
        })
    }
}

fn parse_floor(raw: &str) -> Option<i64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .map(f64::floor)
        .filter(|value| (i64::MIN as f64..i64::MAX as f64).contains(value))
        .map(|value| value as i64)
}

/// `2022-07-05T18:19:30+0300` becomes `05.07.2022`.
fn display_date(published_at: &str) -> String {
    let date = published_at.split('T').next().unwrap_or_default();
    let parts: Vec<&str> = date.split('-').collect();
    match parts.as_slice() {
        [year, month, day] => format!("{day}.{month}.{year}"),
        _ => date.to_string(),
    }
}

/// One cleaned row of the full vacancy export.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingVacancy {
    pub name: String,
    pub description: String,
    pub key_skills: String,
    pub skills: Vec<String>,
    pub experience_id: String,
    pub experience: Option<Experience>,
    pub premium: String,
    pub premium_label: Option<String>,
    pub employer_name: String,
    pub salary_from: i64,
    pub salary_to: i64,
    pub salary_gross: bool,
    pub salary_currency: String,
    pub currency: Option<Currency>,
    pub area_name: String,
    pub published_at: String,
    /// `DD.MM.YYYY`.
    pub published_date: String,
}

impl ListingVacancy {
    /// Unknown codes are shown as they appear in the file.
    pub fn experience_label(&self) -> &str {
        match self.experience {
            Some(experience) => experience.label(),
            None => &self.experience_id,
        }
    }

    pub fn premium_text(&self) -> &str {
        self.premium_label.as_deref().unwrap_or(&self.premium)
    }

    pub fn currency_label(&self) -> &str {
        match self.currency {
            Some(currency) => currency.label(),
            None => &self.salary_currency,
        }
    }

    /// Midpoint of the bounds in roubles at the fixed rate; unknown
    /// currencies count as zero.
    pub fn salary_rub(&self) -> f64 {
        let midpoint = (self.salary_from as f64 + self.salary_to as f64) / 2.0;
        self.currency
            .map(|currency| currency.rub_rate() * midpoint)
            .unwrap_or(0.0)
    }

    pub fn salary_text(&self) -> String {
        let gross = if self.salary_gross {
            "Без вычета налогов"
        } else {
            "С вычетом налогов"
        };
        format!(
            "{} - {} ({}) ({})",
            group_thousands(self.salary_from),
            group_thousands(self.salary_to),
            self.currency_label(),
            gross
        )
    }

    /// Display text of `column`, already truncated. The number column is
    /// filled in by the table.
    pub fn cell(&self, column: Column) -> String {
        let value = match column {
            Column::Number => return String::new(),
            Column::Name => self.name.clone(),
            Column::Description => self.description.clone(),
            Column::Skills => self.key_skills.clone(),
            Column::Experience => self.experience_label().to_string(),
            Column::Premium => self.premium_text().to_string(),
            Column::Employer => self.employer_name.clone(),
            Column::Salary => self.salary_text(),
            Column::AreaName => self.area_name.clone(),
            Column::PublishedAt => self.published_date.clone(),
        };
        truncate_cell(&value)
    }
}

/// `1234567` becomes `1 234 567`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }
    grouped
}
