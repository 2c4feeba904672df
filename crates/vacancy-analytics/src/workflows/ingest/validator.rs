use super::domain::NormalizedVacancy;
use super::frequency::CurrencyFrequency;
use super::parser::{HeaderIndex, RawVacancyRow, VacancyField};
use super::salary::{convert, parse_bound, round_salary};
use crate::workflows::currency::{month_key, ExchangeRateTable};
use crate::workflows::source::char_prefix;

/// Why a row did not become a vacancy. Variants follow evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rejection {
    /// The row is not valid UTF-8.
    Malformed,
    LengthMismatch,
    MissingCurrency,
    RareCurrency,
    MissingSalary,
    MissingRate,
}

impl Rejection {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Malformed => "malformed row",
            Self::LengthMismatch => "length mismatch",
            Self::MissingCurrency => "missing currency",
            Self::RareCurrency => "rare currency",
            Self::MissingSalary => "missing salary",
            Self::MissingRate => "missing rate",
        }
    }
}

/// Applies the acceptance rules to raw rows of one input file.
#[derive(Debug, Clone, Copy)]
pub struct RowValidator<'a> {
    index: &'a HeaderIndex,
    frequency: &'a CurrencyFrequency,
    rates: &'a ExchangeRateTable,
    min_currency_count: usize,
}

impl<'a> RowValidator<'a> {
    pub fn new(
        index: &'a HeaderIndex,
        frequency: &'a CurrencyFrequency,
        rates: &'a ExchangeRateTable,
        min_currency_count: usize,
    ) -> Self {
        Self {
            index,
            frequency,
            rates,
            min_currency_count,
        }
    }

    pub fn normalize(&self, row: &RawVacancyRow) -> Result<NormalizedVacancy, Rejection> {
        if !self.index.matches_width(row) {
            return Err(Rejection::LengthMismatch);
        }

        let field = |field: VacancyField| self.index.get(row, field).unwrap_or_default();

        let currency = field(VacancyField::SalaryCurrency);
        if currency.is_empty() {
            return Err(Rejection::MissingCurrency);
        }

        if self.frequency.count(currency) <= self.min_currency_count {
            return Err(Rejection::RareCurrency);
        }

        let salary_from = parse_bound(field(VacancyField::SalaryFrom));
        let salary_to = parse_bound(field(VacancyField::SalaryTo));
        if salary_from.is_none() && salary_to.is_none() {
            return Err(Rejection::MissingSalary);
        }

        let published_at = field(VacancyField::PublishedAt);
        let rate = self
            .rates
            .lookup(month_key(published_at), currency)
            .ok_or(Rejection::MissingRate)?;

        let salary = convert(salary_from, salary_to, rate).ok_or(Rejection::MissingSalary)?;

        Ok(NormalizedVacancy {
            name: field(VacancyField::Name).to_string(),
            salary: round_salary(salary),
            area_name: field(VacancyField::AreaName).to_string(),
            published_at: char_prefix(published_at, 10).to_string(),
        })
    }
}
