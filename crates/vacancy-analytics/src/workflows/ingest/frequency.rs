use super::parser::{HeaderIndex, RawVacancyRow, VacancyField};
use std::collections::HashMap;

/// How often each currency code occurs across one input file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyFrequency {
    counts: HashMap<String, usize>,
}

impl CurrencyFrequency {
    /// Counts the currency of every row whose width matches the header.
    /// Blank codes are counted too; they are rejected later on their own rule.
    pub fn from_rows<'r, I>(index: &HeaderIndex, rows: I) -> Self
    where
        I: IntoIterator<Item = &'r RawVacancyRow>,
    {
        let mut frequency = Self::default();
        for row in rows {
            frequency.observe(index, row);
        }
        frequency
    }

    pub(crate) fn observe(&mut self, index: &HeaderIndex, row: &RawVacancyRow) {
        if !index.matches_width(row) {
            return;
        }
        if let Some(code) = index.get(row, VacancyField::SalaryCurrency) {
            *self.counts.entry(code.to_string()).or_insert(0) += 1;
        }
    }

    pub fn count(&self, code: &str) -> usize {
        self.counts.get(code).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
