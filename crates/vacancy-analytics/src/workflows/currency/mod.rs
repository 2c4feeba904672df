//! Monthly exchange rates used to bring every salary into roubles.

pub mod reshape;

use super::source::{char_prefix, raw_reader, skip_bom};
use std::collections::HashMap;
use std::io::Read;

/// Base currency; its rate is 1.0 for every month of the table.
pub const BASE_CURRENCY: &str = "RUR";

/// Name of the month-key column in the wide rate table.
pub const MONTH_COLUMN: &str = "Data";

/// Returns the `YYYY-MM` bucket of an ISO-like timestamp.
pub fn month_key(published_at: &str) -> &str {
    char_prefix(published_at, 7)
}

/// RUB-per-unit rates keyed by month, then by currency code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExchangeRateTable {
    months: HashMap<String, HashMap<String, f64>>,
}

impl ExchangeRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the rates of one month. Missing or non-finite rates are not
    /// stored, so they read back as unavailable.
    pub fn insert_month<I>(&mut self, month: impl Into<String>, rates: I)
    where
        I: IntoIterator<Item = (String, Option<f64>)>,
    {
        let entry = self.months.entry(month.into()).or_default();
        for (code, rate) in rates {
            match rate.filter(|value| value.is_finite()) {
                Some(value) => {
                    entry.insert(code, value);
                }
                None => {
                    entry.remove(&code);
                }
            }
        }
        entry.insert(BASE_CURRENCY.to_string(), 1.0);
    }

    pub fn lookup(&self, month_key: &str, currency: &str) -> Option<f64> {
        self.months
            .get(month_key)
            .and_then(|rates| rates.get(currency))
            .copied()
    }

    pub fn month_count(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Loads the wide CSV form: a `Data` column followed by one column per
    /// currency code.
    pub fn from_wide_csv<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut csv_reader = raw_reader(skip_bom(reader)?);
        let mut records = csv_reader.records();

        let header = match records.next() {
            Some(record) => record?,
            None => return Ok(Self::default()),
        };
        let codes: Vec<String> = header.iter().skip(1).map(|c| c.trim().to_string()).collect();

        let mut table = Self::default();
        for record in records {
            let record = record?;
            let Some(month) = record.get(0).map(str::trim).filter(|m| !m.is_empty()) else {
                continue;
            };
            let rates = codes
                .iter()
                .enumerate()
                .map(|(offset, code)| (code.clone(), record.get(offset + 1).and_then(parse_rate)));
            table.insert_month(month, rates);
        }

        Ok(table)
    }
}

pub(crate) fn parse_rate(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn lookup_reports_missing_months_codes_and_nan() {
        let mut table = ExchangeRateTable::new();
        table.insert_month(
            "2022-07",
            vec![
                ("USD".to_string(), Some(60.0)),
                ("EUR".to_string(), Some(f64::NAN)),
                ("KZT".to_string(), None),
            ],
        );

        assert_eq!(table.lookup("2022-07", "USD"), Some(60.0));
        assert_eq!(table.lookup("2022-07", "EUR"), None);
        assert_eq!(table.lookup("2022-07", "KZT"), None);
        assert_eq!(table.lookup("2022-07", "GEL"), None);
        assert_eq!(table.lookup("2022-08", "USD"), None);
    }

    #[test]
    fn base_currency_is_always_one() {
        let mut table = ExchangeRateTable::new();
        table.insert_month("2003-01", vec![("RUR".to_string(), None)]);
        assert_eq!(table.lookup("2003-01", BASE_CURRENCY), Some(1.0));
    }

    #[test]
    fn wide_csv_treats_blank_cells_as_unavailable() {
        let csv = "\u{feff}Data,RUR,USD,EUR\n2003-01,1,31.8,\n2003-02,1,nan,34.5\n";
        let table = ExchangeRateTable::from_wide_csv(Cursor::new(csv)).expect("parse");

        assert_eq!(table.month_count(), 2);
        assert_eq!(table.lookup("2003-01", "USD"), Some(31.8));
        assert_eq!(table.lookup("2003-01", "EUR"), None);
        assert_eq!(table.lookup("2003-02", "USD"), None);
        assert_eq!(table.lookup("2003-02", "EUR"), Some(34.5));
        assert_eq!(table.lookup("2003-02", "RUR"), Some(1.0));
    }

    #[test]
    fn month_key_truncates_timestamp() {
        assert_eq!(month_key("2007-12-03T17:34:36+0300"), "2007-12");
    }
}
