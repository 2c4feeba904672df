use super::{parse_rate, ExchangeRateTable, BASE_CURRENCY, MONTH_COLUMN};
use crate::workflows::source::skip_bom;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum ReshapeError {
    #[error("failed to read rate export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid rate CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// One quote of the long-form export (`Year, Month, CharCode, InRuR`).
#[derive(Debug, Deserialize)]
struct RateQuote {
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Month")]
    month: String,
    #[serde(rename = "CharCode")]
    char_code: String,
    #[serde(rename = "InRuR")]
    in_rur: String,
}

/// Wide form of the rate export: one row per month, one column per currency.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideRateTable {
    /// Currency columns, base currency first, then in first-seen order.
    pub currencies: Vec<String>,
    /// Month key to the raw cell values of that month.
    pub months: BTreeMap<String, BTreeMap<String, String>>,
}

impl WideRateTable {
    pub fn header(&self) -> Vec<&str> {
        std::iter::once(MONTH_COLUMN)
            .chain(self.currencies.iter().map(String::as_str))
            .collect()
    }

    /// Row-major cells, months ascending; unseen currencies are empty.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.months
            .iter()
            .map(|(month, cells)| {
                std::iter::once(month.clone())
                    .chain(self.currencies.iter().map(|code| {
                        if code == BASE_CURRENCY {
                            "1".to_string()
                        } else {
                            cells.get(code).cloned().unwrap_or_default()
                        }
                    }))
                    .collect()
            })
            .collect()
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(self.header())?;
        for row in self.rows() {
            csv_writer.write_record(&row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_rate_table(&self) -> ExchangeRateTable {
        let mut table = ExchangeRateTable::new();
        for (month, cells) in &self.months {
            table.insert_month(
                month.clone(),
                cells
                    .iter()
                    .map(|(code, raw)| (code.clone(), parse_rate(raw))),
            );
        }
        table
    }
}

/// Pivots the long-form export into the wide table.
pub fn reshape<R: Read>(reader: R) -> Result<WideRateTable, ReshapeError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(skip_bom(reader)?);

    let mut table = WideRateTable {
        currencies: vec![BASE_CURRENCY.to_string()],
        months: BTreeMap::new(),
    };

    for quote in csv_reader.deserialize::<RateQuote>() {
        let quote = quote?;
        let Some(month) = year_month(&quote.year, &quote.month) else {
            warn!(year = %quote.year, month = %quote.month, "skipping rate with invalid period");
            continue;
        };

        if !table.currencies.contains(&quote.char_code) {
            table.currencies.push(quote.char_code.clone());
        }

        table
            .months
            .entry(month)
            .or_default()
            .insert(quote.char_code, quote.in_rur);
    }

    Ok(table)
}

fn year_month(year: &str, month: &str) -> Option<String> {
    let year: u16 = year.trim().parse().ok()?;
    let month: u8 = month.trim().parse().ok().filter(|m| (1..=12).contains(m))?;
    Some(format!("{year:04}-{month:02}"))
}
