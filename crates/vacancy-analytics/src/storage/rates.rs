use super::{open_connection, quote_identifier, StoreError};
use crate::workflows::currency::{parse_rate, ExchangeRateTable, MONTH_COLUMN};
use crate::workflows::source::{raw_reader, skip_bom};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection};
use std::io::Read;
use std::path::Path;
use tracing::info;

/// The `currencies` table: a `Data` month column plus one column per code.
pub struct RateStore {
    conn: Connection,
}

impl RateStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self {
            conn: open_connection(path.as_ref())?,
        })
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Replaces the table with the contents of a wide rate CSV. Blank and
    /// unparsable cells are stored as NULL. Returns the number of months.
    pub fn import_wide_csv<R: Read>(&mut self, reader: R) -> Result<usize, StoreError> {
        let mut csv_reader = raw_reader(skip_bom(reader)?);
        let mut records = csv_reader.records();
        let header = records.next().ok_or(StoreError::EmptyRates)??;
        let codes: Vec<String> = header
            .iter()
            .skip(1)
            .map(|code| code.trim().to_string())
            .collect();

        let mut columns = vec![format!("{} TEXT", quote_identifier(MONTH_COLUMN))];
        columns.extend(
            codes
                .iter()
                .map(|code| format!("{} REAL", quote_identifier(code))),
        );
        let placeholders: Vec<String> = (1..=codes.len() + 1).map(|i| format!("?{i}")).collect();
        let insert = format!(
            "INSERT INTO currencies VALUES ({})",
            placeholders.join(", ")
        );

        let tx = self.conn.transaction()?;
        tx.execute("DROP TABLE IF EXISTS currencies", [])?;
        tx.execute(
            &format!("CREATE TABLE currencies ({})", columns.join(", ")),
            [],
        )?;

        let mut months = 0;
        {
            let mut statement = tx.prepare(&insert)?;
            for record in records {
                let record = record?;
                let month = record.get(0).unwrap_or_default().trim().to_string();
                let rates = (0..codes.len()).map(|offset| {
                    record
                        .get(offset + 1)
                        .and_then(parse_rate)
                        .map(Value::Real)
                        .unwrap_or(Value::Null)
                });
                let values = std::iter::once(Value::Text(month)).chain(rates);
                statement.execute(params_from_iter(values))?;
                months += 1;
            }
        }
        tx.commit()?;

        info!(months, currencies = codes.len(), "currency table imported");
        Ok(months)
    }

    /// Reads the table back; NULL, text and non-finite cells mean no rate.
    pub fn load(&self) -> Result<ExchangeRateTable, StoreError> {
        let mut statement = self.conn.prepare("SELECT * FROM currencies")?;
        let names: Vec<String> = statement
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut table = ExchangeRateTable::new();
        let mut rows = statement.query([])?;
        while let Some(row) = rows.next()? {
            let month = match row.get_ref(0)? {
                ValueRef::Text(text) => String::from_utf8_lossy(text).trim().to_string(),
                _ => continue,
            };

            let mut rates = Vec::with_capacity(names.len().saturating_sub(1));
            for (index, code) in names.iter().enumerate().skip(1) {
                let rate = match row.get_ref(index)? {
                    ValueRef::Real(value) => Some(value),
                    ValueRef::Integer(value) => Some(value as f64),
                    ValueRef::Text(text) => parse_rate(&String::from_utf8_lossy(text)),
                    _ => None,
                };
                rates.push((code.clone(), rate));
            }
            table.insert_month(month, rates);
        }

        info!(months = table.month_count(), "currency table loaded");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn import_then_load_preserves_rates() {
        let mut store = RateStore::in_memory().expect("store");
        let csv = "Data,RUR,USD,EUR\n2003-01,1,31.8,\n2003-02,1,31.5,34.5\n";
        let months = store.import_wide_csv(Cursor::new(csv)).expect("import");
        assert_eq!(months, 2);

        let table = store.load().expect("load");
        assert_eq!(table.lookup("2003-01", "USD"), Some(31.8));
        assert_eq!(table.lookup("2003-01", "EUR"), None);
        assert_eq!(table.lookup("2003-02", "EUR"), Some(34.5));
        assert_eq!(table.lookup("2003-02", "RUR"), Some(1.0));
    }

    #[test]
    fn reimport_replaces_previous_table() {
        let mut store = RateStore::in_memory().expect("store");
        store
            .import_wide_csv(Cursor::new("Data,RUR,USD\n2003-01,1,31.8\n"))
            .expect("first import");
        store
            .import_wide_csv(Cursor::new("Data,RUR,KZT\n2010-05,1,0.2\n"))
            .expect("second import");

        let table = store.load().expect("load");
        assert_eq!(table.month_count(), 1);
        assert_eq!(table.lookup("2010-05", "KZT"), Some(0.2));
        assert_eq!(table.lookup("2003-01", "USD"), None);
    }

    #[test]
    fn empty_csv_is_rejected() {
        let mut store = RateStore::in_memory().expect("store");
        assert!(matches!(
            store.import_wide_csv(Cursor::new("")),
            Err(StoreError::EmptyRates)
        ));
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("db").join("currencies.db");
        RateStore::open(&path)
            .expect("open")
            .import_wide_csv(Cursor::new("Data,RUR,USD\n2022-07,1,60.0\n"))
            .expect("import");

        let table = RateStore::open(&path).expect("reopen").load().expect("load");
        assert_eq!(table.lookup("2022-07", "USD"), Some(60.0));
    }
}
