use crate::workflows::source::skip_bom;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Read, Write};

/// A vacancy whose salary has been converted to roubles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedVacancy {
    pub name: String,
    /// Roubles, one decimal place.
    pub salary: f64,
    pub area_name: String,
    /// Publication date, `YYYY-MM-DD`.
    pub published_at: String,
}

/// Column order of the normalized table.
pub const NORMALIZED_COLUMNS: [&str; 4] = ["name", "salary", "area_name", "published_at"];

pub fn write_normalized_csv<W: Write>(
    writer: W,
    vacancies: &[NormalizedVacancy],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(NORMALIZED_COLUMNS)?;
    for vacancy in vacancies {
        csv_writer.serialize(vacancy)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn read_normalized_csv<R: Read>(reader: R) -> Result<Vec<NormalizedVacancy>, csv::Error> {
    let mut csv_reader = csv::Reader::from_reader(skip_bom(reader)?);
    csv_reader.deserialize().collect()
}

/// True when the input holds nothing beyond an optional byte-order mark.
pub fn is_empty_csv<R: Read>(reader: R) -> io::Result<bool> {
    Ok(skip_bom(reader)?.fill_buf()?.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn header_is_written_even_without_rows() {
        let mut buffer = Vec::new();
        write_normalized_csv(&mut buffer, &[]).expect("write");
        assert_eq!(
            String::from_utf8(buffer).expect("utf8"),
            "name,salary,area_name,published_at\n"
        );
    }

    #[test]
    fn byte_order_mark_alone_counts_as_empty() {
        assert!(is_empty_csv(Cursor::new(b"")).expect("read"));
        assert!(is_empty_csv(Cursor::new(b"\xEF\xBB\xBF")).expect("read"));
        assert!(!is_empty_csv(Cursor::new(b"\xEF\xBB\xBFname\n")).expect("read"));
    }

    #[test]
    fn csv_round_trip_preserves_tuples() {
        let vacancies = vec![
            NormalizedVacancy {
                name: "Программист, Python".to_string(),
                salary: 9000.0,
                area_name: "Москва".to_string(),
                published_at: "2022-07-05".to_string(),
            },
            NormalizedVacancy {
                name: "Аналитик \"BI\"".to_string(),
                salary: 123456.7,
                area_name: "Санкт-Петербург".to_string(),
                published_at: "2019-01-31".to_string(),
            },
        ];

        let mut buffer = Vec::new();
        write_normalized_csv(&mut buffer, &vacancies).expect("write");
        let restored = read_normalized_csv(Cursor::new(buffer)).expect("read");
        assert_eq!(restored, vacancies);
    }
}
