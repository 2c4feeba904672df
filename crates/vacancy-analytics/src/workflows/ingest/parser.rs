use super::ImportError;
use csv::StringRecord;

/// A vacancy row exactly as read from the source CSV.
pub type RawVacancyRow = StringRecord;

/// Source columns the normalizer depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VacancyField {
    Name,
    SalaryFrom,
    SalaryTo,
    SalaryCurrency,
    AreaName,
    PublishedAt,
}

impl VacancyField {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Name,
            Self::SalaryFrom,
            Self::SalaryTo,
            Self::SalaryCurrency,
            Self::AreaName,
            Self::PublishedAt,
        ]
    }

    pub const fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::SalaryFrom => "salary_from",
            Self::SalaryTo => "salary_to",
            Self::SalaryCurrency => "salary_currency",
            Self::AreaName => "area_name",
            Self::PublishedAt => "published_at",
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Name => 0,
            Self::SalaryFrom => 1,
            Self::SalaryTo => 2,
            Self::SalaryCurrency => 3,
            Self::AreaName => 4,
            Self::PublishedAt => 5,
        }
    }
}

/// Maps each required field to its position in the source header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderIndex {
    width: usize,
    positions: [usize; 6],
}

impl HeaderIndex {
    pub fn from_header(header: &StringRecord) -> Result<Self, ImportError> {
        let columns: Vec<&str> = header
            .iter()
            .map(|column| column.trim_start_matches('\u{feff}').trim())
            .collect();

        let mut positions = [0usize; 6];
        for field in VacancyField::ordered() {
            positions[field.slot()] = columns
                .iter()
                .position(|column| *column == field.column())
                .ok_or(ImportError::MissingColumn(field.column()))?;
        }

        Ok(Self {
            width: columns.len(),
            positions,
        })
    }

    /// Number of columns in the header; well-formed rows have exactly this many.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn matches_width(&self, row: &RawVacancyRow) -> bool {
        row.len() == self.width
    }

    pub fn get<'r>(&self, row: &'r RawVacancyRow, field: VacancyField) -> Option<&'r str> {
        row.get(self.positions[field.slot()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locates_fields_in_any_order() {
        let header = StringRecord::from(vec![
            "\u{feff}published_at",
            "name",
            "description",
            "salary_to",
            "salary_from",
            "area_name",
            "salary_currency",
        ]);
        let index = HeaderIndex::from_header(&header).expect("index");
        assert_eq!(index.width(), 7);

        let row = StringRecord::from(vec![
            "2022-07-05T18:19:30+0300",
            "Аналитик",
            "…",
            "200",
            "100",
            "Москва",
            "RUR",
        ]);
        assert_eq!(index.get(&row, VacancyField::PublishedAt), Some("2022-07-05T18:19:30+0300"));
        assert_eq!(index.get(&row, VacancyField::SalaryFrom), Some("100"));
        assert_eq!(index.get(&row, VacancyField::SalaryCurrency), Some("RUR"));
    }

    #[test]
    fn missing_column_is_reported() {
        let header = StringRecord::from(vec!["name", "salary_from", "salary_to", "area_name"]);
        match HeaderIndex::from_header(&header) {
            Err(ImportError::MissingColumn(column)) => assert_eq!(column, "salary_currency"),
            other => panic!("expected missing column, got {other:?}"),
        }
    }
}
