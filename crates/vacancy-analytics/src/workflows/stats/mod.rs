//! Year and area statistics over normalized vacancies.

mod aggregate;

pub use aggregate::{mean_salary, AreaAggregate, YearAggregate};

use crate::config::PipelineConfig;
use crate::workflows::ingest::NormalizedVacancy;
use aggregate::{by_area, by_year, top_by};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryRecord {
    pub name: String,
    pub area_name: String,
    pub year: i32,
    pub salary_rub: f64,
}

impl SalaryRecord {
    /// `None` when the publication date is not `YYYY-MM-DD`.
    pub fn from_vacancy(vacancy: &NormalizedVacancy) -> Option<Self> {
        let date = NaiveDate::parse_from_str(&vacancy.published_at, "%Y-%m-%d").ok()?;
        Some(Self {
            name: vacancy.name.clone(),
            area_name: vacancy.area_name.clone(),
            year: date.year(),
            salary_rub: vacancy.salary,
        })
    }

    pub fn from_vacancies(vacancies: &[NormalizedVacancy]) -> Vec<Self> {
        vacancies
            .iter()
            .filter_map(|vacancy| {
                let record = Self::from_vacancy(vacancy);
                if record.is_none() {
                    warn!(
                        published_at = %vacancy.published_at,
                        "vacancy skipped: unreadable publication date"
                    );
                }
                record
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VacancyStatistics {
    pub profession: String,
    pub total: usize,
    pub by_year: Vec<YearAggregate>,
    /// Same span as `by_year`, restricted to names containing the profession.
    pub by_year_profession: Vec<YearAggregate>,
    /// Top areas by mean salary.
    pub area_salaries: Vec<AreaAggregate>,
    /// Top areas by share of all vacancies.
    pub area_shares: Vec<AreaAggregate>,
}

impl VacancyStatistics {
    pub fn compute(records: &[SalaryRecord], profession: &str, config: &PipelineConfig) -> Self {
        let span = match (
            records.iter().map(|record| record.year).min(),
            records.iter().map(|record| record.year).max(),
        ) {
            (Some(first), Some(last)) => first..=last,
            _ => {
                return Self {
                    profession: profession.to_string(),
                    ..Self::default()
                }
            }
        };

        let years = by_year(records, span.clone());
        let profession_years = by_year(
            records
                .iter()
                .filter(|record| record.name.contains(profession)),
            span,
        );

        let areas = by_area(records, config.area_share_threshold);
        let area_salaries = top_by(areas.clone(), config.top_areas, |area| {
            area.mean_salary as f64
        });
        let area_shares = top_by(areas, config.top_areas, |area| area.share);

        info!(
            total = records.len(),
            years = years.len(),
            areas = area_salaries.len(),
            "vacancy statistics computed"
        );

        Self {
            profession: profession.to_string(),
            total: records.len(),
            by_year: years,
            by_year_profession: profession_years,
            area_salaries,
            area_shares,
        }
    }

    pub fn profession_total(&self) -> usize {
        self.by_year_profession.iter().map(|year| year.count).sum()
    }
}
