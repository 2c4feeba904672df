use super::{open_connection, StoreError};
use crate::workflows::ingest::NormalizedVacancy;
use crate::workflows::listing::render_grid;
use rusqlite::{params, Connection, Params, Row};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::info;

const SALARY_BY_YEAR: &str = "
    SELECT strftime('%Y', published_at) AS year, CAST(ROUND(AVG(salary)) AS INTEGER) AS avg_salary
    FROM vacancies
    GROUP BY strftime('%Y', published_at)
    ORDER BY year";

const COUNT_BY_YEAR: &str = "
    SELECT strftime('%Y', published_at) AS year, COUNT(*) AS count
    FROM vacancies
    GROUP BY strftime('%Y', published_at)
    ORDER BY year";

const PROFESSION_SALARY_BY_YEAR: &str = "
    SELECT strftime('%Y', published_at) AS year, CAST(ROUND(AVG(salary)) AS INTEGER) AS avg_salary
    FROM vacancies
    WHERE name LIKE '%' || ?1 || '%'
    GROUP BY strftime('%Y', published_at)
    ORDER BY year";

const PROFESSION_COUNT_BY_YEAR: &str = "
    SELECT strftime('%Y', published_at) AS year, COUNT(*) AS count
    FROM vacancies
    WHERE name LIKE '%' || ?1 || '%'
    GROUP BY strftime('%Y', published_at)
    ORDER BY year";

const SALARY_BY_AREA: &str = "
    SELECT area_name, COUNT(*) AS count, CAST(ROUND(AVG(salary)) AS INTEGER) AS avg_salary
    FROM vacancies
    GROUP BY area_name
    HAVING count > (SELECT COUNT(*) FROM vacancies) / 100
    ORDER BY avg_salary DESC
    LIMIT 10";

const SHARE_BY_AREA: &str = "
    SELECT area_name, COUNT(*) AS count,
        CAST(ROUND(CAST(COUNT(*) AS REAL) / (SELECT COUNT(*) FROM vacancies) * 100, 4) AS TEXT) || '%' AS share
    FROM vacancies
    GROUP BY area_name
    HAVING count > (SELECT COUNT(*) FROM vacancies) / 100
    ORDER BY COUNT(*) DESC
    LIMIT 10";

/// The `vacancies` table of normalized records.
pub struct VacancyStore {
    conn: Connection,
}

impl VacancyStore {
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

    /// Drops and recreates the table, then inserts every record in one
    /// transaction.
    pub fn replace_all(&mut self, vacancies: &[NormalizedVacancy]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute("DROP TABLE IF EXISTS vacancies", [])?;
        tx.execute(
            "CREATE TABLE vacancies (
                name TEXT NOT NULL,
                salary REAL NOT NULL,
                area_name TEXT NOT NULL,
                published_at TEXT NOT NULL
            )",
            [],
        )?;
        {
            let mut statement = tx.prepare(
                "INSERT INTO vacancies (name, salary, area_name, published_at)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for vacancy in vacancies {
                statement.execute(params![
                    vacancy.name,
                    vacancy.salary,
                    vacancy.area_name,
                    vacancy.published_at,
                ])?;
            }
        }
        tx.commit()?;

        info!(rows = vacancies.len(), "vacancies table replaced");
        Ok(vacancies.len())
    }

    /// Every stored record in insertion order.
    pub fn load_all(&self) -> Result<Vec<NormalizedVacancy>, StoreError> {
        let mut statement = self.conn.prepare(
            "SELECT name, salary, area_name, published_at FROM vacancies ORDER BY rowid",
        )?;
        let vacancies = statement
            .query_map([], |row| {
                Ok(NormalizedVacancy {
                    name: row.get(0)?,
                    salary: row.get(1)?,
                    area_name: row.get(2)?,
                    published_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(vacancies)
    }

    /// Runs the six summary queries. `profession` is matched with `LIKE`.
    pub fn sql_summary(&self, profession: &str) -> Result<SqlSummary, StoreError> {
        Ok(SqlSummary {
            profession: profession.to_string(),
            salary_by_year: self.collect(SALARY_BY_YEAR, [], year_value)?,
            count_by_year: self.collect(COUNT_BY_YEAR, [], year_value)?,
            profession_salary_by_year: self.collect(
                PROFESSION_SALARY_BY_YEAR,
                [profession],
                year_value,
            )?,
            profession_count_by_year: self.collect(
                PROFESSION_COUNT_BY_YEAR,
                [profession],
                year_value,
            )?,
            salary_by_area: self.collect(SALARY_BY_AREA, [], |row| {
                Ok(AreaSalaryRow {
                    area_name: row.get(0)?,
                    count: row.get(1)?,
                    avg_salary: row.get(2)?,
                })
            })?,
            share_by_area: self.collect(SHARE_BY_AREA, [], |row| {
                Ok(AreaShareRow {
                    area_name: row.get(0)?,
                    count: row.get(1)?,
                    share: row.get(2)?,
                })
            })?,
        })
    }

    fn collect<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>, StoreError>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut statement = self.conn.prepare(sql)?;
        let rows = statement
            .query_map(params, map)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn year_value(row: &Row<'_>) -> rusqlite::Result<YearValue> {
    Ok(YearValue {
        year: row.get(0)?,
        value: row.get(1)?,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearValue {
    pub year: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaSalaryRow {
    pub area_name: String,
    pub count: i64,
    pub avg_salary: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaShareRow {
    pub area_name: String,
    pub count: i64,
    /// Percentage text such as `40.0%`.
    pub share: String,
}

/// Results of the six summary queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlSummary {
    pub profession: String,
    pub salary_by_year: Vec<YearValue>,
    pub count_by_year: Vec<YearValue>,
    pub profession_salary_by_year: Vec<YearValue>,
    pub profession_count_by_year: Vec<YearValue>,
    pub salary_by_area: Vec<AreaSalaryRow>,
    pub share_by_area: Vec<AreaShareRow>,
}

impl fmt::Display for SqlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let years = |rows: &[YearValue]| -> Vec<Vec<String>> {
            rows.iter()
                .map(|row| vec![row.year.clone(), row.value.to_string()])
                .collect()
        };

        let sections: [(String, Vec<&str>, Vec<Vec<String>>); 6] = [
            (
                "Динамика уровня зарплат по годам".to_string(),
                vec!["year", "avg_salary"],
                years(&self.salary_by_year),
            ),
            (
                "Динамика количества вакансий по годам".to_string(),
                vec!["year", "count"],
                years(&self.count_by_year),
            ),
            (
                format!(
                    "Динамика уровня зарплат по годам для профессии {}",
                    self.profession
                ),
                vec!["year", "avg_salary"],
                years(&self.profession_salary_by_year),
            ),
            (
                format!(
                    "Динамика количества вакансий по годам для профессии {}",
                    self.profession
                ),
                vec!["year", "count"],
                years(&self.profession_count_by_year),
            ),
            (
                "Уровень зарплат по городам".to_string(),
                vec!["area_name", "count", "avg_salary"],
                self.salary_by_area
                    .iter()
                    .map(|row| {
                        vec![
                            row.area_name.clone(),
                            row.count.to_string(),
                            row.avg_salary.to_string(),
                        ]
                    })
                    .collect(),
            ),
            (
                "Доля вакансий по городам".to_string(),
                vec!["area_name", "count", "share"],
                self.share_by_area
                    .iter()
                    .map(|row| vec![row.area_name.clone(), row.count.to_string(), row.share.clone()])
                    .collect(),
            ),
        ];

        for (title, headers, rows) in sections {
            writeln!(f, ">>> {title}")?;
            writeln!(f, "{}", render_grid(&headers, &rows, usize::MAX))?;
            writeln!(f)?;
        }
        Ok(())
    }
}
