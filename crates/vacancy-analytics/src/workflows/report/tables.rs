use crate::workflows::stats::VacancyStatistics;
use serde::Serialize;

/// Label of the pie slice that holds every area outside the top list.
pub const OTHER_AREAS: &str = "Другие";

/// A titled grid of already formatted cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Turns parallel columns into rows. The row count follows the first column;
/// shorter columns leave empty cells behind.
pub fn transpose(columns: &[Vec<String>]) -> Vec<Vec<String>> {
    let Some(first) = columns.first() else {
        return Vec::new();
    };

    (0..first.len())
        .map(|row| {
            columns
                .iter()
                .map(|column| column.get(row).cloned().unwrap_or_default())
                .collect()
        })
        .collect()
}

/// `0.1234` becomes `"12.34%"`.
pub fn format_percent(share: f64) -> String {
    format!("{:.2}%", share * 100.0)
}

/// Appends the remainder slice when the shown shares do not cover the whole.
pub fn with_other_bucket(shares: &[(String, f64)]) -> Vec<(String, f64)> {
    let mut slices = shares.to_vec();
    let rest = 1.0 - shares.iter().map(|(_, share)| share).sum::<f64>();
    if rest > 1e-9 {
        slices.push((OTHER_AREAS.to_string(), rest));
    }
    slices
}

pub fn years_sheet(stats: &VacancyStatistics) -> Sheet {
    let profession = &stats.profession;
    let headers = vec![
        "Год".to_string(),
        "Средняя зарплата".to_string(),
        format!("Средняя зарплата - {profession}"),
        "Количество вакансий".to_string(),
        format!("Количество вакансий - {profession}"),
    ];

    let columns = vec![
        stats.by_year.iter().map(|y| y.year.to_string()).collect(),
        stats.by_year.iter().map(|y| y.mean_salary.to_string()).collect(),
        stats
            .by_year_profession
            .iter()
            .map(|y| y.mean_salary.to_string())
            .collect(),
        stats.by_year.iter().map(|y| y.count.to_string()).collect(),
        stats
            .by_year_profession
            .iter()
            .map(|y| y.count.to_string())
            .collect(),
    ];

    Sheet {
        headers,
        rows: transpose(&columns),
    }
}

pub fn cities_sheet(stats: &VacancyStatistics) -> Sheet {
    let headers = ["Город", "Уровень зарплат", " ", "Город", "Доля вакансий"]
        .into_iter()
        .map(String::from)
        .collect();

    let columns = vec![
        stats
            .area_salaries
            .iter()
            .map(|area| area.area_name.clone())
            .collect(),
        stats
            .area_salaries
            .iter()
            .map(|area| area.mean_salary.to_string())
            .collect(),
        vec![String::new(); stats.area_salaries.len()],
        stats
            .area_shares
            .iter()
            .map(|area| area.area_name.clone())
            .collect(),
        stats
            .area_shares
            .iter()
            .map(|area| format_percent(area.share))
            .collect(),
    ];

    Sheet {
        headers,
        rows: transpose(&columns),
    }
}
