use vacancy_analytics::config::PipelineConfig;
use vacancy_analytics::workflows::ingest::NormalizedVacancy;
use vacancy_analytics::workflows::report::{cities_sheet, years_sheet};
use vacancy_analytics::workflows::stats::{SalaryRecord, VacancyStatistics};

fn vacancy(name: &str, area: &str, published_at: &str, salary: f64) -> NormalizedVacancy {
    NormalizedVacancy {
        name: name.to_string(),
        salary,
        area_name: area.to_string(),
        published_at: published_at.to_string(),
    }
}

fn statistics(config: &PipelineConfig) -> VacancyStatistics {
    let vacancies = vec![
        vacancy("Программист Rust", "Москва", "2019-03-01", 100.0),
        vacancy("Аналитик", "Москва", "2019-05-01", 101.0),
        vacancy("программист", "Казань", "2021-01-10", 300.0),
        vacancy("Старший Программист", "Пермь", "2021-02-10", 500.0),
        vacancy("Курьер", "Москва", "not-a-date", 1.0),
    ];
    let records = SalaryRecord::from_vacancies(&vacancies);
    VacancyStatistics::compute(&records, "Программист", config)
}

#[test]
fn years_are_zero_filled_across_the_span() {
    let stats = statistics(&PipelineConfig::default());
    assert_eq!(stats.total, 4);

    let years: Vec<(i32, usize, i64)> = stats
        .by_year
        .iter()
        .map(|year| (year.year, year.count, year.mean_salary))
        .collect();
    assert_eq!(years, vec![(2019, 2, 100), (2020, 0, 0), (2021, 2, 400)]);

    // Matching is case-sensitive: "программист" does not count.
    let profession: Vec<usize> = stats.by_year_profession.iter().map(|y| y.count).collect();
    assert_eq!(profession, vec![1, 0, 1]);
    assert_eq!(stats.profession_total(), 2);
}

#[test]
fn areas_at_or_below_the_threshold_are_dropped() {
    let config = PipelineConfig {
        area_share_threshold: 0.25,
        ..PipelineConfig::default()
    };
    let stats = statistics(&config);

    let shares: Vec<(&str, f64)> = stats
        .area_shares
        .iter()
        .map(|area| (area.area_name.as_str(), area.share))
        .collect();
    assert_eq!(shares, vec![("Москва", 0.5)]);
}

#[test]
fn top_areas_are_ranked_and_limited() {
    let config = PipelineConfig {
        top_areas: 2,
        ..PipelineConfig::default()
    };
    let stats = statistics(&config);

    let salaries: Vec<(&str, i64)> = stats
        .area_salaries
        .iter()
        .map(|area| (area.area_name.as_str(), area.mean_salary))
        .collect();
    assert_eq!(salaries, vec![("Пермь", 500), ("Казань", 300)]);

    let shares: Vec<&str> = stats
        .area_shares
        .iter()
        .map(|area| area.area_name.as_str())
        .collect();
    assert_eq!(shares, vec!["Москва", "Казань"]);
}

#[test]
fn sheets_follow_the_statistics() {
    let stats = statistics(&PipelineConfig::default());

    let years = years_sheet(&stats);
    assert_eq!(years.headers[0], "Год");
    assert_eq!(years.rows.len(), 3);
    assert_eq!(years.rows[1][0], "2020");

    let cities = cities_sheet(&stats);
    assert_eq!(cities.headers[0], "Город");
    assert!(cities.rows.iter().any(|row| row.last().map(String::as_str) == Some("50.00%")));
}
