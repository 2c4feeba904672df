use std::fs;
use vacancy_analytics::config::PipelineConfig;
use vacancy_analytics::storage::{RateStore, VacancyStore};
use vacancy_analytics::workflows::currency::reshape::reshape;
use vacancy_analytics::workflows::ingest::{
    read_normalized_csv, write_normalized_csv, NormalizedVacancy, Rejection, VacancyImporter,
};
use vacancy_analytics::workflows::report::{write_document, CHART_FILE};
use vacancy_analytics::workflows::stats::{SalaryRecord, VacancyStatistics};

const RAW_RATES: &str = "Year,Month,CharCode,InRuR\n\
2021,12,USD,73.5\n\
2022,7,USD,60\n\
2022,7,EUR,61.5\n";

const VACANCIES: &str = "\u{feff}name,salary_from,salary_to,salary_currency,area_name,published_at\n\
Программист,100,200,USD,Москва,2022-07-05T18:19:30+0300\n\
Аналитик,,,USD,Казань,2022-07-06T10:00:00+0300\n\
Тестировщик,1000,,EUR,Москва,2022-08-01T09:00:00+0300\n\
Программист Java,50000,70000,RUR,Казань,2021-12-20T12:00:00+0300\n";

fn wide_rates() -> Vec<u8> {
    let table = reshape(RAW_RATES.as_bytes()).expect("rates reshape");
    let mut buffer = Vec::new();
    table.write_csv(&mut buffer).expect("wide rates written");
    buffer
}

#[test]
fn reshape_keeps_every_month_including_the_last() {
    let table = reshape(RAW_RATES.as_bytes()).expect("rates reshape");
    assert_eq!(table.header(), vec!["Data", "RUR", "USD", "EUR"]);

    let months: Vec<String> = table.rows().into_iter().map(|row| row[0].clone()).collect();
    assert_eq!(months, vec!["2021-12", "2022-07"]);
    assert_eq!(table.rows()[0][3], "");
}

#[test]
fn usd_midpoint_is_converted_with_the_month_rate() {
    let rates = reshape(RAW_RATES.as_bytes())
        .expect("rates reshape")
        .to_rate_table();
    let importer = VacancyImporter::new(&rates, 0);

    let outcome = importer
        .from_reader(VACANCIES.as_bytes())
        .expect("vacancies import");

    assert_eq!(outcome.summary.rows_read, 4);
    assert_eq!(outcome.summary.accepted, 2);
    assert_eq!(outcome.summary.rejected.get(&Rejection::MissingSalary), Some(&1));
    assert_eq!(outcome.summary.rejected.get(&Rejection::MissingRate), Some(&1));

    let usd: Vec<&NormalizedVacancy> = outcome
        .vacancies
        .iter()
        .filter(|vacancy| vacancy.name == "Программист")
        .collect();
    assert_eq!(usd.len(), 1);
    assert_eq!(usd[0].salary, 9000.0);
    assert_eq!(usd[0].published_at, "2022-07-05");
    assert_eq!(usd[0].area_name, "Москва");
}

#[test]
fn only_the_frequent_convertible_row_survives() {
    let rates = reshape(RAW_RATES.as_bytes())
        .expect("rates reshape")
        .to_rate_table();
    let export = "name,salary_from,salary_to,salary_currency,area_name,published_at\n\
Без валюты,100,200,,Москва,2022-07-01T10:00:00+0300\n\
Редкая валюта,100,200,XYZ,Москва,2022-07-02T10:00:00+0300\n\
Программист,100,200,USD,Москва,2022-07-03T10:00:00+0300\n\
Стажёр,,,USD,Москва,2022-07-04T10:00:00+0300\n";

    // USD occurs twice, above the threshold of one; XYZ occurs once.
    let outcome = VacancyImporter::new(&rates, 1)
        .from_reader(export.as_bytes())
        .expect("vacancies import");

    let rejected = &outcome.summary.rejected;
    assert_eq!(rejected.get(&Rejection::MissingCurrency), Some(&1));
    assert_eq!(rejected.get(&Rejection::RareCurrency), Some(&1));
    assert_eq!(rejected.get(&Rejection::MissingSalary), Some(&1));
    assert_eq!(rejected.get(&Rejection::MissingRate), None);

    let mut buffer = Vec::new();
    write_normalized_csv(&mut buffer, &outcome.vacancies).expect("csv written");
    let written = String::from_utf8(buffer).expect("utf8");
    assert_eq!(
        written,
        "name,salary,area_name,published_at\nПрограммист,9000.0,Москва,2022-07-03\n"
    );
}

#[test]
fn rare_currencies_are_dropped_by_the_frequency_threshold() {
    let rates = reshape(RAW_RATES.as_bytes())
        .expect("rates reshape")
        .to_rate_table();
    let outcome = VacancyImporter::new(&rates, 1)
        .from_reader(VACANCIES.as_bytes())
        .expect("vacancies import");

    // USD appears twice and survives; EUR and RUR appear once.
    assert_eq!(outcome.summary.rejected.get(&Rejection::RareCurrency), Some(&2));
    assert_eq!(outcome.vacancies.len(), 1);
}

#[test]
fn stores_rates_and_vacancies_and_reports_on_them() {
    let dir = tempfile::tempdir().expect("tempdir");

    let mut rate_store = RateStore::open(dir.path().join("db_currencies/currencies.db"))
        .expect("rate store");
    let months = rate_store
        .import_wide_csv(wide_rates().as_slice())
        .expect("rates imported");
    assert_eq!(months, 2);

    let rates = rate_store.load().expect("rates loaded");
    assert_eq!(rates.lookup("2022-07", "USD"), Some(60.0));
    assert_eq!(rates.lookup("2021-12", "RUR"), Some(1.0));
    assert_eq!(rates.lookup("2021-12", "EUR"), None);

    let outcome = VacancyImporter::new(&rates, 0)
        .from_reader(VACANCIES.as_bytes())
        .expect("vacancies import");

    let mut store = VacancyStore::open(dir.path().join("vacancies.db")).expect("vacancy store");
    assert_eq!(store.replace_all(&outcome.vacancies).expect("stored"), 2);
    assert_eq!(store.load_all().expect("loaded"), outcome.vacancies);

    let summary = store.sql_summary("Программист").expect("summary");
    let years: Vec<&str> = summary
        .count_by_year
        .iter()
        .map(|row| row.year.as_str())
        .collect();
    assert_eq!(years, vec!["2021", "2022"]);
    assert_eq!(summary.profession_count_by_year.len(), 2);

    let csv_path = dir.path().join("vacancies_normalized.csv");
    let mut buffer = Vec::new();
    write_normalized_csv(&mut buffer, &outcome.vacancies).expect("csv written");
    fs::write(&csv_path, &buffer).expect("csv saved");
    let reread = read_normalized_csv(fs::File::open(&csv_path).expect("csv opened"))
        .expect("csv read");
    assert_eq!(reread, outcome.vacancies);

    let records = SalaryRecord::from_vacancies(&reread);
    let stats = VacancyStatistics::compute(&records, "Программист", &PipelineConfig::default());
    assert_eq!(stats.total, 2);
    assert_eq!(stats.profession_total(), 2);

    let paths = write_document(&stats, &dir.path().join("report")).expect("document");
    let html = fs::read_to_string(&paths.document).expect("html");
    assert!(html.contains("Аналитика по зарплатам и городам для профессии Программист"));
    assert!(html.contains(CHART_FILE));
    assert!(fs::read_to_string(&paths.chart)
        .expect("svg")
        .starts_with("<svg"));
}
