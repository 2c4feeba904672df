use std::io::Cursor;
use vacancy_analytics::workflows::listing::{
    read_listing, render, InputError, ListingError, ListingQuery, ListingVacancy, QueryError,
};

const EXPORT: &str = "name,description,key_skills,experience_id,premium,employer_name,\
salary_from,salary_to,salary_gross,salary_currency,area_name,published_at\n\
Программист,<p>Пишет   <b>код</b></p>,\"Git\nRust\",between1And3,False,Яндекс,100000,150000,True,RUR,Москва,2022-07-05T18:19:30+0300\n\
Аналитик,Считает,SQL,noExperience,True,Сбер,1000,2000,False,USD,Казань,2022-07-06T10:00:00+0300\n\
Тестировщик,Тестирует,Git,moreThan6,False,Тинькофф,50000,60000,True,RUR,Москва,2022-07-07T10:00:00+0300\n\
Дизайнер,,Figma,noExperience,False,Студия,1,2,True,RUR,Москва,2022-07-07T10:00:00+0300\n";

fn vacancies() -> Vec<ListingVacancy> {
    read_listing(Cursor::new(EXPORT)).expect("listing loads")
}

fn query(filter: &str, sort: &str, reverse: &str, range: &str, columns: &str) -> ListingQuery {
    ListingQuery::parse(filter, sort, reverse, range, columns).expect("query parses")
}

fn position(table: &str, needle: &str) -> usize {
    table
        .find(needle)
        .unwrap_or_else(|| panic!("{needle} missing from\n{table}"))
}

#[test]
fn rows_with_empty_fields_are_dropped_and_cells_cleaned() {
    let vacancies = vacancies();
    let names: Vec<&str> = vacancies.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["Программист", "Аналитик", "Тестировщик"]);
    assert_eq!(vacancies[0].description, "Пишет код");
    assert_eq!(vacancies[0].skills, vec!["Git", "Rust"]);
    assert_eq!(vacancies[0].published_date, "05.07.2022");
}

#[test]
fn skill_filter_and_reverse_salary_sort() {
    let vacancies = vacancies();
    let table = render(
        &vacancies,
        &query("Навыки: Git", "Оклад", "Да", "", "Название, Компания"),
    )
    .expect("table renders");

    assert!(position(&table, "Программист") < position(&table, "Тестировщик"));
    assert!(!table.contains("Аналитик"));
    assert!(table.contains("Компания"));
    assert!(!table.contains("Описание"));
    assert!(table.starts_with('+'));
}

#[test]
fn salary_sort_uses_rouble_equivalents() {
    let vacancies = vacancies();
    let table = render(&vacancies, &query("", "Оклад", "", "", "Название")).expect("table");

    // 1500 USD lands between 55 000 and 125 000 roubles.
    let tester = position(&table, "Тестировщик");
    let analyst = position(&table, "Аналитик");
    let developer = position(&table, "Программист");
    assert!(tester < analyst && analyst < developer);
}

#[test]
fn numbering_survives_the_output_window() {
    let vacancies = vacancies();
    let table = render(&vacancies, &query("", "", "", "2 2", "Название")).expect("table");

    assert!(table.contains("| 2 "));
    assert!(!table.contains("| 1 "));
    assert!(!table.contains("| 3 "));
    assert!(table.contains("Аналитик"));
}

#[test]
fn output_window_includes_its_last_row() {
    let vacancies = vacancies();
    let table = render(&vacancies, &query("", "", "", "1 2", "Название")).expect("table");

    assert!(table.contains("Программист"));
    assert!(table.contains("Аналитик"));
    assert!(!table.contains("Тестировщик"));
}

#[test]
fn console_errors_carry_their_messages() {
    let err = ListingQuery::parse("Оклад 100", "", "", "", "").expect_err("bad filter");
    assert_eq!(err.message(), "Формат ввода некорректен");

    let err = ListingQuery::parse("Зарплата: 100", "", "", "", "").expect_err("unknown filter");
    assert_eq!(err, QueryError::UnknownFilter);

    let err = ListingQuery::parse("", "Зарплата", "", "", "").expect_err("unknown sort");
    assert_eq!(err.message(), "Параметр сортировки некорректен");

    let err = ListingQuery::parse("", "", "Может быть", "", "").expect_err("bad order");
    assert_eq!(err.message(), "Порядок сортировки задан некорректно");

    let vacancies = vacancies();
    let nothing = render(&vacancies, &query("Название: Повар", "", "", "", ""));
    assert_eq!(nothing, Err(InputError::NothingFound));
}

#[test]
fn empty_inputs_are_user_errors() {
    let err = read_listing(Cursor::new("")).expect_err("empty file");
    assert_eq!(err.user_message(), Some("Пустой файл"));

    let header_only = EXPORT.lines().next().expect("header line");
    let err = read_listing(Cursor::new(format!("{header_only}\n"))).expect_err("no data");
    assert!(matches!(err, ListingError::Input(InputError::NoData)));
}
