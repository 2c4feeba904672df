use super::SalaryRecord;
use serde::Serialize;
use std::collections::HashMap;
use std::ops::RangeInclusive;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearAggregate {
    pub year: i32,
    pub count: usize,
    pub sum_salary: f64,
    pub mean_salary: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaAggregate {
    pub area_name: String,
    pub count: usize,
    pub sum_salary: f64,
    pub mean_salary: i64,
    /// Fraction of all vacancies, rounded to four places.
    pub share: f64,
}

/// `floor(sum / count)`, or 0 for an empty bucket.
pub fn mean_salary(sum: f64, count: usize) -> i64 {
    if count == 0 {
        0
    } else {
        (sum / count as f64).floor() as i64
    }
}

pub(crate) fn round_share(share: f64) -> f64 {
    (share * 10_000.0).round() / 10_000.0
}

/// One bucket per year of `span`, ascending; empty years carry zeros.
pub(crate) fn by_year<'r, I>(records: I, span: RangeInclusive<i32>) -> Vec<YearAggregate>
where
    I: IntoIterator<Item = &'r SalaryRecord>,
{
    let mut sums: HashMap<i32, (usize, f64)> = HashMap::new();
    for record in records {
        let bucket = sums.entry(record.year).or_insert((0, 0.0));
        bucket.0 += 1;
        bucket.1 += record.salary_rub;
    }

    span.map(|year| {
        let (count, sum_salary) = sums.get(&year).copied().unwrap_or((0, 0.0));
        YearAggregate {
            year,
            count,
            sum_salary,
            mean_salary: mean_salary(sum_salary, count),
        }
    })
    .collect()
}

/// Areas holding strictly more than `threshold` of all records, in order of
/// first appearance.
pub(crate) fn by_area(records: &[SalaryRecord], threshold: f64) -> Vec<AreaAggregate> {
    if records.is_empty() {
        return Vec::new();
    }

    let mut order: Vec<&str> = Vec::new();
    let mut sums: HashMap<&str, (usize, f64)> = HashMap::new();
    for record in records {
        let bucket = sums.entry(record.area_name.as_str()).or_insert_with(|| {
            order.push(record.area_name.as_str());
            (0, 0.0)
        });
        bucket.0 += 1;
        bucket.1 += record.salary_rub;
    }

    let total = records.len() as f64;
    order
        .into_iter()
        .filter_map(|area| {
            let (count, sum_salary) = sums[area];
            let share = count as f64 / total;
            (share > threshold).then(|| AreaAggregate {
                area_name: area.to_string(),
                count,
                sum_salary,
                mean_salary: mean_salary(sum_salary, count),
                share: round_share(share),
            })
        })
        .collect()
}

/// Keeps the `limit` largest items by `key`, descending; ties keep their
/// incoming order.
pub(crate) fn top_by<T, F>(mut items: Vec<T>, limit: usize, key: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    items.sort_by(|left, right| key(right).total_cmp(&key(left)));
    items.truncate(limit);
    items
}
