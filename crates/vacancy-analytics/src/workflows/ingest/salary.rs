/// Parses one salary bound; blanks, text and non-finite numbers are absent.
pub fn parse_bound(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Midpoint of the floored bounds multiplied by `rate`.
///
/// A missing bound takes the value of the present one. Each bound is floored
/// before averaging, so `10.9..21.1` yields `15.5`, not `16.0` or `15.0`.
/// Returns `None` only when both bounds are missing.
pub fn convert(salary_from: Option<f64>, salary_to: Option<f64>, rate: f64) -> Option<f64> {
    let (from, to) = match (salary_from, salary_to) {
        (Some(from), Some(to)) => (from, to),
        (Some(from), None) => (from, from),
        (None, Some(to)) => (to, to),
        (None, None) => return None,
    };

    let midpoint = (from.floor() + to.floor()) / 2.0;
    Some(midpoint * rate)
}

/// Precision kept in the persisted table.
pub fn round_salary(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
