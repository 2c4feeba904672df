//! Downloads raw vacancies from the HeadHunter API.
//!
//! Every publication period is one partition. Partitions run concurrently on
//! a bounded pool; pages inside a partition are fetched in order and retried
//! with exponential backoff. Failed partitions are collected rather than
//! aborting the others.

mod api;
mod backoff;
mod client;

pub use api::{ApiArea, ApiSalary, ApiVacancy, RawVacancy, VacancyPage};
pub use backoff::{ExponentialBackoff, MaxRetriesExceeded};
pub use client::{HhApiClient, PageSource};

use super::ingest::VacancyField;
use crate::config::FetchConfig;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Why a single page request failed.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("captcha required, solve it at {url}")]
    Captcha { url: String },
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("worker pool closed")]
    Cancelled,
}

impl PageError {
    /// Captcha, throttling, server errors and transport failures may clear up
    /// on their own; anything else will not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Captcha { .. } => true,
            Self::Status { status, .. } => *status == 403 || *status == 429 || *status >= 500,
            Self::Decode(_) | Self::Cancelled => false,
        }
    }
}

/// A partition that gave up, and the page it gave up on.
#[derive(Debug)]
pub struct PartitionFailure {
    pub period: u32,
    pub page: u32,
    pub error: PageError,
}

impl fmt::Display for PartitionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "period {} page {}: {}", self.period, self.page, self.error)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("{} partition(s) failed: {}", .0.len(), summarize(.0))]
    Partitions(Vec<PartitionFailure>),
    #[error("fetch task aborted: {0}")]
    Task(#[from] tokio::task::JoinError),
}

fn summarize(failures: &[PartitionFailure]) -> String {
    failures
        .iter()
        .map(PartitionFailure::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Fetches every period of `config` and merges the rows in period order.
pub async fn fetch_all<S>(source: Arc<S>, config: &FetchConfig) -> Result<Vec<RawVacancy>, FetchError>
where
    S: PageSource + 'static,
{
    let semaphore = Arc::new(Semaphore::new(config.concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for period in 1..=config.periods {
        let source = Arc::clone(&source);
        let semaphore = Arc::clone(&semaphore);
        let config = config.clone();
        tasks.spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return Err(PartitionFailure {
                    period,
                    page: 0,
                    error: PageError::Cancelled,
                });
            };
            fetch_partition(source.as_ref(), period, &config).await
        });
    }

    let mut partitions = BTreeMap::new();
    let mut failures = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined? {
            Ok((period, rows)) => {
                partitions.insert(period, rows);
            }
            Err(failure) => {
                warn!(period = failure.period, page = failure.page, error = %failure.error, "partition failed");
                failures.push(failure);
            }
        }
    }

    if !failures.is_empty() {
        failures.sort_by_key(|failure| failure.period);
        return Err(FetchError::Partitions(failures));
    }

    let vacancies: Vec<RawVacancy> = partitions.into_values().flatten().collect();
    info!(
        periods = config.periods,
        vacancies = vacancies.len(),
        "vacancy fetch finished"
    );
    Ok(vacancies)
}

async fn fetch_partition<S: PageSource>(
    source: &S,
    period: u32,
    config: &FetchConfig,
) -> Result<(u32, Vec<RawVacancy>), PartitionFailure> {
    let mut rows = Vec::new();
    for page in 0..config.pages {
        let batch = fetch_with_retry(source, period, page, config)
            .await
            .map_err(|error| PartitionFailure {
                period,
                page,
                error,
            })?;

        let last_page = batch.pages.map_or(false, |pages| page + 1 >= pages);
        rows.extend(batch.items.into_iter().map(RawVacancy::from));
        if last_page {
            break;
        }
    }

    info!(period, vacancies = rows.len(), "partition fetched");
    Ok((period, rows))
}

async fn fetch_with_retry<S: PageSource>(
    source: &S,
    period: u32,
    page: u32,
    config: &FetchConfig,
) -> Result<VacancyPage, PageError> {
    let mut backoff =
        ExponentialBackoff::new(config.initial_backoff, config.max_backoff, config.max_retries);
    loop {
        match source.fetch_page(period, page).await {
            Ok(batch) => return Ok(batch),
            Err(error) if error.is_retryable() => {
                if let PageError::Captcha { url } = &error {
                    warn!(period, page, captcha_url = %url, "captcha requested");
                } else {
                    warn!(period, page, %error, "page request failed");
                }
                if backoff.sleep().await.is_err() {
                    return Err(error);
                }
            }
            Err(error) => return Err(error),
        }
    }
}

/// Writes rows under the six-column raw header.
pub fn write_raw_csv<W: Write>(writer: W, vacancies: &[RawVacancy]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(VacancyField::ordered().map(VacancyField::column))?;
    for vacancy in vacancies {
        csv_writer.write_record(vacancy.fields())?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct ScriptedSource {
        /// Responses per (period, page); exhausted scripts fall back to an
        /// empty final page.
        script: Mutex<HashMap<(u32, u32), Vec<Result<VacancyPage, PageError>>>>,
        calls: Mutex<Vec<(u32, u32)>>,
    }

    impl ScriptedSource {
        fn push(&self, period: u32, page: u32, response: Result<VacancyPage, PageError>) {
            self.script
                .lock()
                .expect("script lock")
                .entry((period, page))
                .or_default()
                .push(response);
        }

        fn calls_for(&self, period: u32) -> usize {
            self.calls
                .lock()
                .expect("calls lock")
                .iter()
                .filter(|(p, _)| *p == period)
                .count()
        }
    }

    impl PageSource for ScriptedSource {
        fn fetch_page(
            &self,
            period: u32,
            page: u32,
        ) -> impl std::future::Future<Output = Result<VacancyPage, PageError>> + Send {
            self.calls.lock().expect("calls lock").push((period, page));
            let response = {
                let mut script = self.script.lock().expect("script lock");
                match script.get_mut(&(period, page)) {
                    Some(queue) if !queue.is_empty() => queue.remove(0),
                    _ => Ok(VacancyPage {
                        items: Vec::new(),
                        pages: Some(page + 1),
                    }),
                }
            };
            async move { response }
        }
    }

    fn vacancy(name: &str) -> ApiVacancy {
        ApiVacancy {
            name: name.to_string(),
            salary: None,
            area: ApiArea {
                name: "Москва".to_string(),
            },
            published_at: "2022-07-05T10:00:00+0300".to_string(),
        }
    }

    fn page(names: &[&str], pages: u32) -> VacancyPage {
        VacancyPage {
            items: names.iter().map(|name| vacancy(name)).collect(),
            pages: Some(pages),
        }
    }

    fn config(periods: u32, max_retries: u32) -> FetchConfig {
        FetchConfig {
            api_url: "http://localhost".to_string(),
            per_page: 20,
            pages: 100,
            periods,
            concurrency: 2,
            max_retries,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    fn unavailable() -> PageError {
        PageError::Status {
            status: 503,
            body: "busy".to_string(),
        }
    }

    #[tokio::test]
    async fn merges_partitions_in_period_order() {
        let source = Arc::new(ScriptedSource::default());
        source.push(1, 0, Ok(page(&["a1"], 2)));
        source.push(1, 1, Ok(page(&["a2"], 2)));
        source.push(2, 0, Ok(page(&["b1"], 1)));
        source.push(3, 0, Err(unavailable()));
        source.push(3, 0, Ok(page(&["c1"], 1)));

        let rows = fetch_all(Arc::clone(&source), &config(3, 2)).await.expect("fetch");
        let names: Vec<&str> = rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, vec!["a1", "a2", "b1", "c1"]);
        assert_eq!(source.calls_for(3), 2);
    }

    #[tokio::test]
    async fn reports_every_failed_partition_after_bounded_retries() {
        let source = Arc::new(ScriptedSource::default());
        for _ in 0..10 {
            source.push(1, 0, Err(unavailable()));
            source.push(3, 0, Err(unavailable()));
        }
        source.push(2, 0, Ok(page(&["b1"], 1)));

        let err = fetch_all(Arc::clone(&source), &config(3, 2))
            .await
            .expect_err("partitions should fail");
        match err {
            FetchError::Partitions(failures) => {
                let periods: Vec<u32> = failures.iter().map(|f| f.period).collect();
                assert_eq!(periods, vec![1, 3]);
            }
            other => panic!("unexpected error {other}"),
        }
        assert_eq!(source.calls_for(1), 3);
    }

    #[tokio::test]
    async fn terminal_statuses_are_not_retried() {
        let source = Arc::new(ScriptedSource::default());
        source.push(
            1,
            0,
            Err(PageError::Status {
                status: 400,
                body: "bad request".to_string(),
            }),
        );

        let err = fetch_all(Arc::clone(&source), &config(1, 5))
            .await
            .expect_err("should fail");
        assert!(matches!(err, FetchError::Partitions(ref f) if f.len() == 1));
        assert_eq!(source.calls_for(1), 1);
    }

    #[test]
    fn retry_policy_matches_status_classes() {
        let status = |status| PageError::Status {
            status,
            body: String::new(),
        };
        assert!(status(403).is_retryable());
        assert!(status(429).is_retryable());
        assert!(status(502).is_retryable());
        assert!(!status(404).is_retryable());
        assert!(PageError::Captcha { url: "u".to_string() }.is_retryable());
    }

    #[test]
    fn raw_csv_has_six_column_header() {
        let mut buffer = Vec::new();
        let rows: Vec<RawVacancy> = vec![RawVacancy::from(vacancy("Программист"))];
        write_raw_csv(&mut buffer, &rows).expect("write");
        let text = String::from_utf8(buffer).expect("utf8");
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("name,salary_from,salary_to,salary_currency,area_name,published_at")
        );
        assert_eq!(
            lines.next(),
            Some("Программист,,,,Москва,2022-07-05T10:00:00+0300")
        );
    }
}
