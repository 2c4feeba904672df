use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub pipeline: PipelineConfig,
    pub storage: StorageConfig,
    pub fetch: FetchConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let pipeline = PipelineConfig {
            min_currency_count: parse_var("VACANCY_MIN_CURRENCY_COUNT", 50)?,
            area_share_threshold: parse_var("VACANCY_AREA_SHARE_THRESHOLD", 0.01)?,
            top_areas: parse_var("VACANCY_TOP_AREAS", 10)?,
        };

        let storage = StorageConfig {
            vacancy_db_path: PathBuf::from(
                env::var("VACANCY_DB_PATH")
                    .unwrap_or_else(|_| "vacancies_database/vacancies.db".to_string()),
            ),
            currency_db_path: PathBuf::from(
                env::var("CURRENCY_DB_PATH")
                    .unwrap_or_else(|_| "db_currencies/currencies.db".to_string()),
            ),
        };

        let fetch = FetchConfig {
            api_url: env::var("HH_API_URL")
                .unwrap_or_else(|_| "https://api.hh.ru/vacancies".to_string()),
            per_page: parse_var("HH_PER_PAGE", 20)?,
            pages: parse_var("HH_PAGES", 100)?,
            periods: parse_var("HH_PERIODS", 30)?,
            concurrency: parse_var("HH_CONCURRENCY", 4)?,
            max_retries: parse_var("HH_MAX_RETRIES", 5)?,
            initial_backoff: Duration::from_millis(parse_var("HH_BACKOFF_INITIAL_MS", 500)?),
            max_backoff: Duration::from_millis(parse_var("HH_BACKOFF_MAX_MS", 30_000)?),
        };

        if fetch.concurrency == 0 {
            return Err(ConfigError::Invalid {
                key: "HH_CONCURRENCY",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            pipeline,
            storage,
            fetch,
        })
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Thresholds applied while normalizing and aggregating vacancies.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// A currency must occur strictly more often than this to be converted.
    pub min_currency_count: usize,
    /// An area must hold strictly more than this share of vacancies.
    pub area_share_threshold: f64,
    pub top_areas: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_currency_count: 50,
            area_share_threshold: 0.01,
            top_areas: 10,
        }
    }
}

/// Locations of the SQLite stores.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub vacancy_db_path: PathBuf,
    pub currency_db_path: PathBuf,
}

/// Settings for the HeadHunter vacancies fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub api_url: String,
    pub per_page: u32,
    pub pages: u32,
    pub periods: u32,
    pub concurrency: usize,
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

#[derive(Debug)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value '{}'", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
