use super::api::{CaptchaResponse, VacancyPage};
use super::{FetchError, PageError};
use crate::config::FetchConfig;
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Anything that can serve one page of vacancies for a publication period.
pub trait PageSource: Send + Sync {
    fn fetch_page(
        &self,
        period: u32,
        page: u32,
    ) -> impl Future<Output = Result<VacancyPage, PageError>> + Send;
}

/// HeadHunter `/vacancies` endpoint over HTTPS.
#[derive(Debug, Clone)]
pub struct HhApiClient {
    http: Client,
    base_url: String,
    per_page: u32,
}

impl HhApiClient {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(concat!("vacancy-analytics/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            per_page: config.per_page,
        })
    }

    pub fn page_url(&self, period: u32, page: u32) -> String {
        format!(
            "{}?per_page={}&page={}&specialization=1&period={}",
            self.base_url, self.per_page, page, period
        )
    }
}

impl PageSource for HhApiClient {
    fn fetch_page(
        &self,
        period: u32,
        page: u32,
    ) -> impl Future<Output = Result<VacancyPage, PageError>> + Send {
        let url = self.page_url(period, page);
        let http = self.http.clone();
        async move {
            debug!(%url, "requesting vacancy page");
            let response = http.get(&url).send().await?;
            let status = response.status();
            let body = response.text().await?;

            if status.is_success() {
                return Ok(serde_json::from_str(&body)?);
            }

            if status == StatusCode::FORBIDDEN {
                if let Some(captcha) = serde_json::from_str::<CaptchaResponse>(&body)
                    .ok()
                    .as_ref()
                    .and_then(CaptchaResponse::captcha_url)
                {
                    return Err(PageError::Captcha {
                        url: format!("{captcha}&backurl={url}"),
                    });
                }
            }

            Err(PageError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
