use serde::Deserialize;
use serde_json::Number;

/// One page of the `/vacancies` search response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VacancyPage {
    #[serde(default)]
    pub items: Vec<ApiVacancy>,
    /// Total pages available for the query, when reported.
    #[serde(default)]
    pub pages: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiVacancy {
    pub name: String,
    #[serde(default)]
    pub salary: Option<ApiSalary>,
    pub area: ApiArea,
    pub published_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiSalary {
    #[serde(default)]
    pub from: Option<Number>,
    #[serde(default)]
    pub to: Option<Number>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiArea {
    pub name: String,
}

/// Body of a 403 answer that asks for a captcha.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CaptchaResponse {
    #[serde(default)]
    pub errors: Vec<CaptchaEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CaptchaEntry {
    #[serde(default)]
    pub captcha_url: Option<String>,
}

impl CaptchaResponse {
    pub(crate) fn captcha_url(&self) -> Option<&str> {
        self.errors
            .iter()
            .find_map(|entry| entry.captcha_url.as_deref())
    }
}

/// A vacancy in the six-column raw export layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawVacancy {
    pub name: String,
    pub salary_from: String,
    pub salary_to: String,
    pub salary_currency: String,
    pub area_name: String,
    pub published_at: String,
}

impl RawVacancy {
    pub fn fields(&self) -> [&str; 6] {
        [
            &self.name,
            &self.salary_from,
            &self.salary_to,
            &self.salary_currency,
            &self.area_name,
            &self.published_at,
        ]
    }
}

impl From<ApiVacancy> for RawVacancy {
    /// Missing salary parts become empty cells.
    fn from(vacancy: ApiVacancy) -> Self {
        let salary = vacancy.salary.unwrap_or_default();
        Self {
            name: vacancy.name,
            salary_from: salary.from.map(|n| n.to_string()).unwrap_or_default(),
            salary_to: salary.to.map(|n| n.to_string()).unwrap_or_default(),
            salary_currency: salary.currency.unwrap_or_default(),
            area_name: vacancy.area.name,
            published_at: vacancy.published_at,
        }
    }
}
