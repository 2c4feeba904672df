use serde::Serialize;

/// Currencies the listing report knows how to label and convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Currency {
    Azn,
    Byr,
    Eur,
    Gel,
    Kgs,
    Kzt,
    Rur,
    Uah,
    Usd,
    Uzs,
}

impl Currency {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::Azn,
            Self::Byr,
            Self::Eur,
            Self::Gel,
            Self::Kgs,
            Self::Kzt,
            Self::Rur,
            Self::Uah,
            Self::Usd,
            Self::Uzs,
        ]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Azn => "AZN",
            Self::Byr => "BYR",
            Self::Eur => "EUR",
            Self::Gel => "GEL",
            Self::Kgs => "KGS",
            Self::Kzt => "KZT",
            Self::Rur => "RUR",
            Self::Uah => "UAH",
            Self::Usd => "USD",
            Self::Uzs => "UZS",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Azn => "Манаты",
            Self::Byr => "Белорусские рубли",
            Self::Eur => "Евро",
            Self::Gel => "Грузинский лари",
            Self::Kgs => "Киргизский сом",
            Self::Kzt => "Тенге",
            Self::Rur => "Рубли",
            Self::Uah => "Гривны",
            Self::Usd => "Доллары",
            Self::Uzs => "Узбекский сум",
        }
    }

    /// Fixed roubles per unit used for sorting by salary.
    pub const fn rub_rate(self) -> f64 {
        match self {
            Self::Azn => 35.68,
            Self::Byr => 23.91,
            Self::Eur => 59.90,
            Self::Gel => 21.74,
            Self::Kgs => 0.76,
            Self::Kzt => 0.13,
            Self::Rur => 1.0,
            Self::Uah => 1.64,
            Self::Usd => 60.66,
            Self::Uzs => 0.0055,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|currency| currency.code() == code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Experience {
    NoExperience,
    OneToThree,
    ThreeToSix,
    MoreThanSix,
}

impl Experience {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::NoExperience,
            Self::OneToThree,
            Self::ThreeToSix,
            Self::MoreThanSix,
        ]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::NoExperience => "noExperience",
            Self::OneToThree => "between1And3",
            Self::ThreeToSix => "between3And6",
            Self::MoreThanSix => "moreThan6",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NoExperience => "Нет опыта",
            Self::OneToThree => "От 1 года до 3 лет",
            Self::ThreeToSix => "От 3 до 6 лет",
            Self::MoreThanSix => "Более 6 лет",
        }
    }

    /// 1 for no experience up to 4 for more than six years.
    pub const fn rank(self) -> u8 {
        match self {
            Self::NoExperience => 1,
            Self::OneToThree => 2,
            Self::ThreeToSix => 3,
            Self::MoreThanSix => 4,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|experience| experience.code() == code)
    }
}

/// `"True"` reads as yes; `"False"` and `"FALSE"` as no.
pub fn premium_label(raw: &str) -> Option<&'static str> {
    match raw {
        "True" => Some("Да"),
        "False" | "FALSE" => Some("Нет"),
        _ => None,
    }
}

/// Fields a listing can be filtered or sorted by, keyed by their Russian label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ListingField {
    Skills,
    Salary,
    PublishedAt,
    Experience,
    Premium,
    Currency,
    Name,
    AreaName,
    Employer,
}

impl ListingField {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::Skills,
            Self::Salary,
            Self::PublishedAt,
            Self::Experience,
            Self::Premium,
            Self::Currency,
            Self::Name,
            Self::AreaName,
            Self::Employer,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Skills => "Навыки",
            Self::Salary => "Оклад",
            Self::PublishedAt => "Дата публикации вакансии",
            Self::Experience => "Опыт работы",
            Self::Premium => "Премиум-вакансия",
            Self::Currency => "Идентификатор валюты оклада",
            Self::Name => "Название",
            Self::AreaName => "Название региона",
            Self::Employer => "Компания",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ordered().into_iter().find(|field| field.label() == label)
    }
}

/// Printed columns, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Column {
    Number,
    Name,
    Description,
    Skills,
    Experience,
    Premium,
    Employer,
    Salary,
    AreaName,
    PublishedAt,
}

impl Column {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::Number,
            Self::Name,
            Self::Description,
            Self::Skills,
            Self::Experience,
            Self::Premium,
            Self::Employer,
            Self::Salary,
            Self::AreaName,
            Self::PublishedAt,
        ]
    }

    pub const fn header(self) -> &'static str {
        match self {
            Self::Number => "№",
            Self::Name => "Название",
            Self::Description => "Описание",
            Self::Skills => "Навыки",
            Self::Experience => "Опыт работы",
            Self::Premium => "Премиум-вакансия",
            Self::Employer => "Компания",
            Self::Salary => "Оклад",
            Self::AreaName => "Название региона",
            Self::PublishedAt => "Дата публикации вакансии",
        }
    }

    pub fn from_header(header: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|column| column.header() == header)
    }
}
