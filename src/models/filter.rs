// src/models/filter.rs

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Formato de data usado pelas telas e pelo backend de relatórios.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Sentinela que significa "todas as lojas".
pub const ALL_LOCATIONS: &str = "all";

pub fn parse_report_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
}

pub fn format_report_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// (De)serializa NaiveDate como DD.MM.YYYY
pub mod report_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_report_date(date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_report_date(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loja selecionada no filtro: um id atribuído pelo backend ou "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LocationFilter {
    #[default]
    All,
    Id(String),
}

impl LocationFilter {
    pub fn as_str(&self) -> &str {
        match self {
            LocationFilter::All => ALL_LOCATIONS,
            LocationFilter::Id(id) => id,
        }
    }
}

impl From<String> for LocationFilter {
    fn from(raw: String) -> Self {
        if raw == ALL_LOCATIONS {
            LocationFilter::All
        } else {
            LocationFilter::Id(raw)
        }
    }
}

impl From<&str> for LocationFilter {
    fn from(raw: &str) -> Self {
        LocationFilter::from(raw.to_string())
    }
}

impl From<LocationFilter> for String {
    fn from(location: LocationFilter) -> Self {
        match location {
            LocationFilter::All => ALL_LOCATIONS.to_string(),
            LocationFilter::Id(id) => id,
        }
    }
}

impl fmt::Display for LocationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filtro dos relatórios. Valor imutável: qualquer mudança gera um novo Filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    #[serde(with = "report_date")]
    #[schema(value_type = String, example = "19.10.2026")]
    pub date: NaiveDate,

    pub period: Period,

    #[schema(value_type = String, example = "all")]
    pub location_id: LocationFilter,
}

impl Filter {
    pub fn new(date: NaiveDate, period: Period, location_id: LocationFilter) -> Self {
        Self { date, period, location_id }
    }

    /// Filtro inicial das telas: hoje, por dia.
    pub fn today(location_id: LocationFilter) -> Self {
        Self::new(Local::now().date_naive(), Period::Day, location_id)
    }

    pub fn with_date(&self, date: NaiveDate) -> Self {
        Self { date, ..self.clone() }
    }

    pub fn with_period(&self, period: Period) -> Self {
        Self { period, ..self.clone() }
    }

    pub fn with_location(&self, location_id: LocationFilter) -> Self {
        Self { location_id, ..self.clone() }
    }
}
