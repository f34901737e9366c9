//! Calendar dates cross the wire as `dd-MM-yyyy` text. Both directions
//! go through this module so construction and updates cannot drift onto
//! different formats.

use chrono::NaiveDate;
use thiserror::Error;

pub const DAY_MONTH_YEAR_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid date '{input}': expected dd-MM-yyyy")]
pub struct DateParseError {
    pub input: String,
}

pub fn parse_day_month_year(input: &str) -> Result<NaiveDate, DateParseError> {
    NaiveDate::parse_from_str(input.trim(), DAY_MONTH_YEAR_FORMAT).map_err(|_| DateParseError {
        input: input.to_string(),
    })
}

pub fn format_day_month_year(date: NaiveDate) -> String {
    date.format(DAY_MONTH_YEAR_FORMAT).to_string()
}

/// serde adapter for `#[serde(with = "utils::dates::day_month_year")]`.
pub mod day_month_year {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_day_month_year(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_day_month_year(&raw).map_err(D::Error::custom)
    }
}
