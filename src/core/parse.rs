//! Lenient parsing helpers for request payloads and query strings.
//!
//! Clients send ids and amounts either as JSON numbers or as numeric strings
//! (`"amount": "50.24"`), and dates either as `YYYY-MM-DD` or as full timestamps.
//! The serde helpers here accept both so a payload is only rejected when the value
//! itself is unusable.

use crate::errors::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, de::Error as _};

const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Numeric {
    fn into_i64(self) -> std::result::Result<i64, String> {
        match self {
            Self::Int(value) => Ok(value),
            Self::Float(value) => Err(format!("expected an integer id, found {value}")),
            Self::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| format!("invalid integer: '{text}'")),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn into_f64(self) -> std::result::Result<f64, String> {
        match self {
            Self::Int(value) => Ok(value as f64),
            Self::Float(value) => Ok(value),
            Self::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| format!("invalid number: '{text}'")),
        }
    }
}

/// Deserializes an integer given as a number or a numeric string.
pub fn flexible_i64<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Numeric::deserialize(deserializer)?
        .into_i64()
        .map_err(D::Error::custom)
}

/// Optional variant of [`flexible_i64`]; `null` becomes `None`.
pub fn optional_flexible_i64<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Numeric>::deserialize(deserializer)?
        .map(Numeric::into_i64)
        .transpose()
        .map_err(D::Error::custom)
}

/// Distinguishes an explicit `null` from an absent field.
///
/// Use together with `#[serde(default)]`: absent gives `None`, `null` gives
/// `Some(None)`, and a value gives `Some(Some(value))`.
pub fn nullable_flexible_i64<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_flexible_i64(deserializer).map(Some)
}

/// Deserializes a float given as a number or a numeric string.
pub fn flexible_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Numeric::deserialize(deserializer)?
        .into_f64()
        .map_err(D::Error::custom)
}

/// Optional variant of [`flexible_f64`].
pub fn optional_flexible_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Numeric>::deserialize(deserializer)?
        .map(Numeric::into_f64)
        .transpose()
        .map_err(D::Error::custom)
}

/// Deserializes a date or timestamp string with [`parse_date_time`].
pub fn date_time<'de, D>(deserializer: D) -> std::result::Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date_time(&raw).map_err(D::Error::custom)
}

/// Optional variant of [`date_time`].
pub fn optional_date_time<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_date_time(&raw).map_err(D::Error::custom))
        .transpose()
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(Into::into)
}

/// Parses an ISO-8601 style timestamp, or a bare date (taken as midnight).
pub fn parse_date_time(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();

    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(parsed);
        }
    }

    Ok(parse_date(raw)?.and_time(NaiveTime::MIN))
}

/// Parses a comma-separated id list such as `"1,2,3"`, ignoring empty entries.
pub fn parse_id_list(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|_| Error::validation(format!("invalid integer id: '{part}'")))
        })
        .collect()
}
