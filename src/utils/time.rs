use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

/// The only place the service reads the wall clock; everything below takes `now` explicitly.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp; the time of day is dropped.
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    })
}

pub fn deserialize_optional_day<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(value) => parse_day(&value).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("'{}' is not a date or RFC 3339 timestamp", value))
        }),
    }
}
