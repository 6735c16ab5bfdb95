//! Column encoding shared by the repositories.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat};
use eodsa_domain::time::Timestamp;
use rust_decimal::Decimal;

/// Wrap a parse failure as a column decode error.
pub(crate) fn decode_err(err: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}

/// Parse any `FromStr` column (ids, status enums).
pub(crate) fn parse<T>(raw: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    T::from_str(raw).map_err(decode_err)
}

pub(crate) fn parse_opt<T>(raw: Option<String>) -> Result<Option<T>, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.as_deref().map(parse).transpose()
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
pub(crate) fn timestamp(at: Timestamp) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<Timestamp, sqlx::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.to_utc())
        .map_err(decode_err)
}

pub(crate) fn parse_timestamp_opt(raw: Option<String>) -> Result<Option<Timestamp>, sqlx::Error> {
    raw.as_deref().map(parse_timestamp).transpose()
}

pub(crate) fn date(on: NaiveDate) -> String {
    on.format("%Y-%m-%d").to_string()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, sqlx::Error> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(decode_err)
}

pub(crate) fn parse_decimal(raw: &str) -> Result<Decimal, sqlx::Error> {
    Decimal::from_str(raw).map_err(decode_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn should_keep_timestamps_sortable_as_text() {
        let early = chrono::Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let late = early + chrono::Duration::milliseconds(250);
        assert!(timestamp(early) < timestamp(late));
        assert_eq!(parse_timestamp(&timestamp(late)).unwrap(), late);
    }

    #[test]
    fn should_fail_decoding_garbage_dates() {
        assert!(matches!(parse_date("31/12/2020"), Err(sqlx::Error::Decode(_))));
    }
}
