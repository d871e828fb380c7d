use chrono::{DateTime, NaiveDateTime, TimeZone as _, Utc};
use serde::{de, Deserialize, Deserializer};
use serde_with::DeserializeAs;

/// Receipt date, as found in the `verifyReceipt` response body.
///
/// Accepts the App Store's own `2017-07-24 03:17:15 Etc/GMT` form, RFC 3339,
/// and UNIX epoch milliseconds (either as a number or as a numeric string,
/// like the `*_ms` sibling fields).
pub(crate) struct AppStoreDate;

const APP_STORE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const APP_STORE_DATE_ZONE: &str = " Etc/GMT";

impl<'de> DeserializeAs<'de, DateTime<Utc>> for AppStoreDate {
    fn deserialize_as<D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Millis(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Millis(ms) => from_millis(ms).map_err(de::Error::custom),
            Raw::Text(s) => parse_date(&s).map_err(de::Error::custom),
        }
    }
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>, String> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| format!("timestamp out of range: {ms}"))
}

pub(crate) fn parse_date(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();
    if let Some(naive) = s.strip_suffix(APP_STORE_DATE_ZONE) {
        return NaiveDateTime::parse_from_str(naive, APP_STORE_DATE_FORMAT)
            .map(|t| t.and_utc())
            .map_err(|e| format!("invalid date '{s}': {e}"));
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(t.with_timezone(&Utc));
    }
    if let Ok(ms) = s.parse::<i64>() {
        return from_millis(ms);
    }
    Err(format!("unrecognized date format: '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_app_store_format() {
        let t = parse_date("2018-02-10 17:37:00 Etc/GMT").unwrap();
        assert_eq!(t.timestamp(), 1518284220);
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let t = parse_date("2018-02-10T09:37:00-08:00").unwrap();
        assert_eq!(t.timestamp(), 1518284220);
    }

    #[test]
    fn parses_epoch_millis_string() {
        let t = parse_date("1518284220000").unwrap();
        assert_eq!(t.timestamp(), 1518284220);
    }

    #[test]
    fn rejects_pacific_time_variant() {
        assert!(parse_date("2018-02-10 09:37:00 America/Los_Angeles").is_err());
        assert!(parse_date("").is_err());
    }
}
