//! Helpers shared by all collectors.
//!
//! - HTTP client construction
//! - Date key formatting
//! - JSON cell rendering
//!
//! No source-specific logic lives here.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use rustls::crypto::{CryptoProvider, ring};
use serde_json::Value;

/// Date format of the `Date` index column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// rustls >= 0.23 needs a process-wide CryptoProvider when more than
// one backend is compiled in. Installed at most once; a provider
// installed earlier by someone else is left alone.
static CRYPTO: Lazy<()> = Lazy::new(|| {
    let _ = CryptoProvider::install_default(ring::default_provider());
});

/// Builds an HTTP client for one collector.
///
/// Each collector owns its client: connection pools are bound to the
/// runtime that created them.
pub fn http_client() -> reqwest::Client {
    Lazy::force(&CRYPTO);
    reqwest::Client::new()
}

/// Formats a calendar date as an index key.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Converts Unix seconds into an index key (UTC).
pub fn date_key_from_unix(secs: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(secs, 0).map(|dt| date_key(dt.date_naive()))
}

/// Renders a scalar JSON value as a table cell.
///
/// - numbers keep their JSON text (no float re-rounding)
/// - strings are copied verbatim
/// - null becomes an empty cell
///
/// Arrays and objects are not cells and yield `None`.
pub fn json_cell(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unix_seconds_map_to_utc_dates() {
        assert_eq!(date_key_from_unix(1_519_862_400).as_deref(), Some("2018-03-01"));
        assert_eq!(date_key_from_unix(1_519_948_799).as_deref(), Some("2018-03-01"));
    }

    #[test]
    fn json_cells() {
        assert_eq!(json_cell(&json!(10300.125)).as_deref(), Some("10300.125"));
        assert_eq!(json_cell(&json!(42)).as_deref(), Some("42"));
        assert_eq!(json_cell(&json!("1.2345")).as_deref(), Some("1.2345"));
        assert_eq!(json_cell(&json!(null)).as_deref(), Some(""));
        assert_eq!(json_cell(&json!([1, 2])), None);
    }
}
