//! Time zone lookup (TimeZoneDB)
//!
//! The free "demo" key is used when no `TIMEZONEDB_API_KEY` is configured.
//! Callers fall back to [`estimate_utc_offset`] when the lookup fails.

use crate::constants::api::{TIMEZONEDB_DEMO_KEY, TIMEZONEDB_KEY_VAR};
use crate::config::credentials::CredentialStore;
use crate::error::Result;
use crate::geodata::{fetch_json, GeoDataClient};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use tracing::debug;

const SERVICE: &str = "TimeZoneDB";

/// Time zone at a position
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeZoneInfo {
    pub zone_name: String,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub abbreviation: String,
    /// Offset from UTC in seconds
    pub gmt_offset: i64,
    #[serde(deserialize_with = "flag")]
    pub dst: bool,
    /// Local wall-clock time expressed as seconds since the epoch
    pub timestamp: i64,
}

#[derive(Debug, Deserialize)]
struct TimeZoneResponse {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(flatten)]
    info: Option<TimeZoneInfo>,
}

/// TimeZoneDB sends `dst` as "0"/"1"
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Str(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
        Flag::Str(s) => !matches!(s.trim(), "" | "0" | "false"),
    })
}

impl TimeZoneInfo {
    /// Local time at the position
    pub fn local_time(&self) -> Option<NaiveDateTime> {
        DateTime::from_timestamp(self.timestamp, 0).map(|dt| dt.naive_utc())
    }

    pub fn utc_offset_label(&self) -> String {
        format_utc_offset(self.gmt_offset)
    }
}

/// Configured TimeZoneDB key, or the demo key
pub fn api_key(credentials: &dyn CredentialStore) -> String {
    credentials
        .get(TIMEZONEDB_KEY_VAR)
        .unwrap_or_else(|| TIMEZONEDB_DEMO_KEY.to_string())
}

/// Nominal offset in whole hours for a longitude: `round(lon / 15)`
pub fn estimate_utc_offset(lon: f64) -> i32 {
    (lon / 15.0).round() as i32
}

/// `UTC+2`, `UTC-9:30`, `UTC+0`
pub fn format_utc_offset(seconds: i64) -> String {
    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.abs();
    let hours = abs / 3600;
    let minutes = (abs % 3600) / 60;
    if minutes == 0 {
        format!("UTC{}{}", sign, hours)
    } else {
        format!("UTC{}{}:{:02}", sign, hours, minutes)
    }
}

impl GeoDataClient {
    /// Time zone at a position, `None` when the service has no answer
    pub async fn timezone(&self, lat: f64, lon: f64, api_key: &str) -> Result<Option<TimeZoneInfo>> {
        let url = format!(
            "{}/v2.1/get-time-zone?key={}&format=json&by=position&lat={}&lng={}",
            self.endpoints().timezonedb,
            urlencoding::encode(api_key),
            lat,
            lon
        );

        let response: TimeZoneResponse = fetch_json(self.http().get(&url), SERVICE).await?;
        if response.status != "OK" {
            debug!(status = %response.status, message = %response.message, "no time zone");
            return Ok(None);
        }
        Ok(response.info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::credentials::MemoryCredentials;

    #[test]
    fn test_estimate_utc_offset() {
        assert_eq!(estimate_utc_offset(0.0), 0);
        assert_eq!(estimate_utc_offset(2.35), 0);
        assert_eq!(estimate_utc_offset(106.8), 7);
        assert_eq!(estimate_utc_offset(-74.0), -5);
        assert_eq!(estimate_utc_offset(180.0), 12);
    }

    #[test]
    fn test_format_utc_offset() {
        assert_eq!(format_utc_offset(7200), "UTC+2");
        assert_eq!(format_utc_offset(0), "UTC+0");
        assert_eq!(format_utc_offset(-18000), "UTC-5");
        assert_eq!(format_utc_offset(19800), "UTC+5:30");
        assert_eq!(format_utc_offset(-34200), "UTC-9:30");
    }

    #[test]
    fn test_parse_ok_response() {
        let response: TimeZoneResponse = serde_json::from_str(
            r#"{"status":"OK","message":"","countryCode":"FR","countryName":"France",
                "zoneName":"Europe/Paris","abbreviation":"CEST","gmtOffset":7200,
                "dst":"1","timestamp":1718964000,"formatted":"2024-06-21 10:00:00"}"#,
        )
        .unwrap();

        let info = response.info.unwrap();
        assert_eq!(info.zone_name, "Europe/Paris");
        assert!(info.dst);
        assert_eq!(info.utc_offset_label(), "UTC+2");
        assert_eq!(
            info.local_time().unwrap().format("%Y-%m-%d %H:%M:%S").to_string(),
            "2024-06-21 10:00:00"
        );
    }

    #[test]
    fn test_parse_failed_response() {
        let response: TimeZoneResponse = serde_json::from_str(
            r#"{"status":"FAILED","message":"Record not found.","zoneName":""}"#,
        )
        .unwrap();
        assert_eq!(response.status, "FAILED");
        assert!(response.info.is_none());
    }

    #[test]
    fn test_api_key_falls_back_to_demo() {
        assert_eq!(api_key(&MemoryCredentials::default()), "demo");
        let creds = MemoryCredentials::with(&[("TIMEZONEDB_API_KEY", "real")]);
        assert_eq!(api_key(&creds), "real");
    }
}
