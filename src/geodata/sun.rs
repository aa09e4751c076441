//! Sunrise, sunset and twilight times (sunrise-sunset.org)

use crate::error::{Error, Result};
use crate::geodata::{fetch_json, GeoDataClient};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Deserialize;

const SERVICE: &str = "sunrise-sunset";

/// Sun events for one day, all in UTC
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SunTimes {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub solar_noon: DateTime<Utc>,
    pub civil_twilight_begin: DateTime<Utc>,
    pub civil_twilight_end: DateTime<Utc>,
    pub nautical_twilight_begin: DateTime<Utc>,
    pub nautical_twilight_end: DateTime<Utc>,
    pub astronomical_twilight_begin: DateTime<Utc>,
    pub astronomical_twilight_end: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct SunResponse {
    status: String,
    /// An object on success, `""` on error statuses
    #[serde(default)]
    results: serde_json::Value,
}

impl SunResponse {
    fn into_times(self) -> Result<SunTimes> {
        if self.status != "OK" {
            return Err(Error::GeoData(format!(
                "{} returned status {}",
                SERVICE, self.status
            )));
        }
        serde_json::from_value(self.results)
            .map_err(|e| Error::GeoData(format!("Failed to parse {} results: {}", SERVICE, e)))
    }
}

impl SunTimes {
    /// Time between sunrise and sunset
    pub fn day_length(&self) -> Duration {
        self.sunset - self.sunrise
    }

    /// Events in display order with their labels
    pub fn events(&self) -> [(&'static str, DateTime<Utc>); 9] {
        [
            ("Sunrise", self.sunrise),
            ("Sunset", self.sunset),
            ("Civil Twilight Begin", self.civil_twilight_begin),
            ("Civil Twilight End", self.civil_twilight_end),
            ("Nautical Twilight Begin", self.nautical_twilight_begin),
            ("Nautical Twilight End", self.nautical_twilight_end),
            ("Astronomical Twilight Begin", self.astronomical_twilight_begin),
            ("Astronomical Twilight End", self.astronomical_twilight_end),
            ("Solar Noon", self.solar_noon),
        ]
    }
}

/// `Xh Ym`, truncated to whole minutes
pub fn format_day_length(length: Duration) -> String {
    let minutes = length.num_minutes();
    format!("{}h {}m", minutes / 60, minutes % 60)
}

impl GeoDataClient {
    /// Sun events at a position on a date
    pub async fn sun_times(&self, lat: f64, lon: f64, date: NaiveDate) -> Result<SunTimes> {
        let url = format!(
            "{}/json?lat={}&lng={}&date={}&formatted=0",
            self.endpoints().sunrise_sunset,
            lat,
            lon,
            date.format("%Y-%m-%d")
        );

        let response: SunResponse = fetch_json(self.http().get(&url), SERVICE).await?;
        response.into_times()
    }
}
