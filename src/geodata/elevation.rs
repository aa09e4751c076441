//! Ground elevation (Open-Elevation)

use crate::constants::geo::FEET_PER_METER;
use crate::error::Result;
use crate::geodata::{fetch_json, GeoDataClient};
use serde::{Deserialize, Serialize};

const SERVICE: &str = "Open-Elevation";

/// Rough description of an elevation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationClass {
    BelowSeaLevel,
    Low,
    Moderate,
    High,
}

impl ElevationClass {
    pub fn from_meters(meters: f64) -> Self {
        if meters < 0.0 {
            ElevationClass::BelowSeaLevel
        } else if meters <= 1000.0 {
            ElevationClass::Low
        } else if meters <= 3000.0 {
            ElevationClass::Moderate
        } else {
            ElevationClass::High
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            ElevationClass::BelowSeaLevel => "This location is below sea level",
            ElevationClass::Low => "This location is at low elevation",
            ElevationClass::Moderate => "This location has moderate elevation",
            ElevationClass::High => "This is a high altitude location",
        }
    }
}

pub fn meters_to_feet(meters: f64) -> f64 {
    meters * FEET_PER_METER
}

#[derive(Debug, Serialize)]
struct LookupRequest {
    locations: [Location; 1],
}

#[derive(Debug, Serialize)]
struct Location {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    results: Vec<LookupResult>,
}

#[derive(Debug, Deserialize)]
struct LookupResult {
    elevation: f64,
}

impl GeoDataClient {
    /// Elevation in meters, `None` when the service has no data
    pub async fn elevation(&self, lat: f64, lon: f64) -> Result<Option<f64>> {
        let url = format!("{}/api/v1/lookup", self.endpoints().open_elevation);
        let body = LookupRequest {
            locations: [Location {
                latitude: lat,
                longitude: lon,
            }],
        };

        let response: LookupResponse =
            fetch_json(self.http().post(&url).json(&body), SERVICE).await?;
        Ok(response.results.first().map(|r| r.elevation))
    }
}
