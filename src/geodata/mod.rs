//! Geo-data lookups
//!
//! Thin clients for the public services behind the "location information"
//! menu: sun times, elevation, time zone and nearby places. Each call is a
//! single request; failures come back as [`Error::GeoData`].

pub mod elevation;
pub mod nearby;
pub mod sun;
pub mod timezone;

#[cfg(test)]
mod tests;

use crate::constants::{self, api};
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Base URLs of the geo-data services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoEndpoints {
    pub sunrise_sunset: String,
    pub open_elevation: String,
    pub timezonedb: String,
    pub overpass: String,
}

impl Default for GeoEndpoints {
    fn default() -> Self {
        Self {
            sunrise_sunset: api::SUNRISE_SUNSET_URL.to_string(),
            open_elevation: api::OPEN_ELEVATION_URL.to_string(),
            timezonedb: api::TIMEZONEDB_URL.to_string(),
            overpass: api::OVERPASS_URL.to_string(),
        }
    }
}

impl GeoEndpoints {
    /// Every service served from one base URL
    pub fn single(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            sunrise_sunset: base.clone(),
            open_elevation: base.clone(),
            timezonedb: base.clone(),
            overpass: base,
        }
    }
}

/// Client for every geo-data service
#[derive(Debug, Clone)]
pub struct GeoDataClient {
    client: reqwest::Client,
    endpoints: GeoEndpoints,
}

impl GeoDataClient {
    pub fn new() -> Result<Self> {
        Self::with_endpoints(GeoEndpoints::default())
    }

    pub fn with_endpoints(endpoints: GeoEndpoints) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(constants::user_agent())
            .build()
            .map_err(|e| Error::GeoData(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, endpoints })
    }

    pub(crate) fn endpoints(&self) -> &GeoEndpoints {
        &self.endpoints
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.client
    }
}

/// Send a request to `service` and decode its JSON body
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    service: &str,
) -> Result<T> {
    debug!(service, "geo data request");

    let response = request
        .send()
        .await
        .map_err(|e| Error::GeoData(format!("{} request failed: {}", service, e)))?;

    if !response.status().is_success() {
        return Err(Error::GeoData(format!(
            "{} returned status: {}",
            service,
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| Error::GeoData(format!("Failed to parse {} response: {}", service, e)))
}
