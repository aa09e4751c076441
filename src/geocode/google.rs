//! Google Maps Geocoding API backend

use crate::error::{Error, Result};
use crate::geocode::{fetch_json, require_key, GeocodeResult, GeocodingProvider, ProviderId};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;

const LABEL: &str = "Google Maps";

/// Google geocoding backend
#[derive(Debug, Clone)]
pub struct GoogleProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    status: String,
    #[serde(default)]
    results: Vec<GoogleResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleResult {
    formatted_address: String,
    geometry: GoogleGeometry,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct GoogleGeometry {
    location: LatLng,
    #[serde(default)]
    viewport: Option<Viewport>,
}

#[derive(Debug, Deserialize)]
struct Viewport {
    northeast: LatLng,
    southwest: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,
    short_name: String,
    #[serde(default)]
    types: Vec<String>,
}

impl GoogleProvider {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fold address components into the detail keys used across providers
    fn fold_components(components: &[AddressComponent]) -> BTreeMap<String, String> {
        let mut details = BTreeMap::new();
        for c in components {
            let has = |t: &str| c.types.iter().any(|x| x == t);
            if has("street_number") {
                details.insert("streetNumber".to_string(), c.long_name.clone());
            } else if has("route") {
                details.insert("streetName".to_string(), c.long_name.clone());
            } else if has("locality") {
                details.insert("city".to_string(), c.long_name.clone());
            } else if has("administrative_area_level_1") {
                details.insert("state".to_string(), c.long_name.clone());
            } else if has("country") {
                details.insert("country".to_string(), c.long_name.clone());
                details.insert("countryCode".to_string(), c.short_name.clone());
            } else if has("postal_code") {
                details.insert("zipcode".to_string(), c.long_name.clone());
            }
        }
        details
    }

    fn normalize(result: GoogleResult) -> GeocodeResult {
        let bounding_box = result.geometry.viewport.as_ref().map(|v| {
            [v.southwest.lat, v.northeast.lat, v.southwest.lng, v.northeast.lng]
        });
        GeocodeResult {
            latitude: result.geometry.location.lat,
            longitude: result.geometry.location.lng,
            details: Self::fold_components(&result.address_components),
            formatted_address: result.formatted_address,
            provider_label: LABEL.to_string(),
            bounding_box,
        }
    }

    /// `ZERO_RESULTS` is an empty answer; any other non-`OK` status fails
    fn into_results(response: GoogleResponse) -> Result<Vec<GeocodeResult>> {
        match response.status.as_str() {
            "OK" => Ok(response.results.into_iter().map(Self::normalize).collect()),
            "ZERO_RESULTS" => Ok(Vec::new()),
            status => Err(Error::Geocoding(format!(
                "{} returned status {}{}",
                LABEL,
                status,
                response
                    .error_message
                    .map(|m| format!(": {}", m))
                    .unwrap_or_default()
            ))),
        }
    }

    async fn query(&self, param: &str, value: &str, key: &str) -> Result<Vec<GeocodeResult>> {
        let url = format!(
            "{}/maps/api/geocode/json?{}={}&key={}",
            self.base_url,
            param,
            urlencoding::encode(value),
            urlencoding::encode(key)
        );
        let response: GoogleResponse = fetch_json(self.client.get(&url), LABEL).await?;
        Self::into_results(response)
    }
}

#[async_trait]
impl GeocodingProvider for GoogleProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Google
    }

    fn label(&self) -> &'static str {
        LABEL
    }

    async fn geocode(&self, address: &str, api_key: Option<&str>) -> Result<Vec<GeocodeResult>> {
        let key = require_key(api_key, self.id())?;
        self.query("address", address, key).await
    }

    async fn reverse_geocode(
        &self,
        lat: f64,
        lon: f64,
        api_key: Option<&str>,
    ) -> Result<Option<GeocodeResult>> {
        let key = require_key(api_key, self.id())?;
        let latlng = format!("{},{}", lat, lon);
        Ok(self.query("latlng", &latlng, key).await?.into_iter().next())
    }
}
