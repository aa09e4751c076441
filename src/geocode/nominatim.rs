//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Uses the free Nominatim API; no key is needed but every request must
//! carry a User-Agent, which the shared client sets.

use crate::constants::api::GEOCODE_LIMIT;
use crate::error::{Error, Result};
use crate::geocode::{fetch_json, string_fields, GeocodeResult, GeocodingProvider, ProviderId};
use async_trait::async_trait;
use serde::Deserialize;

const LABEL: &str = "OpenStreetMap";

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimProvider {
    client: reqwest::Client,
    base_url: String,
}

/// Nominatim search/reverse response item
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    address: Option<serde_json::Value>,
    #[serde(default)]
    boundingbox: Option<Vec<String>>,
}

/// Reverse lookups answer `{"error": "Unable to geocode"}` when nothing is near
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReverseReply {
    Place(NominatimPlace),
    NotFound { error: String },
}

impl NominatimProvider {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Parse lat/lon strings to f64
    fn parse_coords(lat: &str, lon: &str) -> Result<(f64, f64)> {
        let lat: f64 = lat
            .parse()
            .map_err(|_| Error::Geocoding(format!("Invalid latitude: {}", lat)))?;
        let lon: f64 = lon
            .parse()
            .map_err(|_| Error::Geocoding(format!("Invalid longitude: {}", lon)))?;
        Ok((lat, lon))
    }

    /// `boundingbox` is four numeric strings: south, north, west, east
    fn parse_bounding_box(raw: &[String]) -> Option<[f64; 4]> {
        if raw.len() != 4 {
            return None;
        }
        let mut bbox = [0.0; 4];
        for (slot, value) in bbox.iter_mut().zip(raw) {
            *slot = value.parse().ok()?;
        }
        Some(bbox)
    }

    fn normalize(place: NominatimPlace) -> Result<GeocodeResult> {
        let (latitude, longitude) = Self::parse_coords(&place.lat, &place.lon)?;
        Ok(GeocodeResult {
            latitude,
            longitude,
            formatted_address: place.display_name,
            details: string_fields(place.address.as_ref()),
            provider_label: LABEL.to_string(),
            bounding_box: place
                .boundingbox
                .as_deref()
                .and_then(Self::parse_bounding_box),
        })
    }
}

#[async_trait]
impl GeocodingProvider for NominatimProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Osm
    }

    fn label(&self) -> &'static str {
        LABEL
    }

    async fn geocode(&self, address: &str, _api_key: Option<&str>) -> Result<Vec<GeocodeResult>> {
        let url = format!(
            "{}/search?q={}&format=json&limit={}&addressdetails=1",
            self.base_url,
            urlencoding::encode(address),
            GEOCODE_LIMIT
        );

        let places: Vec<NominatimPlace> = fetch_json(self.client.get(&url), LABEL).await?;
        places.into_iter().map(Self::normalize).collect()
    }

    async fn reverse_geocode(
        &self,
        lat: f64,
        lon: f64,
        _api_key: Option<&str>,
    ) -> Result<Option<GeocodeResult>> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json&addressdetails=1",
            self.base_url, lat, lon
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("{} request failed: {}", LABEL, e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Error::Geocoding(format!(
                "{} returned status: {}",
                LABEL,
                response.status()
            )));
        }

        let reply: ReverseReply = response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse {} response: {}", LABEL, e)))?;

        match reply {
            ReverseReply::Place(place) => Self::normalize(place).map(Some),
            ReverseReply::NotFound { error } => {
                tracing::debug!(%error, "no reverse match");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coords() {
        let (lat, lon) = NominatimProvider::parse_coords("40.7128", "-74.0060").unwrap();
        assert!((lat - 40.7128).abs() < 0.0001);
        assert!((lon - (-74.0060)).abs() < 0.0001);
    }

    #[test]
    fn test_parse_coords_invalid() {
        assert!(NominatimProvider::parse_coords("invalid", "0").is_err());
        assert!(NominatimProvider::parse_coords("0", "invalid").is_err());
    }

    #[test]
    fn test_parse_bounding_box() {
        let raw: Vec<String> = ["48.81", "48.90", "2.22", "2.47"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            NominatimProvider::parse_bounding_box(&raw),
            Some([48.81, 48.90, 2.22, 2.47])
        );
        assert_eq!(NominatimProvider::parse_bounding_box(&raw[..3]), None);
    }

    #[test]
    fn test_reverse_reply_variants() {
        let hit: ReverseReply = serde_json::from_str(
            r#"{"lat":"48.85","lon":"2.29","display_name":"Tour Eiffel","address":{"city":"Paris","postcode":"75007"}}"#,
        )
        .unwrap();
        let ReverseReply::Place(place) = hit else {
            panic!("expected a place");
        };
        let result = NominatimProvider::normalize(place).unwrap();
        assert_eq!(result.details.get("city").map(String::as_str), Some("Paris"));
        assert_eq!(result.provider_label, "OpenStreetMap");

        let miss: ReverseReply = serde_json::from_str(r#"{"error":"Unable to geocode"}"#).unwrap();
        assert!(matches!(miss, ReverseReply::NotFound { .. }));
    }
}
