//! Mapbox Geocoding API (v5) backend

use crate::constants::api::GEOCODE_LIMIT;
use crate::error::Result;
use crate::geocode::{fetch_json, require_key, GeocodeResult, GeocodingProvider, ProviderId};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;

const LABEL: &str = "Mapbox";

/// Mapbox geocoding backend
#[derive(Debug, Clone)]
pub struct MapboxProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    place_name: String,
    /// Longitude, latitude
    center: [f64; 2],
    #[serde(default)]
    context: Vec<ContextItem>,
    /// West, south, east, north
    #[serde(default)]
    bbox: Option<[f64; 4]>,
}

#[derive(Debug, Deserialize)]
struct ContextItem {
    id: String,
    text: String,
}

impl MapboxProvider {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Context ids look like `place.123`; the part before the dot is the key
    fn fold_context(context: &[ContextItem]) -> BTreeMap<String, String> {
        context
            .iter()
            .map(|c| {
                let kind = c.id.split('.').next().unwrap_or(&c.id);
                (kind.to_string(), c.text.clone())
            })
            .collect()
    }

    fn normalize(feature: Feature) -> GeocodeResult {
        GeocodeResult {
            latitude: feature.center[1],
            longitude: feature.center[0],
            details: Self::fold_context(&feature.context),
            formatted_address: feature.place_name,
            provider_label: LABEL.to_string(),
            bounding_box: feature.bbox.map(|[w, s, e, n]| [s, n, w, e]),
        }
    }

    async fn places(&self, query: &str, key: &str, limit: Option<usize>) -> Result<Vec<GeocodeResult>> {
        let mut url = format!(
            "{}/geocoding/v5/mapbox.places/{}.json?access_token={}",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(key)
        );
        if let Some(limit) = limit {
            url.push_str(&format!("&limit={}", limit));
        }

        let collection: FeatureCollection = fetch_json(self.client.get(&url), LABEL).await?;
        Ok(collection.features.into_iter().map(Self::normalize).collect())
    }
}

#[async_trait]
impl GeocodingProvider for MapboxProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Mapbox
    }

    fn label(&self) -> &'static str {
        LABEL
    }

    async fn geocode(&self, address: &str, api_key: Option<&str>) -> Result<Vec<GeocodeResult>> {
        let key = require_key(api_key, self.id())?;
        self.places(address, key, Some(GEOCODE_LIMIT)).await
    }

    async fn reverse_geocode(
        &self,
        lat: f64,
        lon: f64,
        api_key: Option<&str>,
    ) -> Result<Option<GeocodeResult>> {
        let key = require_key(api_key, self.id())?;
        let query = format!("{},{}", lon, lat);
        Ok(self.places(&query, key, None).await?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_feature() {
        let collection: FeatureCollection = serde_json::from_str(
            r#"{"features":[{
                "place_name": "Paris, France",
                "center": [2.35183, 48.85717],
                "bbox": [2.224122, 48.815575, 2.469703, 48.902156],
                "context": [
                    {"id": "region.13200", "text": "Paris"},
                    {"id": "country.8781", "text": "France", "short_code": "fr"}
                ]
            }]}"#,
        )
        .unwrap();

        let result = MapboxProvider::normalize(collection.features.into_iter().next().unwrap());
        assert_eq!(result.latitude, 48.85717);
        assert_eq!(result.longitude, 2.35183);
        assert_eq!(result.details["country"], "France");
        assert_eq!(result.details["region"], "Paris");
        assert_eq!(result.bounding_box, Some([48.815575, 48.902156, 2.224122, 2.469703]));
    }

    #[test]
    fn test_missing_context_is_empty_details() {
        let collection: FeatureCollection = serde_json::from_str(
            r#"{"features":[{"place_name":"Somewhere","center":[1.0,2.0]}]}"#,
        )
        .unwrap();
        let result = MapboxProvider::normalize(collection.features.into_iter().next().unwrap());
        assert!(result.details.is_empty());
        assert!(result.bounding_box.is_none());
    }
}
