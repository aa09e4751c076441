//! HERE Geocoding & Search API (v7) backend
//!
//! Forward and reverse lookups live on separate hosts.

use crate::constants::api::GEOCODE_LIMIT;
use crate::error::Result;
use crate::geocode::{
    fetch_json, require_key, string_fields, GeocodeResult, GeocodingProvider, ProviderId,
};
use async_trait::async_trait;
use serde::Deserialize;

const LABEL: &str = "HERE";

/// HERE geocoding backend
#[derive(Debug, Clone)]
pub struct HereProvider {
    client: reqwest::Client,
    geocode_url: String,
    revgeocode_url: String,
}

#[derive(Debug, Deserialize)]
struct ItemList {
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: String,
    position: Position,
    #[serde(default)]
    address: Option<serde_json::Value>,
    #[serde(default, rename = "mapView")]
    map_view: Option<MapView>,
}

#[derive(Debug, Deserialize)]
struct Position {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct MapView {
    west: f64,
    south: f64,
    east: f64,
    north: f64,
}

impl HereProvider {
    pub fn new(
        client: reqwest::Client,
        geocode_url: impl Into<String>,
        revgeocode_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            geocode_url: geocode_url.into(),
            revgeocode_url: revgeocode_url.into(),
        }
    }

    fn normalize(item: Item) -> GeocodeResult {
        GeocodeResult {
            latitude: item.position.lat,
            longitude: item.position.lng,
            formatted_address: item.title,
            details: string_fields(item.address.as_ref()),
            provider_label: LABEL.to_string(),
            bounding_box: item.map_view.map(|v| [v.south, v.north, v.west, v.east]),
        }
    }
}

#[async_trait]
impl GeocodingProvider for HereProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Here
    }

    fn label(&self) -> &'static str {
        LABEL
    }

    async fn geocode(&self, address: &str, api_key: Option<&str>) -> Result<Vec<GeocodeResult>> {
        let key = require_key(api_key, self.id())?;
        let url = format!(
            "{}/v1/geocode?q={}&apiKey={}&limit={}",
            self.geocode_url,
            urlencoding::encode(address),
            urlencoding::encode(key),
            GEOCODE_LIMIT
        );

        let list: ItemList = fetch_json(self.client.get(&url), LABEL).await?;
        Ok(list.items.into_iter().map(Self::normalize).collect())
    }

    async fn reverse_geocode(
        &self,
        lat: f64,
        lon: f64,
        api_key: Option<&str>,
    ) -> Result<Option<GeocodeResult>> {
        let key = require_key(api_key, self.id())?;
        let url = format!(
            "{}/v1/revgeocode?at={},{}&apiKey={}",
            self.revgeocode_url,
            lat,
            lon,
            urlencoding::encode(key)
        );

        let list: ItemList = fetch_json(self.client.get(&url), LABEL).await?;
        Ok(list.items.into_iter().next().map(Self::normalize))
    }
}
