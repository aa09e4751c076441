//! Points of interest around a position (Overpass API)

use crate::coord::{geometry, Coordinates};
use crate::error::Result;
use crate::geodata::{fetch_json, GeoDataClient};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const SERVICE: &str = "Overpass";

/// Amenity kinds searched for besides shops
const AMENITIES: &str = "restaurant|cafe|hospital|bank|school|hotel";

/// A place found near the query position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyPlace {
    pub name: String,
    /// Amenity or shop tag value, or "Place"
    pub kind: String,
    pub position: Coordinates,
    /// Meters from the query position
    pub distance: f64,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
struct Element {
    lat: f64,
    lon: f64,
    #[serde(default)]
    tags: HashMap<String, String>,
}

/// Overpass QL for amenity and shop nodes within `radius` meters
pub fn build_query(lat: f64, lon: f64, radius: u32) -> String {
    format!(
        "[out:json][timeout:25];\n\
         (\n  \
         node[\"amenity\"~\"{amenities}\"](around:{r},{lat},{lon});\n  \
         node[\"shop\"](around:{r},{lat},{lon});\n\
         );\n\
         out center meta;",
        amenities = AMENITIES,
        r = radius,
        lat = lat,
        lon = lon
    )
}

fn to_place(origin: Coordinates, element: Element) -> NearbyPlace {
    let position = Coordinates::new(element.lat, element.lon);
    let mut tags = element.tags;
    let name = tags.remove("name").unwrap_or_else(|| "Unknown".to_string());
    let kind = tags
        .remove("amenity")
        .or_else(|| tags.remove("shop"))
        .unwrap_or_else(|| "Place".to_string());

    NearbyPlace {
        name,
        kind,
        position,
        distance: geometry::distance(origin, position),
    }
}

impl GeoDataClient {
    /// Places within `radius` meters, nearest first, at most `limit`
    pub async fn nearby(&self, lat: f64, lon: f64, radius: u32, limit: usize) -> Result<Vec<NearbyPlace>> {
        let url = format!("{}/api/interpreter", self.endpoints().overpass);
        let request = self
            .http()
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(build_query(lat, lon, radius));

        let response: OverpassResponse = fetch_json(request, SERVICE).await?;

        let origin = Coordinates::new(lat, lon);
        let mut places: Vec<NearbyPlace> = response
            .elements
            .into_iter()
            .map(|e| to_place(origin, e))
            .collect();
        places.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        places.truncate(limit);
        Ok(places)
    }
}
