//! Geocoding module
//!
//! Forward and reverse geocoding through one of four upstream providers.
//! Each provider maps its own response schema onto [`GeocodeResult`]; the
//! [`Gateway`] picks the provider, looks up its API key and dispatches.

pub mod batch;
pub mod google;
pub mod here;
pub mod mapbox;
pub mod nominatim;


use crate::config::credentials::CredentialStore;
use crate::constants::{self, api};
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Identifier of a geocoding provider
///
/// Declaration order is the order providers are listed everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Osm,
    Google,
    Mapbox,
    Here,
}

impl ProviderId {
    pub const ALL: [ProviderId; 4] = [
        ProviderId::Osm,
        ProviderId::Google,
        ProviderId::Mapbox,
        ProviderId::Here,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderId::Osm => "osm",
            ProviderId::Google => "google",
            ProviderId::Mapbox => "mapbox",
            ProviderId::Here => "here",
        }
    }

    /// Whether lookups need an API key
    pub fn requires_credential(self) -> bool {
        self.credential_var().is_some()
    }

    /// Name of the variable holding the API key
    pub fn credential_var(self) -> Option<&'static str> {
        match self {
            ProviderId::Osm => None,
            ProviderId::Google => Some("GOOGLE_API_KEY"),
            ProviderId::Mapbox => Some("MAPBOX_API_KEY"),
            ProviderId::Here => Some("HERE_API_KEY"),
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ProviderId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| Error::UnsupportedProvider(s.to_string()))
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        s.parse()
    }
}

/// A normalized geocoding hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeResult {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: String,
    /// Address components keyed by the provider's own names
    #[serde(default)]
    pub details: BTreeMap<String, String>,
    /// Human-readable source, e.g. "OpenStreetMap"
    #[serde(rename = "provider")]
    pub provider_label: String,
    /// South, north, west, east
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<[f64; 4]>,
}

/// One upstream geocoding service
#[async_trait]
pub trait GeocodingProvider: Send + Sync + fmt::Debug {
    fn id(&self) -> ProviderId;

    /// Label stored in results
    fn label(&self) -> &'static str;

    /// Look up an address; an empty list means no match
    async fn geocode(&self, address: &str, api_key: Option<&str>) -> Result<Vec<GeocodeResult>>;

    /// Look up the address nearest to a position
    async fn reverse_geocode(
        &self,
        lat: f64,
        lon: f64,
        api_key: Option<&str>,
    ) -> Result<Option<GeocodeResult>>;
}

/// Base URLs of every provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub nominatim: String,
    pub google: String,
    pub mapbox: String,
    pub here_geocode: String,
    pub here_revgeocode: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            nominatim: api::NOMINATIM_URL.to_string(),
            google: api::GOOGLE_MAPS_URL.to_string(),
            mapbox: api::MAPBOX_URL.to_string(),
            here_geocode: api::HERE_GEOCODE_URL.to_string(),
            here_revgeocode: api::HERE_REVGEOCODE_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Every provider served from one base URL
    pub fn single(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            nominatim: base.clone(),
            google: base.clone(),
            mapbox: base.clone(),
            here_geocode: base.clone(),
            here_revgeocode: base,
        }
    }
}

/// Build the shared HTTP client
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(constants::user_agent())
        .build()
        .map_err(|e| Error::Geocoding(format!("Failed to build HTTP client: {}", e)))
}

/// Dispatches lookups to the provider named by the caller
#[derive(Debug)]
pub struct Gateway {
    providers: HashMap<ProviderId, Box<dyn GeocodingProvider>>,
    credentials: Arc<dyn CredentialStore>,
}

impl Gateway {
    /// Gateway against the public provider endpoints
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        Self::with_endpoints(Endpoints::default(), credentials)
    }

    pub fn with_endpoints(endpoints: Endpoints, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let client = http_client()?;

        let list: Vec<Box<dyn GeocodingProvider>> = vec![
            Box::new(nominatim::NominatimProvider::new(client.clone(), endpoints.nominatim)),
            Box::new(google::GoogleProvider::new(client.clone(), endpoints.google)),
            Box::new(mapbox::MapboxProvider::new(client.clone(), endpoints.mapbox)),
            Box::new(here::HereProvider::new(
                client,
                endpoints.here_geocode,
                endpoints.here_revgeocode,
            )),
        ];
        let providers = list.into_iter().map(|p| (p.id(), p)).collect();

        Ok(Self {
            providers,
            credentials,
        })
    }

    /// Result label of a provider
    pub fn label(&self, id: ProviderId) -> &'static str {
        self.providers.get(&id).map(|p| p.label()).unwrap_or("Unknown")
    }

    /// Provider and API key for an id, checked before any request
    fn resolve(&self, provider_id: &str) -> Result<(&dyn GeocodingProvider, Option<String>)> {
        let id: ProviderId = provider_id.parse()?;
        let provider = self
            .providers
            .get(&id)
            .ok_or_else(|| Error::UnsupportedProvider(provider_id.to_string()))?;

        let api_key = match id.credential_var() {
            Some(var) => Some(self.credentials.get(var).ok_or_else(|| {
                Error::MissingCredential {
                    provider: id.to_string(),
                }
            })?),
            None => None,
        };

        Ok((provider.as_ref(), api_key))
    }

    /// Forward geocode an address
    pub async fn geocode(&self, address: &str, provider_id: &str) -> Result<Vec<GeocodeResult>> {
        let (provider, api_key) = self.resolve(provider_id)?;
        debug!(provider = provider_id, address, "geocode");
        provider
            .geocode(address, api_key.as_deref())
            .await?
            .into_iter()
            .map(in_range)
            .collect()
    }

    /// Reverse geocode a position
    pub async fn reverse_geocode(
        &self,
        lat: f64,
        lon: f64,
        provider_id: &str,
    ) -> Result<Option<GeocodeResult>> {
        let (provider, api_key) = self.resolve(provider_id)?;
        debug!(provider = provider_id, lat, lon, "reverse geocode");
        provider
            .reverse_geocode(lat, lon, api_key.as_deref())
            .await?
            .map(in_range)
            .transpose()
    }

    /// Check that a provider answers a known query
    pub async fn probe(&self, provider_id: &str) -> Result<bool> {
        Ok(!self.geocode("Paris", provider_id).await?.is_empty())
    }
}

/// Reject results whose position is not a finite, in-range coordinate
fn in_range(result: GeocodeResult) -> Result<GeocodeResult> {
    Coordinates::parse(result.latitude, result.longitude).map_err(|e| {
        Error::Geocoding(format!(
            "{} returned malformed coordinates: {}",
            result.provider_label, e
        ))
    })?;
    Ok(result)
}

/// Send a request and decode its JSON body
///
/// Transport, status and decoding failures become [`Error::Geocoding`]
/// tagged with the provider label.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    label: &str,
) -> Result<T> {
    let response = request
        .send()
        .await
        .map_err(|e| Error::Geocoding(format!("{} request failed: {}", label, e)))?;

    if !response.status().is_success() {
        return Err(Error::Geocoding(format!(
            "{} returned status: {}",
            label,
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| Error::Geocoding(format!("Failed to parse {} response: {}", label, e)))
}

/// The key a credentialed provider was handed
pub(crate) fn require_key(api_key: Option<&str>, id: ProviderId) -> Result<&str> {
    api_key.ok_or_else(|| Error::MissingCredential {
        provider: id.to_string(),
    })
}

/// Keep the string and number fields of a JSON object
pub(crate) fn string_fields(value: Option<&serde_json::Value>) -> BTreeMap<String, String> {
    let Some(serde_json::Value::Object(map)) = value else {
        return BTreeMap::new();
    };
    map.iter()
        .filter_map(|(k, v)| match v {
            serde_json::Value::String(s) => Some((k.clone(), s.clone())),
            serde_json::Value::Number(n) => Some((k.clone(), n.to_string())),
            _ => None,
        })
        .collect()
}
