//! Centralized constants for the pelakoor crate
//!
//! Values shared by several modules live here so the upstream endpoints,
//! file names and pacing rules are defined once.

/// Geographic constants
pub mod geo {
    /// WGS84 semi-major axis in meters
    pub const WGS84_A: f64 = 6_378_137.0;

    /// WGS84 flattening
    pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

    /// Feet in one meter
    pub const FEET_PER_METER: f64 = 3.280_84;
}

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// Google Maps platform
    pub const GOOGLE_MAPS_URL: &str = "https://maps.googleapis.com";

    /// Mapbox API
    pub const MAPBOX_URL: &str = "https://api.mapbox.com";

    /// HERE forward geocoding
    pub const HERE_GEOCODE_URL: &str = "https://geocode.search.hereapi.com";

    /// HERE reverse geocoding
    pub const HERE_REVGEOCODE_URL: &str = "https://revgeocode.search.hereapi.com";

    /// sunrise-sunset.org
    pub const SUNRISE_SUNSET_URL: &str = "https://api.sunrise-sunset.org";

    /// Open-Elevation
    pub const OPEN_ELEVATION_URL: &str = "https://api.open-elevation.com";

    /// TimeZoneDB
    pub const TIMEZONEDB_URL: &str = "http://api.timezonedb.com";

    /// Overpass interpreter
    pub const OVERPASS_URL: &str = "https://overpass-api.de";

    /// TimeZoneDB key used when none is configured
    pub const TIMEZONEDB_DEMO_KEY: &str = "demo";

    /// Environment variable holding the TimeZoneDB key
    pub const TIMEZONEDB_KEY_VAR: &str = "TIMEZONEDB_API_KEY";

    /// Results requested from forward geocoders
    pub const GEOCODE_LIMIT: usize = 5;
}

/// Local files, all relative to the working directory
pub mod files {
    /// Provider configuration
    pub const CONFIG_FILE: &str = "config.json";

    /// Credentials (`KEY=value` lines)
    pub const ENV_FILE: &str = ".env";

    /// Operation history
    pub const HISTORY_FILE: &str = "history.json";

    /// Prefix of exported history files
    pub const HISTORY_EXPORT_PREFIX: &str = "pelakoor_history_";
}

/// History limits
pub mod history {
    /// Entries kept in the history file
    pub const MAX_ENTRIES: usize = 100;

    /// Entries written by an export
    pub const EXPORT_LIMIT: usize = 1000;

    /// Timestamp format stored with each entry
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
}

/// Batch geocoding pacing
pub mod batch {
    /// Pause between two consecutive requests, in milliseconds
    pub const REQUEST_DELAY_MS: u64 = 500;
}

/// HTTP client identity
pub fn user_agent() -> String {
    format!("pelakoor/{}", env!("CARGO_PKG_VERSION"))
}
