//! Default configuration values
//!
//! Named constants for the values written on first run

use crate::geocode::ProviderId;

/// Provider used when the user has not picked one
pub const DEFAULT_PROVIDER: ProviderId = ProviderId::Osm;

/// Record successful operations in the history file
pub const DEFAULT_SAVE_HISTORY: bool = true;

/// Show a progress bar during batch operations
pub const DEFAULT_SHOW_PROGRESS: bool = true;

/// Colorize terminal output
pub const DEFAULT_COLOR_OUTPUT: bool = true;

/// Kept for compatibility with existing config files
pub const DEFAULT_AUTO_SAVE: bool = true;

/// Display name of a provider in a fresh config
pub fn display_name(id: ProviderId) -> &'static str {
    match id {
        ProviderId::Osm => "OpenStreetMap (Nominatim)",
        ProviderId::Google => "Google Maps API",
        ProviderId::Mapbox => "Mapbox API",
        ProviderId::Here => "HERE API",
    }
}

/// Only the keyless baseline provider starts active
pub fn initially_active(id: ProviderId) -> bool {
    !id.requires_credential()
}
