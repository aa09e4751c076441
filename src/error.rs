//! Error types for pelakoor

use thiserror::Error;

/// Main error type for pelakoor operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported provider: {0} (expected one of: osm, google, mapbox, here)")]
    UnsupportedProvider(String),

    #[error("{provider} API key not configured (set {}_API_KEY)", .provider.to_uppercase())]
    MissingCredential { provider: String },

    #[error("Geocoding error: {0}")]
    Geocoding(String),

    #[error("Need at least {required} vertices to form a polygon, got {got}")]
    InsufficientVertices { required: usize, got: usize },

    #[error("Need at least {required} points, got {got}")]
    InsufficientPoints { required: usize, got: usize },

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Geo data error: {0}")]
    GeoData(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<inquire::InquireError> for Error {
    fn from(e: inquire::InquireError) -> Self {
        Error::Prompt(e.to_string())
    }
}

/// Result type alias for pelakoor operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_names_env_key() {
        let err = Error::MissingCredential {
            provider: "mapbox".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("mapbox API key not configured"));
        assert!(msg.contains("MAPBOX_API_KEY"));
    }

    #[test]
    fn test_insufficient_vertices_message() {
        let err = Error::InsufficientVertices { required: 3, got: 2 };
        assert_eq!(
            err.to_string(),
            "Need at least 3 vertices to form a polygon, got 2"
        );
    }
}
