//! pelakoor: interactive coordinate toolkit
//!
//! A library and CLI for working with geographic coordinates.
//!
//! ## Features
//!
//! - Forward, reverse and batch geocoding over OpenStreetMap, Google Maps,
//!   Mapbox and HERE
//! - Distance, bearing, polygon area and center calculations
//! - DMS, DM, UTM and geohash notations
//! - Nearby places, time zone, sun times and elevation lookups
//! - Persistent provider configuration and operation history
//!
//! ## Quick Start
//!
//! ```rust
//! use pelakoor::coord::{geometry, Coordinates};
//!
//! let jakarta = Coordinates::new(-6.2088, 106.8456);
//! let bandung = Coordinates::new(-6.9175, 107.6191);
//!
//! let meters = geometry::distance(jakarta, bandung);
//! println!("{:.1} km, heading {}", meters / 1000.0, geometry::compass_direction(jakarta, bandung));
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod format;
pub mod geocode;
pub mod geodata;
pub mod history;

// Re-export commonly used types
pub use config::ConfigStore;
pub use coord::Coordinates;
pub use error::{Error, Result};
pub use geocode::{Gateway, GeocodeResult, ProviderId};
pub use geodata::GeoDataClient;
pub use history::History;
