//! Coordinates and the pure calculations done on them
//!
//! This module handles:
//! - Great-circle distance, bearing and compass direction
//! - Polygon area/perimeter and center points
//! - Conversions to DMS, DM, UTM and geohash notations
//! - Random coordinates inside named regions

pub mod convert;
pub mod geometry;
pub mod random;

use serde::{Deserialize, Serialize};

/// A geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Create validated coordinates
    pub fn parse(lat: f64, lon: f64) -> crate::error::Result<Self> {
        let coords = Self::new(lat, lon);
        coords.validate()?;
        Ok(coords)
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lon
            )));
        }
        Ok(())
    }

    /// The same position as a `geo` point (x = longitude, y = latitude)
    pub fn to_point(self) -> geo::Point<f64> {
        geo::Point::new(self.lon, self.lat)
    }
}

impl From<geo::Coord<f64>> for Coordinates {
    fn from(c: geo::Coord<f64>) -> Self {
        Self::new(c.y, c.x)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lon)
    }
}

/// Which axis a single decimal value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Lat,
    Lon,
}

impl Axis {
    /// Hemisphere letter for a value on this axis
    pub fn hemisphere(self, decimal: f64) -> char {
        match (self, decimal >= 0.0) {
            (Axis::Lat, true) => 'N',
            (Axis::Lat, false) => 'S',
            (Axis::Lon, true) => 'E',
            (Axis::Lon, false) => 'W',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ranges() {
        assert!(Coordinates::new(90.0, 180.0).validate().is_ok());
        assert!(Coordinates::new(-90.0, -180.0).validate().is_ok());
        assert!(Coordinates::new(90.1, 0.0).validate().is_err());
        assert!(Coordinates::new(0.0, -180.5).validate().is_err());
        assert!(Coordinates::parse(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_point_axis_order() {
        let p = Coordinates::new(-6.2, 106.8).to_point();
        assert_eq!(p.x(), 106.8);
        assert_eq!(p.y(), -6.2);
    }

    #[test]
    fn test_hemisphere_letters() {
        assert_eq!(Axis::Lat.hemisphere(0.0), 'N');
        assert_eq!(Axis::Lat.hemisphere(-0.5), 'S');
        assert_eq!(Axis::Lon.hemisphere(12.0), 'E');
        assert_eq!(Axis::Lon.hemisphere(-12.0), 'W');
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Coordinates::new(48.8566, 2.3522).to_string(),
            "48.856600, 2.352200"
        );
    }
}
