//! Coordinate notation conversions
//!
//! Decimal degrees to degrees/minutes/seconds, degrees/decimal minutes,
//! UTM on the WGS84 ellipsoid, and geohash.

use crate::constants::geo::{WGS84_A, WGS84_F};
use crate::coord::{Axis, Coordinates};
use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// A value split into whole degrees, whole minutes and decimal seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dms {
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: f64,
    pub hemisphere: char,
}

impl Dms {
    /// Decompose a decimal value by repeated floor/fraction steps
    pub fn from_decimal(decimal: f64, axis: Axis) -> Self {
        let absolute = decimal.abs();
        let degrees = absolute.floor();
        let minutes_float = (absolute - degrees) * 60.0;
        let minutes = minutes_float.floor();
        let seconds = (minutes_float - minutes) * 60.0;

        Self {
            degrees: degrees as u32,
            minutes: minutes as u32,
            seconds,
            hemisphere: axis.hemisphere(decimal),
        }
    }

    /// Reassemble signed decimal degrees
    pub fn to_decimal(&self) -> f64 {
        let magnitude =
            f64::from(self.degrees) + f64::from(self.minutes) / 60.0 + self.seconds / 3600.0;
        match self.hemisphere {
            'S' | 'W' => -magnitude,
            _ => magnitude,
        }
    }
}

impl fmt::Display for Dms {
    /// Seconds are rounded to hundredths first and carried, so `60.00"` never shows
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_seconds =
            f64::from(self.degrees) * 3600.0 + f64::from(self.minutes) * 60.0 + self.seconds;
        let hundredths = (total_seconds * 100.0).round() as u64;

        write!(
            f,
            "{}° {}' {:.2}\" {}",
            hundredths / 360_000,
            (hundredths / 6_000) % 60,
            (hundredths % 6_000) as f64 / 100.0,
            self.hemisphere
        )
    }
}

/// Degrees, minutes and seconds notation: `D° M' S.ss" H`
pub fn to_dms(decimal: f64, axis: Axis) -> String {
    Dms::from_decimal(decimal, axis).to_string()
}

/// Degrees and decimal minutes notation: `D° M.mmmm' H`
pub fn to_dm(decimal: f64, axis: Axis) -> String {
    // Ten-thousandths of a minute, rounded before splitting off the degrees
    let units = (decimal.abs() * 600_000.0).round() as u64;

    format!(
        "{}° {:.4}' {}",
        units / 600_000,
        (units % 600_000) as f64 / 10_000.0,
        axis.hemisphere(decimal)
    )
}

/// A UTM position on WGS84
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Utm {
    pub zone: u8,
    pub band: char,
    pub hemisphere: char,
    pub easting: f64,
    pub northing: f64,
}

impl fmt::Display for Utm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {:.0}m E {:.0}m N",
            self.zone, self.band, self.easting, self.northing
        )
    }
}

const UTM_SCALE: f64 = 0.9996;
const UTM_FALSE_EASTING: f64 = 500_000.0;
const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;
const UTM_BANDS: &[u8] = b"CDEFGHJKLMNPQRSTUVWX";

/// Zone number, including the Norway and Svalbard exceptions
fn utm_zone(lat: f64, lon: f64) -> u8 {
    if (56.0..64.0).contains(&lat) && (3.0..12.0).contains(&lon) {
        return 32;
    }
    if (72.0..=84.0).contains(&lat) {
        match lon {
            l if (0.0..9.0).contains(&l) => return 31,
            l if (9.0..21.0).contains(&l) => return 33,
            l if (21.0..33.0).contains(&l) => return 35,
            l if (33.0..42.0).contains(&l) => return 37,
            _ => {}
        }
    }
    let zone = ((lon + 180.0) / 6.0).floor() as u8 + 1;
    zone.min(60)
}

fn utm_band(lat: f64) -> char {
    let idx = (((lat + 80.0) / 8.0).floor() as usize).min(UTM_BANDS.len() - 1);
    UTM_BANDS[idx] as char
}

/// Project a coordinate onto its UTM zone (transverse Mercator, Snyder's series)
///
/// UTM is only defined between 80°S and 84°N.
pub fn to_utm(coords: Coordinates) -> Result<Utm> {
    coords.validate()?;
    let Coordinates { lat, lon } = coords;
    if !(-80.0..=84.0).contains(&lat) {
        return Err(Error::InvalidCoordinates(format!(
            "Latitude {} is outside the UTM range [-80, 84]",
            lat
        )));
    }

    let zone = utm_zone(lat, lon);
    let central_meridian = (f64::from(zone) - 1.0) * 6.0 - 180.0 + 3.0;

    let e2 = WGS84_F * (2.0 - WGS84_F);
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    let ep2 = e2 / (1.0 - e2);

    let phi = lat.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let tan_phi = phi.tan();

    let n = WGS84_A / (1.0 - e2 * sin_phi * sin_phi).sqrt();
    let t = tan_phi * tan_phi;
    let c = ep2 * cos_phi * cos_phi;
    let a = cos_phi * (lon - central_meridian).to_radians();

    let m = WGS84_A
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin());

    let easting = UTM_SCALE
        * n
        * (a + (1.0 - t + c) * a.powi(3) / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0)
        + UTM_FALSE_EASTING;

    let mut northing = UTM_SCALE
        * (m + n
            * tan_phi
            * (a * a / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6) / 720.0));

    let hemisphere = if lat >= 0.0 { 'N' } else { 'S' };
    if hemisphere == 'S' {
        northing += UTM_FALSE_NORTHING_SOUTH;
    }

    Ok(Utm {
        zone,
        band: utm_band(lat),
        hemisphere,
        easting,
        northing,
    })
}

const GEOHASH_ALPHABET: &[u8] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Longest geohash produced; beyond this f64 input has no more precision
pub const GEOHASH_MAX_PRECISION: usize = 12;

/// Standard base32 geohash of `precision` characters (capped at 12)
pub fn geohash(coords: Coordinates, precision: usize) -> Result<String> {
    coords.validate()?;

    let precision = precision.min(GEOHASH_MAX_PRECISION);
    let (mut lat_lo, mut lat_hi) = (-90.0, 90.0);
    let (mut lon_lo, mut lon_hi) = (-180.0, 180.0);

    let mut hash = String::with_capacity(precision);
    let mut even_bit = true;
    let mut bits = 0u8;
    let mut idx = 0usize;

    while hash.len() < precision {
        if even_bit {
            let mid = (lon_lo + lon_hi) / 2.0;
            if coords.lon >= mid {
                idx = idx * 2 + 1;
                lon_lo = mid;
            } else {
                idx *= 2;
                lon_hi = mid;
            }
        } else {
            let mid = (lat_lo + lat_hi) / 2.0;
            if coords.lat >= mid {
                idx = idx * 2 + 1;
                lat_lo = mid;
            } else {
                idx *= 2;
                lat_hi = mid;
            }
        }
        even_bit = !even_bit;

        bits += 1;
        if bits == 5 {
            hash.push(GEOHASH_ALPHABET[idx] as char);
            bits = 0;
            idx = 0;
        }
    }

    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Read numbers back out of a formatted DMS/DM string
    fn parse_formatted(s: &str) -> f64 {
        let parts: Vec<&str> = s.split_whitespace().collect();
        let hemisphere = parts.last().copied().unwrap();
        let numbers: Vec<f64> = parts[..parts.len() - 1]
            .iter()
            .map(|p| p.trim_end_matches(['°', '\'', '"']).parse::<f64>().unwrap())
            .collect();
        let magnitude = match numbers.as_slice() {
            [d, m, s] => d + m / 60.0 + s / 3600.0,
            [d, m] => d + m / 60.0,
            _ => panic!("unexpected format: {}", s),
        };
        if hemisphere == "S" || hemisphere == "W" {
            -magnitude
        } else {
            magnitude
        }
    }

    #[test]
    fn test_to_dms_format() {
        assert_eq!(to_dms(-6.2088, Axis::Lat), "6° 12' 31.68\" S");
        assert_eq!(to_dms(106.8456, Axis::Lon), "106° 50' 44.16\" E");
    }

    #[test]
    fn test_to_dm_format() {
        assert_eq!(to_dm(48.8566, Axis::Lat), "48° 51.3960' N");
        assert_eq!(to_dm(-0.1278, Axis::Lon), "0° 7.6680' W");
    }

    #[test]
    fn test_rounding_carries_into_minutes_and_degrees() {
        assert_eq!(to_dms(1.999_999_9, Axis::Lat), "2° 0' 0.00\" N");
        assert_eq!(to_dm(1.999_999_9, Axis::Lat), "2° 0.0000' N");
        assert_eq!(to_dms(-0.499_999_99, Axis::Lon), "0° 30' 0.00\" W");
        assert_eq!(to_dm(-0.499_999_99, Axis::Lon), "0° 30.0000' W");
        assert_eq!(to_dms(179.999_999_9, Axis::Lon), "180° 0' 0.00\" E");
    }

    #[test]
    fn test_dms_round_trip() {
        for value in [0.0_f64, 1.5, -33.8688, 89.999_99, -179.123_456, 45.000_01] {
            let axis = if value.abs() > 90.0 { Axis::Lon } else { Axis::Lat };

            let dms = Dms::from_decimal(value, axis);
            assert!((dms.to_decimal() - value).abs() < 1e-9);

            let from_dms = parse_formatted(&to_dms(value, axis));
            assert!((from_dms - value).abs() < 1e-4, "dms {} -> {}", value, from_dms);

            let from_dm = parse_formatted(&to_dm(value, axis));
            assert!((from_dm - value).abs() < 1e-4, "dm {} -> {}", value, from_dm);
        }
    }

    #[test]
    fn test_utm_central_meridian_on_equator() {
        let utm = to_utm(Coordinates::new(0.0, 3.0)).unwrap();
        assert_eq!(utm.zone, 31);
        assert_eq!(utm.band, 'N');
        assert_eq!(utm.hemisphere, 'N');
        assert_relative_eq!(utm.easting, 500_000.0, epsilon = 1e-6);
        assert_relative_eq!(utm.northing, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_utm_paris() {
        let utm = to_utm(Coordinates::new(48.858_373_6, 2.292_292_6)).unwrap();
        assert_eq!(utm.zone, 31);
        assert_eq!(utm.band, 'U');
        assert!((utm.easting - 448_090.0).abs() < 2.0, "easting {}", utm.easting);
        assert!((utm.northing - 5_411_953.0).abs() < 2.0, "northing {}", utm.northing);
    }

    #[test]
    fn test_utm_southern_hemisphere() {
        let utm = to_utm(Coordinates::new(-33.8688, 151.2093)).unwrap();
        assert_eq!(utm.zone, 56);
        assert_eq!(utm.band, 'H');
        assert_eq!(utm.hemisphere, 'S');
        assert!((utm.easting - 334_369.0).abs() < 2.0, "easting {}", utm.easting);
        assert!((utm.northing - 6_250_948.0).abs() < 2.0, "northing {}", utm.northing);
    }

    #[test]
    fn test_utm_zone_exceptions() {
        assert_eq!(to_utm(Coordinates::new(60.0, 5.0)).unwrap().zone, 32);
        assert_eq!(to_utm(Coordinates::new(78.0, 15.0)).unwrap().zone, 33);
        assert_eq!(to_utm(Coordinates::new(0.0, 180.0)).unwrap().zone, 60);
    }

    #[test]
    fn test_utm_rejects_polar_latitudes() {
        assert!(to_utm(Coordinates::new(85.0, 0.0)).is_err());
        assert!(to_utm(Coordinates::new(-81.0, 0.0)).is_err());
    }

    #[test]
    fn test_geohash_known_values() {
        assert_eq!(
            geohash(Coordinates::new(57.64911, 10.40744), 11).unwrap(),
            "u4pruydqqvj"
        );
        assert_eq!(geohash(Coordinates::new(42.6, -5.6), 5).unwrap(), "ezs42");
    }

    #[test]
    fn test_geohash_precision_is_capped() {
        let hash = geohash(Coordinates::new(1.0, 1.0), 40).unwrap();
        assert_eq!(hash.len(), GEOHASH_MAX_PRECISION);
        assert!(geohash(Coordinates::new(1.0, 1.0), 0).unwrap().is_empty());
    }
}
