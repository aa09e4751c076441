//! Spherical geometry on decimal-degree coordinates
//!
//! Distances use the haversine formula on the WGS84 equatorial radius,
//! rounded to whole meters, the same sphere as the polygon area
//! (Chamberlain-Duquette, from `geo`).

use crate::constants::geo::WGS84_A;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use geo::{BoundingRect, ChamberlainDuquetteArea, LineString, MultiPoint, Polygon};

/// The 16 compass points, clockwise from north
pub const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Width of one compass sector in degrees
const SECTOR_DEGREES: f64 = 360.0 / 16.0;

/// Great-circle distance between two points in whole meters
pub fn distance(p1: Coordinates, p2: Coordinates) -> f64 {
    let lat1 = p1.lat.to_radians();
    let lat2 = p2.lat.to_radians();
    let half_dlat = (lat2 - lat1) / 2.0;
    let half_dlon = (p2.lon - p1.lon).to_radians() / 2.0;

    let a = half_dlat.sin().powi(2) + lat1.cos() * lat2.cos() * half_dlon.sin().powi(2);
    let central_angle = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    (WGS84_A * central_angle).round()
}

/// Initial bearing from `p1` toward `p2`, in degrees within [0, 360)
pub fn bearing(p1: Coordinates, p2: Coordinates) -> f64 {
    let lat1 = p1.lat.to_radians();
    let lat2 = p2.lat.to_radians();
    let delta_lon = (p2.lon - p1.lon).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    let degrees = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if degrees >= 360.0 {
        0.0
    } else {
        degrees
    }
}

/// Compass label for a bearing in degrees
pub fn compass_label(bearing_degrees: f64) -> &'static str {
    let sector = ((bearing_degrees.rem_euclid(360.0) + SECTOR_DEGREES / 2.0) / SECTOR_DEGREES)
        .floor() as usize;
    COMPASS_POINTS[sector % COMPASS_POINTS.len()]
}

/// Compass direction from `p1` toward `p2`
pub fn compass_direction(p1: Coordinates, p2: Coordinates) -> &'static str {
    compass_label(bearing(p1, p2))
}

fn require_vertices(vertices: &[Coordinates]) -> Result<()> {
    if vertices.len() < 3 {
        return Err(Error::InsufficientVertices {
            required: 3,
            got: vertices.len(),
        });
    }
    Ok(())
}

fn require_points(points: &[Coordinates]) -> Result<()> {
    if points.len() < 2 {
        return Err(Error::InsufficientPoints {
            required: 2,
            got: points.len(),
        });
    }
    Ok(())
}

/// Area of a polygon on the sphere in square meters
///
/// The ring is closed implicitly; vertex order (clockwise or not) does not
/// change the result.
pub fn polygon_area(vertices: &[Coordinates]) -> Result<f64> {
    require_vertices(vertices)?;

    let ring: LineString<f64> = vertices.iter().map(|c| (c.lon, c.lat)).collect();
    let polygon = Polygon::new(ring, vec![]);

    Ok(polygon.chamberlain_duquette_unsigned_area())
}

/// Perimeter of a polygon in meters, including the closing edge
pub fn polygon_perimeter(vertices: &[Coordinates]) -> Result<f64> {
    require_vertices(vertices)?;

    let n = vertices.len();
    Ok((0..n)
        .map(|i| distance(vertices[i], vertices[(i + 1) % n]))
        .sum())
}

/// Geometric center of points on the sphere
///
/// Averages the points as unit vectors and projects the mean back onto
/// the surface.
pub fn center(points: &[Coordinates]) -> Result<Coordinates> {
    require_points(points)?;

    let (mut x, mut y, mut z) = (0.0, 0.0, 0.0);
    for p in points {
        let lat = p.lat.to_radians();
        let lon = p.lon.to_radians();
        x += lat.cos() * lon.cos();
        y += lat.cos() * lon.sin();
        z += lat.sin();
    }

    let n = points.len() as f64;
    let (x, y, z) = (x / n, y / n, z / n);

    let lon = y.atan2(x);
    let hyp = (x * x + y * y).sqrt();
    let lat = z.atan2(hyp);

    Ok(Coordinates::new(lat.to_degrees(), lon.to_degrees()))
}

/// Midpoint of the bounding box around the points
pub fn center_of_bounds(points: &[Coordinates]) -> Result<Coordinates> {
    require_points(points)?;

    let multi: MultiPoint<f64> = points.iter().map(|c| c.to_point()).collect();
    let rect = multi
        .bounding_rect()
        .ok_or_else(|| Error::InsufficientPoints {
            required: 2,
            got: 0,
        })?;

    Ok(Coordinates::from(rect.center()))
}
