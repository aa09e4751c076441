//! Handlers for the offline calculations and coordinate tools

use crate::cli::{prompt, App};
use crate::coord::convert::{geohash, to_dm, to_dms, to_utm};
use crate::coord::geometry;
use crate::coord::random::{random_in, Region};
use crate::coord::{Axis, Coordinates};
use crate::error::Result;
use crate::format::units::{
    format_minutes, group_thousands, km_to_miles, km_to_nautical_miles, meters_to_km,
    square_meters_to_acres, square_meters_to_hectares, square_meters_to_km2, travel_minutes,
    DRIVING_KMH, WALKING_KMH,
};
use crate::format::url::all_links;
use crate::format::Table;
use inquire::Select;
use serde_json::json;

const LOCAL: &str = "Local";
const GEOHASH_PRECISION: usize = 9;
const MAX_RANDOM_COUNT: u32 = 100;

fn inputs(points: &[Coordinates]) -> String {
    points
        .iter()
        .map(|p| format!("({})", p))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn distance(app: &mut App) -> Result<()> {
    let from = prompt::coordinates("Point 1")?;
    let to = prompt::coordinates("Point 2")?;

    let meters = geometry::distance(from, to);
    let km = meters_to_km(meters);

    let mut table = Table::new(["Unit", "Distance"]).with_title("Distance");
    table.push_row(["Kilometers".to_string(), format!("{:.3}", km)]);
    table.push_row(["Miles".to_string(), format!("{:.3}", km_to_miles(km))]);
    table.push_row(["Meters".to_string(), format!("{:.1}", meters)]);
    table.push_row(["Nautical miles".to_string(), format!("{:.3}", km_to_nautical_miles(km))]);
    println!("{}", table);

    println!(
        "Walking ({} km/h): {}",
        WALKING_KMH,
        format_minutes(travel_minutes(km, WALKING_KMH))
    );
    println!(
        "Driving ({} km/h): {}",
        DRIVING_KMH,
        format_minutes(travel_minutes(km, DRIVING_KMH))
    );

    app.record(
        "distance",
        inputs(&[from, to]),
        &json!({ "meters": meters, "kilometers": km, "miles": km_to_miles(km) }),
        LOCAL,
    );
    Ok(())
}

pub fn bearing(app: &mut App) -> Result<()> {
    let from = prompt::coordinates("From")?;
    let to = prompt::coordinates("To")?;

    let degrees = geometry::bearing(from, to);
    let compass = geometry::compass_label(degrees);

    println!("Bearing: {}", app.ui.heading(&format!("{:.2}°", degrees)));
    println!("Direction: {}", app.ui.heading(compass));
    println!(
        "{}",
        app.ui.dim(&format!(
            "Distance: {:.3} km",
            meters_to_km(geometry::distance(from, to))
        ))
    );

    app.record(
        "bearing",
        inputs(&[from, to]),
        &json!({ "bearing": degrees, "direction": compass }),
        LOCAL,
    );
    Ok(())
}

pub fn area(app: &mut App) -> Result<()> {
    println!("Enter the polygon vertices in order (at least 3).");
    let vertices = prompt::points(3)?;

    let m2 = geometry::polygon_area(&vertices)?;
    let perimeter = geometry::polygon_perimeter(&vertices)?;

    let mut table = Table::new(["Unit", "Area"]).with_title(format!("Polygon ({} vertices)", vertices.len()));
    table.push_row(["Square meters".to_string(), group_thousands(m2)]);
    table.push_row(["Hectares".to_string(), format!("{:.4}", square_meters_to_hectares(m2))]);
    table.push_row(["Square kilometers".to_string(), format!("{:.6}", square_meters_to_km2(m2))]);
    table.push_row(["Acres".to_string(), format!("{:.4}", square_meters_to_acres(m2))]);
    println!("{}", table);
    println!("Perimeter: {:.3} km", meters_to_km(perimeter));

    app.record(
        "area",
        inputs(&vertices),
        &json!({ "squareMeters": m2, "perimeterMeters": perimeter }),
        LOCAL,
    );
    Ok(())
}

pub fn center(app: &mut App) -> Result<()> {
    println!("Enter the points (at least 2).");
    let points = prompt::points(2)?;

    let geographic = geometry::center(&points)?;
    let bounds = geometry::center_of_bounds(&points)?;

    println!("Geographic center: {}", app.ui.heading(&geographic.to_string()));
    println!("Bounding box center: {}", bounds);
    for (name, url) in all_links(geographic) {
        println!("  {}: {}", name, app.ui.info(&url));
    }

    app.record(
        "center",
        inputs(&points),
        &json!({ "center": geographic, "boundsCenter": bounds }),
        LOCAL,
    );
    Ok(())
}

/// Every notation for one coordinate
pub fn notations(coords: Coordinates) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Decimal", coords.to_string()),
        (
            "Degrees, minutes",
            format!("{}, {}", to_dm(coords.lat, Axis::Lat), to_dm(coords.lon, Axis::Lon)),
        ),
        (
            "Degrees, minutes, seconds",
            format!("{}, {}", to_dms(coords.lat, Axis::Lat), to_dms(coords.lon, Axis::Lon)),
        ),
    ];
    rows.push((
        "UTM",
        to_utm(coords)
            .map(|utm| utm.to_string())
            .unwrap_or_else(|_| "n/a (outside 80°S to 84°N)".to_string()),
    ));
    if let Ok(hash) = geohash(coords, GEOHASH_PRECISION) {
        rows.push(("Geohash", hash));
    }
    rows
}

pub fn convert_formats(app: &mut App) -> Result<()> {
    let coords = prompt::coordinates("")?;

    let mut table = Table::new(["Format", "Value"]).with_title("Coordinate formats");
    for (name, value) in notations(coords) {
        table.push_row([name.to_string(), value]);
    }
    println!("{}", table);
    for (name, url) in all_links(coords) {
        println!("  {}: {}", name, app.ui.info(&url));
    }

    let output: serde_json::Map<String, serde_json::Value> = notations(coords)
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.into()))
        .collect();
    app.record("convert", coords.to_string(), &output, LOCAL);
    Ok(())
}

pub fn random_coordinate(app: &mut App) -> Result<()> {
    let region = Select::new("Region:", Region::ALL.to_vec()).prompt()?;
    let count = prompt::positive("How many coordinates?", 1u32)?.min(MAX_RANDOM_COUNT);

    let mut rng = rand::thread_rng();
    let points: Vec<Coordinates> = (0..count).map(|_| random_in(region, &mut rng)).collect();

    let mut table = Table::new(["#", "Latitude", "Longitude"]).with_title(format!("Random in {}", region));
    for (i, p) in points.iter().enumerate() {
        table.push_row([(i + 1).to_string(), format!("{:.6}", p.lat), format!("{:.6}", p.lon)]);
    }
    println!("{}", table);
    if let [only] = points.as_slice() {
        for (name, url) in all_links(*only) {
            println!("  {}: {}", name, app.ui.info(&url));
        }
    }

    app.record("random", region.name(), &points, LOCAL);
    Ok(())
}
