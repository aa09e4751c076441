//! Handlers backed by the public geo data services

use crate::cli::{prompt, App};
use crate::error::Result;
use crate::format::units::meters_to_km;
use crate::format::Table;
use crate::geodata::elevation::{meters_to_feet, ElevationClass};
use crate::geodata::sun::format_day_length;
use crate::geodata::timezone::{self, estimate_utc_offset, format_utc_offset};
use chrono::{Duration, Local, NaiveDate};
use inquire::validator::Validation;
use inquire::Text;
use serde_json::json;
use tracing::warn;

const DEFAULT_RADIUS_METERS: u32 = 1000;
const MAX_RADIUS_METERS: u32 = 50_000;
const DEFAULT_PLACE_LIMIT: usize = 10;
const DATE_FORMAT: &str = "%Y-%m-%d";

pub async fn nearby(app: &mut App) -> Result<()> {
    let coords = prompt::coordinates("")?;
    let radius = prompt::positive("Search radius in meters:", DEFAULT_RADIUS_METERS)?.min(MAX_RADIUS_METERS);
    let limit = prompt::positive("Maximum number of places:", DEFAULT_PLACE_LIMIT)?;

    let spinner = app.ui.spinner("Searching nearby places...");
    let places = app.geodata.nearby(coords.lat, coords.lon, radius, limit).await;
    spinner.finish_and_clear();
    let places = places?;

    if places.is_empty() {
        println!("{}", app.ui.warn(&format!("No places found within {} m", radius)));
        return Ok(());
    }

    let mut table = Table::new(["#", "Name", "Type", "Distance", "Coordinates"])
        .with_title(format!("{} place(s) within {} m", places.len(), radius))
        .with_max_width(40);
    for (i, place) in places.iter().enumerate() {
        let distance = if place.distance < 1000.0 {
            format!("{:.0} m", place.distance)
        } else {
            format!("{:.2} km", meters_to_km(place.distance))
        };
        table.push_row([
            (i + 1).to_string(),
            place.name.clone(),
            place.kind.clone(),
            distance,
            place.position.to_string(),
        ]);
    }
    println!("{}", table);

    app.record(
        "nearby",
        format!("{} r={}m", coords, radius),
        &places,
        "OpenStreetMap Overpass",
    );
    Ok(())
}

pub async fn timezone(app: &mut App) -> Result<()> {
    let coords = prompt::coordinates("")?;
    let key = timezone::api_key(app.config.credentials().as_ref());

    let spinner = app.ui.spinner("Looking up time zone...");
    let info = app.geodata.timezone(coords.lat, coords.lon, &key).await;
    spinner.finish_and_clear();

    let info = match info {
        Ok(info) => info,
        Err(e) => {
            warn!(error = %e, "time zone lookup failed");
            None
        }
    };

    let Some(info) = info else {
        let hours = estimate_utc_offset(coords.lon);
        let label = format_utc_offset(i64::from(hours) * 3600);
        println!("{}", app.ui.warn("Time zone service unavailable, estimating from longitude"));
        println!("Estimated offset: {}", app.ui.heading(&label));
        let local = chrono::Utc::now() + Duration::hours(i64::from(hours));
        println!("Estimated local time: {}", local.format("%Y-%m-%d %H:%M:%S"));
        app.record(
            "timezone",
            coords.to_string(),
            &json!({ "estimated": true, "utcOffset": label }),
            "Estimate",
        );
        return Ok(());
    };

    let mut table = Table::new(["Field", "Value"]).with_title("Time zone");
    table.push_row(["Zone".to_string(), info.zone_name.clone()]);
    table.push_row(["Abbreviation".to_string(), info.abbreviation.clone()]);
    table.push_row(["Country".to_string(), info.country_code.clone()]);
    table.push_row(["UTC offset".to_string(), info.utc_offset_label()]);
    table.push_row(["Daylight saving".to_string(), if info.dst { "Yes" } else { "No" }.to_string()]);
    if let Some(local) = info.local_time() {
        table.push_row(["Local time".to_string(), local.format("%Y-%m-%d %H:%M:%S").to_string()]);
    }
    println!("{}", table);

    app.record(
        "timezone",
        coords.to_string(),
        &json!({
            "zoneName": info.zone_name,
            "abbreviation": info.abbreviation,
            "utcOffset": info.utc_offset_label(),
            "dst": info.dst,
        }),
        "TimeZoneDB",
    );
    Ok(())
}

fn date(message: &str) -> Result<NaiveDate> {
    let today = Local::now().date_naive().format(DATE_FORMAT).to_string();
    let input = Text::new(message)
        .with_default(&today)
        .with_validator(|s: &str| {
            if NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).is_ok() {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid("Use the YYYY-MM-DD format".into()))
            }
        })
        .prompt()?;
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|e| crate::error::Error::Prompt(format!("Invalid date: {}", e)))
}

pub async fn sun_times(app: &mut App) -> Result<()> {
    let coords = prompt::coordinates("")?;
    let day = date("Date (YYYY-MM-DD):")?;

    let spinner = app.ui.spinner("Fetching sun times...");
    let times = app.geodata.sun_times(coords.lat, coords.lon, day).await;
    spinner.finish_and_clear();
    let times = times?;

    let offset = Duration::hours(i64::from(estimate_utc_offset(coords.lon)));
    let offset_label = format_utc_offset(offset.num_seconds());

    let mut table = Table::new(["Event", "UTC", offset_label.as_str()])
        .with_title(format!("Sun times on {}", day.format(DATE_FORMAT)));
    for (name, at) in times.events() {
        table.push_row([
            name.to_string(),
            at.format("%H:%M:%S").to_string(),
            (at + offset).format("%H:%M:%S").to_string(),
        ]);
    }
    println!("{}", table);
    println!("{}", app.ui.dim("Local column uses an offset estimated from longitude"));
    let length = format_day_length(times.day_length());
    println!("Day length: {}", app.ui.heading(&length));

    let output: serde_json::Map<String, serde_json::Value> = times
        .events()
        .iter()
        .map(|(name, at)| (name.to_string(), at.to_rfc3339().into()))
        .chain(std::iter::once(("Day Length".to_string(), length.clone().into())))
        .collect();
    app.record(
        "sun",
        format!("{} on {}", coords, day.format(DATE_FORMAT)),
        &output,
        "Sunrise-Sunset",
    );
    Ok(())
}

pub async fn elevation(app: &mut App) -> Result<()> {
    let coords = prompt::coordinates("")?;

    let spinner = app.ui.spinner("Fetching elevation...");
    let meters = app.geodata.elevation(coords.lat, coords.lon).await;
    spinner.finish_and_clear();

    let Some(meters) = meters? else {
        println!("{}", app.ui.warn(&format!("No elevation data for {}", coords)));
        return Ok(());
    };

    let class = ElevationClass::from_meters(meters);
    let mut table = Table::new(["Unit", "Elevation"]).with_title(format!("Elevation at {}", coords));
    table.push_row(["Meters".to_string(), format!("{:.1}", meters)]);
    table.push_row(["Feet".to_string(), format!("{:.1}", meters_to_feet(meters))]);
    table.push_row([
        "Above sea level".to_string(),
        if meters >= 0.0 { "Yes" } else { "No" }.to_string(),
    ]);
    println!("{}", table);
    println!("{}", app.ui.info(class.describe()));

    app.record(
        "elevation",
        coords.to_string(),
        &json!({ "meters": meters, "feet": meters_to_feet(meters) }),
        "Open-Elevation",
    );
    Ok(())
}
