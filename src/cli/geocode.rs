//! Geocoding handlers: forward, reverse and batch lookups

use crate::cli::{prompt, App};
use crate::constants::batch::REQUEST_DELAY_MS;
use crate::coord::Coordinates;
use crate::error::Result;
use crate::format::url::all_links;
use crate::format::Table;
use crate::geocode::batch::{geocode_batch, BatchOutcome};
use crate::geocode::GeocodeResult;
use std::time::Duration;

/// Field/value table for one result
fn result_table(result: &GeocodeResult, title: &str) -> Table {
    let mut table = Table::new(["Field", "Value"]).with_title(title).with_max_width(70);
    table.push_row(["Address".to_string(), result.formatted_address.clone()]);
    table.push_row(["Latitude".to_string(), format!("{:.6}", result.latitude)]);
    table.push_row(["Longitude".to_string(), format!("{:.6}", result.longitude)]);
    table.push_row(["Provider".to_string(), result.provider_label.clone()]);
    for (key, value) in &result.details {
        table.push_row([key.clone(), value.clone()]);
    }
    if let Some([south, north, west, east]) = result.bounding_box {
        table.push_row([
            "Bounding box".to_string(),
            format!("S {:.4}, N {:.4}, W {:.4}, E {:.4}", south, north, west, east),
        ]);
    }
    table
}

fn print_map_links(app: &App, coords: Coordinates) {
    println!("{}", app.ui.heading("Map links"));
    for (name, url) in all_links(coords) {
        println!("  {}: {}", name, app.ui.info(&url));
    }
}

/// Address to coordinates
pub async fn address_to_coordinates(app: &mut App) -> Result<()> {
    let address = prompt::text("Enter address:")?;
    let Some(provider) = prompt::select_provider(app)? else {
        return Ok(());
    };
    let label = app.gateway.label(provider);

    let spinner = app.ui.spinner(&format!("Searching with {}...", label));
    let results = app.gateway.geocode(&address, provider.as_str()).await;
    spinner.finish_and_clear();
    let results = results?;

    if results.is_empty() {
        println!("{}", app.ui.warn(&format!("No results found for \"{}\"", address)));
        return Ok(());
    }

    println!("{}", app.ui.success(&format!("Found {} result(s)", results.len())));
    for (i, result) in results.iter().enumerate() {
        println!("{}", result_table(result, &format!("Result {}", i + 1)));
    }
    let first = &results[0];
    print_map_links(app, Coordinates::new(first.latitude, first.longitude));

    app.record("geocode", address, &results, label);
    Ok(())
}

/// Coordinates to address
pub async fn coordinates_to_address(app: &mut App) -> Result<()> {
    let coords = prompt::coordinates("")?;
    let Some(provider) = prompt::select_provider(app)? else {
        return Ok(());
    };
    let label = app.gateway.label(provider);

    let spinner = app.ui.spinner(&format!("Looking up address with {}...", label));
    let result = app
        .gateway
        .reverse_geocode(coords.lat, coords.lon, provider.as_str())
        .await;
    spinner.finish_and_clear();

    let Some(result) = result? else {
        println!("{}", app.ui.warn(&format!("No address found at {}", coords)));
        return Ok(());
    };

    println!("{}", result_table(&result, "Address"));
    print_map_links(app, coords);

    app.record("reverse_geocode", coords.to_string(), &result, label);
    Ok(())
}

/// Addresses typed one per line until an empty line
fn collect_addresses() -> Result<Vec<String>> {
    println!("Enter one address per line, empty line to finish.");
    let mut addresses = Vec::new();
    loop {
        let line = prompt::optional_text(&format!("Address {}:", addresses.len() + 1))?;
        if line.is_empty() {
            break;
        }
        addresses.push(line);
    }
    Ok(addresses)
}

/// Geocode several addresses in sequence
pub async fn batch(app: &mut App) -> Result<()> {
    let addresses = collect_addresses()?;
    if addresses.is_empty() {
        println!("{}", app.ui.warn("No addresses entered"));
        return Ok(());
    }
    let Some(provider) = prompt::select_provider(app)? else {
        return Ok(());
    };
    let label = app.gateway.label(provider);

    let bar = app.ui.progress_bar(addresses.len() as u64, "Geocoding");
    let outcomes = geocode_batch(
        &app.gateway,
        &addresses,
        provider.as_str(),
        Duration::from_millis(REQUEST_DELAY_MS),
        |done| bar.set_position(done as u64),
    )
    .await;
    bar.finish_and_clear();

    let mut table = Table::new(["#", "Address", "Latitude", "Longitude", "Status"])
        .with_title("Batch results")
        .with_max_width(50);
    for (i, outcome) in outcomes.iter().enumerate() {
        let n = (i + 1).to_string();
        match outcome {
            BatchOutcome::Found {
                address,
                result: Some(hit),
            } => table.push_row([
                n,
                address.clone(),
                format!("{:.6}", hit.latitude),
                format!("{:.6}", hit.longitude),
                "OK".to_string(),
            ]),
            BatchOutcome::Found { address, result: None } => table.push_row([
                n,
                address.clone(),
                "-".to_string(),
                "-".to_string(),
                "Not found".to_string(),
            ]),
            BatchOutcome::Failed { address, error } => table.push_row([
                n,
                address.clone(),
                "-".to_string(),
                "-".to_string(),
                error.clone(),
            ]),
        }
    }
    println!("{}", table);

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    let summary = format!("{}/{} addresses geocoded", succeeded, outcomes.len());
    if succeeded == outcomes.len() {
        println!("{}", app.ui.success(&summary));
    } else {
        println!("{}", app.ui.warn(&summary));
    }

    app.record("batch_geocode", addresses.join("; "), &outcomes, label);
    Ok(())
}
