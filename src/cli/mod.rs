//! Interactive command-line interface
//!
//! A menu loop over the library: each entry has a handler in one of the
//! submodules. Handlers receive the [`App`] explicitly.

pub mod config;
pub mod geocode;
pub mod geodata;
pub mod geometry;
pub mod history;
pub mod prompt;
pub mod ui;

use crate::config::ConfigStore;
use crate::error::{Error, Result};
use crate::geocode::Gateway;
use crate::geodata::GeoDataClient;
use crate::history::History;
use clap::Parser;
use inquire::{InquireError, Select};
use serde::Serialize;
use std::fmt;
use tracing::warn;
use ui::Ui;

/// Interactive coordinate toolkit
#[derive(Parser, Debug)]
#[command(name = "pelakoor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Everything a handler needs
#[derive(Debug)]
pub struct App {
    pub config: ConfigStore,
    pub history: History,
    pub gateway: Gateway,
    pub geodata: GeoDataClient,
    pub ui: Ui,
}

impl App {
    /// Open the stores in the working directory
    pub fn open() -> Result<Self> {
        let config = ConfigStore::open_default()?;
        let mut history = History::load();
        history.set_enabled(config.config().features.save_history);

        let gateway = Gateway::new(config.credentials())?;
        let geodata = GeoDataClient::new()?;
        let ui = Ui::from_features(&config.config().features);

        Ok(Self {
            config,
            history,
            gateway,
            geodata,
            ui,
        })
    }

    /// Re-read the feature toggles after they changed
    pub fn apply_features(&mut self) {
        let features = self.config.config().features;
        self.history.set_enabled(features.save_history);
        self.ui = Ui::from_features(&features);
    }

    /// Record a finished operation; failures are reported, not returned
    pub fn record<T: Serialize>(&mut self, operation: &str, input: impl Into<String>, output: &T, provider: &str) {
        let result = serde_json::to_value(output)
            .map_err(Error::from)
            .and_then(|value| self.history.append(operation, input, value, provider));

        if let Err(e) = result {
            warn!(operation, error = %e, "could not record history");
            println!("{}", self.ui.warn(&format!("History not saved: {}", e)));
        }
    }
}

/// Main menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainAction {
    AddressToCoordinates,
    CoordinatesToAddress,
    BatchGeocode,
    Distance,
    Bearing,
    Area,
    Center,
    Nearby,
    Timezone,
    SunTimes,
    Elevation,
    RandomCoordinate,
    ConvertFormats,
    History,
    ApiConfiguration,
    Settings,
    Exit,
}

impl MainAction {
    pub const ALL: [MainAction; 17] = [
        MainAction::AddressToCoordinates,
        MainAction::CoordinatesToAddress,
        MainAction::BatchGeocode,
        MainAction::Distance,
        MainAction::Bearing,
        MainAction::Area,
        MainAction::Center,
        MainAction::Nearby,
        MainAction::Timezone,
        MainAction::SunTimes,
        MainAction::Elevation,
        MainAction::RandomCoordinate,
        MainAction::ConvertFormats,
        MainAction::History,
        MainAction::ApiConfiguration,
        MainAction::Settings,
        MainAction::Exit,
    ];

    fn label(self) -> &'static str {
        match self {
            MainAction::AddressToCoordinates => "[Geocoding] Address to coordinates",
            MainAction::CoordinatesToAddress => "[Geocoding] Coordinates to address",
            MainAction::BatchGeocode => "[Geocoding] Batch geocoding",
            MainAction::Distance => "[Calculate] Distance between points",
            MainAction::Bearing => "[Calculate] Bearing and compass direction",
            MainAction::Area => "[Calculate] Polygon area",
            MainAction::Center => "[Calculate] Center point",
            MainAction::Nearby => "[Location] Nearby places",
            MainAction::Timezone => "[Location] Time zone",
            MainAction::SunTimes => "[Location] Sunrise and sunset",
            MainAction::Elevation => "[Location] Elevation",
            MainAction::RandomCoordinate => "[Tools] Random coordinate",
            MainAction::ConvertFormats => "[Tools] Coordinate format converter",
            MainAction::History => "[Settings] History",
            MainAction::ApiConfiguration => "[Settings] API configuration",
            MainAction::Settings => "[Settings] Application settings",
            MainAction::Exit => "Exit",
        }
    }
}

impl fmt::Display for MainAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

async fn dispatch(app: &mut App, action: MainAction) -> Result<()> {
    match action {
        MainAction::AddressToCoordinates => geocode::address_to_coordinates(app).await,
        MainAction::CoordinatesToAddress => geocode::coordinates_to_address(app).await,
        MainAction::BatchGeocode => geocode::batch(app).await,
        MainAction::Distance => geometry::distance(app),
        MainAction::Bearing => geometry::bearing(app),
        MainAction::Area => geometry::area(app),
        MainAction::Center => geometry::center(app),
        MainAction::Nearby => geodata::nearby(app).await,
        MainAction::Timezone => geodata::timezone(app).await,
        MainAction::SunTimes => geodata::sun_times(app).await,
        MainAction::Elevation => geodata::elevation(app).await,
        MainAction::RandomCoordinate => geometry::random_coordinate(app),
        MainAction::ConvertFormats => geometry::convert_formats(app),
        MainAction::History => history::run(app),
        MainAction::ApiConfiguration => config::api_configuration(app).await,
        MainAction::Settings => config::application_settings(app),
        MainAction::Exit => Ok(()),
    }
}

fn banner(ui: &Ui) {
    println!(
        "{}",
        ui.heading(&format!("pelakoor v{}", env!("CARGO_PKG_VERSION")))
    );
    println!("{}", ui.dim("Coordinate toolkit: geocoding, geometry and location data"));
    println!("{}", ui.dim(&"━".repeat(60)));
}

/// Run the menu loop until the user exits
pub async fn run(_cli: Cli) -> Result<()> {
    let mut app = App::open()?;
    banner(&app.ui);

    match config::first_run_check(&mut app) {
        Ok(()) | Err(Error::Prompt(_)) => {}
        Err(e) => println!("{}", app.ui.error(&format!("Error: {}", e))),
    }

    loop {
        let action = match Select::new("What would you like to do?", MainAction::ALL.to_vec())
            .with_page_size(MainAction::ALL.len())
            .prompt()
        {
            Ok(action) => action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };

        if action == MainAction::Exit {
            break;
        }

        match dispatch(&mut app, action).await {
            Ok(()) => {}
            Err(Error::Prompt(msg)) => println!("{}", app.ui.dim(&msg)),
            Err(e) => println!("{}", app.ui.error(&format!("Error: {}", e))),
        }
        println!("{}", app.ui.dim(&"━".repeat(60)));
    }

    println!("{}", app.ui.success("Thanks for using pelakoor!"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_flag() {
        assert_eq!(Cli::parse_from(["pelakoor"]).log_level(), "warn");
        assert_eq!(Cli::parse_from(["pelakoor", "-v"]).log_level(), "info");
        assert_eq!(Cli::parse_from(["pelakoor", "-vv"]).log_level(), "debug");
        assert_eq!(Cli::parse_from(["pelakoor", "--verbose", "-vv"]).log_level(), "debug");
    }

    #[test]
    fn test_rejects_unknown_arguments() {
        assert!(Cli::try_parse_from(["pelakoor", "geocode"]).is_err());
    }

    #[test]
    fn test_menu_ends_with_exit() {
        assert_eq!(MainAction::ALL.last(), Some(&MainAction::Exit));
        let labels: std::collections::HashSet<String> =
            MainAction::ALL.iter().map(|a| a.to_string()).collect();
        assert_eq!(labels.len(), MainAction::ALL.len());
    }
}
