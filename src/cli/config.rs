//! API configuration and application settings

use crate::cli::prompt::{self, provider_choices};
use crate::cli::App;
use crate::config::Features;
use crate::error::Result;
use crate::format::Table;
use crate::geocode::ProviderId;
use inquire::{MultiSelect, Password, PasswordDisplayMode, Select};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigAction {
    SetupKeys,
    View,
    SetDefault,
    ToggleProviders,
    TestConnections,
    Back,
}

impl ConfigAction {
    const ALL: [ConfigAction; 6] = [
        ConfigAction::SetupKeys,
        ConfigAction::View,
        ConfigAction::SetDefault,
        ConfigAction::ToggleProviders,
        ConfigAction::TestConnections,
        ConfigAction::Back,
    ];
}

impl fmt::Display for ConfigAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigAction::SetupKeys => "Set up API keys",
            ConfigAction::View => "View current configuration",
            ConfigAction::SetDefault => "Set default provider",
            ConfigAction::ToggleProviders => "Enable or disable providers",
            ConfigAction::TestConnections => "Test API connections",
            ConfigAction::Back => "Back",
        };
        f.write_str(label)
    }
}

/// Feature toggles offered in application settings
const FEATURE_LABELS: [&str; 3] = ["Save history", "Show progress indicators", "Colored output"];

fn feature_flags(features: &Features) -> [bool; 3] {
    [features.save_history, features.show_progress, features.color_output]
}

/// Apply the indices picked in the settings prompt
fn features_from_selection(current: Features, selected: &[usize]) -> Features {
    Features {
        save_history: selected.contains(&0),
        show_progress: selected.contains(&1),
        color_output: selected.contains(&2),
        ..current
    }
}

/// First four characters then a mask
fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    format!("{}****", prefix)
}

/// Offer key setup when only the keyless provider is available
pub fn first_run_check(app: &mut App) -> Result<()> {
    if app.config.active_providers() != [ProviderId::Osm] {
        return Ok(());
    }
    println!(
        "{}",
        app.ui
            .info("Only OpenStreetMap is active. Google Maps, Mapbox and HERE need an API key.")
    );
    if prompt::confirm("Set up API keys now?", false)? {
        setup_keys(app)?;
    }
    Ok(())
}

/// API configuration menu loop
pub async fn api_configuration(app: &mut App) -> Result<()> {
    loop {
        let action = Select::new("API configuration:", ConfigAction::ALL.to_vec()).prompt()?;
        match action {
            ConfigAction::SetupKeys => setup_keys(app)?,
            ConfigAction::View => view(app),
            ConfigAction::SetDefault => set_default(app)?,
            ConfigAction::ToggleProviders => toggle_providers(app)?,
            ConfigAction::TestConnections => test_connections(app).await,
            ConfigAction::Back => return Ok(()),
        }
    }
}

fn setup_keys(app: &mut App) -> Result<()> {
    let keyed: Vec<ProviderId> = ProviderId::ALL
        .into_iter()
        .filter(|id| id.requires_credential())
        .collect();
    let choices = provider_choices(app, &keyed);
    let provider = Select::new("Provider to configure:", choices).prompt()?.id;

    let credentials = app.config.credentials();
    if let Some(existing) = provider.credential_var().and_then(|var| credentials.get(var)) {
        println!("Current key: {}", app.ui.dim(&mask_key(&existing)));
    }

    let key = Password::new(&format!("{} API key:", app.config.config().provider_name(provider)))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;
    if key.trim().is_empty() {
        println!("{}", app.ui.warn("Empty key, nothing changed"));
        return Ok(());
    }

    app.config.set_credential(provider, &key)?;
    println!("{}", app.ui.success("API key saved"));

    let active = app
        .config
        .config()
        .provider(provider)
        .map(|p| p.active)
        .unwrap_or(false);
    if !active && prompt::confirm("Enable this provider now?", true)? {
        app.config.set_provider_active(provider, true)?;
        println!("{}", app.ui.success("Provider enabled"));
    }
    Ok(())
}

/// Provider overview
fn config_table(app: &App) -> Table {
    let config = app.config.config();
    let mut table = Table::new(["Provider", "Active", "Key required", "Key set", "Default"])
        .with_title("Providers");
    for id in ProviderId::ALL {
        let Some(provider) = config.provider(id) else {
            continue;
        };
        let yes_no = |b: bool| if b { "Yes" } else { "No" }.to_string();
        table.push_row([
            provider.display_name.clone(),
            yes_no(provider.active),
            yes_no(provider.requires_credential),
            if provider.requires_credential {
                yes_no(app.config.has_credential(id))
            } else {
                "-".to_string()
            },
            if config.default_provider == id { "*" } else { "" }.to_string(),
        ]);
    }
    table
}

fn view(app: &App) {
    println!("{}", config_table(app));

    let features = app.config.config().features;
    for (label, on) in FEATURE_LABELS.iter().zip(feature_flags(&features)) {
        println!("  {}: {}", label, if on { "on" } else { "off" });
    }
    println!("{}", app.ui.dim(&format!("Config file: {}", app.config.path().display())));
}

fn set_default(app: &mut App) -> Result<()> {
    let active = app.config.active_providers();
    if active.is_empty() {
        println!("{}", app.ui.error("No provider is active."));
        return Ok(());
    }
    let cursor = app
        .config
        .preferred_provider()
        .and_then(|p| active.iter().position(|id| *id == p))
        .unwrap_or(0);
    let choice = Select::new("Default provider:", provider_choices(app, &active))
        .with_starting_cursor(cursor)
        .prompt()?;

    app.config.set_default_provider(choice.id)?;
    println!("{}", app.ui.success(&format!("Default provider set to {}", choice)));
    Ok(())
}

fn toggle_providers(app: &mut App) -> Result<()> {
    let all = ProviderId::ALL.to_vec();
    let active = app.config.active_providers();
    let defaults: Vec<usize> = all
        .iter()
        .enumerate()
        .filter(|(_, id)| active.contains(*id))
        .map(|(i, _)| i)
        .collect();

    let picked = MultiSelect::new("Active providers:", provider_choices(app, &all))
        .with_default(&defaults)
        .prompt()?;

    for id in all {
        let on = picked.iter().any(|c| c.id == id);
        if on != active.contains(&id) {
            app.config.set_provider_active(id, on)?;
        }
        if on && !app.config.has_credential(id) {
            println!(
                "{}",
                app.ui.warn(&format!(
                    "{} is active but has no API key yet",
                    app.config.config().provider_name(id)
                ))
            );
        }
    }
    if picked.is_empty() {
        println!("{}", app.ui.warn("Every provider is disabled; geocoding is unavailable."));
    } else {
        println!("{}", app.ui.success("Providers updated"));
    }
    Ok(())
}

async fn test_connections(app: &App) {
    let targets: Vec<ProviderId> = app
        .config
        .active_providers()
        .into_iter()
        .filter(|id| id.requires_credential())
        .collect();
    if targets.is_empty() {
        println!("{}", app.ui.warn("No active provider needs an API key."));
        return;
    }

    for id in targets {
        let name = app.config.config().provider_name(id).to_string();
        if !app.config.has_credential(id) {
            println!("  {}: {}", name, app.ui.warn("no API key"));
            continue;
        }
        let spinner = app.ui.spinner(&format!("Testing {}...", name));
        let outcome = app.gateway.probe(id.as_str()).await;
        spinner.finish_and_clear();
        match outcome {
            Ok(true) => println!("  {}: {}", name, app.ui.success("OK")),
            Ok(false) => println!("  {}: {}", name, app.ui.warn("connected, no results")),
            Err(e) => println!("  {}: {}", name, app.ui.error(&e.to_string())),
        }
    }
}

/// Toggle the saved features
pub fn application_settings(app: &mut App) -> Result<()> {
    let current = app.config.config().features;
    let defaults: Vec<usize> = feature_flags(&current)
        .iter()
        .enumerate()
        .filter(|(_, on)| **on)
        .map(|(i, _)| i)
        .collect();

    let picked = MultiSelect::new("Enabled features:", FEATURE_LABELS.to_vec())
        .with_default(&defaults)
        .raw_prompt()?;
    let selected: Vec<usize> = picked.iter().map(|o| o.index).collect();

    app.config.set_features(features_from_selection(current, &selected))?;
    app.apply_features();
    println!("{}", app.ui.success("Settings saved"));
    Ok(())
}
