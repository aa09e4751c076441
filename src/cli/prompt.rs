//! Interactive prompts shared by the menu handlers

use crate::cli::App;
use crate::coord::{Axis, Coordinates};
use crate::error::Result;
use crate::geocode::ProviderId;
use inquire::validator::Validation;
use inquire::{Confirm, CustomType, Select, Text};
use std::fmt;

const MAX_POLYGON_VERTICES: usize = 100;

fn axis_range(axis: Axis) -> (f64, f64, &'static str) {
    match axis {
        Axis::Lat => (-90.0, 90.0, "Please enter a valid latitude (-90 to 90)"),
        Axis::Lon => (-180.0, 180.0, "Please enter a valid longitude (-180 to 180)"),
    }
}

/// One latitude or longitude in decimal degrees
pub fn degrees(message: &str, axis: Axis) -> Result<f64> {
    let (min, max, hint) = axis_range(axis);
    let value = CustomType::<f64>::new(message)
        .with_error_message("Please type a number")
        .with_validator(move |v: &f64| {
            if (min..=max).contains(v) {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid(hint.into()))
            }
        })
        .prompt()?;
    Ok(value)
}

/// Latitude then longitude
pub fn coordinates(label: &str) -> Result<Coordinates> {
    let prefix = if label.is_empty() {
        String::new()
    } else {
        format!("{} - ", label)
    };
    let lat = degrees(&format!("{}Latitude:", prefix), Axis::Lat)?;
    let lon = degrees(&format!("{}Longitude:", prefix), Axis::Lon)?;
    Coordinates::parse(lat, lon)
}

/// Points until the user stops, at least `min`
pub fn points(min: usize) -> Result<Vec<Coordinates>> {
    let mut points = Vec::new();
    loop {
        points.push(coordinates(&format!("Point {}", points.len() + 1))?);
        if points.len() >= MAX_POLYGON_VERTICES {
            break;
        }
        if points.len() >= min && !confirm("Add another point?", false)? {
            break;
        }
    }
    Ok(points)
}

/// Non-empty free text
pub fn text(message: &str) -> Result<String> {
    let value = Text::new(message)
        .with_validator(|s: &str| {
            if s.trim().is_empty() {
                Ok(Validation::Invalid("Please enter a value".into()))
            } else {
                Ok(Validation::Valid)
            }
        })
        .prompt()?;
    Ok(value.trim().to_string())
}

/// Free text that may be left empty
pub fn optional_text(message: &str) -> Result<String> {
    Ok(Text::new(message).prompt()?.trim().to_string())
}

pub fn confirm(message: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new(message).with_default(default).prompt()?)
}

/// A positive number with a default
pub fn positive<T>(message: &str, default: T) -> Result<T>
where
    T: Copy + Clone + fmt::Display + std::str::FromStr + PartialOrd + Default + 'static,
{
    let value = CustomType::<T>::new(message)
        .with_default(default)
        .with_error_message("Please type a number")
        .with_validator(|v: &T| {
            if *v > T::default() {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid("Please enter a value above zero".into()))
            }
        })
        .prompt()?;
    Ok(value)
}

/// Provider choice shown in prompts
pub(crate) struct ProviderChoice {
    pub id: ProviderId,
    pub name: String,
}

impl fmt::Display for ProviderChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Choices labelled with the configured display names
pub(crate) fn provider_choices(app: &App, ids: &[ProviderId]) -> Vec<ProviderChoice> {
    let config = app.config.config();
    ids.iter()
        .map(|id| ProviderChoice {
            id: *id,
            name: config.provider_name(*id).to_string(),
        })
        .collect()
}

/// Pick a provider among the active ones
///
/// Skips the prompt when only one is active. `None` when every provider is
/// disabled; a notice has been printed by then.
pub fn select_provider(app: &App) -> Result<Option<ProviderId>> {
    let active = app.config.active_providers();
    let Some(preferred) = app.config.preferred_provider() else {
        println!(
            "{}",
            app.ui
                .error("No provider is active. Enable one under API configuration.")
        );
        return Ok(None);
    };

    if active.len() == 1 {
        return Ok(Some(preferred));
    }

    let choices = provider_choices(app, &active);
    let cursor = active.iter().position(|id| *id == preferred).unwrap_or(0);

    let choice = Select::new("Select API provider:", choices)
        .with_starting_cursor(cursor)
        .prompt()?;
    Ok(Some(choice.id))
}
