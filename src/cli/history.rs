//! History view
//!
//! Shows recent operations and offers refresh, clear and export.

use crate::cli::{prompt, App};
use crate::error::Result;
use crate::format::Table;
use crate::history::{default_export_file_name, HistoryEntry};
use inquire::Select;
use std::fmt;
use std::path::PathBuf;

/// Entries shown per view
const VIEW_COUNT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryAction {
    Refresh,
    Clear,
    Export,
    Back,
}

impl HistoryAction {
    const ALL: [HistoryAction; 4] = [
        HistoryAction::Refresh,
        HistoryAction::Clear,
        HistoryAction::Export,
        HistoryAction::Back,
    ];
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HistoryAction::Refresh => "Refresh",
            HistoryAction::Clear => "Clear history",
            HistoryAction::Export => "Export history",
            HistoryAction::Back => "Back",
        };
        f.write_str(label)
    }
}

/// One-line summary of an entry's output
fn summarize(entry: &HistoryEntry) -> String {
    let output = &entry.output;
    if let Some(first) = output.as_array().and_then(|a| a.first()) {
        if let (Some(lat), Some(lon)) = (first["latitude"].as_f64(), first["longitude"].as_f64()) {
            return format!("{:.6}, {:.6}", lat, lon);
        }
    }
    if let Some(address) = output["formattedAddress"].as_str() {
        return address.to_string();
    }
    let text = output.to_string();
    if text.chars().count() > 60 {
        let cut: String = text.chars().take(59).collect();
        format!("{}…", cut)
    } else {
        text
    }
}

fn history_table(entries: &[HistoryEntry], total: usize) -> Table {
    let mut table = Table::new(["Time", "Type", "Input", "Result", "Provider"])
        .with_title(format!("Recent operations ({} of {})", entries.len(), total))
        .with_max_width(40);
    for entry in entries {
        table.push_row([
            entry.timestamp.clone(),
            entry.operation_type.clone(),
            entry.input.clone(),
            summarize(entry),
            entry.provider_label.clone(),
        ]);
    }
    table
}

fn show(app: &App) {
    if !app.history.is_enabled() {
        println!("{}", app.ui.dim("History saving is turned off in application settings."));
    }
    if app.history.is_empty() {
        println!("{}", app.ui.warn("No history entries."));
        return;
    }
    println!(
        "{}",
        history_table(app.history.recent(VIEW_COUNT), app.history.len())
    );
}

/// History menu loop
pub fn run(app: &mut App) -> Result<()> {
    loop {
        show(app);

        let action = Select::new("History:", HistoryAction::ALL.to_vec()).prompt()?;
        match action {
            HistoryAction::Refresh => continue,
            HistoryAction::Clear => {
                if app.history.is_empty() {
                    continue;
                }
                if prompt::confirm("Delete all history entries?", false)? {
                    app.history.clear()?;
                    println!("{}", app.ui.success("History cleared"));
                }
            }
            HistoryAction::Export => {
                if app.history.is_empty() {
                    println!("{}", app.ui.warn("Nothing to export"));
                    continue;
                }
                let dest = PathBuf::from(default_export_file_name());
                let count = app.history.export_all(&dest)?;
                println!(
                    "{}",
                    app.ui
                        .success(&format!("Exported {} entries to {}", count, dest.display()))
                );
            }
            HistoryAction::Back => return Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(output: serde_json::Value) -> HistoryEntry {
        HistoryEntry {
            id: 1,
            timestamp: "2024-06-21 10:00:00".to_string(),
            operation_type: "geocode".to_string(),
            input: "Paris".to_string(),
            output,
            provider_label: "OpenStreetMap".to_string(),
        }
    }

    #[test]
    fn test_summarize_geocode_results() {
        let e = entry(json!([{ "latitude": 48.8566, "longitude": 2.3522 }]));
        assert_eq!(summarize(&e), "48.856600, 2.352200");
    }

    #[test]
    fn test_summarize_reverse_result() {
        let e = entry(json!({ "formattedAddress": "Paris, France", "latitude": 1.0 }));
        assert_eq!(summarize(&e), "Paris, France");
    }

    #[test]
    fn test_summarize_truncates_long_output() {
        let e = entry(json!({ "text": "x".repeat(200) }));
        let s = summarize(&e);
        assert_eq!(s.chars().count(), 60);
        assert!(s.ends_with('…'));
    }

    #[test]
    fn test_history_table_counts() {
        let entries = vec![entry(json!({ "meters": 1.0 }))];
        let table = history_table(&entries, 7);
        assert_eq!(table.len(), 1);
        assert!(table.to_string().contains("Recent operations (1 of 7)"));
    }
}
