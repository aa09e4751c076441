//! Operation history storage
//!
//! Successful operations are kept newest first in `history.json` in the
//! working directory. The file is rewritten after every change.

use crate::constants::files::{HISTORY_EXPORT_PREFIX, HISTORY_FILE};
use crate::constants::history::{EXPORT_LIMIT, MAX_ENTRIES, TIMESTAMP_FORMAT};
use crate::error::{Error, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One recorded operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Creation time in milliseconds, unique within a store
    pub id: i64,

    /// Local time, `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,

    /// e.g. "geocode", "distance"
    #[serde(rename = "type")]
    pub operation_type: String,

    pub input: String,

    pub output: serde_json::Value,

    /// Provider or service that produced the output
    #[serde(rename = "provider")]
    pub provider_label: String,
}

/// History storage manager
#[derive(Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    path: PathBuf,
    enabled: bool,
}

impl History {
    /// Load `history.json` from the working directory
    pub fn load() -> Self {
        Self::load_from(HISTORY_FILE)
    }

    /// Load history from a specific path
    ///
    /// A missing file is an empty history; so is one that cannot be read
    /// or parsed.
    pub fn load_from(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let entries = if path.exists() {
            match read_entries(&path) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "history file unusable, starting empty");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        Self {
            entries,
            path,
            enabled: true,
        }
    }

    /// Turn recording on or off; reading and clearing still work
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Path of the history file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save history to disk
    pub fn save(&self) -> Result<()> {
        write_entries(&self.path, &self.entries)
    }

    /// Record an operation and persist the history
    ///
    /// The entry goes to the front; entries past the limit are dropped
    /// from the back.
    pub fn append(
        &mut self,
        operation_type: &str,
        input: impl Into<String>,
        output: serde_json::Value,
        provider: &str,
    ) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let now = Local::now();
        let mut id = now.timestamp_millis();
        if let Some(latest) = self.entries.first() {
            if id <= latest.id {
                id = latest.id + 1;
            }
        }

        self.entries.insert(
            0,
            HistoryEntry {
                id,
                timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
                operation_type: operation_type.to_string(),
                input: input.into(),
                output,
                provider_label: provider.to_string(),
            },
        );
        self.entries.truncate(MAX_ENTRIES);

        self.save()
    }

    /// Get all entries, newest first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Get most recent entries
    pub fn recent(&self, count: usize) -> &[HistoryEntry] {
        &self.entries[..count.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all history and persist the empty list
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.save()?;
        info!(path = %self.path.display(), "history cleared");
        Ok(())
    }

    /// Write the entries to `dest` as pretty JSON, returning how many
    pub fn export_all(&self, dest: &Path) -> Result<usize> {
        let count = self.entries.len().min(EXPORT_LIMIT);
        write_entries(dest, &self.entries[..count])?;
        info!(path = %dest.display(), count, "history exported");
        Ok(count)
    }
}

/// `pelakoor_history_YYYY-MM-DD.json` for today
pub fn default_export_file_name() -> String {
    export_file_name(Local::now().date_naive())
}

fn export_file_name(date: NaiveDate) -> String {
    format!("{}{}.json", HISTORY_EXPORT_PREFIX, date.format("%Y-%m-%d"))
}

fn read_entries(path: &Path) -> Result<Vec<HistoryEntry>> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read history file: {}", e)))?;
    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse history file: {}", e)))
}

fn write_entries(path: &Path, entries: &[HistoryEntry]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create history directory: {}", e))
            })?;
        }
    }

    let content = serde_json::to_string_pretty(entries)
        .map_err(|e| Error::Config(format!("Failed to serialize history: {}", e)))?;

    fs::write(path, content)
        .map_err(|e| Error::Config(format!("Failed to write history file: {}", e)))?;

    Ok(())
}
