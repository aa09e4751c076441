//! Credential storage
//!
//! Secrets are looked up by environment variable name (e.g.
//! `MAPBOX_API_KEY`). The default backend keeps them as `KEY=value` lines
//! in a `.env` file and mirrors every change into the live process
//! environment, so lookups made after `set` see the new value without a
//! reload.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::env;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Backend for API secrets
pub trait CredentialStore: Send + Sync + Debug {
    /// Current value of a secret, `None` when unset or empty
    fn get(&self, key: &str) -> Option<String>;

    /// Create or replace a secret
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// `.env` file backed credentials
#[derive(Debug, Clone)]
pub struct EnvFileCredentials {
    path: PathBuf,
}

impl EnvFileCredentials {
    /// Open the credentials file and export its entries
    ///
    /// Variables already present in the environment take precedence over
    /// the file. A missing file is not an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read credentials file: {}", e))
            })?;

            // Later lines override earlier ones for the same key
            let entries: BTreeMap<String, String> = parse_env(&content).into_iter().collect();

            let mut exported = 0;
            for (key, value) in entries {
                if env::var_os(&key).is_none() {
                    env::set_var(&key, &value);
                    exported += 1;
                }
            }
            debug!(path = %path.display(), exported, "loaded credentials file");
        }

        Ok(Self { path })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_content(&self) -> Result<String> {
        if !self.path.exists() {
            return Ok(String::new());
        }
        fs::read_to_string(&self.path)
            .map_err(|e| Error::Config(format!("Failed to read credentials file: {}", e)))
    }
}

impl CredentialStore for EnvFileCredentials {
    fn get(&self, key: &str) -> Option<String> {
        non_empty_var(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if value.contains(['\n', '\r']) {
            return Err(Error::Config(format!("Value for {} must be a single line", key)));
        }
        let content = self.read_content()?;
        let updated = upsert_line(&content, key, value);

        fs::write(&self.path, updated).map_err(|e| {
            Error::Config(format!("Failed to write credentials file: {}", e))
        })?;
        env::set_var(key, value);

        info!(key, path = %self.path.display(), "credential updated");
        Ok(())
    }
}

/// Environment-only credentials; nothing is written to disk
#[derive(Debug, Clone, Default)]
pub struct EnvCredentials;

impl CredentialStore for EnvCredentials {
    fn get(&self, key: &str) -> Option<String> {
        non_empty_var(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        env::set_var(key, value);
        Ok(())
    }
}

/// Key and raw value of an entry line (`KEY=v`, `KEY = v`, `export KEY=v`)
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Parse `KEY=value` lines, skipping blanks and `#` comments
fn parse_env(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (key, value) = split_entry(line)?;
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

/// Rewrite the entry for `key` in place, or append one
///
/// Every form `parse_env` accepts counts as the same key; duplicates after
/// the first are dropped so a reload sees only the new value.
fn upsert_line(content: &str, key: &str, value: &str) -> String {
    let new_line = format!("{}={}", key, value);

    let mut replaced = false;
    let mut lines: Vec<String> = Vec::new();
    for line in content.lines() {
        if split_entry(line).map(|(k, _)| k) == Some(key) {
            if !replaced {
                lines.push(new_line.clone());
                replaced = true;
            }
        } else {
            lines.push(line.to_string());
        }
    }
    if !replaced {
        lines.push(new_line);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// In-memory credentials for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryCredentials {
    values: std::sync::Mutex<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryCredentials {
    pub(crate) fn with(pairs: &[(&str, &str)]) -> Self {
        let store = Self::default();
        for (k, v) in pairs {
            store.set(k, v).unwrap();
        }
        store
    }
}

#[cfg(test)]
impl CredentialStore for MemoryCredentials {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
