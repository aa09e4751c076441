//! Configuration management
//!
//! Provider activation, the default provider and feature toggles live in
//! `config.json` in the working directory; API secrets live behind a
//! [`CredentialStore`] (a `.env` file by default). Every mutation is
//! written back before the call returns.

pub mod credentials;
pub mod defaults;

use crate::constants::files::{CONFIG_FILE, ENV_FILE};
use crate::error::{Error, Result};
use crate::geocode::ProviderId;
use credentials::{CredentialStore, EnvFileCredentials};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Settings for one geocoding provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Human-readable name
    #[serde(rename = "name")]
    pub display_name: String,

    /// Whether the provider needs an API key
    #[serde(rename = "requiresKey")]
    pub requires_credential: bool,

    /// Whether the provider is offered for lookups
    pub active: bool,
}

impl ProviderConfig {
    fn default_for(id: ProviderId) -> Self {
        Self {
            display_name: display_name(id).to_string(),
            requires_credential: id.requires_credential(),
            active: initially_active(id),
        }
    }
}

/// Application feature toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Features {
    #[serde(default = "default_auto_save")]
    pub auto_save: bool,

    #[serde(default = "default_show_progress")]
    pub show_progress: bool,

    #[serde(default = "default_color_output")]
    pub color_output: bool,

    #[serde(default = "default_save_history")]
    pub save_history: bool,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Provider preselected in provider prompts
    #[serde(default = "default_provider")]
    pub default_provider: ProviderId,

    /// Per-provider settings, in declaration order
    #[serde(default = "default_providers")]
    pub providers: BTreeMap<ProviderId, ProviderConfig>,

    /// Feature toggles
    #[serde(default)]
    pub features: Features,
}

// Default value functions for serde
fn default_provider() -> ProviderId {
    DEFAULT_PROVIDER
}
fn default_providers() -> BTreeMap<ProviderId, ProviderConfig> {
    ProviderId::ALL
        .iter()
        .map(|id| (*id, ProviderConfig::default_for(*id)))
        .collect()
}
fn default_auto_save() -> bool {
    DEFAULT_AUTO_SAVE
}
fn default_show_progress() -> bool {
    DEFAULT_SHOW_PROGRESS
}
fn default_color_output() -> bool {
    DEFAULT_COLOR_OUTPUT
}
fn default_save_history() -> bool {
    DEFAULT_SAVE_HISTORY
}

impl Default for Features {
    fn default() -> Self {
        Self {
            auto_save: default_auto_save(),
            show_progress: default_show_progress(),
            color_output: default_color_output(),
            save_history: default_save_history(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: default_providers(),
            features: Features::default(),
        }
    }
}

impl AppConfig {
    /// Restore invariants a hand-edited file may have broken
    ///
    /// Returns true when anything changed.
    fn normalize(&mut self) -> bool {
        let mut changed = false;

        for id in ProviderId::ALL {
            if !self.providers.contains_key(&id) {
                self.providers.insert(id, ProviderConfig::default_for(id));
                changed = true;
            }
        }

        if let Some(osm) = self.providers.get_mut(&ProviderId::Osm) {
            if osm.requires_credential {
                osm.requires_credential = false;
                changed = true;
            }
        }

        changed
    }

    /// Settings of one provider
    pub fn provider(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(&id)
    }

    /// Display name, falling back to the built-in label
    pub fn provider_name(&self, id: ProviderId) -> &str {
        self.provider(id)
            .map(|p| p.display_name.as_str())
            .unwrap_or_else(|| display_name(id))
    }

    /// Active providers in declaration order
    pub fn active_providers(&self) -> Vec<ProviderId> {
        ProviderId::ALL
            .into_iter()
            .filter(|id| self.provider(*id).is_some_and(|p| p.active))
            .collect()
    }
}

/// Owner of the persisted [`AppConfig`] and the credential backend
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config: AppConfig,
    path: PathBuf,
    credentials: Arc<dyn CredentialStore>,
}

impl ConfigStore {
    /// Open `config.json` and `.env` in the working directory
    pub fn open_default() -> Result<Self> {
        let credentials = EnvFileCredentials::load(ENV_FILE)?;
        Self::load(CONFIG_FILE, Arc::new(credentials))
    }

    /// Load configuration from `path`
    ///
    /// A missing file is created with defaults. A file that cannot be read
    /// or parsed is replaced with defaults as well; only a failed write is
    /// reported.
    pub fn load(path: impl Into<PathBuf>, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let path = path.into();

        let (config, needs_save) = if path.exists() {
            match read_config(&path) {
                Ok(mut config) => {
                    let changed = config.normalize();
                    (config, changed)
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "config file unusable, restoring defaults");
                    (AppConfig::default(), true)
                }
            }
        } else {
            info!(path = %path.display(), "creating default config");
            (AppConfig::default(), true)
        };

        let store = Self {
            config,
            path,
            credentials,
        };
        if needs_save {
            store.save()?;
        }
        Ok(store)
    }

    /// Write the whole configuration to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    Error::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = serde_json::to_string_pretty(&self.config)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&self.path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Current configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Path of the config file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Shared handle to the credential backend
    pub fn credentials(&self) -> Arc<dyn CredentialStore> {
        Arc::clone(&self.credentials)
    }

    /// Active providers in declaration order
    pub fn active_providers(&self) -> Vec<ProviderId> {
        self.config.active_providers()
    }

    /// Provider to use when the user is not asked
    ///
    /// The default provider when it is active, otherwise the first active
    /// one. `None` when every provider has been disabled.
    pub fn preferred_provider(&self) -> Option<ProviderId> {
        let active = self.active_providers();
        if active.contains(&self.config.default_provider) {
            Some(self.config.default_provider)
        } else {
            active.first().copied()
        }
    }

    /// Change the default provider; it must be active
    pub fn set_default_provider(&mut self, id: ProviderId) -> Result<()> {
        if !self.active_providers().contains(&id) {
            return Err(Error::Config(format!(
                "Cannot make inactive provider '{}' the default",
                id
            )));
        }
        self.config.default_provider = id;
        self.save()?;
        info!(provider = %id, "default provider changed");
        Ok(())
    }

    /// Enable or disable a provider
    pub fn set_provider_active(&mut self, id: ProviderId, active: bool) -> Result<()> {
        let entry = self
            .config
            .providers
            .entry(id)
            .or_insert_with(|| ProviderConfig::default_for(id));
        entry.active = active;
        self.save()?;
        info!(provider = %id, active, "provider activation changed");
        Ok(())
    }

    /// Replace the feature toggles
    pub fn set_features(&mut self, features: Features) -> Result<()> {
        self.config.features = features;
        self.save()?;
        info!(?features, "features updated");
        Ok(())
    }

    /// Store an API key for a provider
    pub fn set_credential(&self, id: ProviderId, secret: &str) -> Result<()> {
        let key = id.credential_var().ok_or_else(|| {
            Error::Config(format!("Provider '{}' does not use an API key", id))
        })?;
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(Error::Config("API key must not be empty".to_string()));
        }
        if secret.contains(['\n', '\r']) {
            return Err(Error::Config("API key must be a single line".to_string()));
        }
        self.credentials.set(key, secret)
    }

    /// Whether a secret is available for the provider
    ///
    /// Always true for providers that need none.
    pub fn has_credential(&self, id: ProviderId) -> bool {
        match id.credential_var() {
            Some(key) => self.credentials.get(key).is_some(),
            None => true,
        }
    }
}

fn read_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;
    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::credentials::MemoryCredentials;
    use tempfile::TempDir;

    fn create_test_store() -> (ConfigStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        let store = ConfigStore::load(path, Arc::new(MemoryCredentials::default())).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.default_provider, ProviderId::Osm);
        assert_eq!(config.providers.len(), 4);
        assert!(config.providers[&ProviderId::Osm].active);
        assert!(!config.providers[&ProviderId::Osm].requires_credential);
        assert!(!config.providers[&ProviderId::Google].active);
        assert!(config.providers[&ProviderId::Here].requires_credential);
        assert!(config.features.save_history);
        assert!(config.features.show_progress);
        assert!(config.features.color_output);
    }

    #[test]
    fn test_serialization_format() {
        let json = serde_json::to_value(AppConfig::default()).unwrap();

        assert_eq!(json["defaultProvider"], "osm");
        assert_eq!(json["providers"]["osm"]["name"], "OpenStreetMap (Nominatim)");
        assert_eq!(json["providers"]["mapbox"]["requiresKey"], true);
        assert_eq!(json["features"]["saveHistory"], true);
        assert_eq!(json["features"]["autoSave"], true);

        let keys: Vec<&String> = json["providers"].as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn test_load_missing_file_writes_defaults() {
        let (store, _temp) = create_test_store();

        assert_eq!(store.config(), &AppConfig::default());
        assert!(store.path().exists());

        let on_disk = read_config(store.path()).unwrap();
        assert_eq!(on_disk, AppConfig::default());
    }

    #[test]
    fn test_load_corrupt_file_restores_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ this is not json").unwrap();

        let store = ConfigStore::load(&path, Arc::new(MemoryCredentials::default())).unwrap();

        assert_eq!(store.config(), &AppConfig::default());
        assert_eq!(read_config(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_load_unknown_default_provider_restores_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"defaultProvider":"bing"}"#).unwrap();

        let store = ConfigStore::load(&path, Arc::new(MemoryCredentials::default())).unwrap();
        assert_eq!(store.config().default_provider, ProviderId::Osm);
    }

    #[test]
    fn test_load_fills_missing_providers_and_fixes_osm() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "defaultProvider": "here",
                "providers": {
                    "osm": {"name": "OSM", "requiresKey": true, "active": true},
                    "here": {"name": "HERE API", "requiresKey": true, "active": true}
                },
                "features": {"saveHistory": false}
            }"#,
        )
        .unwrap();

        let store = ConfigStore::load(&path, Arc::new(MemoryCredentials::default())).unwrap();
        let config = store.config();

        assert_eq!(config.default_provider, ProviderId::Here);
        assert_eq!(config.providers.len(), 4);
        assert!(!config.providers[&ProviderId::Osm].requires_credential);
        assert_eq!(config.providers[&ProviderId::Osm].display_name, "OSM");
        assert!(!config.features.save_history);
        assert!(config.features.show_progress);

        // Repairs are persisted
        let on_disk = read_config(&path).unwrap();
        assert_eq!(on_disk.providers.len(), 4);
    }

    #[test]
    fn test_active_providers_default_is_osm() {
        let (store, _temp) = create_test_store();
        assert_eq!(store.active_providers(), vec![ProviderId::Osm]);
        assert_eq!(store.preferred_provider(), Some(ProviderId::Osm));
    }

    #[test]
    fn test_active_providers_keep_declaration_order() {
        let (mut store, _temp) = create_test_store();
        store.set_provider_active(ProviderId::Here, true).unwrap();
        store.set_provider_active(ProviderId::Google, true).unwrap();

        assert_eq!(
            store.active_providers(),
            vec![ProviderId::Osm, ProviderId::Google, ProviderId::Here]
        );
    }

    #[test]
    fn test_all_providers_disabled() {
        let (mut store, _temp) = create_test_store();
        store.set_provider_active(ProviderId::Osm, false).unwrap();

        assert!(store.active_providers().is_empty());
        assert_eq!(store.preferred_provider(), None);
    }

    #[test]
    fn test_preferred_provider_falls_back_to_first_active() {
        let (mut store, _temp) = create_test_store();
        store.set_provider_active(ProviderId::Mapbox, true).unwrap();
        store.set_default_provider(ProviderId::Mapbox).unwrap();
        store.set_provider_active(ProviderId::Mapbox, false).unwrap();

        assert_eq!(store.preferred_provider(), Some(ProviderId::Osm));
    }

    #[test]
    fn test_set_default_provider_requires_active() {
        let (mut store, _temp) = create_test_store();
        assert!(store.set_default_provider(ProviderId::Google).is_err());

        store.set_provider_active(ProviderId::Google, true).unwrap();
        store.set_default_provider(ProviderId::Google).unwrap();

        let reloaded = read_config(store.path()).unwrap();
        assert_eq!(reloaded.default_provider, ProviderId::Google);
    }

    #[test]
    fn test_set_features_persists() {
        let (mut store, _temp) = create_test_store();
        let features = Features {
            save_history: false,
            color_output: false,
            ..store.config().features
        };
        store.set_features(features).unwrap();

        let reloaded = read_config(store.path()).unwrap();
        assert!(!reloaded.features.save_history);
        assert!(!reloaded.features.color_output);
        assert!(reloaded.features.show_progress);
    }

    #[test]
    fn test_set_credential() {
        let (store, _temp) = create_test_store();

        assert!(!store.has_credential(ProviderId::Mapbox));
        assert!(store.has_credential(ProviderId::Osm));

        store.set_credential(ProviderId::Mapbox, "  pk.test  ").unwrap();
        assert!(store.has_credential(ProviderId::Mapbox));
        assert_eq!(
            store.credentials().get("MAPBOX_API_KEY").as_deref(),
            Some("pk.test")
        );

        assert!(store.set_credential(ProviderId::Osm, "x").is_err());
        assert!(store.set_credential(ProviderId::Here, "   ").is_err());
    }

    #[test]
    fn test_set_credential_rejects_line_breaks() {
        let (store, _temp) = create_test_store();

        let result = store.set_credential(ProviderId::Google, "abc\nHERE_API_KEY=injected");
        assert!(matches!(result, Err(Error::Config(_))));
        assert!(store.set_credential(ProviderId::Google, "abc\rdef").is_err());
        assert!(!store.has_credential(ProviderId::Google));
        assert!(!store.has_credential(ProviderId::Here));
    }
}
