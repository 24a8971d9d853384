//! Application configuration management.
//!
//! This module handles loading and saving the console configuration, which
//! includes the backend URL, the session store backend, and the last used
//! username.
//!
//! Configuration is stored at `~/.config/bookdesk/config.json`. Environment
//! variables override the file (`BOOKDESK_API_URL`, `BOOKDESK_STORE`).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store::{FileSessionStore, KeyringSessionStore, MemorySessionStore, SessionStore};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "bookdesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Cache subdirectory holding one session directory per backend origin
const SESSIONS_DIR: &str = "sessions";

/// Backend URL used when nothing is configured
const DEFAULT_API_URL: &str = "http://localhost:8080/api";

const ENV_API_URL: &str = "BOOKDESK_API_URL";
const ENV_STORE: &str = "BOOKDESK_STORE";

/// Where the `{credential, user}` pair is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    File,
    Keyring,
    Memory,
}

impl StoreKind {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" => Some(StoreKind::File),
            "keyring" | "keychain" => Some(StoreKind::Keyring),
            "memory" => Some(StoreKind::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub store: StoreKind,
    pub last_username: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            store: StoreKind::default(),
            last_username: None,
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults, then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(raw) = lookup(ENV_STORE) {
            match StoreKind::parse(&raw) {
                Some(kind) => self.store = kind,
                None => warn!(value = %raw, "Ignoring unknown {}", ENV_STORE),
            }
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Filesystem-safe name of the backend origin (scheme, host, port).
    ///
    /// Sessions are stored per origin so a credential issued by one backend
    /// is never presented to another.
    pub fn origin_key(&self) -> String {
        let origin = match Url::parse(self.api_base_url.trim()) {
            Ok(url) => format!(
                "{}_{}_{}",
                url.scheme(),
                url.host_str().unwrap_or("local"),
                url.port_or_known_default().unwrap_or(0)
            ),
            Err(e) => {
                warn!(error = %e, url = %self.api_base_url, "Backend URL does not parse, keying sessions by raw URL");
                format!("raw_{}", self.api_base_url)
            }
        };
        origin
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect()
    }

    /// Directory holding the session files for the configured origin
    pub fn session_dir(&self) -> Result<PathBuf> {
        Ok(self.cache_dir()?.join(SESSIONS_DIR).join(self.origin_key()))
    }

    /// Keychain service holding the session entries for the configured origin
    pub fn keyring_service(&self) -> String {
        format!("{}@{}", APP_NAME, self.origin_key())
    }

    /// Build the configured session store.
    pub fn session_store(&self) -> Result<Arc<dyn SessionStore>> {
        let store: Arc<dyn SessionStore> = match self.store {
            StoreKind::File => Arc::new(FileSessionStore::new(self.session_dir()?)),
            StoreKind::Keyring => Arc::new(
                KeyringSessionStore::new(&self.keyring_service())
                    .context("Failed to open keychain entries")?,
            ),
            StoreKind::Memory => Arc::new(MemorySessionStore::new()),
        };
        Ok(store)
    }
}
