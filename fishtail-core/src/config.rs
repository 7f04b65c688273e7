//! Configuration management
//!
//! Settings live in `settings.json` in the app directory:
//! ```json
//! {
//!   "client": {
//!     "apiUrl": "https://api.fishtail.example",
//!     "appOrigin": "http://localhost:8080",
//!     "sameOriginPort": null,
//!     "menuCacheSecs": 300
//!   }
//! }
//! ```
//! Sections and fields this crate does not manage are preserved on save.
//! Every field can be overridden from the environment.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::result::Error;

pub const API_URL_ENV: &str = "FISHTAIL_API_URL";
pub const APP_ORIGIN_ENV: &str = "FISHTAIL_APP_ORIGIN";
pub const SAME_ORIGIN_PORT_ENV: &str = "FISHTAIL_SAME_ORIGIN_PORT";
pub const MENU_CACHE_SECS_ENV: &str = "FISHTAIL_MENU_CACHE_SECS";

pub const SETTINGS_FILE: &str = "settings.json";

pub const DEFAULT_APP_ORIGIN: &str = "http://localhost:8080";
pub const DEFAULT_MENU_CACHE_SECS: u64 = 5 * 60;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    client: ClientSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClientSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    app_origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    same_origin_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    menu_cache_secs: Option<u64>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Client configuration (resolved view of settings + environment)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Explicit backend URL; when unset the backend is assumed same-origin
    pub api_url: Option<String>,
    /// Where the app itself is served
    pub app_origin: String,
    /// Port of the backend when same-origin but on another port
    pub same_origin_port: Option<u16>,
    pub menu_cache_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            app_origin: DEFAULT_APP_ORIGIN.to_string(),
            same_origin_port: None,
            menu_cache_secs: DEFAULT_MENU_CACHE_SECS,
        }
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn read_settings(settings_path: &Path) -> Result<SettingsFile> {
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(settings_path)?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

impl ClientSettings {
    /// Set a field by its settings name. An empty value clears optional
    /// fields.
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        let text = || (!value.is_empty()).then(|| value.trim_end_matches('/').to_string());
        match key {
            "apiUrl" => self.api_url = text(),
            "appOrigin" => self.app_origin = text(),
            "sameOriginPort" => {
                self.same_origin_port = match value {
                    "" => None,
                    port => Some(
                        port.parse()
                            .map_err(|_| Error::config(format!("Invalid port: {}", port)))?,
                    ),
                }
            }
            "menuCacheSecs" => {
                self.menu_cache_secs = match value {
                    "" => None,
                    secs => Some(secs.parse().map_err(|_| {
                        Error::config(format!("Invalid number of seconds: {}", secs))
                    })?),
                }
            }
            _ => {
                return Err(Error::config(format!(
                    "Unknown setting '{}'. Expected apiUrl, appOrigin, sameOriginPort or menuCacheSecs",
                    key
                ))
                .into())
            }
        }
        Ok(())
    }
}

impl Config {
    /// Load config from the app directory, then apply environment overrides
    pub fn load(app_dir: &Path) -> Result<Self> {
        let raw = read_settings(&app_dir.join(SETTINGS_FILE))?;
        Ok(Self::resolve(raw.client))
    }

    fn resolve(client: ClientSettings) -> Self {
        let mut config = Self::default();

        config.api_url = env_value(API_URL_ENV).or(client.api_url);
        if let Some(origin) = env_value(APP_ORIGIN_ENV).or(client.app_origin) {
            config.app_origin = origin.trim_end_matches('/').to_string();
        }
        config.same_origin_port = env_value(SAME_ORIGIN_PORT_ENV)
            .and_then(|v| v.parse().ok())
            .or(client.same_origin_port);
        config.menu_cache_secs = env_value(MENU_CACHE_SECS_ENV)
            .and_then(|v| v.parse().ok())
            .or(client.menu_cache_secs)
            .unwrap_or(DEFAULT_MENU_CACHE_SECS);

        config
    }

    /// Change one setting in settings.json and return the resolved config.
    ///
    /// Only the file is edited: environment overrides in effect now are
    /// never written back, and other settings are preserved.
    pub fn update_setting(app_dir: &Path, key: &str, value: &str) -> Result<Self> {
        let settings_path = app_dir.join(SETTINGS_FILE);
        let mut settings = read_settings(&settings_path)?;
        settings.client.set(key, value)?;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(Self::resolve(settings.client))
    }

    /// Base URL for API calls: the explicit API URL, otherwise the app
    /// origin with the same-origin port swapped in
    pub fn api_base(&self) -> String {
        if let Some(url) = &self.api_url {
            return url.trim_end_matches('/').to_string();
        }
        let Some(port) = self.same_origin_port else {
            return self.app_origin.clone();
        };
        match url::Url::parse(&self.app_origin) {
            Ok(mut origin) => {
                if origin.set_port(Some(port)).is_ok() {
                    origin.origin().ascii_serialization()
                } else {
                    self.app_origin.clone()
                }
            }
            Err(_) => self.app_origin.clone(),
        }
    }

    /// Base URL of the backend's auth pages: the explicit API URL,
    /// otherwise the app origin as-is
    pub fn auth_base(&self) -> String {
        self.api_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| self.app_origin.clone())
    }

    pub fn menu_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.menu_cache_secs)
    }
}
