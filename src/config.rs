//! Persisted client settings.
//!
//! Settings live in `<config dir>/tmc/settings.json` and are read-only from the
//! point of view of the submit command. Environment variables override the file:
//! - `TMC_SERVER_URL` - Server base URL
//! - `TMC_TOKEN` - OAuth access token

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "tmc";
const SETTINGS_FILE: &str = "settings.json";

/// Default server for new installations.
pub const DEFAULT_SERVER: &str = "https://tmc.mooc.fi";

/// API version the client speaks. Manifests pointing at older versions are migrated.
pub const CURRENT_API_VERSION: u32 = 8;

/// Name reported to the server in the `client` query parameter.
pub const CLIENT_NAME: &str = "tmc_cli";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub server_address: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default = "default_api_version")]
    pub api_version: u32,
    #[serde(default)]
    pub send_diagnostics: bool,
}

fn default_api_version() -> u32 {
    CURRENT_API_VERSION
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_address: DEFAULT_SERVER.to_string(),
            username: None,
            token: None,
            organization: None,
            api_version: CURRENT_API_VERSION,
            send_diagnostics: false,
        }
    }
}

impl Settings {
    /// Load settings from the user's config directory and apply environment overrides.
    pub fn load() -> Result<Self> {
        let settings = Self::load_from(&settings_path()?)?;
        Ok(settings.with_env_overrides())
    }

    /// Load settings from an explicit file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read settings file")?;
        let settings = serde_json::from_str(&content).context("Failed to parse settings file")?;

        Ok(settings)
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("TMC_SERVER_URL") {
            self.server_address = url;
        }
        if let Ok(token) = std::env::var("TMC_TOKEN") {
            self.token = Some(token);
        }
        self
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

fn settings_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", APP_NAME)
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(dirs.config_dir().join(SETTINGS_FILE))
}
