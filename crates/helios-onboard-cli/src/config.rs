/*
[INPUT]:  YAML configuration file and process environment
[OUTPUT]: Parsed driver configuration (API endpoint, timeouts, token location, key source)
[POS]:    Configuration layer - CLI setup
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use helios_onboard::{ClientConfig, http::DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "helios-onboard";

/// Top-level configuration for the onboarding driver
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OnboardConfig {
    /// Onboarding API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Total request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Directory holding the persisted session token
    #[serde(default)]
    pub session_dir: Option<PathBuf>,
    /// Environment variable holding the wallet private key
    #[serde(default = "default_private_key_env")]
    pub private_key_env: String,
}

impl Default for OnboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            session_dir: None,
            private_key_env: default_private_key_env(),
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_private_key_env() -> String {
    "HELIOS_PRIVATE_KEY".to_string()
}

impl OnboardConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }

    /// Token directory, falling back to the platform data directory
    pub fn session_dir(&self) -> Result<PathBuf> {
        match &self.session_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .context("no platform data directory; set session_dir"),
        }
    }

    pub fn private_key(&self) -> Result<String> {
        std::env::var(&self.private_key_env)
            .with_context(|| format!("environment variable {} is not set", self.private_key_env))
    }
}
