//! Client configuration.
//!
//! All settings live in a single `config.toml` at
//! `~/.config/slobsctl/config.toml` by default:
//!
//! ```toml
//! [connection]
//! address = "127.0.0.1"
//! timeout = 5
//! ```
//!
//! Command-line flags override the file; a missing file means defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for the slobsctl client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Connection settings.
    pub connection: ConnectionSettings,
}

/// Connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Address of the machine running the remote application.
    pub address: String,

    /// Connection timeout in seconds.
    pub timeout: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            timeout: 5,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("slobsctl")
            .join("config.toml")
    }
}
