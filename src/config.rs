use crate::error::{MarketError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application settings, read from a TOML file. Every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Quiet period before a price slider move is committed
    pub debounce_ms: u64,
    /// Listings snapshot file
    pub data_file: PathBuf,
    /// Directory uploaded photos are written under
    pub storage_dir: PathBuf,
    /// Bucket photos are uploaded to
    pub bucket: String,
    /// Base URL photos are served from
    pub public_base_url: String,
    /// Location stored when a listing is posted without one
    pub default_location: String,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            data_file: PathBuf::from("listings.json"),
            storage_dir: PathBuf::from("storage"),
            bucket: "wall-photos".to_string(),
            public_base_url: "http://localhost:8000/storage".to_string(),
            default_location: "Unknown".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| MarketError::Config(e.to_string()))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
