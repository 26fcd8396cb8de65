//! Tool configuration.
//!
//! Handles loading, validating, and merging `zdrive.toml`. Stock defaults
//! target Base mainnet and the public gateways; a config file only needs the
//! keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [chain]
//! id = 8453                 # Chain used to derive collection ids
//!
//! [gateways]
//! ipfs = "https://magic.decentralized-content.com/ipfs/"
//! arweave = "https://arweave.net/"
//!
//! [uploads]
//! max_file_size = 209715200 # Bytes per attachment (200MB)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::metadata::SUPPORTED_CHAIN_ID;

/// Default per-file upload limit: 200MB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 200 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `zdrive.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZDriveConfig {
    pub chain: ChainConfig,
    pub gateways: GatewayConfig,
    pub uploads: UploadsConfig,
}

impl ZDriveConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain.id <= 0 {
            return Err(ConfigError::Validation("chain.id must be positive".into()));
        }
        for (key, url) in [
            ("gateways.ipfs", &self.gateways.ipfs),
            ("gateways.arweave", &self.gateways.arweave),
        ] {
            if url.is_empty() || !url.ends_with('/') {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a non-empty URL ending in '/'"
                )));
            }
        }
        if self.uploads.max_file_size == 0 {
            return Err(ConfigError::Validation(
                "uploads.max_file_size must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChainConfig {
    pub id: i64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            id: SUPPORTED_CHAIN_ID,
        }
    }
}

/// HTTP gateways for storage URIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    /// Prefix replacing `ipfs://`.
    pub ipfs: String,
    /// Prefix replacing `ar://`.
    pub arweave: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            ipfs: "https://magic.decentralized-content.com/ipfs/".to_string(),
            arweave: "https://arweave.net/".to_string(),
        }
    }
}

impl GatewayConfig {
    /// Rewrite `ipfs://` and `ar://` URIs to gateway URLs. Other URIs pass
    /// through unchanged.
    pub fn to_http(&self, uri: &str) -> String {
        if let Some(rest) = uri.strip_prefix("ipfs://") {
            format!("{}{rest}", self.ipfs)
        } else if let Some(rest) = uri.strip_prefix("ar://") {
            format!("{}{rest}", self.arweave)
        } else {
            uri.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadsConfig {
    /// Largest attachment accepted, in bytes.
    pub max_file_size: u64,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(ZDriveConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ZDriveConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ZDriveConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when the file is
/// absent.
pub fn load_config(path: &Path) -> Result<ZDriveConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    tracing::debug!(path = %path.display(), found = overlay.is_some(), "loading config");
    resolve_config(overlay)
}

/// Returns a fully-commented stock `zdrive.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Z:Drive Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Chain
# ---------------------------------------------------------------------------
[chain]
# Chain id used when deriving collection ids ("<chain>:<creator>:<slug>").
# 8453 is Base mainnet.
id = 8453

# ---------------------------------------------------------------------------
# Gateways
# ---------------------------------------------------------------------------
[gateways]
# HTTP prefix substituted for ipfs:// URIs. Must end in '/'.
ipfs = "https://magic.decentralized-content.com/ipfs/"

# HTTP prefix substituted for ar:// URIs. Must end in '/'.
arweave = "https://arweave.net/"

# ---------------------------------------------------------------------------
# Uploads
# ---------------------------------------------------------------------------
[uploads]
# Largest attachment accepted by `zdrive assets`, in bytes (200MB).
max_file_size = 209715200
"##
}
