//! Optional `ecoassess.toml` settings.
//!
//! # Example
//!
//! ```toml
//! [quality]
//! checked_by = "field-team"
//!
//! [defaults]
//! assigned_by = "project-lead"
//! ```
//!
//! Command-line flags always win over values read here.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "ecoassess.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub quality: QualitySettings,
    #[serde(default)]
    pub defaults: Defaults,
}

/// `[quality]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QualitySettings {
    /// Identity stamped on validation results.
    pub checked_by: Option<String>,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    /// Used by `create` when `--assigned-by` is omitted.
    pub assigned_by: Option<String>,
}

/// Read and parse a config TOML file from `path`.
///
/// Returns a human-readable error string on failure.
pub fn read_config(path: &Path) -> Result<Config, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}

/// The explicit config if one was named, else `./ecoassess.toml` if it
/// exists, else defaults.
pub fn load(explicit: Option<&Path>) -> Result<Config, String> {
    match explicit {
        Some(path) => read_config(path),
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            if fallback.is_file() {
                read_config(fallback)
            } else {
                Ok(Config::default())
            }
        }
    }
}
