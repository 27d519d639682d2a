//! Configuration handling for template directories.
//!
//! Every directory resolves its configuration from three tiers: its own
//! `.config` overrides, the parent's resolved values and finally the static
//! defaults in [`DEFAULT_CONFIG`].

use crate::constants::{BASE_CONFIG_FILE, DEFAULT_CONFIG, LOCAL_CONFIG_FILE};
use crate::encoding::TextEncoding;
use crate::error::{Error, Result};
use crate::properties::load_properties;
use indexmap::IndexMap;
use log::debug;
use std::path::{Path, PathBuf};

/// Resolved configuration of one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    values: IndexMap<String, String>,
}

impl Config {
    pub fn new(values: IndexMap<String, String>) -> Self {
        Self { values }
    }

    /// Returns a new configuration with `overrides` shadowing these values.
    pub fn overlay(&self, overrides: IndexMap<String, String>) -> Self {
        let mut values = self.values.clone();
        values.extend(overrides);
        Self { values }
    }

    /// Looks up `key`, falling back to the static defaults.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str).or_else(|| default_value(key))
    }

    /// Like [`Config::get`] but for keys that always have a default.
    pub fn get_or_default(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    /// Values set explicitly somewhere in the chain, defaults excluded.
    pub fn values(&self) -> &IndexMap<String, String> {
        &self.values
    }
}

fn default_value(key: &str) -> Option<&'static str> {
    DEFAULT_CONFIG.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Resolves the configuration of `dir` on top of `inherited`.
///
/// Returns the resolved configuration and the local override file if one was
/// read, so callers can exclude it from content.
///
/// # Errors
/// * `Error::ConfigError` naming the directory if the override file exists
///   but cannot be read or parsed
pub fn resolve_local_config(
    dir: &Path,
    inherited: &Config,
    encoding: TextEncoding,
) -> Result<(Config, Option<PathBuf>)> {
    let config_path = dir.join(LOCAL_CONFIG_FILE);
    if !config_path.is_file() {
        return Ok((inherited.clone(), None));
    }

    debug!("Loading local configuration from {}", config_path.display());
    let overrides = load_properties(&config_path, encoding)
        .map_err(|e| Error::config(dir.display(), format!("cannot load local config: {e}")))?;
    Ok((inherited.overlay(overrides), Some(config_path)))
}

/// Locates the base configuration file of a project.
///
/// An explicitly given file must exist; otherwise `template-machine.properties`
/// in the project root is used when present.
pub fn find_base_config<P: AsRef<Path>>(
    project_dir: P,
    explicit: Option<&Path>,
) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) if path.is_file() => Ok(Some(path.to_path_buf())),
        Some(path) => Err(Error::config(path.display(), "configuration file does not exist")),
        None => {
            let default = project_dir.as_ref().join(BASE_CONFIG_FILE);
            Ok(default.is_file().then_some(default))
        }
    }
}

/// Loads the base configuration, or an empty one when there is no file.
pub fn load_base_config(path: Option<&Path>, encoding: TextEncoding) -> Result<Config> {
    match path {
        Some(path) => {
            debug!("Loading base configuration from {}", path.display());
            let values = load_properties(path, encoding)
                .map_err(|e| Error::config(path.display(), e.to_string()))?;
            Ok(Config::new(values))
        }
        None => Ok(Config::default()),
    }
}
