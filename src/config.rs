//! Configuration file loading
//!
//! Lookup order for the config file:
//!
//! 1. `--config FILE`
//! 2. `DRIVETREE_CONFIG` environment variable
//! 3. `<config dir>/drivetree/config.toml` (e.g. `~/.config/drivetree/config.toml`)
//!
//! A missing default file means "use defaults"; a missing file that was named
//! explicitly is an error. Command-line flags override every value here.
//!
//! ```toml
//! store = "~/Drive"
//! cwd = "/docs"
//!
//! [index]
//! output_dir = "~/indexes"
//! suffix = "_index.txt"
//! throttle = "500ms"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::commands::DEFAULT_INDEX_SUFFIX;
use crate::error::{Error, Result};
use crate::index::DEFAULT_DELAY;

/// Environment variable naming the config file
pub const ENV_CONFIG: &str = "DRIVETREE_CONFIG";

const CONFIG_DIR_NAME: &str = "drivetree";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root directory of the store
    pub store: Option<PathBuf>,
    /// Remote working directory relative paths are resolved against
    pub cwd: String,
    pub index: IndexConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    pub output_dir: PathBuf,
    pub suffix: String,
    #[serde(with = "duration_str")]
    pub throttle: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: None,
            cwd: "/".to_string(),
            index: IndexConfig::default(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            suffix: DEFAULT_INDEX_SUFFIX.to_string(),
            throttle: DEFAULT_DELAY,
        }
    }
}

/// Durations are written as humantime strings (`500ms`, `1s`, `0s`).
mod duration_str {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, de};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(s.trim()).map_err(de::Error::custom)
    }
}

impl Config {
    /// Parse a config from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.store = config.store.map(|p| expand_home(&p));
        config.index.output_dir = expand_home(&config.index.output_dir);
        Ok(config)
    }

    /// Load from a file that must exist.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), config_message(&e))))
    }

    /// Load using the lookup order above.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            log::debug!("loading config from {}", path.display());
            return Self::from_file(path);
        }
        if let Some(path) = std::env::var_os(ENV_CONFIG) {
            let path = PathBuf::from(path);
            log::debug!("loading config from {} ({})", path.display(), ENV_CONFIG);
            return Self::from_file(&path);
        }
        match default_path() {
            Some(path) if path.exists() => {
                log::debug!("loading config from {}", path.display());
                Self::from_file(&path)
            }
            _ => {
                log::debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }
}

fn config_message(err: &Error) -> String {
    match err {
        Error::Config(msg) => msg.clone(),
        other => other.to_string(),
    }
}

/// `<config dir>/drivetree/config.toml`, if the platform has a config dir.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
