//! Base directory and search path configuration
//!
//! Templates are looked up in `<base>/templates` first. The base directory
//! is the one holding the executable unless `CONFIGURATOR_HOME` points
//! elsewhere. An optional `<base>/configurator.toml` appends directories:
//!
//! ```toml
//! [templates]
//! search_path = ["shared", "/etc/configurator/templates"]
//! ```

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::template::SearchPath;

/// Environment variable overriding the base directory
pub const HOME_ENV: &str = "CONFIGURATOR_HOME";

/// Name of the optional configuration file inside the base directory
pub const CONFIG_FILE: &str = "configurator.toml";

/// Directory inside the base directory that always heads the search path
pub const TEMPLATES_DIR: &str = "templates";

/// Errors that can occur when locating or reading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("can not determine the program location: {0}")]
    Location(#[source] std::io::Error),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Resolved settings for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub search_path: SearchPath,
}

/// TOML structure for deserializing the configuration file
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    #[serde(default)]
    templates: TomlTemplates,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlTemplates {
    #[serde(default)]
    search_path: Vec<PathBuf>,
}

impl Settings {
    /// Locate the base directory and load its configuration
    pub fn discover() -> Result<Self, ConfigError> {
        let base_dir = match env::var_os(HOME_ENV) {
            Some(home) if !home.is_empty() => PathBuf::from(home),
            _ => program_dir()?,
        };
        Self::from_base_dir(&base_dir)
    }

    /// Build settings for a given base directory
    pub fn from_base_dir(base_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = base_dir.join(CONFIG_FILE);
        let config = if config_path.is_file() {
            let content = std::fs::read_to_string(&config_path).map_err(|source| {
                ConfigError::Io {
                    path: config_path.clone(),
                    source,
                }
            })?;
            parse_config(&content).map_err(|source| ConfigError::Parse {
                path: config_path.clone(),
                source,
            })?
        } else {
            TomlConfig::default()
        };

        let mut search_path = SearchPath::new(vec![base_dir.join(TEMPLATES_DIR)]);
        for dir in config.templates.search_path {
            // Relative entries are anchored at the base directory
            search_path.push(base_dir.join(dir));
        }

        Ok(Settings { search_path })
    }
}

fn parse_config(content: &str) -> Result<TomlConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Directory containing the running executable
fn program_dir() -> Result<PathBuf, ConfigError> {
    let exe = env::current_exe().map_err(ConfigError::Location)?;
    let exe = exe.canonicalize().unwrap_or(exe);
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}
