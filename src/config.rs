use crate::error::{ChangelogError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the project-local configuration file
pub const LOCAL_CONFIG_FILE: &str = "taglog.toml";

/// Settings for taglog, as read from a configuration file.
///
/// Every field is optional in the file; command-line flags and environment
/// variables take precedence over anything set here.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Repository to read; defaults to the current directory
    pub repo: Option<PathBuf>,

    /// Write the changelog to this file instead of stdout
    pub output: Option<PathBuf>,

    /// Only generate the unreleased section
    pub unreleased: bool,

    /// Explicit version for the unreleased section
    pub tag: Option<String>,

    pub inc_major: bool,
    pub inc_minor: bool,
    pub inc_patch: bool,

    /// Terminal styling of stdout output
    pub style: StyleMode,
}

/// When to style output written to the terminal
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StyleMode {
    /// Style only when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

/// A loaded configuration and the file it came from
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: Option<PathBuf>,
}

/// Candidate configuration files, in search order
fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("taglog").join("config.toml"));
    }
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(".taglog.toml"));
    }
    paths
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `taglog.toml` in current directory
/// 3. `taglog/config.toml` in the user config directory
/// 4. `~/.taglog.toml`
/// 5. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(LoadedConfig)` - Loaded or default configuration
/// * `Err` - If the custom path is missing, or a file cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<LoadedConfig> {
    let path = match config_path {
        Some(path) => {
            if !path.exists() {
                return Err(ChangelogError::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_config_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => path,
            None => {
                return Ok(LoadedConfig {
                    config: Config::default(),
                    source: None,
                })
            }
        },
    };

    let config_str = fs::read_to_string(&path)?;
    let config: Config = toml::from_str(&config_str)?;
    Ok(LoadedConfig {
        config,
        source: Some(path),
    })
}
