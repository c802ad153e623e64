use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;
use giturlparse::platform::HostOverrides;
use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Extra hostnames for the exact-host platforms.
    pub hosts: HostOverrides,
}

/// Errors from loading the config file.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    #[diagnostic(help("check the --config flag and the GITURLPARSE_CONFIG variable"))]
    NotFound { path: PathBuf },

    #[error("failed to read config file {}", path.display())]
    #[diagnostic(help("check that the file is readable by the current user"))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}", path.display())]
    #[diagnostic(help("expected a [hosts] table with `github`, `bitbucket` or `assembla` lists"))]
    Invalid {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// `<config dir>/giturlparse/config.toml`, if the platform has a config dir.
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "giturlparse").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load the config from `explicit`, or from [`default_path`] when `None`.
pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match default_path() {
            Some(path) => (path, false),
            None => return Ok(Config::default()),
        },
    };

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if required {
                return Err(ConfigError::NotFound { path });
            }
            tracing::debug!(path = %path.display(), "no config file, using built-in platforms");
            return Ok(Config::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    let config = parse_config(&content).map_err(|source| ConfigError::Invalid {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

fn parse_config(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}
