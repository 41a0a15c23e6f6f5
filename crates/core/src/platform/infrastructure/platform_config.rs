use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::{
    API_TOKEN_ENV, CONFIG_DIR_NAME, CONFIG_FILE_NAME, ENV_FILE_NAME, SERVER_ADDRESS_ENV,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no server address given (use --server or SERVER_ADDRESS, run `labelbind login`, or set it in ~/supervisely.env)")]
    MissingServer,
    #[error("no API token given (use --token or API_TOKEN, run `labelbind login`, or set it in ~/supervisely.env)")]
    MissingToken,
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid credentials file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid env file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
    #[error("could not determine config directory")]
    NoConfigDir,
}

/// Where and as whom to talk to the annotation platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub server_address: String,
    pub api_token: String,
}

#[derive(Default, Deserialize)]
struct StoredCredentials {
    server_address: Option<String>,
    api_token: Option<String>,
}

impl PlatformConfig {
    pub fn new(server_address: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            server_address: server_address.into(),
            api_token: api_token.into(),
        }
    }

    /// `~/.config/labelbind/credentials.json` (platform-specific config dir).
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// `~/supervisely.env`, if a home directory is known.
    pub fn env_file_path() -> Option<PathBuf> {
        dirs::home_dir().map(|d| d.join(ENV_FILE_NAME))
    }

    /// Resolves the configuration.
    ///
    /// Explicit values (CLI flags or their environment variables) win. A
    /// missing value is then taken from the credentials file at `path`, and
    /// finally from the `SERVER_ADDRESS`/`API_TOKEN` entries of `env_file`.
    /// Absent files are skipped; the process environment is never modified.
    pub fn resolve(
        server_address: Option<String>,
        api_token: Option<String>,
        path: &Path,
        env_file: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let mut resolved = StoredCredentials {
            server_address: non_empty(server_address),
            api_token: non_empty(api_token),
        };
        if !resolved.is_complete() {
            resolved.fill_from(read_credentials(path)?);
        }
        if let Some(env_file) = env_file.filter(|_| !resolved.is_complete()) {
            resolved.fill_from(read_env_file(env_file)?);
        }

        let server_address = resolved.server_address.ok_or(ConfigError::MissingServer)?;
        let api_token = resolved.api_token.ok_or(ConfigError::MissingToken)?;
        Ok(Self::new(server_address, api_token))
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, json).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

impl StoredCredentials {
    fn is_complete(&self) -> bool {
        self.server_address.is_some() && self.api_token.is_some()
    }

    fn fill_from(&mut self, other: StoredCredentials) {
        self.server_address = self.server_address.take().or(non_empty(other.server_address));
        self.api_token = self.api_token.take().or(non_empty(other.api_token));
    }
}

fn read_credentials(path: &Path) -> Result<StoredCredentials, ConfigError> {
    if !path.exists() {
        return Ok(StoredCredentials::default());
    }
    let json = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&json).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

fn read_env_file(path: &Path) -> Result<StoredCredentials, ConfigError> {
    let mut stored = StoredCredentials::default();
    if !path.exists() {
        return Ok(stored);
    }
    let env_error = |e| ConfigError::EnvFile {
        path: path.to_path_buf(),
        source: e,
    };
    for item in dotenvy::from_path_iter(path).map_err(env_error)? {
        let (key, value) = item.map_err(env_error)?;
        match key.as_str() {
            SERVER_ADDRESS_ENV => stored.server_address = Some(value),
            API_TOKEN_ENV => stored.api_token = Some(value),
            _ => {}
        }
    }
    Ok(stored)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
