//! Client configuration parsed from environment variables.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const STORE_DIR: &str = ".jobtrack";
pub const STORE_FILE: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL without a trailing slash.
    pub api_url: String,
    /// Location of the persisted key-value store holding the token.
    pub store_path: PathBuf,
}

impl ClientConfig {
    /// Build config from environment variables, loading `.env` first if present.
    /// Explicit `api_url` / `store_path` values (command-line flags) win over
    /// the environment.
    ///
    /// Optional:
    /// - `JOBTRACK_API_URL`: default `http://localhost:5000`
    /// - `JOBTRACK_STORE_PATH`: default `$HOME/.jobtrack/session.json`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or no store path can be resolved.
    pub fn from_env(api_url: Option<&str>, store_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let env_api_url = std::env::var("JOBTRACK_API_URL").ok();
        let store_path = store_path.or_else(|| std::env::var("JOBTRACK_STORE_PATH").ok().map(PathBuf::from));
        let home = std::env::var("HOME").ok();
        Self::resolve(api_url.or(env_api_url.as_deref()), store_path, home.as_deref())
    }

    /// Build config from explicit values, falling back to defaults for anything absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or no store path can be resolved.
    pub fn resolve(api_url: Option<&str>, store_path: Option<PathBuf>, home: Option<&str>) -> Result<Self, ConfigError> {
        let api_url = parse_api_url(api_url.unwrap_or(DEFAULT_API_URL))?;
        let store_path = match store_path {
            Some(path) => path,
            None => default_store_path(home)?,
        };
        Ok(Self { api_url, store_path })
    }
}

fn parse_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn default_store_path(home: Option<&str>) -> Result<PathBuf, ConfigError> {
    let home = home.filter(|h| !h.is_empty()).ok_or(ConfigError::MissingHome)?;
    Ok(Path::new(home).join(STORE_DIR).join(STORE_FILE))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
