//! Configuration loader for Kafra.
//!
//! Reads `config.toml` and layers environment variables on top. An
//! explicitly requested file must exist and parse; the default file at
//! `~/.kafra/config.toml` is optional and falls back to defaults with a
//! warning when it is malformed.

use std::path::{Path, PathBuf};

use kafra_types::config::KafraConfig;
use kafra_types::error::ConfigError;

use crate::secret::first_set;

pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const PORT_VAR: &str = "PORT";
pub const API_URL_VARS: &[&str] = &["KAFRA_API_URL", "VITE_API_URL", "VITE_API_BASE_URL"];

/// `~/.kafra`, or `None` when the home directory is unknown.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".kafra"))
}

pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Load configuration from `path` (or the default location) and apply the
/// process environment.
pub async fn load_config(path: Option<&Path>) -> Result<KafraConfig, ConfigError> {
    load_config_with_env(path, |name| std::env::var(name).ok()).await
}

/// [`load_config`] with an explicit environment lookup.
pub async fn load_config_with_env(
    path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<KafraConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path).await?,
        None => match default_config_path() {
            Some(default_path) => load_or_default(&default_path).await,
            None => KafraConfig::default(),
        },
    };
    apply_env(&mut config, lookup)?;
    Ok(config)
}

/// Read and parse a config file that must exist.
pub async fn read_config_file(path: &Path) -> Result<KafraConfig, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                message: err.to_string(),
            });
        }
    };

    toml::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Read an optional config file, falling back to defaults on any problem.
pub async fn load_or_default(path: &Path) -> KafraConfig {
    match read_config_file(path).await {
        Ok(config) => {
            tracing::debug!("Loaded configuration from {}", path.display());
            config
        }
        Err(ConfigError::NotFound(_)) => {
            tracing::debug!("No config.toml found at {}, using defaults", path.display());
            KafraConfig::default()
        }
        Err(err) => {
            tracing::warn!("{err}, using defaults");
            KafraConfig::default()
        }
    }
}

/// Overlay environment variables onto a loaded configuration.
///
/// - `PORT` replaces `server.port`.
/// - `KAFRA_API_URL` (or `VITE_API_URL`, `VITE_API_BASE_URL`) replaces
///   `client.api_url`. The value `off` disables the primary backend.
pub fn apply_env(
    config: &mut KafraConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(port) = first_set(&lookup, &[PORT_VAR]) {
        config.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
            key: PORT_VAR.to_string(),
            message: format!("'{port}' is not a valid port number"),
        })?;
    }

    if let Some(url) = first_set(&lookup, API_URL_VARS) {
        config.client.api_url = if url.eq_ignore_ascii_case("off") {
            None
        } else {
            Some(url)
        };
    }

    Ok(())
}
