use std::fs;
use std::path::{Path, PathBuf};

use crater_engine::ServiceSettings;
use crater_logging::{crater_error, crater_info, crater_warn};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "crater.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings from {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Loads settings from `explicit` or `./crater.ron`, then applies the
/// command-line and environment overrides.
///
/// A missing default file means defaults; a missing explicit file is an error.
pub fn resolve(
    explicit: Option<&Path>,
    base_url: Option<String>,
    token: Option<String>,
) -> Result<ServiceSettings, ConfigError> {
    let settings = match explicit {
        Some(path) => load_settings(path),
        None => load_settings_or_default(Path::new(DEFAULT_CONFIG_FILE)),
    }
    .inspect_err(|err| crater_error!("Settings unavailable: {}", err))?;
    Ok(apply_overrides(settings, base_url, token))
}

pub fn load_settings(path: &Path) -> Result<ServiceSettings, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: ServiceSettings =
        ron::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    crater_info!("Loaded settings from {:?}", path);
    Ok(settings)
}

pub fn load_settings_or_default(path: &Path) -> Result<ServiceSettings, ConfigError> {
    match load_settings(path) {
        Err(ConfigError::Read { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            crater_info!("No settings file at {:?}; using defaults", path);
            Ok(ServiceSettings::default())
        }
        other => other,
    }
}

pub fn apply_overrides(
    mut settings: ServiceSettings,
    base_url: Option<String>,
    token: Option<String>,
) -> ServiceSettings {
    if let Some(base_url) = base_url {
        settings.base_url = base_url;
    }
    if let Some(token) = token {
        if token.trim().is_empty() {
            crater_warn!("Ignoring empty access token");
        } else {
            settings.access_token = Some(token);
        }
    }
    settings
}
