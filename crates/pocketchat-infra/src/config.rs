//! Application configuration loader for PocketChat.
//!
//! Reads an optional TOML file into [`AppConfig`], then applies environment
//! overrides. The result is immutable for the life of the process.
//!
//! | Variable | Overrides |
//! |---|---|
//! | `POCKETCHAT_DATABASE_URL` | `persistence.database_url` |
//! | `POCKETCHAT_DATABASE_ANON_KEY` | `persistence.anon_key` |
//! | `GEMINI_API_KEY`, `GOOGLE_GEMINI_API_KEY` | `provider.api_key` |
//! | `POCKETCHAT_GEMINI_BASE_URL` | `provider.base_url` |
//! | `POCKETCHAT_PLACEHOLDER_SUBJECT` | `auth.placeholder_subject` |
//! | `POCKETCHAT_DATA_DIR` | directory for the default SQLite database and `config.toml` |

use std::path::Path;

use pocketchat_types::config::AppConfig;
use pocketchat_types::error::ConfigError;

use crate::sqlite::pool::{default_data_dir, default_database_url};

/// Load configuration using the process environment.
///
/// `path` is an explicit config file; when `None`, `{data_dir}/config.toml`
/// is read if it exists.
pub async fn load_app_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_app_config_with(path, |name| std::env::var(name).ok()).await
}

/// Same as [`load_app_config`] with an injectable environment lookup.
pub async fn load_app_config_with<F>(path: Option<&Path>, env: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let env = |name: &str| env(name).filter(|v| !v.trim().is_empty());

    let mut config = match path {
        Some(path) => read_config_file(path, true).await?,
        None => {
            let default_path = default_data_dir(env("POCKETCHAT_DATA_DIR")).join("config.toml");
            read_config_file(&default_path, false).await?
        }
    };

    if let Some(url) = env("POCKETCHAT_DATABASE_URL") {
        config.persistence.database_url = Some(url);
    }
    if let Some(key) = env("POCKETCHAT_DATABASE_ANON_KEY") {
        config.persistence.anon_key = Some(key);
    }
    if let Some(key) = env("GEMINI_API_KEY").or_else(|| env("GOOGLE_GEMINI_API_KEY")) {
        config.provider.api_key = Some(key);
    }
    if let Some(base_url) = env("POCKETCHAT_GEMINI_BASE_URL") {
        config.provider.base_url = base_url;
    }
    if let Some(subject) = env("POCKETCHAT_PLACEHOLDER_SUBJECT") {
        config.auth.placeholder_subject = subject;
    }

    if config.persistence.database_url.is_none() {
        config.persistence.database_url = Some(default_database_url(env("POCKETCHAT_DATA_DIR")));
    }

    validate(&config)?;
    Ok(config)
}

/// Read and parse a TOML file. A missing file is only an error when the
/// caller named it explicitly.
async fn read_config_file(path: &Path, required: bool) -> Result<AppConfig, ConfigError> {
    let display = path.display().to_string();
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: display,
                message: err.to_string(),
            });
        }
    };

    toml::from_str::<AppConfig>(&content).map_err(|err| ConfigError::Parse {
        path: display,
        message: err.to_string(),
    })
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config
        .provider
        .api_key
        .as_deref()
        .is_none_or(|k| k.trim().is_empty())
    {
        return Err(ConfigError::MissingApiKey);
    }

    if config.auth.placeholder_subject.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "auth.placeholder_subject".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    for (key, secs) in [
        ("persistence.request_timeout_secs", config.persistence.request_timeout_secs),
        ("provider.request_timeout_secs", config.provider.request_timeout_secs),
    ] {
        if secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
    }

    let url = config.persistence.database_url.as_deref().unwrap_or_default();
    if url.starts_with("http://") || url.starts_with("https://") {
        if config.persistence.anon_key.is_none() {
            return Err(ConfigError::InvalidValue {
                key: "persistence.anon_key".to_string(),
                message: "required when database_url is an HTTP row store".to_string(),
            });
        }
    } else if !url.starts_with("sqlite:") {
        return Err(ConfigError::InvalidValue {
            key: "persistence.database_url".to_string(),
            message: format!("unsupported scheme in '{url}' (expected sqlite:, http:// or https://)"),
        });
    }

    Ok(())
}
