//! Process-wide configuration types for PocketChat.
//!
//! `AppConfig` is assembled once at startup (file + environment, see
//! `pocketchat-infra::config`) and handed to the adapters that need it.
//! Nothing below the binary reads the environment directly.

use serde::Deserialize;

/// Top-level configuration. All sections have defaults except the provider
/// API key, whose absence is a startup error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Where the RPC server listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted RPC request body. Generated images travel back to
    /// `addAiResponse` as base64 data URLs, so this is well above a few MB.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Row-store connection settings.
///
/// `database_url` selects the backend: `sqlite://` for the embedded store,
/// `http(s)://` for a PostgREST-compatible row store authenticated with
/// `anon_key`. When unset, the loader fills in the default SQLite path.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersistenceConfig {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub anon_key: Option<String>,
    #[serde(default = "default_persistence_timeout")]
    pub request_timeout_secs: u64,
}

fn default_persistence_timeout() -> u64 {
    30
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            anon_key: None,
            request_timeout_secs: default_persistence_timeout(),
        }
    }
}

impl std::fmt::Debug for PersistenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceConfig")
            .field("database_url", &self.database_url)
            .field("anon_key", &self.anon_key.as_ref().map(|_| "[REDACTED]"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Generative-AI provider settings.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_provider_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_text_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_image_model() -> String {
    "imagen-3.0-generate-002".to_string()
}

fn default_provider_timeout() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            request_timeout_secs: default_provider_timeout(),
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Identity resolution settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Subject assigned to every bearer token by the placeholder resolver.
    #[serde(default = "default_placeholder_subject")]
    pub placeholder_subject: String,
}

fn default_placeholder_subject() -> String {
    "user_123".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            placeholder_subject: default_placeholder_subject(),
        }
    }
}
