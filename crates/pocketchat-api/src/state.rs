//! Application state wiring adapters together.
//!
//! `AppState` holds what the RPC server needs per request: the context
//! factory (repository + identity resolver) and the procedure set bound to
//! the generation provider. Adapters are chosen at runtime from `AppConfig`
//! and pinned behind the boxed dynamic-dispatch wrappers.

use std::sync::Arc;

use anyhow::Context;
use secrecy::SecretString;

use pocketchat_core::context::{ContextFactory, PlaceholderIdentityResolver};
use pocketchat_core::generation::{BoxGenerationProvider, GenerationProvider};
use pocketchat_core::procedure::Procedures;
use pocketchat_core::repository::BoxMessageRepository;
use pocketchat_infra::gemini::GeminiProvider;
use pocketchat_infra::persistence::create_repository;
use pocketchat_types::config::{AppConfig, DEFAULT_MAX_BODY_BYTES};
use pocketchat_types::error::ConfigError;

pub type ConcreteContextFactory = ContextFactory<BoxMessageRepository, PlaceholderIdentityResolver>;

pub type ConcreteProcedures = Procedures<BoxGenerationProvider>;

/// Shared state for the RPC server. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub contexts: Arc<ConcreteContextFactory>,
    pub procedures: Arc<ConcreteProcedures>,
    /// Request body cap for the RPC routes.
    pub max_body_bytes: usize,
}

impl AppState {
    /// Connect the repository and provider described by `config`.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let (repository, provider) = build_adapters(config).await?;
        Ok(Self::from_parts(
            repository,
            provider,
            &config.auth.placeholder_subject,
        )
        .with_max_body_bytes(config.server.max_body_bytes))
    }

    pub fn from_parts(
        repository: BoxMessageRepository,
        provider: BoxGenerationProvider,
        placeholder_subject: &str,
    ) -> Self {
        Self {
            contexts: Arc::new(ContextFactory::new(
                repository,
                PlaceholderIdentityResolver::new(placeholder_subject),
            )),
            procedures: Arc::new(Procedures::new(provider)),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    pub fn backend(&self) -> &'static str {
        self.contexts.repository().backend()
    }

    pub fn provider_name(&self) -> &str {
        self.procedures.provider().name()
    }
}

/// Build the message repository and the generation provider from config.
///
/// Shared by the server and the in-process CLI client.
pub async fn build_adapters(
    config: &AppConfig,
) -> anyhow::Result<(BoxMessageRepository, BoxGenerationProvider)> {
    let repository = create_repository(&config.persistence)
        .await
        .context("failed to open the message store")?;

    let api_key = config
        .provider
        .api_key
        .clone()
        .ok_or(ConfigError::MissingApiKey)?;
    let gemini = GeminiProvider::new(SecretString::from(api_key), &config.provider)
        .context("failed to build the Gemini client")?;

    tracing::info!(
        backend = repository.backend(),
        text_model = gemini.text_model(),
        image_model = gemini.image_model(),
        "Adapters ready"
    );

    Ok((repository, BoxGenerationProvider::new(gemini)))
}
