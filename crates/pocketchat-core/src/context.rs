//! Per-request context construction.
//!
//! `ContextFactory` turns the raw `Authorization` header of an incoming call
//! into a `RequestContext`: the shared persistence handle plus an optional
//! caller identity. It never rejects a request; deciding whether an
//! anonymous caller may proceed is the gate's job.

use pocketchat_types::error::IdentityError;
use pocketchat_types::identity::Identity;
use tracing::{debug, warn};

use crate::repository::MessageRepository;

/// Maps a bearer token to the identity it proves.
pub trait IdentityResolver: Send + Sync {
    fn resolve(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<Identity, IdentityError>> + Send;
}

/// Placeholder resolver: any non-empty token maps to one fixed subject.
///
/// No signature or expiry check happens here. Swap in a verifying resolver
/// before exposing the server to untrusted clients.
#[derive(Debug, Clone)]
pub struct PlaceholderIdentityResolver {
    subject: String,
}

impl PlaceholderIdentityResolver {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

impl IdentityResolver for PlaceholderIdentityResolver {
    async fn resolve(&self, token: &str) -> Result<Identity, IdentityError> {
        if token.trim().is_empty() {
            return Err(IdentityError::EmptyToken);
        }
        Ok(Identity::new(self.subject.clone()))
    }
}

/// Everything a procedure may touch for one invocation.
#[derive(Debug, Clone)]
pub struct RequestContext<R> {
    pub repository: R,
    pub identity: Option<Identity>,
}

impl<R> RequestContext<R> {
    /// Context with no caller identity.
    pub fn anonymous(repository: R) -> Self {
        Self {
            repository,
            identity: None,
        }
    }

    pub fn authenticated(repository: R, identity: Identity) -> Self {
        Self {
            repository,
            identity: Some(identity),
        }
    }
}

/// Builds a `RequestContext` for every inbound call.
///
/// Holds the repository handle constructed once at startup; each context
/// gets a clone of it.
pub struct ContextFactory<R, I> {
    repository: R,
    resolver: I,
}

impl<R, I> ContextFactory<R, I>
where
    R: MessageRepository + Clone,
    I: IdentityResolver,
{
    pub fn new(repository: R, resolver: I) -> Self {
        Self {
            repository,
            resolver,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Build the context for a request carrying the given `Authorization`
    /// header value (if any).
    pub async fn create(&self, authorization: Option<&str>) -> RequestContext<R> {
        let Some(token) = authorization.and_then(bearer_token) else {
            debug!("No bearer credential on request");
            return RequestContext::anonymous(self.repository.clone());
        };

        match self.resolver.resolve(token).await {
            Ok(identity) => RequestContext::authenticated(self.repository.clone(), identity),
            Err(e) => {
                warn!(error = %e, "Failed to resolve bearer token, continuing without identity");
                RequestContext::anonymous(self.repository.clone())
            }
        }
    }
}

/// Extract the token from a `Bearer <token>` header value.
///
/// The scheme is matched exactly, like the header check it replaces.
pub fn bearer_token(header: &str) -> Option<&str> {
    header.strip_prefix("Bearer ")
}
