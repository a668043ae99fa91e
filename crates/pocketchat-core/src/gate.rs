//! Authorization gate.
//!
//! `authorize` is the only way to obtain an `AuthorizedContext`, so any code
//! holding one has a caller identity by construction.

use pocketchat_types::error::ProcedureError;
use pocketchat_types::identity::Identity;

use crate::context::RequestContext;

/// A request context proven to carry an identity.
#[derive(Debug)]
pub struct AuthorizedContext<'a, R> {
    pub identity: &'a Identity,
    pub repository: &'a R,
}

/// Require an authenticated caller.
pub fn authorize<R>(ctx: &RequestContext<R>) -> Result<AuthorizedContext<'_, R>, ProcedureError> {
    match &ctx.identity {
        Some(identity) => Ok(AuthorizedContext {
            identity,
            repository: &ctx.repository,
        }),
        None => Err(ProcedureError::unauthorized()),
    }
}
