//! Request-context extractor.
//!
//! Reads the `Authorization` header and hands it to the shared
//! `ContextFactory`. Extraction never fails: a missing, malformed, or
//! unresolvable credential yields an anonymous context, and the procedure
//! gate decides what an anonymous caller may do.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use pocketchat_core::context::RequestContext;
use pocketchat_core::repository::BoxMessageRepository;

use crate::state::AppState;

/// The context a procedure runs in for this request.
pub struct CallContext(pub RequestContext<BoxMessageRepository>);

impl FromRequestParts<AppState> for CallContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Non-UTF-8 header values are treated as absent.
        let authorization = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        Ok(CallContext(state.contexts.create(authorization).await))
    }
}
