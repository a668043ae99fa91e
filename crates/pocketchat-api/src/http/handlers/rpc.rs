//! Procedure call handlers.
//!
//! Endpoints:
//! - GET  /api/rpc/{procedure}?input=<json> - Call a query procedure
//! - POST /api/rpc/{procedure}              - Call any procedure with a JSON body
//!
//! The path segment accepts both the canonical name (`listMessages`) and
//! the namespaced alias (`messages.getMessages`).

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::Value;
use tracing::debug;

use pocketchat_core::context::RequestContext;
use pocketchat_core::repository::BoxMessageRepository;
use pocketchat_types::procedure::{ProcedureKind, ProcedureName};

use crate::http::error::AppError;
use crate::http::extractors::context::CallContext;
use crate::http::extractors::query::RpcQuery;
use crate::http::response::{RequestTimer, RpcResponse};
use crate::state::AppState;

/// GET /api/rpc/{procedure}
pub async fn query_procedure(
    State(state): State<AppState>,
    Path(procedure): Path<String>,
    CallContext(ctx): CallContext,
    query: Result<Query<RpcQuery>, QueryRejection>,
) -> RpcResponse {
    let timer = RequestTimer::start();
    let outcome = match query {
        Ok(Query(query)) => handle_query(&state, &procedure, &ctx, query).await,
        Err(rejection) => Err(AppError::MalformedInput(rejection.body_text())),
    };
    respond(&procedure, outcome, &timer)
}

/// POST /api/rpc/{procedure}
pub async fn mutate_procedure(
    State(state): State<AppState>,
    Path(procedure): Path<String>,
    CallContext(ctx): CallContext,
    body: Result<Bytes, BytesRejection>,
) -> RpcResponse {
    let timer = RequestTimer::start();
    let outcome = match body {
        Ok(body) => handle_post(&state, &procedure, &ctx, &body).await,
        Err(rejection) => Err(body_rejection(rejection)),
    };
    respond(&procedure, outcome, &timer)
}

async fn handle_query(
    state: &AppState,
    procedure: &str,
    ctx: &RequestContext<BoxMessageRepository>,
    query: RpcQuery,
) -> Result<Value, AppError> {
    let name = resolve(procedure)?;
    if name.kind() == ProcedureKind::Mutation {
        return Err(AppError::MethodNotSupported(name));
    }

    let input = match query.input.as_deref() {
        Some(raw) => parse_json(raw.as_bytes())?,
        None => Value::Null,
    };
    Ok(state.procedures.dispatch(name, ctx, input).await?)
}

/// Queries are accepted over POST as well; only GET is restricted.
async fn handle_post(
    state: &AppState,
    procedure: &str,
    ctx: &RequestContext<BoxMessageRepository>,
    body: &[u8],
) -> Result<Value, AppError> {
    let name = resolve(procedure)?;
    let input = parse_json(body)?;
    Ok(state.procedures.dispatch(name, ctx, input).await?)
}

/// Keep extractor failures inside the envelope.
fn body_rejection(rejection: BytesRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(rejection.body_text())
    } else {
        AppError::MalformedInput(rejection.body_text())
    }
}

fn resolve(procedure: &str) -> Result<ProcedureName, AppError> {
    procedure
        .parse()
        .map_err(|_| AppError::UnknownProcedure(procedure.to_string()))
}

/// An empty body means "no input"; the procedure treats it as `{}`.
fn parse_json(raw: &[u8]) -> Result<Value, AppError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(raw).map_err(|e| AppError::MalformedInput(e.to_string()))
}

fn respond(procedure: &str, outcome: Result<Value, AppError>, timer: &RequestTimer) -> RpcResponse {
    let response = match outcome {
        Ok(result) => RpcResponse::success(result, timer),
        Err(error) => RpcResponse::failure(error, timer),
    };
    debug!(
        procedure,
        request_id = timer.request_id(),
        status = response.status.as_u16(),
        "RPC call finished"
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_empty_body_is_null() {
        assert_eq!(parse_json(b"").unwrap(), Value::Null);
        assert_eq!(parse_json(b"  \n").unwrap(), Value::Null);
    }

    #[test]
    fn test_parse_json_rejects_garbage() {
        assert!(matches!(parse_json(b"{not json"), Err(AppError::MalformedInput(_))));
    }

    #[test]
    fn test_resolve_accepts_alias() {
        assert_eq!(resolve("gemini.generateText").unwrap(), ProcedureName::GenerateText);
        assert!(matches!(resolve("deleteEverything"), Err(AppError::UnknownProcedure(_))));
    }
}
