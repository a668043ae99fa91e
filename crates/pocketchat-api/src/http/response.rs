//! Envelope response format for the RPC endpoint.
//!
//! Every response is wrapped in the same envelope:
//! ```json
//! {
//!   "result": { ... },
//!   "meta": { "request_id": "...", "timestamp": "...", "response_time_ms": 5 }
//! }
//! ```
//! or, on failure, `"error": { "code": "...", "message": "..." }` in place
//! of `result`.

use std::time::Instant;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use pocketchat_types::rpc::{RpcEnvelope, RpcMeta};

use crate::http::error::AppError;

/// Request id and start time, captured when a call arrives.
#[derive(Debug, Clone)]
pub struct RequestTimer {
    request_id: String,
    started: Instant,
}

impl RequestTimer {
    pub fn start() -> Self {
        Self {
            request_id: uuid::Uuid::now_v7().to_string(),
            started: Instant::now(),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn meta(&self) -> RpcMeta {
        RpcMeta {
            request_id: self.request_id.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            response_time_ms: self.started.elapsed().as_millis() as u64,
        }
    }
}

/// An enveloped result plus the HTTP status to send it with.
#[derive(Debug)]
pub struct RpcResponse {
    pub status: StatusCode,
    pub envelope: RpcEnvelope<Value>,
}

impl RpcResponse {
    pub fn success(result: Value, timer: &RequestTimer) -> Self {
        Self {
            status: StatusCode::OK,
            envelope: RpcEnvelope::success(result, timer.meta()),
        }
    }

    pub fn failure(error: AppError, timer: &RequestTimer) -> Self {
        Self {
            status: error.status(),
            envelope: RpcEnvelope::failure(error.body(), timer.meta()),
        }
    }
}

impl IntoResponse for RpcResponse {
    fn into_response(self) -> Response {
        let body = serde_json::to_string(&self.envelope).unwrap_or_else(|_| {
            r#"{"error":{"code":"INTERNAL_SERVER_ERROR","message":"Failed to serialize response"}}"#
                .to_string()
        });

        (
            self.status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}
