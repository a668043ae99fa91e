//! Wire envelope of the RPC endpoint.
//!
//! ```json
//! { "result": <data>, "meta": { "request_id": "...", "timestamp": "...", "response_time_ms": 3 } }
//! { "error": { "code": "UNAUTHORIZED", "message": "..." }, "meta": { ... } }
//! ```
//!
//! Shared by the server, which writes it, and the HTTP client, which reads it.

use serde::{Deserialize, Serialize};

use crate::error::ErrorBody;

/// Path prefix of procedure routes: `{RPC_PREFIX}/{procedure}`.
pub const RPC_PREFIX: &str = "/api/rpc";

/// Request metadata attached to every envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcMeta {
    pub request_id: String,
    pub timestamp: String,
    pub response_time_ms: u64,
}

/// Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcEnvelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<RpcMeta>,
}

impl<T> RpcEnvelope<T> {
    pub fn success(result: T, meta: RpcMeta) -> Self {
        Self {
            result: Some(result),
            error: None,
            meta: Some(meta),
        }
    }

    pub fn failure(error: ErrorBody, meta: RpcMeta) -> Self {
        Self {
            result: None,
            error: Some(error),
            meta: Some(meta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    fn meta() -> RpcMeta {
        RpcMeta {
            request_id: "r1".to_string(),
            timestamp: "2025-03-01T10:00:00Z".to_string(),
            response_time_ms: 2,
        }
    }

    #[test]
    fn test_success_shape() {
        let json = serde_json::to_value(RpcEnvelope::success("hi", meta())).unwrap();
        assert_eq!(json["result"], "hi");
        assert!(json.get("error").is_none());
        assert_eq!(json["meta"]["request_id"], "r1");
    }

    #[test]
    fn test_failure_shape() {
        let body = ErrorBody {
            code: ErrorCode::BadRequest,
            message: "prompt: must not be empty".to_string(),
        };
        let json = serde_json::to_value(RpcEnvelope::<()>::failure(body, meta())).unwrap();
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert!(json.get("result").is_none());
    }

    #[test]
    fn test_reads_envelope_without_meta() {
        let parsed: RpcEnvelope<Vec<String>> =
            serde_json::from_value(json!({ "result": ["a", "b"] })).unwrap();
        assert_eq!(parsed.result, Some(vec!["a".to_string(), "b".to_string()]));
        assert!(parsed.meta.is_none());
    }
}
