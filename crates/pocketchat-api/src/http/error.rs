//! Endpoint error type mapping to HTTP status codes and the RPC envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use pocketchat_types::error::{ErrorBody, ErrorCode, ProcedureError};
use pocketchat_types::procedure::ProcedureName;

use crate::http::response::{RequestTimer, RpcResponse};

/// Everything the RPC endpoint can answer with instead of a result.
#[derive(Debug)]
pub enum AppError {
    /// The procedure ran (or validated its input) and failed.
    Procedure(ProcedureError),
    /// No procedure has this name.
    UnknownProcedure(String),
    /// A mutation was called with GET.
    MethodNotSupported(ProcedureName),
    /// The request body or `input` parameter is not JSON.
    MalformedInput(String),
    /// The request body is over the configured cap.
    PayloadTooLarge(String),
}

impl From<ProcedureError> for AppError {
    fn from(e: ProcedureError) -> Self {
        AppError::Procedure(e)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self.code() {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::MethodNotSupported => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Procedure(e) => e.code(),
            AppError::UnknownProcedure(_) => ErrorCode::NotFound,
            AppError::MethodNotSupported(_) => ErrorCode::MethodNotSupported,
            AppError::MalformedInput(_) => ErrorCode::BadRequest,
            AppError::PayloadTooLarge(_) => ErrorCode::PayloadTooLarge,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            AppError::Procedure(e) => e.to_body(),
            AppError::UnknownProcedure(name) => ErrorBody {
                code: self.code(),
                message: format!("No procedure found on path \"{name}\""),
            },
            AppError::MethodNotSupported(name) => ErrorBody {
                code: self.code(),
                message: format!("Unsupported GET request to mutation \"{name}\""),
            },
            AppError::MalformedInput(detail) => ErrorBody {
                code: self.code(),
                message: format!("Invalid input: {detail}"),
            },
            AppError::PayloadTooLarge(detail) => ErrorBody {
                code: self.code(),
                message: format!("Request body too large: {detail}"),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        RpcResponse::failure(self, &RequestTimer::start()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_procedure_codes_map_to_status() {
        let cases = [
            (ProcedureError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ProcedureError::unauthorized(), StatusCode::UNAUTHORIZED),
            (ProcedureError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(AppError::from(error).status(), status);
        }
    }

    #[test]
    fn test_routing_errors() {
        let unknown = AppError::UnknownProcedure("nope".to_string());
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
        assert_eq!(unknown.body().code, ErrorCode::NotFound);

        let too_large = AppError::PayloadTooLarge("length limit exceeded".to_string());
        assert_eq!(too_large.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(too_large.body().code, ErrorCode::PayloadTooLarge);

        let get_mutation = AppError::MethodNotSupported(ProcedureName::AddUserMessage);
        assert_eq!(get_mutation.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(get_mutation.body().message.contains("addUserMessage"));
    }

    #[test]
    fn test_procedure_message_passes_through() {
        let error = AppError::from(ProcedureError::Internal("Failed to add message".into()));
        assert_eq!(error.body().message, "Failed to add message");
    }
}
