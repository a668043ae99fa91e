use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidationErrors;

/// Machine-readable error code carried on the wire.
///
/// Procedures only ever produce the first three; the routing codes are
/// emitted by the HTTP endpoint before a procedure is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    InternalServerError,
    NotFound,
    MethodNotSupported,
    PayloadTooLarge,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::MethodNotSupported => "METHOD_NOT_SUPPORTED",
            ErrorCode::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error body: `{code, message}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

/// Error returned by every procedure.
///
/// The message is safe to show to the caller: persistence and provider
/// failures are logged where they happen and replaced by a fixed message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcedureError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Internal(String),
}

impl ProcedureError {
    pub fn unauthorized() -> Self {
        ProcedureError::Unauthorized("You must be logged in to access this resource".to_string())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ProcedureError::BadRequest(_) => ErrorCode::BadRequest,
            ProcedureError::Unauthorized(_) => ErrorCode::Unauthorized,
            ProcedureError::Internal(_) => ErrorCode::InternalServerError,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ProcedureError::BadRequest(m)
            | ProcedureError::Unauthorized(m)
            | ProcedureError::Internal(m) => m,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code(),
            message: self.message().to_string(),
        }
    }

    /// Rebuild a procedure error from a wire body. Routing codes have no
    /// procedure counterpart and yield `None`.
    pub fn from_body(body: ErrorBody) -> Option<Self> {
        match body.code {
            ErrorCode::BadRequest => Some(ProcedureError::BadRequest(body.message)),
            ErrorCode::Unauthorized => Some(ProcedureError::Unauthorized(body.message)),
            ErrorCode::InternalServerError => Some(ProcedureError::Internal(body.message)),
            ErrorCode::NotFound | ErrorCode::MethodNotSupported | ErrorCode::PayloadTooLarge => None,
        }
    }
}

impl From<ValidationErrors> for ProcedureError {
    fn from(errors: ValidationErrors) -> Self {
        ProcedureError::BadRequest(describe_validation_errors(&errors))
    }
}

/// Flatten validator output into one `field: message; ...` line, sorted by
/// field so the text is stable. Struct-level rules are reported bare.
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        let field: &str = &field;
        for err in field_errors.iter() {
            let text = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            if field == "__all__" {
                parts.push(text);
            } else {
                parts.push(format!("{field}: {text}"));
            }
        }
    }
    parts.sort();
    if parts.is_empty() {
        "Invalid input".to_string()
    } else {
        parts.join("; ")
    }
}

/// Errors from repository operations (used by trait definitions in pocketchat-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("row decode error: {0}")]
    Decode(String),

    #[error("store returned no row")]
    NoRow,
}

/// Errors from the generative-AI provider.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("provider error (HTTP {status}): {message}")]
    Provider { status: u16, message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("rate limited")]
    RateLimited,

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("no text was generated")]
    NoText,

    #[error("no image was generated")]
    NoImage,

    #[error("invalid image payload: {0}")]
    InvalidImage(String),
}

/// Errors resolving a bearer credential into an identity.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("empty bearer token")]
    EmptyToken,
}

/// Errors loading process-wide configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set in environment variables or config file")]
    MissingApiKey,

    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}
