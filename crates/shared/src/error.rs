use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    ConstraintViolation,
    Internal,
    #[serde(other)]
    Unknown,
}

/// Error body returned by the catalog API.
///
/// Structured backends send `{"code": ..., "message": ...}`; plain REST
/// framework backends only send `{"detail": ...}`, which is accepted as the
/// message with an `Unknown` code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default = "unknown_code")]
    pub code: ErrorCode,
    #[serde(alias = "detail")]
    pub message: String,
}

fn unknown_code() -> ErrorCode {
    ErrorCode::Unknown
}
