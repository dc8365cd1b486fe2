//! API Error Types
//!
//! Errors raised by the request gateway and the typed resource clients.

use thiserror::Error;

/// Errors from the authenticated request gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The backend rejected the session (HTTP 401). Teardown has already run.
    #[error("Session rejected by server")]
    Unauthorized,

    /// Transport failure: connect, timeout, body read
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Any other non-success status
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },
}

/// Errors from room and message calls
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Session rejected by server")]
    Unauthorized,

    #[error("Request failed: {0}")]
    Network(reqwest::Error),

    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Unauthorized => ApiError::Unauthorized,
            GatewayError::Network(e) => ApiError::Network(e),
            GatewayError::Status { status, message } => ApiError::Status { status, message },
        }
    }
}

impl ApiError {
    pub(crate) fn from_body_error(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err)
        }
    }
}

/// Errors from login and account creation
///
/// These never touch the stored session; the form shows them inline.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Credentials rejected ({status})")]
    Rejected { status: u16 },

    #[error("Request failed: {0}")]
    Network(reqwest::Error),

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl From<GatewayError> for AuthError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Unauthorized => AuthError::Rejected { status: 401 },
            GatewayError::Network(e) => AuthError::Network(e),
            GatewayError::Status { status, .. } => AuthError::Rejected { status },
        }
    }
}

/// Result type for resource calls
pub type ApiResult<T> = Result<T, ApiError>;
