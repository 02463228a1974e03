use thiserror::Error;

use crate::config::ConfigError;

/// Error types that can occur when talking to the compute control plane.
#[derive(Debug, Error)]
pub enum FleetError {
    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// Credential loading, request signing or 401 responses
    #[error("Auth error: {0}")]
    AuthError(String),
    /// Non-success status returned by the service
    #[error("API error ({status} {code}): {message}")]
    ApiError {
        status: u16,
        code: String,
        message: String,
    },
    /// Invalid request parameters or format
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// API response parsing or format error
    #[error("Response format error: {message}. Raw response: {raw_response}")]
    ResponseFormatError {
        message: String,
        raw_response: String,
    },
    /// JSON serialization/deserialization errors
    #[error("JSON parse error: {0}")]
    JsonError(String),
    /// Configuration could not be loaded or is incomplete
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl FleetError {
    /// HTTP status carried by the error, when the service produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            FleetError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Converts reqwest HTTP errors into FleetErrors
impl From<reqwest::Error> for FleetError {
    fn from(err: reqwest::Error) -> Self {
        FleetError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for FleetError {
    fn from(err: serde_json::Error) -> Self {
        FleetError::JsonError(format!(
            "{} at line {} column {}",
            err,
            err.line(),
            err.column()
        ))
    }
}
