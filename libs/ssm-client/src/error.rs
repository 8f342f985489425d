//! Error types for the SSM client

use thiserror::Error;

/// Errors raised by a [`RequestSigner`](crate::RequestSigner)
#[derive(Error, Debug)]
pub enum SigningError {
    /// Credentials or region rejected before any signing took place
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The request could not be signed
    #[error("Failed to sign request: {0}")]
    Failed(String),
}

/// Errors that can occur when talking to the Parameter Store API
#[derive(Error, Debug)]
pub enum SsmError {
    /// The service answered with a status other than 200 or 404
    #[error("Failed to get parameter: {status} {response}")]
    Service { status: u16, response: String },

    /// HTTP transport failure (DNS, connection refused, timeout, ...)
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Request signing failed
    #[error(transparent)]
    Signing(#[from] SigningError),

    /// A 200 response whose body is not the expected JSON
    #[error("Failed to parse response: {source}")]
    Parse {
        source: serde_json::Error,
        response: String,
    },

    /// A 200 response that parsed but carries no result
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String, response: String },

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Operation parameters that cannot be turned into a request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl SsmError {
    /// HTTP status of a service error
    pub fn status(&self) -> Option<u16> {
        match self {
            SsmError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body kept for diagnostics, empty when there is none
    pub fn response(&self) -> &str {
        match self {
            SsmError::Service { response, .. }
            | SsmError::Parse { response, .. }
            | SsmError::InvalidResponse { response, .. } => response,
            _ => "",
        }
    }

    /// Service error code from a JSON error body (`__type`), e.g. `ParameterNotFound`
    pub fn error_code(&self) -> Option<String> {
        let SsmError::Service { response, .. } = self else {
            return None;
        };
        let body: serde_json::Value = serde_json::from_str(response).ok()?;
        let code = body.get("__type")?.as_str()?;
        // Some endpoints qualify the code: "com.amazonaws.ssm#ParameterNotFound"
        code.rsplit('#').next().map(str::to_string)
    }
}
