use thiserror::Error;

use crate::error::RelayError;

/// Normalized authentication errors across credential sources.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No credential source produced a token (tried: {0})")]
    CredentialUnavailable(String),
    #[error("{source_name} rejected the request: {message}")]
    Rejected { source_name: String, message: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<AuthError> for RelayError {
    fn from(error: AuthError) -> Self {
        RelayError::Authentication(error.to_string())
    }
}
