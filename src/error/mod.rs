//! Error types for agentchat.

pub mod unified;

pub use unified::ErrorCategory;

use thiserror::Error;

/// Primary error type for all agentchat operations.
///
/// Variants that carry a plain description display it verbatim, because the
/// relay renders failures to the user as `Error: <description>`.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A run reached a failed terminal state; holds the service diagnostic.
    #[error("{0}")]
    RunFailed(String),

    #[error("No response from the model.")]
    NoResponse,

    #[error("no thread for conversation {0}")]
    UnknownConversation(String),

    /// The chat host could not deliver or update a message.
    #[error("{0}")]
    Surface(String),

    /// A remote call failed with a plain description (used by in-process
    /// `AgentsApi` implementations).
    #[error("{0}")]
    Remote(String),
}

impl RelayError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote(message.into())
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Network(_) | Self::Remote(_) => ErrorCategory::Network,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                429 => ErrorCategory::RateLimit,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
            Self::RunFailed(_) | Self::NoResponse => ErrorCategory::Run,
            Self::UnknownConversation(_) | Self::Surface(_) => ErrorCategory::Host,
            Self::Io(_) => ErrorCategory::Unknown,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, RelayError>;
