//! Credential resolution for the agent service.
//!
//! A [`ChainedTokenCredential`] walks an ordered list of
//! [`TokenCredential`] sources. Each source either produces a token, reports
//! that it does not apply (`Ok(None)`), or fails hard. The first token wins.

pub mod chain;
pub mod error;
pub mod providers;
pub mod token;

use async_trait::async_trait;

pub use chain::ChainedTokenCredential;
pub use error::AuthError;
pub use providers::{
    AzureCliCredential, ClientSecretCredential, ManagedIdentityCredential, StaticTokenCredential,
};
pub use token::AccessToken;

/// A single source of bearer tokens.
#[async_trait]
pub trait TokenCredential: Send + Sync {
    /// Short name used in logs and exhaustion errors.
    fn name(&self) -> &str;

    /// Fetch a token for `scope`, or `Ok(None)` if this source is not
    /// configured in the current environment.
    async fn get_token(&self, scope: &str) -> Result<Option<AccessToken>, AuthError>;
}
