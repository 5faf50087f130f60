use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;

use super::error::AuthError;
use super::providers::{
    AzureCliCredential, ClientSecretCredential, ManagedIdentityCredential, StaticTokenCredential,
};
use super::token::AccessToken;
use super::TokenCredential;

/// Tokens closer than this to expiry are fetched again.
const REFRESH_MARGIN_MINUTES: i64 = 5;

/// Ordered list of credential sources; the first one that yields a token
/// wins. When none applies the chain fails with the names of every source
/// it tried.
///
/// The winning token is cached per scope until it comes within five minutes
/// of its expiry.
pub struct ChainedTokenCredential {
    sources: Vec<Arc<dyn TokenCredential>>,
    cached: Mutex<Option<(String, AccessToken)>>,
}

impl ChainedTokenCredential {
    pub fn new(sources: Vec<Arc<dyn TokenCredential>>) -> Self {
        Self {
            sources,
            cached: Mutex::new(None),
        }
    }

    /// The default chain: explicit token, service principal, managed
    /// identity, then the Azure CLI.
    pub fn from_env(client: reqwest::Client) -> Self {
        Self::from_lookup(client, |key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(client: reqwest::Client, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let sources: Vec<Arc<dyn TokenCredential>> = vec![
            Arc::new(StaticTokenCredential::from_lookup(&lookup)),
            Arc::new(ClientSecretCredential::from_lookup(client.clone(), &lookup)),
            Arc::new(ManagedIdentityCredential::from_lookup(client, &lookup)),
            Arc::new(AzureCliCredential::new()),
        ];
        Self::new(sources)
    }

    /// Names of the sources, in the order they are tried.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    fn cached_for(&self, scope: &str) -> Option<AccessToken> {
        let cached = self.cached.lock().ok()?;
        match cached.as_ref() {
            Some((cached_scope, token))
                if cached_scope == scope
                    && token.is_fresh(Duration::minutes(REFRESH_MARGIN_MINUTES)) =>
            {
                Some(token.clone())
            }
            _ => None,
        }
    }

    fn store(&self, scope: &str, token: &AccessToken) {
        if let Ok(mut cached) = self.cached.lock() {
            *cached = Some((scope.to_string(), token.clone()));
        }
    }
}

#[async_trait]
impl TokenCredential for ChainedTokenCredential {
    fn name(&self) -> &str {
        "chain"
    }

    async fn get_token(&self, scope: &str) -> Result<Option<AccessToken>, AuthError> {
        if let Some(token) = self.cached_for(scope) {
            return Ok(Some(token));
        }

        for source in &self.sources {
            match source.get_token(scope).await {
                Ok(Some(token)) => {
                    tracing::debug!(source = source.name(), "credential resolved");
                    self.store(scope, &token);
                    return Ok(Some(token));
                }
                Ok(None) => {
                    tracing::debug!(source = source.name(), "credential source not applicable");
                }
                Err(e) => {
                    tracing::warn!(source = source.name(), error = %e, "credential source failed");
                    return Err(e);
                }
            }
        }

        Err(AuthError::CredentialUnavailable(self.source_names().join(", ")))
    }
}
