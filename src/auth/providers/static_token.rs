use async_trait::async_trait;

use super::lookup_non_empty;
use crate::auth::error::AuthError;
use crate::auth::token::AccessToken;
use crate::auth::TokenCredential;

pub const ACCESS_TOKEN_VAR: &str = "AZURE_ACCESS_TOKEN";

/// A pre-issued bearer token supplied through configuration.
#[derive(Clone, Default)]
pub struct StaticTokenCredential {
    token: Option<String>,
}

impl StaticTokenCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            token: lookup_non_empty(lookup, ACCESS_TOKEN_VAR),
        }
    }
}

#[async_trait]
impl TokenCredential for StaticTokenCredential {
    fn name(&self) -> &str {
        "static-token"
    }

    async fn get_token(&self, _scope: &str) -> Result<Option<AccessToken>, AuthError> {
        Ok(self.token.as_deref().map(AccessToken::from_jwt))
    }
}
