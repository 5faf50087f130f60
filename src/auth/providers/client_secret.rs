use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;

use super::lookup_non_empty;
use crate::auth::error::AuthError;
use crate::auth::token::AccessToken;
use crate::auth::TokenCredential;

pub const TENANT_ID_VAR: &str = "AZURE_TENANT_ID";
pub const CLIENT_ID_VAR: &str = "AZURE_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "AZURE_CLIENT_SECRET";
pub const AUTHORITY_HOST_VAR: &str = "AZURE_AUTHORITY_HOST";

const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

#[derive(Clone)]
struct ServicePrincipal {
    tenant_id: String,
    client_id: String,
    client_secret: String,
}

/// OAuth2 client-credentials grant for a service principal.
///
/// Applies only when tenant, client id and client secret are all present.
pub struct ClientSecretCredential {
    client: reqwest::Client,
    principal: Option<ServicePrincipal>,
    authority_host: String,
}

impl ClientSecretCredential {
    pub fn new(
        client: reqwest::Client,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            client,
            principal: Some(ServicePrincipal {
                tenant_id: tenant_id.into(),
                client_id: client_id.into(),
                client_secret: client_secret.into(),
            }),
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
        }
    }

    pub fn from_lookup<F>(client: reqwest::Client, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let principal = match (
            lookup_non_empty(lookup, TENANT_ID_VAR),
            lookup_non_empty(lookup, CLIENT_ID_VAR),
            lookup_non_empty(lookup, CLIENT_SECRET_VAR),
        ) {
            (Some(tenant_id), Some(client_id), Some(client_secret)) => Some(ServicePrincipal {
                tenant_id,
                client_id,
                client_secret,
            }),
            _ => None,
        };
        Self {
            client,
            principal,
            authority_host: lookup_non_empty(lookup, AUTHORITY_HOST_VAR)
                .unwrap_or_else(|| DEFAULT_AUTHORITY_HOST.to_string()),
        }
    }

    pub fn with_authority_host(mut self, host: impl Into<String>) -> Self {
        self.authority_host = host.into();
        self
    }

    fn token_url(&self, tenant_id: &str) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host.trim_end_matches('/'),
            tenant_id
        )
    }
}

#[async_trait]
impl TokenCredential for ClientSecretCredential {
    fn name(&self) -> &str {
        "client-secret"
    }

    async fn get_token(&self, scope: &str) -> Result<Option<AccessToken>, AuthError> {
        let Some(principal) = &self.principal else {
            return Ok(None);
        };

        let resp = self
            .client
            .post(self.token_url(&principal.tenant_id))
            .header("Accept", "application/json")
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", principal.client_id.as_str()),
                ("client_secret", principal.client_secret.as_str()),
                ("scope", scope),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OAuthErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error_description.or(e.error))
                .unwrap_or_else(|| format!("token request failed with status {status}"));
            return Err(AuthError::Rejected {
                source_name: self.name().to_string(),
                message,
            });
        }

        let payload: OAuthTokenResponse = resp.json().await?;
        let expires_at = Duration::try_seconds(payload.expires_in)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| {
                AuthError::InvalidResponse(format!(
                    "expires_in out of range: {}",
                    payload.expires_in
                ))
            })?;
        Ok(Some(AccessToken::new(payload.access_token, Some(expires_at))))
    }
}

#[derive(Debug, Deserialize)]
struct OAuthTokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
}
