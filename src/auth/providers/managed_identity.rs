use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;

use super::{lookup_non_empty, scope_to_resource};
use crate::auth::error::AuthError;
use crate::auth::token::AccessToken;
use crate::auth::TokenCredential;

pub const IDENTITY_ENDPOINT_VAR: &str = "IDENTITY_ENDPOINT";
pub const IDENTITY_HEADER_VAR: &str = "IDENTITY_HEADER";
pub const CLIENT_ID_VAR: &str = "AZURE_CLIENT_ID";

const IDENTITY_API_VERSION: &str = "2019-08-01";

/// App Service style managed identity (`IDENTITY_ENDPOINT` + `IDENTITY_HEADER`).
pub struct ManagedIdentityCredential {
    client: reqwest::Client,
    endpoint: Option<(String, String)>,
    client_id: Option<String>,
}

impl ManagedIdentityCredential {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        identity_header: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: Some((endpoint.into(), identity_header.into())),
            client_id: None,
        }
    }

    pub fn from_lookup<F>(client: reqwest::Client, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup_non_empty(lookup, IDENTITY_ENDPOINT_VAR)
            .zip(lookup_non_empty(lookup, IDENTITY_HEADER_VAR));
        Self {
            client,
            endpoint,
            client_id: lookup_non_empty(lookup, CLIENT_ID_VAR),
        }
    }

    /// Select a user-assigned identity.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }
}

#[async_trait]
impl TokenCredential for ManagedIdentityCredential {
    fn name(&self) -> &str {
        "managed-identity"
    }

    async fn get_token(&self, scope: &str) -> Result<Option<AccessToken>, AuthError> {
        let Some((endpoint, identity_header)) = &self.endpoint else {
            return Ok(None);
        };

        let mut query = vec![
            ("api-version", IDENTITY_API_VERSION),
            ("resource", scope_to_resource(scope)),
        ];
        if let Some(client_id) = &self.client_id {
            query.push(("client_id", client_id.as_str()));
        }

        let resp = self
            .client
            .get(endpoint)
            .header("X-IDENTITY-HEADER", identity_header)
            .query(&query)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                source_name: self.name().to_string(),
                message: format!("status {status}: {body}"),
            });
        }

        let payload: ManagedIdentityResponse = resp.json().await?;
        let expires_at = parse_expires_on(&payload.expires_on)
            .ok_or_else(|| {
                AuthError::InvalidResponse(format!(
                    "unreadable expires_on: {}",
                    payload.expires_on
                ))
            })?;
        Ok(Some(AccessToken::new(payload.access_token, Some(expires_at))))
    }
}

#[derive(Debug, Deserialize)]
struct ManagedIdentityResponse {
    access_token: String,
    /// Seconds since epoch, sent as a string or a number depending on host.
    expires_on: serde_json::Value,
}

fn parse_expires_on(value: &serde_json::Value) -> Option<DateTime<chrono::Utc>> {
    let secs = match value {
        serde_json::Value::Number(n) => n.as_i64()?,
        serde_json::Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    DateTime::from_timestamp(secs, 0)
}
