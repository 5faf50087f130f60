use std::path::PathBuf;

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use tokio::process::Command;

use crate::auth::error::AuthError;
use crate::auth::token::{jwt_expiry, AccessToken};
use crate::auth::TokenCredential;

/// Interactive fallback: borrow the signed-in Azure CLI user's token.
///
/// A missing `az` executable means the source does not apply; a CLI that is
/// present but fails (for example, nobody ran `az login`) is a hard error.
pub struct AzureCliCredential {
    program: PathBuf,
}

impl Default for AzureCliCredential {
    fn default() -> Self {
        Self::new()
    }
}

impl AzureCliCredential {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("az"),
        }
    }

    /// Use a specific `az` executable.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }
}

#[async_trait]
impl TokenCredential for AzureCliCredential {
    fn name(&self) -> &str {
        "azure-cli"
    }

    async fn get_token(&self, scope: &str) -> Result<Option<AccessToken>, AuthError> {
        let output = match Command::new(&self.program)
            .args(["account", "get-access-token", "--scope", scope, "--output", "json"])
            .kill_on_drop(true)
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AuthError::Rejected {
                source_name: self.name().to_string(),
                message: stderr.trim().to_string(),
            });
        }

        let payload: CliTokenResponse = serde_json::from_slice(&output.stdout)?;
        let expires_at = payload.expires_on.and_then(|secs| DateTime::from_timestamp(secs, 0));
        Ok(Some(AccessToken {
            expires_at: expires_at.or_else(|| jwt_expiry(&payload.access_token)),
            token: payload.access_token,
        }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliTokenResponse {
    access_token: String,
    /// Present in newer CLI releases; older ones only print local time.
    #[serde(default, rename = "expires_on")]
    expires_on: Option<i64>,
}
