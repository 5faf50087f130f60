//! Startup configuration (environment, with an optional `.env` file).

use std::time::Duration;

use bon::Builder;

use crate::error::{RelayError, Result};

pub const ENDPOINT_VAR: &str = "AIPROJECT_ENDPOINT";
pub const AGENT_ID_VAR: &str = "AGENT_ID";
pub const API_VERSION_VAR: &str = "AGENTS_API_VERSION";
pub const POLL_INTERVAL_VAR: &str = "AGENT_RUN_POLL_INTERVAL_MS";
pub const TOKEN_SCOPE_VAR: &str = "AGENT_TOKEN_SCOPE";

pub const DEFAULT_API_VERSION: &str = "2025-05-01";
pub const DEFAULT_TOKEN_SCOPE: &str = "https://ai.azure.com/.default";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Everything the relay needs before it can serve a session.
///
/// ```
/// use agentchat::config::RelayConfig;
///
/// let config = RelayConfig::builder()
///     .project_endpoint("https://example.services.ai.azure.com/api/projects/demo")
///     .agent_id("asst_123")
///     .build();
/// assert_eq!(config.api_version, "2025-05-01");
/// ```
#[derive(Debug, Clone, Builder)]
pub struct RelayConfig {
    /// Agent project endpoint, without a trailing slash.
    #[builder(into)]
    pub project_endpoint: String,
    #[builder(into)]
    pub agent_id: String,
    #[builder(into, default = DEFAULT_API_VERSION.to_string())]
    pub api_version: String,
    #[builder(default = DEFAULT_POLL_INTERVAL)]
    pub poll_interval: Duration,
    #[builder(into, default = DEFAULT_TOKEN_SCOPE.to_string())]
    pub token_scope: String,
}

impl RelayConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let project_endpoint = non_empty(ENDPOINT_VAR)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| missing(ENDPOINT_VAR))?;
        let agent_id = non_empty(AGENT_ID_VAR).ok_or_else(|| missing(AGENT_ID_VAR))?;

        let poll_interval = match non_empty(POLL_INTERVAL_VAR) {
            Some(raw) => {
                let millis = raw
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|ms| *ms > 0)
                    .ok_or_else(|| {
                        RelayError::Configuration(format!(
                            "{POLL_INTERVAL_VAR} must be a positive number of milliseconds, got {raw:?}"
                        ))
                    })?;
                Duration::from_millis(millis)
            }
            None => DEFAULT_POLL_INTERVAL,
        };

        Ok(Self {
            project_endpoint,
            agent_id,
            api_version: non_empty(API_VERSION_VAR)
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            poll_interval,
            token_scope: non_empty(TOKEN_SCOPE_VAR)
                .unwrap_or_else(|| DEFAULT_TOKEN_SCOPE.to_string()),
        })
    }
}

fn missing(var: &str) -> RelayError {
    RelayError::Configuration(format!("{var} is not set in your environment (.env)."))
}
