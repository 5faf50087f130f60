//! HTTP client for the hosted agent service.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use super::http::{bearer_headers, status_to_error};
use super::types::{AgentThread, MessageRole, ThreadMessage, ThreadMessages, ThreadRun};
use super::AgentsApi;
use crate::auth::{AuthError, TokenCredential};
use crate::config::RelayConfig;
use crate::error::Result;

/// Talks to `{endpoint}/threads/...` with a bearer token from the credential
/// chain on every request.
pub struct AgentsClient {
    http: reqwest::Client,
    credential: Arc<dyn TokenCredential>,
    endpoint: String,
    api_version: String,
    token_scope: String,
    poll_interval: Duration,
}

impl AgentsClient {
    pub fn new(
        config: &RelayConfig,
        credential: Arc<dyn TokenCredential>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            http,
            credential,
            endpoint: config.project_endpoint.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            token_scope: config.token_scope.clone(),
            poll_interval: config.poll_interval,
        }
    }

    /// Start a run of `agent_id` on the thread without waiting for it.
    pub async fn create_run(&self, thread_id: &str, agent_id: &str) -> Result<ThreadRun> {
        debug!(thread_id, agent_id, "create run");
        self.send(
            Method::POST,
            &format!("threads/{thread_id}/runs"),
            &[],
            Some(json!({ "assistant_id": agent_id })),
        )
        .await
    }

    pub async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<ThreadRun> {
        self.send(
            Method::GET,
            &format!("threads/{thread_id}/runs/{run_id}"),
            &[],
            None,
        )
        .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path)
    }

    async fn bearer_token(&self) -> Result<String> {
        let token = self
            .credential
            .get_token(&self.token_scope)
            .await?
            .ok_or_else(|| AuthError::CredentialUnavailable(self.credential.name().to_string()))?;
        Ok(token.token)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        let token = self.bearer_token().await?;
        let mut request = self
            .http
            .request(method, self.url(path))
            .headers(bearer_headers(&token))
            .query(&[("api-version", self.api_version.as_str())])
            .query(query);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status.as_u16(), &body_text));
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl AgentsApi for AgentsClient {
    async fn create_thread(&self) -> Result<AgentThread> {
        debug!("create thread");
        self.send(Method::POST, "threads", &[], Some(json!({}))).await
    }

    async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ThreadMessage> {
        debug!(thread_id, %role, "create message");
        self.send(
            Method::POST,
            &format!("threads/{thread_id}/messages"),
            &[],
            Some(json!({ "role": role, "content": content })),
        )
        .await
    }

    async fn create_and_process_run(&self, thread_id: &str, agent_id: &str) -> Result<ThreadRun> {
        let mut run = self.create_run(thread_id, agent_id).await?;
        while !run.status.is_terminal() {
            tokio::time::sleep(self.poll_interval).await;
            run = self.get_run(thread_id, &run.id).await?;
            debug!(run_id = %run.id, status = %run.status, "polled run");
        }
        Ok(run)
    }

    async fn list_messages(&self, thread_id: &str) -> Result<ThreadMessages> {
        debug!(thread_id, "list messages");
        self.send(
            Method::GET,
            &format!("threads/{thread_id}/messages"),
            &[("order", "desc")],
            None,
        )
        .await
    }
}
