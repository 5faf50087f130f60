//! Process-wide state and the host lifecycle hooks.

use std::sync::Arc;

use crate::agents::{http, AgentsApi, AgentsClient};
use crate::auth::{ChainedTokenCredential, TokenCredential};
use crate::chat::ChatSurface;
use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::relay::{placeholder, report_error, MessageRelay};
use crate::session::SessionManager;

/// Everything the chat host needs, created once at startup and passed to
/// each hook.
pub struct ChatApp {
    sessions: SessionManager,
    relay: MessageRelay,
}

impl ChatApp {
    /// Wire the default credential chain and HTTP client.
    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        let http = http::build_client()?;
        let credential: Arc<dyn TokenCredential> =
            Arc::new(ChainedTokenCredential::from_env(http.clone()));
        let api = Arc::new(AgentsClient::new(config, credential, http));
        Ok(Self::new(api, config.agent_id.clone()))
    }

    pub fn new(api: Arc<dyn AgentsApi>, agent_id: impl Into<String>) -> Self {
        Self {
            sessions: SessionManager::new(api.clone()),
            relay: MessageRelay::new(api, agent_id),
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Session-start hook.
    pub async fn on_chat_start(&self, conversation_id: &str) -> Result<String> {
        self.sessions.ensure_session(conversation_id).await
    }

    /// Message hook. Failures are shown to the user, never returned.
    pub async fn on_message(&self, conversation_id: &str, text: &str, surface: &dyn ChatSurface) {
        match self.sessions.thread_id(conversation_id) {
            Some(thread_id) => self.relay.handle_message(&thread_id, text, surface).await,
            None => {
                let err = match surface.send(placeholder()).await {
                    Ok(_) => RelayError::UnknownConversation(conversation_id.to_string()),
                    Err(e) => e,
                };
                report_error(surface, &err).await;
            }
        }
    }

    /// Session-end hook.
    pub fn on_chat_end(&self, conversation_id: &str) {
        if let Some(thread_id) = self.sessions.end_session(conversation_id) {
            tracing::debug!(conversation_id, %thread_id, "session ended");
        }
    }

    /// Release process-wide state.
    pub fn shutdown(&self) {
        tracing::info!(open_sessions = self.sessions.len(), "shutting down");
        self.sessions.clear();
    }
}
