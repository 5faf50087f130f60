//! One user message in, one agent reply (or one error message) out.

use std::sync::Arc;

use tracing::{info, warn};

use crate::agents::{AgentsApi, MessageRole, RunStatus};
use crate::chat::{ChatSurface, OutboundMessage};
use crate::error::{RelayError, Result};

pub const PLACEHOLDER_TEXT: &str = "thinking...";
pub const PLACEHOLDER_AUTHOR: &str = "agent";

/// Forwards user messages to a thread, runs the agent, and writes the reply
/// back over the placeholder.
pub struct MessageRelay {
    api: Arc<dyn AgentsApi>,
    agent_id: String,
}

impl MessageRelay {
    pub fn new(api: Arc<dyn AgentsApi>, agent_id: impl Into<String>) -> Self {
        Self {
            api,
            agent_id: agent_id.into(),
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Relay `user_text` and return the reply that replaced the placeholder.
    ///
    /// On error the placeholder, if it was sent, keeps its original text.
    pub async fn relay(
        &self,
        thread_id: &str,
        user_text: &str,
        surface: &dyn ChatSurface,
    ) -> Result<String> {
        let placeholder = surface.send(placeholder()).await?;

        self.api
            .create_message(thread_id, MessageRole::User, user_text)
            .await?;

        let run = self
            .api
            .create_and_process_run(thread_id, &self.agent_id)
            .await?;
        info!(thread_id, run_id = %run.id, status = %run.status, "run finished");

        if run.status != RunStatus::Completed {
            let diagnostic = run
                .last_error
                .as_ref()
                .and_then(|e| e.describe())
                .map(str::to_string)
                .unwrap_or_else(|| match run.status {
                    RunStatus::Failed => "Run failed.".to_string(),
                    other => format!("Run {other}."),
                });
            return Err(RelayError::RunFailed(diagnostic));
        }

        let messages = self.api.list_messages(thread_id).await?;
        let reply = messages
            .last_text_message_by_role(MessageRole::Agent)
            .and_then(|m| m.text())
            .ok_or(RelayError::NoResponse)?
            .to_string();

        surface.update(&placeholder, &reply).await?;
        Ok(reply)
    }

    /// Top-level message handler: never fails, renders any error as a new
    /// `Error: ...` message.
    pub async fn handle_message(&self, thread_id: &str, user_text: &str, surface: &dyn ChatSurface) {
        if let Err(e) = self.relay(thread_id, user_text, surface).await {
            report_error(surface, &e).await;
        }
    }
}

pub(crate) fn placeholder() -> OutboundMessage {
    OutboundMessage::new(PLACEHOLDER_TEXT).with_author(PLACEHOLDER_AUTHOR)
}

/// Show `error` to the user as its own message.
pub(crate) async fn report_error(surface: &dyn ChatSurface, error: &RelayError) {
    warn!(error = %error, category = %error.category(), "message relay failed");
    if let Err(send_err) = surface
        .send(OutboundMessage::new(format!("Error: {error}")))
        .await
    {
        warn!(error = %send_err, "could not deliver error message");
    }
}
