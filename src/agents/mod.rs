//! The remote agent service: threads, messages and runs.

pub mod client;
pub mod http;
pub mod types;

use async_trait::async_trait;

pub use client::AgentsClient;
pub use types::{
    AgentThread, MessageContent, MessageRole, MessageText, RunError, RunStatus, ThreadMessage,
    ThreadMessages, ThreadRun,
};

use crate::error::Result;

/// Remote surface the relay depends on.
#[async_trait]
pub trait AgentsApi: Send + Sync {
    /// Create an empty thread.
    async fn create_thread(&self) -> Result<AgentThread>;

    /// Append a message to a thread.
    async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ThreadMessage>;

    /// Run an agent on a thread and return once the run is terminal.
    async fn create_and_process_run(&self, thread_id: &str, agent_id: &str) -> Result<ThreadRun>;

    /// All messages on a thread, newest first.
    async fn list_messages(&self, thread_id: &str) -> Result<ThreadMessages>;
}
