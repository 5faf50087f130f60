//! Boundary to the chat UI host.
//!
//! The host renders messages. The relay only ever does two things with it:
//! send a new message (getting a [`MessageHandle`] back) and later replace
//! the content of a message it sent.

pub mod terminal;

use std::fmt;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;

pub use terminal::TerminalSurface;

/// Identifies a message previously sent to a [`ChatSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageHandle(Uuid);

impl MessageHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A message to show in the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Display author; `None` lets the host pick its default.
    pub author: Option<String>,
    pub content: String,
}

impl OutboundMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            author: None,
            content: content.into(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// Send-then-update capability offered by the chat host.
#[async_trait]
pub trait ChatSurface: Send + Sync {
    async fn send(&self, message: OutboundMessage) -> Result<MessageHandle>;

    /// Replace the content of a message sent earlier.
    async fn update(&self, handle: &MessageHandle, content: &str) -> Result<()>;
}
