//! Conversation-to-thread session management.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::agents::AgentsApi;
use crate::error::Result;

/// Maps UI conversations to remote thread ids.
///
/// A conversation gets at most one thread id. It is created lazily by
/// [`SessionManager::ensure_session`] and never reassigned while the entry
/// lives.
pub struct SessionManager {
    api: Arc<dyn AgentsApi>,
    threads: RwLock<HashMap<String, String>>,
}

impl SessionManager {
    pub fn new(api: Arc<dyn AgentsApi>) -> Self {
        Self {
            api,
            threads: RwLock::new(HashMap::new()),
        }
    }

    /// Return the conversation's thread id, creating the remote thread on
    /// first use. A creation failure stores nothing.
    pub async fn ensure_session(&self, conversation_id: &str) -> Result<String> {
        if let Some(existing) = self.thread_id(conversation_id) {
            return Ok(existing);
        }

        let thread = self.api.create_thread().await?;

        let mut threads = self
            .threads
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // A concurrent call may have stored an id while we awaited; keep it.
        let id = threads
            .entry(conversation_id.to_string())
            .or_insert_with(|| {
                tracing::info!(conversation_id, thread_id = %thread.id, "new thread");
                thread.id
            })
            .clone();
        Ok(id)
    }

    pub fn thread_id(&self, conversation_id: &str) -> Option<String> {
        self.threads
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(conversation_id)
            .cloned()
    }

    /// Forget a conversation. The remote thread is left in place.
    pub fn end_session(&self, conversation_id: &str) -> Option<String> {
        self.threads
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(conversation_id)
    }

    /// Drop every session.
    pub fn clear(&self) {
        self.threads
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    pub fn len(&self) -> usize {
        self.threads
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
