//! Shared test doubles: a scripted agent service and a recording chat host.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use agentchat::agents::{
    AgentThread, AgentsApi, MessageContent, MessageRole, MessageText, RunError, RunStatus,
    ThreadMessage, ThreadMessages, ThreadRun,
};
use agentchat::chat::{ChatSurface, MessageHandle, OutboundMessage};
use agentchat::error::{RelayError, Result};

/// In-memory agent service with canned outcomes.
#[derive(Default)]
pub struct FakeAgents {
    thread_counter: AtomicUsize,
    pub create_thread_calls: AtomicUsize,
    pub posted: Mutex<Vec<(String, MessageRole, String)>>,
    pub runs: Mutex<Vec<(String, String)>>,
    thread_error: Mutex<Option<String>>,
    message_error: Mutex<Option<String>>,
    run_outcome: Mutex<Option<(RunStatus, Option<RunError>)>>,
    replies: Mutex<Vec<ThreadMessage>>,
}

impl FakeAgents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_create_thread(&self, message: &str) {
        *self.thread_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_create_message(&self, message: &str) {
        *self.message_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn finish_runs_with(&self, status: RunStatus, last_error: Option<RunError>) {
        *self.run_outcome.lock().unwrap() = Some((status, last_error));
    }

    /// Seed a message on the listed thread; later seeds are newer.
    pub fn seed_message(&self, role: MessageRole, text: &str) {
        let mut replies = self.replies.lock().unwrap();
        let n = replies.len();
        replies.push(text_message(&format!("msg_{n}"), role, text));
    }

    pub fn thread_creations(&self) -> usize {
        self.create_thread_calls.load(Ordering::SeqCst)
    }

    pub fn posted(&self) -> Vec<(String, MessageRole, String)> {
        self.posted.lock().unwrap().clone()
    }

    pub fn runs(&self) -> Vec<(String, String)> {
        self.runs.lock().unwrap().clone()
    }
}

pub fn text_message(id: &str, role: MessageRole, text: &str) -> ThreadMessage {
    ThreadMessage {
        id: id.to_string(),
        thread_id: "thread".to_string(),
        role,
        content: vec![MessageContent::Text {
            text: MessageText {
                value: text.to_string(),
            },
        }],
        created_at: 0,
    }
}

pub fn run_error(message: &str) -> RunError {
    RunError {
        code: Some("server_error".to_string()),
        message: Some(message.to_string()),
    }
}

#[async_trait]
impl AgentsApi for FakeAgents {
    async fn create_thread(&self) -> Result<AgentThread> {
        self.create_thread_calls.fetch_add(1, Ordering::SeqCst);
        // Suspend once so concurrent callers are all in flight together.
        tokio::task::yield_now().await;
        if let Some(message) = self.thread_error.lock().unwrap().clone() {
            return Err(RelayError::remote(message));
        }
        let n = self.thread_counter.fetch_add(1, Ordering::SeqCst);
        Ok(AgentThread {
            id: format!("thread_{n}"),
            created_at: None,
        })
    }

    async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ThreadMessage> {
        if let Some(message) = self.message_error.lock().unwrap().clone() {
            return Err(RelayError::remote(message));
        }
        self.posted
            .lock()
            .unwrap()
            .push((thread_id.to_string(), role, content.to_string()));
        Ok(text_message("posted", role, content))
    }

    async fn create_and_process_run(&self, thread_id: &str, agent_id: &str) -> Result<ThreadRun> {
        self.runs
            .lock()
            .unwrap()
            .push((thread_id.to_string(), agent_id.to_string()));
        let (status, last_error) = self
            .run_outcome
            .lock()
            .unwrap()
            .clone()
            .unwrap_or((RunStatus::Completed, None));
        Ok(ThreadRun {
            id: "run_1".to_string(),
            thread_id: thread_id.to_string(),
            status,
            last_error,
        })
    }

    async fn list_messages(&self, _thread_id: &str) -> Result<ThreadMessages> {
        let mut data = self.replies.lock().unwrap().clone();
        data.reverse();
        Ok(ThreadMessages { data })
    }
}

/// One message as the host currently shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shown {
    pub author: Option<String>,
    pub content: String,
    pub updates: usize,
}

/// Chat host that records what it was asked to show.
#[derive(Default)]
pub struct RecordingSurface {
    shown: Mutex<Vec<(MessageHandle, Shown)>>,
    fail_updates: Mutex<bool>,
    fail_sends_after: Mutex<Option<usize>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_updates(&self) {
        *self.fail_updates.lock().unwrap() = true;
    }

    /// Accept `n` sends, then reject every further one.
    pub fn fail_sends_after(&self, n: usize) {
        *self.fail_sends_after.lock().unwrap() = Some(n);
    }

    pub fn shown(&self) -> Vec<Shown> {
        self.shown
            .lock()
            .unwrap()
            .iter()
            .map(|(_, s)| s.clone())
            .collect()
    }

    pub fn contents(&self) -> Vec<String> {
        self.shown().into_iter().map(|s| s.content).collect()
    }
}

#[async_trait]
impl ChatSurface for RecordingSurface {
    async fn send(&self, message: OutboundMessage) -> Result<MessageHandle> {
        let mut shown = self.shown.lock().unwrap();
        if let Some(limit) = *self.fail_sends_after.lock().unwrap() {
            if shown.len() >= limit {
                return Err(RelayError::Surface("host disconnected".to_string()));
            }
        }
        let handle = MessageHandle::new();
        shown.push((
            handle,
            Shown {
                author: message.author,
                content: message.content,
                updates: 0,
            },
        ));
        Ok(handle)
    }

    async fn update(&self, handle: &MessageHandle, content: &str) -> Result<()> {
        if *self.fail_updates.lock().unwrap() {
            return Err(RelayError::Surface("update rejected".to_string()));
        }
        let mut shown = self.shown.lock().unwrap();
        let entry = shown
            .iter_mut()
            .find(|(h, _)| h == handle)
            .ok_or_else(|| RelayError::Surface(format!("unknown message {handle}")))?;
        entry.1.content = content.to_string();
        entry.1.updates += 1;
        Ok(())
    }
}

/// Simple lookup table standing in for the process environment.
pub fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}
