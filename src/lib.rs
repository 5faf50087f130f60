//! agentchat: chat front-end for a hosted agent service.
//!
//! Each chat conversation is backed by one remote thread. Every user
//! message is posted to that thread, the configured agent is run to
//! completion, and the agent's latest reply replaces a `thinking...`
//! placeholder in the chat.
//!
//! # Quick Start
//!
//! ```no_run
//! use agentchat::prelude::*;
//!
//! # async fn example() -> agentchat::error::Result<()> {
//! let config = RelayConfig::from_env()?;
//! let app = ChatApp::from_config(&config)?;
//! let surface = TerminalSurface::stdout();
//!
//! app.on_chat_start("conversation-1").await?;
//! app.on_message("conversation-1", "Hello!", &surface).await;
//! app.shutdown();
//! # Ok(())
//! # }
//! ```

pub mod agents;
pub mod app;
pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod prelude;
pub mod relay;
pub mod session;
