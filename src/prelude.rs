//! Convenience re-exports for common use.

pub use crate::agents::{AgentsApi, AgentsClient, MessageRole, RunStatus};
pub use crate::app::ChatApp;
pub use crate::auth::{ChainedTokenCredential, TokenCredential};
pub use crate::chat::{ChatSurface, MessageHandle, OutboundMessage, TerminalSurface};
pub use crate::config::RelayConfig;
pub use crate::error::{RelayError, Result};
pub use crate::relay::MessageRelay;
pub use crate::session::SessionManager;
