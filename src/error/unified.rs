//! Error classification used for log fields.

use strum::{Display, EnumString};

/// Broad error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCategory {
    Authentication,
    RateLimit,
    Network,
    Server,
    Api,
    Configuration,
    Serialization,
    /// The remote run failed or produced no reply.
    Run,
    /// The chat host rejected a message or the conversation is unknown.
    Host,
    Unknown,
}
