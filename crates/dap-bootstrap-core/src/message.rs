//! Adapter traffic and lifecycle events observed by trackers.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// How the debug adapter process ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ExitStatus {
    /// The process exited on its own, possibly with a non-zero status.
    Code(i32),
    /// The process was terminated by a signal.
    Signal(String),
}

impl ExitStatus {
    /// Build a status from the raw parts a host reports.
    ///
    /// A present code wins over a signal. Returns `None` when the host
    /// reported neither.
    #[must_use]
    pub fn from_parts(code: Option<i32>, signal: Option<String>) -> Option<Self> {
        match (code, signal) {
            (Some(code), _) => Some(Self::Code(code)),
            (None, Some(signal)) => Some(Self::Signal(signal)),
            (None, None) => None,
        }
    }

    /// Whether the adapter exited cleanly.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Code(0))
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "exited with code {code}"),
            Self::Signal(signal) => write!(f, "exited with signal {signal}"),
        }
    }
}

/// Error reported by the channel between host and adapter.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Connection closed")]
    Closed,
    #[error("Malformed message: {0}")]
    Malformed(String),
}

/// Envelope fields of a protocol message, for structured logging.
///
/// Messages are otherwise opaque: nothing here fails on unexpected shapes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageSummary {
    /// Sequence number.
    pub seq: Option<i64>,
    /// `request`, `response` or `event`.
    pub kind: Option<String>,
    /// Command or event name.
    pub name: Option<String>,
}

impl MessageSummary {
    /// Extract the envelope of `message`.
    #[must_use]
    pub fn from_message(message: &Value) -> Self {
        let text = |key: &str| message.get(key).and_then(Value::as_str).map(str::to_owned);

        Self {
            seq: message.get("seq").and_then(Value::as_i64),
            kind: text("type"),
            name: text("command").or_else(|| text("event")),
        }
    }
}
