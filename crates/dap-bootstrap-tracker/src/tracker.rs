//! Logging tracker and its factory.

use dap_bootstrap_core::{
    DebugAdapterTracker, DebugSession, ExitStatus, MessageSummary, SessionId, TrackerFactory,
    TransportError,
};
use serde_json::Value;

/// Creates a `LoggingTracker` for every session it is asked about.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingTrackerFactory;

impl LoggingTrackerFactory {
    /// Create a new tracker factory.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TrackerFactory for LoggingTrackerFactory {
    fn create_tracker(&self, session: &DebugSession) -> Box<dyn DebugAdapterTracker> {
        tracing::info!(
            session = %session.id,
            name = %session.name,
            "Creating new debug adapter tracker"
        );
        Box::new(LoggingTracker::new(session))
    }
}

/// Writes every adapter event of one session to the log and forgets it.
#[derive(Debug, Clone)]
pub struct LoggingTracker {
    session: SessionId,
}

impl LoggingTracker {
    /// Create a tracker bound to `session`.
    #[must_use]
    pub const fn new(session: &DebugSession) -> Self {
        Self {
            session: session.id,
        }
    }

    /// Session this tracker reports for.
    #[must_use]
    pub const fn session(&self) -> SessionId {
        self.session
    }
}

impl DebugAdapterTracker for LoggingTracker {
    fn on_outbound_message(&self, message: &Value) {
        let summary = MessageSummary::from_message(message);
        tracing::debug!(
            session = %self.session,
            seq = ?summary.seq,
            kind = ?summary.kind,
            name = ?summary.name,
            %message,
            "Sending message to debug adapter"
        );
    }

    fn on_inbound_message(&self, message: &Value) {
        let summary = MessageSummary::from_message(message);
        tracing::debug!(
            session = %self.session,
            seq = ?summary.seq,
            kind = ?summary.kind,
            name = ?summary.name,
            %message,
            "Received message from debug adapter"
        );
    }

    fn on_transport_error(&self, error: &TransportError) {
        tracing::warn!(
            session = %self.session,
            %error,
            "Error in communication with debug adapter"
        );
    }

    fn on_exit(&self, status: &ExitStatus) {
        if status.is_success() {
            tracing::info!(session = %self.session, "Debug adapter {status}");
        } else {
            tracing::warn!(session = %self.session, "Debug adapter {status}");
        }
    }
}
