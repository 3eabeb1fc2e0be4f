//! Running debug session as seen by the host.

use dap_bootstrap_core::{
    AdapterDescriptor, DebugAdapterTracker, DebugSession, ExitStatus, TransportError,
};
use serde_json::Value;

/// A started session and the trackers observing it.
///
/// Every call fans out to all trackers in registration order. `exit`
/// consumes the handle, so no tracker hears from the session afterwards.
pub struct SessionHandle {
    session: DebugSession,
    descriptor: AdapterDescriptor,
    trackers: Vec<Box<dyn DebugAdapterTracker>>,
}

impl SessionHandle {
    pub(crate) fn new(
        session: DebugSession,
        descriptor: AdapterDescriptor,
        trackers: Vec<Box<dyn DebugAdapterTracker>>,
    ) -> Self {
        Self {
            session,
            descriptor,
            trackers,
        }
    }

    /// The session.
    #[must_use]
    pub const fn session(&self) -> &DebugSession {
        &self.session
    }

    /// How the host reaches the adapter.
    #[must_use]
    pub const fn descriptor(&self) -> &AdapterDescriptor {
        &self.descriptor
    }

    /// Number of trackers attached.
    #[must_use]
    pub fn tracker_count(&self) -> usize {
        self.trackers.len()
    }

    /// Report a message the host is about to send to the adapter.
    pub fn send_to_adapter(&self, message: &Value) {
        for tracker in &self.trackers {
            tracker.on_outbound_message(message);
        }
    }

    /// Report a message received from the adapter.
    pub fn receive_from_adapter(&self, message: &Value) {
        for tracker in &self.trackers {
            tracker.on_inbound_message(message);
        }
    }

    /// Report a transport failure.
    pub fn transport_error(&self, error: &TransportError) {
        for tracker in &self.trackers {
            tracker.on_transport_error(error);
        }
    }

    /// Report adapter exit and end the session.
    pub fn exit(self, status: ExitStatus) -> DebugSession {
        for tracker in &self.trackers {
            tracker.on_exit(&status);
        }
        tracing::debug!(session = %self.session.id, %status, "Debug session ended");
        self.session
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("session", &self.session.id)
            .field("descriptor", &self.descriptor)
            .field("trackers", &self.trackers.len())
            .finish()
    }
}
