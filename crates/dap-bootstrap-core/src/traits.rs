//! Traits a host calls into when a debug session starts.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::{AdapterDescriptor, AdapterExecutable, DebugSession, ExitStatus, TransportError};

/// Observer of one session's adapter traffic.
///
/// Callbacks are delivered by the host in the order it sees the events.
/// `on_exit` is the last callback a tracker receives.
pub trait DebugAdapterTracker: Send + Sync {
    /// A message is about to be sent to the adapter.
    fn on_outbound_message(&self, _message: &Value) {}

    /// A message was received from the adapter.
    fn on_inbound_message(&self, _message: &Value) {}

    /// The channel to the adapter reported an error.
    fn on_transport_error(&self, _error: &TransportError) {}

    /// The adapter process ended.
    fn on_exit(&self, _status: &ExitStatus) {}
}

/// Produces a tracker for each debug session.
pub trait TrackerFactory: Send + Sync {
    /// Create the tracker for `session`.
    fn create_tracker(&self, session: &DebugSession) -> Box<dyn DebugAdapterTracker>;
}

/// Descriptor resolution error.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// Server mode is on but `server_port` is absent or not a `u16`.
    #[error("server mode is enabled but no usable server port is configured")]
    MissingServerPort,
    #[error("no default adapter executable is available")]
    MissingExecutable,
}

/// Decides how the host reaches the adapter for a session.
#[async_trait]
pub trait DescriptorFactory: Send + Sync {
    /// Resolve the descriptor for `session`.
    ///
    /// `executable` is the host's default launch descriptor, if it has one.
    ///
    /// # Errors
    /// Returns error if no descriptor can be produced from the configuration.
    async fn create_descriptor(
        &self,
        session: &DebugSession,
        executable: Option<AdapterExecutable>,
    ) -> Result<AdapterDescriptor, DescriptorError>;

    /// Release resources owned by the factory.
    fn dispose(&self) {}
}
