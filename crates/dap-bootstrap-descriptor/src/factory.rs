//! Server-mode aware descriptor factory.

use async_trait::async_trait;
use dap_bootstrap_core::{
    AdapterDescriptor, AdapterExecutable, AdapterServer, DebugSession, DescriptorError,
    DescriptorFactory,
};

/// Resolve the adapter descriptor for `session`.
///
/// With `server_mode` set the host is pointed at the configured port on the
/// local machine. Otherwise the host's default executable is returned as is.
///
/// The port is not checked beyond being readable as one: a `server_port`
/// that is absent or could not be read as a `u16` only matters in server
/// mode, where no server descriptor can be built from it.
///
/// # Errors
/// Returns error if server mode has no usable port, or if the executable
/// path is taken and the host supplied no default executable.
pub fn resolve_descriptor(
    session: &DebugSession,
    executable: Option<AdapterExecutable>,
) -> Result<AdapterDescriptor, DescriptorError> {
    let configuration = &session.configuration;
    tracing::debug!(session = %session.id, name = %session.name, "Resolving adapter descriptor");
    tracing::debug!(session = %session.id, ?configuration, "Session configuration");

    if configuration.server_mode {
        let port = configuration
            .server_port
            .ok_or(DescriptorError::MissingServerPort)?;
        tracing::info!(session = %session.id, port, "Using existing server on port {port}");
        Ok(AdapterDescriptor::Server(AdapterServer::new(port)))
    } else {
        let executable = executable.ok_or(DescriptorError::MissingExecutable)?;
        tracing::info!(session = %session.id, %executable, "Using executable");
        Ok(AdapterDescriptor::Executable(executable))
    }
}

/// Descriptor factory honouring the `server_mode` launch option.
#[derive(Debug, Default, Clone, Copy)]
pub struct ServerModeDescriptorFactory;

impl ServerModeDescriptorFactory {
    /// Create a new descriptor factory.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DescriptorFactory for ServerModeDescriptorFactory {
    async fn create_descriptor(
        &self,
        session: &DebugSession,
        executable: Option<AdapterExecutable>,
    ) -> Result<AdapterDescriptor, DescriptorError> {
        resolve_descriptor(session, executable)
    }

    // The server behind `server_mode` is started by the user, not by us.
    fn dispose(&self) {
        tracing::debug!("Descriptor factory disposed, no adapter server to stop");
    }
}
