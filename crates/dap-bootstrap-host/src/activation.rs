//! Extension activation for the probe-rs debug backend.

use std::sync::Arc;

use dap_bootstrap_descriptor::ServerModeDescriptorFactory;
use dap_bootstrap_tracker::LoggingTrackerFactory;

use crate::{DebugRegistry, RegistryError, Subscriptions};

/// Debug type the factories are registered for.
pub const PROBE_RS_DEBUG_TYPE: &str = "probe_rs";

/// Register the tracker and descriptor factories with `registry`.
///
/// The returned subscriptions own both registrations; dispose them on
/// deactivation.
///
/// # Errors
/// Returns error if a descriptor factory is already registered for
/// [`PROBE_RS_DEBUG_TYPE`].
pub fn activate(registry: &DebugRegistry) -> Result<Subscriptions, RegistryError> {
    let mut subscriptions = Subscriptions::new();

    subscriptions.push(registry.register_tracker_factory(
        PROBE_RS_DEBUG_TYPE,
        Arc::new(LoggingTrackerFactory::new()),
    )?);

    match registry.register_descriptor_factory(
        PROBE_RS_DEBUG_TYPE,
        Arc::new(ServerModeDescriptorFactory::new()),
    ) {
        Ok(registration) => subscriptions.push(registration),
        Err(e) => {
            subscriptions.dispose_all();
            return Err(e);
        }
    }

    tracing::info!(debug_type = PROBE_RS_DEBUG_TYPE, "Debug adapter factories registered");
    Ok(subscriptions)
}
