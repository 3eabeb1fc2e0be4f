//! Debug adapter factory registry and extension activation.
//!
//! Provides:
//! - `DebugRegistry` - Host-side table of tracker and descriptor factories
//! - `Registration` / `Subscriptions` - Disposable registrations
//! - `SessionHandle` - Relays one session's adapter traffic to its trackers
//! - `activate` - Installs the logging tracker and server-mode descriptor
//!   factories for the `probe_rs` backend

pub mod activation;
pub mod registry;
pub mod session;

pub use activation::{PROBE_RS_DEBUG_TYPE, activate};
pub use registry::{ANY_DEBUG_TYPE, DebugRegistry, Registration, RegistryError, Subscriptions};
pub use session::SessionHandle;
