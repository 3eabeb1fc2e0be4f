//! Core abstractions for debug adapter session bootstrap.
//!
//! This crate provides the types a host hands to its debug extensions:
//! - `DebugSession` / `SessionConfiguration` - Per-session launch data
//! - `AdapterDescriptor` - Spawn an executable or connect to a server
//! - `ExitStatus` / `TransportError` - Adapter lifecycle events
//! - Tracker and descriptor factory traits

pub mod descriptor;
pub mod message;
pub mod session;
pub mod traits;

#[cfg(feature = "test-support")]
pub mod test_support;

pub use descriptor::{AdapterDescriptor, AdapterExecutable, AdapterServer};
pub use message::{ExitStatus, MessageSummary, TransportError};
pub use session::{DebugSession, SessionConfiguration, SessionId};
pub use traits::{DebugAdapterTracker, DescriptorError, DescriptorFactory, TrackerFactory};
