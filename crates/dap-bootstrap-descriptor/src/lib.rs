//! Chooses how the host reaches the debug adapter.
//!
//! Provides:
//! - `ServerModeDescriptorFactory` - Attach to a running server when the
//!   launch configuration asks for it, otherwise spawn the default executable
//! - `resolve_descriptor` - The same decision as a plain function

pub mod factory;

pub use factory::{ServerModeDescriptorFactory, resolve_descriptor};
