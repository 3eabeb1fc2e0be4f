//! Replays a short adapter exchange through an activated registry.
//!
//! Run with: cargo run -p launch-replay -- demos/launch-replay/launch/attach.json
//!
//! Without an argument the session launches the default executable.
//! Set `RUST_LOG=debug` to see the relayed messages.

use std::path::Path;

use anyhow::Context;
use dap_bootstrap_core::{AdapterExecutable, ExitStatus, SessionConfiguration};
use dap_bootstrap_host::{DebugRegistry, PROBE_RS_DEBUG_TYPE, activate};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn load_configuration(path: &Path) -> anyhow::Result<SessionConfiguration> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read launch configuration {}", path.display()))?;
    let value = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    SessionConfiguration::from_value(value)
        .with_context(|| format!("Invalid launch configuration in {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let configuration = match std::env::args_os().nth(1) {
        Some(path) => load_configuration(Path::new(&path))?,
        None => SessionConfiguration::launch(),
    };
    let name = configuration
        .get_option("name")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("launch-replay")
        .to_owned();

    let registry = DebugRegistry::new();
    let mut subscriptions = activate(&registry)?;

    let default_executable =
        AdapterExecutable::new("probe-rs-debugger").with_args(["debug", "--dap"]);
    let handle = registry
        .start_session(name, PROBE_RS_DEBUG_TYPE, configuration, Some(default_executable))
        .await?;

    tracing::info!(
        descriptor = %serde_json::to_string(handle.descriptor())?,
        "Resolved adapter descriptor"
    );

    handle.send_to_adapter(&json!({
        "seq": 1,
        "type": "request",
        "command": "initialize",
        "arguments": {"adapterID": "probe-rs", "linesStartAt1": true, "columnsStartAt1": true},
    }));
    handle.receive_from_adapter(&json!({
        "seq": 1,
        "type": "response",
        "request_seq": 1,
        "command": "initialize",
        "success": true,
        "body": {"supportsConfigurationDoneRequest": true},
    }));
    handle.receive_from_adapter(&json!({"seq": 2, "type": "event", "event": "initialized"}));
    handle.send_to_adapter(&json!({
        "seq": 2,
        "type": "request",
        "command": "disconnect",
        "arguments": {"terminateDebuggee": false},
    }));

    handle.exit(ExitStatus::Code(0));
    subscriptions.dispose_all();

    Ok(())
}
