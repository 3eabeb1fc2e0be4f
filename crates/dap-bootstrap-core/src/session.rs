//! Debug session handle and its launch configuration.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Session identifier.
pub type SessionId = Uuid;

/// Launch configuration attached to a debug session.
///
/// Only the options this crate acts on are modelled. Every other key the
/// user put into the launch configuration is kept in `extra` and passed
/// through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfiguration {
    /// Connect to an already running adapter instead of spawning one.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub server_mode: bool,

    /// Port of the running adapter, used when `server_mode` is set.
    ///
    /// A value that cannot be read as a port parses as `None`; only server
    /// mode ever looks at it.
    #[serde(
        default,
        deserialize_with = "deserialize_port",
        skip_serializing_if = "Option::is_none"
    )]
    pub server_port: Option<u16>,

    /// Options owned by the host or the adapter.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionConfiguration {
    /// Configuration that launches the adapter executable.
    #[must_use]
    pub fn launch() -> Self {
        Self::default()
    }

    /// Configuration that attaches to an adapter server on `port`.
    #[must_use]
    pub fn server(port: u16) -> Self {
        Self {
            server_mode: true,
            server_port: Some(port),
            extra: Map::new(),
        }
    }

    /// Parse a configuration from the JSON object the host supplies.
    ///
    /// # Errors
    /// Returns error if `value` is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Render the configuration back into a JSON object.
    ///
    /// # Errors
    /// Returns error if serialization fails.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Get a pass-through option by key.
    #[must_use]
    pub fn get_option(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Set a pass-through option.
    pub fn set_option(&mut self, key: impl Into<String>, value: Value) {
        self.extra.insert(key.into(), value);
    }
}

/// Read a flag with JavaScript truthiness.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(is_truthy(&value))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    }
}

fn deserialize_port<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_port(&value))
}

fn as_port(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .and_then(|port| u16::try_from(port).ok())
}

/// A host-managed debug session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugSession {
    /// Unique session identifier.
    pub id: SessionId,
    /// Display name of the session.
    pub name: String,
    /// Backend identifier the session was started for.
    pub debug_type: String,
    /// Launch configuration.
    pub configuration: SessionConfiguration,
}

impl DebugSession {
    /// Create a session with a fresh identifier.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        debug_type: impl Into<String>,
        configuration: SessionConfiguration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            debug_type: debug_type.into(),
            configuration,
        }
    }
}
