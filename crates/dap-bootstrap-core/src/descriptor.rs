//! Descriptors telling the host how to reach a debug adapter.

use std::{collections::BTreeMap, fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

/// Address used when a server descriptor names no host.
pub const LOCALHOST: &str = "127.0.0.1";

/// How the host obtains a connection to the debug adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdapterDescriptor {
    /// Spawn a local adapter process and talk to it over stdio.
    Executable(AdapterExecutable),
    /// Connect to an adapter that is already listening.
    Server(AdapterServer),
}

impl AdapterDescriptor {
    /// Whether the host should connect to a running server.
    #[must_use]
    pub const fn is_server(&self) -> bool {
        matches!(self, Self::Server(_))
    }

    /// The executable to spawn, if this is an executable descriptor.
    #[must_use]
    pub const fn as_executable(&self) -> Option<&AdapterExecutable> {
        match self {
            Self::Executable(executable) => Some(executable),
            Self::Server(_) => None,
        }
    }

    /// The server to connect to, if this is a server descriptor.
    #[must_use]
    pub const fn as_server(&self) -> Option<&AdapterServer> {
        match self {
            Self::Server(server) => Some(server),
            Self::Executable(_) => None,
        }
    }
}

impl From<AdapterExecutable> for AdapterDescriptor {
    fn from(executable: AdapterExecutable) -> Self {
        Self::Executable(executable)
    }
}

impl From<AdapterServer> for AdapterDescriptor {
    fn from(server: AdapterServer) -> Self {
        Self::Server(server)
    }
}

impl fmt::Display for AdapterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Executable(executable) => write!(f, "executable {executable}"),
            Self::Server(server) => write!(f, "server {}", server.address()),
        }
    }
}

/// Launch parameters for a local adapter process.
///
/// Computed by the host from the extension manifest; this crate only
/// passes it through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterExecutable {
    /// Program to run.
    pub command: String,
    /// Arguments passed to the program.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Extra environment variables.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    /// Working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
}

impl AdapterExecutable {
    /// Create an executable descriptor for `command` with no arguments.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
        }
    }

    /// Add arguments.
    #[must_use]
    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add an environment variable.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set the working directory.
    #[must_use]
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

impl fmt::Display for AdapterExecutable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Network address of a running adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterServer {
    /// Host name; `None` means the local machine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// TCP port.
    pub port: u16,
}

impl AdapterServer {
    /// Server on the local machine.
    #[must_use]
    pub const fn new(port: u16) -> Self {
        Self { host: None, port }
    }

    /// Server on a named host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// `host:port` string to connect to.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host.as_deref().unwrap_or(LOCALHOST), self.port)
    }
}
