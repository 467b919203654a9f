//! Runtime configuration.
//!
//! Settings come from three layers, highest precedence first: the command
//! line, an optional YAML file passed with `-c`, and built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Deserializer};

use crate::error::ServerError;

/// Upper bound on worker sessions admitted during one run.
pub const MAX_WORKERS: usize = 256;

/// Seconds a session may sit idle before it is closed.
pub const IDLE_TIMEOUT_SECS: u64 = 300;

pub const DEFAULT_TCP_PORT: &str = "80";

/// Directories that may never be served.
const FORBIDDEN_ROOTS: [&str; 8] = ["/", "/etc", "/bin", "/lib", "/tmp", "/usr", "/dev", "/sbin"];

/// Command line surface.
#[derive(Debug, Parser)]
#[command(
    name = "switchd",
    about = "Remotely switchable file server",
    version,
    override_usage = "switchd [-d] [-r root_dir] [tcp_port [udp_port]]"
)]
pub struct Cli {
    /// Detach and run in the background, logging to syslog
    #[arg(short = 'd', long = "daemon")]
    pub daemon: bool,

    /// Directory to serve
    #[arg(short = 'r', long = "root", value_name = "root_dir")]
    pub root: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short = 'c', long = "config", value_name = "file")]
    pub config: Option<PathBuf>,

    /// Address to bind both endpoints to
    #[arg(long)]
    pub host: Option<String>,

    /// TCP port for file requests
    pub tcp_port: Option<String>,

    /// UDP port for ON/OFF control datagrams
    pub udp_port: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    #[serde(deserialize_with = "port")]
    pub tcp_port: String,
    #[serde(deserialize_with = "optional_port")]
    pub udp_port: Option<String>,
    pub root: PathBuf,
    pub daemon: bool,
    pub idle_timeout_secs: u64,
    pub max_workers: usize,
    pub spool_dir: Option<PathBuf>,
    pub log_filter: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            tcp_port: DEFAULT_TCP_PORT.to_string(),
            udp_port: None,
            root: PathBuf::from("."),
            daemon: false,
            idle_timeout_secs: IDLE_TIMEOUT_SECS,
            max_workers: MAX_WORKERS,
            spool_dir: None,
            log_filter: None,
        }
    }
}

impl ServerConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ServerError> {
        serde_yaml::from_str(text)
            .map_err(|e| ServerError::Parameter(format!("invalid configuration: {e}")))
    }

    pub fn load_file(path: &Path) -> Result<Self, ServerError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ServerError::Parameter(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&text)
    }

    /// Applies command line values on top of this configuration.
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        if cli.daemon {
            self.daemon = true;
        }
        if let Some(root) = &cli.root {
            self.root = root.clone();
        }
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(port) = &cli.tcp_port {
            self.tcp_port = port.clone();
        }
        if let Some(port) = &cli.udp_port {
            self.udp_port = Some(port.clone());
        }
        self
    }

    /// Checks the merged settings and canonicalizes the serving root.
    pub fn validate(mut self) -> Result<Self, ServerError> {
        if self.max_workers == 0 {
            return Err(ServerError::Parameter(
                "max_workers must be at least 1".to_string(),
            ));
        }
        self.root = validate_root(&self.root)?;
        Ok(self)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn spool_dir(&self) -> PathBuf {
        self.spool_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn tcp_endpoint(&self) -> String {
        format!("{}:{}", self.host, self.tcp_port)
    }

    pub fn udp_endpoint(&self) -> Option<String> {
        self.udp_port
            .as_ref()
            .map(|port| format!("{}:{}", self.host, port))
    }
}

/// Ports may be written as numbers or as service names.
#[derive(Deserialize)]
#[serde(untagged)]
enum PortValue {
    Number(u16),
    Name(String),
}

impl From<PortValue> for String {
    fn from(value: PortValue) -> Self {
        match value {
            PortValue::Number(n) => n.to_string(),
            PortValue::Name(name) => name,
        }
    }
}

fn port<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    PortValue::deserialize(de).map(String::from)
}

fn optional_port<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Option::<PortValue>::deserialize(de).map(|value| value.map(String::from))
}

impl Cli {
    /// Builds the final configuration: file (if any), then CLI, then validation.
    pub fn into_config(self) -> Result<ServerConfig, ServerError> {
        let base = match &self.config {
            Some(path) => ServerConfig::load_file(path)?,
            None => ServerConfig::default(),
        };
        base.merge_cli(&self).validate()
    }
}

/// Rejects system directories and returns the canonical serving root.
///
/// The check is made against the root exactly as written, before
/// canonicalization, so `/etc` is refused while `/etc/site` is allowed.
pub fn validate_root(root: &Path) -> Result<PathBuf, ServerError> {
    let written = root.to_string_lossy();
    if FORBIDDEN_ROOTS.contains(&written.as_ref()) {
        return Err(ServerError::Parameter(format!("root dir can't be {written}")));
    }

    let canonical = root
        .canonicalize()
        .map_err(|e| ServerError::Runtime(format!("root dir {written}: {e}")))?;

    if !canonical.is_dir() {
        return Err(ServerError::Runtime(format!(
            "root dir {written}: not a directory"
        )));
    }

    Ok(canonical)
}
