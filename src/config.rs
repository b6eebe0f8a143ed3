use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 3002;
pub const DEFAULT_LOG_FILTER: &str = "graphql_hello_bench=info";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Serve GraphiQL for `GET /graphql` requests without a query
    pub graphiql: bool,
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            graphiql: true,
            cors: false,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Used when `RUST_LOG` is not set
    pub filter: String,
    /// Directory for daily-rolling JSON logs; console only when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            log_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricsConfig {
    pub enabled: bool,
}

/// Command-line flags layered on top of the file config.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct Overrides {
    /// Address to bind the listener to
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Port to run the server on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Disable the GraphiQL explorer
    #[arg(long)]
    pub no_graphiql: bool,

    /// Enable a permissive CORS layer
    #[arg(long)]
    pub cors: bool,

    /// Record request metrics and expose them on /metrics
    #[arg(long)]
    pub metrics: bool,

    /// Write JSON logs to this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Flags only ever switch features on; absent flags leave the file value alone.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if overrides.no_graphiql {
            self.server.graphiql = false;
        }
        if overrides.cors {
            self.server.cors = true;
        }
        if overrides.metrics {
            self.metrics.enabled = true;
        }
        if let Some(dir) = &overrides.log_dir {
            self.logging.log_dir = Some(dir.clone());
        }
    }
}
