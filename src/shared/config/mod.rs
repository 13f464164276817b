//! Server configuration module
//!
//! Configuration is read from environment variables with defaults suited to
//! local development:
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` (or `MONGODB_URI`) | `postgres://localhost/notes` |
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `9090` |
//! | `NOTES_BROADCAST_CAPACITY` | `1000` |
//!
//! A connection string with the `memory://` scheme selects the in-process
//! store instead of PostgreSQL.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;

/// Store connection string used when none is configured
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/notes";

/// Listener port used when none is configured
pub const DEFAULT_PORT: u16 = 9090;

/// Broadcast channel capacity used when none is configured
pub const DEFAULT_BROADCAST_CAPACITY: usize = 1000;

/// Scheme prefix selecting the in-memory store
pub const MEMORY_SCHEME: &str = "memory://";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Store connection string
    pub database_url: String,
    /// Address to bind
    pub host: IpAddr,
    /// Port to bind; 0 lets the OS pick one
    pub port: u16,
    /// Capacity of the snapshot broadcast channel
    pub broadcast_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

impl ServerConfig {
    /// Create a new ServerConfigBuilder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Empty or blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut builder = Self::builder();

        if let Some(url) = lookup("DATABASE_URL").or_else(|| lookup("MONGODB_URI")) {
            builder = builder.database_url(url);
        }
        if let Some(host) = lookup("HOST") {
            let host = host
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidHost(host.clone()))?;
            builder = builder.host(host);
        }
        if let Some(port) = lookup("PORT") {
            let port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
            builder = builder.port(port);
        }
        if let Some(capacity) = lookup("NOTES_BROADCAST_CAPACITY") {
            let capacity = capacity
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidCapacity(capacity.clone()))?;
            builder = builder.broadcast_capacity(capacity);
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::MissingValue("database_url"));
        }
        if self.broadcast_capacity == 0 {
            return Err(ConfigError::InvalidCapacity("0".to_string()));
        }
        Ok(())
    }

    /// Socket address to bind
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the in-memory store was requested
    pub fn uses_memory_store(&self) -> bool {
        self.database_url.starts_with(MEMORY_SCHEME)
    }
}

/// Builder for ServerConfig
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    database_url: Option<String>,
    host: Option<IpAddr>,
    port: Option<u16>,
    broadcast_capacity: Option<usize>,
}

impl ServerConfigBuilder {
    /// Set the store connection string
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Set the bind address
    pub fn host(mut self, host: IpAddr) -> Self {
        self.host = Some(host);
        self
    }

    /// Set the bind port
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the broadcast channel capacity
    pub fn broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = Some(capacity);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        let defaults = ServerConfig::default();
        let config = ServerConfig {
            database_url: self.database_url.unwrap_or(defaults.database_url),
            host: self.host.unwrap_or(defaults.host),
            port: self.port.unwrap_or(defaults.port),
            broadcast_capacity: self.broadcast_capacity.unwrap_or(defaults.broadcast_capacity),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid port: {0}")]
    InvalidPort(String),
    #[error("invalid host: {0}")]
    InvalidHost(String),
    #[error("invalid broadcast capacity: {0}")]
    InvalidCapacity(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}
