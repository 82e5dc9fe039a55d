//! Configuration type definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MetadataError, Result};
use crate::pattern::EmptyPattern;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server to introspect.
    pub connection: ConnectionConfig,

    /// Behaviour of the metadata operations.
    #[serde(default)]
    pub metadata: MetadataOptions,
}

/// Connection settings for the MariaDB/MySQL server.
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Database host.
    pub host: String,

    /// Database port (default: 3306).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Default database. Operations given a null or empty catalog use it.
    #[serde(default)]
    pub database: Option<String>,

    /// Username.
    pub user: String,

    /// Password.
    #[serde(default)]
    pub password: String,

    /// TLS mode (default: "preferred").
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,

    /// Pool size (default: 1, one shared connection).
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection (default: 30).
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("ssl_mode", &self.ssl_mode)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}

/// Options that change how metadata arguments are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataOptions {
    /// A null catalog argument means the connection's default database
    /// (default: true). When false it means every catalog.
    #[serde(default = "default_true")]
    pub null_catalog_means_current: bool,

    /// Report `tinyint(1)` columns as BIT (default: false).
    #[serde(default)]
    pub tiny_int1_is_bit: bool,

    /// Meaning of an empty table or column name pattern (default: match_all).
    #[serde(default)]
    pub empty_pattern: EmptyPattern,
}

impl Default for MetadataOptions {
    fn default() -> Self {
        Self {
            null_catalog_means_current: true,
            tiny_int1_is_bit: false,
            empty_pattern: EmptyPattern::MatchAll,
        }
    }
}

/// TLS modes accepted in `connection.ssl_mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SslMode {
    Disabled,
    /// Use TLS when the server offers it.
    #[default]
    Preferred,
    Required,
    /// Verify the server certificate against the CA.
    VerifyCa,
    /// Verify the certificate and the host name.
    VerifyIdentity,
}

impl SslMode {
    /// Parse an SSL mode from a string.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "disabled" | "disable" => Ok(SslMode::Disabled),
            "preferred" | "prefer" | "" => Ok(SslMode::Preferred),
            "required" | "require" => Ok(SslMode::Required),
            "verify_ca" => Ok(SslMode::VerifyCa),
            "verify_identity" | "verify_full" => Ok(SslMode::VerifyIdentity),
            other => Err(MetadataError::Config(format!(
                "Invalid ssl_mode '{}'. Valid values: disabled, preferred, required, verify_ca, verify_identity",
                other
            ))),
        }
    }
}

fn default_port() -> u16 {
    3306
}

fn default_ssl_mode() -> String {
    "preferred".to_string()
}

fn default_max_connections() -> u32 {
    1
}

fn default_acquire_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}
