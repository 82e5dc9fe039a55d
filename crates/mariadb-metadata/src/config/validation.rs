//! Configuration validation.

use super::{Config, SslMode};
use crate::error::{MetadataError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    let conn = &config.connection;

    if conn.host.is_empty() {
        return Err(MetadataError::Config("connection.host is required".into()));
    }
    if conn.user.is_empty() {
        return Err(MetadataError::Config("connection.user is required".into()));
    }
    if conn.port == 0 {
        return Err(MetadataError::Config(
            "connection.port must be between 1 and 65535".into(),
        ));
    }
    if conn.max_connections == 0 {
        return Err(MetadataError::Config(
            "connection.max_connections must be at least 1".into(),
        ));
    }
    if conn.acquire_timeout_secs == 0 {
        return Err(MetadataError::Config(
            "connection.acquire_timeout_secs must be at least 1".into(),
        ));
    }
    if let Some(db) = &conn.database {
        if db.trim().is_empty() {
            return Err(MetadataError::Config(
                "connection.database must not be blank; omit it to connect without a default database".into(),
            ));
        }
    }

    SslMode::parse(&conn.ssl_mode)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConnectionConfig, MetadataOptions};

    fn valid_config() -> Config {
        Config {
            connection: ConnectionConfig {
                host: "localhost".to_string(),
                port: 3306,
                database: Some("test".to_string()),
                user: "root".to_string(),
                password: "password".to_string(),
                ssl_mode: "preferred".to_string(),
                max_connections: 1,
                acquire_timeout_secs: 30,
            },
            metadata: MetadataOptions::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        let config = valid_config();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_missing_host() {
        let mut config = valid_config();
        config.connection.host = "".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_missing_user() {
        let mut config = valid_config();
        config.connection.user = "".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_port_and_pool() {
        let mut config = valid_config();
        config.connection.port = 0;
        assert!(validate(&config).is_err());

        let mut config = valid_config();
        config.connection.max_connections = 0;
        assert!(validate(&config).is_err());

        let mut config = valid_config();
        config.connection.acquire_timeout_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_blank_database() {
        let mut config = valid_config();
        config.connection.database = Some("  ".to_string());
        assert!(validate(&config).is_err());

        config.connection.database = None;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_unknown_ssl_mode() {
        let mut config = valid_config();
        config.connection.ssl_mode = "sometimes".to_string();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid ssl_mode 'sometimes'"));

        config.connection.ssl_mode = "verify-ca".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_connection_config_debug_redacts_password() {
        let mut config = valid_config();
        config.connection.password = "super_secret_password_123".to_string();
        let debug_output = format!("{:?}", config.connection);
        assert!(
            debug_output.contains("[REDACTED]"),
            "Debug output should contain [REDACTED]"
        );
        assert!(
            !debug_output.contains("super_secret_password_123"),
            "Debug output should not contain actual password value"
        );
    }
}
