//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::Result;
use std::path::Path;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

impl ConnectionConfig {
    /// Parsed TLS mode. Valid after [`Config::validate`].
    pub fn ssl_mode(&self) -> Result<SslMode> {
        SslMode::parse(&self.ssl_mode)
    }

    /// `host:port/database` for log lines; never includes credentials.
    pub fn display_target(&self) -> String {
        format!(
            "{}:{}/{}",
            self.host,
            self.port,
            self.database.as_deref().unwrap_or("")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::EmptyPattern;
    use std::io::Write;

    #[test]
    fn test_from_yaml_applies_defaults() {
        let yaml = r#"
connection:
  host: db.internal
  user: app
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.connection.port, 3306);
        assert_eq!(config.connection.database, None);
        assert_eq!(config.connection.ssl_mode().unwrap(), SslMode::Preferred);
        assert_eq!(config.connection.max_connections, 1);
        assert_eq!(config.connection.acquire_timeout_secs, 30);
        assert_eq!(config.metadata, MetadataOptions::default());
        assert!(config.metadata.null_catalog_means_current);
    }

    #[test]
    fn test_from_yaml_metadata_options() {
        let yaml = r#"
connection:
  host: localhost
  port: 3307
  database: test
  user: root
  password: secret
  ssl_mode: disabled
metadata:
  null_catalog_means_current: false
  tiny_int1_is_bit: true
  empty_pattern: match_empty
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.connection.display_target(), "localhost:3307/test");
        assert!(!config.metadata.null_catalog_means_current);
        assert!(config.metadata.tiny_int1_is_bit);
        assert_eq!(config.metadata.empty_pattern, EmptyPattern::MatchEmpty);
    }

    #[test]
    fn test_from_yaml_rejects_invalid() {
        let yaml = r#"
connection:
  host: ""
  user: root
"#;
        assert!(Config::from_yaml(yaml).is_err());
        assert!(Config::from_yaml("connection: [").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "connection:\n  host: localhost\n  user: root").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.connection.host, "localhost");

        let err = Config::load("/nonexistent/config.yaml").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
