//! Error types for the introspection library.

use thiserror::Error;

/// Boxed cause carried by [`MetadataError::QueryFailed`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for metadata operations.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection pool error with context
    #[error("Pool error: {message}\n  Context: {context}")]
    Pool { message: String, context: String },

    /// A catalog query could not be executed or its rows could not be read.
    #[error("Metadata query failed ({operation}): {source}")]
    QueryFailed {
        operation: String,
        #[source]
        source: BoxError,
    },

    /// Foreign key rule text that does not name a known referential action.
    #[error("Unrecognized constraint rule '{rule}' on {constraint}")]
    UnrecognizedRule { constraint: String, rule: String },

    /// A raw catalog row lacks a field the shaping step requires.
    #[error("Catalog row is missing field {0}")]
    MissingField(String),

    /// A raw catalog field holds a value that cannot be interpreted.
    #[error("Invalid value in catalog field {field}: {message}")]
    InvalidField { field: String, message: String },

    /// A shaped row does not have one cell per result column.
    #[error("Result row has {found} cells but the result set has {expected} columns")]
    RowWidth { expected: usize, found: usize },

    /// Column label not present in a result set.
    #[error("Unknown result column: {0}")]
    UnknownColumn(String),

    /// Cursor accessor called before `next()` or after the last row.
    #[error("Result set cursor is not positioned on a row")]
    NoCurrentRow,

    /// Cursor accessor asked for a type the cell cannot provide.
    #[error("Column {column} does not hold a {expected} value")]
    TypeMismatch {
        column: String,
        expected: &'static str,
    },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MetadataError {
    /// Create a Pool error with context about where it occurred
    pub fn pool(message: impl ToString, context: impl Into<String>) -> Self {
        MetadataError::Pool {
            message: message.to_string(),
            context: context.into(),
        }
    }

    /// Wrap an executor failure for the named operation.
    pub fn query_failed(
        operation: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        MetadataError::QueryFailed {
            operation: operation.into(),
            source: source.into(),
        }
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            MetadataError::Config(_) | MetadataError::Yaml(_) | MetadataError::Io(_) => 2,
            MetadataError::Pool { .. } => 3,
            MetadataError::QueryFailed { .. } => 4,
            _ => 1,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for metadata operations.
pub type Result<T> = std::result::Result<T, MetadataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_failed_keeps_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset");
        let err = MetadataError::query_failed("getTables", cause);

        assert!(err.to_string().contains("getTables"));
        let detailed = err.format_detailed();
        assert!(detailed.contains("Caused by:"));
        assert!(detailed.contains("connection reset"));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_unrecognized_rule_message() {
        let err = MetadataError::UnrecognizedRule {
            constraint: "fk_orders_customer".into(),
            rule: "EXPLODE".into(),
        };
        assert_eq!(
            err.to_string(),
            "Unrecognized constraint rule 'EXPLODE' on fk_orders_customer"
        );
        assert_eq!(err.exit_code(), 1);
    }
}
