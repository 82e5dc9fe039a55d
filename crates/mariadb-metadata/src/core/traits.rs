//! Collaborator and capability traits.
//!
//! - [`QueryExecutor`]: runs one catalog query and hands back raw rows. This
//!   is the only thing the introspection core needs from a live connection.
//! - [`PatternQueryable`]: answers a pattern-filtered catalog request as a
//!   fixed-shape [`ResultSet`].
//! - [`KeyAssembler`]: reconstructs primary and foreign keys.
//!
//! The facade in [`crate::metadata`] is written against the two capability
//! traits, so each can be exercised on its own.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::{MetadataError, Result};
use crate::pattern::TableFilter;
use crate::query::{CatalogQuery, CatalogRequest, ForeignKeyScope};

use super::resultset::ResultSet;
use super::schema::{ForeignKeyColumn, PrimaryKeyColumn};
use super::value::Value;

/// One raw row returned by a catalog query, keyed by column alias.
///
/// Field names are stored upper-cased so lookups do not depend on how the
/// server echoes aliases back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogRow {
    fields: BTreeMap<String, Value>,
}

impl CatalogRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.fields.insert(name.to_ascii_uppercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(&name.to_ascii_uppercase())
    }

    /// Text of a field; `None` when absent or NULL.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Integer value of a field. Numeric text is accepted, since some
    /// catalog columns come back as strings depending on the server build.
    pub fn get_i64(&self, name: &str) -> Result<Option<i64>> {
        match self.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Text(s)) => s.trim().parse::<i64>().map(Some).map_err(|e| {
                MetadataError::InvalidField {
                    field: name.to_string(),
                    message: format!("'{}' is not an integer: {}", s, e),
                }
            }),
            Some(other) => Ok(other.as_i64()),
        }
    }

    /// Text of a field that must be present and non-NULL.
    pub fn require_str(&self, name: &str) -> Result<&str> {
        self.get_str(name)
            .ok_or_else(|| MetadataError::MissingField(name.to_string()))
    }

    /// Integer of a field that must be present and non-NULL.
    pub fn require_i64(&self, name: &str) -> Result<i64> {
        self.get_i64(name)?
            .ok_or_else(|| MetadataError::MissingField(name.to_string()))
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for CatalogRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = CatalogRow::new();
        for (k, v) in iter {
            row.insert(k.as_ref(), v);
        }
        row
    }
}

/// Runs catalog queries against a server.
///
/// Implementations own connection handling. A failure to execute the query
/// or to read its rows must be reported as an error, never as zero rows.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Execute `query.sql` with `query.params` bound in order.
    async fn fetch_rows(&self, query: &CatalogQuery) -> Result<Vec<CatalogRow>>;
}

#[async_trait]
impl<T: QueryExecutor + ?Sized> QueryExecutor for std::sync::Arc<T> {
    async fn fetch_rows(&self, query: &CatalogQuery) -> Result<Vec<CatalogRow>> {
        (**self).fetch_rows(query).await
    }
}

/// Answers pattern-filtered catalog requests.
#[async_trait]
pub trait PatternQueryable: Send + Sync {
    /// Build, execute and shape one request into its fixed schema.
    async fn query_catalog(&self, request: &CatalogRequest) -> Result<ResultSet>;
}

/// Reconstructs key constraints from the catalog.
#[async_trait]
pub trait KeyAssembler: Send + Sync {
    /// Primary key columns of the matching tables, ranked by declaration.
    async fn primary_key(&self, target: &TableFilter) -> Result<Vec<PrimaryKeyColumn>>;

    /// Foreign key column pairs for the given scope.
    async fn foreign_keys(&self, scope: &ForeignKeyScope) -> Result<Vec<ForeignKeyColumn>>;
}
