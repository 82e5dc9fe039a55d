//! # mariadb-metadata
//!
//! Schema introspection for MariaDB and MySQL.
//!
//! This library answers the questions a database tool asks before it can do
//! anything useful: which catalogs exist, which tables and views they hold,
//! what a table's columns and types are, and how its primary and foreign
//! keys are composed. Answers come from the server's own
//! `INFORMATION_SCHEMA` and are returned as fixed-shape [`ResultSet`]s:
//!
//! - **Standard result shapes**: every operation has a fixed list of column
//!   labels and logical types, present even with zero rows
//! - **Type mapping** from native column types to portable type codes
//! - **Pattern filters** with `%` / `_` wildcards and null/empty semantics
//! - **Key reconstruction** with `KEY_SEQ` in declaration order
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mariadb_metadata::{Config, DatabaseMetadata, MysqlExecutor};
//!
//! #[tokio::main]
//! async fn main() -> mariadb_metadata::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let executor = MysqlExecutor::connect(&config.connection).await?;
//!     let metadata = DatabaseMetadata::new(Arc::new(executor), config.metadata);
//!
//!     let tables = metadata.get_tables(None, None, Some("%"), Some(&["TABLE"])).await?;
//!     println!("{}", tables.to_json());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constraints;
pub mod core;
pub mod drivers;
pub mod error;
pub mod metadata;
pub mod pattern;
pub mod query;
pub mod typemap;

// Re-exports for convenient access
pub use config::{Config, ConnectionConfig, MetadataOptions, SslMode};
pub use crate::core::{CatalogRow, ColumnDef, QueryExecutor, ResultSet, SqlType, Value};
pub use error::{MetadataError, Result};
pub use metadata::DatabaseMetadata;
pub use pattern::EmptyPattern;
pub use query::{CatalogQuery, CatalogRequest};

#[cfg(feature = "mysql")]
pub use drivers::MysqlExecutor;
