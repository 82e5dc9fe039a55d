//! Database driver implementations.
//!
//! A driver supplies a [`QueryExecutor`](crate::core::QueryExecutor) for a
//! live server. The introspection core never talks to a connection
//! directly, so drivers are optional:
//!
//! - [`mysql`]: sqlx-based MySQL/MariaDB executor (feature `mysql`)

#[cfg(feature = "mysql")]
pub mod mysql;

#[cfg(feature = "mysql")]
pub use mysql::MysqlExecutor;
