//! MySQL/MariaDB driver.
//!
//! [`MysqlExecutor`] runs the catalog queries built by [`crate::query`] on a
//! sqlx connection pool.
//!
//! # Feature Flag
//!
//! This module is only available when the `mysql` feature is enabled (it is
//! on by default).
//!
//! # Supported Versions
//!
//! - MySQL 5.7+, 8.0+
//! - MariaDB 10.2+

mod executor;

pub use executor::MysqlExecutor;
