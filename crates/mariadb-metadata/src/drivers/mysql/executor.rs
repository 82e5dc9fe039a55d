//! sqlx-backed [`QueryExecutor`] for MariaDB/MySQL.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow, MySqlSslMode};
use sqlx::{Column, Row, TypeInfo, ValueRef};
use tracing::{debug, info, warn};

use crate::config::{ConnectionConfig, SslMode};
use crate::core::{CatalogRow, QueryExecutor, Value};
use crate::error::{MetadataError, Result};
use crate::query::CatalogQuery;

impl From<SslMode> for MySqlSslMode {
    fn from(mode: SslMode) -> Self {
        match mode {
            SslMode::Disabled => MySqlSslMode::Disabled,
            SslMode::Preferred => MySqlSslMode::Preferred,
            SslMode::Required => MySqlSslMode::Required,
            SslMode::VerifyCa => MySqlSslMode::VerifyCa,
            SslMode::VerifyIdentity => MySqlSslMode::VerifyIdentity,
        }
    }
}

/// Runs catalog queries on a sqlx MySQL pool.
///
/// Each query checks a connection out of the pool and returns it when the
/// query future completes or is dropped.
#[derive(Clone)]
pub struct MysqlExecutor {
    pool: MySqlPool,
}

impl MysqlExecutor {
    /// Connect using the given configuration and verify the connection.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let mut options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .ssl_mode(config.ssl_mode()?.into());
        if let Some(database) = &config.database {
            options = options.database(database);
        }

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(options)
            .await
            .map_err(|e| MetadataError::pool(e, "creating MySQL pool"))?;

        sqlx::query("SELECT 1")
            .fetch_one(&pool)
            .await
            .map_err(|e| MetadataError::pool(e, "testing MySQL connection"))?;

        info!("Connected to MySQL server: {}", config.display_target());

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// `VERSION()` of the connected server.
    pub async fn server_version(&self) -> Result<String> {
        let row = sqlx::query("SELECT CAST(VERSION() AS CHAR(255)) AS V")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| MetadataError::query_failed("server version", e))?;
        row.try_get::<String, _>(0)
            .map_err(|e| MetadataError::query_failed("server version", e))
    }

    /// The connection's default database, if one is selected.
    pub async fn current_database(&self) -> Result<Option<String>> {
        let row = sqlx::query("SELECT CAST(DATABASE() AS CHAR(64)) AS DB")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| MetadataError::query_failed("current database", e))?;
        row.try_get::<Option<String>, _>(0)
            .map_err(|e| MetadataError::query_failed("current database", e))
    }

    /// Close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Decode every column of a row as text or integer.
    fn decode_row(row: &MySqlRow) -> Result<CatalogRow> {
        let mut out = CatalogRow::new();
        for (i, column) in row.columns().iter().enumerate() {
            let value = Self::decode_value(row, i).ok_or_else(|| {
                undecodable(column.name(), column.type_info().name())
            })?;
            out.insert(column.name(), value);
        }
        Ok(out)
    }

    /// `None` when the cell is non-null but neither text nor integer.
    fn decode_value(row: &MySqlRow, idx: usize) -> Option<Value> {
        let is_null = row.try_get_raw(idx).map(|r| r.is_null()).unwrap_or(true);
        if is_null {
            return Some(Value::Null);
        }
        if let Ok(v) = row.try_get::<String, _>(idx) {
            return Some(Value::Text(v));
        }
        if let Ok(v) = row.try_get::<i64, _>(idx) {
            return Some(Value::Int(v));
        }
        if let Ok(v) = row.try_get::<u64, _>(idx) {
            return Some(i64::try_from(v).map_or_else(|_| Value::Text(v.to_string()), Value::Int));
        }
        if let Ok(v) = row.try_get::<Vec<u8>, _>(idx) {
            return Some(Value::Text(String::from_utf8_lossy(&v).into_owned()));
        }
        None
    }
}

fn undecodable(column: &str, type_name: &str) -> MetadataError {
    warn!("Column {} has undecodable type {}", column, type_name);
    MetadataError::InvalidField {
        field: column.to_string(),
        message: format!("cannot decode {} as text or integer", type_name),
    }
}

#[async_trait]
impl QueryExecutor for MysqlExecutor {
    async fn fetch_rows(&self, query: &CatalogQuery) -> Result<Vec<CatalogRow>> {
        let mut statement = sqlx::query(&query.sql);
        for param in &query.params {
            statement = statement.bind(param.as_str());
        }

        let rows: Vec<MySqlRow> = statement
            .fetch_all(&self.pool)
            .await
            .map_err(|e| MetadataError::query_failed(query.request.name(), e))?;

        debug!(
            "{}: {} rows from server ({} bind parameters)",
            query.request.name(),
            rows.len(),
            query.params.len()
        );

        rows.iter().map(Self::decode_row).collect()
    }
}
