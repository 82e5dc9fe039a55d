//! [`PatternQueryable`] over a live executor.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::MetadataOptions;
use crate::constraints::ConstraintAssembler;
use crate::core::{
    CatalogRow, ColumnInfo, ForeignKeyColumn, IndexColumn, KeyAssembler, PatternQueryable,
    PrimaryKeyColumn, Privilege, QueryExecutor, ResultSet, TableInfo, Value,
};
use crate::error::Result;
use crate::query::{self, CatalogRequest, ForeignKeyScope, BEST_ROW_SESSION};
use crate::typemap;

use super::{schemas, shape};

/// Builds, runs, shapes and orders catalog requests.
///
/// Key requests are answered by a [`ConstraintAssembler`] over the same
/// executor.
pub struct CatalogReader<E: ?Sized> {
    executor: Arc<E>,
    keys: ConstraintAssembler<E>,
    options: MetadataOptions,
}

impl<E: QueryExecutor + ?Sized> CatalogReader<E> {
    pub fn new(executor: Arc<E>, options: MetadataOptions) -> Self {
        Self {
            keys: ConstraintAssembler::new(Arc::clone(&executor)),
            executor,
            options,
        }
    }

    async fn fetch(&self, request: &CatalogRequest) -> Result<Vec<CatalogRow>> {
        query::fetch(self.executor.as_ref(), request).await
    }

    /// Columns of the matching tables in table and ordinal order.
    async fn columns(&self, request: &CatalogRequest) -> Result<Vec<ColumnInfo>> {
        let mut columns = self
            .fetch(request)
            .await?
            .iter()
            .map(|row| shape::column(row, &self.options))
            .collect::<Result<Vec<_>>>()?;
        columns.sort_by(|a, b| {
            (&a.catalog, &a.table, a.ordinal_pos).cmp(&(&b.catalog, &b.table, b.ordinal_pos))
        });
        Ok(columns)
    }

    fn shape_all<T>(
        rows: &[CatalogRow],
        f: impl Fn(&CatalogRow) -> Result<T>,
        into_row: impl Fn(T) -> Vec<Value>,
    ) -> Result<Vec<Vec<Value>>> {
        rows.iter().map(|r| f(r).map(&into_row)).collect()
    }
}

/// Labels each result set is ordered by.
fn sort_keys(request: &CatalogRequest) -> &'static [&'static str] {
    match request {
        CatalogRequest::Catalogs => &["TABLE_CAT"],
        CatalogRequest::Tables { .. } => &["TABLE_TYPE", "TABLE_CAT", "TABLE_NAME"],
        CatalogRequest::Columns { .. } => &["TABLE_CAT", "TABLE_NAME", "ORDINAL_POSITION"],
        CatalogRequest::IndexInfo { .. } => {
            &["NON_UNIQUE", "TABLE_CAT", "TABLE_NAME", "INDEX_NAME", "ORDINAL_POSITION"]
        }
        CatalogRequest::TablePrivileges(_) => &["TABLE_CAT", "TABLE_NAME", "PRIVILEGE"],
        CatalogRequest::ColumnPrivileges { .. } => {
            &["TABLE_CAT", "TABLE_NAME", "COLUMN_NAME", "PRIVILEGE"]
        }
        // Key and identifier rows are emitted already ordered.
        _ => &[],
    }
}

#[async_trait]
impl<E: QueryExecutor + ?Sized> PatternQueryable for CatalogReader<E> {
    async fn query_catalog(&self, request: &CatalogRequest) -> Result<ResultSet> {
        let columns = schemas::for_request(request);

        let rows = match request {
            CatalogRequest::Schemas
            | CatalogRequest::Udts
            | CatalogRequest::SuperTypes
            | CatalogRequest::SuperTables
            | CatalogRequest::Attributes => Vec::new(),

            CatalogRequest::TableTypes => shape::table_types(),
            CatalogRequest::TypeInfo => typemap::type_info_rows(),
            CatalogRequest::ClientInfoProperties => shape::client_info_properties(),

            CatalogRequest::Catalogs => {
                let raw = self.fetch(request).await?;
                raw.iter().map(shape::catalog).collect::<Result<Vec<_>>>()?
            }

            CatalogRequest::Tables { .. } => {
                let raw = self.fetch(request).await?;
                Self::shape_all(&raw, shape::table, TableInfo::into_row)?
            }

            CatalogRequest::Columns { .. } => self
                .columns(request)
                .await?
                .into_iter()
                .map(ColumnInfo::into_row)
                .collect(),

            CatalogRequest::BestRowIdentifier { .. } => self
                .columns(request)
                .await?
                .into_iter()
                .map(|c| c.into_identifier_row(Some(BEST_ROW_SESSION)))
                .collect(),

            CatalogRequest::VersionColumns(_) => self
                .columns(request)
                .await?
                .into_iter()
                .map(|c| c.into_identifier_row(None))
                .collect(),

            CatalogRequest::PrimaryKeys(target) => self
                .keys
                .primary_key(target)
                .await?
                .into_iter()
                .map(PrimaryKeyColumn::into_row)
                .collect(),

            CatalogRequest::ImportedKeys(_)
            | CatalogRequest::ExportedKeys(_)
            | CatalogRequest::CrossReference { .. } => match ForeignKeyScope::from_request(request) {
                Some(scope) => self
                    .keys
                    .foreign_keys(&scope)
                    .await?
                    .into_iter()
                    .map(ForeignKeyColumn::into_row)
                    .collect(),
                None => Vec::new(),
            },

            CatalogRequest::IndexInfo { .. } => {
                let raw = self.fetch(request).await?;
                Self::shape_all(&raw, shape::index_column, IndexColumn::into_row)?
            }

            CatalogRequest::TablePrivileges(_) | CatalogRequest::ColumnPrivileges { .. } => {
                let raw = self.fetch(request).await?;
                Self::shape_all(&raw, shape::privilege, Privilege::into_row)?
            }
        };

        let mut result = ResultSet::new(columns, rows)?;
        result.sort_by_labels(sort_keys(request));
        Ok(result)
    }
}
