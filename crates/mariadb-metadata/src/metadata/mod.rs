//! Public metadata operations.
//!
//! [`DatabaseMetadata`] exposes one async method per operation. Arguments
//! follow JDBC conventions (`None` for a null argument, `%`/`_` wildcards
//! in `*_pattern` arguments). Every method returns a [`ResultSet`] whose
//! column labels and types are fixed per operation, even when no rows
//! match.
//!
//! MariaDB and MySQL have no schemas inside a catalog, so schema arguments
//! are accepted and ignored and every `*_SCHEM` column is NULL.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mariadb_metadata::{Config, DatabaseMetadata, MysqlExecutor};
//!
//! # async fn run() -> mariadb_metadata::Result<()> {
//! let config = Config::load("config.yaml")?;
//! let executor = MysqlExecutor::connect(&config.connection).await?;
//! let metadata = DatabaseMetadata::new(Arc::new(executor), config.metadata);
//!
//! let mut pk = metadata.get_primary_keys(Some("test"), None, Some("pk_test")).await?;
//! while pk.next() {
//!     println!("{:?} {:?}", pk.get_string("COLUMN_NAME")?, pk.get_i16("KEY_SEQ")?);
//! }
//! # Ok(())
//! # }
//! ```

mod reader;
pub mod schemas;
mod shape;

use std::sync::Arc;

use crate::config::MetadataOptions;
use crate::constraints::ConstraintAssembler;
use crate::core::{KeyAssembler, PatternQueryable, QueryExecutor, ResultSet, TableKind};
use crate::error::Result;
use crate::pattern::{CatalogFilter, NamePattern, TableFilter};
use crate::query::{CatalogRequest, ForeignKeyScope};

pub use reader::CatalogReader;

/// Schema-introspection facade over a [`QueryExecutor`].
pub struct DatabaseMetadata<E: ?Sized> {
    reader: CatalogReader<E>,
    keys: ConstraintAssembler<E>,
    options: MetadataOptions,
}

impl<E: QueryExecutor + ?Sized> DatabaseMetadata<E> {
    pub fn new(executor: Arc<E>, options: MetadataOptions) -> Self {
        Self {
            reader: CatalogReader::new(Arc::clone(&executor), options),
            keys: ConstraintAssembler::new(executor),
            options,
        }
    }

    pub fn options(&self) -> &MetadataOptions {
        &self.options
    }

    fn catalog(&self, catalog: Option<&str>) -> CatalogFilter {
        CatalogFilter::resolve(catalog, &self.options)
    }

    fn pattern(&self, pattern: Option<&str>) -> NamePattern {
        NamePattern::pattern(pattern, self.options.empty_pattern)
    }

    /// Target for operations taking a table name pattern.
    fn tables_like(&self, catalog: Option<&str>, pattern: Option<&str>) -> TableFilter {
        TableFilter::new(self.catalog(catalog), self.pattern(pattern))
    }

    /// Target for operations taking a literal table name.
    fn table_named(&self, catalog: Option<&str>, table: Option<&str>) -> TableFilter {
        TableFilter::new(
            self.catalog(catalog),
            NamePattern::name(table, self.options.empty_pattern),
        )
    }

    /// Catalog (database) names.
    pub async fn get_catalogs(&self) -> Result<ResultSet> {
        self.reader.query_catalog(&CatalogRequest::Catalogs).await
    }

    /// Always empty: there are no schemas inside a catalog.
    pub async fn get_schemas(&self) -> Result<ResultSet> {
        self.reader.query_catalog(&CatalogRequest::Schemas).await
    }

    pub async fn get_table_types(&self) -> Result<ResultSet> {
        self.reader.query_catalog(&CatalogRequest::TableTypes).await
    }

    /// Tables, views and system views.
    ///
    /// `types` limits the kinds returned (`TABLE`, `VIEW`, `SYSTEM VIEW`);
    /// `None` returns every kind and an empty slice returns nothing.
    pub async fn get_tables(
        &self,
        catalog: Option<&str>,
        _schema_pattern: Option<&str>,
        table_name_pattern: Option<&str>,
        types: Option<&[&str]>,
    ) -> Result<ResultSet> {
        let request = CatalogRequest::Tables {
            target: self.tables_like(catalog, table_name_pattern),
            kinds: types.map(|t| t.iter().map(|k| TableKind::from_label(k)).collect()),
        };
        self.reader.query_catalog(&request).await
    }

    /// Columns with their logical types.
    pub async fn get_columns(
        &self,
        catalog: Option<&str>,
        _schema_pattern: Option<&str>,
        table_name_pattern: Option<&str>,
        column_name_pattern: Option<&str>,
    ) -> Result<ResultSet> {
        let request = CatalogRequest::Columns {
            target: self.tables_like(catalog, table_name_pattern),
            column: self.pattern(column_name_pattern),
        };
        self.reader.query_catalog(&request).await
    }

    /// Primary key columns, `KEY_SEQ` in declaration order.
    pub async fn get_primary_keys(
        &self,
        catalog: Option<&str>,
        _schema: Option<&str>,
        table: Option<&str>,
    ) -> Result<ResultSet> {
        let target = self.table_named(catalog, table);
        let rows = self
            .keys
            .primary_key(&target)
            .await?
            .into_iter()
            .map(|k| k.into_row())
            .collect();
        ResultSet::new(schemas::PRIMARY_KEYS, rows)
    }

    async fn foreign_keys(&self, scope: ForeignKeyScope) -> Result<ResultSet> {
        let rows = self
            .keys
            .foreign_keys(&scope)
            .await?
            .into_iter()
            .map(|k| k.into_row())
            .collect();
        ResultSet::new(schemas::FOREIGN_KEYS, rows)
    }

    /// Foreign keys declared on `table`, one row per column pair.
    pub async fn get_imported_keys(
        &self,
        catalog: Option<&str>,
        _schema: Option<&str>,
        table: Option<&str>,
    ) -> Result<ResultSet> {
        let target = self.table_named(catalog, table);
        self.foreign_keys(ForeignKeyScope::Imported(target)).await
    }

    /// Foreign keys elsewhere that reference `table`.
    pub async fn get_exported_keys(
        &self,
        catalog: Option<&str>,
        _schema: Option<&str>,
        table: Option<&str>,
    ) -> Result<ResultSet> {
        let target = self.table_named(catalog, table);
        self.foreign_keys(ForeignKeyScope::Exported(target)).await
    }

    /// Foreign keys on `foreign_table` that reference `parent_table`.
    pub async fn get_cross_reference(
        &self,
        parent_catalog: Option<&str>,
        _parent_schema: Option<&str>,
        parent_table: Option<&str>,
        foreign_catalog: Option<&str>,
        _foreign_schema: Option<&str>,
        foreign_table: Option<&str>,
    ) -> Result<ResultSet> {
        let scope = ForeignKeyScope::Cross {
            parent: self.table_named(parent_catalog, parent_table),
            child: self.table_named(foreign_catalog, foreign_table),
        };
        self.foreign_keys(scope).await
    }

    /// Index columns. Statistics are always read live, so `approximate`
    /// makes no difference.
    pub async fn get_index_info(
        &self,
        catalog: Option<&str>,
        _schema: Option<&str>,
        table: Option<&str>,
        unique: bool,
        _approximate: bool,
    ) -> Result<ResultSet> {
        let request = CatalogRequest::IndexInfo {
            target: self.table_named(catalog, table),
            unique_only: unique,
        };
        self.reader.query_catalog(&request).await
    }

    pub async fn get_table_privileges(
        &self,
        catalog: Option<&str>,
        _schema_pattern: Option<&str>,
        table_name_pattern: Option<&str>,
    ) -> Result<ResultSet> {
        let request = CatalogRequest::TablePrivileges(self.tables_like(catalog, table_name_pattern));
        self.reader.query_catalog(&request).await
    }

    pub async fn get_column_privileges(
        &self,
        catalog: Option<&str>,
        _schema: Option<&str>,
        table: Option<&str>,
        column_name_pattern: Option<&str>,
    ) -> Result<ResultSet> {
        let request = CatalogRequest::ColumnPrivileges {
            target: self.table_named(catalog, table),
            column: self.pattern(column_name_pattern),
        };
        self.reader.query_catalog(&request).await
    }

    /// Columns that identify a row: the primary key columns.
    pub async fn get_best_row_identifier(
        &self,
        catalog: Option<&str>,
        _schema: Option<&str>,
        table: Option<&str>,
        scope: i16,
        nullable: bool,
    ) -> Result<ResultSet> {
        let request = CatalogRequest::BestRowIdentifier {
            target: self.table_named(catalog, table),
            scope,
            nullable,
        };
        self.reader.query_catalog(&request).await
    }

    /// Columns updated automatically on every row update.
    pub async fn get_version_columns(
        &self,
        catalog: Option<&str>,
        _schema: Option<&str>,
        table: Option<&str>,
    ) -> Result<ResultSet> {
        let request = CatalogRequest::VersionColumns(self.table_named(catalog, table));
        self.reader.query_catalog(&request).await
    }

    pub async fn get_type_info(&self) -> Result<ResultSet> {
        self.reader.query_catalog(&CatalogRequest::TypeInfo).await
    }

    pub async fn get_client_info_properties(&self) -> Result<ResultSet> {
        self.reader
            .query_catalog(&CatalogRequest::ClientInfoProperties)
            .await
    }

    /// Always empty: user-defined types are not supported by the server.
    pub async fn get_udts(
        &self,
        _catalog: Option<&str>,
        _schema_pattern: Option<&str>,
        _type_name_pattern: Option<&str>,
        _types: Option<&[i32]>,
    ) -> Result<ResultSet> {
        self.reader.query_catalog(&CatalogRequest::Udts).await
    }

    /// Always empty.
    pub async fn get_super_types(
        &self,
        _catalog: Option<&str>,
        _schema_pattern: Option<&str>,
        _type_name_pattern: Option<&str>,
    ) -> Result<ResultSet> {
        self.reader.query_catalog(&CatalogRequest::SuperTypes).await
    }

    /// Always empty: there is no table inheritance.
    pub async fn get_super_tables(
        &self,
        _catalog: Option<&str>,
        _schema_pattern: Option<&str>,
        _table_name_pattern: Option<&str>,
    ) -> Result<ResultSet> {
        self.reader.query_catalog(&CatalogRequest::SuperTables).await
    }

    /// Always empty.
    pub async fn get_attributes(
        &self,
        _catalog: Option<&str>,
        _schema_pattern: Option<&str>,
        _type_name_pattern: Option<&str>,
        _attribute_name_pattern: Option<&str>,
    ) -> Result<ResultSet> {
        self.reader.query_catalog(&CatalogRequest::Attributes).await
    }
}
