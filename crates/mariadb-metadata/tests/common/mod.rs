//! In-memory executors for facade tests.
//!
//! `MemoryCatalog` answers catalog queries from a small table model by
//! looking at the structured request rather than the SQL text. Filters are
//! applied with the library's own `matches` methods, so the in-memory and
//! SQL paths share one set of semantics. Rows come back in reverse order to
//! make sure ordering is done by the library, not by the executor.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use mariadb_metadata::core::TableKind;
use mariadb_metadata::pattern::TableFilter;
use mariadb_metadata::{CatalogQuery, CatalogRequest, CatalogRow, MetadataError, QueryExecutor, Result, Value};

#[derive(Debug, Clone)]
pub struct MemColumn {
    pub name: String,
    pub column_type: String,
    pub nullable: bool,
    pub extra: String,
}

#[derive(Debug, Clone)]
pub struct MemTable {
    pub catalog: String,
    pub name: String,
    /// Native `TABLE_TYPE` text.
    pub kind: String,
    pub columns: Vec<MemColumn>,
    /// Primary key columns in declaration order.
    pub primary_key: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct MemForeignKey {
    pub name: String,
    pub catalog: String,
    pub table: String,
    pub ref_catalog: String,
    pub ref_table: String,
    /// (referencing column, referenced column) in declaration order.
    pub columns: Vec<(String, String)>,
    pub update_rule: String,
    pub delete_rule: String,
}

#[derive(Default)]
pub struct MemoryCatalog {
    pub current: Option<String>,
    pub extra_catalogs: Vec<String>,
    pub tables: Vec<MemTable>,
    pub foreign_keys: Vec<MemForeignKey>,
    executed: Mutex<Vec<&'static str>>,
}

pub fn col(name: &str, column_type: &str) -> MemColumn {
    MemColumn {
        name: name.to_string(),
        column_type: column_type.to_string(),
        nullable: true,
        extra: String::new(),
    }
}

pub fn table(catalog: &str, name: &str, columns: Vec<MemColumn>, pk: &[&str]) -> MemTable {
    let columns = columns
        .into_iter()
        .map(|mut c| {
            if pk.contains(&c.name.as_str()) {
                c.nullable = false;
            }
            c
        })
        .collect();
    MemTable {
        catalog: catalog.to_string(),
        name: name.to_string(),
        kind: "BASE TABLE".to_string(),
        columns,
        primary_key: pk.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn foreign_key(
    name: &str,
    table: &str,
    ref_table: &str,
    columns: &[(&str, &str)],
    update_rule: &str,
) -> MemForeignKey {
    MemForeignKey {
        name: name.to_string(),
        catalog: "test".to_string(),
        table: table.to_string(),
        ref_catalog: "test".to_string(),
        ref_table: ref_table.to_string(),
        columns: columns
            .iter()
            .map(|(f, p)| (f.to_string(), p.to_string()))
            .collect(),
        update_rule: update_rule.to_string(),
        delete_rule: "RESTRICT".to_string(),
    }
}

impl MemoryCatalog {
    pub fn new(current: Option<&str>) -> Self {
        Self {
            current: current.map(str::to_string),
            extra_catalogs: vec!["information_schema".to_string(), "mysql".to_string()],
            ..Default::default()
        }
    }

    /// Names of the operations that reached the executor.
    pub fn executed(&self) -> Vec<&'static str> {
        self.executed.lock().unwrap().clone()
    }

    fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    fn matching_tables<'a>(&'a self, target: &'a TableFilter) -> impl Iterator<Item = &'a MemTable> + 'a {
        self.tables
            .iter()
            .filter(move |t| target.matches(&t.catalog, &t.name, self.current()))
    }

    fn column_row(t: &MemTable, c: &MemColumn, ordinal: usize) -> CatalogRow {
        CatalogRow::new()
            .with("TABLE_CAT", t.catalog.as_str())
            .with("TABLE_NAME", t.name.as_str())
            .with("COLUMN_NAME", c.name.as_str())
            .with("COLUMN_TYPE", c.column_type.as_str())
            .with("IS_NULLABLE", if c.nullable { "YES" } else { "NO" })
            .with("COLUMN_DEFAULT", Value::Null)
            .with("REMARKS", "")
            .with("ORDINAL_POSITION", ordinal as i64)
            .with("EXTRA", c.extra.as_str())
    }

    fn foreign_key_rows<'a>(
        &'a self,
        keep: impl Fn(&MemForeignKey) -> bool + 'a,
    ) -> Vec<CatalogRow> {
        let mut rows = Vec::new();
        for fk in self.foreign_keys.iter().filter(|fk| keep(fk)) {
            for (i, (fk_col, pk_col)) in fk.columns.iter().enumerate() {
                rows.push(
                    CatalogRow::new()
                        .with("PKTABLE_CAT", fk.ref_catalog.as_str())
                        .with("PKTABLE_NAME", fk.ref_table.as_str())
                        .with("PKCOLUMN_NAME", pk_col.as_str())
                        .with("FKTABLE_CAT", fk.catalog.as_str())
                        .with("FKTABLE_NAME", fk.table.as_str())
                        .with("FKCOLUMN_NAME", fk_col.as_str())
                        .with("ORDINAL_POSITION", (i + 1) as i64)
                        .with("UPDATE_RULE", fk.update_rule.as_str())
                        .with("DELETE_RULE", fk.delete_rule.as_str())
                        .with("FK_NAME", fk.name.as_str())
                        .with("PK_NAME", "PRIMARY"),
                );
            }
        }
        rows
    }

    fn answer(&self, request: &CatalogRequest) -> Vec<CatalogRow> {
        let current = self.current();
        match request {
            CatalogRequest::Catalogs => {
                let mut names: Vec<&str> = self
                    .tables
                    .iter()
                    .map(|t| t.catalog.as_str())
                    .chain(self.extra_catalogs.iter().map(String::as_str))
                    .collect();
                names.sort_unstable();
                names.dedup();
                names
                    .into_iter()
                    .map(|n| CatalogRow::new().with("TABLE_CAT", n))
                    .collect()
            }

            CatalogRequest::Tables { target, kinds } => self
                .matching_tables(target)
                .filter(|t| {
                    kinds
                        .as_ref()
                        .map_or(true, |k| k.contains(&TableKind::from_native(&t.kind)))
                })
                .map(|t| {
                    CatalogRow::new()
                        .with("TABLE_CAT", t.catalog.as_str())
                        .with("TABLE_NAME", t.name.as_str())
                        .with("TABLE_TYPE", t.kind.as_str())
                        .with("REMARKS", "")
                })
                .collect(),

            CatalogRequest::Columns { target, column } => self
                .matching_tables(target)
                .flat_map(|t| {
                    t.columns
                        .iter()
                        .enumerate()
                        .filter(move |(_, c)| column.matches(&c.name))
                        .map(move |(i, c)| Self::column_row(t, c, i + 1))
                })
                .collect(),

            CatalogRequest::BestRowIdentifier { target, .. } => self
                .matching_tables(target)
                .flat_map(|t| {
                    t.columns
                        .iter()
                        .enumerate()
                        .filter(move |(_, c)| t.primary_key.contains(&c.name))
                        .map(move |(i, c)| Self::column_row(t, c, i + 1))
                })
                .collect(),

            CatalogRequest::VersionColumns(target) => self
                .matching_tables(target)
                .flat_map(|t| {
                    t.columns
                        .iter()
                        .enumerate()
                        .filter(|(_, c)| c.extra.to_lowercase().contains("on update"))
                        .map(move |(i, c)| Self::column_row(t, c, i + 1))
                })
                .collect(),

            CatalogRequest::PrimaryKeys(target) => self
                .matching_tables(target)
                .flat_map(|t| {
                    t.primary_key.iter().enumerate().map(move |(i, c)| {
                        CatalogRow::new()
                            .with("TABLE_CAT", t.catalog.as_str())
                            .with("TABLE_NAME", t.name.as_str())
                            .with("COLUMN_NAME", c.as_str())
                            .with("ORDINAL_POSITION", (i + 1) as i64)
                            .with("PK_NAME", "PRIMARY")
                    })
                })
                .collect(),

            CatalogRequest::ImportedKeys(child) => {
                self.foreign_key_rows(move |fk| child.matches(&fk.catalog, &fk.table, current))
            }

            CatalogRequest::ExportedKeys(parent) => self.foreign_key_rows(move |fk| {
                parent.matches(&fk.ref_catalog, &fk.ref_table, current)
            }),

            CatalogRequest::CrossReference { parent, child } => self.foreign_key_rows(move |fk| {
                parent.matches(&fk.ref_catalog, &fk.ref_table, current)
                    && child.matches(&fk.catalog, &fk.table, current)
            }),

            CatalogRequest::IndexInfo { target, .. } => self
                .matching_tables(target)
                .flat_map(|t| {
                    t.primary_key.iter().enumerate().map(move |(i, c)| {
                        CatalogRow::new()
                            .with("TABLE_CAT", t.catalog.as_str())
                            .with("TABLE_NAME", t.name.as_str())
                            .with("NON_UNIQUE", 0i64)
                            .with("INDEX_NAME", "PRIMARY")
                            .with("ORDINAL_POSITION", (i + 1) as i64)
                            .with("COLUMN_NAME", c.as_str())
                            .with("ASC_OR_DESC", "A")
                            .with("CARDINALITY", Value::Null)
                    })
                })
                .collect(),

            _ => Vec::new(),
        }
    }
}

#[async_trait]
impl QueryExecutor for MemoryCatalog {
    async fn fetch_rows(&self, query: &CatalogQuery) -> Result<Vec<CatalogRow>> {
        self.executed.lock().unwrap().push(query.request.name());
        let mut rows = self.answer(&query.request);
        rows.reverse();
        Ok(rows)
    }
}

/// Executor whose every query fails.
pub struct FailingExecutor {
    pub pool_error: bool,
}

#[async_trait]
impl QueryExecutor for FailingExecutor {
    async fn fetch_rows(&self, query: &CatalogQuery) -> Result<Vec<CatalogRow>> {
        if self.pool_error {
            return Err(MetadataError::pool("pool timed out", "acquiring connection"));
        }
        Err(MetadataError::query_failed(
            query.request.name(),
            std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset by peer"),
        ))
    }
}

/// The fixture used by most tests: composite and single-column primary keys
/// in database `test`, two tables referencing `prim_key` with different
/// update rules, and one `information_schema` system view.
pub fn sample_catalog() -> MemoryCatalog {
    let mut catalog = MemoryCatalog::new(Some("test"));

    catalog.tables.push(table(
        "test",
        "pk_test",
        vec![col("id1", "int(11)"), col("id2", "int(11)"), col("val", "varchar(20)")],
        &["id1", "id2"],
    ));
    catalog.tables.push(table(
        "test",
        "prim_key",
        vec![col("id", "int(11)"), col("val", "varchar(20)")],
        &["id"],
    ));
    catalog.tables.push(table(
        "test",
        "fore_key0",
        vec![col("id", "int(11)"), col("id_ref0", "int(11)")],
        &["id"],
    ));
    catalog.tables.push(table(
        "test",
        "fore_key1",
        vec![col("id", "int(11)"), col("id_ref1", "int(11)")],
        &["id"],
    ));
    catalog.foreign_keys.push(foreign_key(
        "fore_key0_ibfk_1",
        "fore_key0",
        "prim_key",
        &[("id_ref0", "id")],
        "RESTRICT",
    ));
    catalog.foreign_keys.push(foreign_key(
        "fore_key1_ibfk_1",
        "fore_key1",
        "prim_key",
        &[("id_ref1", "id")],
        "CASCADE",
    ));

    let mut system_view = table("information_schema", "TABLE_PRIVILEGES", vec![col("GRANTEE", "varchar(190)")], &[]);
    system_view.kind = "SYSTEM VIEW".to_string();
    catalog.tables.push(system_view);

    catalog
}
