//! Catalog request kinds and the SQL that answers them.
//!
//! Every public metadata operation resolves its arguments into a
//! [`CatalogRequest`]. [`QueryBuilder::build`] turns a request into a
//! [`CatalogQuery`] over `INFORMATION_SCHEMA`, with all caller-supplied
//! values passed as bind parameters. Kinds that have no entries on this
//! server, or that are answered from static data, build an always-empty
//! query that the facade never sends.

use tracing::debug;

use crate::core::{CatalogRow, QueryExecutor, TableKind};
use crate::error::{MetadataError, Result};
use crate::pattern::{NamePattern, TableFilter};

/// `bestRowSession`, the widest scope a primary key identifier is valid for.
pub const BEST_ROW_SESSION: i16 = 2;

/// Which foreign keys to reconstruct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForeignKeyScope {
    /// Keys declared on the target table, pointing elsewhere.
    Imported(TableFilter),
    /// Keys elsewhere that reference the target table.
    Exported(TableFilter),
    /// Keys declared on `child` that reference `parent`.
    Cross {
        parent: TableFilter,
        child: TableFilter,
    },
}

impl ForeignKeyScope {
    pub fn into_request(self) -> CatalogRequest {
        match self {
            ForeignKeyScope::Imported(target) => CatalogRequest::ImportedKeys(target),
            ForeignKeyScope::Exported(target) => CatalogRequest::ExportedKeys(target),
            ForeignKeyScope::Cross { parent, child } => {
                CatalogRequest::CrossReference { parent, child }
            }
        }
    }

    /// The scope a foreign key request asks for, if it is one.
    pub fn from_request(request: &CatalogRequest) -> Option<Self> {
        match request {
            CatalogRequest::ImportedKeys(target) => Some(ForeignKeyScope::Imported(target.clone())),
            CatalogRequest::ExportedKeys(target) => Some(ForeignKeyScope::Exported(target.clone())),
            CatalogRequest::CrossReference { parent, child } => Some(ForeignKeyScope::Cross {
                parent: parent.clone(),
                child: child.clone(),
            }),
            _ => None,
        }
    }
}

/// One metadata question, with its arguments already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRequest {
    Catalogs,
    Schemas,
    TableTypes,
    Tables {
        target: TableFilter,
        /// `None` accepts every kind; an empty list accepts none.
        kinds: Option<Vec<TableKind>>,
    },
    Columns {
        target: TableFilter,
        column: NamePattern,
    },
    PrimaryKeys(TableFilter),
    ImportedKeys(TableFilter),
    ExportedKeys(TableFilter),
    CrossReference {
        parent: TableFilter,
        child: TableFilter,
    },
    IndexInfo {
        target: TableFilter,
        unique_only: bool,
    },
    TablePrivileges(TableFilter),
    ColumnPrivileges {
        target: TableFilter,
        column: NamePattern,
    },
    BestRowIdentifier {
        target: TableFilter,
        scope: i16,
        nullable: bool,
    },
    VersionColumns(TableFilter),
    TypeInfo,
    ClientInfoProperties,
    Udts,
    SuperTypes,
    SuperTables,
    Attributes,
}

impl CatalogRequest {
    /// Name of the public operation answering this request.
    pub fn name(&self) -> &'static str {
        match self {
            CatalogRequest::Catalogs => "getCatalogs",
            CatalogRequest::Schemas => "getSchemas",
            CatalogRequest::TableTypes => "getTableTypes",
            CatalogRequest::Tables { .. } => "getTables",
            CatalogRequest::Columns { .. } => "getColumns",
            CatalogRequest::PrimaryKeys(_) => "getPrimaryKeys",
            CatalogRequest::ImportedKeys(_) => "getImportedKeys",
            CatalogRequest::ExportedKeys(_) => "getExportedKeys",
            CatalogRequest::CrossReference { .. } => "getCrossReference",
            CatalogRequest::IndexInfo { .. } => "getIndexInfo",
            CatalogRequest::TablePrivileges(_) => "getTablePrivileges",
            CatalogRequest::ColumnPrivileges { .. } => "getColumnPrivileges",
            CatalogRequest::BestRowIdentifier { .. } => "getBestRowIdentifier",
            CatalogRequest::VersionColumns(_) => "getVersionColumns",
            CatalogRequest::TypeInfo => "getTypeInfo",
            CatalogRequest::ClientInfoProperties => "getClientInfoProperties",
            CatalogRequest::Udts => "getUDTs",
            CatalogRequest::SuperTypes => "getSuperTypes",
            CatalogRequest::SuperTables => "getSuperTables",
            CatalogRequest::Attributes => "getAttributes",
        }
    }
}

/// SQL text for one request, ready for a [`crate::core::QueryExecutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub request: CatalogRequest,
    pub sql: String,
    /// Bind values, in placeholder order.
    pub params: Vec<String>,
    always_empty: bool,
}

/// Query text used for requests that can never produce rows.
pub const EMPTY_QUERY: &str = "SELECT NULL FROM DUAL WHERE 1 = 0";

impl CatalogQuery {
    pub fn new(request: CatalogRequest, sql: String, params: Vec<String>) -> Self {
        Self {
            request,
            sql,
            params,
            always_empty: false,
        }
    }

    /// A query known to return no rows.
    pub fn empty(request: CatalogRequest) -> Self {
        Self {
            request,
            sql: EMPTY_QUERY.to_string(),
            params: Vec::new(),
            always_empty: true,
        }
    }

    /// True when running the query is pointless.
    pub fn is_always_empty(&self) -> bool {
        self.always_empty
    }
}

const CATALOGS_SQL: &str = "SELECT CAST(SCHEMA_NAME AS CHAR(64)) AS TABLE_CAT \
     FROM INFORMATION_SCHEMA.SCHEMATA";

const TABLES_SQL: &str = "SELECT CAST(TABLE_SCHEMA AS CHAR(64)) AS TABLE_CAT, \
     CAST(TABLE_NAME AS CHAR(64)) AS TABLE_NAME, \
     CAST(TABLE_TYPE AS CHAR(64)) AS TABLE_TYPE, \
     CAST(TABLE_COMMENT AS CHAR(2048)) AS REMARKS \
     FROM INFORMATION_SCHEMA.TABLES";

const COLUMNS_SQL: &str = "SELECT CAST(TABLE_SCHEMA AS CHAR(64)) AS TABLE_CAT, \
     CAST(TABLE_NAME AS CHAR(64)) AS TABLE_NAME, \
     CAST(COLUMN_NAME AS CHAR(64)) AS COLUMN_NAME, \
     CAST(COLUMN_TYPE AS CHAR(255)) AS COLUMN_TYPE, \
     CAST(CHARACTER_MAXIMUM_LENGTH AS SIGNED) AS CHARACTER_MAXIMUM_LENGTH, \
     CAST(CHARACTER_OCTET_LENGTH AS SIGNED) AS CHARACTER_OCTET_LENGTH, \
     CAST(NUMERIC_PRECISION AS SIGNED) AS NUMERIC_PRECISION, \
     CAST(NUMERIC_SCALE AS SIGNED) AS NUMERIC_SCALE, \
     CAST(DATETIME_PRECISION AS SIGNED) AS DATETIME_PRECISION, \
     CAST(IS_NULLABLE AS CHAR(3)) AS IS_NULLABLE, \
     CAST(COLUMN_DEFAULT AS CHAR(1024)) AS COLUMN_DEFAULT, \
     CAST(COLUMN_COMMENT AS CHAR(1024)) AS REMARKS, \
     CAST(ORDINAL_POSITION AS SIGNED) AS ORDINAL_POSITION, \
     CAST(EXTRA AS CHAR(255)) AS EXTRA \
     FROM INFORMATION_SCHEMA.COLUMNS";

const PRIMARY_KEYS_SQL: &str = "SELECT CAST(TABLE_SCHEMA AS CHAR(64)) AS TABLE_CAT, \
     CAST(TABLE_NAME AS CHAR(64)) AS TABLE_NAME, \
     CAST(COLUMN_NAME AS CHAR(64)) AS COLUMN_NAME, \
     CAST(ORDINAL_POSITION AS SIGNED) AS ORDINAL_POSITION, \
     CAST(CONSTRAINT_NAME AS CHAR(64)) AS PK_NAME \
     FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE";

const FOREIGN_KEYS_SQL: &str = "SELECT CAST(kcu.REFERENCED_TABLE_SCHEMA AS CHAR(64)) AS PKTABLE_CAT, \
     CAST(kcu.REFERENCED_TABLE_NAME AS CHAR(64)) AS PKTABLE_NAME, \
     CAST(kcu.REFERENCED_COLUMN_NAME AS CHAR(64)) AS PKCOLUMN_NAME, \
     CAST(kcu.TABLE_SCHEMA AS CHAR(64)) AS FKTABLE_CAT, \
     CAST(kcu.TABLE_NAME AS CHAR(64)) AS FKTABLE_NAME, \
     CAST(kcu.COLUMN_NAME AS CHAR(64)) AS FKCOLUMN_NAME, \
     CAST(kcu.ORDINAL_POSITION AS SIGNED) AS ORDINAL_POSITION, \
     CAST(rc.UPDATE_RULE AS CHAR(64)) AS UPDATE_RULE, \
     CAST(rc.DELETE_RULE AS CHAR(64)) AS DELETE_RULE, \
     CAST(kcu.CONSTRAINT_NAME AS CHAR(64)) AS FK_NAME, \
     CAST(rc.UNIQUE_CONSTRAINT_NAME AS CHAR(64)) AS PK_NAME \
     FROM INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS rc \
     JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE kcu \
     ON kcu.CONSTRAINT_SCHEMA = rc.CONSTRAINT_SCHEMA \
     AND kcu.CONSTRAINT_NAME = rc.CONSTRAINT_NAME \
     AND kcu.TABLE_NAME = rc.TABLE_NAME";

const INDEX_INFO_SQL: &str = "SELECT CAST(TABLE_SCHEMA AS CHAR(64)) AS TABLE_CAT, \
     CAST(TABLE_NAME AS CHAR(64)) AS TABLE_NAME, \
     CAST(NON_UNIQUE AS SIGNED) AS NON_UNIQUE, \
     CAST(INDEX_NAME AS CHAR(64)) AS INDEX_NAME, \
     CAST(SEQ_IN_INDEX AS SIGNED) AS ORDINAL_POSITION, \
     CAST(COLUMN_NAME AS CHAR(64)) AS COLUMN_NAME, \
     CAST(COLLATION AS CHAR(1)) AS ASC_OR_DESC, \
     CAST(CARDINALITY AS SIGNED) AS CARDINALITY \
     FROM INFORMATION_SCHEMA.STATISTICS";

const TABLE_PRIVILEGES_SQL: &str = "SELECT CAST(TABLE_SCHEMA AS CHAR(64)) AS TABLE_CAT, \
     CAST(TABLE_NAME AS CHAR(64)) AS TABLE_NAME, \
     CAST(GRANTEE AS CHAR(192)) AS GRANTEE, \
     CAST(PRIVILEGE_TYPE AS CHAR(64)) AS PRIVILEGE, \
     CAST(IS_GRANTABLE AS CHAR(3)) AS IS_GRANTABLE \
     FROM INFORMATION_SCHEMA.TABLE_PRIVILEGES";

const COLUMN_PRIVILEGES_SQL: &str = "SELECT CAST(TABLE_SCHEMA AS CHAR(64)) AS TABLE_CAT, \
     CAST(TABLE_NAME AS CHAR(64)) AS TABLE_NAME, \
     CAST(COLUMN_NAME AS CHAR(64)) AS COLUMN_NAME, \
     CAST(GRANTEE AS CHAR(192)) AS GRANTEE, \
     CAST(PRIVILEGE_TYPE AS CHAR(64)) AS PRIVILEGE, \
     CAST(IS_GRANTABLE AS CHAR(3)) AS IS_GRANTABLE \
     FROM INFORMATION_SCHEMA.COLUMN_PRIVILEGES";

/// Turns [`CatalogRequest`]s into SQL.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBuilder;

impl QueryBuilder {
    pub fn build(request: &CatalogRequest) -> CatalogQuery {
        let mut params = Vec::new();
        let mut clauses = Vec::new();

        let base = match request {
            CatalogRequest::Schemas
            | CatalogRequest::TableTypes
            | CatalogRequest::TypeInfo
            | CatalogRequest::ClientInfoProperties
            | CatalogRequest::Udts
            | CatalogRequest::SuperTypes
            | CatalogRequest::SuperTables
            | CatalogRequest::Attributes => return CatalogQuery::empty(request.clone()),

            CatalogRequest::Catalogs => CATALOGS_SQL,

            CatalogRequest::Tables { target, kinds } => {
                clauses.extend(target.sql_clauses("TABLE_SCHEMA", "TABLE_NAME", &mut params));
                if let Some(kinds) = kinds {
                    if kinds.is_empty() {
                        return CatalogQuery::empty(request.clone());
                    }
                    let placeholders = vec!["?"; kinds.len()].join(", ");
                    clauses.push(format!("TABLE_TYPE IN ({})", placeholders));
                    params.extend(kinds.iter().map(|k| k.native_name().to_string()));
                }
                TABLES_SQL
            }

            CatalogRequest::Columns { target, column } => {
                clauses.extend(target.sql_clauses("TABLE_SCHEMA", "TABLE_NAME", &mut params));
                clauses.extend(column.sql_clause("COLUMN_NAME", &mut params));
                COLUMNS_SQL
            }

            CatalogRequest::BestRowIdentifier {
                target,
                scope,
                nullable,
            } => {
                if !(0..=BEST_ROW_SESSION).contains(scope) {
                    return CatalogQuery::empty(request.clone());
                }
                clauses.extend(target.sql_clauses("TABLE_SCHEMA", "TABLE_NAME", &mut params));
                clauses.push("COLUMN_KEY = 'PRI'".to_string());
                if !nullable {
                    clauses.push("IS_NULLABLE = 'NO'".to_string());
                }
                COLUMNS_SQL
            }

            CatalogRequest::VersionColumns(target) => {
                clauses.extend(target.sql_clauses("TABLE_SCHEMA", "TABLE_NAME", &mut params));
                clauses.push("EXTRA LIKE '%on update%'".to_string());
                COLUMNS_SQL
            }

            CatalogRequest::PrimaryKeys(target) => {
                clauses.extend(target.sql_clauses("TABLE_SCHEMA", "TABLE_NAME", &mut params));
                clauses.push("CONSTRAINT_NAME = 'PRIMARY'".to_string());
                PRIMARY_KEYS_SQL
            }

            CatalogRequest::ImportedKeys(child) => {
                clauses.extend(child.sql_clauses("kcu.TABLE_SCHEMA", "kcu.TABLE_NAME", &mut params));
                FOREIGN_KEYS_SQL
            }

            CatalogRequest::ExportedKeys(parent) => {
                clauses.extend(parent.sql_clauses(
                    "kcu.REFERENCED_TABLE_SCHEMA",
                    "kcu.REFERENCED_TABLE_NAME",
                    &mut params,
                ));
                FOREIGN_KEYS_SQL
            }

            CatalogRequest::CrossReference { parent, child } => {
                clauses.extend(parent.sql_clauses(
                    "kcu.REFERENCED_TABLE_SCHEMA",
                    "kcu.REFERENCED_TABLE_NAME",
                    &mut params,
                ));
                clauses.extend(child.sql_clauses("kcu.TABLE_SCHEMA", "kcu.TABLE_NAME", &mut params));
                FOREIGN_KEYS_SQL
            }

            CatalogRequest::IndexInfo {
                target,
                unique_only,
            } => {
                clauses.extend(target.sql_clauses("TABLE_SCHEMA", "TABLE_NAME", &mut params));
                if *unique_only {
                    clauses.push("NON_UNIQUE = 0".to_string());
                }
                INDEX_INFO_SQL
            }

            CatalogRequest::TablePrivileges(target) => {
                clauses.extend(target.sql_clauses("TABLE_SCHEMA", "TABLE_NAME", &mut params));
                TABLE_PRIVILEGES_SQL
            }

            CatalogRequest::ColumnPrivileges { target, column } => {
                clauses.extend(target.sql_clauses("TABLE_SCHEMA", "TABLE_NAME", &mut params));
                clauses.extend(column.sql_clause("COLUMN_NAME", &mut params));
                COLUMN_PRIVILEGES_SQL
            }
        };

        let sql = if clauses.is_empty() {
            base.to_string()
        } else {
            format!("{} WHERE {}", base, clauses.join(" AND "))
        };

        CatalogQuery::new(request.clone(), sql, params)
    }
}

/// Build and run one request. Always-empty queries never reach the executor.
pub async fn fetch<E: QueryExecutor + ?Sized>(
    executor: &E,
    request: &CatalogRequest,
) -> Result<Vec<CatalogRow>> {
    let query = QueryBuilder::build(request);
    if query.is_always_empty() {
        debug!("{}: no catalog entries possible, skipping query", request.name());
        return Ok(Vec::new());
    }

    let rows = executor.fetch_rows(&query).await.map_err(|e| match e {
        e @ MetadataError::QueryFailed { .. } => e,
        other => MetadataError::query_failed(request.name(), other),
    })?;
    debug!("{}: loaded {} catalog rows", request.name(), rows.len());
    Ok(rows)
}
