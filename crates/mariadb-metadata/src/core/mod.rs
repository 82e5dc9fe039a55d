//! Core types shared by every component.
//!
//! - [`value`]: logical type codes and result-set cells
//! - [`schema`]: catalog entities (tables, columns, keys, privileges, indexes)
//! - [`resultset`]: the fixed-schema forward cursor handed to callers
//! - [`traits`]: the executor collaborator and the facade's capability traits

pub mod resultset;
pub mod schema;
pub mod traits;
pub mod value;

pub use resultset::{ColumnDef, ResultSet};
pub use schema::{
    ColumnInfo, ForeignKeyColumn, IndexColumn, PrimaryKeyColumn, Privilege, ReferentialAction,
    TableInfo, TableKind,
};
pub use traits::{CatalogRow, KeyAssembler, PatternQueryable, QueryExecutor};
pub use value::{SqlType, Value};
