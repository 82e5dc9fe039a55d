//! Catalog entity types: tables, columns, keys, privileges and indexes.
//!
//! Every type here is a read projection of live server state. Values are
//! built from raw catalog rows for a single request and turned into
//! result-set rows with `into_row`; nothing is retained between calls.

use serde::{Deserialize, Serialize};

use crate::error::{MetadataError, Result};

use super::value::{SqlType, Value};

/// `DEFERRABILITY` value for constraints that cannot be deferred.
pub const NOT_DEFERRABLE: i16 = 7;

/// `NULLABLE` value for columns declared NOT NULL.
pub const COLUMN_NO_NULLS: i64 = 0;

/// `NULLABLE` value for columns that accept NULL.
pub const COLUMN_NULLABLE: i64 = 1;

/// `PSEUDO_COLUMN` value for real columns.
pub const NOT_PSEUDO: i16 = 1;

/// `TYPE` value reported for every index.
pub const INDEX_OTHER: i16 = 3;

/// Kind of a table-like object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    /// Ordinary table (`BASE TABLE` in the catalog).
    Table,
    /// User view.
    View,
    /// Server-provided view such as the INFORMATION_SCHEMA tables.
    SystemView,
    /// Any other label the server reports (SEQUENCE, TEMPORARY, ...).
    Other(String),
}

impl TableKind {
    /// Interpret the `TABLE_TYPE` text stored in `INFORMATION_SCHEMA.TABLES`.
    pub fn from_native(native: &str) -> Self {
        match native.trim().to_ascii_uppercase().as_str() {
            "BASE TABLE" => TableKind::Table,
            "VIEW" => TableKind::View,
            "SYSTEM VIEW" => TableKind::SystemView,
            other => TableKind::Other(other.to_string()),
        }
    }

    /// Interpret a caller-supplied kind label (`TABLE`, `VIEW`, ...).
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "TABLE" | "BASE TABLE" => TableKind::Table,
            "VIEW" => TableKind::View,
            "SYSTEM VIEW" => TableKind::SystemView,
            other => TableKind::Other(other.to_string()),
        }
    }

    /// Label exposed in the `TABLE_TYPE` result column.
    pub fn label(&self) -> &str {
        match self {
            TableKind::Table => "TABLE",
            TableKind::View => "VIEW",
            TableKind::SystemView => "SYSTEM VIEW",
            TableKind::Other(s) => s,
        }
    }

    /// Text the catalog stores for this kind.
    pub fn native_name(&self) -> &str {
        match self {
            TableKind::Table => "BASE TABLE",
            TableKind::View => "VIEW",
            TableKind::SystemView => "SYSTEM VIEW",
            TableKind::Other(s) => s,
        }
    }
}

/// Referential action of a foreign key on update or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferentialAction {
    Cascade,
    Restrict,
    SetNull,
    NoAction,
    SetDefault,
}

impl ReferentialAction {
    /// Parse the rule text of `REFERENTIAL_CONSTRAINTS.UPDATE_RULE/DELETE_RULE`.
    ///
    /// Unknown text is an error: guessing a rule would misreport the
    /// referential semantics of the constraint.
    pub fn parse(rule: &str, constraint: &str) -> Result<Self> {
        let normalized = rule
            .split(|c: char| c.is_whitespace() || c == '_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();

        match normalized.as_str() {
            "CASCADE" => Ok(ReferentialAction::Cascade),
            "RESTRICT" => Ok(ReferentialAction::Restrict),
            "SET NULL" => Ok(ReferentialAction::SetNull),
            "NO ACTION" => Ok(ReferentialAction::NoAction),
            "SET DEFAULT" => Ok(ReferentialAction::SetDefault),
            _ => Err(MetadataError::UnrecognizedRule {
                constraint: constraint.to_string(),
                rule: rule.to_string(),
            }),
        }
    }

    /// Numeric code reported in `UPDATE_RULE` / `DELETE_RULE`.
    pub fn code(self) -> i16 {
        match self {
            ReferentialAction::Cascade => 0,
            ReferentialAction::Restrict => 1,
            ReferentialAction::SetNull => 2,
            ReferentialAction::NoAction => 3,
            ReferentialAction::SetDefault => 4,
        }
    }
}

/// Table row of a `getTables` answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableInfo {
    pub catalog: String,
    pub name: String,
    pub kind: TableKind,
    pub remarks: Option<String>,
}

impl TableInfo {
    pub fn into_row(self) -> Vec<Value> {
        vec![
            Value::Text(self.catalog),
            Value::Null,
            Value::Text(self.name),
            Value::Text(self.kind.label().to_string()),
            Value::text_opt(self.remarks),
            Value::Null,
            Value::Null,
            Value::Null,
            Value::Null,
            Value::Null,
        ]
    }
}

/// Column metadata with its logical type resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub catalog: String,
    pub table: String,
    pub name: String,
    pub sql_type: SqlType,
    /// Display name, e.g. `INT UNSIGNED`.
    pub type_name: String,
    pub column_size: Option<i64>,
    pub decimal_digits: Option<i64>,
    pub num_prec_radix: Option<i64>,
    pub is_nullable: bool,
    pub remarks: Option<String>,
    pub default_value: Option<String>,
    pub char_octet_length: Option<i64>,
    /// Ordinal position (1-based).
    pub ordinal_pos: i64,
    pub is_auto_increment: bool,
    pub is_generated: bool,
}

/// Buffer length reported for every column; the server does not expose one.
const BUFFER_LENGTH: i64 = 65535;

fn yes_no(flag: bool) -> Value {
    Value::from(if flag { "YES" } else { "NO" })
}

impl ColumnInfo {
    /// Row in the `getColumns` schema.
    pub fn into_row(self) -> Vec<Value> {
        vec![
            Value::Text(self.catalog),
            Value::Null,
            Value::Text(self.table),
            Value::Text(self.name),
            Value::from(self.sql_type.code()),
            Value::Text(self.type_name),
            Value::int_opt(self.column_size),
            Value::Int(BUFFER_LENGTH),
            Value::int_opt(self.decimal_digits),
            Value::int_opt(self.num_prec_radix),
            Value::Int(if self.is_nullable {
                COLUMN_NULLABLE
            } else {
                COLUMN_NO_NULLS
            }),
            Value::text_opt(self.remarks),
            Value::text_opt(self.default_value),
            Value::Null,
            Value::Null,
            Value::int_opt(self.char_octet_length),
            Value::Int(self.ordinal_pos),
            yes_no(self.is_nullable),
            Value::Null,
            Value::Null,
            Value::Null,
            Value::Null,
            yes_no(self.is_auto_increment),
            yes_no(self.is_generated),
        ]
    }

    /// Row in the `getBestRowIdentifier` / `getVersionColumns` schema.
    pub fn into_identifier_row(self, scope: Option<i16>) -> Vec<Value> {
        vec![
            scope.map_or(Value::Null, Value::from),
            Value::Text(self.name),
            Value::from(self.sql_type.code()),
            Value::Text(self.type_name),
            Value::int_opt(self.column_size),
            Value::Int(BUFFER_LENGTH),
            Value::int_opt(self.decimal_digits),
            Value::from(NOT_PSEUDO),
        ]
    }
}

/// One column of a primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKeyColumn {
    pub catalog: String,
    pub table: String,
    pub column: String,
    /// 1-based position in the key, in declaration order.
    pub key_seq: i16,
    pub pk_name: Option<String>,
}

impl PrimaryKeyColumn {
    pub fn into_row(self) -> Vec<Value> {
        vec![
            Value::Text(self.catalog),
            Value::Null,
            Value::Text(self.table),
            Value::Text(self.column),
            Value::from(self.key_seq),
            Value::text_opt(self.pk_name),
        ]
    }
}

/// One referenced/referencing column pair of a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyColumn {
    pub pk_catalog: String,
    pub pk_table: String,
    pub pk_column: String,
    pub fk_catalog: String,
    pub fk_table: String,
    pub fk_column: String,
    /// 1-based position in the constraint.
    pub key_seq: i16,
    pub update_rule: ReferentialAction,
    pub delete_rule: ReferentialAction,
    pub fk_name: Option<String>,
    pub pk_name: Option<String>,
}

impl ForeignKeyColumn {
    pub fn into_row(self) -> Vec<Value> {
        vec![
            Value::Text(self.pk_catalog),
            Value::Null,
            Value::Text(self.pk_table),
            Value::Text(self.pk_column),
            Value::Text(self.fk_catalog),
            Value::Null,
            Value::Text(self.fk_table),
            Value::Text(self.fk_column),
            Value::from(self.key_seq),
            Value::from(self.update_rule.code()),
            Value::from(self.delete_rule.code()),
            Value::text_opt(self.fk_name),
            Value::text_opt(self.pk_name),
            Value::from(NOT_DEFERRABLE),
        ]
    }
}

/// A privilege granted on a table, or on one column when `column` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Privilege {
    pub catalog: String,
    pub table: String,
    pub column: Option<String>,
    pub grantor: Option<String>,
    pub grantee: String,
    pub privilege: String,
    pub is_grantable: bool,
}

impl Privilege {
    pub fn into_row(self) -> Vec<Value> {
        let mut row = vec![Value::Text(self.catalog), Value::Null, Value::Text(self.table)];
        if let Some(column) = self.column {
            row.push(Value::Text(column));
        }
        row.extend([
            Value::text_opt(self.grantor),
            Value::Text(self.grantee),
            Value::Text(self.privilege),
            yes_no(self.is_grantable),
        ]);
        row
    }
}

/// One column of an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexColumn {
    pub catalog: String,
    pub table: String,
    pub non_unique: bool,
    pub index_name: String,
    /// 1-based position within the index.
    pub ordinal_pos: i16,
    pub column: Option<String>,
    /// `A`, `D` or `None` when the index is unsorted.
    pub collation: Option<String>,
    pub cardinality: Option<i64>,
}

impl IndexColumn {
    pub fn into_row(self) -> Vec<Value> {
        vec![
            Value::Text(self.catalog),
            Value::Null,
            Value::Text(self.table),
            Value::Bool(self.non_unique),
            Value::Null,
            Value::Text(self.index_name),
            Value::from(INDEX_OTHER),
            Value::from(self.ordinal_pos),
            Value::text_opt(self.column),
            Value::text_opt(self.collation),
            Value::int_opt(self.cardinality),
            Value::Int(0),
            Value::Null,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_kind_round_trip_labels() {
        assert_eq!(TableKind::from_native("BASE TABLE"), TableKind::Table);
        assert_eq!(TableKind::from_native("SYSTEM VIEW"), TableKind::SystemView);
        assert_eq!(TableKind::from_label("table"), TableKind::Table);
        assert_eq!(TableKind::Table.label(), "TABLE");
        assert_eq!(TableKind::Table.native_name(), "BASE TABLE");
        assert_eq!(
            TableKind::from_native("SEQUENCE"),
            TableKind::Other("SEQUENCE".into())
        );
    }

    #[test]
    fn test_referential_action_codes() {
        let parse = |rule: &str| ReferentialAction::parse(rule, "fk").unwrap().code();
        assert_eq!(parse("CASCADE"), 0);
        assert_eq!(parse("RESTRICT"), 1);
        assert_eq!(parse("SET NULL"), 2);
        assert_eq!(parse("NO ACTION"), 3);
        assert_eq!(parse("SET DEFAULT"), 4);
        assert_eq!(parse(" set  null "), 2);
        assert_eq!(parse("no_action"), 3);
    }

    #[test]
    fn test_referential_action_rejects_unknown_text() {
        let err = ReferentialAction::parse("CASCADE DELETE", "fk_child").unwrap_err();
        assert!(matches!(
            err,
            MetadataError::UnrecognizedRule { ref constraint, ref rule }
                if constraint == "fk_child" && rule == "CASCADE DELETE"
        ));
        assert!(ReferentialAction::parse("", "fk_child").is_err());
    }

    #[test]
    fn test_privilege_row_shape() {
        let table_level = Privilege {
            catalog: "test".into(),
            table: "t1".into(),
            column: None,
            grantor: None,
            grantee: "'app'@'%'".into(),
            privilege: "SELECT".into(),
            is_grantable: false,
        };
        assert_eq!(table_level.clone().into_row().len(), 7);

        let column_level = Privilege {
            column: Some("id".into()),
            ..table_level
        };
        let row = column_level.into_row();
        assert_eq!(row.len(), 8);
        assert_eq!(row[3], Value::from("id"));
        assert_eq!(row[7], Value::from("NO"));
    }
}
