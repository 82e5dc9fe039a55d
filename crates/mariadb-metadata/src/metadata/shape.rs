//! Raw catalog rows → result-set rows.

use crate::config::MetadataOptions;
use crate::core::{
    CatalogRow, ColumnInfo, IndexColumn, Privilege, TableInfo, TableKind, Value,
};
use crate::error::Result;
use crate::typemap::{self, ColumnAttributes, NativeType};

/// Largest value a client-info property may hold (a MEDIUMTEXT).
const CLIENT_INFO_MAX_LEN: i64 = 16_777_215;

fn text(row: &CatalogRow, field: &str) -> Option<String> {
    row.get_str(field).map(str::to_string)
}

fn yes(row: &CatalogRow, field: &str) -> bool {
    row.get_str(field)
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("YES"))
}

/// Generated-column markers in a lower-cased `EXTRA` value.
///
/// MySQL 8 tags expression defaults as `default_generated`; those columns
/// are ordinary columns.
fn is_generated(extra: &str) -> bool {
    extra
        .split_whitespace()
        .filter(|token| *token != "default_generated")
        .any(|token| matches!(token, "generated" | "virtual" | "persistent" | "stored"))
}

pub fn catalog(row: &CatalogRow) -> Result<Vec<Value>> {
    Ok(vec![Value::from(row.require_str("TABLE_CAT")?)])
}

pub fn table(row: &CatalogRow) -> Result<TableInfo> {
    Ok(TableInfo {
        catalog: row.require_str("TABLE_CAT")?.to_string(),
        name: row.require_str("TABLE_NAME")?.to_string(),
        kind: TableKind::from_native(row.require_str("TABLE_TYPE")?),
        remarks: text(row, "REMARKS"),
    })
}

pub fn column(row: &CatalogRow, options: &MetadataOptions) -> Result<ColumnInfo> {
    let native = NativeType::parse(row.require_str("COLUMN_TYPE")?);
    let mapping = typemap::map_type(&native, options);
    let attrs = ColumnAttributes {
        char_max_length: row.get_i64("CHARACTER_MAXIMUM_LENGTH")?,
        numeric_precision: row.get_i64("NUMERIC_PRECISION")?,
        numeric_scale: row.get_i64("NUMERIC_SCALE")?,
        datetime_precision: row.get_i64("DATETIME_PRECISION")?,
    };
    let extra = row.get_str("EXTRA").unwrap_or_default().to_ascii_lowercase();

    Ok(ColumnInfo {
        catalog: row.require_str("TABLE_CAT")?.to_string(),
        table: row.require_str("TABLE_NAME")?.to_string(),
        name: row.require_str("COLUMN_NAME")?.to_string(),
        sql_type: mapping.sql_type,
        type_name: mapping.type_name,
        column_size: typemap::column_size(&native, mapping.sql_type, &attrs),
        decimal_digits: typemap::decimal_digits(&native, mapping.sql_type, &attrs),
        num_prec_radix: typemap::num_prec_radix(mapping.sql_type),
        is_nullable: yes(row, "IS_NULLABLE"),
        remarks: text(row, "REMARKS").filter(|r| !r.is_empty()),
        default_value: text(row, "COLUMN_DEFAULT"),
        char_octet_length: row.get_i64("CHARACTER_OCTET_LENGTH")?,
        ordinal_pos: row.require_i64("ORDINAL_POSITION")?,
        is_auto_increment: extra.contains("auto_increment"),
        is_generated: is_generated(&extra),
    })
}

pub fn index_column(row: &CatalogRow) -> Result<IndexColumn> {
    let ordinal = row.require_i64("ORDINAL_POSITION")?;
    Ok(IndexColumn {
        catalog: row.require_str("TABLE_CAT")?.to_string(),
        table: row.require_str("TABLE_NAME")?.to_string(),
        non_unique: row.require_i64("NON_UNIQUE")? != 0,
        index_name: row.require_str("INDEX_NAME")?.to_string(),
        ordinal_pos: i16::try_from(ordinal).unwrap_or(i16::MAX),
        column: text(row, "COLUMN_NAME"),
        collation: text(row, "ASC_OR_DESC"),
        cardinality: row.get_i64("CARDINALITY")?,
    })
}

/// Table privilege, or column privilege when the row has `COLUMN_NAME`.
pub fn privilege(row: &CatalogRow) -> Result<Privilege> {
    Ok(Privilege {
        catalog: row.require_str("TABLE_CAT")?.to_string(),
        table: row.require_str("TABLE_NAME")?.to_string(),
        column: text(row, "COLUMN_NAME"),
        grantor: text(row, "GRANTOR"),
        grantee: row.require_str("GRANTEE")?.to_string(),
        privilege: row.require_str("PRIVILEGE")?.to_string(),
        is_grantable: yes(row, "IS_GRANTABLE"),
    })
}

/// Rows of `getTableTypes`, already in label order.
pub fn table_types() -> Vec<Vec<Value>> {
    let kinds = [TableKind::SystemView, TableKind::Table, TableKind::View];
    let mut labels: Vec<&str> = kinds.iter().map(|k| k.label()).collect();
    labels.sort_unstable();
    labels.into_iter().map(|l| vec![Value::from(l)]).collect()
}

/// Rows of `getClientInfoProperties`.
pub fn client_info_properties() -> Vec<Vec<Value>> {
    [
        ("ApplicationName", "The name of the application currently utilizing the connection"),
        ("ClientHostname", "The hostname of the computer the application using the connection is running on"),
        ("ClientUser", "The name of the user that the application using the connection is performing work for"),
    ]
    .into_iter()
    .map(|(name, description)| {
        vec![
            Value::from(name),
            Value::Int(CLIENT_INFO_MAX_LEN),
            Value::from(""),
            Value::from(description),
        ]
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SqlType;

    fn column_row(column_type: &str) -> CatalogRow {
        CatalogRow::new()
            .with("TABLE_CAT", "test")
            .with("TABLE_NAME", "manycols")
            .with("COLUMN_NAME", "c")
            .with("COLUMN_TYPE", column_type)
            .with("IS_NULLABLE", "YES")
            .with("ORDINAL_POSITION", 1i64)
            .with("EXTRA", "")
    }

    #[test]
    fn test_column_shaping() {
        let row = column_row("int(10) unsigned")
            .with("NUMERIC_PRECISION", 10i64)
            .with("NUMERIC_SCALE", 0i64)
            .with("EXTRA", "auto_increment");
        let col = column(&row, &MetadataOptions::default()).unwrap();
        assert_eq!(col.sql_type, SqlType::Integer);
        assert_eq!(col.type_name, "INT UNSIGNED");
        assert_eq!(col.column_size, Some(10));
        assert_eq!(col.num_prec_radix, Some(10));
        assert!(col.is_nullable);
        assert!(col.is_auto_increment);
        assert!(!col.is_generated);

        let values = col.into_row();
        assert_eq!(values[4], Value::Int(4));
        assert_eq!(values[17], Value::from("YES"));
    }

    #[test]
    fn test_on_update_timestamp_is_not_generated() {
        let row = column_row("timestamp").with("EXTRA", "on update current_timestamp()");
        let col = column(&row, &MetadataOptions::default()).unwrap();
        assert_eq!(col.sql_type, SqlType::Timestamp);
        assert_eq!(col.column_size, Some(19));
        assert!(!col.is_generated);
    }

    #[test]
    fn test_expression_default_is_not_generated() {
        for extra in [
            "DEFAULT_GENERATED",
            "DEFAULT_GENERATED on update CURRENT_TIMESTAMP",
        ] {
            let row = column_row("timestamp").with("EXTRA", extra);
            let col = column(&row, &MetadataOptions::default()).unwrap();
            assert!(!col.is_generated, "{}", extra);
            assert_eq!(col.into_row()[23], Value::from("NO"));
        }
    }

    #[test]
    fn test_generated_column_markers() {
        for extra in [
            "VIRTUAL GENERATED",
            "STORED GENERATED",
            "PERSISTENT GENERATED",
            "VIRTUAL",
            "PERSISTENT",
        ] {
            let row = column_row("int(11)").with("EXTRA", extra);
            let col = column(&row, &MetadataOptions::default()).unwrap();
            assert!(col.is_generated, "{}", extra);
        }
    }

    #[test]
    fn test_table_kind_label() {
        let row = CatalogRow::new()
            .with("TABLE_CAT", "information_schema")
            .with("TABLE_NAME", "TABLE_PRIVILEGES")
            .with("TABLE_TYPE", "SYSTEM VIEW");
        let info = table(&row).unwrap();
        assert_eq!(info.kind, TableKind::SystemView);
        assert_eq!(info.into_row()[3], Value::from("SYSTEM VIEW"));
    }

    #[test]
    fn test_static_rows() {
        let types: Vec<Value> = table_types().into_iter().map(|mut r| r.remove(0)).collect();
        assert_eq!(
            types,
            vec![Value::from("SYSTEM VIEW"), Value::from("TABLE"), Value::from("VIEW")]
        );
        assert_eq!(client_info_properties().len(), 3);
    }
}
