//! Fixed column schemas of every metadata result set.

use crate::core::{ColumnDef, SqlType};
use crate::query::CatalogRequest;

const fn varchar(label: &'static str) -> ColumnDef {
    ColumnDef::new(label, SqlType::Varchar)
}

const fn int(label: &'static str) -> ColumnDef {
    ColumnDef::new(label, SqlType::Integer)
}

const fn short(label: &'static str) -> ColumnDef {
    ColumnDef::new(label, SqlType::SmallInt)
}

const fn bit(label: &'static str) -> ColumnDef {
    ColumnDef::new(label, SqlType::Bit)
}

const fn bigint(label: &'static str) -> ColumnDef {
    ColumnDef::new(label, SqlType::BigInt)
}

const fn null(label: &'static str) -> ColumnDef {
    ColumnDef::new(label, SqlType::Null)
}

pub static CATALOGS: &[ColumnDef] = &[varchar("TABLE_CAT")];

pub static SCHEMAS: &[ColumnDef] = &[varchar("TABLE_SCHEM"), varchar("TABLE_CATALOG")];

pub static TABLE_TYPES: &[ColumnDef] = &[varchar("TABLE_TYPE")];

pub static TABLES: &[ColumnDef] = &[
    varchar("TABLE_CAT"),
    varchar("TABLE_SCHEM"),
    varchar("TABLE_NAME"),
    varchar("TABLE_TYPE"),
    varchar("REMARKS"),
    varchar("TYPE_CAT"),
    varchar("TYPE_SCHEM"),
    varchar("TYPE_NAME"),
    varchar("SELF_REFERENCING_COL_NAME"),
    varchar("REF_GENERATION"),
];

pub static COLUMNS: &[ColumnDef] = &[
    varchar("TABLE_CAT"),
    varchar("TABLE_SCHEM"),
    varchar("TABLE_NAME"),
    varchar("COLUMN_NAME"),
    int("DATA_TYPE"),
    varchar("TYPE_NAME"),
    int("COLUMN_SIZE"),
    int("BUFFER_LENGTH"),
    int("DECIMAL_DIGITS"),
    int("NUM_PREC_RADIX"),
    int("NULLABLE"),
    varchar("REMARKS"),
    varchar("COLUMN_DEF"),
    int("SQL_DATA_TYPE"),
    int("SQL_DATETIME_SUB"),
    int("CHAR_OCTET_LENGTH"),
    int("ORDINAL_POSITION"),
    varchar("IS_NULLABLE"),
    varchar("SCOPE_CATALOG"),
    varchar("SCOPE_SCHEMA"),
    varchar("SCOPE_TABLE"),
    null("SOURCE_DATA_TYPE"),
    varchar("IS_AUTOINCREMENT"),
    varchar("IS_GENERATEDCOLUMN"),
];

pub static PRIMARY_KEYS: &[ColumnDef] = &[
    varchar("TABLE_CAT"),
    varchar("TABLE_SCHEM"),
    varchar("TABLE_NAME"),
    varchar("COLUMN_NAME"),
    short("KEY_SEQ"),
    varchar("PK_NAME"),
];

/// Shared by imported keys, exported keys and cross references.
pub static FOREIGN_KEYS: &[ColumnDef] = &[
    varchar("PKTABLE_CAT"),
    varchar("PKTABLE_SCHEM"),
    varchar("PKTABLE_NAME"),
    varchar("PKCOLUMN_NAME"),
    varchar("FKTABLE_CAT"),
    varchar("FKTABLE_SCHEM"),
    varchar("FKTABLE_NAME"),
    varchar("FKCOLUMN_NAME"),
    short("KEY_SEQ"),
    short("UPDATE_RULE"),
    short("DELETE_RULE"),
    varchar("FK_NAME"),
    varchar("PK_NAME"),
    short("DEFERRABILITY"),
];

pub static INDEX_INFO: &[ColumnDef] = &[
    varchar("TABLE_CAT"),
    varchar("TABLE_SCHEM"),
    varchar("TABLE_NAME"),
    bit("NON_UNIQUE"),
    varchar("INDEX_QUALIFIER"),
    varchar("INDEX_NAME"),
    short("TYPE"),
    short("ORDINAL_POSITION"),
    varchar("COLUMN_NAME"),
    varchar("ASC_OR_DESC"),
    bigint("CARDINALITY"),
    bigint("PAGES"),
    varchar("FILTER_CONDITION"),
];

pub static TABLE_PRIVILEGES: &[ColumnDef] = &[
    varchar("TABLE_CAT"),
    varchar("TABLE_SCHEM"),
    varchar("TABLE_NAME"),
    varchar("GRANTOR"),
    varchar("GRANTEE"),
    varchar("PRIVILEGE"),
    varchar("IS_GRANTABLE"),
];

pub static COLUMN_PRIVILEGES: &[ColumnDef] = &[
    varchar("TABLE_CAT"),
    varchar("TABLE_SCHEM"),
    varchar("TABLE_NAME"),
    varchar("COLUMN_NAME"),
    varchar("GRANTOR"),
    varchar("GRANTEE"),
    varchar("PRIVILEGE"),
    varchar("IS_GRANTABLE"),
];

/// Shared by best row identifier and version columns.
pub static ROW_IDENTIFIER: &[ColumnDef] = &[
    short("SCOPE"),
    varchar("COLUMN_NAME"),
    int("DATA_TYPE"),
    varchar("TYPE_NAME"),
    int("COLUMN_SIZE"),
    int("BUFFER_LENGTH"),
    short("DECIMAL_DIGITS"),
    short("PSEUDO_COLUMN"),
];

pub static TYPE_INFO: &[ColumnDef] = &[
    varchar("TYPE_NAME"),
    int("DATA_TYPE"),
    int("PRECISION"),
    varchar("LITERAL_PREFIX"),
    varchar("LITERAL_SUFFIX"),
    varchar("CREATE_PARAMS"),
    short("NULLABLE"),
    bit("CASE_SENSITIVE"),
    short("SEARCHABLE"),
    bit("UNSIGNED_ATTRIBUTE"),
    bit("FIXED_PREC_SCALE"),
    bit("AUTO_INCREMENT"),
    varchar("LOCAL_TYPE_NAME"),
    short("MINIMUM_SCALE"),
    short("MAXIMUM_SCALE"),
    int("SQL_DATA_TYPE"),
    int("SQL_DATETIME_SUB"),
    int("NUM_PREC_RADIX"),
];

pub static CLIENT_INFO_PROPERTIES: &[ColumnDef] = &[
    varchar("NAME"),
    int("MAX_LEN"),
    varchar("DEFAULT_VALUE"),
    varchar("DESCRIPTION"),
];

pub static UDTS: &[ColumnDef] = &[
    varchar("TYPE_CAT"),
    varchar("TYPE_SCHEM"),
    varchar("TYPE_NAME"),
    varchar("CLASS_NAME"),
    int("DATA_TYPE"),
    varchar("REMARKS"),
    short("BASE_TYPE"),
];

pub static SUPER_TYPES: &[ColumnDef] = &[
    varchar("TYPE_CAT"),
    varchar("TYPE_SCHEM"),
    varchar("TYPE_NAME"),
    varchar("SUPERTYPE_CAT"),
    varchar("SUPERTYPE_SCHEM"),
    varchar("SUPERTYPE_NAME"),
];

pub static SUPER_TABLES: &[ColumnDef] = &[
    varchar("TABLE_CAT"),
    varchar("TABLE_SCHEM"),
    varchar("TABLE_NAME"),
    varchar("SUPERTABLE_NAME"),
];

pub static ATTRIBUTES: &[ColumnDef] = &[
    varchar("TYPE_CAT"),
    varchar("TYPE_SCHEM"),
    varchar("TYPE_NAME"),
    varchar("ATTR_NAME"),
    int("DATA_TYPE"),
    varchar("ATTR_TYPE_NAME"),
    int("ATTR_SIZE"),
    int("DECIMAL_DIGITS"),
    int("NUM_PREC_RADIX"),
    int("NULLABLE"),
    varchar("REMARKS"),
    varchar("ATTR_DEF"),
    int("SQL_DATA_TYPE"),
    int("SQL_DATETIME_SUB"),
    int("CHAR_OCTET_LENGTH"),
    int("ORDINAL_POSITION"),
    varchar("IS_NULLABLE"),
    varchar("SCOPE_CATALOG"),
    varchar("SCOPE_SCHEMA"),
    varchar("SCOPE_TABLE"),
    short("SOURCE_DATA_TYPE"),
];

/// Schema of the result set answering `request`.
pub fn for_request(request: &CatalogRequest) -> &'static [ColumnDef] {
    match request {
        CatalogRequest::Catalogs => CATALOGS,
        CatalogRequest::Schemas => SCHEMAS,
        CatalogRequest::TableTypes => TABLE_TYPES,
        CatalogRequest::Tables { .. } => TABLES,
        CatalogRequest::Columns { .. } => COLUMNS,
        CatalogRequest::PrimaryKeys(_) => PRIMARY_KEYS,
        CatalogRequest::ImportedKeys(_)
        | CatalogRequest::ExportedKeys(_)
        | CatalogRequest::CrossReference { .. } => FOREIGN_KEYS,
        CatalogRequest::IndexInfo { .. } => INDEX_INFO,
        CatalogRequest::TablePrivileges(_) => TABLE_PRIVILEGES,
        CatalogRequest::ColumnPrivileges { .. } => COLUMN_PRIVILEGES,
        CatalogRequest::BestRowIdentifier { .. } | CatalogRequest::VersionColumns(_) => {
            ROW_IDENTIFIER
        }
        CatalogRequest::TypeInfo => TYPE_INFO,
        CatalogRequest::ClientInfoProperties => CLIENT_INFO_PROPERTIES,
        CatalogRequest::Udts => UDTS,
        CatalogRequest::SuperTypes => SUPER_TYPES,
        CatalogRequest::SuperTables => SUPER_TABLES,
        CatalogRequest::Attributes => ATTRIBUTES,
    }
}
