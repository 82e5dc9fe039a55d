//! Native MariaDB/MySQL type → logical type code mapping.
//!
//! The mapping is a lookup in [`NATIVE_TYPES`]; signedness never changes the
//! logical code, only the display name. Types that are not in the table map
//! to [`SqlType::Null`].

use tracing::warn;

use crate::config::MetadataOptions;
use crate::core::{SqlType, Value};

/// One native type known to the mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeTypeDef {
    /// Lower-case base name as it appears in `COLUMN_TYPE`.
    pub name: &'static str,
    pub sql_type: SqlType,
    /// Maximum precision or length, as reported by `getTypeInfo`.
    pub precision: i64,
    /// Parameters accepted in a column definition.
    pub create_params: Option<&'static str>,
}

const fn def(
    name: &'static str,
    sql_type: SqlType,
    precision: i64,
    create_params: Option<&'static str>,
) -> NativeTypeDef {
    NativeTypeDef {
        name,
        sql_type,
        precision,
        create_params,
    }
}

const LONG_MAX: i64 = 2_147_483_647;

/// Every native type the mapper recognizes.
pub static NATIVE_TYPES: &[NativeTypeDef] = &[
    def("tinyint", SqlType::TinyInt, 3, Some("[(M)] [UNSIGNED] [ZEROFILL]")),
    def("smallint", SqlType::SmallInt, 5, Some("[(M)] [UNSIGNED] [ZEROFILL]")),
    def("year", SqlType::SmallInt, 4, Some("[(4)]")),
    def("mediumint", SqlType::Integer, 7, Some("[(M)] [UNSIGNED] [ZEROFILL]")),
    def("int", SqlType::Integer, 10, Some("[(M)] [UNSIGNED] [ZEROFILL]")),
    def("integer", SqlType::Integer, 10, Some("[(M)] [UNSIGNED] [ZEROFILL]")),
    def("bigint", SqlType::BigInt, 19, Some("[(M)] [UNSIGNED] [ZEROFILL]")),
    def("decimal", SqlType::Decimal, 65, Some("[(M[,D])] [UNSIGNED] [ZEROFILL]")),
    def("numeric", SqlType::Decimal, 65, Some("[(M[,D])] [UNSIGNED] [ZEROFILL]")),
    def("dec", SqlType::Decimal, 65, Some("[(M[,D])] [UNSIGNED] [ZEROFILL]")),
    def("fixed", SqlType::Decimal, 65, Some("[(M[,D])] [UNSIGNED] [ZEROFILL]")),
    def("float", SqlType::Float, 12, Some("[(M,D)] [UNSIGNED] [ZEROFILL]")),
    def("double", SqlType::Double, 22, Some("[(M,D)] [UNSIGNED] [ZEROFILL]")),
    def("double precision", SqlType::Double, 22, Some("[(M,D)] [UNSIGNED] [ZEROFILL]")),
    def("real", SqlType::Double, 22, Some("[(M,D)] [UNSIGNED] [ZEROFILL]")),
    def("date", SqlType::Date, 10, None),
    def("time", SqlType::Time, 15, Some("[(fsp)]")),
    def("datetime", SqlType::Timestamp, 26, Some("[(fsp)]")),
    def("timestamp", SqlType::Timestamp, 26, Some("[(fsp)]")),
    def("bit", SqlType::Bit, 64, Some("[(M)]")),
    def("char", SqlType::Char, 255, Some("[(M)]")),
    def("varchar", SqlType::Varchar, 65535, Some("(M)")),
    def("enum", SqlType::Varchar, 65535, Some("('value1','value2',...)")),
    def("set", SqlType::Varchar, 64, Some("('value1','value2',...)")),
    def("binary", SqlType::Binary, 255, Some("(M)")),
    def("varbinary", SqlType::Varbinary, 65535, Some("(M)")),
    def("tinyblob", SqlType::LongVarbinary, 255, None),
    def("blob", SqlType::LongVarbinary, 65535, Some("[(M)]")),
    def("mediumblob", SqlType::LongVarbinary, 16_777_215, None),
    def("longblob", SqlType::LongVarbinary, LONG_MAX, None),
    def("tinytext", SqlType::LongVarchar, 255, None),
    def("text", SqlType::LongVarchar, 65535, Some("[(M)]")),
    def("mediumtext", SqlType::LongVarchar, 16_777_215, None),
    def("longtext", SqlType::LongVarchar, LONG_MAX, None),
    def("json", SqlType::LongVarchar, LONG_MAX, None),
    def("geometry", SqlType::Binary, LONG_MAX, None),
    def("point", SqlType::Binary, LONG_MAX, None),
    def("linestring", SqlType::Binary, LONG_MAX, None),
    def("polygon", SqlType::Binary, LONG_MAX, None),
    def("multipoint", SqlType::Binary, LONG_MAX, None),
    def("multilinestring", SqlType::Binary, LONG_MAX, None),
    def("multipolygon", SqlType::Binary, LONG_MAX, None),
    def("geometrycollection", SqlType::Binary, LONG_MAX, None),
];

/// Look up a base type name (case-insensitive).
pub fn lookup(base: &str) -> Option<&'static NativeTypeDef> {
    NATIVE_TYPES
        .iter()
        .find(|d| d.name.eq_ignore_ascii_case(base))
}

/// Parsed form of a `COLUMN_TYPE` string such as `int(10) unsigned`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NativeType {
    /// Lower-case base name.
    pub base: String,
    pub unsigned: bool,
    pub width: Option<i64>,
    pub scale: Option<i64>,
}

impl NativeType {
    pub fn parse(column_type: &str) -> Self {
        let text = column_type.trim().to_ascii_lowercase();

        let (head, args, modifiers) = match text.find('(') {
            Some(open) => {
                let close = text.rfind(')').filter(|&c| c > open).unwrap_or(text.len());
                let args = &text[open + 1..close];
                let rest = text.get(close + 1..).unwrap_or("");
                (text[..open].trim().to_string(), Some(args.to_string()), rest.to_string())
            }
            None => {
                let mut words: Vec<&str> = text.split_whitespace().collect();
                let mut modifiers = Vec::new();
                while let Some(last) = words.last() {
                    if matches!(*last, "unsigned" | "signed" | "zerofill") {
                        modifiers.push(*last);
                        words.pop();
                    } else {
                        break;
                    }
                }
                (words.join(" "), None, modifiers.join(" "))
            }
        };

        let unsigned = modifiers.split_whitespace().any(|m| m == "unsigned" || m == "zerofill");

        let (width, scale) = match args {
            Some(args) if head != "enum" && head != "set" => {
                let mut parts = args.split(',').map(|p| p.trim().parse::<i64>().ok());
                (parts.next().flatten(), parts.next().flatten())
            }
            _ => (None, None),
        };

        Self {
            base: head,
            unsigned,
            width,
            scale,
        }
    }
}

/// Logical code plus display name for one column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    pub sql_type: SqlType,
    /// Upper-case display name, e.g. `INT UNSIGNED`.
    pub type_name: String,
}

/// Map a parsed native type to its logical code and display name.
pub fn map_type(native: &NativeType, options: &MetadataOptions) -> TypeMapping {
    if options.tiny_int1_is_bit && native.base == "tinyint" && native.width == Some(1) {
        return TypeMapping {
            sql_type: SqlType::Bit,
            type_name: "BIT".to_string(),
        };
    }

    let sql_type = match lookup(&native.base) {
        Some(d) => d.sql_type,
        None => {
            warn!("Unmapped native type '{}', reporting NULL type code", native.base);
            SqlType::Null
        }
    };

    let mut type_name = native.base.to_ascii_uppercase();
    if native.unsigned && sql_type.is_numeric() {
        type_name.push_str(" UNSIGNED");
    }

    TypeMapping {
        sql_type,
        type_name,
    }
}

/// Numeric attributes of a column as reported by `INFORMATION_SCHEMA.COLUMNS`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnAttributes {
    pub char_max_length: Option<i64>,
    pub numeric_precision: Option<i64>,
    pub numeric_scale: Option<i64>,
    pub datetime_precision: Option<i64>,
}

/// `COLUMN_SIZE`: character length, numeric precision or display width.
pub fn column_size(native: &NativeType, mapped: SqlType, attrs: &ColumnAttributes) -> Option<i64> {
    let fraction = |base: i64| {
        let fsp = attrs.datetime_precision.or(native.width).unwrap_or(0);
        if fsp > 0 {
            base + fsp + 1
        } else {
            base
        }
    };

    match mapped {
        SqlType::Char
        | SqlType::Varchar
        | SqlType::LongVarchar
        | SqlType::Binary
        | SqlType::Varbinary
        | SqlType::LongVarbinary => attrs.char_max_length,
        SqlType::Bit if native.base == "tinyint" => Some(1),
        SqlType::Bit => attrs.numeric_precision.or(native.width).or(Some(1)),
        SqlType::SmallInt if native.base == "year" => Some(4),
        SqlType::Date => Some(10),
        SqlType::Time => Some(fraction(8)),
        SqlType::Timestamp => Some(fraction(19)),
        t if t.is_numeric() => attrs.numeric_precision.or(native.width),
        _ => None,
    }
}

/// `DECIMAL_DIGITS`: scale for numerics, fractional seconds for temporals.
pub fn decimal_digits(native: &NativeType, mapped: SqlType, attrs: &ColumnAttributes) -> Option<i64> {
    match mapped {
        SqlType::Decimal | SqlType::Float | SqlType::Double => attrs.numeric_scale.or(native.scale),
        t if t.is_integer() => Some(0),
        SqlType::Time | SqlType::Timestamp => Some(attrs.datetime_precision.unwrap_or(0)),
        _ => None,
    }
}

/// `NUM_PREC_RADIX`: 10 for numeric types.
pub fn num_prec_radix(mapped: SqlType) -> Option<i64> {
    mapped.is_numeric().then_some(10)
}

/// `NULLABLE` value `typeNullable` in `getTypeInfo`.
const TYPE_NULLABLE: i16 = 1;
/// `SEARCHABLE` value `typeSearchable` in `getTypeInfo`.
const TYPE_SEARCHABLE: i16 = 3;

/// One `getTypeInfo` row per entry of [`NATIVE_TYPES`], ordered by data type.
pub fn type_info_rows() -> Vec<Vec<Value>> {
    let mut defs: Vec<&NativeTypeDef> = NATIVE_TYPES.iter().collect();
    defs.sort_by_key(|d| (d.sql_type.code(), d.name));

    defs.into_iter()
        .map(|d| {
            let quoted = matches!(
                d.sql_type,
                SqlType::Char
                    | SqlType::Varchar
                    | SqlType::LongVarchar
                    | SqlType::Date
                    | SqlType::Time
                    | SqlType::Timestamp
                    | SqlType::Binary
                    | SqlType::Varbinary
                    | SqlType::LongVarbinary
            );
            let quote = || Value::text_opt(quoted.then_some("'"));
            let max_scale = match d.sql_type {
                SqlType::Decimal => 30,
                SqlType::Float | SqlType::Double => 30,
                SqlType::Time | SqlType::Timestamp => 6,
                _ => 0,
            };

            vec![
                Value::from(d.name.to_ascii_uppercase()),
                Value::from(d.sql_type.code()),
                Value::Int(d.precision),
                quote(),
                quote(),
                Value::text_opt(d.create_params),
                Value::from(TYPE_NULLABLE),
                Value::Bool(false),
                Value::from(TYPE_SEARCHABLE),
                Value::Bool(false),
                Value::Bool(false),
                Value::Bool(d.sql_type.is_integer()),
                Value::from(d.name),
                Value::from(0i16),
                Value::from(max_scale as i16),
                Value::Int(0),
                Value::Int(0),
                Value::int_opt(num_prec_radix(d.sql_type)),
            ]
        })
        .collect()
}
