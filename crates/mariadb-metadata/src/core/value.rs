//! Logical type codes and cell values for metadata result sets.
//!
//! [`SqlType`] is the small, portable vocabulary every native column type
//! maps into (the codes are the JDBC `java.sql.Types` constants, which is
//! what tooling on the other side of a metadata cursor expects).
//! [`Value`] is a single cell of a result set.

use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

/// Logical type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Bit,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Double,
    Decimal,
    Char,
    Varchar,
    LongVarchar,
    Date,
    Time,
    Timestamp,
    Binary,
    Varbinary,
    LongVarbinary,
    /// "No mapping" sentinel, also used for columns that are always NULL.
    Null,
}

impl SqlType {
    /// Numeric code as defined by `java.sql.Types`.
    pub fn code(self) -> i32 {
        match self {
            SqlType::Bit => -7,
            SqlType::TinyInt => -6,
            SqlType::SmallInt => 5,
            SqlType::Integer => 4,
            SqlType::BigInt => -5,
            SqlType::Float => 6,
            SqlType::Double => 8,
            SqlType::Decimal => 3,
            SqlType::Char => 1,
            SqlType::Varchar => 12,
            SqlType::LongVarchar => -1,
            SqlType::Date => 91,
            SqlType::Time => 92,
            SqlType::Timestamp => 93,
            SqlType::Binary => -2,
            SqlType::Varbinary => -3,
            SqlType::LongVarbinary => -4,
            SqlType::Null => 0,
        }
    }

    /// Upper-case logical name, e.g. `LONGVARCHAR`.
    pub fn name(self) -> &'static str {
        match self {
            SqlType::Bit => "BIT",
            SqlType::TinyInt => "TINYINT",
            SqlType::SmallInt => "SMALLINT",
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Float => "FLOAT",
            SqlType::Double => "DOUBLE",
            SqlType::Decimal => "DECIMAL",
            SqlType::Char => "CHAR",
            SqlType::Varchar => "VARCHAR",
            SqlType::LongVarchar => "LONGVARCHAR",
            SqlType::Date => "DATE",
            SqlType::Time => "TIME",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::Binary => "BINARY",
            SqlType::Varbinary => "VARBINARY",
            SqlType::LongVarbinary => "LONGVARBINARY",
            SqlType::Null => "NULL",
        }
    }

    /// Whether values of this type are exact or approximate numbers.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            SqlType::TinyInt
                | SqlType::SmallInt
                | SqlType::Integer
                | SqlType::BigInt
                | SqlType::Float
                | SqlType::Double
                | SqlType::Decimal
        )
    }

    /// Whether this is an integer type (short/int style result columns).
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            SqlType::TinyInt | SqlType::SmallInt | SqlType::Integer | SqlType::BigInt
        )
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single result-set cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
}

impl Value {
    /// Build a text cell from an optional string.
    pub fn text_opt(value: Option<impl Into<String>>) -> Self {
        value.map_or(Value::Null, |v| Value::Text(v.into()))
    }

    /// Build an integer cell from an optional number.
    pub fn int_opt(value: Option<i64>) -> Self {
        value.map_or(Value::Null, Value::Int)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(v) => Some(*v != 0),
            _ => None,
        }
    }

    /// Rank used to order cells of different kinds; NULL sorts first.
    fn kind_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => 2,
            Value::Text(_) => 3,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int(v as i64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_codes_match_jdbc() {
        assert_eq!(SqlType::TinyInt.code(), -6);
        assert_eq!(SqlType::Timestamp.code(), 93);
        assert_eq!(SqlType::LongVarchar.code(), -1);
        assert_eq!(SqlType::LongVarbinary.code(), -4);
        assert_eq!(SqlType::Null.code(), 0);
    }

    #[test]
    fn test_null_sorts_first() {
        let mut cells = vec![Value::from("b"), Value::Null, Value::from("a")];
        cells.sort();
        assert_eq!(cells, vec![Value::Null, Value::from("a"), Value::from("b")]);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::from(7i16).as_i64(), Some(7));
        assert_eq!(Value::from("x").as_i64(), None);
        assert_eq!(Value::from(true).as_i64(), Some(1));
        assert!(Value::text_opt(None::<String>).is_null());
        assert_eq!(Value::int_opt(Some(3)), Value::Int(3));
    }

    #[test]
    fn test_value_serializes_as_plain_json() {
        let cells = vec![Value::Null, Value::Int(1), Value::from("id"), Value::Bool(false)];
        assert_eq!(
            serde_json::to_string(&cells).unwrap(),
            r#"[null,1,"id",false]"#
        );
    }
}
