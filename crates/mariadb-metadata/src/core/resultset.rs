//! Tabular cursor returned by every metadata operation.
//!
//! A [`ResultSet`] carries a fixed column schema (labels and logical types)
//! and the materialized rows. The schema is present even when there are no
//! rows, so callers can bind to column labels unconditionally.

use serde_json::{Map, Value as JsonValue};

use crate::error::{MetadataError, Result};

use super::value::{SqlType, Value};

/// Declared column of a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column label, e.g. `TABLE_CAT`.
    pub label: &'static str,
    /// Logical type of the column.
    pub sql_type: SqlType,
}

impl ColumnDef {
    pub const fn new(label: &'static str, sql_type: SqlType) -> Self {
        Self { label, sql_type }
    }
}

/// Forward cursor over materialized metadata rows.
#[derive(Debug, Clone)]
pub struct ResultSet {
    columns: &'static [ColumnDef],
    rows: Vec<Vec<Value>>,
    /// Index of the current row plus one; zero means "before first".
    cursor: usize,
}

impl ResultSet {
    /// Create a result set. Fails unless every row has one cell per column.
    pub fn new(columns: &'static [ColumnDef], rows: Vec<Vec<Value>>) -> Result<Self> {
        if let Some(row) = rows.iter().find(|r| r.len() != columns.len()) {
            return Err(MetadataError::RowWidth {
                expected: columns.len(),
                found: row.len(),
            });
        }
        Ok(Self {
            columns,
            rows,
            cursor: 0,
        })
    }

    /// Result set with the given schema and no rows.
    pub fn empty(columns: &'static [ColumnDef]) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            cursor: 0,
        }
    }

    pub fn columns(&self) -> &'static [ColumnDef] {
        self.columns
    }

    /// Column labels in declaration order.
    pub fn labels(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.label).collect()
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<Value>> {
        self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 0-based index of a column label (case-insensitive).
    pub fn find_column(&self, label: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.label.eq_ignore_ascii_case(label))
            .ok_or_else(|| MetadataError::UnknownColumn(label.to_string()))
    }

    /// Advance to the next row. Returns false once the rows are exhausted.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        if self.cursor < self.rows.len() {
            self.cursor += 1;
            true
        } else {
            self.cursor = self.rows.len() + 1;
            false
        }
    }

    /// Reset the cursor to before the first row.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    fn current(&self) -> Result<&[Value]> {
        if self.cursor == 0 || self.cursor > self.rows.len() {
            return Err(MetadataError::NoCurrentRow);
        }
        Ok(&self.rows[self.cursor - 1])
    }

    /// Cell of the current row by label.
    pub fn get(&self, label: &str) -> Result<&Value> {
        let idx = self.find_column(label)?;
        Ok(&self.current()?[idx])
    }

    /// String cell of the current row; `None` for SQL NULL.
    pub fn get_string(&self, label: &str) -> Result<Option<String>> {
        match self.get(label)? {
            Value::Null => Ok(None),
            Value::Text(s) => Ok(Some(s.clone())),
            other => Ok(Some(other.to_string())),
        }
    }

    /// Integer cell of the current row; `None` for SQL NULL.
    pub fn get_i32(&self, label: &str) -> Result<Option<i32>> {
        self.get_int(label, "int")?
            .map(|v| {
                i32::try_from(v).map_err(|_| MetadataError::TypeMismatch {
                    column: label.to_string(),
                    expected: "int",
                })
            })
            .transpose()
    }

    /// Short cell of the current row; `None` for SQL NULL.
    pub fn get_i16(&self, label: &str) -> Result<Option<i16>> {
        self.get_int(label, "short")?
            .map(|v| {
                i16::try_from(v).map_err(|_| MetadataError::TypeMismatch {
                    column: label.to_string(),
                    expected: "short",
                })
            })
            .transpose()
    }

    /// Boolean cell of the current row; `None` for SQL NULL.
    pub fn get_bool(&self, label: &str) -> Result<Option<bool>> {
        let value = self.get(label)?;
        if value.is_null() {
            return Ok(None);
        }
        value
            .as_bool()
            .map(Some)
            .ok_or_else(|| MetadataError::TypeMismatch {
                column: label.to_string(),
                expected: "boolean",
            })
    }

    fn get_int(&self, label: &str, expected: &'static str) -> Result<Option<i64>> {
        let value = self.get(label)?;
        match value {
            Value::Null => Ok(None),
            Value::Text(s) => s.trim().parse::<i64>().map(Some).map_err(|_| {
                MetadataError::TypeMismatch {
                    column: label.to_string(),
                    expected,
                }
            }),
            other => other
                .as_i64()
                .map(Some)
                .ok_or_else(|| MetadataError::TypeMismatch {
                    column: label.to_string(),
                    expected,
                }),
        }
    }

    /// Sort rows by the given labels, then reset the cursor.
    ///
    /// Unknown labels are ignored. The sort is stable, so rows that compare
    /// equal on every key keep their relative order.
    pub fn sort_by_labels(&mut self, labels: &[&str]) {
        let keys: Vec<usize> = labels
            .iter()
            .filter_map(|l| self.find_column(l).ok())
            .collect();
        if keys.is_empty() {
            return;
        }
        self.rows.sort_by(|a, b| {
            keys.iter()
                .map(|&k| a[k].cmp(&b[k]))
                .find(|o| o.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        self.cursor = 0;
    }

    /// Rows as JSON objects keyed by column label.
    pub fn to_json(&self) -> JsonValue {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut obj = Map::with_capacity(self.columns.len());
                for (col, cell) in self.columns.iter().zip(row) {
                    obj.insert(
                        col.label.to_string(),
                        serde_json::to_value(cell).unwrap_or(JsonValue::Null),
                    );
                }
                JsonValue::Object(obj)
            })
            .collect();
        JsonValue::Array(rows)
    }
}
