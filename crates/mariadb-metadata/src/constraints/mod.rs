//! Primary and foreign key reconstruction.
//!
//! The catalog reports one row per key column with its declared ordinal
//! position. Rows are grouped by constraint, each group is sorted by
//! ordinal and `key_seq` is re-ranked 1..N, so a composite key always
//! comes back in declaration order no matter how the server returns rows.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{
    CatalogRow, ForeignKeyColumn, KeyAssembler, PrimaryKeyColumn, QueryExecutor,
    ReferentialAction,
};
use crate::error::Result;
use crate::pattern::TableFilter;
use crate::query::{self, CatalogRequest, ForeignKeyScope};

/// How foreign key groups are ordered in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrder {
    /// By referenced catalog and table (imported keys).
    ByReferenced,
    /// By referencing catalog and table (exported keys, cross references).
    ByReferencing,
}

impl From<&ForeignKeyScope> for KeyOrder {
    fn from(scope: &ForeignKeyScope) -> Self {
        match scope {
            ForeignKeyScope::Imported(_) => KeyOrder::ByReferenced,
            ForeignKeyScope::Exported(_) | ForeignKeyScope::Cross { .. } => {
                KeyOrder::ByReferencing
            }
        }
    }
}

fn rank(index: usize) -> i16 {
    i16::try_from(index + 1).unwrap_or(i16::MAX)
}

/// Assemble primary key columns from `KEY_COLUMN_USAGE` rows.
pub fn assemble_primary_key(rows: &[CatalogRow]) -> Result<Vec<PrimaryKeyColumn>> {
    let mut groups: BTreeMap<(String, String), Vec<(i64, &CatalogRow)>> = BTreeMap::new();
    for row in rows {
        let key = (
            row.require_str("TABLE_CAT")?.to_string(),
            row.require_str("TABLE_NAME")?.to_string(),
        );
        let ordinal = row.require_i64("ORDINAL_POSITION")?;
        groups.entry(key).or_default().push((ordinal, row));
    }

    let mut out = Vec::with_capacity(rows.len());
    for ((catalog, table), mut members) in groups {
        members.sort_by_key(|(ordinal, _)| *ordinal);
        for (i, (_, row)) in members.into_iter().enumerate() {
            out.push(PrimaryKeyColumn {
                catalog: catalog.clone(),
                table: table.clone(),
                column: row.require_str("COLUMN_NAME")?.to_string(),
                key_seq: rank(i),
                pk_name: row.get_str("PK_NAME").map(str::to_string),
            });
        }
    }
    Ok(out)
}

/// Assemble foreign key column pairs from `REFERENTIAL_CONSTRAINTS` ⨝
/// `KEY_COLUMN_USAGE` rows.
pub fn assemble_foreign_keys(order: KeyOrder, rows: &[CatalogRow]) -> Result<Vec<ForeignKeyColumn>> {
    // (ordering key, constraint identity) -> members
    type GroupKey = ((String, String, String), (String, String, String));
    let mut groups: BTreeMap<GroupKey, Vec<(i64, &CatalogRow)>> = BTreeMap::new();

    for row in rows {
        let fk_catalog = row.require_str("FKTABLE_CAT")?.to_string();
        let fk_table = row.require_str("FKTABLE_NAME")?.to_string();
        let fk_name = row.get_str("FK_NAME").unwrap_or_default().to_string();

        let ordering = match order {
            KeyOrder::ByReferenced => (
                row.require_str("PKTABLE_CAT")?.to_string(),
                row.require_str("PKTABLE_NAME")?.to_string(),
                fk_name.clone(),
            ),
            KeyOrder::ByReferencing => (fk_catalog.clone(), fk_table.clone(), fk_name.clone()),
        };
        let identity = (fk_catalog, fk_table, fk_name);
        let ordinal = row.require_i64("ORDINAL_POSITION")?;
        groups
            .entry((ordering, identity))
            .or_default()
            .push((ordinal, row));
    }

    let mut out = Vec::with_capacity(rows.len());
    for ((_, (fk_catalog, fk_table, _)), mut members) in groups {
        members.sort_by_key(|(ordinal, _)| *ordinal);
        for (i, (_, row)) in members.into_iter().enumerate() {
            let fk_name = row.get_str("FK_NAME").map(str::to_string);
            let constraint = fk_name.as_deref().unwrap_or(&fk_table);
            out.push(ForeignKeyColumn {
                pk_catalog: row.require_str("PKTABLE_CAT")?.to_string(),
                pk_table: row.require_str("PKTABLE_NAME")?.to_string(),
                pk_column: row.require_str("PKCOLUMN_NAME")?.to_string(),
                fk_catalog: fk_catalog.clone(),
                fk_table: fk_table.clone(),
                fk_column: row.require_str("FKCOLUMN_NAME")?.to_string(),
                key_seq: rank(i),
                update_rule: ReferentialAction::parse(row.require_str("UPDATE_RULE")?, constraint)?,
                delete_rule: ReferentialAction::parse(row.require_str("DELETE_RULE")?, constraint)?,
                pk_name: row.get_str("PK_NAME").map(str::to_string),
                fk_name,
            });
        }
    }
    Ok(out)
}

/// [`KeyAssembler`] backed by a live executor.
pub struct ConstraintAssembler<E: ?Sized> {
    executor: Arc<E>,
}

impl<E: QueryExecutor + ?Sized> ConstraintAssembler<E> {
    pub fn new(executor: Arc<E>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl<E: QueryExecutor + ?Sized> KeyAssembler for ConstraintAssembler<E> {
    async fn primary_key(&self, target: &TableFilter) -> Result<Vec<PrimaryKeyColumn>> {
        let request = CatalogRequest::PrimaryKeys(target.clone());
        let rows = query::fetch(self.executor.as_ref(), &request).await?;
        assemble_primary_key(&rows)
    }

    async fn foreign_keys(&self, scope: &ForeignKeyScope) -> Result<Vec<ForeignKeyColumn>> {
        let order = KeyOrder::from(scope);
        let request = scope.clone().into_request();
        let rows = query::fetch(self.executor.as_ref(), &request).await?;
        assemble_foreign_keys(order, &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;
    use crate::error::MetadataError;

    fn pk_row(table: &str, column: &str, ordinal: i64) -> CatalogRow {
        CatalogRow::new()
            .with("TABLE_CAT", "test")
            .with("TABLE_NAME", table)
            .with("COLUMN_NAME", column)
            .with("ORDINAL_POSITION", ordinal)
            .with("PK_NAME", "PRIMARY")
    }

    fn fk_row(fk_table: &str, fk_column: &str, name: &str, ordinal: i64) -> CatalogRow {
        CatalogRow::new()
            .with("PKTABLE_CAT", "test")
            .with("PKTABLE_NAME", "prim_key")
            .with("PKCOLUMN_NAME", format!("id{}", ordinal))
            .with("FKTABLE_CAT", "test")
            .with("FKTABLE_NAME", fk_table)
            .with("FKCOLUMN_NAME", fk_column)
            .with("ORDINAL_POSITION", ordinal)
            .with("UPDATE_RULE", "CASCADE")
            .with("DELETE_RULE", "RESTRICT")
            .with("FK_NAME", name)
            .with("PK_NAME", "PRIMARY")
    }

    #[test]
    fn test_primary_key_ranked_by_ordinal_not_name() {
        // Declared as PRIMARY KEY (zeta, alpha); rows arrive reversed.
        let rows = vec![pk_row("t", "alpha", 2), pk_row("t", "zeta", 1)];
        let pk = assemble_primary_key(&rows).unwrap();
        let cols: Vec<(&str, i16)> = pk.iter().map(|c| (c.column.as_str(), c.key_seq)).collect();
        assert_eq!(cols, vec![("zeta", 1), ("alpha", 2)]);
    }

    #[test]
    fn test_primary_key_groups_per_table() {
        let rows = vec![
            pk_row("b", "id", 1),
            pk_row("a", "id2", 2),
            pk_row("a", "id1", 1),
        ];
        let pk = assemble_primary_key(&rows).unwrap();
        let cols: Vec<(&str, &str, i16)> = pk
            .iter()
            .map(|c| (c.table.as_str(), c.column.as_str(), c.key_seq))
            .collect();
        assert_eq!(cols, vec![("a", "id1", 1), ("a", "id2", 2), ("b", "id", 1)]);
    }

    #[test]
    fn test_foreign_key_reranks_key_seq() {
        // Ordinals 3 and 7 from a sparse KEY_COLUMN_USAGE still rank 1, 2.
        let rows = vec![
            fk_row("child", "ref_b", "fk_child", 7),
            fk_row("child", "ref_a", "fk_child", 3),
        ];
        let fks = assemble_foreign_keys(KeyOrder::ByReferencing, &rows).unwrap();
        assert_eq!(fks.len(), 2);
        assert_eq!((fks[0].fk_column.as_str(), fks[0].key_seq), ("ref_a", 1));
        assert_eq!((fks[1].fk_column.as_str(), fks[1].key_seq), ("ref_b", 2));
        assert_eq!(fks[0].update_rule, ReferentialAction::Cascade);
        assert_eq!(fks[0].delete_rule, ReferentialAction::Restrict);
    }

    #[test]
    fn test_exported_groups_ordered_by_referencing_table() {
        let rows = vec![
            fk_row("fore_key1", "id_ref1", "fore_key1_ibfk_1", 1),
            fk_row("fore_key0", "id_ref0", "fore_key0_ibfk_1", 1),
        ];
        let fks = assemble_foreign_keys(KeyOrder::ByReferencing, &rows).unwrap();
        let tables: Vec<&str> = fks.iter().map(|f| f.fk_table.as_str()).collect();
        assert_eq!(tables, vec!["fore_key0", "fore_key1"]);
    }

    #[test]
    fn test_unknown_rule_is_fatal() {
        let row = fk_row("child", "ref", "fk_child", 1).with("DELETE_RULE", "EXPLODE");
        let err = assemble_foreign_keys(KeyOrder::ByReferenced, &[row]).unwrap_err();
        assert!(matches!(
            err,
            MetadataError::UnrecognizedRule { ref constraint, ref rule }
                if constraint == "fk_child" && rule == "EXPLODE"
        ));
    }

    #[test]
    fn test_missing_ordinal_is_reported() {
        let row = pk_row("t", "id", 1).with("ORDINAL_POSITION", Value::Null);
        assert!(matches!(
            assemble_primary_key(&[row]),
            Err(MetadataError::MissingField(ref f)) if f == "ORDINAL_POSITION"
        ));
    }
}
