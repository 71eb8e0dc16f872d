//! Schema Diff Engine
//!
//! The comparison engine that detects structural changes between two
//! schema snapshots. Every status is a pure function of presence,
//! absence, and equality on each side: an entity only in the source is
//! `removed`, only in the target is `added`, in both and equal is
//! `unchanged`, otherwise `modified`. Statuses always read source → target.

use crate::schema::{ColumnInfo, ForeignKeyInfo, IndexInfo, SchemaSnapshot, TableInfo, TriggerInfo};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Status of one schema object, relative to source → target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffStatus {
    Added,
    Removed,
    Modified,
    Unchanged,
}

impl DiffStatus {
    /// The status this change has when source and target swap roles
    pub fn inverted(self) -> Self {
        match self {
            Self::Added => Self::Removed,
            Self::Removed => Self::Added,
            other => other,
        }
    }
}

/// Diff record for a single column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDiff {
    pub name: String,
    pub status: DiffStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<ColumnInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<ColumnInfo>,
}

/// Diff record for a single index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDiff {
    pub name: String,
    pub status: DiffStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<IndexInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<IndexInfo>,
}

/// Diff record for a single foreign key, keyed by its synthetic identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyDiff {
    /// `table.column->refTable.refColumn`
    pub key: String,
    pub status: DiffStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<ForeignKeyInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<ForeignKeyInfo>,
}

/// Diff record for a single trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerDiff {
    pub name: String,
    pub status: DiffStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<TriggerInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<TriggerInfo>,
}

impl ColumnDiff {
    pub fn inverted(&self) -> Self {
        Self {
            name: self.name.clone(),
            status: self.status.inverted(),
            left: self.right.clone(),
            right: self.left.clone(),
        }
    }
}

impl IndexDiff {
    pub fn inverted(&self) -> Self {
        Self {
            name: self.name.clone(),
            status: self.status.inverted(),
            left: self.right.clone(),
            right: self.left.clone(),
        }
    }
}

impl ForeignKeyDiff {
    pub fn inverted(&self) -> Self {
        Self {
            key: self.key.clone(),
            status: self.status.inverted(),
            left: self.right.clone(),
            right: self.left.clone(),
        }
    }
}

impl TriggerDiff {
    pub fn inverted(&self) -> Self {
        Self {
            name: self.name.clone(),
            status: self.status.inverted(),
            left: self.right.clone(),
            right: self.left.clone(),
        }
    }
}

/// Per-table diff: status plus the four per-kind diff bundles.
///
/// For a `modified` or `unchanged` table the bundles hold one entry per
/// union identity (including `unchanged` entries, so a UI can render the
/// full table); for `added`/`removed` tables they are empty and the
/// table itself is the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDiff {
    pub table: String,
    pub status: DiffStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub column_diffs: Vec<ColumnDiff>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub index_diffs: Vec<IndexDiff>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub foreign_key_diffs: Vec<ForeignKeyDiff>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trigger_diffs: Vec<TriggerDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<TableInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<TableInfo>,
}

impl TableDiff {
    /// True when nothing about the table changed
    pub fn is_noop(&self) -> bool {
        self.status == DiffStatus::Unchanged
    }

    /// Swaps source and target sides, flipping added/removed statuses.
    /// Replaying an inverted diff through the generator yields the
    /// rollback of the forward migration.
    pub fn inverted(&self) -> Self {
        Self {
            table: self.table.clone(),
            status: self.status.inverted(),
            column_diffs: self.column_diffs.iter().map(ColumnDiff::inverted).collect(),
            index_diffs: self.index_diffs.iter().map(IndexDiff::inverted).collect(),
            foreign_key_diffs: self
                .foreign_key_diffs
                .iter()
                .map(ForeignKeyDiff::inverted)
                .collect(),
            trigger_diffs: self.trigger_diffs.iter().map(TriggerDiff::inverted).collect(),
            left: self.right.clone(),
            right: self.left.clone(),
        }
    }
}

/// Iteration policy for the union of table names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableOrdering {
    /// Source-side names in their given order, then target-only names in
    /// their given order
    #[default]
    Union,
    /// Lexicographic, for reproducible output across runs
    Sorted,
}

/// Tuning knobs for the diff engine
#[derive(Debug, Clone, Copy)]
pub struct DiffOptions {
    pub ordering: TableOrdering,
    /// Canonicalizes declared column types before comparison. The default
    /// trims surrounding whitespace only, so `INTEGER` vs `INT` still
    /// registers as a modification.
    pub type_normalizer: fn(&str) -> String,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            ordering: TableOrdering::Union,
            type_normalizer: trim_normalizer,
        }
    }
}

/// Default declared-type normalizer: whitespace trim only
pub fn trim_normalizer(declared: &str) -> String {
    declared.trim().to_string()
}

/// Renders the canonical `type [PRIMARY KEY] [NOT NULL] [DEFAULT x]`
/// definition string used for structural column equality. NOT NULL is
/// omitted for primary-key members; an empty declared type reads as TEXT.
pub fn canonical_column_definition(col: &ColumnInfo, normalize: fn(&str) -> String) -> String {
    let normalized = normalize(&col.data_type);
    let mut def = if normalized.is_empty() {
        "TEXT".to_string()
    } else {
        normalized
    };
    if col.is_primary_key() {
        def.push_str(" PRIMARY KEY");
    }
    if col.not_null && !col.is_primary_key() {
        def.push_str(" NOT NULL");
    }
    if let Some(ref default) = col.default_value {
        def.push_str(&format!(" DEFAULT {}", default));
    }
    def
}

/// The diff engine that compares schema snapshots
pub struct DiffEngine;

impl DiffEngine {
    /// Compare two snapshots with default options
    pub fn compare(left: &SchemaSnapshot, right: &SchemaSnapshot) -> Vec<TableDiff> {
        Self::compare_with(left, right, &DiffOptions::default())
    }

    /// Compare two snapshots under the given options
    pub fn compare_with(
        left: &SchemaSnapshot,
        right: &SchemaSnapshot,
        options: &DiffOptions,
    ) -> Vec<TableDiff> {
        let left_map: HashMap<&str, &TableInfo> =
            left.tables.iter().map(|t| (t.name.as_str(), t)).collect();
        let right_map: HashMap<&str, &TableInfo> =
            right.tables.iter().map(|t| (t.name.as_str(), t)).collect();

        let mut diffs = Vec::new();
        for name in Self::table_names(left, right, options.ordering) {
            let diff = match (left_map.get(name.as_str()), right_map.get(name.as_str())) {
                (Some(l), None) => TableDiff {
                    table: name.clone(),
                    status: DiffStatus::Removed,
                    column_diffs: Vec::new(),
                    index_diffs: Vec::new(),
                    foreign_key_diffs: Vec::new(),
                    trigger_diffs: Vec::new(),
                    left: Some((*l).clone()),
                    right: None,
                },
                (None, Some(r)) => TableDiff {
                    table: name.clone(),
                    status: DiffStatus::Added,
                    column_diffs: Vec::new(),
                    index_diffs: Vec::new(),
                    foreign_key_diffs: Vec::new(),
                    trigger_diffs: Vec::new(),
                    left: None,
                    right: Some((*r).clone()),
                },
                (Some(l), Some(r)) => Self::diff_table(l, r, left, right, options),
                (None, None) => continue,
            };
            diffs.push(diff);
        }

        let changed = diffs.iter().filter(|d| !d.is_noop()).count();
        debug!(
            "Compared snapshots: {} tables in union, {} changed",
            diffs.len(),
            changed
        );
        diffs
    }

    /// Union of table names under the configured ordering policy
    fn table_names(
        left: &SchemaSnapshot,
        right: &SchemaSnapshot,
        ordering: TableOrdering,
    ) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut names: Vec<String> = Vec::new();
        for table in left.tables.iter().chain(right.tables.iter()) {
            if seen.insert(table.name.as_str()) {
                names.push(table.name.clone());
            }
        }
        if ordering == TableOrdering::Sorted {
            names.sort_unstable();
        }
        names
    }

    /// Diff a table present on both sides, pre-filtering indexes, foreign
    /// keys, and triggers down to the owning table
    fn diff_table(
        l: &TableInfo,
        r: &TableInfo,
        left: &SchemaSnapshot,
        right: &SchemaSnapshot,
        options: &DiffOptions,
    ) -> TableDiff {
        let column_diffs = Self::compare_columns(&l.columns, &r.columns, options);
        let index_diffs =
            Self::compare_indexes(&left.indexes_for(&l.name), &right.indexes_for(&r.name));
        let foreign_key_diffs = Self::compare_foreign_keys(
            &left.foreign_keys_for(&l.name),
            &right.foreign_keys_for(&r.name),
        );
        let trigger_diffs =
            Self::compare_triggers(&left.triggers_for(&l.name), &right.triggers_for(&r.name));

        let changed = column_diffs.iter().any(|d| d.status != DiffStatus::Unchanged)
            || index_diffs.iter().any(|d| d.status != DiffStatus::Unchanged)
            || foreign_key_diffs.iter().any(|d| d.status != DiffStatus::Unchanged)
            || trigger_diffs.iter().any(|d| d.status != DiffStatus::Unchanged);

        TableDiff {
            table: l.name.clone(),
            status: if changed {
                DiffStatus::Modified
            } else {
                DiffStatus::Unchanged
            },
            column_diffs,
            index_diffs,
            foreign_key_diffs,
            trigger_diffs,
            left: Some(l.clone()),
            right: Some(r.clone()),
        }
    }

    /// Column comparator: identity is the name, equality is structural
    /// string equality of the canonical definitions
    pub fn compare_columns(
        left: &[ColumnInfo],
        right: &[ColumnInfo],
        options: &DiffOptions,
    ) -> Vec<ColumnDiff> {
        let left_map: HashMap<&str, &ColumnInfo> =
            left.iter().map(|c| (c.name.as_str(), c)).collect();
        let right_map: HashMap<&str, &ColumnInfo> =
            right.iter().map(|c| (c.name.as_str(), c)).collect();

        let mut seen: HashSet<&str> = HashSet::new();
        let mut diffs = Vec::new();
        for col in left.iter().chain(right.iter()) {
            if !seen.insert(col.name.as_str()) {
                continue;
            }
            let l = left_map.get(col.name.as_str()).copied();
            let r = right_map.get(col.name.as_str()).copied();
            let status = match (l, r) {
                (Some(l), Some(r)) => {
                    let left_def = canonical_column_definition(l, options.type_normalizer);
                    let right_def = canonical_column_definition(r, options.type_normalizer);
                    if left_def == right_def {
                        DiffStatus::Unchanged
                    } else {
                        DiffStatus::Modified
                    }
                }
                (Some(_), None) => DiffStatus::Removed,
                (None, Some(_)) => DiffStatus::Added,
                (None, None) => continue,
            };
            diffs.push(ColumnDiff {
                name: col.name.clone(),
                status,
                left: l.cloned(),
                right: r.cloned(),
            });
        }
        diffs
    }

    /// Index comparator: identity is the name, equality requires the same
    /// ordered column list and uniqueness flag (partiality not compared)
    pub fn compare_indexes(left: &[IndexInfo], right: &[IndexInfo]) -> Vec<IndexDiff> {
        let left_map: HashMap<&str, &IndexInfo> =
            left.iter().map(|i| (i.name.as_str(), i)).collect();
        let right_map: HashMap<&str, &IndexInfo> =
            right.iter().map(|i| (i.name.as_str(), i)).collect();

        let mut seen: HashSet<&str> = HashSet::new();
        let mut diffs = Vec::new();
        for idx in left.iter().chain(right.iter()) {
            if !seen.insert(idx.name.as_str()) {
                continue;
            }
            let l = left_map.get(idx.name.as_str()).copied();
            let r = right_map.get(idx.name.as_str()).copied();
            let status = match (l, r) {
                (Some(l), Some(r)) => {
                    if l.columns.join(",") == r.columns.join(",") && l.unique == r.unique {
                        DiffStatus::Unchanged
                    } else {
                        DiffStatus::Modified
                    }
                }
                (Some(_), None) => DiffStatus::Removed,
                (None, Some(_)) => DiffStatus::Added,
                (None, None) => continue,
            };
            diffs.push(IndexDiff {
                name: idx.name.clone(),
                status,
                left: l.cloned(),
                right: r.cloned(),
            });
        }
        diffs
    }

    /// Foreign-key comparator: identity is the synthetic key, so a column
    /// or reference change surfaces as add+remove rather than modify;
    /// equality compares the ON DELETE / ON UPDATE actions only
    pub fn compare_foreign_keys(
        left: &[ForeignKeyInfo],
        right: &[ForeignKeyInfo],
    ) -> Vec<ForeignKeyDiff> {
        let left_map: HashMap<String, &ForeignKeyInfo> =
            left.iter().map(|fk| (fk.key(), fk)).collect();
        let right_map: HashMap<String, &ForeignKeyInfo> =
            right.iter().map(|fk| (fk.key(), fk)).collect();

        let mut seen: HashSet<String> = HashSet::new();
        let mut diffs = Vec::new();
        for fk in left.iter().chain(right.iter()) {
            let key = fk.key();
            if !seen.insert(key.clone()) {
                continue;
            }
            let l = left_map.get(&key).copied();
            let r = right_map.get(&key).copied();
            let status = match (l, r) {
                (Some(l), Some(r)) => {
                    if l.on_delete == r.on_delete && l.on_update == r.on_update {
                        DiffStatus::Unchanged
                    } else {
                        DiffStatus::Modified
                    }
                }
                (Some(_), None) => DiffStatus::Removed,
                (None, Some(_)) => DiffStatus::Added,
                (None, None) => continue,
            };
            diffs.push(ForeignKeyDiff {
                key,
                status,
                left: l.cloned(),
                right: r.cloned(),
            });
        }
        diffs
    }

    /// Trigger comparator: identity is the name, equality is exact SQL
    /// text equality (whitespace-sensitive)
    pub fn compare_triggers(left: &[TriggerInfo], right: &[TriggerInfo]) -> Vec<TriggerDiff> {
        let left_map: HashMap<&str, &TriggerInfo> =
            left.iter().map(|t| (t.name.as_str(), t)).collect();
        let right_map: HashMap<&str, &TriggerInfo> =
            right.iter().map(|t| (t.name.as_str(), t)).collect();

        let mut seen: HashSet<&str> = HashSet::new();
        let mut diffs = Vec::new();
        for trg in left.iter().chain(right.iter()) {
            if !seen.insert(trg.name.as_str()) {
                continue;
            }
            let l = left_map.get(trg.name.as_str()).copied();
            let r = right_map.get(trg.name.as_str()).copied();
            let status = match (l, r) {
                (Some(l), Some(r)) => {
                    if l.sql == r.sql {
                        DiffStatus::Unchanged
                    } else {
                        DiffStatus::Modified
                    }
                }
                (Some(_), None) => DiffStatus::Removed,
                (None, Some(_)) => DiffStatus::Added,
                (None, None) => continue,
            };
            diffs.push(TriggerDiff {
                name: trg.name.clone(),
                status,
                left: l.cloned(),
                right: r.cloned(),
            });
        }
        diffs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TableKind;
    use pretty_assertions::assert_eq;

    fn col(name: &str, data_type: &str) -> ColumnInfo {
        ColumnInfo {
            ordinal: 0,
            name: name.to_string(),
            data_type: data_type.to_string(),
            not_null: false,
            default_value: None,
            pk_ordinal: 0,
        }
    }

    fn pk_col(name: &str, data_type: &str) -> ColumnInfo {
        ColumnInfo {
            ordinal: 0,
            name: name.to_string(),
            data_type: data_type.to_string(),
            not_null: true,
            default_value: None,
            pk_ordinal: 1,
        }
    }

    fn table(name: &str, columns: Vec<ColumnInfo>) -> TableInfo {
        TableInfo {
            name: name.to_string(),
            kind: TableKind::Table,
            strict: false,
            columns,
        }
    }

    fn snapshot(tables: Vec<TableInfo>) -> SchemaSnapshot {
        SchemaSnapshot {
            tables,
            indexes: vec![],
            foreign_keys: vec![],
            triggers: vec![],
        }
    }

    fn index(table: &str, name: &str, unique: bool, columns: &[&str]) -> IndexInfo {
        IndexInfo {
            table: table.to_string(),
            name: name.to_string(),
            unique,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            partial: None,
        }
    }

    #[test]
    fn identical_snapshots_are_unchanged() {
        let s = snapshot(vec![table(
            "users",
            vec![pk_col("id", "INTEGER"), col("email", "TEXT")],
        )]);
        let diffs = DiffEngine::compare(&s, &s);
        assert_eq!(diffs.len(), 1);
        assert!(diffs.iter().all(|d| d.is_noop()));
    }

    #[test]
    fn table_only_in_target_is_added() {
        let left = snapshot(vec![]);
        let right = snapshot(vec![table("users", vec![pk_col("id", "INTEGER")])]);
        let diffs = DiffEngine::compare(&left, &right);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].status, DiffStatus::Added);
        assert!(diffs[0].left.is_none());
        assert!(diffs[0].right.is_some());
    }

    #[test]
    fn table_only_in_source_is_removed() {
        let left = snapshot(vec![table("legacy", vec![pk_col("id", "INTEGER")])]);
        let right = snapshot(vec![]);
        let diffs = DiffEngine::compare(&left, &right);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].status, DiffStatus::Removed);
        assert_eq!(diffs[0].table, "legacy");
    }

    #[test]
    fn column_add_remove_and_modify() {
        let left = snapshot(vec![table(
            "users",
            vec![pk_col("id", "INTEGER"), col("name", "TEXT"), col("age", "INTEGER")],
        )]);
        let mut changed = col("age", "TEXT");
        changed.not_null = true;
        let right = snapshot(vec![table(
            "users",
            vec![pk_col("id", "INTEGER"), col("email", "TEXT"), changed],
        )]);

        let diffs = DiffEngine::compare(&left, &right);
        assert_eq!(diffs[0].status, DiffStatus::Modified);

        let by_name: std::collections::HashMap<&str, DiffStatus> = diffs[0]
            .column_diffs
            .iter()
            .map(|d| (d.name.as_str(), d.status))
            .collect();
        assert_eq!(by_name["id"], DiffStatus::Unchanged);
        assert_eq!(by_name["name"], DiffStatus::Removed);
        assert_eq!(by_name["age"], DiffStatus::Modified);
        assert_eq!(by_name["email"], DiffStatus::Added);
    }

    #[test]
    fn canonical_definition_omits_not_null_for_pk() {
        let c = pk_col("id", "INTEGER");
        assert_eq!(
            canonical_column_definition(&c, trim_normalizer),
            "INTEGER PRIMARY KEY"
        );
    }

    #[test]
    fn canonical_definition_includes_default() {
        let mut c = col("active", "INTEGER");
        c.not_null = true;
        c.default_value = Some("1".to_string());
        assert_eq!(
            canonical_column_definition(&c, trim_normalizer),
            "INTEGER NOT NULL DEFAULT 1"
        );
    }

    #[test]
    fn canonical_definition_defaults_empty_type_to_text() {
        let c = col("data", "");
        assert_eq!(canonical_column_definition(&c, trim_normalizer), "TEXT");
    }

    #[test]
    fn type_casing_difference_is_a_modification() {
        // INTEGER vs INT is a coarse structural mismatch, not a semantic one.
        let left = snapshot(vec![table("t", vec![col("n", "INTEGER")])]);
        let right = snapshot(vec![table("t", vec![col("n", "INT")])]);
        let diffs = DiffEngine::compare(&left, &right);
        assert_eq!(diffs[0].column_diffs[0].status, DiffStatus::Modified);
    }

    #[test]
    fn injected_normalizer_can_loosen_type_equality() {
        fn affinity(declared: &str) -> String {
            if declared.to_uppercase().contains("INT") {
                "INTEGER".to_string()
            } else {
                declared.trim().to_uppercase()
            }
        }
        let left = snapshot(vec![table("t", vec![col("n", "INTEGER")])]);
        let right = snapshot(vec![table("t", vec![col("n", "int")])]);
        let options = DiffOptions {
            type_normalizer: affinity,
            ..DiffOptions::default()
        };
        let diffs = DiffEngine::compare_with(&left, &right, &options);
        assert!(diffs[0].is_noop());
    }

    #[test]
    fn index_uniqueness_change_is_a_modification() {
        let mut left = snapshot(vec![table("t", vec![col("a", "TEXT")])]);
        left.indexes.push(index("t", "idx_a", false, &["a"]));
        let mut right = snapshot(vec![table("t", vec![col("a", "TEXT")])]);
        right.indexes.push(index("t", "idx_a", true, &["a"]));

        let diffs = DiffEngine::compare(&left, &right);
        assert_eq!(diffs[0].status, DiffStatus::Modified);
        assert_eq!(diffs[0].index_diffs[0].status, DiffStatus::Modified);
    }

    #[test]
    fn index_column_order_matters() {
        let mut left = snapshot(vec![table("t", vec![col("a", "TEXT"), col("b", "TEXT")])]);
        left.indexes.push(index("t", "idx_ab", false, &["a", "b"]));
        let mut right = snapshot(vec![table("t", vec![col("a", "TEXT"), col("b", "TEXT")])]);
        right.indexes.push(index("t", "idx_ab", false, &["b", "a"]));

        let diffs = DiffEngine::compare(&left, &right);
        assert_eq!(diffs[0].index_diffs[0].status, DiffStatus::Modified);
    }

    #[test]
    fn index_on_another_table_is_not_picked_up() {
        let mut left = snapshot(vec![
            table("t", vec![col("a", "TEXT")]),
            table("u", vec![col("a", "TEXT")]),
        ]);
        left.indexes.push(index("u", "idx_u", false, &["a"]));
        let right = left.clone();

        let diffs = DiffEngine::compare(&left, &right);
        let t = diffs.iter().find(|d| d.table == "t").unwrap();
        assert!(t.index_diffs.is_empty());
        let u = diffs.iter().find(|d| d.table == "u").unwrap();
        assert_eq!(u.index_diffs.len(), 1);
    }

    #[test]
    fn foreign_key_action_change_is_a_modification() {
        let fk = |on_delete: &str| ForeignKeyInfo {
            table: "posts".to_string(),
            column: "author_id".to_string(),
            references_table: "users".to_string(),
            references_column: "id".to_string(),
            on_delete: on_delete.to_string(),
            on_update: "NO ACTION".to_string(),
        };
        let mut left = snapshot(vec![table("posts", vec![col("author_id", "INTEGER")])]);
        left.foreign_keys.push(fk("NO ACTION"));
        let mut right = snapshot(vec![table("posts", vec![col("author_id", "INTEGER")])]);
        right.foreign_keys.push(fk("CASCADE"));

        let diffs = DiffEngine::compare(&left, &right);
        assert_eq!(diffs[0].foreign_key_diffs[0].status, DiffStatus::Modified);
        assert_eq!(diffs[0].foreign_key_diffs[0].key, "posts.author_id->users.id");
    }

    #[test]
    fn foreign_key_retarget_is_add_plus_remove() {
        // Pointing the same column at a different table changes the
        // identity key, so it surfaces as one removed and one added FK.
        let fk = |references_table: &str| ForeignKeyInfo {
            table: "posts".to_string(),
            column: "owner_id".to_string(),
            references_table: references_table.to_string(),
            references_column: "id".to_string(),
            on_delete: "NO ACTION".to_string(),
            on_update: "NO ACTION".to_string(),
        };
        let mut left = snapshot(vec![table("posts", vec![col("owner_id", "INTEGER")])]);
        left.foreign_keys.push(fk("users"));
        let mut right = snapshot(vec![table("posts", vec![col("owner_id", "INTEGER")])]);
        right.foreign_keys.push(fk("accounts"));

        let diffs = DiffEngine::compare(&left, &right);
        let statuses: Vec<DiffStatus> =
            diffs[0].foreign_key_diffs.iter().map(|d| d.status).collect();
        assert_eq!(statuses, vec![DiffStatus::Removed, DiffStatus::Added]);
    }

    #[test]
    fn trigger_text_equality_is_whitespace_sensitive() {
        let trg = |sql: &str| TriggerInfo {
            name: "trg_audit".to_string(),
            table: "users".to_string(),
            sql: sql.to_string(),
        };
        let mut left = snapshot(vec![table("users", vec![col("id", "INTEGER")])]);
        left.triggers
            .push(trg("CREATE TRIGGER trg_audit AFTER UPDATE ON users BEGIN SELECT 1; END"));
        let mut right = snapshot(vec![table("users", vec![col("id", "INTEGER")])]);
        right.triggers
            .push(trg("CREATE TRIGGER trg_audit AFTER UPDATE ON users BEGIN  SELECT 1; END"));

        let diffs = DiffEngine::compare(&left, &right);
        assert_eq!(diffs[0].trigger_diffs[0].status, DiffStatus::Modified);
    }

    #[test]
    fn union_ordering_lists_source_tables_first() {
        let left = snapshot(vec![
            table("zebra", vec![col("id", "INTEGER")]),
            table("apple", vec![col("id", "INTEGER")]),
        ]);
        let right = snapshot(vec![
            table("apple", vec![col("id", "INTEGER")]),
            table("mango", vec![col("id", "INTEGER")]),
        ]);
        let order: Vec<String> = DiffEngine::compare(&left, &right)
            .iter()
            .map(|d| d.table.clone())
            .collect();
        assert_eq!(order, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn sorted_ordering_is_lexicographic() {
        let left = snapshot(vec![
            table("zebra", vec![col("id", "INTEGER")]),
            table("apple", vec![col("id", "INTEGER")]),
        ]);
        let right = snapshot(vec![table("mango", vec![col("id", "INTEGER")])]);
        let options = DiffOptions {
            ordering: TableOrdering::Sorted,
            ..DiffOptions::default()
        };
        let order: Vec<String> = DiffEngine::compare_with(&left, &right, &options)
            .iter()
            .map(|d| d.table.clone())
            .collect();
        assert_eq!(order, vec!["apple", "mango", "zebra"]);
    }

    #[test]
    fn inverted_diff_swaps_sides_and_statuses() {
        let left = snapshot(vec![table("t", vec![col("a", "TEXT"), col("b", "TEXT")])]);
        let right = snapshot(vec![table("t", vec![col("a", "TEXT"), col("c", "TEXT")])]);
        let diffs = DiffEngine::compare(&left, &right);
        let inverted = diffs[0].inverted();

        let by_name: std::collections::HashMap<&str, DiffStatus> = inverted
            .column_diffs
            .iter()
            .map(|d| (d.name.as_str(), d.status))
            .collect();
        assert_eq!(by_name["b"], DiffStatus::Added);
        assert_eq!(by_name["c"], DiffStatus::Removed);
        assert_eq!(inverted.left, diffs[0].right);
        assert_eq!(inverted.right, diffs[0].left);
    }
}
