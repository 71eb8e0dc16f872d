//! Schema Snapshot Module
//!
//! In-memory description of one database's schema at a point in time:
//! tables with ordered columns, indexes, foreign keys, and triggers.
//! Snapshots are produced by an external introspection layer (from
//! `sqlite_master` plus the `table_info` / `index_list` / `index_info` /
//! `foreign_key_list` pragmas) and consumed here as immutable inputs.
//!
//! Identity keys (table, column, index, and trigger names, plus the
//! synthetic foreign-key key) are assumed unique within a snapshot; the
//! introspection layer guarantees that, not this crate.

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A single column as reported by `PRAGMA table_info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    /// Ordinal position within the table
    pub ordinal: i32,
    pub name: String,
    /// Declared type; may be empty, SQLite permits untyped columns
    #[serde(default)]
    pub data_type: String,
    #[serde(default)]
    pub not_null: bool,
    /// Default-value literal, verbatim from the declaration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Position within the primary key (0 = not part of the PK)
    #[serde(default)]
    pub pk_ordinal: i32,
}

impl ColumnInfo {
    /// True when the column participates in the primary key
    pub fn is_primary_key(&self) -> bool {
        self.pk_ordinal > 0
    }
}

/// Kind of relation in `sqlite_master`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    #[default]
    Table,
    View,
}

/// Table plus its ordered column list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableInfo {
    pub name: String,
    #[serde(default)]
    pub kind: TableKind,
    /// STRICT-mode flag, preserved verbatim when (re)creating the table
    #[serde(default)]
    pub strict: bool,
    pub columns: Vec<ColumnInfo>,
}

impl TableInfo {
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Index definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexInfo {
    /// Owning table
    pub table: String,
    pub name: String,
    #[serde(default)]
    pub unique: bool,
    /// Ordered column-name list
    pub columns: Vec<String>,
    /// Partial-index flag; carried through but never compared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial: Option<bool>,
}

/// Single-column foreign key as reported by `PRAGMA foreign_key_list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyInfo {
    /// Owning table
    pub table: String,
    pub column: String,
    pub references_table: String,
    pub references_column: String,
    #[serde(default)]
    pub on_delete: String,
    #[serde(default)]
    pub on_update: String,
}

impl ForeignKeyInfo {
    /// Synthetic identity key: `table.column->refTable.refColumn`
    pub fn key(&self) -> String {
        format!(
            "{}.{}->{}.{}",
            self.table, self.column, self.references_table, self.references_column
        )
    }
}

/// Trigger definition with its full SQL text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerInfo {
    pub name: String,
    /// Owning table
    pub table: String,
    pub sql: String,
}

/// Complete schema snapshot for one database
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSnapshot {
    pub tables: Vec<TableInfo>,
    #[serde(default)]
    pub indexes: Vec<IndexInfo>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyInfo>,
    #[serde(default)]
    pub triggers: Vec<TriggerInfo>,
}

impl SchemaSnapshot {
    pub fn table(&self, name: &str) -> Option<&TableInfo> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Indexes owned by `table`
    pub fn indexes_for(&self, table: &str) -> Vec<IndexInfo> {
        self.indexes.iter().filter(|i| i.table == table).cloned().collect()
    }

    /// Foreign keys owned by `table`
    pub fn foreign_keys_for(&self, table: &str) -> Vec<ForeignKeyInfo> {
        self.foreign_keys.iter().filter(|fk| fk.table == table).cloned().collect()
    }

    /// Triggers owned by `table`
    pub fn triggers_for(&self, table: &str) -> Vec<TriggerInfo> {
        self.triggers.iter().filter(|t| t.table == table).cloned().collect()
    }

    /// Content fingerprint of the snapshot.
    ///
    /// Table names are hashed in sorted order so two snapshots listing
    /// the same schema in different orders fingerprint identically.
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();

        let mut table_names: Vec<&str> = self.tables.iter().map(|t| t.name.as_str()).collect();
        table_names.sort_unstable();
        for name in &table_names {
            hasher.update(name.as_bytes());
        }

        for table in &self.tables {
            for col in &table.columns {
                hasher.update(
                    format!(
                        "{}.{}:{}:{}:{}:{}",
                        table.name,
                        col.name,
                        col.data_type,
                        col.not_null,
                        col.pk_ordinal,
                        col.default_value.as_deref().unwrap_or("")
                    )
                    .as_bytes(),
                );
            }
        }

        for fk in &self.foreign_keys {
            hasher.update(format!("FK:{}:{}:{}", fk.key(), fk.on_delete, fk.on_update).as_bytes());
        }

        for idx in &self.indexes {
            hasher.update(
                format!("IX:{}:{}:{}", idx.name, idx.columns.join(","), idx.unique).as_bytes(),
            );
        }

        for trg in &self.triggers {
            hasher.update(format!("TR:{}:{}", trg.name, trg.sql).as_bytes());
        }

        format!("{:x}", hasher.finalize())
    }

    /// Parses a snapshot from the JSON shape the introspection layer emits
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the snapshot back to JSON
    pub fn to_json(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
