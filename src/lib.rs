//! litediff - schema diff and migration script generator for SQLite
//!
//! Compares two schema snapshots (a source and a target) and produces:
//! - a structural diff across tables, columns, indexes, foreign keys,
//!   and triggers,
//! - an ordered, risk-annotated step list that would carry the source
//!   schema to the target, choosing per change between a direct
//!   statement and SQLite's table-recreation workaround,
//! - a formatted SQL script grouped by table,
//! - summary statistics by risk level and step kind.
//!
//! The crate performs no I/O and executes nothing. Snapshots come from
//! an external introspection layer, and whoever runs the generated SQL
//! owns transaction and rollback discipline; `danger`-risk steps should
//! be gated behind explicit user confirmation.
//!
//! ```
//! use litediff::{DiffEngine, FormatOptions, MigrationGenerator, SchemaSnapshot};
//! use litediff::format_migration_as_sql;
//!
//! let source = SchemaSnapshot::default();
//! let target = SchemaSnapshot::default();
//! let diffs = DiffEngine::compare(&source, &target);
//! let steps = MigrationGenerator::generate(&diffs);
//! let script = format_migration_as_sql(&steps, &FormatOptions::default());
//! assert!(script.contains("Migration script"));
//! ```

pub mod diff;
pub mod error;
pub mod migration;
pub mod schema;

pub use diff::{DiffEngine, DiffOptions, DiffStatus, TableDiff, TableOrdering};
pub use error::SchemaError;
pub use migration::{
    format_migration_as_sql, FormatOptions, MigrationGenerator, MigrationStats, MigrationStep,
    RiskLevel, StepKind,
};
pub use schema::SchemaSnapshot;
