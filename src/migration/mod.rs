//! Migration Module
//!
//! Turns schema diffs into a risk-annotated SQL plan:
//! - Step generation (direct DDL where SQLite allows it, table
//!   recreation where it does not)
//! - Script formatting (table-grouped, optionally commented)
//! - Summary statistics (counts by risk level and step kind)

mod formatter;
mod generator;
mod models;
mod stats;

pub use formatter::{format_migration_as_sql, FormatOptions};
pub use generator::MigrationGenerator;
pub use models::{MigrationStep, RecreationPlan, RiskLevel, StepKind};
pub use stats::MigrationStats;
