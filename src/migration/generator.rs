//! Migration step generator
//!
//! Turns table diffs into an ordered, risk-annotated list of SQLite
//! DDL/DML steps. SQLite's ALTER TABLE cannot drop a column, change a
//! column definition, or touch foreign keys on the engines this targets,
//! so the generator chooses per change between a direct statement and
//! the table-recreation procedure, leaving a comment-only placeholder
//! step wherever the real work is deferred.

use crate::diff::{
    canonical_column_definition, trim_normalizer, ColumnDiff, DiffStatus, ForeignKeyDiff,
    IndexDiff, TableDiff, TriggerDiff,
};
use crate::migration::models::{MigrationStep, RecreationPlan, RiskLevel, StepKind};
use crate::schema::{ColumnInfo, IndexInfo, TableInfo, TriggerInfo};
use tracing::debug;

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name)
}

/// Declared type with the call-site default for untyped columns: TEXT in
/// ordinary tables, ANY when synthesizing a STRICT table definition
fn declared_type(col: &ColumnInfo, strict: bool) -> String {
    let declared = col.data_type.trim();
    if declared.is_empty() {
        if strict { "ANY" } else { "TEXT" }.to_string()
    } else {
        declared.to_string()
    }
}

/// Generates migration steps from a schema diff
pub struct MigrationGenerator;

impl MigrationGenerator {
    /// Generate the forward migration steps for a diff list, in the same
    /// table order as the input
    pub fn generate(diffs: &[TableDiff]) -> Vec<MigrationStep> {
        let mut steps = Vec::new();
        for diff in diffs {
            match diff.status {
                DiffStatus::Added => {
                    if let Some(ref target) = diff.right {
                        steps.push(Self::create_table_step(target));
                    }
                }
                DiffStatus::Removed => steps.push(Self::drop_table_step(&diff.table)),
                DiffStatus::Modified => Self::modified_table_steps(diff, &mut steps),
                DiffStatus::Unchanged => {}
            }
        }
        debug!(
            "Generated {} migration steps from {} table diffs",
            steps.len(),
            diffs.len()
        );
        steps
    }

    /// Generate the rollback steps that restore the source schema:
    /// each diff is inverted and the table order reversed
    pub fn generate_rollback(diffs: &[TableDiff]) -> Vec<MigrationStep> {
        let inverted: Vec<TableDiff> = diffs.iter().rev().map(TableDiff::inverted).collect();
        Self::generate(&inverted)
    }

    fn modified_table_steps(diff: &TableDiff, steps: &mut Vec<MigrationStep>) {
        let mut needs_recreation = false;
        for col in &diff.column_diffs {
            match col.status {
                DiffStatus::Added => {
                    if let Some(ref target) = col.right {
                        steps.push(Self::add_column_step(&diff.table, target));
                    }
                }
                DiffStatus::Removed => {
                    steps.push(Self::drop_column_placeholder(&diff.table, col));
                    needs_recreation = true;
                }
                DiffStatus::Modified => {
                    steps.push(Self::modify_column_placeholder(&diff.table, col));
                    needs_recreation = true;
                }
                DiffStatus::Unchanged => {}
            }
        }
        if needs_recreation {
            if let Some(ref target) = diff.right {
                steps.push(Self::recreation_step(target));
            }
        }
        for idx in &diff.index_diffs {
            Self::index_steps(&diff.table, idx, steps);
        }
        for fk in &diff.foreign_key_diffs {
            Self::foreign_key_step(&diff.table, fk, steps);
        }
        for trg in &diff.trigger_diffs {
            Self::trigger_steps(&diff.table, trg, steps);
        }
    }

    // ---- table steps -------------------------------------------------

    fn create_table_step(table: &TableInfo) -> MigrationStep {
        MigrationStep {
            kind: StepKind::CreateTable,
            sql: Self::create_table_sql(&table.name, table),
            table: table.name.clone(),
            object: None,
            risk: RiskLevel::Safe,
            note: None,
        }
    }

    fn create_table_sql(name: &str, table: &TableInfo) -> String {
        let columns: Vec<String> = table
            .columns
            .iter()
            .map(|c| format!("    {}", Self::column_def(c, table.strict)))
            .collect();
        format!(
            "CREATE TABLE {} (\n{}\n){};",
            quote_ident(name),
            columns.join(",\n"),
            if table.strict { " STRICT" } else { "" }
        )
    }

    /// Renders one column definition for CREATE TABLE / ADD COLUMN
    fn column_def(col: &ColumnInfo, strict: bool) -> String {
        let mut def = format!("{} {}", quote_ident(&col.name), declared_type(col, strict));
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

    fn drop_table_step(table: &str) -> MigrationStep {
        MigrationStep {
            kind: StepKind::DropTable,
            sql: format!("DROP TABLE IF EXISTS {};", quote_ident(table)),
            table: table.to_string(),
            object: None,
            risk: RiskLevel::Danger,
            note: Some(format!(
                "Dropping \"{}\" permanently deletes the table and all of its rows.",
                table
            )),
        }
    }

    // ---- column steps ------------------------------------------------

    fn add_column_step(table: &str, col: &ColumnInfo) -> MigrationStep {
        if col.not_null && col.default_value.is_none() {
            // SQLite refuses ADD COLUMN ... NOT NULL without a default:
            // existing rows need a value to backfill.
            return MigrationStep {
                kind: StepKind::AddColumn,
                sql: format!(
                    "ALTER TABLE {} ADD COLUMN {} {} NOT NULL DEFAULT '';",
                    quote_ident(table),
                    quote_ident(&col.name),
                    declared_type(col, false)
                ),
                table: table.to_string(),
                object: Some(col.name.clone()),
                risk: RiskLevel::Warning,
                note: Some(format!(
                    "Column \"{}\" is NOT NULL without a default; existing rows are backfilled with ''.",
                    col.name
                )),
            };
        }
        MigrationStep {
            kind: StepKind::AddColumn,
            sql: format!(
                "ALTER TABLE {} ADD COLUMN {};",
                quote_ident(table),
                Self::column_def(col, false)
            ),
            table: table.to_string(),
            object: Some(col.name.clone()),
            risk: RiskLevel::Safe,
            note: None,
        }
    }

    fn drop_column_placeholder(table: &str, col: &ColumnDiff) -> MigrationStep {
        MigrationStep {
            kind: StepKind::DropColumn,
            sql: format!(
                "-- Column {} on {} cannot be dropped in place; see the table recreation below.",
                quote_ident(&col.name),
                quote_ident(table)
            ),
            table: table.to_string(),
            object: Some(col.name.clone()),
            risk: RiskLevel::Danger,
            note: Some(format!(
                "Dropping \"{}\" loses its data; applied by recreating \"{}\".",
                col.name, table
            )),
        }
    }

    fn modify_column_placeholder(table: &str, col: &ColumnDiff) -> MigrationStep {
        let old_def = col
            .left
            .as_ref()
            .map(|c| canonical_column_definition(c, trim_normalizer))
            .unwrap_or_default();
        let new_def = col
            .right
            .as_ref()
            .map(|c| canonical_column_definition(c, trim_normalizer))
            .unwrap_or_default();
        MigrationStep {
            kind: StepKind::ModifyColumn,
            sql: format!(
                "-- Column {} on {} cannot be modified in place (was: {}, now: {}); see the table recreation below.",
                quote_ident(&col.name),
                quote_ident(table),
                old_def,
                new_def
            ),
            table: table.to_string(),
            object: Some(col.name.clone()),
            risk: RiskLevel::Warning,
            note: Some(format!(
                "\"{}\" changes from `{}` to `{}`; applied by recreating \"{}\".",
                col.name, old_def, new_def, table
            )),
        }
    }

    // ---- table recreation --------------------------------------------

    fn recreation_step(target: &TableInfo) -> MigrationStep {
        let plan = Self::recreation_plan(target);
        MigrationStep {
            kind: StepKind::ModifyColumn,
            sql: plan.to_sql(),
            table: target.name.clone(),
            object: None,
            risk: RiskLevel::Danger,
            note: Some(format!(
                "Rebuilds \"{}\" through a staging copy; back up the database before applying.",
                target.name
            )),
        }
    }

    /// Builds the six-statement recreation sequence carrying a table to
    /// its target definition. The copy step selects the target column
    /// names verbatim from the source table.
    pub fn recreation_plan(target: &TableInfo) -> RecreationPlan {
        let temp = RecreationPlan::temp_table(&target.name);
        let columns = target
            .columns
            .iter()
            .map(|c| quote_ident(&c.name))
            .collect::<Vec<_>>()
            .join(", ");
        let statements = vec![
            "PRAGMA foreign_keys = OFF;".to_string(),
            Self::create_table_sql(&temp, target),
            format!(
                "INSERT INTO {} ({}) SELECT {} FROM {};",
                quote_ident(&temp),
                columns,
                columns,
                quote_ident(&target.name)
            ),
            format!("DROP TABLE {};", quote_ident(&target.name)),
            format!(
                "ALTER TABLE {} RENAME TO {};",
                quote_ident(&temp),
                quote_ident(&target.name)
            ),
            "PRAGMA foreign_keys = ON;".to_string(),
        ];
        RecreationPlan {
            table: target.name.clone(),
            statements,
        }
    }

    // ---- index steps -------------------------------------------------

    fn index_steps(table: &str, diff: &IndexDiff, steps: &mut Vec<MigrationStep>) {
        match diff.status {
            DiffStatus::Added => {
                if let Some(ref idx) = diff.right {
                    steps.push(Self::create_index_step(table, idx));
                }
            }
            DiffStatus::Removed => steps.push(Self::drop_index_step(table, &diff.name)),
            DiffStatus::Modified => {
                // Not atomic: a failure between the two statements leaves
                // the table without the index. Transaction wrapping is the
                // executor's concern.
                steps.push(Self::drop_index_step(table, &diff.name));
                if let Some(ref idx) = diff.right {
                    steps.push(Self::create_index_step(table, idx));
                }
            }
            DiffStatus::Unchanged => {}
        }
    }

    fn create_index_step(table: &str, idx: &IndexInfo) -> MigrationStep {
        MigrationStep {
            kind: StepKind::CreateIndex,
            sql: format!(
                "CREATE {}INDEX {} ON {} ({});",
                if idx.unique { "UNIQUE " } else { "" },
                quote_ident(&idx.name),
                quote_ident(table),
                idx.columns.join(", ")
            ),
            table: table.to_string(),
            object: Some(idx.name.clone()),
            risk: RiskLevel::Safe,
            note: None,
        }
    }

    fn drop_index_step(table: &str, name: &str) -> MigrationStep {
        MigrationStep {
            kind: StepKind::DropIndex,
            sql: format!("DROP INDEX IF EXISTS {};", quote_ident(name)),
            table: table.to_string(),
            object: Some(name.to_string()),
            risk: RiskLevel::Warning,
            note: None,
        }
    }

    // ---- foreign-key steps -------------------------------------------

    /// Foreign-key changes of any status produce only a comment-only
    /// placeholder; no recreation step is attached for FK-only diffs.
    fn foreign_key_step(table: &str, diff: &ForeignKeyDiff, steps: &mut Vec<MigrationStep>) {
        let (kind, verb) = match diff.status {
            DiffStatus::Added => (StepKind::AddForeignKey, "added"),
            DiffStatus::Modified => (StepKind::AddForeignKey, "changed"),
            DiffStatus::Removed => (StepKind::DropForeignKey, "dropped"),
            DiffStatus::Unchanged => return,
        };
        steps.push(MigrationStep {
            kind,
            sql: format!(
                "-- Foreign key {} cannot be {} in place; foreign key changes require recreating {}.",
                diff.key,
                verb,
                quote_ident(table)
            ),
            table: table.to_string(),
            object: Some(diff.key.clone()),
            risk: RiskLevel::Danger,
            note: Some(
                "Foreign key changes require table recreation; no executable SQL is generated for this change."
                    .to_string(),
            ),
        });
    }

    // ---- trigger steps -----------------------------------------------

    fn trigger_steps(table: &str, diff: &TriggerDiff, steps: &mut Vec<MigrationStep>) {
        match diff.status {
            DiffStatus::Added => {
                if let Some(ref trg) = diff.right {
                    steps.push(Self::create_trigger_step(table, trg));
                }
            }
            DiffStatus::Removed => steps.push(Self::drop_trigger_step(table, &diff.name)),
            DiffStatus::Modified => {
                steps.push(Self::drop_trigger_step(table, &diff.name));
                if let Some(ref trg) = diff.right {
                    steps.push(Self::create_trigger_step(table, trg));
                }
            }
            DiffStatus::Unchanged => {}
        }
    }

    fn create_trigger_step(table: &str, trigger: &TriggerInfo) -> MigrationStep {
        let body = trigger.sql.trim_end();
        let sql = if body.ends_with(';') {
            body.to_string()
        } else {
            format!("{};", body)
        };
        MigrationStep {
            kind: StepKind::CreateTrigger,
            sql,
            table: table.to_string(),
            object: Some(trigger.name.clone()),
            risk: RiskLevel::Warning,
            note: None,
        }
    }

    fn drop_trigger_step(table: &str, name: &str) -> MigrationStep {
        MigrationStep {
            kind: StepKind::DropTrigger,
            sql: format!("DROP TRIGGER IF EXISTS {};", quote_ident(name)),
            table: table.to_string(),
            object: Some(name.to_string()),
            risk: RiskLevel::Warning,
            note: None,
        }
    }
}
