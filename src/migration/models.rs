//! Migration step model
//!
//! The output vocabulary of the generator: step kinds, risk levels, the
//! step record itself, and the explicit table-recreation unit.

use serde::{Deserialize, Serialize};

/// Kind of statement a migration step carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    CreateTable,
    DropTable,
    AddColumn,
    DropColumn,
    ModifyColumn,
    CreateIndex,
    DropIndex,
    AddForeignKey,
    DropForeignKey,
    CreateTrigger,
    DropTrigger,
}

impl StepKind {
    /// The snake_case tag used in serialized output
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateTable => "create_table",
            Self::DropTable => "drop_table",
            Self::AddColumn => "add_column",
            Self::DropColumn => "drop_column",
            Self::ModifyColumn => "modify_column",
            Self::CreateIndex => "create_index",
            Self::DropIndex => "drop_index",
            Self::AddForeignKey => "add_foreign_key",
            Self::DropForeignKey => "drop_foreign_key",
            Self::CreateTrigger => "create_trigger",
            Self::DropTrigger => "drop_trigger",
        }
    }
}

/// Risk classification for a migration step
///
/// `safe` is non-destructive and reversible, `warning` changes behavior
/// or is irreversible but low impact, `danger` can lose data or
/// structure. Ordered so the maximum over a step list is the overall
/// script risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Warning,
    Danger,
}

/// A single step in a generated migration script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationStep {
    pub kind: StepKind,
    /// Literal SQL text; comment-only for changes SQLite cannot express
    /// in place
    pub sql: String,
    /// Owning table
    pub table: String,
    /// Column, index, foreign-key, or trigger the step targets, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    pub risk: RiskLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl MigrationStep {
    /// True for steps that destroy data or structure irreversibly
    pub fn is_destructive(&self) -> bool {
        matches!(
            self.kind,
            StepKind::DropTable
                | StepKind::DropColumn
                | StepKind::DropIndex
                | StepKind::DropForeignKey
                | StepKind::DropTrigger
        )
    }

    /// True when the SQL is a comment-only placeholder deferring the real
    /// work to a table recreation
    pub fn is_placeholder(&self) -> bool {
        self.sql.trim_start().starts_with("--")
    }

    /// Human-readable description of the step
    pub fn description(&self) -> String {
        let object = self.object.as_deref().unwrap_or("");
        match self.kind {
            StepKind::CreateTable => format!("Create table {}", self.table),
            StepKind::DropTable => format!("Drop table {}", self.table),
            StepKind::AddColumn => format!("Add column {} to {}", object, self.table),
            StepKind::DropColumn => format!("Drop column {} from {}", object, self.table),
            StepKind::ModifyColumn => {
                if object.is_empty() {
                    format!("Recreate table {}", self.table)
                } else {
                    format!("Modify column {} in {}", object, self.table)
                }
            }
            StepKind::CreateIndex => format!("Create index {} on {}", object, self.table),
            StepKind::DropIndex => format!("Drop index {} from {}", object, self.table),
            StepKind::AddForeignKey => format!("Add foreign key {} on {}", object, self.table),
            StepKind::DropForeignKey => {
                format!("Drop foreign key {} from {}", object, self.table)
            }
            StepKind::CreateTrigger => format!("Create trigger {} on {}", object, self.table),
            StepKind::DropTrigger => format!("Drop trigger {} from {}", object, self.table),
        }
    }
}

/// The ordered statement sequence that rebuilds a table when a change
/// cannot be expressed with ALTER TABLE.
///
/// Kept as an explicit unit so an executor can wrap the whole sequence
/// in one transaction instead of inferring boundaries from comments.
/// The copy step selects the target column names verbatim; every one of
/// them must already exist in the source table under the same name
/// (renames are not reconciled).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecreationPlan {
    pub table: String,
    pub statements: Vec<String>,
}

impl RecreationPlan {
    /// Name of the staging table used during recreation
    pub fn temp_table(table: &str) -> String {
        format!("{}_migration_temp", table)
    }

    /// Flattens the sequence into a single SQL block
    pub fn to_sql(&self) -> String {
        self.statements.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn step(kind: StepKind, sql: &str) -> MigrationStep {
        MigrationStep {
            kind,
            sql: sql.to_string(),
            table: "users".to_string(),
            object: Some("email".to_string()),
            risk: RiskLevel::Safe,
            note: None,
        }
    }

    #[test]
    fn destructive_kinds() {
        assert!(step(StepKind::DropTable, "DROP TABLE \"users\";").is_destructive());
        assert!(step(StepKind::DropColumn, "-- placeholder").is_destructive());
        assert!(!step(StepKind::AddColumn, "ALTER TABLE ...").is_destructive());
        assert!(!step(StepKind::CreateIndex, "CREATE INDEX ...").is_destructive());
    }

    #[test]
    fn placeholder_detection() {
        assert!(step(StepKind::DropColumn, "-- cannot drop in place").is_placeholder());
        assert!(!step(StepKind::AddColumn, "ALTER TABLE \"users\" ...").is_placeholder());
    }

    #[test]
    fn recreation_step_description() {
        let mut recreation = step(StepKind::ModifyColumn, "PRAGMA foreign_keys = OFF;");
        recreation.object = None;
        assert_eq!(recreation.description(), "Recreate table users");
        assert_eq!(
            step(StepKind::ModifyColumn, "--").description(),
            "Modify column email in users"
        );
    }

    #[test]
    fn temp_table_naming() {
        assert_eq!(RecreationPlan::temp_table("users"), "users_migration_temp");
    }

    #[test]
    fn risk_levels_are_ordered() {
        assert!(RiskLevel::Safe < RiskLevel::Warning);
        assert!(RiskLevel::Warning < RiskLevel::Danger);
    }

    #[test]
    fn step_kind_tags() {
        assert_eq!(StepKind::CreateTable.as_str(), "create_table");
        assert_eq!(StepKind::DropForeignKey.as_str(), "drop_foreign_key");
    }
}
