//! SQL script formatter
//!
//! Renders an ordered step list into a single annotated script. Steps are
//! grouped by owning table in first-seen order, so a table's statements
//! stay together even when generation interleaved tables.

use crate::migration::models::MigrationStep;
use chrono::Utc;
use std::collections::HashMap;

/// Options for script rendering
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Display name for the source database
    pub source_name: String,
    /// Display name for the target database
    pub target_name: String,
    /// Emit the header, per-table banners, and step notes
    pub include_comments: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            source_name: "source".to_string(),
            target_name: "target".to_string(),
            include_comments: true,
        }
    }
}

/// Renders a migration step list as one SQL script.
///
/// With comments enabled the header carries a generation timestamp, so
/// the output is not byte-stable across runs.
pub fn format_migration_as_sql(steps: &[MigrationStep], options: &FormatOptions) -> String {
    let mut order: Vec<&str> = Vec::new();
    let mut grouped: HashMap<&str, Vec<&MigrationStep>> = HashMap::new();
    for step in steps {
        let entry = grouped.entry(step.table.as_str()).or_default();
        if entry.is_empty() {
            order.push(step.table.as_str());
        }
        entry.push(step);
    }

    let mut script = String::new();
    if options.include_comments {
        script.push_str(&format!(
            "-- Migration script: {} -> {}\n",
            options.source_name, options.target_name
        ));
        script.push_str(&format!(
            "-- Generated at {}\n",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        ));
        script.push_str("-- Review every statement and back up the database before applying.\n\n");
    }

    let mut sections: Vec<String> = Vec::new();
    for table in order {
        let mut blocks: Vec<String> = Vec::new();
        if options.include_comments {
            blocks.push(format!("-- Table: {}", table));
        }
        for step in &grouped[table] {
            let mut block = String::new();
            if options.include_comments {
                if let Some(ref note) = step.note {
                    block.push_str(&format!("-- {}\n", note));
                }
            }
            block.push_str(&step.sql);
            blocks.push(block);
        }
        sections.push(blocks.join("\n\n"));
    }
    script.push_str(&sections.join("\n\n"));
    script.push('\n');
    script
}
