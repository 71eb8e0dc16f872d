//! Migration statistics
//!
//! Aggregates a step list into counts by risk level and step kind.
//! Single pass, no ordering sensitivity.

use crate::migration::models::{MigrationStep, RiskLevel, StepKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary statistics for a migration step list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationStats {
    pub safe: usize,
    pub warning: usize,
    pub danger: usize,
    pub total: usize,
    pub by_type: BTreeMap<StepKind, usize>,
}

impl MigrationStats {
    /// Tally a step list
    pub fn from_steps(steps: &[MigrationStep]) -> Self {
        let mut stats = Self::default();
        for step in steps {
            match step.risk {
                RiskLevel::Safe => stats.safe += 1,
                RiskLevel::Warning => stats.warning += 1,
                RiskLevel::Danger => stats.danger += 1,
            }
            *stats.by_type.entry(step.kind).or_insert(0) += 1;
            stats.total += 1;
        }
        stats
    }

    /// Highest risk level present in the tallied steps
    pub fn overall_risk(&self) -> RiskLevel {
        if self.danger > 0 {
            RiskLevel::Danger
        } else if self.warning > 0 {
            RiskLevel::Warning
        } else {
            RiskLevel::Safe
        }
    }
}
