//! Builds ordered constraint plans from candidates and audit findings.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::audit::IntegrityFinding;
use crate::error::SubjectFailure;
use crate::inference::CandidateRelationship;

use super::ddl;
use super::{
    CascadeAction, CascadePolicy, ConstraintPlan, IndexImpact, PlanOutcome, RiskAssessment,
    RiskLevel,
};

/// Confidence below this raises implementation risk to at least medium.
const LOW_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Constraint names longer than this get component-truncated.
const MAX_CONSTRAINT_NAME_LEN: usize = 120;

/// Max characters kept per name component when truncating.
const NAME_COMPONENT_LEN: usize = 20;

/// Table-name tokens that suggest a large or hot table.
const LARGE_TABLE_TOKENS: &[&str] = &["transaction", "order", "log"];

/// Source-table tokens selecting `ON DELETE CASCADE`.
const DETAIL_TOKENS: &[&str] = &["detail", "item", "line"];

/// Source-table tokens selecting `ON DELETE SET NULL`.
const AUDIT_TOKENS: &[&str] = &["log", "audit", "history"];

/// Target-table tokens selecting `ON DELETE RESTRICT`.
const LOOKUP_TOKENS: &[&str] = &["lookup", "reference", "type"];

/// Plans foreign-key constraints for audited candidates.
pub struct ConstraintPlanner;

impl ConstraintPlanner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Produces one plan per well-formed candidate, ordered by priority
    /// (descending) with risk as the tiebreaker (ascending).
    ///
    /// `row_counts` maps lowercased table names to their row counts and
    /// drives the index-impact band on each plan; tables without an entry
    /// are treated as empty. Malformed candidates are rejected, not fatal.
    #[must_use]
    pub fn plan(
        &self,
        candidates: &[CandidateRelationship],
        findings: &[IntegrityFinding],
        row_counts: &HashMap<String, u64>,
    ) -> PlanOutcome {
        let mut outcome = PlanOutcome::default();

        for candidate in candidates {
            if !candidate.source.is_complete() || !candidate.target.is_complete() {
                debug!(candidate = %candidate.label(), "rejecting malformed candidate");
                outcome.rejected.push(SubjectFailure {
                    subject: candidate.label(),
                    reason: "candidate is missing a table or column name".to_string(),
                });
                continue;
            }
            let estimated_rows = row_counts
                .get(&candidate.source.table.to_lowercase())
                .copied()
                .unwrap_or(0);
            outcome
                .plans
                .push(self.plan_one(candidate, findings, estimated_rows));
        }

        outcome.plans.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.risk.level.cmp(&b.risk.level))
        });

        info!(
            plans = outcome.plans.len(),
            rejected = outcome.rejected.len(),
            "constraint planning complete"
        );
        outcome
    }

    fn plan_one(
        &self,
        candidate: &CandidateRelationship,
        findings: &[IntegrityFinding],
        estimated_rows: u64,
    ) -> ConstraintPlan {
        let violation_count: u64 = findings
            .iter()
            .filter(|f| f.applies_to(candidate))
            .map(|f| f.count)
            .sum();

        let risk = assess_risk(candidate, violation_count);
        let cascade = select_cascade(candidate);
        let priority = priority_for(candidate.confidence, risk.level, violation_count);

        let name = constraint_name(
            &candidate.source.table,
            &candidate.source.column,
            &candidate.target.table,
        );
        let index_name = index_name(&candidate.source.table, &candidate.source.column);
        let requires_index = true;

        let ddl = ddl::ddl_script(
            &name,
            candidate,
            &cascade,
            priority,
            risk.level,
            requires_index,
            &index_name,
        );
        let rollback = ddl::rollback_script(&name, &candidate.source.table, &index_name);

        ConstraintPlan {
            name,
            relationship: candidate.clone(),
            cascade,
            risk,
            priority,
            requires_index,
            index_name,
            estimated_rows,
            index_impact: IndexImpact::from_rows(estimated_rows),
            ddl,
            rollback,
            violation_count,
        }
    }
}

impl Default for ConstraintPlanner {
    fn default() -> Self {
        Self::new()
    }
}

fn assess_risk(candidate: &CandidateRelationship, violation_count: u64) -> RiskAssessment {
    let mut level = RiskLevel::Low;
    let mut factors = Vec::new();
    let mut mitigations = Vec::new();

    if violation_count > 0 {
        level = RiskLevel::High;
        factors.push(format!("{violation_count} orphaned records require cleanup"));
        mitigations.push("Clean up orphaned records before constraint creation".to_string());
        mitigations.push("Backup affected tables before cleanup".to_string());
    }

    if candidate.confidence < LOW_CONFIDENCE_THRESHOLD {
        level = level.max(RiskLevel::Medium);
        factors.push("Low confidence in relationship accuracy".to_string());
        mitigations.push("Manual review of relationship accuracy recommended".to_string());
        mitigations.push("Test constraint on subset of data first".to_string());
    }

    if is_large_table(&candidate.source.table) {
        level = level.max(RiskLevel::Medium);
        factors.push("Large table - constraint creation may take significant time".to_string());
        mitigations.push("Schedule constraint creation during maintenance window".to_string());
        mitigations.push("Monitor system resources during creation".to_string());
    }

    RiskAssessment {
        level,
        factors,
        mitigations,
    }
}

/// Whether a table name suggests a large or hot table.
///
/// Matches on word components rather than raw substrings so that a plain
/// `Orders` table is not penalized while `OrderDetails` or
/// `transaction_log` is.
fn is_large_table(table: &str) -> bool {
    name_tokens(table)
        .iter()
        .any(|token| LARGE_TABLE_TOKENS.contains(&token.as_str()))
}

/// Splits an identifier into lowercase word tokens at delimiters and
/// camelCase boundaries.
fn name_tokens(name: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in name.chars() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            prev_lower = false;
        } else if ch.is_uppercase() && prev_lower {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            current.push(ch.to_ascii_lowercase());
            prev_lower = false;
        } else {
            prev_lower = ch.is_lowercase();
            current.push(ch.to_ascii_lowercase());
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn select_cascade(candidate: &CandidateRelationship) -> CascadePolicy {
    let source_table = candidate.source.table.to_lowercase();
    let target_table = candidate.target.table.to_lowercase();

    let (on_delete, reasoning) = if DETAIL_TOKENS.iter().any(|t| source_table.contains(t)) {
        (
            CascadeAction::Cascade,
            "Child records should be deleted when parent is deleted",
        )
    } else if AUDIT_TOKENS.iter().any(|t| source_table.contains(t)) {
        (
            CascadeAction::SetNull,
            "Audit records should be preserved with NULL reference",
        )
    } else if LOOKUP_TOKENS.iter().any(|t| target_table.contains(t)) {
        (
            CascadeAction::Restrict,
            "Lookup values should not be deleted while referenced",
        )
    } else {
        (
            CascadeAction::Restrict,
            "Prevent accidental deletion of referenced records",
        )
    };

    CascadePolicy {
        on_delete,
        on_update: CascadeAction::Cascade,
        reasoning: reasoning.to_string(),
    }
}

fn priority_for(confidence: f64, risk: RiskLevel, violation_count: u64) -> u8 {
    let mut priority: i32 = 5;

    if confidence >= 0.8 {
        priority += 2;
    } else if confidence >= 0.6 {
        priority += 1;
    }

    match risk {
        RiskLevel::High => priority -= 2,
        RiskLevel::Medium => priority -= 1,
        RiskLevel::Low => {}
    }

    if violation_count == 0 {
        priority += 1;
    }

    priority.clamp(1, 10) as u8
}

/// Deterministic constraint name for a planned relationship.
///
/// Long names are rebuilt from truncated components so the result stays
/// well under common identifier limits.
#[must_use]
pub fn constraint_name(source_table: &str, source_column: &str, target_table: &str) -> String {
    let name = format!("FK_{source_table}_{source_column}_{target_table}");
    if name.len() <= MAX_CONSTRAINT_NAME_LEN {
        return name;
    }
    format!(
        "FK_{}_{}_{}",
        truncate(source_table),
        truncate(source_column),
        truncate(target_table)
    )
}

#[must_use]
pub fn index_name(table: &str, column: &str) -> String {
    format!("IX_{table}_{column}")
}

fn truncate(component: &str) -> String {
    component.chars().take(NAME_COMPONENT_LEN).collect()
}
