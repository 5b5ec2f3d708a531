//! Data integrity auditing.
//!
//! The auditor checks declared constraints and inferred candidates against
//! live data: orphaned rows, duplicate key candidates, and anomalous null
//! ratios. It is a pure read/report stage; it never mutates schema or
//! candidate state. A failed query for one subject is recorded as a soft
//! failure and the audit continues.

mod auditor;

pub use auditor::IntegrityAuditor;

use serde::{Deserialize, Serialize};

use crate::error::SubjectFailure;
use crate::inference::{CandidateKey, CandidateRelationship};
use crate::metadata::ColumnRef;

/// Severity of an integrity finding.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Severity {
    /// Subject checked clean.
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl Severity {
    /// Classify severity from a violation count.
    #[must_use]
    pub fn from_count(count: u64) -> Self {
        match count {
            0 => Self::None,
            1..=10 => Self::Low,
            11..=100 => Self::Medium,
            _ => Self::High,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "NONE"),
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// What kind of integrity problem a finding describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FindingKind {
    /// Orphaned rows under a declared foreign-key constraint.
    FkViolation,
    /// Orphaned rows under an inferred candidate relationship.
    OrphanedRecords,
    /// Duplicate values in an identifier-like column.
    DuplicateKey,
    /// Null ratio above the configured threshold in a key column.
    ExcessiveNulls,
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FkViolation => write!(f, "FK violation"),
            Self::OrphanedRecords => write!(f, "orphaned records"),
            Self::DuplicateKey => write!(f, "duplicate key"),
            Self::ExcessiveNulls => write!(f, "excessive nulls"),
        }
    }
}

/// One integrity problem (or clean verdict) for one subject.
///
/// Relationship-shaped findings carry both endpoints; column-shaped findings
/// (duplicates, nulls) carry only `source`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityFinding {
    /// The audited column (child side for relationship checks).
    pub source: ColumnRef,
    /// The referenced column, when the subject is a relationship.
    pub target: Option<ColumnRef>,
    pub kind: FindingKind,
    /// Violation count (orphans, surplus duplicates, or nulls).
    pub count: u64,
    pub severity: Severity,
    /// Human-readable impact statement.
    pub detail: String,
}

impl IntegrityFinding {
    /// Whether this finding concerns the given candidate.
    ///
    /// Relationship findings must match both endpoints; column findings
    /// match either endpoint of the candidate (a duplicate-ridden target key
    /// or a null-heavy source column both affect the same plan).
    #[must_use]
    pub fn applies_to(&self, candidate: &CandidateRelationship) -> bool {
        let key = CandidateKey::from_candidate(candidate);
        match &self.target {
            Some(target) => {
                self.source.table.to_lowercase() == key.source_table
                    && self.source.column.to_lowercase() == key.source_column
                    && target.table.to_lowercase() == key.target_table
                    && target.column.to_lowercase() == key.target_column
            }
            None => {
                let table = self.source.table.to_lowercase();
                let column = self.source.column.to_lowercase();
                (table == key.source_table && column == key.source_column)
                    || (table == key.target_table && column == key.target_column)
            }
        }
    }
}

/// Result of an audit pass: findings plus the subjects that could not be
/// checked. Skipped subjects are never folded into counts.
#[derive(Debug, Clone, Default)]
pub struct AuditOutcome {
    pub findings: Vec<IntegrityFinding>,
    pub skipped: Vec<SubjectFailure>,
}

impl AuditOutcome {
    /// Fold another outcome into this one.
    pub fn merge(&mut self, other: AuditOutcome) {
        self.findings.extend(other.findings);
        self.skipped.extend(other.skipped);
    }

    /// Findings with a nonzero violation count.
    pub fn violations(&self) -> impl Iterator<Item = &IntegrityFinding> {
        self.findings.iter().filter(|f| f.count > 0)
    }
}
