//! Constraint planning.
//!
//! Converts scored candidates into concrete, implementation-ordered
//! constraint plans: cascade policy, risk assessment, priority, naming,
//! supporting indexes, and the DDL/rollback script pair.

mod builder;
mod ddl;

pub use builder::ConstraintPlanner;
pub use ddl::{ddl_script, rollback_script};

use serde::{Deserialize, Serialize};

use crate::error::SubjectFailure;
use crate::inference::CandidateRelationship;

/// Risk classification for implementing one constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Risk assessment with the factors that drove it and suggested mitigations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub factors: Vec<String>,
    pub mitigations: Vec<String>,
}

/// Referential action attached to a foreign-key constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CascadeAction {
    Cascade,
    SetNull,
    Restrict,
}

impl std::fmt::Display for CascadeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cascade => write!(f, "CASCADE"),
            Self::SetNull => write!(f, "SET NULL"),
            Self::Restrict => write!(f, "RESTRICT"),
        }
    }
}

/// Estimated payoff of indexing the FK source column, banded by table size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexImpact {
    Minimal,
    Low,
    Medium,
    High,
}

impl IndexImpact {
    /// Band a source-table row count into an impact level.
    #[must_use]
    pub fn from_rows(rows: u64) -> Self {
        match rows {
            r if r > 100_000 => Self::High,
            r if r > 10_000 => Self::Medium,
            r if r > 1_000 => Self::Low,
            _ => Self::Minimal,
        }
    }
}

impl std::fmt::Display for IndexImpact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minimal => write!(f, "MINIMAL"),
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// On-delete/on-update behavior for a planned constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadePolicy {
    pub on_delete: CascadeAction,
    pub on_update: CascadeAction,
    /// Why this policy was chosen.
    pub reasoning: String,
}

/// A complete, ready-to-review constraint plan for one candidate.
///
/// Owned by the planner; downstream stages consume it read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintPlan {
    /// Deterministic constraint name.
    pub name: String,
    /// The candidate this plan implements.
    pub relationship: CandidateRelationship,
    pub cascade: CascadePolicy,
    pub risk: RiskAssessment,
    /// Implementation priority, clamped to `1..=10` (higher is sooner).
    pub priority: u8,
    /// FK source columns are indexed for join performance.
    pub requires_index: bool,
    /// Name of the supporting index.
    pub index_name: String,
    /// Source-table row count at planning time; `0` when unknown.
    pub estimated_rows: u64,
    /// Expected payoff of the supporting index for a table this size.
    pub index_impact: IndexImpact,
    /// Constraint-creation script.
    pub ddl: String,
    /// Constraint-removal script.
    pub rollback: String,
    /// Total associated violation count from the audit.
    pub violation_count: u64,
}

/// Result of a planning pass: ordered plans plus rejected candidates.
#[derive(Debug, Clone, Default)]
pub struct PlanOutcome {
    /// Plans in authoritative implementation order.
    pub plans: Vec<ConstraintPlan>,
    /// Malformed candidates, excluded but recorded.
    pub rejected: Vec<SubjectFailure>,
}
