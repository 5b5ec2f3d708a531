//! Impact reporting.
//!
//! Rolls constraint plans, audit findings, and recorded failures into a
//! single stakeholder-facing [`ImpactReport`]: overall risk, change counts,
//! effort estimate, phased timeline, risk matrix, and the go/no-go
//! recommendation. The report is rebuilt wholesale on every run and never
//! mutated in place.

mod aggregator;
mod render;
mod templates;

pub use aggregator::ImpactAggregator;
pub use render::render_text;
pub use templates::{implementation_timeline, risk_matrix, KEY_BENEFITS, SUCCESS_CRITERIA};

use serde::{Deserialize, Serialize};

use crate::audit::IntegrityFinding;
use crate::error::SubjectFailure;
use crate::planner::{ConstraintPlan, RiskLevel};

/// Overall risk rating for the whole change set.
///
/// `Unknown` is reserved for runs that produced no plans and no findings
/// but did record failures, so an empty result is never mistaken for a
/// clean one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallRisk {
    Unknown,
    Low,
    Medium,
    High,
}

impl std::fmt::Display for OverallRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "UNKNOWN"),
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// How many changes of each kind the run proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChangeCounts {
    pub total: usize,
    pub fk_changes: usize,
    pub integrity_fixes: usize,
    pub performance_optimizations: usize,
}

/// Plan counts per risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl RiskDistribution {
    #[must_use]
    pub fn tally(plans: &[ConstraintPlan]) -> Self {
        let mut dist = Self::default();
        for plan in plans {
            match plan.risk.level {
                RiskLevel::High => dist.high += 1,
                RiskLevel::Medium => dist.medium += 1,
                RiskLevel::Low => dist.low += 1,
            }
        }
        dist
    }
}

/// Implementation effort estimate derived from the change counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffortEstimate {
    pub total_hours: u64,
    /// Working days, rounded to one decimal, never below `1.0`.
    pub total_days: f64,
    pub fk_hours: u64,
    pub integrity_hours: u64,
    pub performance_hours: u64,
    pub team_size: String,
}

/// One phase of the fixed implementation timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePhase {
    pub phase: u8,
    pub name: String,
    pub duration: String,
    pub activities: Vec<String>,
    pub risk: RiskLevel,
    pub dependencies: Vec<String>,
}

/// The phased implementation timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub phases: Vec<TimelinePhase>,
    pub total_duration: String,
    pub critical_path: Vec<String>,
}

/// One row of the static risk matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMatrixEntry {
    pub category: String,
    pub probability: RiskLevel,
    pub impact: RiskLevel,
    pub score: RiskLevel,
    pub mitigation: String,
    pub contingency: String,
}

/// Final go/no-go decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Go,
    ConditionalGo,
    NoGo,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Go => write!(f, "GO"),
            Self::ConditionalGo => write!(f, "CONDITIONAL GO"),
            Self::NoGo => write!(f, "NO-GO"),
        }
    }
}

/// The recommendation block of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub decision: Decision,
    pub reasoning: String,
    pub alternative: String,
}

/// Stakeholder-facing summary header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub title: String,
    pub scope: String,
    pub duration: String,
    pub key_benefits: Vec<String>,
    pub success_criteria: Vec<String>,
}

/// The aggregate change-impact report for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    pub overall_risk: OverallRisk,
    pub changes: ChangeCounts,
    pub risk_distribution: RiskDistribution,
    pub effort: EffortEstimate,
    pub timeline: Timeline,
    pub risk_matrix: Vec<RiskMatrixEntry>,
    pub summary: ExecutiveSummary,
    pub recommendation: Recommendation,
    /// Plans in implementation order, DDL included.
    pub plans: Vec<ConstraintPlan>,
    pub findings: Vec<IntegrityFinding>,
    /// Subjects skipped along the way.
    pub failures: Vec<SubjectFailure>,
}
