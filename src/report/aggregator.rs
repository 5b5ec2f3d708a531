//! Rolls planning and audit output into the final impact report.

use tracing::info;

use crate::audit::IntegrityFinding;
use crate::config::AggregateConfig;
use crate::error::SubjectFailure;
use crate::planner::{ConstraintPlan, RiskLevel};

use super::templates;
use super::{
    ChangeCounts, Decision, EffortEstimate, ExecutiveSummary, ImpactReport, OverallRisk,
    Recommendation, RiskDistribution,
};

const HOURS_PER_FK: u64 = 2;
const HOURS_PER_INTEGRITY_FIX: u64 = 4;
const HOURS_PER_OPTIMIZATION: u64 = 1;
const WORKING_HOURS_PER_DAY: f64 = 8.0;

/// Builds an [`ImpactReport`] from the outputs of the earlier stages.
///
/// Aggregation is infallible: even an empty or failure-ridden run yields a
/// report, with the risk rating and recommendation reflecting how little
/// was learned.
pub struct ImpactAggregator {
    config: AggregateConfig,
}

impl ImpactAggregator {
    #[must_use]
    pub fn new(config: AggregateConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn aggregate(
        &self,
        plans: &[ConstraintPlan],
        findings: &[IntegrityFinding],
        failures: &[SubjectFailure],
    ) -> ImpactReport {
        let changes = count_changes(plans, findings);
        let distribution = RiskDistribution::tally(plans);
        let overall_risk = self.overall_risk(plans, findings, failures, &distribution);
        let effort = estimate_effort(&changes);
        let recommendation = self.recommend(&changes, &distribution, plans.len(), overall_risk);

        info!(
            total_changes = changes.total,
            risk = %overall_risk,
            decision = %recommendation.decision,
            "impact aggregation complete"
        );

        let timeline = templates::implementation_timeline();
        let summary = ExecutiveSummary {
            title: "Database Foreign Key Analysis and Remediation".to_string(),
            scope: format!("{} total improvements identified", changes.total),
            duration: timeline.total_duration.clone(),
            key_benefits: templates::KEY_BENEFITS.iter().map(|b| b.to_string()).collect(),
            success_criteria: templates::SUCCESS_CRITERIA
                .iter()
                .map(|c| c.to_string())
                .collect(),
        };

        ImpactReport {
            overall_risk,
            changes,
            risk_distribution: distribution,
            effort,
            timeline,
            risk_matrix: templates::risk_matrix(),
            summary,
            recommendation,
            plans: plans.to_vec(),
            findings: findings.to_vec(),
            failures: failures.to_vec(),
        }
    }

    fn overall_risk(
        &self,
        plans: &[ConstraintPlan],
        findings: &[IntegrityFinding],
        failures: &[SubjectFailure],
        distribution: &RiskDistribution,
    ) -> OverallRisk {
        if plans.is_empty() && findings.is_empty() && !failures.is_empty() {
            return OverallRisk::Unknown;
        }
        if distribution.high > 0 {
            return OverallRisk::High;
        }
        if !plans.is_empty()
            && distribution.medium as f64 > plans.len() as f64 * self.config.medium_risk_ratio
        {
            return OverallRisk::Medium;
        }
        OverallRisk::Low
    }

    fn recommend(
        &self,
        changes: &ChangeCounts,
        distribution: &RiskDistribution,
        plan_count: usize,
        overall_risk: OverallRisk,
    ) -> Recommendation {
        if changes.total == 0 {
            return Recommendation {
                decision: Decision::NoGo,
                reasoning: "No significant improvements identified".to_string(),
                alternative: "Continue monitoring for future opportunities".to_string(),
            };
        }
        if distribution.high as f64 > plan_count as f64 * self.config.conditional_go_ratio {
            return Recommendation {
                decision: Decision::ConditionalGo,
                reasoning: "High number of risky changes require careful evaluation".to_string(),
                alternative: "Implement only low and medium risk changes initially".to_string(),
            };
        }
        if overall_risk == OverallRisk::Low {
            return Recommendation {
                decision: Decision::Go,
                reasoning: "Low risk with clear benefits justify implementation".to_string(),
                alternative: "Proceed with full implementation as planned".to_string(),
            };
        }
        Recommendation {
            decision: Decision::Go,
            reasoning: "Benefits outweigh risks with proper mitigation".to_string(),
            alternative: "Proceed with phased implementation approach".to_string(),
        }
    }
}

fn count_changes(plans: &[ConstraintPlan], findings: &[IntegrityFinding]) -> ChangeCounts {
    let fk_changes = plans.len();
    let integrity_fixes = findings.iter().filter(|f| f.count > 0).count();
    let performance_optimizations = plans.iter().filter(|p| p.requires_index).count();
    ChangeCounts {
        total: fk_changes + integrity_fixes + performance_optimizations,
        fk_changes,
        integrity_fixes,
        performance_optimizations,
    }
}

fn estimate_effort(changes: &ChangeCounts) -> EffortEstimate {
    let fk_hours = changes.fk_changes as u64 * HOURS_PER_FK;
    let integrity_hours = changes.integrity_fixes as u64 * HOURS_PER_INTEGRITY_FIX;
    let performance_hours = changes.performance_optimizations as u64 * HOURS_PER_OPTIMIZATION;
    let total_hours = fk_hours + integrity_hours + performance_hours;

    let days = (total_hours as f64 / WORKING_HOURS_PER_DAY).max(1.0);
    let total_days = (days * 10.0).round() / 10.0;

    let team_size = if total_days <= 5.0 {
        "Small team (1-2 DBAs)"
    } else {
        "Medium team (2-3 DBAs)"
    };

    EffortEstimate {
        total_hours,
        total_days,
        fk_hours,
        integrity_hours,
        performance_hours,
        team_size: team_size.to_string(),
    }
}
