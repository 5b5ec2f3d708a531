//! Static report scaffolding.
//!
//! The timeline phases and risk matrix are fixed templates, not derived
//! from plan data. Consumers key off the phase names and durations, so the
//! text here must stay stable.

use crate::planner::RiskLevel;

use super::{RiskMatrixEntry, Timeline, TimelinePhase};

pub const KEY_BENEFITS: &[&str] = &[
    "Improved data integrity and consistency",
    "Enhanced query performance through proper indexing",
    "Reduced risk of orphaned records",
    "Better database documentation and relationships",
    "Improved application reliability",
];

pub const SUCCESS_CRITERIA: &[&str] = &[
    "All high-confidence FK constraints implemented",
    "Zero data integrity violations",
    "No performance degradation",
    "Successful application compatibility testing",
];

fn phase(
    number: u8,
    name: &str,
    duration: &str,
    activities: &[&str],
    risk: RiskLevel,
    dependencies: &[&str],
) -> TimelinePhase {
    TimelinePhase {
        phase: number,
        name: name.to_string(),
        duration: duration.to_string(),
        activities: activities.iter().map(|a| a.to_string()).collect(),
        risk,
        dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
    }
}

/// The fixed five-phase implementation timeline.
#[must_use]
pub fn implementation_timeline() -> Timeline {
    Timeline {
        phases: vec![
            phase(
                1,
                "Data Cleanup and Preparation",
                "1-2 weeks",
                &[
                    "Backup all affected tables",
                    "Clean up orphaned records",
                    "Resolve duplicate data issues",
                    "Validate data integrity",
                ],
                RiskLevel::Medium,
                &[],
            ),
            phase(
                2,
                "Index Creation",
                "3-5 days",
                &[
                    "Create missing indexes on FK columns",
                    "Monitor index creation performance",
                    "Validate index effectiveness",
                ],
                RiskLevel::Low,
                &["Phase 1 completion"],
            ),
            phase(
                3,
                "Foreign Key Implementation",
                "1-2 weeks",
                &[
                    "Implement high-confidence FK constraints",
                    "Test constraint functionality",
                    "Monitor application performance",
                    "Implement medium-confidence constraints",
                ],
                RiskLevel::High,
                &["Phase 1 and 2 completion"],
            ),
            phase(
                4,
                "Performance Optimization",
                "3-5 days",
                &[
                    "Optimize query patterns",
                    "Fine-tune indexes",
                    "Monitor performance improvements",
                ],
                RiskLevel::Low,
                &["Phase 3 completion"],
            ),
            phase(
                5,
                "Monitoring and Validation",
                "1 week",
                &[
                    "Set up monitoring alerts",
                    "Validate all constraints",
                    "Performance testing",
                    "Documentation updates",
                ],
                RiskLevel::Low,
                &["All previous phases"],
            ),
        ],
        total_duration: "6-10 weeks".to_string(),
        critical_path: vec!["Phase 1".to_string(), "Phase 3".to_string()],
    }
}

fn matrix_entry(
    category: &str,
    probability: RiskLevel,
    impact: RiskLevel,
    score: RiskLevel,
    mitigation: &str,
    contingency: &str,
) -> RiskMatrixEntry {
    RiskMatrixEntry {
        category: category.to_string(),
        probability,
        impact,
        score,
        mitigation: mitigation.to_string(),
        contingency: contingency.to_string(),
    }
}

/// The static five-row risk matrix.
#[must_use]
pub fn risk_matrix() -> Vec<RiskMatrixEntry> {
    vec![
        matrix_entry(
            "Data Loss",
            RiskLevel::Low,
            RiskLevel::High,
            RiskLevel::Medium,
            "Comprehensive backups before any changes",
            "Full database restore from backup",
        ),
        matrix_entry(
            "Application Downtime",
            RiskLevel::Medium,
            RiskLevel::High,
            RiskLevel::High,
            "Implement during maintenance windows",
            "Rollback scripts and constraint removal",
        ),
        matrix_entry(
            "Performance Degradation",
            RiskLevel::Low,
            RiskLevel::Medium,
            RiskLevel::Low,
            "Thorough testing and monitoring",
            "Constraint disabling and index optimization",
        ),
        matrix_entry(
            "Constraint Violations",
            RiskLevel::Medium,
            RiskLevel::Medium,
            RiskLevel::Medium,
            "Data cleanup before constraint creation",
            "Constraint modification or removal",
        ),
        matrix_entry(
            "Implementation Delays",
            RiskLevel::Medium,
            RiskLevel::Low,
            RiskLevel::Low,
            "Phased approach with clear milestones",
            "Scope reduction and priority adjustment",
        ),
    ]
}
