//! End-to-end analysis pipeline.
//!
//! Stages run in a fixed order: schema snapshot, relationship inference,
//! integrity audit, constraint planning, impact aggregation. A failed
//! initial metadata listing or an unrecoverable metadata outage aborts a
//! run; per-subject failures degrade to partial results with recorded
//! failures, and a report is produced regardless.

use std::collections::{HashMap, HashSet};

use tracing::{info, instrument, warn};

use crate::audit::{AuditOutcome, IntegrityAuditor};
use crate::config::AnalyzerConfig;
use crate::error::{PipelineError, SubjectFailure};
use crate::inference::{CandidateRelationship, InferenceEngine};
use crate::metadata::{timed, MetadataProvider};
use crate::planner::{ConstraintPlan, ConstraintPlanner};
use crate::report::{ImpactAggregator, ImpactReport};

/// Everything a pipeline run produced, stage by stage.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub candidates: Vec<CandidateRelationship>,
    pub audit: AuditOutcome,
    pub plans: Vec<ConstraintPlan>,
    pub report: ImpactReport,
}

/// Drives the full analysis against one metadata provider.
pub struct Pipeline<'a> {
    provider: &'a dyn MetadataProvider,
    config: AnalyzerConfig,
}

impl<'a> Pipeline<'a> {
    #[must_use]
    pub fn new(provider: &'a dyn MetadataProvider, config: AnalyzerConfig) -> Self {
        Self { provider, config }
    }

    /// Run every stage and return the per-stage outputs.
    ///
    /// Fails if the schema or existing-constraint listing cannot be fetched
    /// at all, or if the metadata source goes down mid-audit.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<PipelineOutcome, PipelineError> {
        let timeout = self.config.queries.timeout();

        let snapshot = timed(timeout, self.provider.schema_snapshot()).await?;
        let existing = timed(timeout, self.provider.existing_foreign_keys()).await?;
        info!(
            tables = snapshot.tables.len(),
            existing_fks = existing.len(),
            "schema snapshot loaded"
        );

        let candidates = InferenceEngine::new().infer(&snapshot, &existing);

        let auditor = IntegrityAuditor::new(self.provider, &self.config);
        let audit = auditor
            .audit_all(&existing, &candidates, &snapshot.tables)
            .await?;

        let (row_counts, count_failures) = self.source_row_counts(&candidates).await?;

        let plan_outcome =
            ConstraintPlanner::new().plan(&candidates, &audit.findings, &row_counts);

        let mut failures: Vec<SubjectFailure> = audit.skipped.clone();
        failures.extend(count_failures);
        failures.extend(plan_outcome.rejected.iter().cloned());

        let report = ImpactAggregator::new(self.config.aggregate.clone()).aggregate(
            &plan_outcome.plans,
            &audit.findings,
            &failures,
        );

        Ok(PipelineOutcome {
            candidates,
            audit,
            plans: plan_outcome.plans,
            report,
        })
    }

    /// Fetch row counts for each distinct candidate source table, keyed by
    /// lowercased name.
    ///
    /// Recoverable failures leave the table out of the map (its plans fall
    /// back to a minimal index impact) and are recorded as skips.
    async fn source_row_counts(
        &self,
        candidates: &[CandidateRelationship],
    ) -> Result<(HashMap<String, u64>, Vec<SubjectFailure>), PipelineError> {
        let timeout = self.config.queries.timeout();
        let mut counts = HashMap::new();
        let mut skipped = Vec::new();
        let mut attempted = HashSet::new();

        for candidate in candidates {
            let table = &candidate.source.table;
            let key = table.to_lowercase();
            if !attempted.insert(key.clone()) {
                continue;
            }
            match timed(timeout, self.provider.row_count(table)).await {
                Ok(rows) => {
                    counts.insert(key, rows);
                }
                Err(err) if err.is_recoverable() => {
                    warn!(table = %table, error = %err, "row count skipped");
                    skipped.push(SubjectFailure::new(table.clone(), err.to_string()));
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok((counts, skipped))
    }
}

/// Convenience entry point: run the whole pipeline and return the report.
pub async fn run_pipeline(
    provider: &dyn MetadataProvider,
    config: AnalyzerConfig,
) -> Result<ImpactReport, PipelineError> {
    let pipeline = Pipeline::new(provider, config);
    Ok(pipeline.run().await?.report)
}
