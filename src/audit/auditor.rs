//! Audit execution against the metadata provider.

use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use super::{AuditOutcome, FindingKind, IntegrityFinding, Severity};
use crate::config::AnalyzerConfig;
use crate::error::{MetadataResult, SubjectFailure};
use crate::inference::CandidateRelationship;
use crate::metadata::{self, ColumnRef, ExistingForeignKey, MetadataProvider, TableSchema};

/// Identifier-like column names, eligible for the duplicate scan.
static ID_COLUMN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)id").unwrap());

/// One audit unit: a subject label plus the query that checks it.
type Subject<'a> = (String, BoxFuture<'a, MetadataResult<Option<IntegrityFinding>>>);

/// Audits declared constraints and inferred candidates against live data.
///
/// All checks are independent reads. Subjects are queried with bounded
/// concurrency and results are re-sorted afterwards, so output order never
/// depends on query completion order.
pub struct IntegrityAuditor<'a> {
    provider: &'a dyn MetadataProvider,
    config: &'a AnalyzerConfig,
}

impl<'a> IntegrityAuditor<'a> {
    pub fn new(provider: &'a dyn MetadataProvider, config: &'a AnalyzerConfig) -> Self {
        Self { provider, config }
    }

    /// Check declared foreign-key constraints for orphaned rows.
    ///
    /// Emits one finding per constraint, including clean (zero-count) ones,
    /// so downstream consumers see a verdict for every subject.
    pub async fn audit_existing(
        &self,
        constraints: &[ExistingForeignKey],
    ) -> MetadataResult<AuditOutcome> {
        let subjects: Vec<Subject<'a>> = constraints
            .iter()
            .map(|fk| {
                let label = format!("{} -> {}", fk.source, fk.target);
                let source = fk.source.clone();
                let target = fk.target.clone();
                let name = fk.constraint_name.clone();
                let provider = self.provider;
                let timeout = self.config.queries.timeout();
                let fut = async move {
                    let count = metadata::timed(
                        timeout,
                        provider.count_orphans(
                            &target.table,
                            &target.column,
                            &source.table,
                            &source.column,
                        ),
                    )
                    .await?;
                    let detail = format!(
                        "{count} orphaned records violating constraint {name} on {source}"
                    );
                    Ok(Some(IntegrityFinding {
                        source,
                        target: Some(target),
                        kind: FindingKind::FkViolation,
                        count,
                        severity: Severity::from_count(count),
                        detail,
                    }))
                }
                .boxed();
                (label, fut)
            })
            .collect();

        let outcome = self.run_subjects(subjects).await?;
        info!(
            constraints = constraints.len(),
            violations = outcome.violations().count(),
            "existing-constraint audit complete"
        );
        Ok(outcome)
    }

    /// Check inferred candidates for orphaned rows that would block the
    /// constraint. One finding per candidate, zero counts included.
    pub async fn audit_candidates(
        &self,
        candidates: &[CandidateRelationship],
    ) -> MetadataResult<AuditOutcome> {
        let subjects: Vec<Subject<'a>> = candidates
            .iter()
            .map(|candidate| {
                let label = candidate.label();
                let source = candidate.source.clone();
                let target = candidate.target.clone();
                let provider = self.provider;
                let timeout = self.config.queries.timeout();
                let fut = async move {
                    let count = metadata::timed(
                        timeout,
                        provider.count_orphans(
                            &target.table,
                            &target.column,
                            &source.table,
                            &source.column,
                        ),
                    )
                    .await?;
                    let detail = format!(
                        "{count} records in {} reference non-existent {} records",
                        source.table, target.table
                    );
                    Ok(Some(IntegrityFinding {
                        source,
                        target: Some(target),
                        kind: FindingKind::OrphanedRecords,
                        count,
                        severity: Severity::from_count(count),
                        detail,
                    }))
                }
                .boxed();
                (label, fut)
            })
            .collect();

        let outcome = self.run_subjects(subjects).await?;
        info!(
            candidates = candidates.len(),
            violations = outcome.violations().count(),
            "candidate audit complete"
        );
        Ok(outcome)
    }

    /// Scan identifier-like columns for duplicate values.
    ///
    /// Bounded to the first `max_tables` tables and the first
    /// `max_columns_per_table` identifier-like columns of each, purely for
    /// cost control. Only columns with actual duplicates produce findings.
    pub async fn check_duplicates(&self, tables: &[TableSchema]) -> MetadataResult<AuditOutcome> {
        let limits = &self.config.duplicate_check;
        let mut subjects: Vec<Subject<'a>> = Vec::new();

        for table in tables.iter().take(limits.max_tables) {
            let id_columns = table
                .columns
                .iter()
                .filter(|c| ID_COLUMN.is_match(&c.column))
                .take(limits.max_columns_per_table);

            for column in id_columns {
                let label = column.to_string();
                let column = column.clone();
                let provider = self.provider;
                let timeout = self.config.queries.timeout();
                let fut = async move {
                    let (groups, total_extra) = metadata::timed(
                        timeout,
                        provider.count_duplicates(&column.table, &column.column),
                    )
                    .await?;
                    if total_extra == 0 {
                        return Ok(None);
                    }
                    let detail = format!(
                        "{total_extra} duplicate values across {groups} groups in {column} \
                         could prevent unique constraints"
                    );
                    Ok(Some(IntegrityFinding {
                        source: column,
                        target: None,
                        kind: FindingKind::DuplicateKey,
                        count: total_extra,
                        severity: Severity::from_count(total_extra),
                        detail,
                    }))
                }
                .boxed();
                subjects.push((label, fut));
            }
        }

        self.run_subjects(subjects).await
    }

    /// Check candidate source columns for anomalous null ratios.
    ///
    /// A column is flagged only when the null count is nonzero and the null
    /// percentage exceeds the warn threshold; above the high threshold the
    /// finding is High, otherwise Medium. Columns shared by several
    /// candidates are queried once.
    pub async fn check_nulls(
        &self,
        candidates: &[CandidateRelationship],
    ) -> MetadataResult<AuditOutcome> {
        let mut seen = std::collections::HashSet::new();
        let columns: Vec<ColumnRef> = candidates
            .iter()
            .filter(|c| {
                seen.insert((
                    c.source.table.to_lowercase(),
                    c.source.column.to_lowercase(),
                ))
            })
            .map(|c| c.source.clone())
            .collect();

        let warn_percent = self.config.null_check.warn_percent;
        let high_percent = self.config.null_check.high_percent;

        let subjects: Vec<Subject<'a>> = columns
            .into_iter()
            .map(|column| {
                let label = column.to_string();
                let provider = self.provider;
                let timeout = self.config.queries.timeout();
                let fut = async move {
                    let (null_count, total_count) = metadata::timed(
                        timeout,
                        provider.count_nulls(&column.table, &column.column),
                    )
                    .await?;
                    if null_count == 0 || total_count == 0 {
                        return Ok(None);
                    }
                    let percent = null_count as f64 / total_count as f64 * 100.0;
                    if percent <= warn_percent {
                        return Ok(None);
                    }
                    let severity = if percent > high_percent {
                        Severity::High
                    } else {
                        Severity::Medium
                    };
                    let detail = format!(
                        "{percent:.1}% NULL values in potential FK column {column}"
                    );
                    Ok(Some(IntegrityFinding {
                        source: column,
                        target: None,
                        kind: FindingKind::ExcessiveNulls,
                        count: null_count,
                        severity,
                        detail,
                    }))
                }
                .boxed();
                (label, fut)
            })
            .collect();

        self.run_subjects(subjects).await
    }

    /// Run the full audit: existing constraints, candidates, duplicates,
    /// nulls. Outcomes are merged; findings stay deterministically ordered.
    pub async fn audit_all(
        &self,
        constraints: &[ExistingForeignKey],
        candidates: &[CandidateRelationship],
        tables: &[TableSchema],
    ) -> MetadataResult<AuditOutcome> {
        let mut outcome = self.audit_existing(constraints).await?;
        outcome.merge(self.audit_candidates(candidates).await?);
        outcome.merge(self.check_duplicates(tables).await?);
        outcome.merge(self.check_nulls(candidates).await?);
        sort_findings(&mut outcome.findings);
        Ok(outcome)
    }

    /// Execute subjects with bounded concurrency.
    ///
    /// Recoverable errors become soft skips; an unrecoverable error aborts
    /// the whole check, since every remaining subject would fail the same
    /// way.
    async fn run_subjects(&self, subjects: Vec<Subject<'a>>) -> MetadataResult<AuditOutcome> {
        let cap = self.config.queries.max_concurrent.max(1);

        let results: Vec<(String, MetadataResult<Option<IntegrityFinding>>)> =
            stream::iter(subjects.into_iter().map(|(label, fut)| async move {
                let result = fut.await;
                (label, result)
            }))
            .buffer_unordered(cap)
            .collect()
            .await;

        let mut outcome = AuditOutcome::default();
        for (label, result) in results {
            match result {
                Ok(Some(finding)) => outcome.findings.push(finding),
                Ok(None) => {}
                Err(err) if err.is_recoverable() => {
                    warn!(subject = %label, error = %err, "audit subject skipped");
                    outcome.skipped.push(SubjectFailure::new(label, err.to_string()));
                }
                Err(err) => return Err(err),
            }
        }

        // Completion order is nondeterministic under concurrency.
        sort_findings(&mut outcome.findings);
        outcome
            .skipped
            .sort_by(|a, b| a.subject.cmp(&b.subject));
        Ok(outcome)
    }
}

/// Deterministic finding order: audited column, then kind, then target.
fn sort_findings(findings: &mut [IntegrityFinding]) {
    findings.sort_by(|a, b| {
        let a_key = (
            a.source.table.to_lowercase(),
            a.source.column.to_lowercase(),
        );
        let b_key = (
            b.source.table.to_lowercase(),
            b.source.column.to_lowercase(),
        );
        a_key
            .cmp(&b_key)
            .then_with(|| a.kind.cmp(&b.kind))
            .then_with(|| {
                let a_target = a.target.as_ref().map(|t| t.to_string()).unwrap_or_default();
                let b_target = b.target.as_ref().map(|t| t.to_string()).unwrap_or_default();
                a_target.cmp(&b_target)
            })
    });
}
