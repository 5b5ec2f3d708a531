//! Candidate generation over a schema snapshot.

use std::collections::HashSet;
use std::time::Duration;

use inflector::Inflector;
use tracing::{debug, info};

use super::{scoring, CandidateKey, CandidateRelationship, MatchType};
use crate::error::PipelineError;
use crate::metadata::{self, ExistingForeignKey, MetadataProvider, SchemaSnapshot};

/// Derives candidate foreign-key relationships from a schema snapshot.
///
/// The engine examines every ordered pair of distinct tables, keeps column
/// pairs with compatible data types, classifies the naming pattern, and
/// scores retained candidates. Candidates already covered by a declared
/// constraint are excluded.
#[derive(Debug, Default)]
pub struct InferenceEngine;

impl InferenceEngine {
    pub fn new() -> Self {
        Self
    }

    /// Infer candidate relationships from a snapshot.
    ///
    /// Pure and deterministic: output is sorted by descending confidence,
    /// with ties broken by source table name, then source column name.
    #[must_use]
    pub fn infer(
        &self,
        snapshot: &SchemaSnapshot,
        existing: &[ExistingForeignKey],
    ) -> Vec<CandidateRelationship> {
        let declared: HashSet<CandidateKey> =
            existing.iter().map(CandidateKey::from_existing).collect();

        let mut seen: HashSet<CandidateKey> = HashSet::new();
        let mut candidates = Vec::new();

        for source_table in &snapshot.tables {
            for target_table in &snapshot.tables {
                if source_table.name.eq_ignore_ascii_case(&target_table.name) {
                    continue;
                }

                for source_col in &source_table.columns {
                    for target_col in &target_table.columns {
                        if !types_compatible(&source_col.data_type, &target_col.data_type) {
                            continue;
                        }

                        let match_type =
                            classify(&source_col.column, &target_col.column, &target_table.name);
                        if !match_type.is_actionable() {
                            continue;
                        }

                        // An exact name match fires in both directions; keep
                        // only the child-to-parent one when the column name
                        // identifies the parent table.
                        if match_type == MatchType::ExactMatch
                            && names_parent(&source_col.column, &source_table.name)
                        {
                            continue;
                        }

                        let key = CandidateKey::new(
                            &source_table.name,
                            &source_col.column,
                            &target_table.name,
                            &target_col.column,
                        );
                        if declared.contains(&key) {
                            debug!(
                                source = %source_col,
                                target = %target_col,
                                "skipping candidate covered by declared constraint"
                            );
                            continue;
                        }
                        if !seen.insert(key) {
                            continue;
                        }

                        let confidence = scoring::confidence(
                            match_type,
                            &source_col.column,
                            &target_col.column,
                        );

                        candidates.push(CandidateRelationship {
                            source: source_col.clone(),
                            target: target_col.clone(),
                            match_type,
                            confidence,
                        });
                    }
                }
            }
        }

        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.source.table.cmp(&b.source.table))
                .then_with(|| a.source.column.cmp(&b.source.column))
        });

        info!(
            candidates = candidates.len(),
            declared = existing.len(),
            "relationship inference complete"
        );
        candidates
    }

    /// Fetch the snapshot and declared constraints, then infer.
    ///
    /// A provider failure here is fatal to the stage: there is no partial
    /// inference over an incomplete snapshot.
    pub async fn infer_from_provider(
        &self,
        provider: &dyn MetadataProvider,
        timeout: Duration,
    ) -> Result<Vec<CandidateRelationship>, PipelineError> {
        let snapshot = metadata::timed(timeout, provider.schema_snapshot()).await?;
        let existing = metadata::timed(timeout, provider.existing_foreign_keys()).await?;
        Ok(self.infer(&snapshot, &existing))
    }
}

/// Whether a column name embeds the given table's name (or its singular
/// form), marking that table as the natural parent of the relationship.
fn names_parent(column: &str, table: &str) -> bool {
    let column = column.to_lowercase();
    let table = table.to_lowercase();
    column.contains(&table) || column.contains(&table.to_singular())
}

/// Two columns are join-compatible when their declared types agree.
fn types_compatible(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Classify the naming pattern between a source column and a target column.
///
/// Precedence: exact column-name match, then table-name containment
/// (including the singular form of the target table), then shared `id`
/// suffix. Only the first two classes are actionable.
fn classify(source_column: &str, target_column: &str, target_table: &str) -> MatchType {
    if source_column.eq_ignore_ascii_case(target_column) {
        return MatchType::ExactMatch;
    }

    let source = source_column.to_lowercase();
    let table = target_table.to_lowercase();
    if source.contains(&table) || source.contains(&table.to_singular()) {
        return MatchType::TableNamePattern;
    }

    if source.ends_with("id") && target_column.to_lowercase().ends_with("id") {
        return MatchType::IdPattern;
    }

    MatchType::Other
}
