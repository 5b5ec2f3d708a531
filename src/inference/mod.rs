//! Relationship inference for undeclared foreign keys.
//!
//! This module derives candidate relationships between columns of distinct
//! tables from naming conventions and data-type compatibility, and attaches
//! a deterministic confidence score to each candidate.
//!
//! The inference pass is pure: same snapshot in, same candidate list out,
//! in the same order.

mod engine;
mod scoring;

pub use engine::InferenceEngine;
pub use scoring::{confidence, ConfidenceScore, ScoreAdjustment};

use serde::{Deserialize, Serialize};

use crate::metadata::{ColumnRef, ExistingForeignKey};

/// Centralized scoring weights.
///
/// The additive order of these bonuses is part of the scoring contract:
/// base, then match-type bonus, then id-suffix, then id-token, then clamp.
pub mod weights {
    /// Starting score for every retained candidate.
    pub const BASE: f64 = 0.5;
    /// Bonus when the column names are identical.
    pub const EXACT_MATCH: f64 = 0.4;
    /// Bonus when the source column embeds the target table name.
    pub const TABLE_NAME_PATTERN: f64 = 0.3;
    /// Bonus when both columns merely share an identifier suffix.
    pub const ID_PATTERN: f64 = 0.2;
    /// Bonus when both column names end with the identifier suffix.
    pub const ID_SUFFIX_BONUS: f64 = 0.1;
    /// Bonus when both column names contain an identifier token.
    pub const ID_TOKEN_BONUS: f64 = 0.05;
    /// Scores never exceed this cap.
    pub const MAX: f64 = 1.0;
}

/// How a candidate's column names lined up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchType {
    /// Identical column names on both sides.
    ExactMatch,
    /// Source column name contains the target table's name.
    TableNamePattern,
    /// Both column names end in an identifier suffix (not retained).
    IdPattern,
    /// No recognized pattern (not retained).
    Other,
}

impl MatchType {
    /// Whether candidates of this match type are kept as actionable.
    pub fn is_actionable(self) -> bool {
        matches!(self, Self::ExactMatch | Self::TableNamePattern)
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExactMatch => write!(f, "exact match"),
            Self::TableNamePattern => write!(f, "table name pattern"),
            Self::IdPattern => write!(f, "id pattern"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// An inferred, not-yet-declared foreign-key relationship.
///
/// Produced once per inference pass and never mutated afterwards. Equality
/// is defined over the `(source.table, source.column, target.table,
/// target.column)` tuple, case-insensitively; match type and confidence are
/// derived attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRelationship {
    /// Referencing side.
    pub source: ColumnRef,
    /// Referenced side.
    pub target: ColumnRef,
    /// Naming pattern that produced this candidate.
    pub match_type: MatchType,
    /// Heuristic confidence in `[0.0, 1.0]`.
    pub confidence: f64,
}

impl PartialEq for CandidateRelationship {
    fn eq(&self, other: &Self) -> bool {
        CandidateKey::from_candidate(self) == CandidateKey::from_candidate(other)
    }
}

impl CandidateRelationship {
    /// Human-readable `source -> target` label, used in logs and failures.
    pub fn label(&self) -> String {
        format!("{} -> {}", self.source, self.target)
    }
}

/// A unique key identifying a relationship by its endpoints.
///
/// All names are stored lowercase for case-insensitive comparison, mirroring
/// how the database compares identifiers.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct CandidateKey {
    pub source_table: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
}

impl CandidateKey {
    /// Create a key with normalized (lowercase) names.
    #[must_use]
    pub fn new(
        source_table: &str,
        source_column: &str,
        target_table: &str,
        target_column: &str,
    ) -> Self {
        Self {
            source_table: source_table.to_lowercase(),
            source_column: source_column.to_lowercase(),
            target_table: target_table.to_lowercase(),
            target_column: target_column.to_lowercase(),
        }
    }

    /// Key for an inferred candidate.
    #[must_use]
    pub fn from_candidate(candidate: &CandidateRelationship) -> Self {
        Self::new(
            &candidate.source.table,
            &candidate.source.column,
            &candidate.target.table,
            &candidate.target.column,
        )
    }

    /// Key for a declared constraint.
    #[must_use]
    pub fn from_existing(fk: &ExistingForeignKey) -> Self {
        Self::new(
            &fk.source.table,
            &fk.source.column,
            &fk.target.table,
            &fk.target.column,
        )
    }
}
