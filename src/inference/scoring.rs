//! Confidence scoring for candidate relationships.
//!
//! The score is a pure function of the match type and the two column names;
//! the same inputs always produce the same score. The additive order is
//! fixed: base, match-type bonus, id-suffix bonus, id-token bonus, clamp.

use super::{weights, MatchType};

/// A single adjustment applied to the confidence score.
#[derive(Debug, Clone)]
pub struct ScoreAdjustment {
    /// What contributed.
    pub reason: &'static str,
    /// Amount added.
    pub delta: f64,
}

/// Computed confidence score with its breakdown.
#[derive(Debug, Clone)]
pub struct ConfidenceScore {
    /// Final clamped score in `[0.0, 1.0]`.
    pub final_score: f64,
    /// Breakdown of adjustments on top of the base score.
    pub adjustments: Vec<ScoreAdjustment>,
}

impl ConfidenceScore {
    /// Score a candidate from its match type and column names.
    #[must_use]
    pub fn calculate(match_type: MatchType, source_column: &str, target_column: &str) -> Self {
        let mut adjustments = Vec::new();
        let mut score = weights::BASE;

        let match_bonus = match match_type {
            MatchType::ExactMatch => Some(("Column names match exactly", weights::EXACT_MATCH)),
            MatchType::TableNamePattern => Some((
                "Column name follows target table naming pattern",
                weights::TABLE_NAME_PATTERN,
            )),
            MatchType::IdPattern => Some(("Shared identifier suffix", weights::ID_PATTERN)),
            MatchType::Other => None,
        };
        if let Some((reason, delta)) = match_bonus {
            adjustments.push(ScoreAdjustment { reason, delta });
            score += delta;
        }

        let source = source_column.to_lowercase();
        let target = target_column.to_lowercase();

        if source.ends_with("id") && target.ends_with("id") {
            let delta = weights::ID_SUFFIX_BONUS;
            adjustments.push(ScoreAdjustment {
                reason: "Both columns end with identifier suffix",
                delta,
            });
            score += delta;
        }

        if source.contains("id") && target.contains("id") {
            let delta = weights::ID_TOKEN_BONUS;
            adjustments.push(ScoreAdjustment {
                reason: "Both columns contain identifier token",
                delta,
            });
            score += delta;
        }

        ConfidenceScore {
            final_score: score.min(weights::MAX),
            adjustments,
        }
    }
}

/// Convenience wrapper returning only the final score.
#[must_use]
pub fn confidence(match_type: MatchType, source_column: &str, target_column: &str) -> f64 {
    ConfidenceScore::calculate(match_type, source_column, target_column).final_score
}
