//! Crate-wide error types.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Errors raised by a [`MetadataProvider`](crate::metadata::MetadataProvider)
/// or by the timeout wrapper around its calls.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// The metadata source could not be reached at all.
    #[error("metadata source unavailable: {0}")]
    Unavailable(String),

    /// A single query against the metadata source failed.
    #[error("metadata query failed: {0}")]
    Query(String),

    /// A provider call exceeded the configured timeout.
    #[error("metadata query timed out after {0:?}")]
    Timeout(Duration),

    /// The requested table does not exist in the snapshot.
    #[error("unknown table: {0}")]
    UnknownTable(String),
}

impl MetadataError {
    /// Check whether this error is recoverable at the subject level.
    ///
    /// Recoverable errors are recorded as soft failures and the audit moves
    /// on to the next subject; unrecoverable ones abort the issuing stage.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Query(_) | Self::Timeout(_) | Self::UnknownTable(_)
        )
    }
}

/// Errors that abort a pipeline run.
///
/// Recoverable per-subject problems never surface here; they are collected
/// as [`SubjectFailure`] values and returned alongside partial results.
/// Fatal are a failure to obtain the initial schema or constraint listing,
/// and any unrecoverable metadata error during later stages.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The metadata source could not be fetched from at all.
    #[error("metadata unavailable: {0}")]
    MetadataUnavailable(#[from] MetadataError),
}

/// A per-subject failure recorded during a stage.
///
/// Subjects are skipped, never silently merged into counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectFailure {
    /// Which subject was skipped (e.g. `Orders.CustomerID -> Customers.CustomerID`).
    pub subject: String,
    /// Why it was skipped.
    pub reason: String,
}

impl SubjectFailure {
    pub fn new(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for SubjectFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.subject, self.reason)
    }
}
