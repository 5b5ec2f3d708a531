//! MetadataProvider trait definition.
//!
//! The MetadataProvider trait abstracts over different ways of reading
//! schema metadata and issuing the counting queries the audit stage needs.
//! The core never owns a connection and never issues mutating statements;
//! every method here is read-only.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use super::types::{ExistingForeignKey, SchemaSnapshot, TableSchema};
use crate::error::{MetadataError, MetadataResult};

/// Trait for reading database metadata and row counts.
///
/// # Example
///
/// ```ignore
/// use fkplan::metadata::MetadataProvider;
///
/// async fn example(provider: &impl MetadataProvider) -> fkplan::error::MetadataResult<()> {
///     let snapshot = provider.schema_snapshot().await?;
///     let fks = provider.existing_foreign_keys().await?;
///     let orphans = provider
///         .count_orphans("Customers", "CustomerID", "Orders", "CustomerID")
///         .await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// List all base table names.
    async fn list_tables(&self) -> MetadataResult<Vec<String>>;

    /// Get column metadata for a table.
    async fn table_schema(&self, table: &str) -> MetadataResult<TableSchema>;

    /// All declared foreign-key constraints.
    async fn existing_foreign_keys(&self) -> MetadataResult<Vec<ExistingForeignKey>>;

    /// Count rows in the child table whose key is non-null but has no match
    /// in the parent table (left-anti-join semantics).
    async fn count_orphans(
        &self,
        parent_table: &str,
        parent_column: &str,
        child_table: &str,
        child_column: &str,
    ) -> MetadataResult<u64>;

    /// Count duplicate values in a column.
    ///
    /// Returns `(groups, total_extra)`: the number of values that occur more
    /// than once, and the total count of surplus rows beyond the first
    /// occurrence of each.
    async fn count_duplicates(&self, table: &str, column: &str) -> MetadataResult<(u64, u64)>;

    /// Count null values in a column.
    ///
    /// Returns `(null_count, total_count)` for the table.
    async fn count_nulls(&self, table: &str, column: &str) -> MetadataResult<(u64, u64)>;

    /// Total row count of a table.
    async fn row_count(&self, table: &str) -> MetadataResult<u64>;

    /// Fetch schemas for all tables as one snapshot.
    ///
    /// Default implementation lists tables and fetches each schema in turn.
    async fn schema_snapshot(&self) -> MetadataResult<SchemaSnapshot> {
        let names = self.list_tables().await?;
        let mut tables = Vec::with_capacity(names.len());
        for name in &names {
            tables.push(self.table_schema(name).await?);
        }
        Ok(SchemaSnapshot::new(tables))
    }
}

/// Bound a provider call with a timeout.
///
/// A timeout is reported as [`MetadataError::Timeout`], which is recoverable
/// at the subject level; callers in the audit stage record it as a soft
/// failure instead of aborting the run.
pub async fn timed<T, F>(timeout: Duration, fut: F) -> MetadataResult<T>
where
    F: Future<Output = MetadataResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(MetadataError::Timeout(timeout)),
    }
}
