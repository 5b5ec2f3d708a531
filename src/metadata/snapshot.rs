//! In-memory metadata provider backed by a schema dump.
//!
//! A [`SnapshotProvider`] serves the full [`MetadataProvider`] contract from
//! a serde-loaded fixture: table schemas, declared foreign keys, and
//! pre-computed counting-query results. It backs the CLI's offline mode and
//! the integration tests; counts that the dump does not carry default to
//! zero rather than erroring, so a bare schema dump is enough to run
//! inference and planning.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::provider::MetadataProvider;
use super::types::{ExistingForeignKey, SchemaSnapshot, TableSchema};
use crate::error::{MetadataError, MetadataResult};

/// Duplicate-count fixture for one column.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DuplicateCount {
    /// Number of distinct values occurring more than once.
    pub groups: u64,
    /// Surplus rows beyond the first occurrence of each duplicated value.
    pub total_extra: u64,
}

/// Null-count fixture for one column.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NullCount {
    pub null_count: u64,
    pub total_count: u64,
}

/// Serializable schema dump.
///
/// Keys into the count maps are lowercase: `table` for row counts,
/// `table.column` for duplicates and nulls, and
/// `child.child_column->parent.parent_column` for orphan counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotData {
    /// All base tables with their columns.
    pub tables: Vec<TableSchema>,
    /// Declared foreign-key constraints.
    #[serde(default)]
    pub foreign_keys: Vec<ExistingForeignKey>,
    /// Row counts per table.
    #[serde(default)]
    pub row_counts: HashMap<String, u64>,
    /// Orphan counts per relationship.
    #[serde(default)]
    pub orphan_counts: HashMap<String, u64>,
    /// Duplicate counts per column.
    #[serde(default)]
    pub duplicate_counts: HashMap<String, DuplicateCount>,
    /// Null counts per column.
    #[serde(default)]
    pub null_counts: HashMap<String, NullCount>,
}

/// Key for the orphan-count map.
pub fn orphan_key(
    child_table: &str,
    child_column: &str,
    parent_table: &str,
    parent_column: &str,
) -> String {
    format!(
        "{}.{}->{}.{}",
        child_table.to_lowercase(),
        child_column.to_lowercase(),
        parent_table.to_lowercase(),
        parent_column.to_lowercase()
    )
}

/// Key for the duplicate/null count maps.
pub fn column_key(table: &str, column: &str) -> String {
    format!("{}.{}", table.to_lowercase(), column.to_lowercase())
}

/// [`MetadataProvider`] implementation reading from a [`SnapshotData`] dump.
#[derive(Debug, Clone, Default)]
pub struct SnapshotProvider {
    data: SnapshotData,
}

impl SnapshotProvider {
    pub fn new(data: SnapshotData) -> Self {
        Self { data }
    }

    /// Load a snapshot from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, MetadataError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| MetadataError::Unavailable(format!("{}: {e}", path.display())))?;
        let data: SnapshotData = serde_json::from_str(&text)
            .map_err(|e| MetadataError::Unavailable(format!("{}: {e}", path.display())))?;
        Ok(Self::new(data))
    }

    /// Access the underlying dump.
    pub fn data(&self) -> &SnapshotData {
        &self.data
    }

    fn find_table(&self, table: &str) -> MetadataResult<&TableSchema> {
        self.data
            .tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(table))
            .ok_or_else(|| MetadataError::UnknownTable(table.to_string()))
    }
}

#[async_trait]
impl MetadataProvider for SnapshotProvider {
    async fn list_tables(&self) -> MetadataResult<Vec<String>> {
        Ok(self.data.tables.iter().map(|t| t.name.clone()).collect())
    }

    async fn table_schema(&self, table: &str) -> MetadataResult<TableSchema> {
        self.find_table(table).cloned()
    }

    async fn existing_foreign_keys(&self) -> MetadataResult<Vec<ExistingForeignKey>> {
        Ok(self.data.foreign_keys.clone())
    }

    async fn count_orphans(
        &self,
        parent_table: &str,
        parent_column: &str,
        child_table: &str,
        child_column: &str,
    ) -> MetadataResult<u64> {
        self.find_table(child_table)?;
        let key = orphan_key(child_table, child_column, parent_table, parent_column);
        Ok(self.data.orphan_counts.get(&key).copied().unwrap_or(0))
    }

    async fn count_duplicates(&self, table: &str, column: &str) -> MetadataResult<(u64, u64)> {
        self.find_table(table)?;
        let dup = self
            .data
            .duplicate_counts
            .get(&column_key(table, column))
            .copied()
            .unwrap_or_default();
        Ok((dup.groups, dup.total_extra))
    }

    async fn count_nulls(&self, table: &str, column: &str) -> MetadataResult<(u64, u64)> {
        self.find_table(table)?;
        if let Some(nulls) = self.data.null_counts.get(&column_key(table, column)) {
            return Ok((nulls.null_count, nulls.total_count));
        }
        // No fixture: zero nulls out of whatever the row count says.
        let total = self.row_count(table).await?;
        Ok((0, total))
    }

    async fn row_count(&self, table: &str) -> MetadataResult<u64> {
        self.find_table(table)?;
        Ok(self
            .data
            .row_counts
            .get(&table.to_lowercase())
            .copied()
            .unwrap_or(0))
    }

    async fn schema_snapshot(&self) -> MetadataResult<SchemaSnapshot> {
        Ok(SchemaSnapshot::new(self.data.tables.clone()))
    }
}
