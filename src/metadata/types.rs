//! Core metadata types shared across pipeline stages.

use serde::{Deserialize, Serialize};

/// A schema location: one column of one table.
///
/// Created from [`MetadataProvider`](super::MetadataProvider) output and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Table name.
    pub table: String,
    /// Column name.
    pub column: String,
    /// Database-specific data type string (e.g. `int`, `varchar`).
    pub data_type: String,
}

impl ColumnRef {
    pub fn new(
        table: impl Into<String>,
        column: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            data_type: data_type.into(),
        }
    }

    /// Whether both table and column names are present.
    pub fn is_complete(&self) -> bool {
        !self.table.trim().is_empty() && !self.column.trim().is_empty()
    }
}

impl std::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// Schema metadata for a single table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name.
    pub name: String,
    /// Columns in ordinal position order.
    pub columns: Vec<ColumnRef>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnRef>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }
}

/// A point-in-time view of the schema under analysis.
///
/// The whole pipeline operates on one snapshot; stages never refetch table
/// structure mid-run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    /// All base tables, in listing order.
    pub tables: Vec<TableSchema>,
}

impl SchemaSnapshot {
    pub fn new(tables: Vec<TableSchema>) -> Self {
        Self { tables }
    }

    /// Look up a table by name (case-insensitive).
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

/// A foreign-key constraint already declared in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingForeignKey {
    /// Constraint name as declared.
    pub constraint_name: String,
    /// Referencing side (child table/column).
    pub source: ColumnRef,
    /// Referenced side (parent table/column).
    pub target: ColumnRef,
}
