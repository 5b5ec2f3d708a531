//! DDL and rollback script generation.
//!
//! Scripts are plain text with `--` comment lines as section markers, so
//! downstream tooling can split them without a SQL parser. The structure
//! (header, index step, constraint statement, verification query) is a
//! textual contract and must stay stable.

use crate::inference::CandidateRelationship;

use super::{CascadePolicy, RiskLevel};

/// Builds the constraint-creation script for one planned relationship.
#[must_use]
pub fn ddl_script(
    name: &str,
    relationship: &CandidateRelationship,
    cascade: &CascadePolicy,
    priority: u8,
    risk: RiskLevel,
    requires_index: bool,
    index_name: &str,
) -> String {
    let source = &relationship.source;
    let target = &relationship.target;

    let index_step = if requires_index {
        format!(
            "CREATE NONCLUSTERED INDEX [{index_name}]\nON [{}] ([{}]);",
            source.table, source.column
        )
    } else {
        "-- Index already exists or not required".to_string()
    };

    format!(
        "-- Create Foreign Key Constraint: {name}\n\
         -- Priority: {priority}, Risk: {risk}\n\
         -- Relationship: {source} -> {target}\n\
         \n\
         -- Step 1: Create supporting index if needed\n\
         {index_step}\n\
         \n\
         -- Step 2: Create the foreign key constraint\n\
         ALTER TABLE [{source_table}]\n\
         ADD CONSTRAINT [{name}]\n\
         FOREIGN KEY ([{source_column}])\n\
         REFERENCES [{target_table}] ([{target_column}])\n\
         ON DELETE {on_delete}\n\
         ON UPDATE {on_update};\n\
         \n\
         -- Step 3: Verify constraint creation\n\
         SELECT\n\
         \x20   CONSTRAINT_NAME,\n\
         \x20   TABLE_NAME,\n\
         \x20   COLUMN_NAME,\n\
         \x20   REFERENCED_TABLE_NAME,\n\
         \x20   REFERENCED_COLUMN_NAME\n\
         FROM INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS rc\n\
         JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE kcu ON rc.CONSTRAINT_NAME = kcu.CONSTRAINT_NAME\n\
         WHERE rc.CONSTRAINT_NAME = '{name}';\n\
         \n\
         -- Cascade Options: {reasoning}",
        source_table = source.table,
        source_column = source.column,
        target_table = target.table,
        target_column = target.column,
        on_delete = cascade.on_delete,
        on_update = cascade.on_update,
        reasoning = cascade.reasoning,
    )
}

/// Builds the rollback script that removes a planned constraint.
#[must_use]
pub fn rollback_script(name: &str, source_table: &str, index_name: &str) -> String {
    format!(
        "-- Rollback Script for: {name}\n\
         -- WARNING: This will remove the foreign key constraint\n\
         \n\
         -- Step 1: Drop the foreign key constraint\n\
         ALTER TABLE [{source_table}]\n\
         DROP CONSTRAINT [{name}];\n\
         \n\
         -- Step 2: Optionally drop the supporting index\n\
         -- DROP INDEX [{index_name}] ON [{source_table}];\n\
         \n\
         -- Step 3: Verify constraint removal\n\
         SELECT COUNT(*) as constraint_exists\n\
         FROM INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS\n\
         WHERE CONSTRAINT_NAME = '{name}';\n\
         -- Should return 0 if successfully removed"
    )
}
