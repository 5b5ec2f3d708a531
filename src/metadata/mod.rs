//! Metadata provider module.
//!
//! Abstractions for reading schema metadata and issuing the read-only
//! counting queries the audit stage depends on. The pipeline only consumes
//! this contract; connection handling and session management live with the
//! provider implementation, outside the core.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                     MetadataProvider                       │
//! │  - list_tables() / table_schema() / schema_snapshot()      │
//! │  - existing_foreign_keys()                                 │
//! │  - count_orphans() / count_duplicates() / count_nulls()    │
//! │  - row_count()                                             │
//! └────────────────────────────────────────────────────────────┘
//!                             │
//!                             ▼
//!          SnapshotProvider (JSON schema dump, offline/tests)
//! ```

mod provider;
mod snapshot;
mod types;

pub use provider::{timed, MetadataProvider};
pub use snapshot::{column_key, orphan_key, DuplicateCount, NullCount, SnapshotData, SnapshotProvider};
pub use types::{ColumnRef, ExistingForeignKey, SchemaSnapshot, TableSchema};
