//! # fkplan
//!
//! Infers undeclared foreign-key relationships in a relational schema and
//! turns them into reviewed, ordered constraint plans.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │            MetadataProvider (schema + counts)            │
//! │        (live database, or a JSON snapshot file)          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [inference]
//! ┌─────────────────────────────────────────────────────────┐
//! │       CandidateRelationships (scored, deduplicated)      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [audit]
//! ┌─────────────────────────────────────────────────────────┐
//! │     IntegrityFindings (orphans, duplicates, nulls)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [planner]
//! ┌─────────────────────────────────────────────────────────┐
//! │     ConstraintPlans (cascade, risk, priority, DDL)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [report]
//! ┌─────────────────────────────────────────────────────────┐
//! │       ImpactReport (risk, timeline, go/no-go)            │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod audit;
pub mod config;
pub mod error;
pub mod inference;
pub mod metadata;
pub mod pipeline;
pub mod planner;
pub mod report;

pub use config::AnalyzerConfig;
pub use error::{MetadataError, MetadataResult, PipelineError, SubjectFailure};
pub use pipeline::{run_pipeline, Pipeline, PipelineOutcome};
