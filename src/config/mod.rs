//! TOML-based configuration for the analysis pipeline.
//!
//! Supports a config file (fkplan.toml) where every field has a default, so
//! a missing file or a partial file is always usable.
//!
//! Example configuration:
//! ```toml
//! [duplicate_check]
//! max_tables = 10
//! max_columns_per_table = 3
//!
//! [null_check]
//! warn_percent = 5.0
//! high_percent = 20.0
//!
//! [aggregate]
//! medium_risk_ratio = 0.3
//! conditional_go_ratio = 0.5
//!
//! [queries]
//! timeout_secs = 30
//! max_concurrent = 4
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Root configuration for a pipeline run.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Bounds on the duplicate-key scan.
    pub duplicate_check: DuplicateCheckConfig,
    /// Null-ratio thresholds.
    pub null_check: NullCheckConfig,
    /// Aggregate-report policy constants.
    pub aggregate: AggregateConfig,
    /// Query timeout and concurrency caps.
    pub queries: QueryConfig,
}

impl AnalyzerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}

/// Cost bound on the duplicate scan: first N tables, first M identifier-like
/// columns per table. A cost control, not a correctness knob.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DuplicateCheckConfig {
    pub max_tables: usize,
    pub max_columns_per_table: usize,
}

impl Default for DuplicateCheckConfig {
    fn default() -> Self {
        Self {
            max_tables: 10,
            max_columns_per_table: 3,
        }
    }
}

/// Null-ratio thresholds, in percent of total rows.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NullCheckConfig {
    /// A column is flagged only above this percentage (and a nonzero count).
    pub warn_percent: f64,
    /// Above this percentage the finding is High instead of Medium.
    pub high_percent: f64,
}

impl Default for NullCheckConfig {
    fn default() -> Self {
        Self {
            warn_percent: 5.0,
            high_percent: 20.0,
        }
    }
}

/// Policy constants for the impact aggregation stage.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AggregateConfig {
    /// Overall risk becomes Medium when the proportion of medium-risk plans
    /// exceeds this ratio.
    pub medium_risk_ratio: f64,
    /// Recommendation becomes CONDITIONAL GO when high-risk plans exceed
    /// this share of the total.
    pub conditional_go_ratio: f64,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            medium_risk_ratio: 0.3,
            conditional_go_ratio: 0.5,
        }
    }
}

/// Bounds on metadata queries issued during the audit.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum outstanding queries within a stage.
    pub max_concurrent: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_concurrent: 4,
        }
    }
}

impl QueryConfig {
    /// Per-call timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
