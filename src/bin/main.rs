//! fkplan CLI - Analyze a schema snapshot for missing foreign keys
//!
//! Usage:
//!   fkplan analyze --snapshot <schema.json> [--config <fkplan.toml>] [--ddl-dir <dir>] [--format text|json]
//!   fkplan infer --snapshot <schema.json>
//!   fkplan audit --snapshot <schema.json> [--config <fkplan.toml>]
//!
//! Examples:
//!   fkplan analyze --snapshot northwind.json --format text
//!   fkplan analyze --snapshot northwind.json --ddl-dir out/ddl
//!   fkplan infer --snapshot northwind.json --format json

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use fkplan::audit::IntegrityAuditor;
use fkplan::config::AnalyzerConfig;
use fkplan::inference::InferenceEngine;
use fkplan::metadata::{MetadataProvider, SnapshotProvider};
use fkplan::report::render_text;
use fkplan::Pipeline;

#[derive(Parser)]
#[command(name = "fkplan")]
#[command(about = "Infer missing foreign keys and plan their implementation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and print the impact report
    Analyze {
        /// Path to the schema snapshot JSON file
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Path to an optional TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory to write per-constraint DDL and rollback scripts into
        #[arg(long)]
        ddl_dir: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Infer candidate relationships without auditing data
    Infer {
        /// Path to the schema snapshot JSON file
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Audit declared and inferred relationships for integrity issues
    Audit {
        /// Path to the schema snapshot JSON file
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Path to an optional TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            snapshot,
            config,
            ddl_dir,
            format,
        } => cmd_analyze(snapshot, config, ddl_dir, format).await,
        Commands::Infer { snapshot, format } => cmd_infer(snapshot, format).await,
        Commands::Audit {
            snapshot,
            config,
            format,
        } => cmd_audit(snapshot, config, format).await,
    }
}

fn load_provider(path: &Path) -> Result<SnapshotProvider, ExitCode> {
    SnapshotProvider::from_json_file(path).map_err(|e| {
        eprintln!("Error loading snapshot '{}': {}", path.display(), e);
        ExitCode::FAILURE
    })
}

fn load_config(path: Option<&PathBuf>) -> Result<AnalyzerConfig, ExitCode> {
    match path {
        Some(p) => AnalyzerConfig::from_file(p).map_err(|e| {
            eprintln!("Error loading config '{}': {}", p.display(), e);
            ExitCode::FAILURE
        }),
        None => Ok(AnalyzerConfig::default()),
    }
}

async fn cmd_analyze(
    snapshot: PathBuf,
    config: Option<PathBuf>,
    ddl_dir: Option<PathBuf>,
    format: OutputFormat,
) -> ExitCode {
    let provider = match load_provider(&snapshot) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let config = match load_config(config.as_ref()) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let outcome = match Pipeline::new(&provider, config).run().await {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Analysis failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(dir) = ddl_dir {
        if let Err(e) = write_ddl_scripts(&dir, &outcome.plans) {
            eprintln!("Error writing DDL scripts to '{}': {}", dir.display(), e);
            return ExitCode::FAILURE;
        }
        eprintln!(
            "Wrote {} DDL/rollback script pairs to {}",
            outcome.plans.len(),
            dir.display()
        );
    }

    match format {
        OutputFormat::Text => println!("{}", render_text(&outcome.report)),
        OutputFormat::Json => match serde_json::to_string_pretty(&outcome.report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }
    ExitCode::SUCCESS
}

async fn cmd_infer(snapshot: PathBuf, format: OutputFormat) -> ExitCode {
    let provider = match load_provider(&snapshot) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let schema = match provider.schema_snapshot().await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading schema: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let existing = match provider.existing_foreign_keys().await {
        Ok(fks) => fks,
        Err(e) => {
            eprintln!("Error reading existing constraints: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let candidates = InferenceEngine::new().infer(&schema, &existing);

    match format {
        OutputFormat::Text => {
            if candidates.is_empty() {
                println!("No undeclared relationships found.");
            }
            for candidate in &candidates {
                println!(
                    "{} ({}, confidence {:.2})",
                    candidate.label(),
                    candidate.match_type,
                    candidate.confidence
                );
            }
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&candidates) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing candidates: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }
    ExitCode::SUCCESS
}

async fn cmd_audit(
    snapshot: PathBuf,
    config: Option<PathBuf>,
    format: OutputFormat,
) -> ExitCode {
    let provider = match load_provider(&snapshot) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let config = match load_config(config.as_ref()) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let schema = match provider.schema_snapshot().await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading schema: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let existing = match provider.existing_foreign_keys().await {
        Ok(fks) => fks,
        Err(e) => {
            eprintln!("Error reading existing constraints: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let candidates = InferenceEngine::new().infer(&schema, &existing);
    let auditor = IntegrityAuditor::new(&provider, &config);
    let outcome = match auditor.audit_all(&existing, &candidates, &schema.tables).await {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Audit failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match format {
        OutputFormat::Text => {
            for finding in &outcome.findings {
                println!(
                    "[{}] {} {}: {}",
                    finding.severity, finding.kind, finding.source, finding.detail
                );
            }
            for failure in &outcome.skipped {
                eprintln!("skipped {}", failure);
            }
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&outcome.findings) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing findings: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }
    ExitCode::SUCCESS
}

fn write_ddl_scripts(dir: &Path, plans: &[fkplan::planner::ConstraintPlan]) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    for plan in plans {
        fs::write(dir.join(format!("{}.sql", plan.name)), &plan.ddl)?;
        fs::write(
            dir.join(format!("{}_rollback.sql", plan.name)),
            &plan.rollback,
        )?;
    }
    Ok(())
}
