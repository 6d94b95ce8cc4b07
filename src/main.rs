//! Storage Add-on Validator
//!
//! Command line front end of the feasibility engine. Reads a cluster
//! snapshot, runs the requested check and prints the result as JSON.
//!
//! ```text
//!  --config ──► ConfigLoader ──► RequirementsConfig
//!                                      │
//!  --cluster ──► ClusterSnapshot ──────┼──► validate           (exit 0/1/2)
//!                                      ├──► host-requirements
//!                                      ├──► preflight
//!                                      └──► schema
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use storage_addon_validator::requirements::load_document;
use storage_addon_validator::{
    host_requirements, preflight_requirements, validate_host, ClusterSnapshot, ConfigLoader,
    HostId, HostRequirements, HostValidation, RequirementsConfig, StorageValidator,
    ValidationStatus,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Storage Add-on Validator - feasibility and deployment mode resolution
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Requirements policy file (YAML or JSON); built-in defaults when absent
    #[arg(long, global = true, env = "STORAGE_ADDON_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true, env = "LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a cluster and resolve its deployment mode
    Validate {
        /// Cluster snapshot file (YAML or JSON)
        #[arg(long)]
        cluster: PathBuf,
    },

    /// Print the readiness and resources the add-on needs on each host
    HostRequirements {
        /// Cluster snapshot file (YAML or JSON)
        #[arg(long)]
        cluster: PathBuf,
    },

    /// Print the per-role requirements known before installation
    Preflight,

    /// Print the JSON schema of the requirements policy
    Schema,
}

/// Per-host line of the host-requirements report
#[derive(Debug, Serialize)]
struct HostReport {
    host: HostId,
    validation: HostValidation,
    requirements: HostRequirements,
}

// =============================================================================
// Main
// =============================================================================

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args);

    info!("Starting Storage Add-on Validator");
    info!("  Version: {}", storage_addon_validator::VERSION);

    if let Command::Schema = args.command {
        let schema = schemars::schema_for!(RequirementsConfig);
        print_json(&schema)?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = ConfigLoader::new(args.config.clone()).load()?;

    match &args.command {
        Command::Validate { cluster } => {
            let snapshot = load_snapshot(cluster)?;
            let report = StorageValidator::new(config).report(&snapshot);
            print_json(&report)?;
            Ok(exit_code(report.outcome.status()))
        }
        Command::HostRequirements { cluster } => {
            let snapshot = load_snapshot(cluster)?;
            let cluster_size = snapshot.host_count();

            let reports = snapshot
                .hosts
                .iter()
                .map(|host| {
                    let requirements = host_requirements(cluster_size, host, &config)
                        .with_context(|| format!("host {}", host.id))?;
                    Ok(HostReport {
                        host: host.id.clone(),
                        validation: validate_host(cluster_size, host, &config),
                        requirements,
                    })
                })
                .collect::<anyhow::Result<Vec<_>>>()?;

            print_json(&reports)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Preflight => {
            print_json(&preflight_requirements(&config))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Schema => Ok(ExitCode::SUCCESS),
    }
}

fn load_snapshot(path: &Path) -> anyhow::Result<ClusterSnapshot> {
    let snapshot: ClusterSnapshot = load_document(path)
        .with_context(|| format!("Failed to load cluster snapshot {}", path.display()))?;
    info!(
        "Loaded cluster {} with {} hosts",
        snapshot.display_name(),
        snapshot.host_count()
    );
    Ok(snapshot)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn exit_code(status: ValidationStatus) -> ExitCode {
    match status {
        ValidationStatus::Success => ExitCode::SUCCESS,
        ValidationStatus::Failure => ExitCode::from(1),
        ValidationStatus::Pending => ExitCode::from(2),
    }
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // stdout carries the JSON result
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
