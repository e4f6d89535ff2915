//! # sales: Order Analytics CLI
//!
//! ## Commands
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  analyze <PATH>                                                         │
//! │    SalesConfig::load ──► load_path ──► validate ──► apply_policy        │
//! │                                                       │                 │
//! │                               report::render_text / render_json         │
//! │                                                                         │
//! │  generate (--preset P | --output DIR --count N)                         │
//! │    OrderGenerator (seeded) ──► write_separate_files                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reports go to stdout. Logs go to stderr so `--format json` output can be
//! piped.
//!
//! ## Log Levels
//! - `RUST_LOG=debug` - per-file loading detail
//! - Default: INFO level

mod report;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sales_core::{apply_policy, validate, CoreError, ValidationPolicy};
use sales_ingest::{load_path, write_separate_files, IngestError, OrderGenerator, Preset, SalesConfig};

use crate::report::Timings;

// =============================================================================
// Arguments
// =============================================================================

#[derive(Parser)]
#[command(name = "sales")]
#[command(about = "Validate and summarize sales order documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one document or a directory of documents
    Analyze {
        /// File or directory to read
        path: PathBuf,

        /// Number of products in the ranking
        #[arg(short, long)]
        top: Option<usize>,

        /// How to treat invalid orders (strict, valid-only)
        #[arg(short, long)]
        policy: Option<ValidationPolicy>,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Config file (defaults to the platform config dir)
        #[arg(short, long, env = "SALES_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Write synthetic order documents
    Generate {
        /// Canned size (small, medium, large, huge, errors)
        #[arg(long, conflicts_with_all = ["output", "count"])]
        preset: Option<Preset>,

        /// Output directory
        #[arg(short, long, requires = "count")]
        output: Option<PathBuf>,

        /// Number of documents
        #[arg(short = 'n', long, requires = "output")]
        count: Option<usize>,

        /// Inject invalid orders
        #[arg(long)]
        errors: bool,

        /// RNG seed, random when omitted
        #[arg(long)]
        seed: Option<u64>,

        /// Confirm presets that write a very large number of files
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

// =============================================================================
// Entry Point
// =============================================================================

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Analyze {
            path,
            top,
            policy,
            format,
            config,
        } => analyze(&path, top, policy, format, config.as_deref()),
        Commands::Generate {
            preset,
            output,
            count,
            errors,
            seed,
            yes,
        } => generate(preset, output, count, errors, seed, yes),
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Logs to stderr, filtered by `RUST_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// =============================================================================
// analyze
// =============================================================================

fn analyze(
    path: &Path,
    top: Option<usize>,
    policy: Option<ValidationPolicy>,
    format: Format,
    config_path: Option<&Path>,
) -> Result<ExitCode> {
    let mut config = SalesConfig::load(config_path).context("loading configuration")?;
    if let Some(top) = top {
        config.report.top_n = top;
    }
    if let Some(policy) = policy {
        config.validation.policy = policy;
    }
    config.validate()?;
    let options = config.analysis_options();

    let loaded = match load_path(path, &config.ingest) {
        Ok(loaded) => loaded,
        Err(IngestError::NoDocuments {
            dir,
            extension,
            subdirectories,
        }) => {
            eprintln!("No .{extension} files in {}", dir.display());
            if !subdirectories.is_empty() {
                eprintln!("Subdirectories with documents:");
                for hint in &subdirectories {
                    eprintln!("  {}/ ({} files)", hint.name, hint.documents);
                }
            }
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err.into()),
    };

    if loaded.orders.is_empty() {
        warn!(path = %path.display(), "No orders found, summary will be empty");
    }
    info!(
        orders = loaded.orders.len(),
        documents = loaded.documents,
        top_n = options.top_n,
        policy = %options.policy,
        "Analyzing"
    );

    let mut timings = Timings {
        load: loaded.elapsed,
        ..Timings::default()
    };

    let started = Instant::now();
    let validation = validate(&loaded.orders);
    timings.check = started.elapsed();
    if !validation.ok() {
        warn!(violations = validation.violations.len(), "Validation found problems");
    }

    let started = Instant::now();
    let analysis = match apply_policy(&loaded.orders, validation, &options) {
        Ok(analysis) => analysis,
        Err(CoreError::ValidationFailed(report)) => {
            println!("Validation failed, statistics not computed:\n");
            print!("{}", report::render_violations(&report.violations, &loaded.orders));
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err.into()),
    };
    timings.calculate = started.elapsed();

    if analysis.skipped_orders > 0 {
        for violation in &analysis.report.violations {
            warn!("{}", report::describe_violation(violation, &loaded.orders));
        }
    }

    match format {
        Format::Text => print!("{}", report::render_text(&analysis, &timings)),
        Format::Json => println!(
            "{}",
            report::render_json(&analysis, loaded.documents, &timings)?
        ),
    }

    Ok(ExitCode::SUCCESS)
}

// =============================================================================
// generate
// =============================================================================

fn generate(
    preset: Option<Preset>,
    output: Option<PathBuf>,
    count: Option<usize>,
    errors: bool,
    seed: Option<u64>,
    yes: bool,
) -> Result<ExitCode> {
    let (dir, count, with_errors) = match (preset, output, count) {
        (Some(preset), _, _) => {
            if preset.needs_confirmation() && !yes {
                bail!(
                    "preset writes {} files to {}; pass --yes to confirm",
                    preset.count(),
                    preset.output_dir().display()
                );
            }
            (preset.output_dir(), preset.count(), preset.with_errors() || errors)
        }
        (None, Some(output), Some(count)) => (output, count, errors),
        _ => bail!("either --preset or both --output and --count are required"),
    };

    let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!(seed, "Seeding generator");

    let mut generator = OrderGenerator::new(StdRng::seed_from_u64(seed), Utc::now(), with_errors);
    let written = write_separate_files(&dir, count, &mut generator)?;

    println!("Wrote {} documents to {}", written.len(), dir.display());
    Ok(ExitCode::SUCCESS)
}
