//! Raster scoring tool.
//!
//! `scorer task <input.json> <output.json>` runs a task against object
//! storage; `scorer local` runs a CSV criteria table over local directories.
//! Both write a result document and exit 0 whether or not the run succeeded.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use raster_common::ReclassError;
use scorer::{into_result, run_local, run_task, ScorerConfig, TaskDocument, TaskResult};

#[derive(Parser, Debug)]
#[command(name = "scorer")]
#[command(about = "Reclassify rasters by threshold criteria and sum the results")]
struct Cli {
    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a JSON task against object storage
    Task {
        /// Task document
        input: PathBuf,

        /// Where to write the result document
        output: PathBuf,
    },

    /// Run a CSV criteria table over local directories
    Local {
        /// Criteria CSV (filename,val_min,val_max,new_val)
        #[arg(short, long)]
        criteria: PathBuf,

        /// Directory holding the input rasters
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Directory receiving the outputs (created if missing)
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Write the result document here instead of stdout
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = ScorerConfig::from_env().map_err(|e| ReclassError::config(format!("{:#}", e)));
    if let Ok(config) = &config {
        info!(workdir = %config.workdir.display(), "Loaded configuration");
    }

    match cli.command {
        Commands::Task { input, output } => {
            let result = into_result(config.and_then(|config| {
                let task = TaskDocument::from_path(&input)?;
                run_task(&task, &config)
            }));
            write_result(&result, Some(&output))
        }
        Commands::Local {
            criteria,
            input_dir,
            output_dir,
            report,
        } => {
            let result = into_result(
                config.and_then(|config| run_local(&criteria, &input_dir, &output_dir, &config)),
            );
            write_result(&result, report.as_deref())
        }
    }
}

fn write_result(result: &TaskResult, path: Option<&Path>) -> Result<()> {
    let json = result
        .to_json_pretty()
        .context("Failed to serialize result document")?;

    match path {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write result to {}", path.display()))?;
            info!(path = %path.display(), success = result.is_success(), "Wrote result document");
        }
        None => println!("{}", json),
    }

    Ok(())
}
