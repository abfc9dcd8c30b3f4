//! CLI for modsort.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use modsort_core::config::{self, ModsortConfig};
use std::path::{Path, PathBuf};

use commands::{run_extract, run_normalize, run_sort, SortOptions};

/// Top-level CLI for modsort.
#[derive(Debug, Parser)]
#[command(name = "modsort")]
#[command(
    about = "Sort mod archives into client/server requirement buckets",
    long_about = None
)]
pub struct Cli {
    /// Config file to use instead of the default XDG location.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Look up every file in INPUT and place it under OUTPUT by requirement.
    Sort {
        /// Directory holding the mod archives.
        input: PathBuf,
        /// Directory that receives `classified/<Bucket>/` and `unknown/`.
        output: PathBuf,
        /// Files processed concurrently (default from config).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
        /// Move files instead of copying them.
        #[arg(long = "move")]
        move_files: bool,
        /// Write a JSON report of every decision to FILE.
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// Show the search name derived from each file name.
    Normalize {
        /// File names to normalize.
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Extract the client/server requirement from a saved catalog page.
    Extract {
        /// Path to the HTML file.
        path: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> Result<ModsortConfig> {
    match path {
        Some(p) => config::load_from_path(p),
        None => config::load_or_init(),
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = load_config(cli.config.as_deref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Sort {
                input,
                output,
                jobs,
                move_files,
                report,
            } => {
                let opts = SortOptions {
                    input,
                    output,
                    jobs: jobs.unwrap_or(cfg.max_concurrent_files),
                    move_files,
                    report,
                };
                run_sort(&cfg, opts).await?;
            }
            CliCommand::Normalize { names } => run_normalize(&cfg, &names)?,
            CliCommand::Extract { path } => run_extract(&cfg, &path)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
