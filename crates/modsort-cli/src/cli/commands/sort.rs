//! `modsort sort` – run the pipeline over an input directory.

use anyhow::{Context, Result};
use modsort_core::archive;
use modsort_core::classify::Classification;
use modsort_core::config::ModsortConfig;
use modsort_core::control::StopSignal;
use modsort_core::pipeline::{run_batch, Pipeline};
use modsort_core::placement::{PlaceMode, Placer};
use modsort_core::report::BatchReport;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct SortOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub jobs: usize,
    pub move_files: bool,
    pub report: Option<PathBuf>,
}

pub async fn run_sort(cfg: &ModsortConfig, opts: SortOptions) -> Result<()> {
    if !opts.input.is_dir() {
        anyhow::bail!("input {} is not a directory", opts.input.display());
    }
    let found = archive::discover(&opts.input, &cfg.archive_extensions)?;
    if found.is_empty() {
        println!("No files in {}.", opts.input.display());
        return Ok(());
    }

    let mode = if opts.move_files {
        PlaceMode::Move
    } else {
        PlaceMode::Copy
    };
    let placer = Placer::new(&opts.output, mode);
    placer
        .prepare()
        .with_context(|| format!("prepare output {}", opts.output.display()))?;

    let pipeline = Arc::new(Pipeline::with_curl(cfg)?);
    let stop = StopSignal::new();
    stop.stop_on_ctrl_c();

    let total = found.len();
    println!("Sorting {} file(s) with {} worker(s)...", total, opts.jobs.max(1));
    let started = Instant::now();
    let report = run_batch(pipeline, found, &placer, opts.jobs, &stop).await?;
    tracing::info!(
        processed = report.processed(),
        elapsed_secs = started.elapsed().as_secs_f64(),
        "sort finished"
    );

    print_summary(&report);
    if let Some(path) = &opts.report {
        report.write_json(path)?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}

fn print_summary(report: &BatchReport) {
    for c in Classification::ALL {
        println!("{:<16} {}", c.dir_name(), report.count(c));
    }
    for r in report.fallbacks() {
        if let Some(reason) = r.fallback {
            println!("  unknown: {} ({})", r.file, reason);
        }
    }
    if report.not_started > 0 {
        println!("Stopped early: {} file(s) left in input.", report.not_started);
    }
    if report.placement_failures > 0 {
        println!("{} file(s) could not be placed; see log.", report.placement_failures);
    }
}
