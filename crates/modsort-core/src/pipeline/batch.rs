//! Batch run: bounded concurrent pipelines with a single placing collector.
//!
//! Up to `limit` files are in flight at once; when one finishes, its result is
//! placed and the next file is started until the input is exhausted or a stop
//! is requested.

use anyhow::Result;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::archive::{ArchiveFile, Discovered};
use crate::classify::Classification;
use crate::control::StopSignal;
use crate::placement::Placer;
use crate::report::{BatchReport, FileRecord};

use super::{Fallback, Pipeline, Resolution};

/// Sorts every discovered file. Non-archives go straight to `unknown`.
/// Placement failures are logged and counted; they do not end the run.
/// Files not started because of a stop stay in the input and are counted.
pub async fn run_batch(
    pipeline: Arc<Pipeline>,
    discovered: Discovered,
    placer: &Placer,
    limit: usize,
    stop: &StopSignal,
) -> Result<BatchReport> {
    let process = move |file: ArchiveFile| {
        let pipeline = Arc::clone(&pipeline);
        async move { pipeline.process(&file).await }
    };
    sort_files(discovered, placer, limit, stop, process).await
}

/// Batch loop over any per-file resolver. Each file resolves on its own task;
/// a task that panics sends its file to `unknown` with `TaskFailed`.
pub(super) async fn sort_files<F, Fut>(
    discovered: Discovered,
    placer: &Placer,
    limit: usize,
    stop: &StopSignal,
    process: F,
) -> Result<BatchReport>
where
    F: Fn(ArchiveFile) -> Fut,
    Fut: Future<Output = Resolution> + Send + 'static,
{
    let limit = limit.max(1);
    let mut report = BatchReport::new();

    for file in discovered.others {
        let res = Resolution::fallback(Fallback::NotArchive);
        let dest = place(placer, &file, res.classification);
        report.record(FileRecord::new(&file, &res, dest));
    }

    let mut queue = discovered.archives.into_iter();
    let mut join_set = JoinSet::new();

    loop {
        while join_set.len() < limit && !stop.is_stopped() {
            let Some(file) = queue.next() else {
                break;
            };
            let task = tokio::spawn(process(file.clone()));
            join_set.spawn(async move {
                let res = match task.await {
                    Ok(res) => res,
                    Err(e) => {
                        tracing::error!(file = %file.display_name(), "pipeline task failed: {}", e);
                        Resolution::fallback(Fallback::TaskFailed).with_error(e)
                    }
                };
                (file, res)
            });
        }

        if join_set.is_empty() {
            break;
        }

        let Some(joined) = join_set.join_next().await else {
            break;
        };
        match joined {
            Ok((file, res)) => {
                let dest = place(placer, &file, res.classification);
                report.record(FileRecord::new(&file, &res, dest));
            }
            Err(e) => tracing::error!("batch task join: {}", e),
        }
    }

    report.not_started = queue.count();
    if report.not_started > 0 {
        tracing::warn!(not_started = report.not_started, "batch stopped early");
    }
    report.finish();
    Ok(report)
}

fn place(placer: &Placer, file: &ArchiveFile, classification: Classification) -> Option<PathBuf> {
    match placer.place(file, classification) {
        Ok(dest) => Some(dest),
        Err(e) => {
            tracing::error!(file = %file.display_name(), "placement failed: {:#}", e);
            None
        }
    }
}
