use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::catalog::scan::LayerCatalog;
use crate::combine::product::Combination;
use crate::config::settings::{RenderSettings, RunConfig};
use crate::encode::naming::{OutputArtifact, output_identifier};
use crate::encode::sink::ArtifactSink;
use crate::foundation::error::{LayermixError, LayermixResult};
use crate::render::composite::compose;

/// Pool and failure-handling controls for [`generate_all`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Worker thread count; `None` uses the available parallelism. Must be >= 1 when set.
    pub threads: Option<usize>,
    /// Stop dispatching after the first failed combination and return its error.
    pub fail_fast: bool,
}

impl RunOptions {
    /// Options taken from the `workers` and `failFast` config keys.
    pub fn from_config(cfg: &RunConfig) -> Self {
        Self {
            threads: cfg.workers,
            fail_fast: cfg.fail_fast,
        }
    }
}

/// A combination that was rendered and handed to the sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskSuccess {
    /// Enumeration ordinal.
    pub ordinal: u64,
    /// Output file name (`<identifier>.jpg`).
    pub file_name: String,
    /// Wall time spent decoding, compositing, encoding, and writing.
    pub elapsed: Duration,
}

/// A combination that could not be produced.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TaskFailure {
    /// Enumeration ordinal.
    pub ordinal: u64,
    /// Identifier the output would have been written under.
    pub identifier: String,
    /// Layer paths of the combination, bottom first.
    pub layers: Vec<PathBuf>,
    /// Rendered error message (names the offending category and file when known).
    pub error: String,
}

/// Terminal state of one task. Tasks run to completion once started; there are no retries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Output written.
    Completed(TaskSuccess),
    /// Decode, encode, or write failed.
    Failed(TaskFailure),
}

/// Aggregated result of a run.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RunReport {
    /// Number of combinations in the catalog.
    pub total: u64,
    /// Combinations written successfully.
    pub completed: u64,
    /// Failed combinations ordered by ordinal.
    pub failures: Vec<TaskFailure>,
    /// Wall time of the whole run.
    pub elapsed: Duration,
}

impl RunReport {
    /// `true` when every combination was written.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.completed == self.total
    }
}

/// Decode, composite, encode, and persist one combination.
pub fn render_combination(
    combo: &Combination,
    settings: &RenderSettings,
    sink: &dyn ArtifactSink,
) -> LayermixResult<String> {
    let raster = compose(combo, settings)?;
    let artifact = OutputArtifact::encode(combo, &raster, settings.jpeg_quality)?;
    sink.put(&artifact)?;
    Ok(artifact.file_name())
}

/// Run one task and capture its terminal state instead of propagating the error.
pub fn run_task(
    combo: &Combination,
    settings: &RenderSettings,
    sink: &dyn ArtifactSink,
) -> TaskOutcome {
    let started = Instant::now();
    match render_combination(combo, settings, sink) {
        Ok(file_name) => TaskOutcome::Completed(TaskSuccess {
            ordinal: combo.ordinal(),
            file_name,
            elapsed: started.elapsed(),
        }),
        Err(err) => TaskOutcome::Failed(failure_for(combo, &err)),
    }
}

fn failure_for(combo: &Combination, err: &LayermixError) -> TaskFailure {
    TaskFailure {
        ordinal: combo.ordinal(),
        identifier: output_identifier(combo),
        layers: combo.paths().map(|p| p.to_path_buf()).collect(),
        error: err.to_string(),
    }
}

/// Render every combination of `catalog` into `sink` on a bounded worker pool.
///
/// Combinations are streamed from the enumerator into the pool, so at most one canvas per
/// worker is alive at a time. The call returns once every dispatched task has completed
/// or failed.
///
/// With `fail_fast == false` failures are isolated and listed in the returned
/// [`RunReport`]. With `fail_fast == true` no new tasks start once a failure is seen,
/// tasks already running finish, and a failure is returned as the error. When several
/// tasks fail concurrently it is not necessarily the one with the lowest ordinal.
pub fn generate_all(
    catalog: &LayerCatalog,
    settings: &RenderSettings,
    sink: &dyn ArtifactSink,
    opts: &RunOptions,
) -> LayermixResult<RunReport> {
    let total = catalog.combination_count()?;
    let combos = catalog.combinations()?;
    let pool = build_thread_pool(opts.threads)?;

    tracing::info!(
        total,
        workers = pool.current_num_threads(),
        "generating {total} images"
    );

    let started = Instant::now();
    let finished = AtomicU64::new(0);
    let observe = |outcome: &TaskOutcome| {
        let n = finished.fetch_add(1, Ordering::Relaxed) + 1;
        log_outcome(outcome, n, total);
    };

    if opts.fail_fast {
        let completed = AtomicU64::new(0);
        pool.install(|| {
            combos.par_bridge().try_for_each(|combo| {
                let started = Instant::now();
                match render_combination(&combo, settings, sink) {
                    Ok(file_name) => {
                        observe(&TaskOutcome::Completed(TaskSuccess {
                            ordinal: combo.ordinal(),
                            file_name,
                            elapsed: started.elapsed(),
                        }));
                        completed.fetch_add(1, Ordering::Relaxed);
                        Ok(())
                    }
                    Err(err) => {
                        observe(&TaskOutcome::Failed(failure_for(&combo, &err)));
                        Err(err)
                    }
                }
            })
        })?;
        return Ok(RunReport {
            total,
            completed: completed.into_inner(),
            failures: Vec::new(),
            elapsed: started.elapsed(),
        });
    }

    let tally = pool.install(|| {
        combos
            .par_bridge()
            .map(|combo| {
                let outcome = run_task(&combo, settings, sink);
                observe(&outcome);
                outcome
            })
            .fold(RunTally::default, RunTally::record)
            .reduce(RunTally::default, RunTally::merge)
    });

    let mut failures = tally.failures;
    failures.sort_by_key(|f| f.ordinal);
    let report = RunReport {
        total,
        completed: tally.completed,
        failures,
        elapsed: started.elapsed(),
    };
    tracing::info!(
        completed = report.completed,
        failed = report.failures.len(),
        elapsed = ?report.elapsed,
        "run finished"
    );
    Ok(report)
}

fn log_outcome(outcome: &TaskOutcome, n: u64, total: u64) {
    match outcome {
        TaskOutcome::Completed(done) => {
            tracing::info!(
                "[{n}/{total}] generated {} in {:?}",
                done.file_name,
                done.elapsed
            );
        }
        TaskOutcome::Failed(failure) => {
            tracing::warn!(
                ordinal = failure.ordinal,
                identifier = %failure.identifier,
                "[{n}/{total}] failed: {}",
                failure.error
            );
        }
    }
}

#[derive(Debug, Default)]
struct RunTally {
    completed: u64,
    failures: Vec<TaskFailure>,
}

impl RunTally {
    fn record(mut self, outcome: TaskOutcome) -> Self {
        match outcome {
            TaskOutcome::Completed(_) => self.completed += 1,
            TaskOutcome::Failed(failure) => self.failures.push(failure),
        }
        self
    }

    fn merge(mut self, mut other: Self) -> Self {
        self.completed += other.completed;
        self.failures.append(&mut other.failures);
        self
    }
}

fn build_thread_pool(threads: Option<usize>) -> LayermixResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(LayermixError::config("worker count must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("layermix-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().map_err(|e| {
        LayermixError::Other(anyhow::anyhow!("failed to build worker pool: {e}"))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/coordinator.rs"]
mod tests;
