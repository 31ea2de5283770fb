//! Batch execution of independent statistics jobs with configurable parallelism.
//!
//! Each [`StatsJob`] is a pure function of its inputs, so a batch (for instance categorical
//! and numerical statistics for several synthetic runs) can run concurrently. This module adds:
//!
//! - a dedicated rayon pool
//! - a cap on concurrently running jobs
//! - real-time metrics + observer hooks for monitoring

mod observer;
mod semaphore;

use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::EvalResult;
use crate::processing::StatsTable;
use crate::stats::StatsJob;

pub use observer::{
    ExecutionEvent, ExecutionMetrics, ExecutionMetricsSnapshot, ExecutionObserver,
    TracingExecutionObserver,
};

use semaphore::Semaphore;

/// Configuration for the [`ExecutionEngine`].
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Number of worker threads used by the engine.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Upper bound on concurrently running jobs.
    ///
    /// Each job clones its input table, so this also bounds peak memory.
    pub max_in_flight_jobs: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        let n = available_threads();
        Self {
            num_threads: Some(n),
            max_in_flight_jobs: n,
        }
    }
}

/// Runs batches of [`StatsJob`]s on a private thread pool.
pub struct ExecutionEngine {
    pool: ThreadPool,
    opts: ExecutionOptions,
    observer: Option<Arc<dyn ExecutionObserver>>,
    metrics: Arc<ExecutionMetrics>,
}

impl ExecutionEngine {
    /// Create a new engine with the given options.
    ///
    /// # Errors
    ///
    /// [`crate::EvalError::ThreadPool`] if the rayon pool cannot be built.
    ///
    /// # Panics
    ///
    /// Panics if `max_in_flight_jobs == 0` or `num_threads == Some(0)`.
    pub fn new(opts: ExecutionOptions) -> EvalResult<Self> {
        assert!(opts.max_in_flight_jobs > 0, "max_in_flight_jobs must be > 0");
        if let Some(n) = opts.num_threads {
            assert!(n > 0, "num_threads must be > 0 when set");
        }

        let n_threads = opts.num_threads.unwrap_or_else(available_threads).max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .build()?;

        Ok(Self {
            pool,
            opts,
            observer: None,
            metrics: Arc::new(ExecutionMetrics::new()),
        })
    }

    /// Attach an observer for execution events.
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to real-time execution metrics.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run every job and return their results in job order.
    ///
    /// A failing job does not stop the others; its error is returned in its slot.
    pub fn run_stats_batch(&self, jobs: &[StatsJob]) -> Vec<EvalResult<StatsTable>> {
        self.pool.install(|| self.run_batch_impl(jobs))
    }

    fn run_batch_impl(&self, jobs: &[StatsJob]) -> Vec<EvalResult<StatsTable>> {
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(ExecutionEvent::RunStarted { jobs: jobs.len() });

        let sem = Semaphore::new(self.opts.max_in_flight_jobs);
        let results = jobs
            .par_iter()
            .map(|job| {
                let permit = sem.acquire();
                if permit.waited > Duration::ZERO {
                    self.metrics.on_throttle_wait(permit.waited);
                    self.emit(ExecutionEvent::ThrottleWaited {
                        duration: permit.waited,
                    });
                }

                self.metrics.on_job_start();
                self.emit(ExecutionEvent::JobStarted {
                    name: job.name.clone(),
                });

                let out = job.run();
                match &out {
                    Ok(table) => self.emit(ExecutionEvent::JobFinished {
                        name: job.name.clone(),
                        output_rows: table.row_count(),
                    }),
                    Err(e) => self.emit(ExecutionEvent::JobFailed {
                        name: job.name.clone(),
                        error: e.to_string(),
                    }),
                }
                self.metrics.on_job_end(out.is_ok());
                drop(permit);
                out
            })
            .collect();

        self.metrics.end_run(start.elapsed());
        self.emit(ExecutionEvent::RunFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });

        results
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

fn available_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
