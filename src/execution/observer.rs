use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Events emitted while a batch of stats jobs runs.
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    RunStarted { jobs: usize },
    ThrottleWaited { duration: Duration },
    JobStarted { name: String },
    JobFinished { name: String, output_rows: usize },
    JobFailed { name: String, error: String },
    RunFinished {
        elapsed: Duration,
        metrics: ExecutionMetricsSnapshot,
    },
}

/// Observer hook for execution events.
pub trait ExecutionObserver: Send + Sync {
    fn on_event(&self, event: &ExecutionEvent);
}

/// Forwards execution events to `tracing` (failures at warn level, the rest at debug/info).
#[derive(Debug, Default)]
pub struct TracingExecutionObserver;

impl ExecutionObserver for TracingExecutionObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        match event {
            ExecutionEvent::RunStarted { jobs } => tracing::info!(jobs, "stats batch started"),
            ExecutionEvent::ThrottleWaited { duration } => {
                tracing::debug!(?duration, "stats job throttled")
            }
            ExecutionEvent::JobStarted { name } => tracing::debug!(job = %name, "stats job started"),
            ExecutionEvent::JobFinished { name, output_rows } => {
                tracing::debug!(job = %name, output_rows, "stats job finished")
            }
            ExecutionEvent::JobFailed { name, error } => {
                tracing::warn!(job = %name, %error, "stats job failed")
            }
            ExecutionEvent::RunFinished { elapsed, metrics } => {
                tracing::info!(?elapsed, %metrics, "stats batch finished")
            }
        }
    }
}

/// Real-time counters for a batch run.
///
/// The engine updates these during execution; callers can snapshot them at any time.
pub struct ExecutionMetrics {
    run_id: AtomicU64,
    elapsed_ns: AtomicU64,

    jobs_started: AtomicU64,
    jobs_finished: AtomicU64,
    jobs_failed: AtomicU64,
    throttle_wait_ns: AtomicU64,

    active_jobs: AtomicUsize,
    max_active_jobs: AtomicUsize,
}

impl ExecutionMetrics {
    pub fn new() -> Self {
        Self {
            run_id: AtomicU64::new(0),
            elapsed_ns: AtomicU64::new(0),
            jobs_started: AtomicU64::new(0),
            jobs_finished: AtomicU64::new(0),
            jobs_failed: AtomicU64::new(0),
            throttle_wait_ns: AtomicU64::new(0),
            active_jobs: AtomicUsize::new(0),
            max_active_jobs: AtomicUsize::new(0),
        }
    }

    pub fn begin_run(&self) {
        self.run_id.fetch_add(1, Ordering::SeqCst);
        self.elapsed_ns.store(0, Ordering::SeqCst);
        self.jobs_started.store(0, Ordering::SeqCst);
        self.jobs_finished.store(0, Ordering::SeqCst);
        self.jobs_failed.store(0, Ordering::SeqCst);
        self.throttle_wait_ns.store(0, Ordering::SeqCst);
        self.active_jobs.store(0, Ordering::SeqCst);
        self.max_active_jobs.store(0, Ordering::SeqCst);
    }

    pub fn end_run(&self, elapsed: Duration) {
        self.elapsed_ns.store(as_nanos_u64(elapsed), Ordering::SeqCst);
    }

    pub fn on_job_start(&self) {
        self.jobs_started.fetch_add(1, Ordering::SeqCst);
        let now = self.active_jobs.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active_jobs.fetch_max(now, Ordering::SeqCst);
    }

    /// Record the end of a job; `ok` is false when it returned an error.
    pub fn on_job_end(&self, ok: bool) {
        if ok {
            self.jobs_finished.fetch_add(1, Ordering::SeqCst);
        } else {
            self.jobs_failed.fetch_add(1, Ordering::SeqCst);
        }
        self.active_jobs.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn on_throttle_wait(&self, d: Duration) {
        self.throttle_wait_ns.fetch_add(as_nanos_u64(d), Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> ExecutionMetricsSnapshot {
        let elapsed_ns = self.elapsed_ns.load(Ordering::SeqCst);
        ExecutionMetricsSnapshot {
            run_id: self.run_id.load(Ordering::SeqCst),
            elapsed: (elapsed_ns > 0).then(|| Duration::from_nanos(elapsed_ns)),
            jobs_started: self.jobs_started.load(Ordering::SeqCst),
            jobs_finished: self.jobs_finished.load(Ordering::SeqCst),
            jobs_failed: self.jobs_failed.load(Ordering::SeqCst),
            throttle_wait: Duration::from_nanos(self.throttle_wait_ns.load(Ordering::SeqCst)),
            max_active_jobs: self.max_active_jobs.load(Ordering::SeqCst),
        }
    }
}

impl Default for ExecutionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn as_nanos_u64(d: Duration) -> u64 {
    d.as_nanos().min(u64::MAX as u128) as u64
}

/// Immutable snapshot of [`ExecutionMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionMetricsSnapshot {
    pub run_id: u64,
    pub elapsed: Option<Duration>,
    pub jobs_started: u64,
    pub jobs_finished: u64,
    pub jobs_failed: u64,
    pub throttle_wait: Duration,
    pub max_active_jobs: usize,
}

impl fmt::Display for ExecutionMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run_id={}, jobs={}/{} (failed={}), max_active_jobs={}, throttle_wait={:?}, elapsed={:?}",
            self.run_id,
            self.jobs_finished,
            self.jobs_started,
            self.jobs_failed,
            self.max_active_jobs,
            self.throttle_wait,
            self.elapsed
        )
    }
}
