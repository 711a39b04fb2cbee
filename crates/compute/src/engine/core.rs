use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, RwLock};

use integral_core::Grid;
use tracing::{debug, error, info, warn};

use crate::task::ComputeTask;
use crate::transform::{ChannelKernel, PrefixSum};

use super::metrics::EngineMetrics;
use super::pending::{PendingGuard, PendingTasks};
use super::sequencer::CompletionSequencer;
use super::types::{EngineConfig, EngineError, EngineState, clamp_worker_count, hardware_concurrency};

/// Completion handler: receives every task of one identifier, sorted by
/// ascending channel index.
pub type OnCompleteFn = Box<dyn FnMut(&[ComputeTask]) + Send>;

/// Computes per-channel summed-area tables for submitted grids.
///
/// ```no_run
/// use std::sync::Arc;
/// use integral_compute::ComputationEngine;
/// use integral_core::Grid;
///
/// let mut engine = ComputationEngine::new(0)?;
/// engine.set_on_complete(|tasks| {
///     for task in tasks {
///         println!("{} channel {}: {:?}", task.id(), task.channel(), task.result());
///     }
/// });
/// let grid = Arc::new(Grid::new(2, 2, 1, vec![1u8, 2, 3, 4])?);
/// engine.enqueue("lena", grid)?;
/// engine.wait_for_complete();
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ComputationEngine {
    pool: rayon::ThreadPool,
    kernel: Arc<dyn ChannelKernel>,
    state: EngineState,
    /// Handed to every posted task; dropped when draining starts.
    completed_tx: Option<Sender<ComputeTask>>,
    sequencer: CompletionSequencer,
    pending: Arc<PendingTasks>,
    metrics: Arc<RwLock<EngineMetrics>>,
}

impl ComputationEngine {
    /// Create an engine running the prefix-sum kernel.
    ///
    /// `requested_workers` of 0, or above the hardware concurrency, is
    /// clamped to the hardware concurrency.
    pub fn new(requested_workers: usize) -> Result<Self, EngineError> {
        Self::with_kernel(requested_workers, Arc::new(PrefixSum))
    }

    /// Create a prefix-sum engine sized by `config`.
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        Self::new(config.resolved_worker_threads())
    }

    /// Create an engine running a custom kernel.
    pub fn with_kernel(requested_workers: usize, kernel: Arc<dyn ChannelKernel>) -> Result<Self, EngineError> {
        let num_workers = clamp_worker_count(requested_workers, hardware_concurrency());
        info!("Worker count: requested {}, using {}", requested_workers, num_workers);
        Self::with_pool_size(num_workers, kernel)
    }

    /// Build with exactly `num_workers` threads, skipping the hardware clamp.
    pub(super) fn with_pool_size(num_workers: usize, kernel: Arc<dyn ChannelKernel>) -> Result<Self, EngineError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_workers)
            .thread_name(|i| format!("integral-worker-{}", i))
            .panic_handler(|_| error!("Channel task panicked; its group will never complete"))
            .build()?;

        let metrics = Arc::new(RwLock::new(EngineMetrics::new(num_workers)));
        let (tx, rx) = mpsc::channel();
        info!(
            "Computation engine starting with {} workers, kernel: {}",
            num_workers,
            kernel.name()
        );

        Ok(Self {
            pool,
            kernel,
            state: EngineState::Accepting,
            completed_tx: Some(tx),
            sequencer: CompletionSequencer::new(rx, Arc::clone(&metrics)),
            pending: Arc::new(PendingTasks::default()),
            metrics,
        })
    }

    /// Register the completion handler, replacing any previous one.
    pub fn set_on_complete<F>(&mut self, f: F)
    where
        F: FnMut(&[ComputeTask]) + Send + 'static,
    {
        self.sequencer.set_on_complete(Box::new(f));
    }

    /// Post one task per channel of `grid` to the worker pool.
    ///
    /// Returns once every task is posted, not when they finish. A grid with
    /// no channels posts nothing and never completes.
    pub fn enqueue(&self, id: &str, grid: Arc<Grid>) -> Result<bool, EngineError> {
        if self.state != EngineState::Accepting {
            return Err(EngineError::Closed);
        }
        let tx = self.completed_tx.as_ref().ok_or(EngineError::Closed)?;

        if let Ok(mut m) = self.metrics.write() {
            m.grids_enqueued += 1;
        }
        let channels = grid.channels();
        if channels == 0 {
            debug!(id = %id, "Grid has no channels, nothing to post");
            return Ok(true);
        }

        for channel in 0..channels {
            let mut task = ComputeTask::new(id, Arc::clone(&grid), channel);
            let tx = tx.clone();
            let kernel = Arc::clone(&self.kernel);
            let pending = Arc::clone(&self.pending);
            let metrics = Arc::clone(&self.metrics);

            self.pending.add();
            self.pool.spawn(move || {
                // Released after the hand-off below, or on unwind.
                let _guard = PendingGuard(&pending);

                let failed = match task.execute(kernel.as_ref()) {
                    Ok(()) => false,
                    Err(e) => {
                        warn!(id = %task.id(), channel = task.channel(), error = %e, "{}: {}", task.id(), e);
                        true
                    }
                };
                if let Ok(mut m) = metrics.write() {
                    m.record_execution(task.duration(), failed);
                }

                if tx.send(task).is_err() {
                    warn!("Completion sequencer is gone; dropping finished task");
                }
            });
        }

        debug!(id = %id, channels, "Posted channel tasks");
        Ok(true)
    }

    /// Fire callbacks for groups that are already complete, without blocking.
    /// Returns the number of callbacks fired.
    pub fn dispatch_ready(&mut self) -> usize {
        self.sequencer.drain()
    }

    /// Block until every posted task has run, then fire all due callbacks.
    ///
    /// Closes the engine: later `enqueue` calls fail with
    /// [`EngineError::Closed`] and no callback fires after this returns.
    pub fn wait_for_complete(&mut self) {
        if self.state == EngineState::Closed {
            return;
        }
        self.state = EngineState::Draining;
        self.completed_tx = None;

        debug!("Waiting for {} pending tasks", self.pending.current());
        self.pending.wait_idle();

        let fired = self.sequencer.drain();
        if self.sequencer.open_groups() > 0 {
            let open: Vec<&str> = self.sequencer.open_ids().collect();
            warn!("{} groups never completed: {:?}", open.len(), open);
        }
        self.state = EngineState::Closed;

        let m = self.metrics();
        info!(
            "Computation complete: {} groups ({} in final drain), {} tasks, {} failed, avg {:?}/task",
            m.groups_completed, fired, m.tasks_executed, m.tasks_failed, m.avg_task_duration
        );
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Worker pool size.
    pub fn worker_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Tasks posted but not yet finished.
    pub fn pending_tasks(&self) -> usize {
        self.pending.current()
    }

    /// Get a snapshot of the current engine metrics.
    pub fn metrics(&self) -> EngineMetrics {
        self.metrics
            .read()
            .map(|m| m.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }
}
