use serde::{Deserialize, Serialize};

/// Error type for engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Engine is closed; wait_for_complete has already run")]
    Closed,
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Engine lifecycle. Single-batch: `Accepting` → `Draining` → `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// `enqueue` is allowed.
    Accepting,
    /// Inside `wait_for_complete`: joining workers, then draining completions.
    Draining,
    /// No further work or callbacks.
    Closed,
}

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of worker threads. 0 = hardware concurrency.
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
}

fn default_worker_threads() -> usize { 0 }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_threads: default_worker_threads(),
        }
    }
}

impl EngineConfig {
    /// Resolve worker thread count against the detected hardware concurrency.
    pub fn resolved_worker_threads(&self) -> usize {
        clamp_worker_count(self.worker_threads, hardware_concurrency())
    }
}

/// Detected hardware concurrency (at least 1).
pub fn hardware_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Requests of 0 or above `hardware` use `hardware`; anything else is kept.
pub fn clamp_worker_count(requested: usize, hardware: usize) -> usize {
    if requested == 0 || requested > hardware {
        hardware
    } else {
        requested
    }
}
