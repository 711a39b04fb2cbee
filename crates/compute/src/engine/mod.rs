//! Batch computation engine with a bounded worker pool and a cooperative
//! completion sequencer.
//!
//! [`ComputationEngine::enqueue`] splits a grid into one [`ComputeTask`] per
//! channel and posts them to a rayon pool. Finished tasks are handed over a
//! channel to the sequencer, which groups them by identifier and fires the
//! completion callback once per fully-computed grid, channels in ascending
//! order. The sequencer only runs on the thread calling
//! [`ComputationEngine::dispatch_ready`] or
//! [`ComputationEngine::wait_for_complete`], so the grouping map is never
//! touched by workers.
//!
//! [`ComputeTask`]: crate::task::ComputeTask

mod core;
pub mod metrics;
mod pending;
mod sequencer;
pub mod types;

pub use self::core::{ComputationEngine, OnCompleteFn};
pub use metrics::EngineMetrics;
pub use types::{EngineConfig, EngineError, EngineState, clamp_worker_count, hardware_concurrency};
