pub mod engine;
pub mod task;
pub mod transform;

pub use engine::{ComputationEngine, EngineConfig, EngineError, EngineMetrics, EngineState, OnCompleteFn};
pub use task::{ComputeTask, TaskOutcome};
pub use transform::{ChannelKernel, PrefixSum, TransformError, prefix_sum, prefix_sum_into};
