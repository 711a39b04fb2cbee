use std::sync::Arc;
use std::time::{Duration, Instant};

use integral_core::{ChannelBuffer, Grid};

use crate::transform::{ChannelKernel, TransformError};

/// What happened when a task ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Not executed yet.
    Pending,
    Succeeded,
    /// The kernel rejected the channel; the output buffer holds no valid data.
    Failed(TransformError),
}

/// One channel of one submitted grid.
///
/// The task shares its source grid read-only with its sibling channels and
/// exclusively owns its output buffer, which is allocated up front and written
/// only by [`ComputeTask::execute`].
#[derive(Debug)]
pub struct ComputeTask {
    id: String,
    grid: Arc<Grid>,
    channel: usize,
    output: ChannelBuffer,
    outcome: TaskOutcome,
    duration: Duration,
}

impl ComputeTask {
    pub fn new(id: impl Into<String>, grid: Arc<Grid>, channel: usize) -> Self {
        let output = ChannelBuffer::new(grid.rows(), grid.cols());
        Self {
            id: id.into(),
            grid,
            channel,
            output,
            outcome: TaskOutcome::Pending,
            duration: Duration::ZERO,
        }
    }

    /// Run `kernel` over this task's channel, recording the outcome.
    pub fn execute(&mut self, kernel: &dyn ChannelKernel) -> Result<(), TransformError> {
        let start = Instant::now();
        let result = kernel.compute(&self.grid, self.channel, &mut self.output);
        self.duration = start.elapsed();
        self.outcome = match result {
            Ok(()) => TaskOutcome::Succeeded,
            Err(e) => TaskOutcome::Failed(e),
        };
        result
    }

    /// Identifier the task was enqueued under.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn channel(&self) -> usize {
        self.channel
    }

    /// Channel count of the source grid, i.e. the size of this task's group.
    pub fn channels(&self) -> usize {
        self.grid.channels()
    }

    pub fn outcome(&self) -> TaskOutcome {
        self.outcome
    }

    pub fn is_success(&self) -> bool {
        self.outcome == TaskOutcome::Succeeded
    }

    /// The result buffer when the channel was computed successfully.
    pub fn result(&self) -> Result<&ChannelBuffer, TransformError> {
        match self.outcome {
            TaskOutcome::Succeeded => Ok(&self.output),
            TaskOutcome::Failed(e) => Err(e),
            TaskOutcome::Pending => Err(TransformError::NotExecuted),
        }
    }

    /// Raw output buffer regardless of outcome.
    pub fn output(&self) -> &ChannelBuffer {
        &self.output
    }

    /// Wall time spent in the kernel.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}
