use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Engine operational counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EngineMetrics {
    /// Worker pool size.
    pub worker_count: usize,
    /// Grids accepted by `enqueue` (zero-channel grids included).
    pub grids_enqueued: u64,
    /// Channel tasks that finished executing, failed ones included.
    pub tasks_executed: u64,
    /// Channel tasks whose kernel returned an error.
    pub tasks_failed: u64,
    /// Completion callbacks fired.
    pub groups_completed: u64,
    /// Average kernel duration across executed tasks.
    pub avg_task_duration: Duration,
    /// When the last group completed.
    pub last_completion: Option<DateTime<Utc>>,
}

impl EngineMetrics {
    pub fn new(worker_count: usize) -> Self {
        Self {
            worker_count,
            ..Self::default()
        }
    }

    /// Record a task execution.
    pub fn record_execution(&mut self, duration: Duration, failed: bool) {
        self.tasks_executed += 1;
        if failed {
            self.tasks_failed += 1;
        }

        // Incremental mean: new_avg = prev_avg + (duration - prev_avg) / count
        let count = self.tasks_executed;
        self.avg_task_duration = if count == 1 {
            duration
        } else {
            let prev_nanos = self.avg_task_duration.as_nanos() as f64;
            let cur_nanos = duration.as_nanos() as f64;
            let avg_nanos = prev_nanos + (cur_nanos - prev_nanos) / count as f64;
            Duration::from_nanos(avg_nanos as u64)
        };
    }

    /// Record a fired completion callback.
    pub fn record_group(&mut self) {
        self.groups_completed += 1;
        self.last_completion = Some(Utc::now());
    }
}
