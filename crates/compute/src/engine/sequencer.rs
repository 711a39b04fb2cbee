use std::collections::HashMap;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::task::ComputeTask;

use super::core::OnCompleteFn;
use super::metrics::EngineMetrics;

/// Regroups finished tasks by identifier.
///
/// Owns the identifier → group map outright; workers reach it only by sending
/// tasks through `completed`.
pub(super) struct CompletionSequencer {
    completed: Receiver<ComputeTask>,
    groups: HashMap<String, Vec<ComputeTask>>,
    on_complete: Option<OnCompleteFn>,
    metrics: Arc<RwLock<EngineMetrics>>,
}

impl CompletionSequencer {
    pub(super) fn new(completed: Receiver<ComputeTask>, metrics: Arc<RwLock<EngineMetrics>>) -> Self {
        Self {
            completed,
            groups: HashMap::new(),
            on_complete: None,
            metrics,
        }
    }

    pub(super) fn set_on_complete(&mut self, f: OnCompleteFn) {
        self.on_complete = Some(f);
    }

    /// Process every task already handed over. Returns the number of
    /// callbacks fired.
    pub(super) fn drain(&mut self) -> usize {
        let mut fired = 0;
        while let Ok(task) = self.completed.try_recv() {
            if self.accept(task) {
                fired += 1;
            }
        }
        fired
    }

    /// Number of identifiers still waiting for channels.
    pub(super) fn open_groups(&self) -> usize {
        self.groups.len()
    }

    /// Identifiers still waiting for channels.
    pub(super) fn open_ids(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    fn accept(&mut self, task: ComputeTask) -> bool {
        let channels = task.channels();
        debug!(
            id = %task.id(),
            "Task completed: {} [{}/{}]",
            task.id(),
            task.channel() + 1,
            channels
        );

        let id = task.id().to_string();
        let group = self.groups.entry(id.clone()).or_default();
        group.push(task);
        if group.len() < channels {
            return false;
        }

        let Some(mut tasks) = self.groups.remove(&id) else {
            return false;
        };
        tasks.sort_by_key(|t| t.channel());

        if let Some(on_complete) = self.on_complete.as_mut() {
            on_complete(&tasks);
        }
        if let Ok(mut m) = self.metrics.write() {
            m.record_group();
        }
        debug!(id = %id, channels, "Group complete");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::Mutex;

    use integral_core::{ElementType, Grid};

    fn sequencer() -> (mpsc::Sender<ComputeTask>, CompletionSequencer, Arc<Mutex<Vec<Vec<usize>>>>) {
        let (tx, rx) = mpsc::channel();
        let mut seq = CompletionSequencer::new(rx, Arc::new(RwLock::new(EngineMetrics::default())));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        seq.set_on_complete(Box::new(move |tasks: &[ComputeTask]| {
            sink.lock().unwrap().push(tasks.iter().map(|t| t.channel()).collect());
        }));
        (tx, seq, seen)
    }

    #[test]
    fn fires_once_full_and_sorted() {
        let (tx, mut seq, seen) = sequencer();
        let grid = Arc::new(Grid::zeros(1, 1, 3, ElementType::U8).unwrap());

        tx.send(ComputeTask::new("g", Arc::clone(&grid), 2)).unwrap();
        tx.send(ComputeTask::new("g", Arc::clone(&grid), 0)).unwrap();
        assert_eq!(seq.drain(), 0);
        assert_eq!(seq.open_groups(), 1);
        assert_eq!(seq.open_ids().collect::<Vec<_>>(), vec!["g"]);

        tx.send(ComputeTask::new("g", grid, 1)).unwrap();
        assert_eq!(seq.drain(), 1);
        assert_eq!(seq.open_groups(), 0);
        assert_eq!(*seen.lock().unwrap(), vec![vec![0, 1, 2]]);
        assert_eq!(seq.metrics.read().unwrap().groups_completed, 1);
    }

    #[test]
    fn groups_are_independent_per_id() {
        let (tx, mut seq, seen) = sequencer();
        let two = Arc::new(Grid::zeros(1, 1, 2, ElementType::U8).unwrap());
        let one = Arc::new(Grid::zeros(1, 1, 1, ElementType::U8).unwrap());

        tx.send(ComputeTask::new("a", Arc::clone(&two), 1)).unwrap();
        tx.send(ComputeTask::new("b", one, 0)).unwrap();
        tx.send(ComputeTask::new("a", two, 0)).unwrap();
        assert_eq!(seq.drain(), 2);
        assert_eq!(*seen.lock().unwrap(), vec![vec![0], vec![0, 1]]);
    }

    #[test]
    fn drain_without_callback_still_clears_groups() {
        let (tx, rx) = mpsc::channel();
        let mut seq = CompletionSequencer::new(rx, Arc::new(RwLock::new(EngineMetrics::default())));
        let grid = Arc::new(Grid::zeros(1, 1, 1, ElementType::U8).unwrap());
        tx.send(ComputeTask::new("x", grid, 0)).unwrap();
        drop(tx);
        assert_eq!(seq.drain(), 1);
        assert_eq!(seq.open_groups(), 0);
    }
}
