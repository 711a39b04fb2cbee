use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Count of posted tasks that have not finished yet.
#[derive(Debug, Default)]
pub(super) struct PendingTasks {
    count: Mutex<usize>,
    idle: Condvar,
}

impl PendingTasks {
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn add(&self) {
        *self.lock() += 1;
    }

    fn done(&self) {
        let mut count = self.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.idle.notify_all();
        }
    }

    pub(super) fn current(&self) -> usize {
        *self.lock()
    }

    /// Block until every added task is done.
    pub(super) fn wait_idle(&self) {
        let mut count = self.lock();
        while *count > 0 {
            count = self.idle.wait(count).unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// Marks one task done when dropped, including on unwind.
pub(super) struct PendingGuard<'a>(pub(super) &'a PendingTasks);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.done();
    }
}
