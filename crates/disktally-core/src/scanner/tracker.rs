/// Completion tracker — counts traversal tasks that have not finished yet.
///
/// The number of tasks is only discovered while walking, so this is a
/// counter rather than a fixed-size barrier: a parent registers each child
/// with [`CompletionTracker::begin`] *before* spawning it, and every task
/// finishes exactly once through its [`TaskGuard`]. Because the parent is
/// itself still registered while it registers children, the count cannot
/// touch zero until the whole subtree is done.
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
#[cfg(test)]
use std::time::Duration;

#[derive(Debug, Default)]
pub struct CompletionTracker {
    outstanding: Mutex<usize>,
    zero: Condvar,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one task that is about to be spawned.
    ///
    /// The returned guard must be moved into the task; dropping it marks the
    /// task finished.
    pub fn begin(self: &Arc<Self>) -> TaskGuard {
        *self.outstanding.lock() += 1;
        TaskGuard {
            tracker: Arc::clone(self),
        }
    }

    fn finish(&self) {
        let mut outstanding = self.outstanding.lock();
        debug_assert!(*outstanding > 0, "task finished more than once");
        *outstanding = outstanding.saturating_sub(1);
        if *outstanding == 0 {
            self.zero.notify_all();
        }
    }

    #[cfg(test)]
    fn outstanding(&self) -> usize {
        *self.outstanding.lock()
    }

    /// Block until every registered task has finished.
    pub fn wait(&self) {
        let mut outstanding = self.outstanding.lock();
        while *outstanding > 0 {
            self.zero.wait(&mut outstanding);
        }
    }

    /// Returns `true` if the count reached zero within `timeout`.
    #[cfg(test)]
    fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut outstanding = self.outstanding.lock();
        let deadline = std::time::Instant::now() + timeout;
        while *outstanding > 0 {
            if self.zero.wait_until(&mut outstanding, deadline).timed_out() {
                return *outstanding == 0;
            }
        }
        true
    }
}

/// Proof that one task is registered with a [`CompletionTracker`].
///
/// Dropping it (normal return, early exit, or unwinding) finishes the task.
#[derive(Debug)]
pub struct TaskGuard {
    tracker: Arc<CompletionTracker>,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.tracker.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn empty_tracker_does_not_block() {
        let tracker = CompletionTracker::new();
        assert_eq!(tracker.outstanding(), 0);
        tracker.wait();
    }

    #[test]
    fn guard_drop_finishes_task() {
        let tracker = Arc::new(CompletionTracker::new());
        let a = tracker.begin();
        let b = tracker.begin();
        assert_eq!(tracker.outstanding(), 2);
        drop(a);
        assert!(!tracker.wait_timeout(Duration::from_millis(10)));
        drop(b);
        assert!(tracker.wait_timeout(Duration::from_millis(10)));
    }

    #[test]
    fn wait_covers_tasks_spawned_by_tasks() {
        let tracker = Arc::new(CompletionTracker::new());
        let root = tracker.begin();
        let t = Arc::clone(&tracker);
        let handle = thread::spawn(move || {
            let _root = root;
            // Children registered while the parent is still alive.
            let children: Vec<_> = (0..4)
                .map(|_| {
                    let guard = t.begin();
                    thread::spawn(move || {
                        thread::sleep(Duration::from_millis(10));
                        drop(guard);
                    })
                })
                .collect();
            children
        });
        tracker.wait();
        assert_eq!(tracker.outstanding(), 0);
        for child in handle.join().unwrap() {
            child.join().unwrap();
        }
    }

    #[test]
    fn guard_finishes_during_unwind() {
        let tracker = Arc::new(CompletionTracker::new());
        let guard = tracker.begin();
        let result = thread::spawn(move || {
            let _guard = guard;
            panic!("task blew up");
        })
        .join();
        assert!(result.is_err());
        assert_eq!(tracker.outstanding(), 0);
    }
}
