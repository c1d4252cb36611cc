/// Walk coordinator — recursive fan-out of traversal tasks.
///
/// One task per root, then one task per discovered subdirectory, all running
/// on a dedicated rayon pool. A task:
///
/// 1. returns at once if the scan is cancelled;
/// 2. waits for a throttle permit (or cancellation);
/// 3. lists its directory and releases the permit immediately;
/// 4. spawns a child task per subdirectory and pushes one
///    [`WalkEvent::File`] per regular file into the event channel.
///
/// The event channel is a rendezvous channel: a push blocks until the
/// aggregator takes it, which is the backpressure that keeps producers from
/// running ahead of the consumer.
///
/// # Closing the channel
///
/// Every task holds an `Arc<WalkContext>`, and the context owns the only
/// `Sender`. A watcher thread keeps one more clone, waits on the
/// [`CompletionTracker`] and drops its clone once the count reaches zero.
/// Tasks release their context *before* their tracker guard, so at that
/// point the watcher's clone is the last one and the channel closes exactly
/// once, when no task can still send.
use crate::error::ScanError;
use crate::scanner::cancel::CancelSignal;
use crate::scanner::lister::DirLister;
use crate::scanner::throttle::Throttle;
use crate::scanner::tracker::{CompletionTracker, TaskGuard};
use crossbeam_channel::{Receiver, Sender};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, warn};

/// Messages flowing from traversal tasks to the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEvent {
    /// One regular file and its size in bytes.
    File(u64),
    /// One directory listed successfully.
    Directory,
    /// A directory could not be listed; it contributes nothing else.
    Failed { path: PathBuf, message: String },
}

/// State shared by every traversal task of one walk.
struct WalkContext {
    lister: Arc<dyn DirLister>,
    throttle: Throttle,
    cancel: CancelSignal,
    tracker: Arc<CompletionTracker>,
    events: Sender<WalkEvent>,
    pool: rayon::ThreadPool,
}

/// Builder for a single walk over one or more roots.
pub struct Walker {
    lister: Arc<dyn DirLister>,
    cancel: CancelSignal,
    concurrency_limit: usize,
    threads: usize,
}

impl Walker {
    pub fn new(lister: Arc<dyn DirLister>, cancel: CancelSignal) -> Self {
        Self {
            lister,
            cancel,
            concurrency_limit: crate::config::DEFAULT_CONCURRENCY_LIMIT,
            threads: num_cpus::get(),
        }
    }

    /// Maximum number of listings in flight at once.
    pub fn concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit;
        self
    }

    /// Worker threads in the traversal pool.
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Start walking `roots` in the background.
    ///
    /// Returns the consumer end of the event channel. The channel
    /// disconnects once every traversal task has finished; the caller must
    /// keep receiving until then (or drop the receiver to abandon the walk).
    pub fn spawn(self, roots: &[PathBuf]) -> Result<Receiver<WalkEvent>, ScanError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("disktally-walk-{i}"))
            .panic_handler(|_| error!("Traversal task panicked; its subtree is lost"))
            .build()?;

        let (events_tx, events_rx) = crossbeam_channel::bounded(0);
        let tracker = Arc::new(CompletionTracker::new());
        let ctx = Arc::new(WalkContext {
            lister: self.lister,
            throttle: Throttle::new(self.concurrency_limit, self.cancel.clone()),
            cancel: self.cancel,
            tracker: Arc::clone(&tracker),
            events: events_tx,
            pool,
        });

        debug!(
            roots = roots.len(),
            limit = self.concurrency_limit,
            threads = self.threads,
            "Spawning root traversal tasks"
        );
        for root in roots {
            let guard = tracker.begin();
            spawn_task(&ctx, root.clone(), guard);
        }

        thread::Builder::new()
            .name("disktally-watcher".into())
            .spawn(move || {
                tracker.wait();
                drop(ctx);
                debug!("All traversal tasks finished; event channel closed");
            })
            .map_err(|source| ScanError::Spawn {
                name: "watcher",
                source,
            })?;

        Ok(events_rx)
    }
}

/// Register-then-spawn: the caller has already counted the task in the
/// tracker and hands over the guard.
fn spawn_task(ctx: &Arc<WalkContext>, dir: PathBuf, guard: TaskGuard) {
    let task_ctx = Arc::clone(ctx);
    ctx.pool.spawn(move || {
        walk_dir(&task_ctx, &dir);
        // Context first, guard second: see module docs.
        drop(task_ctx);
        drop(guard);
    });
}

fn walk_dir(ctx: &Arc<WalkContext>, dir: &Path) {
    if ctx.cancel.is_set() {
        return;
    }

    let listing = {
        let Some(_permit) = ctx.throttle.acquire() else {
            return;
        };
        ctx.lister.list(dir)
    };

    let entries = match listing {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Skipping unreadable directory: {err}");
            let _ = ctx.events.send(WalkEvent::Failed {
                path: dir.to_path_buf(),
                message: err.to_string(),
            });
            return;
        }
    };

    if ctx.events.send(WalkEvent::Directory).is_err() {
        return;
    }

    for entry in entries {
        if entry.is_dir {
            // Stop fanning out once cancelled; files already listed are
            // still handed over so the drain counts them.
            if ctx.cancel.is_set() {
                continue;
            }
            let guard = ctx.tracker.begin();
            spawn_task(ctx, dir.join(entry.name.as_str()), guard);
        } else if ctx.events.send(WalkEvent::File(entry.size)).is_err() {
            // Receiver gone: nobody is counting any more.
            return;
        }
    }
}
