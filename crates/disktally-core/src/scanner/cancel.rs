/// One-shot cancellation signal shared by every part of a scan.
///
/// The signal is observable two ways:
/// - [`CancelSignal::is_set`] — a non-blocking poll of an atomic flag.
/// - [`CancelSignal::watch`] — a channel receiver that never yields a value
///   but becomes ready (disconnected) once the signal fires, so it can sit
///   in a `crossbeam_channel::select!` next to other event sources.
///
/// Firing drops the only sender of that channel. Every receiver clone wakes
/// at once, which makes the broadcast free of per-observer bookkeeping.
use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

struct Shared {
    fired: AtomicBool,
    /// Taken (and dropped) on the first `fire()`.
    trigger: Mutex<Option<Sender<()>>>,
    watch: Receiver<()>,
}

/// Cloneable handle to a write-once, read-many cancellation flag.
#[derive(Clone)]
pub struct CancelSignal {
    inner: Arc<Shared>,
}

impl CancelSignal {
    /// Create a signal in the not-fired state.
    pub fn new() -> Self {
        let (trigger, watch) = crossbeam_channel::bounded(0);
        Self {
            inner: Arc::new(Shared {
                fired: AtomicBool::new(false),
                trigger: Mutex::new(Some(trigger)),
                watch,
            }),
        }
    }

    /// Fire the signal. Idempotent.
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn fire(&self) -> bool {
        if self.inner.fired.swap(true, Ordering::AcqRel) {
            return false;
        }
        // Dropping the sender disconnects every `watch()` receiver.
        drop(self.inner.trigger.lock().take());
        debug!("Cancellation signal fired");
        true
    }

    /// Non-blocking check of whether the signal has fired.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.inner.fired.load(Ordering::Acquire)
    }

    /// Receiver that becomes ready once the signal fires.
    ///
    /// Never carries a value: a `recv` on it returns `Err(RecvError)` after
    /// firing and blocks before.
    pub fn watch(&self) -> &Receiver<()> {
        &self.inner.watch
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancelSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelSignal")
            .field("fired", &self.is_set())
            .finish()
    }
}
