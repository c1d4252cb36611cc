/// Bounded permit pool limiting how many directory listings run at once.
///
/// The pool is a bounded channel of capacity `N`: acquiring a permit sends a
/// unit value into the channel (blocking while it is full), releasing takes
/// one back out. Channel occupancy is therefore exactly the number of permits
/// held, and can never exceed `N`.
///
/// Waiting for a permit also watches the [`CancelSignal`], so a cancelled scan
/// never leaves a task parked here.
use crate::scanner::cancel::CancelSignal;
use crossbeam_channel::{select, Receiver, Sender};

/// Fixed-capacity pool of anonymous permits.
#[derive(Debug)]
pub struct Throttle {
    acquire_tx: Sender<()>,
    release_rx: Receiver<()>,
    capacity: usize,
    cancel: CancelSignal,
}

/// A held permit. Returned to the pool on drop.
#[derive(Debug)]
#[must_use = "dropping a permit releases it immediately"]
pub struct Permit<'a> {
    throttle: &'a Throttle,
}

impl Throttle {
    /// Create a pool of `capacity` permits tied to `cancel`.
    ///
    /// `capacity` must be non-zero; a zero-capacity pool would turn every
    /// acquisition into a rendezvous nobody answers.
    pub fn new(capacity: usize, cancel: CancelSignal) -> Self {
        debug_assert!(capacity > 0, "throttle capacity must be non-zero");
        let (acquire_tx, release_rx) = crossbeam_channel::bounded(capacity.max(1));
        Self {
            acquire_tx,
            release_rx,
            capacity: capacity.max(1),
            cancel,
        }
    }

    /// Block until a permit is free or cancellation fires.
    ///
    /// Returns `None` when cancelled; no permit is consumed in that case and
    /// the caller should skip its listing.
    pub fn acquire(&self) -> Option<Permit<'_>> {
        if self.cancel.is_set() {
            return None;
        }
        // Fast path: a free slot needs no select.
        if self.acquire_tx.try_send(()).is_ok() {
            return Some(Permit { throttle: self });
        }
        select! {
            send(self.acquire_tx, ()) -> res => {
                // The pool owns both ends, so the channel cannot disconnect.
                debug_assert!(res.is_ok());
                Some(Permit { throttle: self })
            }
            recv(self.cancel.watch()) -> _ => None,
        }
    }

    /// Return one slot to the pool. Never blocks.
    ///
    /// Only reachable through [`Permit`], so each slot is freed once.
    fn release(&self) {
        let released = self.release_rx.try_recv().is_ok();
        debug_assert!(released, "permit released twice");
    }

    /// Number of permits currently held.
    pub fn in_use(&self) -> usize {
        self.acquire_tx.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Permit<'_> {
    /// Release the permit now. Equivalent to dropping it.
    pub fn release(self) {}
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.throttle.release();
    }
}
