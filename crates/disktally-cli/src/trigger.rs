/// Stdin cancellation trigger.
///
/// A detached thread blocks on a single-byte read; any input fires the
/// scan's cancellation signal. End-of-file (stdin closed or redirected from
/// an empty source) does not count as input.
use disktally_core::scanner::CancelSignal;
use std::io::Read;
use std::thread;
use tracing::debug;

/// Fire `cancel` when one byte arrives on `input`.
///
/// Returns whether the signal was fired by this call. Blocks until the
/// read completes.
pub fn cancel_on_input<R: Read>(mut input: R, cancel: &CancelSignal) -> bool {
    let mut byte = [0u8; 1];
    match input.read(&mut byte) {
        Ok(1) => {
            debug!("Input received; cancelling scan");
            cancel.fire()
        }
        Ok(_) => {
            debug!("Stdin closed; cancellation by keypress disabled");
            false
        }
        Err(err) => {
            debug!("Stdin unreadable ({err}); cancellation by keypress disabled");
            false
        }
    }
}

/// Spawn the stdin watcher. The thread is never joined: it either fires
/// the signal or stays blocked on the read until the process exits.
pub fn spawn_stdin_trigger(cancel: CancelSignal) -> std::io::Result<()> {
    thread::Builder::new()
        .name("disktally-stdin".into())
        .spawn(move || {
            cancel_on_input(std::io::stdin().lock(), &cancel);
        })
        .map(drop)
}
