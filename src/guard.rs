//! Containment for plugin code: panics become `UnitError::Panicked` and an
//! optional wall-clock budget turns overruns into `UnitError::TimedOut`.
//!
//! With a budget the unit runs on its own thread and the caller waits on a
//! channel. A unit that overruns keeps running detached; its result is
//! dropped when it finally arrives.

use crate::errors::UnitError;
use crossbeam_channel::{bounded, RecvTimeoutError};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread;
use std::time::Duration;

/// Run `unit`, containing panics and enforcing `budget` when set.
pub fn run_contained<T, F>(label: &str, budget: Option<Duration>, unit: F) -> Result<T, UnitError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let Some(budget) = budget else {
        return catch_unwind(AssertUnwindSafe(unit)).map_err(|p| UnitError::Panicked(panic_message(p)));
    };

    let (tx, rx) = bounded(1);
    let spawned = thread::Builder::new()
        .name(format!("proofkit-{}", label))
        .spawn(move || {
            let out = catch_unwind(AssertUnwindSafe(unit));
            // Receiver may be gone after a timeout.
            let _ = tx.send(out);
        });
    if let Err(e) = spawned {
        return Err(UnitError::Panicked(format!("could not start worker thread: {}", e)));
    }

    match rx.recv_timeout(budget) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(p)) => Err(UnitError::Panicked(panic_message(p))),
        Err(RecvTimeoutError::Timeout) => Err(UnitError::TimedOut(budget)),
        Err(RecvTimeoutError::Disconnected) => {
            Err(UnitError::Panicked("worker exited without a result".into()))
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
