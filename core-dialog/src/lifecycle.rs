//! Scoped native state around a single dialog.
//!
//! Two guards bracket every invocation:
//! - [`DialogSlot`] serializes dialogs process-wide and refuses a nested
//!   dialog on a thread that already has one open.
//! - [`NativeSession`] pairs `init` with `teardown`; teardown runs in `Drop`,
//!   so it happens on every exit path, including early `?` returns.
//!
//! Declare the slot before the session so teardown runs before the slot is
//! released.

use bridge_traits::{NativeDialogBackend, NativeResult};
use std::cell::Cell;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

use crate::error::{DialogError, Result};

static DIALOG_LOCK: Mutex<()> = Mutex::new(());

thread_local! {
    static DIALOG_OPEN: Cell<bool> = const { Cell::new(false) };
}

/// Exclusive right to show a dialog.
pub(crate) struct DialogSlot {
    _guard: MutexGuard<'static, ()>,
}

impl DialogSlot {
    pub(crate) fn acquire() -> Result<Self> {
        if DIALOG_OPEN.with(|open| open.replace(true)) {
            return Err(DialogError::Reentrant);
        }

        // A panic inside a previous dialog poisons the lock without leaving
        // any state behind it.
        let guard = DIALOG_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        trace!("Dialog slot acquired");
        Ok(Self { _guard: guard })
    }
}

impl Drop for DialogSlot {
    fn drop(&mut self) {
        DIALOG_OPEN.with(|open| open.set(false));
    }
}

/// Initialized native library, torn down on drop.
pub(crate) struct NativeSession<'a> {
    backend: &'a dyn NativeDialogBackend,
}

impl<'a> NativeSession<'a> {
    /// Run `init`. On failure nothing was initialized, so no teardown is
    /// owed and none will run.
    pub(crate) fn open(backend: &'a dyn NativeDialogBackend) -> Result<Self> {
        match backend.init() {
            NativeResult::Okay => {
                debug!(encoding = ?backend.encoding(), "Native dialog library initialized");
                Ok(Self { backend })
            }
            _ => Err(DialogError::Native {
                message: take_native_error(backend),
            }),
        }
    }

    /// Fetch and clear the pending native error.
    pub(crate) fn native_error(&self) -> DialogError {
        DialogError::Native {
            message: take_native_error(self.backend),
        }
    }
}

impl Drop for NativeSession<'_> {
    fn drop(&mut self) {
        self.backend.teardown();
        debug!("Native dialog library torn down");
    }
}

/// Read the native error text and clear it so it cannot surface on a later
/// call.
fn take_native_error(backend: &dyn NativeDialogBackend) -> Option<String> {
    let message = backend.last_error();
    backend.clear_error();
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_nested_slot_on_same_thread_is_rejected() {
        let outer = DialogSlot::acquire().unwrap();
        assert!(matches!(DialogSlot::acquire(), Err(DialogError::Reentrant)));
        drop(outer);

        let again = DialogSlot::acquire();
        assert!(again.is_ok());
    }

    #[test]
    fn test_rejected_nested_slot_keeps_outer_marked() {
        let _outer = DialogSlot::acquire().unwrap();
        let _ = DialogSlot::acquire();
        // The failed attempt must not clear the flag owned by `_outer`.
        assert!(matches!(DialogSlot::acquire(), Err(DialogError::Reentrant)));
    }

    #[test]
    fn test_slot_released_for_other_threads() {
        let slot = DialogSlot::acquire().unwrap();
        let handle = thread::spawn(|| DialogSlot::acquire().map(|_| ()).is_ok());
        drop(slot);
        assert!(handle.join().unwrap());
    }
}
