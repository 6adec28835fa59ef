//! Per-action busy flags.
//!
//! A flag is acquired before an async action starts and released when it
//! completes; a second acquire while busy fails, which is how duplicate
//! submissions are refused.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusyFlag {
    busy: bool,
}

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Returns `false` if the action is already running.
    pub fn try_acquire(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    pub fn release(&mut self) {
        self.busy = false;
    }
}
