//! Restart policies (C8), expressed as monitors that call
//! [`DriverSignals::request_restart`] from an `after_*` hook — a
//! generalization of the crate's earlier "return a bool the caller checks"
//! restart policy shape into "call back into the driver directly".

use crate::driver::monitor::{DriverView, Monitor};

/// A policy that never triggers a restart. The default.
pub struct NeverRestart;

impl Monitor for NeverRestart {}

/// A policy that restarts the search after a fixed number of fails, resetting
/// its own counter after each restart so it fires again every `n` fails.
pub struct RestartAfterNFails {
    max_fails: u64,
    fails_at_last_restart: u64,
}

impl RestartAfterNFails {
    pub fn new(max_fails: u64) -> Self {
        Self {
            max_fails,
            fails_at_last_restart: 0,
        }
    }
}

impl Monitor for RestartAfterNFails {
    fn after_up_branch(&mut self, view: &DriverView) {
        if view.measures.fail_count.saturating_sub(self.fails_at_last_restart) >= self.max_fails {
            self.fails_at_last_restart = view.measures.fail_count;
            view.signals.request_restart();
        }
    }
}
