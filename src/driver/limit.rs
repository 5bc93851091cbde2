//! Reference limit monitors (C7). The driver never polls wall time or node
//! counts itself; these monitors observe [`Measures`] in their `after_*`
//! hooks and cooperatively call [`DriverSignals::reach_limit`].

use std::time::Duration;

use crate::driver::monitor::{DriverView, Monitor};

/// Interrupts the search once `node_count` reaches a fixed bound.
pub struct NodeLimitMonitor {
    max_nodes: u64,
}

impl NodeLimitMonitor {
    pub fn new(max_nodes: u64) -> Self {
        Self { max_nodes }
    }
}

impl Monitor for NodeLimitMonitor {
    fn after_open_node(&mut self, view: &DriverView) {
        if view.measures.node_count >= self.max_nodes {
            view.signals.reach_limit();
        }
    }
}

/// Interrupts the search once the recorded wall time exceeds a fixed budget.
///
/// Wall time is only updated by the driver at `close`, so this monitor reads
/// an external clock itself rather than `measures.wall_time` (which is zero
/// until the loop exits) — it still never drives the loop directly, it only
/// ever calls `reach_limit` from a hook.
pub struct TimeLimitMonitor {
    budget: Duration,
    started_at: Option<std::time::Instant>,
}

impl TimeLimitMonitor {
    pub fn new(budget: Duration) -> Self {
        Self {
            budget,
            started_at: None,
        }
    }
}

impl Monitor for TimeLimitMonitor {
    fn after_initialize(&mut self, _view: &DriverView) {
        self.started_at.get_or_insert_with(std::time::Instant::now);
    }

    fn after_open_node(&mut self, view: &DriverView) {
        if let Some(started) = self.started_at {
            if started.elapsed() >= self.budget {
                view.signals.reach_limit();
            }
        }
    }
}

/// Interrupts the search once `solution_count` reaches a fixed bound.
pub struct SolutionLimitMonitor {
    max_solutions: u64,
}

impl SolutionLimitMonitor {
    pub fn new(max_solutions: u64) -> Self {
        Self { max_solutions }
    }
}

impl Monitor for SolutionLimitMonitor {
    fn on_solution(&mut self, view: &DriverView) {
        if view.measures.solution_count >= self.max_solutions {
            view.signals.reach_limit();
        }
    }
}
