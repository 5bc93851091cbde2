//! Counters and the feasibility/optimality outcome (C6).

use std::time::Duration;

use prettytable::{Cell, Row, Table};

/// The tri-state feasibility outcome of a completed search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feasible {
    True,
    False,
    Undefined,
}

/// Mutable counters and the final outcome slot, filled in by `close()`.
#[derive(Debug)]
pub struct Measures {
    pub solution_count: u64,
    pub node_count: u64,
    pub backtrack_count: u64,
    pub fail_count: u64,
    pub restart_count: u64,
    pub wall_time: Duration,
    pub peak_depth: usize,
    pub feasible: Feasible,
    pub optimal: bool,
    started_at: Option<std::time::Instant>,
}

impl Default for Measures {
    fn default() -> Self {
        Self {
            solution_count: 0,
            node_count: 0,
            backtrack_count: 0,
            fail_count: 0,
            restart_count: 0,
            wall_time: Duration::ZERO,
            peak_depth: 0,
            feasible: Feasible::Undefined,
            optimal: false,
            started_at: None,
        }
    }
}

impl Measures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets every counter and the outcome slot to their initial values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn start_clock(&mut self) {
        self.started_at = Some(std::time::Instant::now());
    }

    pub(crate) fn record_depth(&mut self, depth: usize) {
        if depth > self.peak_depth {
            self.peak_depth = depth;
        }
    }

    /// Fills `wall_time` and the `feasible`/`optimal` outcome per the
    /// (has_solution, limit_hit, optimization_mode) lookup table: a solution
    /// found while optimizing and stopped either at the first solution or by
    /// a limit is feasible but not proven optimal; one found via exhaustion
    /// under optimization is both; any solution under plain satisfaction is
    /// feasible with optimality not applicable; no solution under a limit is
    /// undefined; no solution under exhaustion is infeasible.
    pub fn close(&mut self, has_solution: bool, limit_hit: bool, is_optimization: bool) {
        if let Some(started) = self.started_at {
            self.wall_time = started.elapsed();
        }

        self.feasible = match (has_solution, limit_hit) {
            (true, _) => Feasible::True,
            (false, true) => Feasible::Undefined,
            (false, false) => Feasible::False,
        };

        self.optimal = has_solution && is_optimization && !limit_hit;
    }
}

/// Renders a diagnostic dump of `measures`, mirroring the crate's pre-existing
/// per-constraint statistics table.
pub fn render_measures_table(measures: &Measures) -> String {
    let mut table = Table::new();
    table.add_row(Row::new(vec![Cell::new("Measure"), Cell::new("Value")]));
    table.add_row(Row::new(vec![
        Cell::new("Solutions"),
        Cell::new(&measures.solution_count.to_string()),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Nodes"),
        Cell::new(&measures.node_count.to_string()),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Backtracks"),
        Cell::new(&measures.backtrack_count.to_string()),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Fails"),
        Cell::new(&measures.fail_count.to_string()),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Restarts"),
        Cell::new(&measures.restart_count.to_string()),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Peak depth"),
        Cell::new(&measures.peak_depth.to_string()),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Wall time (ms)"),
        Cell::new(&format!("{:.2}", measures.wall_time.as_secs_f64() * 1000.0)),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Feasible"),
        Cell::new(&format!("{:?}", measures.feasible)),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Optimal"),
        Cell::new(&measures.optimal.to_string()),
    ]));
    table.to_string()
}
