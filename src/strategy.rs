//! The branching strategy external interface (§6).

use crate::driver::decision::Decision;

/// What a branching strategy returns when asked for the next decision.
pub enum DecisionOutcome<W> {
    /// Branch on this decision.
    Branch(Box<dyn Decision<W>>),
    /// Every variable is already instantiated; the current state is a
    /// solution at a non-leaf node.
    NoDecision,
    /// The strategy detected unsatisfiability up front.
    Inconsistent,
}

/// Chooses the next branching decision given the current world.
pub trait BranchingStrategy<W> {
    fn get_decision(&mut self, world: &W) -> DecisionOutcome<W>;
}
