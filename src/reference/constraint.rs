//! The reference constraint interface: a minimal, self-consistent vocabulary
//! exercised by [`crate::reference::world::ImWorld`]'s propagation loop.

use crate::{
    error::Result,
    solver::{semantics::DomainSemantics, solution::Solution, VariableId},
};

/// Human-readable identification for a constraint, used by diagnostics.
#[derive(Debug, Clone)]
pub struct ConstraintDescriptor {
    pub name: String,
    pub description: String,
}

/// A rule that must hold between a fixed set of variables.
///
/// `revise` is called once per (variable, constraint) pair popped off the
/// propagation worklist. It returns the pruned solution if it changed
/// `target_var`'s domain, or `None` if the constraint had nothing to
/// tighten.
pub trait Constraint<S: DomainSemantics>: std::fmt::Debug {
    fn variables(&self) -> &[VariableId];

    fn descriptor(&self) -> ConstraintDescriptor;

    fn revise(
        &self,
        target_var: VariableId,
        solution: &Solution<S>,
    ) -> Result<Option<Solution<S>>>;
}
