//! The objective manager (C4): satisfaction vs. minimization/maximization,
//! and the cut posted to the constraint network after each solution.

use crate::solver::VariableId;

/// The outcome of attempting to post an objective cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutOutcome {
    Applied,
    Contradiction,
}

/// A capability a world must provide for objective management: reading the
/// current value of the objective variable and posting a strict bound on it.
///
/// Reference worlds implement this directly; a production front-end would
/// typically delegate to its own variable representation.
pub trait ObjectiveWorld {
    /// The current value of `var`, if it is fixed (a singleton domain).
    fn fixed_value(&self, var: VariableId) -> Option<i64>;

    /// Tightens `var`'s domain to values strictly less than `bound`. Returns
    /// `false` if this empties the domain (a contradiction).
    fn assert_less_than(&mut self, var: VariableId, bound: i64) -> bool;

    /// Tightens `var`'s domain to values strictly greater than `bound`.
    /// Returns `false` if this empties the domain (a contradiction).
    fn assert_greater_than(&mut self, var: VariableId, bound: i64) -> bool;
}

/// Whether the driver is proving satisfiability or optimizing a bound.
pub enum ObjectiveManager {
    Satisfaction,
    Minimize { var: VariableId, best: Option<i64> },
    Maximize { var: VariableId, best: Option<i64> },
}

impl ObjectiveManager {
    pub fn satisfaction() -> Self {
        ObjectiveManager::Satisfaction
    }

    pub fn minimize(var: VariableId) -> Self {
        ObjectiveManager::Minimize { var, best: None }
    }

    pub fn maximize(var: VariableId) -> Self {
        ObjectiveManager::Maximize { var, best: None }
    }

    pub fn is_optimization(&self) -> bool {
        !matches!(self, ObjectiveManager::Satisfaction)
    }

    /// Clears any recorded best bound, keeping the same objective kind and
    /// variable. Used by `SearchDriver::reset` so a cleared driver proves
    /// optimality from scratch rather than starting from the previous run's
    /// bound.
    pub fn clear(&mut self) {
        match self {
            ObjectiveManager::Satisfaction => {}
            ObjectiveManager::Minimize { best, .. } | ObjectiveManager::Maximize { best, .. } => {
                *best = None;
            }
        }
    }

    /// The best bound recorded so far, if any.
    pub fn best(&self) -> Option<i64> {
        match self {
            ObjectiveManager::Satisfaction => None,
            ObjectiveManager::Minimize { best, .. } | ObjectiveManager::Maximize { best, .. } => {
                *best
            }
        }
    }

    /// Records the objective value of the just-found solution as the new
    /// best, replacing any previous best unconditionally: the driver only
    /// calls this for the latest solution along the current branch, which is
    /// always at least as good as any of its ancestors thanks to the cut.
    pub fn update_best<W: ObjectiveWorld>(&mut self, world: &W) {
        match self {
            ObjectiveManager::Satisfaction => {}
            ObjectiveManager::Minimize { var, best } | ObjectiveManager::Maximize { var, best } => {
                if let Some(value) = world.fixed_value(*var) {
                    *best = Some(value);
                }
            }
        }
    }

    /// Tightens the network so that any further solution must strictly
    /// improve on the recorded best. A no-op under satisfaction.
    pub fn post_cut<W: ObjectiveWorld>(&self, world: &mut W) -> CutOutcome {
        match self {
            ObjectiveManager::Satisfaction => CutOutcome::Applied,
            ObjectiveManager::Minimize { var, best: Some(best) } => {
                if world.assert_less_than(*var, *best) {
                    CutOutcome::Applied
                } else {
                    CutOutcome::Contradiction
                }
            }
            ObjectiveManager::Maximize { var, best: Some(best) } => {
                if world.assert_greater_than(*var, *best) {
                    CutOutcome::Applied
                } else {
                    CutOutcome::Contradiction
                }
            }
            ObjectiveManager::Minimize { best: None, .. }
            | ObjectiveManager::Maximize { best: None, .. } => CutOutcome::Applied,
        }
    }
}
