//! `ImWorld`: the crate's reference `Trail` + `PropagationEngine`, built by
//! repurposing the existing persistent (`im`-backed) domain representation.
//! Because `im::HashMap`/`im::HashSet` clone in O(1) via structural sharing,
//! "pushing a world" is just snapshotting the current [`Solution`] onto a
//! stack, and "popping" restores the top snapshot — the same technique the
//! crate always used to hand a new state down a recursive call, now indexed
//! into an explicit stack of worlds instead.

use std::collections::{HashSet as StdHashSet, VecDeque};

use crate::{
    driver::{objective::ObjectiveWorld, trail::Trail, SolutionCheck},
    propagation::{Contradiction, PropagationEngine},
    reference::constraint::Constraint,
    solver::{semantics::DomainSemantics, solution::Solution, value::StandardValue, VariableId},
};

/// A capability letting the objective manager read/tighten an integer
/// variable without knowing the concrete value representation.
pub trait AsInt {
    fn as_int(&self) -> Option<i64>;
}

impl AsInt for StandardValue {
    fn as_int(&self) -> Option<i64> {
        match self {
            StandardValue::Int(v) => Some(*v),
            StandardValue::Bool(_) => None,
        }
    }
}

type ConstraintId = usize;

/// A FIFO, duplicate-rejecting queue of (variable, constraint) pairs still
/// to be revised. Adapted from the crate's existing worklist, dropping its
/// priority ordering since the reference vocabulary has no constraint
/// classes that need to jump the queue.
#[derive(Default)]
struct RevisionQueue {
    queue: VecDeque<(VariableId, ConstraintId)>,
    members: StdHashSet<(VariableId, ConstraintId)>,
}

impl RevisionQueue {
    fn push(&mut self, var: VariableId, constraint: ConstraintId) {
        if self.members.insert((var, constraint)) {
            self.queue.push_back((var, constraint));
        }
    }

    fn pop(&mut self) -> Option<(VariableId, ConstraintId)> {
        let item = self.queue.pop_front()?;
        self.members.remove(&item);
        Some(item)
    }
}

/// The reference world: an `im`-backed [`Solution`] plus a fixed constraint
/// set, with an explicit stack of snapshots standing in for the trail.
pub struct ImWorld<S: DomainSemantics> {
    current: Solution<S>,
    history: Vec<Solution<S>>,
    constraints: Vec<Box<dyn Constraint<S>>>,
}

impl<S: DomainSemantics + std::fmt::Debug> ImWorld<S> {
    pub fn new(initial: Solution<S>, constraints: Vec<Box<dyn Constraint<S>>>) -> Self {
        Self {
            current: initial,
            history: Vec::new(),
            constraints,
        }
    }

    pub fn solution(&self) -> &Solution<S> {
        &self.current
    }
}

impl<S: DomainSemantics + std::fmt::Debug> Trail for ImWorld<S> {
    fn world_index(&self) -> usize {
        self.history.len()
    }

    fn world_push(&mut self) {
        self.history.push(self.current.clone());
    }

    fn world_pop(&mut self) {
        self.current = self
            .history
            .pop()
            .expect("world_pop called with no world pushed");
    }
}

impl<S: DomainSemantics + std::fmt::Debug> PropagationEngine for ImWorld<S> {
    fn propagate(&mut self) -> Result<(), Contradiction> {
        let mut queue = RevisionQueue::default();
        for (constraint_id, constraint) in self.constraints.iter().enumerate() {
            for &var in constraint.variables() {
                queue.push(var, constraint_id);
            }
        }

        while let Some((var, constraint_id)) = queue.pop() {
            let constraint = &self.constraints[constraint_id];
            let revised = constraint
                .revise(var, &self.current)
                .expect("reference constraints never raise structural errors");

            if let Some(new_solution) = revised {
                self.current = new_solution;
                let domain = self.current.domains.get(&var).unwrap();
                if domain.is_empty() {
                    return Err(Contradiction);
                }
                for (other_id, other_constraint) in self.constraints.iter().enumerate() {
                    if other_constraint.variables().contains(&var) {
                        for &other_var in other_constraint.variables() {
                            if other_var != var {
                                queue.push(other_var, other_id);
                            }
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

impl<S> ObjectiveWorld for ImWorld<S>
where
    S: DomainSemantics + std::fmt::Debug,
    S::Value: AsInt,
{
    fn fixed_value(&self, var: VariableId) -> Option<i64> {
        self.current
            .domains
            .get(&var)
            .and_then(|domain| domain.get_singleton_value())
            .and_then(|value| value.as_int())
    }

    fn assert_less_than(&mut self, var: VariableId, bound: i64) -> bool {
        self.retain_by_int(var, |v| v < bound)
    }

    fn assert_greater_than(&mut self, var: VariableId, bound: i64) -> bool {
        self.retain_by_int(var, |v| v > bound)
    }
}

impl<S> ImWorld<S>
where
    S: DomainSemantics + std::fmt::Debug,
    S::Value: AsInt,
{
    pub(crate) fn retain_by_int(&mut self, var: VariableId, keep: impl Fn(i64) -> bool) -> bool {
        let Some(domain) = self.current.domains.get(&var) else {
            return true;
        };
        let new_domain = domain.retain(&|v| v.as_int().map(&keep).unwrap_or(true));
        let survives = !new_domain.is_empty();
        self.current.domains = self.current.domains.update(var, new_domain);
        survives
    }
}

impl<S: DomainSemantics + std::fmt::Debug> SolutionCheck for ImWorld<S> {
    fn is_complete(&self) -> bool {
        self.current.is_complete()
    }
}
