//! `LexicographicSplit`: the decision-tree analogue of the crate's existing
//! "pick the lowest-id unassigned variable, then try its values in
//! deterministic order" heuristic pair, generalized from picking one value
//! at a time to splitting the domain in half.

use std::marker::PhantomData;

use crate::{
    driver::decision::Decision,
    reference::world::{AsInt, ImWorld},
    solver::{
        semantics::DomainSemantics,
        value::{ValueEquality, ValueOrdering},
        VariableId,
    },
    strategy::{BranchingStrategy, DecisionOutcome},
};

/// A binary domain split on one variable: left keeps values `<= mid`, right
/// keeps values `> mid`.
pub struct SplitDecision<S> {
    var: VariableId,
    mid: i64,
    right_applied: bool,
    _marker: PhantomData<S>,
}

impl<S> Decision<ImWorld<S>> for SplitDecision<S>
where
    S: DomainSemantics + std::fmt::Debug,
    S::Value: AsInt,
{
    fn apply_left(&mut self, world: &mut ImWorld<S>) {
        world.retain_by_int(self.var, |v| v <= self.mid);
    }

    fn apply_right(&mut self, world: &mut ImWorld<S>) {
        world.retain_by_int(self.var, |v| v > self.mid);
        self.right_applied = true;
    }

    fn has_next_branch(&self) -> bool {
        !self.right_applied
    }
}

/// Selects the lowest-id unassigned variable and splits its domain at the
/// midpoint between its minimum and maximum value.
pub struct LexicographicSplit<S> {
    _marker: PhantomData<S>,
}

impl<S> LexicographicSplit<S> {
    pub fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<S> Default for LexicographicSplit<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> BranchingStrategy<ImWorld<S>> for LexicographicSplit<S>
where
    S: DomainSemantics + std::fmt::Debug,
    S::Value: AsInt + ValueOrdering + ValueEquality,
{
    fn get_decision(&mut self, world: &ImWorld<S>) -> DecisionOutcome<ImWorld<S>> {
        let solution = world.solution();
        let target = solution
            .domains
            .iter()
            .filter(|(_, domain)| domain.len() > 1)
            .min_by_key(|(var_id, _)| *var_id)
            .map(|(var_id, _)| *var_id);

        let Some(var_id) = target else {
            return DecisionOutcome::NoDecision;
        };

        let domain = solution.domains.get(&var_id).unwrap();
        let bounds = domain
            .get_min_value()
            .zip(domain.get_max_value())
            .and_then(|(min, max)| Some((min.as_int()?, max.as_int()?)));

        match bounds {
            Some((min, max)) => {
                let mid = min + (max - min) / 2;
                DecisionOutcome::Branch(Box::new(SplitDecision {
                    var: var_id,
                    mid,
                    right_applied: false,
                    _marker: PhantomData,
                }))
            }
            None => DecisionOutcome::Inconsistent,
        }
    }
}

/// Like [`LexicographicSplit`], but selects the unassigned variable to
/// branch on uniformly at random rather than by lowest id, adapted from the
/// crate's existing `RandomVariableHeuristic`. Useful for restart policies
/// that rely on varying the search order between runs.
pub struct RandomSplit<S> {
    _marker: PhantomData<S>,
}

impl<S> RandomSplit<S> {
    pub fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<S> Default for RandomSplit<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> BranchingStrategy<ImWorld<S>> for RandomSplit<S>
where
    S: DomainSemantics + std::fmt::Debug,
    S::Value: AsInt + ValueOrdering + ValueEquality,
{
    fn get_decision(&mut self, world: &ImWorld<S>) -> DecisionOutcome<ImWorld<S>> {
        use rand::seq::IteratorRandom;

        let solution = world.solution();
        let unassigned: Vec<VariableId> = solution
            .domains
            .iter()
            .filter(|(_, domain)| domain.len() > 1)
            .map(|(var_id, _)| *var_id)
            .collect();

        let Some(var_id) = unassigned.into_iter().choose(&mut rand::thread_rng()) else {
            return DecisionOutcome::NoDecision;
        };

        let domain = solution.domains.get(&var_id).unwrap();
        let bounds = domain
            .get_min_value()
            .zip(domain.get_max_value())
            .and_then(|(min, max)| Some((min.as_int()?, max.as_int()?)));

        match bounds {
            Some((min, max)) => {
                let mid = min + (max - min) / 2;
                DecisionOutcome::Branch(Box::new(SplitDecision {
                    var: var_id,
                    mid,
                    right_applied: false,
                    _marker: PhantomData,
                }))
            }
            None => DecisionOutcome::Inconsistent,
        }
    }
}
