//! End-to-end scenarios driving [`SearchDriver`] over the reference
//! collaborators: the six shapes a real front-end is expected to exercise
//! (single-solution satisfaction, full enumeration, infeasibility, objective
//! minimization, a cooperative limit, and a restart policy).

use std::sync::Arc;

use pretty_assertions::assert_eq;

use branchpoint::{
    driver::{
        limit::{NodeLimitMonitor, SolutionLimitMonitor},
        measures::Feasible,
        monitor::{DriverView, InterruptReason, Monitor},
        objective::ObjectiveManager,
        SearchDriver,
    },
    reference::{
        branching::LexicographicSplit,
        constraint::Constraint,
        constraints::not_equal::NotEqualConstraint,
        world::ImWorld,
    },
    solver::{
        semantics::DomainSemantics,
        solution::{HashSetDomain, Solution},
        value::StandardValue,
        VariableId,
    },
};

#[derive(Debug)]
enum Def {
    NotEqual(VariableId, VariableId),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Meta;

#[derive(Debug, Clone)]
struct TestSemantics;

impl DomainSemantics for TestSemantics {
    type Value = StandardValue;
    type VariableMetadata = Meta;
    type ConstraintDefinition = Def;

    fn build_constraint(&self, definition: &Def) -> Box<dyn Constraint<Self>> {
        match definition {
            Def::NotEqual(a, b) => Box::new(NotEqualConstraint::new(*a, *b)),
        }
    }
}

const X: VariableId = 0;
const Y: VariableId = 1;

/// Two variables, domain `0..n`, constrained `x != y`.
fn not_equal_world(n: i64) -> ImWorld<TestSemantics> {
    let semantics = Arc::new(TestSemantics);
    let values: im::HashSet<StandardValue> = (0..n).map(StandardValue::Int).collect();
    let domains = im::hashmap! {
        X => Box::new(HashSetDomain::new(values.clone())) as _,
        Y => Box::new(HashSetDomain::new(values)) as _,
    };
    let initial = Solution {
        domains,
        semantics: semantics.clone(),
    };
    let constraints = vec![semantics.build_constraint(&Def::NotEqual(X, Y))];
    ImWorld::new(initial, constraints)
}

#[test]
fn stops_at_first_solution() {
    let world = not_equal_world(2);
    let mut driver = SearchDriver::new(world, LexicographicSplit::new());
    driver.launch(true).unwrap();

    assert_eq!(driver.measures().solution_count, 1);
    assert_eq!(driver.interrupt_reason(), Some(InterruptReason::FirstSolution));
    assert_eq!(driver.measures().feasible, Feasible::True);
}

#[test]
fn enumerates_every_solution() {
    let world = not_equal_world(2);
    let mut driver = SearchDriver::new(world, LexicographicSplit::new());
    driver.launch(false).unwrap();

    assert_eq!(driver.measures().solution_count, 2);
    assert_eq!(driver.interrupt_reason(), Some(InterruptReason::Root));
    assert_eq!(driver.measures().feasible, Feasible::True);
    assert!(!driver.measures().optimal);
}

#[test]
fn detects_infeasibility_up_front() {
    // Both domains collapse to the same singleton before any decision is
    // made, so `x != y` contradicts during initial propagation.
    let world = not_equal_world(1);
    let mut driver = SearchDriver::new(world, LexicographicSplit::new());
    driver.launch(false).unwrap();

    assert_eq!(driver.measures().solution_count, 0);
    assert_eq!(driver.interrupt_reason(), Some(InterruptReason::Init));
    assert_eq!(driver.measures().feasible, Feasible::False);
}

#[test]
fn minimizes_to_a_proven_optimum() {
    let world = not_equal_world(3);
    let mut driver = SearchDriver::new(world, LexicographicSplit::new())
        .with_objective(ObjectiveManager::minimize(X));
    driver.launch(false).unwrap();

    assert!(driver.measures().solution_count >= 1);
    assert!(matches!(
        driver.interrupt_reason(),
        Some(InterruptReason::Cut) | Some(InterruptReason::Root)
    ));
    assert!(driver.measures().optimal);
    assert_eq!(driver.objective().best(), Some(0));
}

#[test]
fn cooperative_node_limit_interrupts_before_any_solution() {
    let world = not_equal_world(5);
    let mut driver = SearchDriver::new(world, LexicographicSplit::new());
    driver.plug_monitor(1, Box::new(NodeLimitMonitor::new(1)));
    driver.launch(false).unwrap();

    assert_eq!(driver.measures().solution_count, 0);
    assert_eq!(driver.interrupt_reason(), Some(InterruptReason::Limit));
    assert_eq!(driver.measures().feasible, Feasible::Undefined);
}

/// A monitor that asks the driver to restart after every solution, used here
/// to exercise restart semantics deterministically in combination with a
/// solution limit.
struct RestartOnSolution;

impl Monitor for RestartOnSolution {
    fn on_solution(&mut self, view: &DriverView) {
        view.signals.request_restart();
    }
}

#[test]
fn restarts_after_each_solution_until_the_limit_wins() {
    let world = not_equal_world(2);
    let mut driver = SearchDriver::new(world, LexicographicSplit::new());
    driver.plug_monitor(1, Box::new(RestartOnSolution));
    driver.plug_monitor(2, Box::new(SolutionLimitMonitor::new(5)));
    driver.launch(false).unwrap();

    assert_eq!(driver.measures().solution_count, 5);
    assert_eq!(driver.interrupt_reason(), Some(InterruptReason::Limit));
    // Interrupt takes priority over the pending restart on the final
    // solution, so only four restarts actually happen.
    assert_eq!(driver.measures().restart_count, 4);
}

#[test]
fn duplicate_monitor_ids_are_rejected() {
    let world = not_equal_world(2);
    let mut driver = SearchDriver::new(world, LexicographicSplit::new());
    driver.plug_monitor(1, Box::new(NodeLimitMonitor::new(1000)));
    driver.plug_monitor(1, Box::new(NodeLimitMonitor::new(1)));
    driver.launch(false).unwrap();

    // The second plug under id 1 was rejected, so the generous limit from
    // the first stands and the search runs to exhaustion rather than
    // stopping after one node.
    assert_eq!(driver.interrupt_reason(), Some(InterruptReason::Root));
}
