//! Property tests for the pieces of the driver that are meant to hold under
//! any sequence of operations, not just the handful of scenarios exercised
//! in `search_scenarios.rs`.

use std::sync::Arc;

use proptest::prelude::*;

use branchpoint::{
    driver::{
        decision::{Decision, DecisionStack},
        measures::{Feasible, Measures},
        monitor::{DriverView, InterruptReason, Monitor},
        objective::ObjectiveManager,
        SearchDriver,
    },
    reference::{
        branching::LexicographicSplit, constraint::Constraint,
        constraints::not_equal::NotEqualConstraint, world::ImWorld,
    },
    solver::{
        semantics::DomainSemantics,
        solution::{HashSetDomain, Solution},
        value::StandardValue,
        VariableId,
    },
};

struct NoopDecision;

impl Decision<()> for NoopDecision {
    fn apply_left(&mut self, _world: &mut ()) {}
    fn apply_right(&mut self, _world: &mut ()) {}
    fn has_next_branch(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy)]
enum StackOp {
    Push,
    Pop,
}

fn stack_op_strategy() -> impl Strategy<Value = StackOp> {
    prop_oneof![Just(StackOp::Push), Just(StackOp::Pop)]
}

proptest! {
    /// `DecisionStack::depth` always tracks the number of live pushes, and
    /// `is_root` is exactly `depth == 0`, under any interleaving of pushes
    /// and (possibly spurious) pops.
    #[test]
    fn decision_stack_depth_matches_push_count(ops in proptest::collection::vec(stack_op_strategy(), 0..200)) {
        let mut stack: DecisionStack<()> = DecisionStack::new();
        let mut expected_depth: usize = 0;

        for op in ops {
            match op {
                StackOp::Push => {
                    stack.push(Box::new(NoopDecision));
                    expected_depth += 1;
                }
                StackOp::Pop => {
                    if expected_depth > 0 {
                        stack.pop_and_free();
                        expected_depth -= 1;
                    }
                }
            }
            prop_assert_eq!(stack.depth(), expected_depth);
            prop_assert_eq!(stack.is_root(), expected_depth == 0);
        }
    }

    /// `Measures::close` implements the documented
    /// (has_solution, limit_hit, is_optimization) outcome table for every
    /// combination of inputs, not just the handful exercised end to end.
    #[test]
    fn measures_close_outcome_table(
        has_solution in any::<bool>(),
        limit_hit in any::<bool>(),
        is_optimization in any::<bool>(),
    ) {
        let mut measures = Measures::new();
        measures.solution_count = if has_solution { 1 } else { 0 };
        measures.close(has_solution, limit_hit, is_optimization);

        let expected_feasible = match (has_solution, limit_hit) {
            (true, _) => Feasible::True,
            (false, true) => Feasible::Undefined,
            (false, false) => Feasible::False,
        };
        let expected_optimal = has_solution && is_optimization && !limit_hit;

        prop_assert_eq!(measures.feasible, expected_feasible);
        prop_assert_eq!(measures.optimal, expected_optimal);
    }
}

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
fn every_before_hook_has_a_matching_after_hook() {
    // A monitor can't report its own counts back out through `DriverView`,
    // so this checks the invariant via a shared cell instead.
    use std::cell::Cell;
    use std::rc::Rc;

    struct SharedPairingMonitor {
        before: Rc<Cell<u64>>,
        after: Rc<Cell<u64>>,
    }

    impl Monitor for SharedPairingMonitor {
        fn before_open_node(&mut self, _view: &DriverView) {
            self.before.set(self.before.get() + 1);
        }
        fn after_open_node(&mut self, _view: &DriverView) {
            self.after.set(self.after.get() + 1);
        }
    }

    let before = Rc::new(Cell::new(0u64));
    let after = Rc::new(Cell::new(0u64));

    let world = not_equal_world(2);
    let mut driver = SearchDriver::new(world, LexicographicSplit::new());
    driver.plug_monitor(
        1,
        Box::new(SharedPairingMonitor {
            before: before.clone(),
            after: after.clone(),
        }),
    );
    driver.launch(false).unwrap();

    assert_eq!(before.get(), after.get());
    assert!(before.get() > 0);
}

#[test]
fn a_panicking_monitor_cannot_crash_the_search() {
    struct PanickingMonitor;

    impl Monitor for PanickingMonitor {
        fn before_open_node(&mut self, _view: &DriverView) {
            panic!("boom");
        }
    }

    let world = not_equal_world(3);
    let mut driver = SearchDriver::new(world, LexicographicSplit::new());
    driver.plug_monitor(1, Box::new(PanickingMonitor));
    driver.launch(false).unwrap();

    assert!(driver.measures().solution_count > 0);
    assert_eq!(driver.interrupt_reason(), Some(InterruptReason::Root));
}

#[test]
fn interrupt_is_idempotent() {
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingMonitor(Rc<Cell<u64>>);

    impl Monitor for CountingMonitor {
        fn after_interrupt(&mut self, _reason: InterruptReason, _view: &DriverView) {
            self.0.set(self.0.get() + 1);
        }
    }

    let count = Rc::new(Cell::new(0u64));
    let world = not_equal_world(1); // infeasible: interrupts during initial propagation
    let mut driver = SearchDriver::new(world, LexicographicSplit::new());
    driver.plug_monitor(1, Box::new(CountingMonitor(count.clone())));
    driver.launch(false).unwrap();

    assert_eq!(count.get(), 1);
    assert_eq!(driver.interrupt_reason(), Some(InterruptReason::Init));

    // A further manual interrupt after the search already stopped must not
    // re-fire `after_interrupt`.
    driver.interrupt(InterruptReason::Limit);
    assert_eq!(count.get(), 1);
    assert_eq!(driver.interrupt_reason(), Some(InterruptReason::Init));
}

/// Records every `time_stamp` seen at a `before_open_node` dispatch.
struct TimeStampRecorder {
    seen: std::rc::Rc<std::cell::RefCell<Vec<u64>>>,
}

impl Monitor for TimeStampRecorder {
    fn before_open_node(&mut self, view: &DriverView) {
        self.seen.borrow_mut().push(view.time_stamp);
    }
}

proptest! {
    /// `time_stamp`, as observed by a monitor across an entire search, never
    /// decreases between one `before_open_node` dispatch and the next,
    /// regardless of how large the (trivially solvable) problem is.
    #[test]
    fn time_stamp_is_non_decreasing_across_a_search(n in 2usize..6) {
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let world = not_equal_world(n as i64);
        let mut driver = SearchDriver::new(world, LexicographicSplit::new());
        driver.plug_monitor(1, Box::new(TimeStampRecorder { seen: seen.clone() }));
        driver.launch(false).unwrap();

        let observed = seen.borrow();
        for pair in observed.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
    }
}

#[test]
fn reset_then_relaunch_is_reproducible() {
    let world = not_equal_world(2);
    let mut driver = SearchDriver::new(world, LexicographicSplit::new());
    driver.launch(false).unwrap();
    let first_solutions = driver.measures().solution_count;
    let first_nodes = driver.measures().node_count;
    let first_reason = driver.interrupt_reason();

    driver.reset();
    driver.launch(false).unwrap();

    assert_eq!(driver.measures().solution_count, first_solutions);
    assert_eq!(driver.measures().node_count, first_nodes);
    assert_eq!(driver.interrupt_reason(), first_reason);
}

#[test]
fn reset_clears_the_proven_objective_bound() {
    let world = not_equal_world(3);
    let mut driver = SearchDriver::new(world, LexicographicSplit::new())
        .with_objective(ObjectiveManager::minimize(X));
    driver.launch(false).unwrap();
    assert_eq!(driver.objective().best(), Some(0));

    driver.reset();
    assert_eq!(
        driver.objective().best(),
        None,
        "reset() must clear the objective manager's recorded bound"
    );

    driver.launch(false).unwrap();
    assert_eq!(driver.objective().best(), Some(0));
}
