//! `branchpoint` is the search driver of a finite-domain constraint solver:
//! the flat, iterative state machine that explores the implicit search tree
//! to enumerate solutions or prove optimality, while interleaving
//! propagation, backtracking, branching, and external observation.
//!
//! # Core Concepts
//!
//! - **[`driver::SearchDriver`]**: the state machine itself. Owns the
//!   decision stack and measures; shares the world, strategy, objective, and
//!   monitors with the enclosing solver.
//! - **[`driver::trail::Trail`]** / **[`propagation::PropagationEngine`]**:
//!   the two capabilities a "world" type must provide — reversible
//!   save/restore, and constraint filtering to a fixpoint.
//! - **[`strategy::BranchingStrategy`]**: chooses the next decision at each
//!   open node.
//! - **[`driver::monitor::Monitor`]**: observes transitions to enforce
//!   limits, drive restarts, or collect statistics, without the driver
//!   polling anything itself.
//! - **[`reference`]**: one small, labeled reference implementation of each
//!   of the above, built on the crate's persistent domain representation, so
//!   the driver can be exercised end to end by its own test suite.
//!
//! # Example: driving a 2-variable problem to its first solution
//!
//! ```
//! use branchpoint::{
//!     driver::SearchDriver,
//!     reference::{
//!         branching::LexicographicSplit, constraint::Constraint,
//!         constraints::not_equal::NotEqualConstraint, world::ImWorld,
//!     },
//!     solver::{
//!         semantics::DomainSemantics,
//!         solution::{HashSetDomain, Solution},
//!         value::StandardValue,
//!     },
//! };
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! enum MyConstraint {
//!     NotEqual(u32, u32),
//! }
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash)]
//! struct MyMetadata;
//!
//! #[derive(Debug, Clone)]
//! struct MySemantics;
//!
//! impl DomainSemantics for MySemantics {
//!     type Value = StandardValue;
//!     type VariableMetadata = MyMetadata;
//!     type ConstraintDefinition = MyConstraint;
//!
//!     fn build_constraint(&self, definition: &Self::ConstraintDefinition) -> Box<dyn Constraint<Self>> {
//!         match definition {
//!             MyConstraint::NotEqual(a, b) => Box::new(NotEqualConstraint::new(*a, *b)),
//!         }
//!     }
//! }
//!
//! let x: u32 = 0;
//! let y: u32 = 1;
//! let domains = im::hashmap! {
//!     x => Box::new(HashSetDomain::new(
//!         [StandardValue::Int(0), StandardValue::Int(1)].into_iter().collect()
//!     )) as _,
//!     y => Box::new(HashSetDomain::new(
//!         [StandardValue::Int(0), StandardValue::Int(1)].into_iter().collect()
//!     )) as _,
//! };
//!
//! let semantics = Arc::new(MySemantics);
//! let initial = Solution { domains, semantics: semantics.clone() };
//! let constraints = vec![semantics.build_constraint(&MyConstraint::NotEqual(x, y))];
//!
//! let world = ImWorld::new(initial, constraints);
//! let mut driver = SearchDriver::new(world, LexicographicSplit::new());
//! driver.launch(true).unwrap();
//!
//! assert_eq!(driver.measures().solution_count, 1);
//! ```

pub mod driver;
pub mod error;
pub mod propagation;
pub mod reference;
pub mod solver;
pub mod strategy;
