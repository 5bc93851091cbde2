//! Domain representation machinery shared by the search driver's reference
//! collaborators: variable identifiers, value capability traits, and the
//! persistent (`im`-backed) domain types built on top of them.
//!
//! This module no longer hosts a solver engine or search strategy of its
//! own — those concerns now live in [`crate::driver`] and
//! [`crate::reference`]. What remains is the vocabulary those modules share.

pub mod semantics;
pub mod solution;
pub mod value;

/// A numeric identifier for a single variable in the constraint problem.
pub type VariableId = u32;
