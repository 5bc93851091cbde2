//! The abstract save/restore collaborator (C3) the search driver rewinds
//! through on backtrack and restart.

use crate::error::{Result, SolverError};

/// A stack of reversible modifications.
///
/// Pushing a world marks a save point; popping restores whatever state the
/// implementor manages back to the most recent save point. The driver never
/// inspects what a world actually snapshots — it only ever pushes, pops, and
/// compares indices.
pub trait Trail {
    /// The index of the current world. Starts at `0` before any push.
    fn world_index(&self) -> usize;

    /// Pushes a new world, saving the current state as a restore point.
    fn world_push(&mut self);

    /// Pops the most recently pushed world, restoring its saved state.
    ///
    /// Calling this with no world pushed is a caller error; reference
    /// implementations may panic in that case since it can only happen if
    /// the driver's own bookkeeping is broken.
    fn world_pop(&mut self);

    /// Pops worlds until `world_index() == index`.
    ///
    /// A no-op if already at `index`. Fails with [`SolverError::InvalidWorld`]
    /// if `index` is ahead of the current world (there is nothing to pop to).
    fn world_pop_until(&mut self, index: usize) -> Result<()> {
        let current = self.world_index();
        if index > current {
            return Err(SolverError::InvalidWorld {
                requested: index,
                current,
            }
            .into());
        }
        while self.world_index() > index {
            self.world_pop();
        }
        Ok(())
    }
}
