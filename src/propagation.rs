//! The propagation engine external interface (§6).

/// A constraint-filtering fixpoint computation over whatever network the
/// implementing world owns.
///
/// Must be deterministic for a given trail state: calling `propagate` twice
/// in a row with no intervening world push/pop must produce the same result.
pub trait PropagationEngine {
    /// Runs filtering to fixpoint. `Ok(())` on success; `Err(())` signals a
    /// contradiction — a domain was pruned empty. The error carries no
    /// payload because a contradiction is recovered control flow (§7), never
    /// surfaced to the caller.
    fn propagate(&mut self) -> Result<(), Contradiction>;
}

/// The normal, recoverable control-flow signal raised when propagation or an
/// objective cut empties a domain. Never surfaces past the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contradiction;
