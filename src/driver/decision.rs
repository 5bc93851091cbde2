//! The decision stack (C2): a singly-linked history of applied branching
//! decisions, rooted at a sentinel `ROOT`.

/// A single branching choice at a node of the search tree.
///
/// Implementors typically represent a binary split (`x = v` vs `x != v`) but
/// the capability set also accommodates richer decisions (value enumeration,
/// domain splitting) as long as they expose a finite, ordered set of
/// branches.
pub trait Decision<W> {
    /// Posts the left branch against `world` (e.g. `x = v`).
    fn apply_left(&mut self, world: &mut W);

    /// Posts the next branch against `world` (e.g. `x != v`).
    fn apply_right(&mut self, world: &mut W);

    /// True iff `apply_right` has not yet been applied and more branches
    /// remain.
    fn has_next_branch(&self) -> bool;
}

struct DecisionNode<W> {
    decision: Box<dyn Decision<W>>,
    previous: Link<W>,
}

type Link<W> = Option<Box<DecisionNode<W>>>;

/// A singly-linked chain of applied decisions terminated by a sentinel root.
///
/// Each node transitively owns its predecessor (`Box<DecisionNode<W>>`), so
/// popping a node and dropping it reclaims the whole remaining chain for
/// free when the stack itself is dropped; freeing one node at a time during
/// `UP_BRANCH` only ever drops that single node; ordinary `Drop` is enough,
/// no arena or weak-reference bookkeeping is required for correctness.
pub struct DecisionStack<W> {
    top: Link<W>,
    depth: usize,
}

impl<W> Default for DecisionStack<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> DecisionStack<W> {
    pub fn new() -> Self {
        Self { top: None, depth: 0 }
    }

    /// True iff the stack is at the sentinel root (no decisions applied).
    pub fn is_root(&self) -> bool {
        self.top.is_none()
    }

    /// The number of non-root decisions in the chain. O(1).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Pushes a new decision onto the chain.
    pub fn push(&mut self, decision: Box<dyn Decision<W>>) {
        let previous = self.top.take();
        self.top = Some(Box::new(DecisionNode { decision, previous }));
        self.depth += 1;
    }

    /// Returns a mutable reference to the current top decision, if any.
    pub fn top_mut(&mut self) -> Option<&mut dyn Decision<W>> {
        self.top.as_mut().map(|node| node.decision.as_mut())
    }

    /// Pops and frees the current top decision, moving to its predecessor.
    /// O(1): the dropped node's own predecessor link is simply reparented,
    /// it is not walked.
    pub fn pop_and_free(&mut self) {
        if let Some(node) = self.top.take() {
            self.top = node.previous;
            self.depth -= 1;
        }
    }

    /// Repeatedly pops and frees until the stack is back at root.
    pub fn clear_to_root(&mut self) {
        while !self.is_root() {
            self.pop_and_free();
        }
    }
}
