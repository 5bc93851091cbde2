//! The flat, iterative search loop driver (C1): dispatch, lifecycle, and the
//! transition handlers that tie the other seven components together.

pub mod decision;
pub mod limit;
pub mod measures;
pub mod monitor;
pub mod objective;
pub mod trail;

use tracing::{debug, trace};

use crate::{
    driver::{
        decision::DecisionStack,
        measures::Measures,
        monitor::{DriverSignals, DriverView, HookKind, InterruptReason, Monitor, MonitorId, MonitorList},
        objective::{CutOutcome, ObjectiveManager, ObjectiveWorld},
        trail::Trail,
    },
    error::{Result, SolverError},
    propagation::PropagationEngine,
    strategy::{BranchingStrategy, DecisionOutcome},
};

/// The capability a world must offer so the driver can recognize a solution:
/// every variable's domain has collapsed to a single value.
pub trait SolutionCheck {
    fn is_complete(&self) -> bool;
}

/// The flat state tag driving dispatch. See §4.1 for the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Init,
    InitialPropagation,
    OpenNode,
    DownLeft,
    DownRight,
    UpBranch,
    Restart,
    Resume,
}

/// Which transition follows a solution or a failed branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOutcomeState {
    UpBranch,
    Restart,
}

impl From<PostOutcomeState> for SearchState {
    fn from(value: PostOutcomeState) -> Self {
        match value {
            PostOutcomeState::UpBranch => SearchState::UpBranch,
            PostOutcomeState::Restart => SearchState::Restart,
        }
    }
}

fn hook_kind_for(state: SearchState) -> Option<HookKind> {
    match state {
        SearchState::Init => Some(HookKind::Initialize),
        SearchState::InitialPropagation => Some(HookKind::InitialPropagation),
        SearchState::OpenNode => Some(HookKind::OpenNode),
        SearchState::DownLeft => Some(HookKind::DownLeft),
        SearchState::DownRight => Some(HookKind::DownRight),
        SearchState::UpBranch => Some(HookKind::UpBranch),
        SearchState::Restart => Some(HookKind::Restart),
        SearchState::Resume => None,
    }
}

/// The search loop driver: owns the state machine, the decision chain, and
/// the measures; shares the world, strategy, objective manager, and
/// monitors with the enclosing solver.
///
/// `W` bundles the trail, the propagation engine, the objective's view of
/// variables, and the solution-completeness check behind one generic
/// parameter, mirroring the crate's existing pattern of bundling related
/// state (domains + semantics) behind a single type parameter rather than
/// threading several simultaneous mutable borrows of logically-the-same
/// state through the loop.
pub struct SearchDriver<W, B> {
    next_state: SearchState,
    alive: bool,
    time_stamp: u64,
    root_world: Option<usize>,
    search_world: Option<usize>,
    jump_to: usize,
    has_reached_limit: bool,
    stop_at_first_solution: bool,
    state_after_solution: PostOutcomeState,
    state_after_fail: PostOutcomeState,
    interrupt_reason: Option<InterruptReason>,

    decisions: DecisionStack<W>,
    world: W,
    strategy: B,
    objective: ObjectiveManager,
    monitors: MonitorList,
    signals: DriverSignals,
    measures: Measures,
}

impl<W, B> SearchDriver<W, B>
where
    W: Trail + PropagationEngine + ObjectiveWorld + SolutionCheck,
    B: BranchingStrategy<W>,
{
    pub fn new(world: W, strategy: B) -> Self {
        Self {
            next_state: SearchState::Init,
            alive: false,
            time_stamp: 0,
            root_world: None,
            search_world: None,
            jump_to: 1,
            has_reached_limit: false,
            stop_at_first_solution: false,
            state_after_solution: PostOutcomeState::UpBranch,
            state_after_fail: PostOutcomeState::UpBranch,
            interrupt_reason: None,
            decisions: DecisionStack::new(),
            world,
            strategy,
            objective: ObjectiveManager::satisfaction(),
            monitors: MonitorList::new(),
            signals: DriverSignals::default(),
            measures: Measures::new(),
        }
    }

    pub fn with_objective(mut self, objective: ObjectiveManager) -> Self {
        self.objective = objective;
        self
    }

    pub fn with_state_after_solution(mut self, state: PostOutcomeState) -> Self {
        self.state_after_solution = state;
        self
    }

    pub fn with_state_after_fail(mut self, state: PostOutcomeState) -> Self {
        self.state_after_fail = state;
        self
    }

    /// Replaces the branching strategy. Valid only before `launch` or after
    /// `reset`.
    pub fn set_strategy(&mut self, strategy: B) {
        self.strategy = strategy;
    }

    pub fn measures(&self) -> &Measures {
        &self.measures
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn objective(&self) -> &ObjectiveManager {
        &self.objective
    }

    pub fn interrupt_reason(&self) -> Option<InterruptReason> {
        self.interrupt_reason
    }

    /// Walks the decision chain to report the current search depth.
    pub fn current_depth(&self) -> usize {
        self.decisions.depth()
    }

    /// Appends `monitor` under `id` unless `id` is already plugged.
    pub fn plug_monitor(&mut self, id: MonitorId, monitor: Box<dyn Monitor>) {
        self.monitors.plug(id, monitor);
    }

    /// Begins solving. Fails with `NotInitialized` if a previous run has not
    /// been cleared with `reset`. Returns only after `close`.
    pub fn launch(&mut self, stop_at_first_solution: bool) -> Result<()> {
        if self.next_state != SearchState::Init {
            return Err(SolverError::NotInitialized.into());
        }
        self.stop_at_first_solution = stop_at_first_solution;
        self.alive = true;
        self.measures.start_clock();

        while self.alive {
            self.step()?;
        }
        self.close();
        Ok(())
    }

    /// Rewinds to `root_world`, clears the objective manager's bound and
    /// resets measures. Idempotent if nothing ran.
    pub fn reset(&mut self) {
        if let Some(root) = self.root_world {
            let _ = self.world.world_pop_until(root);
        }
        self.decisions.clear_to_root();
        self.measures.reset();
        self.objective.clear();
        self.time_stamp += 1;
        self.root_world = None;
        self.search_world = None;
        self.jump_to = 1;
        self.has_reached_limit = false;
        self.interrupt_reason = None;
        self.next_state = SearchState::Init;
        self.alive = false;
    }

    /// Sets `has_reached_limit` and interrupts with reason `Limit`.
    pub fn reach_limit(&mut self) {
        self.has_reached_limit = true;
        self.interrupt(InterruptReason::Limit);
    }

    /// Interrupts the search. Idempotent: a second call does not re-fire
    /// `after_interrupt`.
    pub fn interrupt(&mut self, reason: InterruptReason) {
        if self.interrupt_reason.is_some() {
            return;
        }
        if reason == InterruptReason::Limit {
            self.has_reached_limit = true;
        }
        self.interrupt_reason = Some(reason);
        self.alive = false;
        self.next_state = SearchState::Resume;
        debug!(reason = reason.message(), "search interrupted");
        self.with_monitors(|monitors, view| monitors.dispatch_after_interrupt(reason, view));
    }

    /// Requests a restart. Safe to call from any monitor via `DriverSignals`;
    /// this direct form is for callers outside monitor dispatch.
    pub fn restart(&mut self) {
        self.next_state = SearchState::Restart;
    }

    /// Sets how many decision levels the next `UP_BRANCH` pops, for a
    /// backjumping strategy that has determined a failure is independent of
    /// the most recent choice. Floored at `1`: `UP_BRANCH` always pops at
    /// least the current level. Safe to call from any monitor via
    /// `DriverSignals::request_jump`; this direct form is for callers
    /// outside monitor dispatch.
    pub fn set_jump_to(&mut self, worlds: usize) {
        self.jump_to = worlds.max(1);
    }

    fn with_monitors<R>(&mut self, f: impl FnOnce(&mut MonitorList, &DriverView) -> R) -> R {
        let mut monitors = std::mem::take(&mut self.monitors);
        let view = DriverView {
            measures: &self.measures,
            depth: self.decisions.depth(),
            time_stamp: self.time_stamp,
            signals: &self.signals,
        };
        let result = f(&mut monitors, &view);
        self.monitors = monitors;
        result
    }

    /// Picks up interrupt/restart requests a monitor left in `DriverSignals`
    /// during the hook that just ran. Interrupt takes priority: stopping
    /// wins over continuing when both are requested in the same tick.
    fn apply_signals(&mut self) {
        if let Some(reason) = self.signals.take_interrupt() {
            self.interrupt(reason);
            return;
        }
        if let Some(worlds) = self.signals.take_jump() {
            self.set_jump_to(worlds);
        }
        if self.signals.take_restart() {
            self.next_state = SearchState::Restart;
        }
    }

    fn step(&mut self) -> Result<()> {
        let state = self.next_state;
        let kind = hook_kind_for(state);

        if let Some(kind) = kind {
            self.with_monitors(|monitors, view| monitors.dispatch_before(kind, view));
        }

        trace!(?state, depth = self.decisions.depth(), time_stamp = self.time_stamp, "transition");

        match state {
            SearchState::Init => self.handle_init(),
            SearchState::InitialPropagation => self.handle_initial_propagation(),
            SearchState::OpenNode => self.handle_open_node(),
            SearchState::DownLeft => self.handle_down_left(),
            SearchState::DownRight => self.handle_down_right(),
            SearchState::UpBranch => self.handle_up_branch(),
            SearchState::Restart => self.handle_restart()?,
            SearchState::Resume => {
                self.alive = false;
            }
        }

        if let Some(kind) = kind {
            self.with_monitors(|monitors, view| monitors.dispatch_after(kind, view));
            self.apply_signals();
        }
        Ok(())
    }

    fn handle_init(&mut self) {
        self.root_world = Some(self.world.world_index());
        self.next_state = SearchState::InitialPropagation;
    }

    fn handle_initial_propagation(&mut self) {
        self.world.world_push();
        match self.world.propagate() {
            Ok(()) => {
                self.world.world_push();
                self.search_world = Some(self.world.world_index());
                self.next_state = SearchState::OpenNode;
            }
            Err(_) => self.interrupt(InterruptReason::Init),
        }
    }

    fn handle_open_node(&mut self) {
        self.measures.node_count += 1;
        self.measures.record_depth(self.decisions.depth());

        if self.world.is_complete() {
            self.on_leaf_solution();
            return;
        }

        match self.strategy.get_decision(&self.world) {
            DecisionOutcome::NoDecision => self.on_leaf_solution(),
            DecisionOutcome::Branch(decision) => {
                self.decisions.push(decision);
                self.next_state = SearchState::DownLeft;
            }
            DecisionOutcome::Inconsistent => self.interrupt(InterruptReason::StrategyInconsistent),
        }
    }

    fn on_leaf_solution(&mut self) {
        self.record_solution();
        if self.stop_at_first_solution {
            self.interrupt(InterruptReason::FirstSolution);
            return;
        }
        match self.objective.post_cut(&mut self.world) {
            CutOutcome::Applied => {
                self.next_state = self.state_after_solution.into();
            }
            CutOutcome::Contradiction => {
                if self.decisions.is_root() {
                    self.interrupt(InterruptReason::Cut);
                } else {
                    self.next_state = SearchState::UpBranch;
                }
            }
        }
    }

    fn record_solution(&mut self) {
        self.measures.solution_count += 1;
        self.objective.update_best(&self.world);
        debug!(solution_count = self.measures.solution_count, "solution found");
        self.with_monitors(|monitors, view| monitors.dispatch_on_solution(view));
    }

    fn handle_down_left(&mut self) {
        self.time_stamp += 1;
        self.world.world_push();
        if let Some(decision) = self.decisions.top_mut() {
            decision.apply_left(&mut self.world);
        }
        match self.world.propagate() {
            Ok(()) => self.next_state = SearchState::OpenNode,
            Err(_) => {
                self.measures.fail_count += 1;
                self.next_state = self.state_after_fail.into();
            }
        }
    }

    fn handle_down_right(&mut self) {
        self.time_stamp += 1;
        self.world.world_push();
        if let Some(decision) = self.decisions.top_mut() {
            decision.apply_right(&mut self.world);
        }
        match self.world.propagate() {
            Ok(()) => self.next_state = SearchState::OpenNode,
            Err(_) => {
                self.measures.fail_count += 1;
                self.next_state = self.state_after_fail.into();
            }
        }
    }

    fn handle_up_branch(&mut self) {
        // `jump_to` is always >= 1: `new`/`reset` initialize it to `1` and
        // `set_jump_to` floors any later write, so no clamp is needed here.
        let jump = self.jump_to;
        self.jump_to = 1;
        for _ in 0..jump {
            self.world.world_pop();
        }
        self.measures.backtrack_count += 1;

        if self.decisions.is_root() {
            self.interrupt(InterruptReason::Root);
            return;
        }

        let has_next_branch = self
            .decisions
            .top_mut()
            .map(|d| d.has_next_branch())
            .unwrap_or(false);

        if has_next_branch {
            self.next_state = SearchState::DownRight;
        } else {
            self.decisions.pop_and_free();
            self.next_state = SearchState::UpBranch;
        }
    }

    fn handle_restart(&mut self) -> Result<()> {
        let search_world = self.search_world.expect("search_world set before first OPEN_NODE");
        self.world.world_pop_until(search_world)?;
        self.decisions.clear_to_root();
        self.time_stamp += 1;
        self.measures.restart_count += 1;
        debug!("search restarted");
        self.next_state = SearchState::OpenNode;
        Ok(())
    }

    fn close(&mut self) {
        self.with_monitors(|monitors, view| monitors.dispatch_before(HookKind::Close, view));

        let has_solution = self.measures.solution_count > 0;
        let limit_hit = self.has_reached_limit;
        let is_optimization = self.objective.is_optimization();
        self.measures.close(has_solution, limit_hit, is_optimization);

        self.with_monitors(|monitors, view| monitors.dispatch_after(HookKind::Close, view));
    }
}
