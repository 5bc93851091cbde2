//! The monitor list (C5): pre/post hooks per transition, dispatched
//! synchronously and never allowed to disturb the search.

use std::cell::Cell;

use tracing::warn;

use crate::driver::measures::Measures;

/// Why the driver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptReason {
    /// Initial propagation found a contradiction (`MSG_INIT`).
    Init,
    /// The strategy detected unsatisfiability up front (`MSG_SEARCH_INIT`).
    StrategyInconsistent,
    /// `stop_at_first_solution` was set and a solution was found (`MSG_FIRST_SOL`).
    FirstSolution,
    /// An objective cut contradicted at the root (`MSG_CUT`).
    Cut,
    /// The search tree was exhausted (`MSG_ROOT`).
    Root,
    /// An external monitor called `reach_limit` (`MSG_LIMIT`).
    Limit,
}

impl InterruptReason {
    /// The textual reason reported alongside the outcome, per §7.
    pub fn message(&self) -> &'static str {
        match self {
            InterruptReason::Init => "MSG_INIT",
            InterruptReason::StrategyInconsistent => "MSG_SEARCH_INIT",
            InterruptReason::FirstSolution => "MSG_FIRST_SOL",
            InterruptReason::Cut => "MSG_CUT",
            InterruptReason::Root => "MSG_ROOT",
            InterruptReason::Limit => "MSG_LIMIT",
        }
    }
}

/// A unique handle a caller assigns to a monitor at plug time, used to
/// reject duplicate `plug_monitor` calls.
pub type MonitorId = u64;

/// The channel through which a monitor, running inside a hook dispatch, asks
/// the driver to interrupt or restart.
///
/// The driver cannot hand a monitor a second `&mut` borrow of itself during
/// dispatch, so requests are instead recorded here via interior mutability
/// and applied by the driver immediately after the hook returns.
#[derive(Default)]
pub struct DriverSignals {
    interrupt: Cell<Option<InterruptReason>>,
    restart: Cell<bool>,
    limit_reached: Cell<bool>,
    jump_to: Cell<Option<usize>>,
}

impl DriverSignals {
    pub fn request_interrupt(&self, reason: InterruptReason) {
        if self.interrupt.get().is_none() {
            self.interrupt.set(Some(reason));
        }
    }

    pub fn request_restart(&self) {
        self.restart.set(true);
    }

    pub fn reach_limit(&self) {
        self.limit_reached.set(true);
        self.request_interrupt(InterruptReason::Limit);
    }

    /// Requests that the next `UP_BRANCH` pop `worlds` decision levels
    /// instead of one, for a backjumping strategy or monitor that has
    /// determined the failure is independent of the most recent choice.
    /// `worlds` is floored at `1` when applied; it can never skip popping
    /// entirely.
    pub fn request_jump(&self, worlds: usize) {
        self.jump_to.set(Some(worlds));
    }

    pub(crate) fn take_interrupt(&self) -> Option<InterruptReason> {
        self.interrupt.take()
    }

    pub(crate) fn take_restart(&self) -> bool {
        self.restart.take()
    }

    pub(crate) fn take_jump(&self) -> Option<usize> {
        self.jump_to.take()
    }

    pub(crate) fn limit_was_reached(&self) -> bool {
        self.limit_reached.get()
    }
}

/// A read-only snapshot of driver state, handed to monitors during dispatch
/// alongside the [`DriverSignals`] they use to talk back.
pub struct DriverView<'a> {
    pub measures: &'a Measures,
    pub depth: usize,
    pub time_stamp: u64,
    pub signals: &'a DriverSignals,
}

/// An observer plugged into the driver that reacts to transitions.
///
/// Every hook has a default no-op body; implementors override only the ones
/// they care about. A panic or logged failure inside a hook is swallowed by
/// the dispatcher — see [`MonitorList::dispatch_before`] /
/// [`MonitorList::dispatch_after`] — so a faulty monitor can never crash the
/// search.
#[allow(unused_variables)]
pub trait Monitor {
    fn before_initialize(&mut self, view: &DriverView) {}
    fn after_initialize(&mut self, view: &DriverView) {}

    fn before_initial_propagation(&mut self, view: &DriverView) {}
    fn after_initial_propagation(&mut self, view: &DriverView) {}

    fn before_open_node(&mut self, view: &DriverView) {}
    fn after_open_node(&mut self, view: &DriverView) {}

    fn before_down_left(&mut self, view: &DriverView) {}
    fn after_down_left(&mut self, view: &DriverView) {}

    fn before_down_right(&mut self, view: &DriverView) {}
    fn after_down_right(&mut self, view: &DriverView) {}

    fn before_up_branch(&mut self, view: &DriverView) {}
    fn after_up_branch(&mut self, view: &DriverView) {}

    fn before_restart(&mut self, view: &DriverView) {}
    fn after_restart(&mut self, view: &DriverView) {}

    fn before_close(&mut self, view: &DriverView) {}
    fn after_close(&mut self, view: &DriverView) {}

    fn after_interrupt(&mut self, reason: InterruptReason, view: &DriverView) {}
    fn on_solution(&mut self, view: &DriverView) {}
}

/// Which hook pair a transition maps to, used to drive dispatch generically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    Initialize,
    InitialPropagation,
    OpenNode,
    DownLeft,
    DownRight,
    UpBranch,
    Restart,
    Close,
}

/// Ordered set of monitors, keyed by caller-assigned [`MonitorId`].
///
/// Dispatched in insertion order on `before_*` and reverse order on
/// `after_*`, per §4.1's tie-break rules.
#[derive(Default)]
pub struct MonitorList {
    monitors: Vec<(MonitorId, Box<dyn Monitor>)>,
}

impl MonitorList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `monitor` unless `id` is already present.
    pub fn plug(&mut self, id: MonitorId, monitor: Box<dyn Monitor>) {
        if self.monitors.iter().any(|(existing, _)| *existing == id) {
            return;
        }
        self.monitors.push((id, monitor));
    }

    fn dispatch(&mut self, reverse: bool, context: &str, view: &DriverView, mut call: impl FnMut(&mut dyn Monitor, &DriverView)) {
        if reverse {
            for (_, monitor) in self.monitors.iter_mut().rev() {
                call_guarded(context, monitor.as_mut(), view, &mut call);
            }
        } else {
            for (_, monitor) in self.monitors.iter_mut() {
                call_guarded(context, monitor.as_mut(), view, &mut call);
            }
        }
    }

    pub fn dispatch_before(&mut self, kind: HookKind, view: &DriverView) {
        let context = format!("{kind:?} before");
        self.dispatch(false, &context, view, |m, v| dispatch_one(kind, true, m, v));
    }

    pub fn dispatch_after(&mut self, kind: HookKind, view: &DriverView) {
        let context = format!("{kind:?} after");
        self.dispatch(true, &context, view, |m, v| dispatch_one(kind, false, m, v));
    }

    pub fn dispatch_after_interrupt(&mut self, reason: InterruptReason, view: &DriverView) {
        for (_, monitor) in self.monitors.iter_mut().rev() {
            call_guarded("after_interrupt", monitor.as_mut(), view, &mut |m, v| {
                m.after_interrupt(reason, v)
            });
        }
    }

    pub fn dispatch_on_solution(&mut self, view: &DriverView) {
        for (_, monitor) in self.monitors.iter_mut() {
            call_guarded("on_solution", monitor.as_mut(), view, &mut |m, v| m.on_solution(v));
        }
    }
}

fn dispatch_one(kind: HookKind, before: bool, monitor: &mut dyn Monitor, view: &DriverView) {
    match (kind, before) {
        (HookKind::Initialize, true) => monitor.before_initialize(view),
        (HookKind::Initialize, false) => monitor.after_initialize(view),
        (HookKind::InitialPropagation, true) => monitor.before_initial_propagation(view),
        (HookKind::InitialPropagation, false) => monitor.after_initial_propagation(view),
        (HookKind::OpenNode, true) => monitor.before_open_node(view),
        (HookKind::OpenNode, false) => monitor.after_open_node(view),
        (HookKind::DownLeft, true) => monitor.before_down_left(view),
        (HookKind::DownLeft, false) => monitor.after_down_left(view),
        (HookKind::DownRight, true) => monitor.before_down_right(view),
        (HookKind::DownRight, false) => monitor.after_down_right(view),
        (HookKind::UpBranch, true) => monitor.before_up_branch(view),
        (HookKind::UpBranch, false) => monitor.after_up_branch(view),
        (HookKind::Restart, true) => monitor.before_restart(view),
        (HookKind::Restart, false) => monitor.after_restart(view),
        (HookKind::Close, true) => monitor.before_close(view),
        (HookKind::Close, false) => monitor.after_close(view),
    }
}

/// Runs `call` against `monitor`, catching any panic so a faulty monitor
/// can never bring down the search loop. A caught panic is routed through
/// [`swallow_monitor_failure`] as a `MonitorFailure`.
fn call_guarded(
    context: &str,
    monitor: &mut dyn Monitor,
    view: &DriverView,
    call: &mut impl FnMut(&mut dyn Monitor, &DriverView),
) {
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| call(monitor, view)));
    if let Err(payload) = outcome {
        swallow_monitor_failure(context, panic_payload_message(&payload));
    }
}

fn panic_payload_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "monitor panicked with a non-string payload".to_string()
    }
}

/// Logs and discards a `MonitorFailure` — a panic caught while running a
/// monitor hook. The search loop never sees it.
pub fn swallow_monitor_failure(context: &str, err: impl std::fmt::Display) {
    warn!(context, %err, "monitor callback failed; swallowing");
}
