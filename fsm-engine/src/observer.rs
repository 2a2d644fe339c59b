// Step observers
//
// Hooks called while a DFA consumes its input. Observers only watch;
// nothing they do can change the verdict.

use tracing::trace;

/// Receives simulation events from `Dfa::accept_with` and `Dfa::run_with`
pub trait StepObserver {
    /// Simulation starts in `state`
    fn on_start(&mut self, _state: &str) {}

    /// `from` moved to `to` on `symbol`
    fn on_step(&mut self, _from: &str, _symbol: &str, _to: &str) {}

    /// Input rejected before simulation because of `symbol` at `position`
    fn on_unknown_symbol(&mut self, _symbol: &str, _position: usize) {}

    /// No table entry for (`state`, `symbol`); the input is rejected
    fn on_missing_transition(&mut self, _state: &str, _symbol: &str) {}

    /// Input exhausted in `state`
    fn on_finish(&mut self, _state: &str, _accepted: bool) {}
}

/// Ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StepObserver for NoopObserver {}

/// Emits every event through `tracing` at TRACE level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl StepObserver for TracingObserver {
    fn on_start(&mut self, state: &str) {
        trace!(state, "Starting");
    }

    fn on_step(&mut self, from: &str, symbol: &str, to: &str) {
        trace!(from, symbol, to, "Transition");
    }

    fn on_unknown_symbol(&mut self, symbol: &str, position: usize) {
        trace!(symbol, position, "Symbol not in alphabet");
    }

    fn on_missing_transition(&mut self, state: &str, symbol: &str) {
        trace!(state, symbol, "No transition");
    }

    fn on_finish(&mut self, state: &str, accepted: bool) {
        trace!(state, accepted, "Input exhausted");
    }
}

/// One recorded transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub from: String,
    pub symbol: String,
    pub to: String,
}

/// Records a single run for later inspection
#[derive(Debug, Clone, Default)]
pub struct StepRecorder {
    start: Option<String>,
    steps: Vec<Step>,
    accepted: Option<bool>,
}

impl StepRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_state(&self) -> Option<&str> {
        self.start.as_deref()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// `None` if the run never reached the end of its input
    pub fn accepted(&self) -> Option<bool> {
        self.accepted
    }

    /// Forget the previous run
    pub fn clear(&mut self) {
        self.start = None;
        self.steps.clear();
        self.accepted = None;
    }
}

impl StepObserver for StepRecorder {
    fn on_start(&mut self, state: &str) {
        self.start = Some(state.to_string());
    }

    fn on_step(&mut self, from: &str, symbol: &str, to: &str) {
        self.steps.push(Step {
            from: from.to_string(),
            symbol: symbol.to_string(),
            to: to.to_string(),
        });
    }

    fn on_finish(&mut self, _state: &str, accepted: bool) {
        self.accepted = Some(accepted);
    }
}
