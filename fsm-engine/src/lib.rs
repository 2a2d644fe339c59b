//! FSM Engine - Deterministic Finite Automaton
//!
//! This crate validates automaton definitions and simulates them over input
//! strings. A [`Dfa`] can only be obtained from a definition that passed
//! every structural check, so simulation never has to guess:
//!
//! ```text
//! DfaDefinition ──validate──> Dfa ──accept(input)──> bool
//!   (raw sets)     (a..g)      (interned, total table)
//! ```
//!
//! States and symbols are interned to dense ids at construction time and
//! the transition function is stored as a flat `|Q| x |Σ|` table.

mod builder;
mod definition;
mod dfa;
mod input;
mod observer;

pub use builder::DfaBuilder;
pub use definition::DfaDefinition;
pub use dfa::{Dfa, StateId, SymbolId, Verdict};
pub use input::{chars, Tokenizer};
pub use observer::{NoopObserver, Step, StepObserver, StepRecorder, TracingObserver};

use thiserror::Error;

/// Errors raised while validating a definition or checking an input string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DfaError {
    #[error("start state '{0}' is not in the set of defined states")]
    InvalidStartState(String),

    #[error("no start state was specified")]
    MissingStartState,

    #[error("state '{0}' in transition table is not in the set of defined states")]
    UnknownStateInTransitions(String),

    #[error("symbol '{symbol}' in transitions of state '{state}' is not in the alphabet")]
    UnknownSymbolInTransitions { state: String, symbol: String },

    #[error("next state '{target}' for ('{state}', '{symbol}') is not in the set of defined states")]
    InvalidTransitionTarget {
        state: String,
        symbol: String,
        target: String,
    },

    #[error("transition for state '{state}' and symbol '{symbol}' is not defined")]
    MissingTransition { state: String, symbol: String },

    #[error("accept state '{0}' is not in the set of defined states")]
    InvalidAcceptState(String),

    #[error("transition ('{state}', '{symbol}') already leads to '{existing}', cannot also lead to '{target}'")]
    ConflictingTransition {
        state: String,
        symbol: String,
        existing: String,
        target: String,
    },

    #[error("too many states: {count} (max: {max})")]
    StateLimitExceeded { count: usize, max: usize },

    #[error("alphabet too large: {count} symbols (max: {max})")]
    AlphabetLimitExceeded { count: usize, max: usize },

    /// Call-time only. `Dfa::accept` turns this into a rejection.
    #[error("symbol '{symbol}' at position {position} in input string is not in the alphabet")]
    UnknownSymbolInInput { symbol: String, position: usize },
}

/// Result type for DFA operations
pub type DfaResult<T> = Result<T, DfaError>;

/// Construction limits for a DFA
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DfaConfig {
    /// Maximum number of states (0 = unlimited)
    pub max_states: usize,

    /// Maximum number of alphabet symbols (0 = unlimited)
    pub max_symbols: usize,
}

impl DfaConfig {
    pub fn with_max_states(mut self, max_states: usize) -> Self {
        self.max_states = max_states;
        self
    }

    pub fn with_max_symbols(mut self, max_symbols: usize) -> Self {
        self.max_symbols = max_symbols;
        self
    }
}
