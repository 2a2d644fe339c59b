// DFA Definition - the raw, unvalidated five-tuple
//
// This is the shape a loader hands to the engine. Nothing about it is
// trusted until `Dfa::new` has checked it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Unvalidated automaton description
///
/// Field names on the wire follow the definition file format:
/// `states`, `alphabet`, `startState`, `acceptStates`, `transitions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfaDefinition {
    /// Set of state labels
    pub states: BTreeSet<String>,

    /// Set of input symbols
    pub alphabet: BTreeSet<String>,

    /// State the simulation starts in
    #[serde(rename = "startState")]
    pub start_state: String,

    /// States that accept when the input is exhausted
    #[serde(rename = "acceptStates")]
    pub accept_states: BTreeSet<String>,

    /// state -> (symbol -> next state)
    pub transitions: BTreeMap<String, BTreeMap<String, String>>,
}

impl DfaDefinition {
    /// Create a definition from its five parts
    pub fn new<S, A, P>(
        states: S,
        alphabet: A,
        transitions: BTreeMap<String, BTreeMap<String, String>>,
        start_state: impl Into<String>,
        accept_states: P,
    ) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            states: states.into_iter().map(Into::into).collect(),
            alphabet: alphabet.into_iter().map(Into::into).collect(),
            start_state: start_state.into(),
            accept_states: accept_states.into_iter().map(Into::into).collect(),
            transitions,
        }
    }

    /// Total number of (state, symbol) entries in the transition table
    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(BTreeMap::len).sum()
    }

    /// Look up a single entry of the raw transition table
    pub fn transition(&self, state: &str, symbol: &str) -> Option<&str> {
        self.transitions
            .get(state)
            .and_then(|row| row.get(symbol))
            .map(String::as_str)
    }
}
