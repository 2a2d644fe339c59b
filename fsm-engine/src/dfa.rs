// DFA - validated automaton and its simulation
//
// Holds an interned copy of a definition that passed every structural
// check. States and symbols become dense ids, and the transition function
// is a flat row-major table indexed by `state * |alphabet| + symbol`.

use crate::definition::DfaDefinition;
use crate::input::chars;
use crate::observer::{StepObserver, TracingObserver};
use crate::{DfaConfig, DfaError, DfaResult};
use ahash::AHashMap;
use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, warn};

/// Interned state identifier
pub type StateId = usize;

/// Interned symbol identifier
pub type SymbolId = usize;

/// Detailed result of running a DFA over one input string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Input consumed, ended in an accepting state
    Accepted { state: String },

    /// Input consumed, ended in a non-accepting state
    Rejected { state: String },

    /// Input contains a symbol outside the alphabet; nothing was simulated
    UnknownSymbol { symbol: String, position: usize },

    /// No entry for (state, symbol). Unreachable for a validated DFA.
    MissingTransition { state: String, symbol: String },
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted { .. })
    }

    /// State the simulation ended in, if the whole input was consumed
    pub fn final_state(&self) -> Option<&str> {
        match self {
            Verdict::Accepted { state } | Verdict::Rejected { state } => Some(state),
            Verdict::UnknownSymbol { .. } | Verdict::MissingTransition { .. } => None,
        }
    }
}

/// Simulation result in id space, turned into a `Verdict` or a bool by callers
enum Outcome {
    Finished(StateId),
    UnknownSymbol(String, usize),
    Unmapped(StateId, SymbolId),
}

/// A validated, immutable deterministic finite automaton
#[derive(Clone)]
pub struct Dfa {
    /// State labels, indexed by `StateId`
    states: Vec<String>,
    state_ids: AHashMap<String, StateId>,

    /// Symbol labels, indexed by `SymbolId`
    symbols: Vec<String>,
    symbol_ids: AHashMap<String, SymbolId>,

    /// Row-major transition table, `states.len() * symbols.len()` entries
    table: Vec<Option<StateId>>,

    start: StateId,

    /// Indexed by `StateId`
    accepting: Vec<bool>,
}

impl Dfa {
    /// Validate a definition and build a DFA from it
    pub fn new(definition: DfaDefinition) -> DfaResult<Self> {
        Self::with_config(definition, &DfaConfig::default())
    }

    /// Validate a definition against custom limits and build a DFA from it
    pub fn with_config(definition: DfaDefinition, config: &DfaConfig) -> DfaResult<Self> {
        if let Err(err) = validate(&definition, config) {
            warn!(error = %err, "Rejected DFA definition");
            return Err(err);
        }

        let dfa = Self::compile(definition)?;
        debug!(
            states = dfa.state_count(),
            symbols = dfa.symbol_count(),
            start = %dfa.start_state(),
            "DFA constructed"
        );
        Ok(dfa)
    }

    /// Build a DFA from the five raw values a loader produces
    pub fn from_parts<S, A, P>(
        states: S,
        alphabet: A,
        transitions: BTreeMap<String, BTreeMap<String, String>>,
        start_state: impl Into<String>,
        accept_states: P,
    ) -> DfaResult<Self>
    where
        S: IntoIterator,
        S::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self::new(DfaDefinition::new(
            states,
            alphabet,
            transitions,
            start_state,
            accept_states,
        ))
    }

    fn compile(definition: DfaDefinition) -> DfaResult<Self> {
        let DfaDefinition {
            states,
            alphabet,
            start_state,
            accept_states,
            transitions,
        } = definition;

        let (states, state_ids) = intern(states);
        let (symbols, symbol_ids) = intern(alphabet);

        let width = symbols.len();
        let mut table = vec![None; states.len() * width];
        for (state, row) in &transitions {
            let Some(&from) = state_ids.get(state) else {
                continue;
            };
            for (symbol, target) in row {
                if let (Some(&symbol), Some(&to)) = (symbol_ids.get(symbol), state_ids.get(target))
                {
                    table[from * width + symbol] = Some(to);
                }
            }
        }

        let mut accepting = vec![false; states.len()];
        for state in &accept_states {
            if let Some(&id) = state_ids.get(state) {
                accepting[id] = true;
            }
        }

        let start = state_ids
            .get(&start_state)
            .copied()
            .ok_or(DfaError::InvalidStartState(start_state))?;

        Ok(Self {
            states,
            state_ids,
            symbols,
            symbol_ids,
            table,
            start,
            accepting,
        })
    }

    /// Check that every symbol of `input` is in the alphabet
    ///
    /// Reports the first offending symbol and its position.
    pub fn check_input<I, T>(&self, input: I) -> DfaResult<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for (position, symbol) in input.into_iter().enumerate() {
            let symbol = symbol.as_ref();
            if !self.symbol_ids.contains_key(symbol) {
                return Err(DfaError::UnknownSymbolInInput {
                    symbol: symbol.to_string(),
                    position,
                });
            }
        }
        Ok(())
    }

    /// True iff every symbol of `input` is in the alphabet
    pub fn alphabet_check<I, T>(&self, input: I) -> bool
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.check_input(input).is_ok()
    }

    /// Decide whether the DFA accepts `input`
    ///
    /// Symbols outside the alphabet reject the input without simulating it.
    /// Each step is reported to a [`TracingObserver`].
    pub fn accept<I, T>(&self, input: I) -> bool
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.accept_with(input, &mut TracingObserver)
    }

    /// Like [`Dfa::accept`], reporting each step to `observer`
    pub fn accept_with<I, T, O>(&self, input: I, observer: &mut O) -> bool
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
        O: StepObserver + ?Sized,
    {
        match self.simulate(input, observer) {
            Outcome::Finished(state) => self.accepting[state],
            Outcome::UnknownSymbol(..) | Outcome::Unmapped(..) => false,
        }
    }

    /// Accept a string where every character is one symbol
    pub fn accept_str(&self, input: &str) -> bool {
        self.accept(chars(input))
    }

    /// Run the DFA and report why the input was accepted or rejected
    pub fn run<I, T>(&self, input: I) -> Verdict
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.run_with(input, &mut TracingObserver)
    }

    pub fn run_with<I, T, O>(&self, input: I, observer: &mut O) -> Verdict
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
        O: StepObserver + ?Sized,
    {
        match self.simulate(input, observer) {
            Outcome::Finished(state) if self.accepting[state] => Verdict::Accepted {
                state: self.states[state].clone(),
            },
            Outcome::Finished(state) => Verdict::Rejected {
                state: self.states[state].clone(),
            },
            Outcome::UnknownSymbol(symbol, position) => Verdict::UnknownSymbol { symbol, position },
            Outcome::Unmapped(state, symbol) => Verdict::MissingTransition {
                state: self.states[state].clone(),
                symbol: self.symbols[symbol].clone(),
            },
        }
    }

    fn simulate<I, T, O>(&self, input: I, observer: &mut O) -> Outcome
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
        O: StepObserver + ?Sized,
    {
        // The whole input is checked against the alphabet before the first step
        let symbols: SmallVec<[SymbolId; 32]> = match self.intern_input(input) {
            Ok(symbols) => symbols,
            Err((symbol, position)) => {
                observer.on_unknown_symbol(&symbol, position);
                return Outcome::UnknownSymbol(symbol, position);
            }
        };

        let mut current = self.start;
        observer.on_start(&self.states[current]);

        for symbol in symbols {
            match self.next_state(current, symbol) {
                Some(next) => {
                    observer.on_step(
                        &self.states[current],
                        &self.symbols[symbol],
                        &self.states[next],
                    );
                    current = next;
                }
                None => {
                    observer.on_missing_transition(&self.states[current], &self.symbols[symbol]);
                    return Outcome::Unmapped(current, symbol);
                }
            }
        }

        observer.on_finish(&self.states[current], self.accepting[current]);
        Outcome::Finished(current)
    }

    fn intern_input<I, T>(&self, input: I) -> Result<SmallVec<[SymbolId; 32]>, (String, usize)>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        input
            .into_iter()
            .enumerate()
            .map(|(position, symbol)| {
                let symbol = symbol.as_ref();
                self.symbol_ids
                    .get(symbol)
                    .copied()
                    .ok_or_else(|| (symbol.to_string(), position))
            })
            .collect()
    }

    #[inline]
    fn next_state(&self, state: StateId, symbol: SymbolId) -> Option<StateId> {
        self.table
            .get(state * self.symbols.len() + symbol)
            .copied()
            .flatten()
    }

    /// Next state for a labelled (state, symbol) pair
    pub fn transition(&self, state: &str, symbol: &str) -> Option<&str> {
        let state = *self.state_ids.get(state)?;
        let symbol = *self.symbol_ids.get(symbol)?;
        self.next_state(state, symbol)
            .map(|next| self.states[next].as_str())
    }

    pub fn start_state(&self) -> &str {
        &self.states[self.start]
    }

    /// State labels in sorted order
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(String::as_str)
    }

    /// Alphabet symbols in sorted order
    pub fn alphabet(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }

    /// Accepting state labels in sorted order
    pub fn accept_states(&self) -> impl Iterator<Item = &str> {
        self.states
            .iter()
            .zip(&self.accepting)
            .filter(|(_, accepting)| **accepting)
            .map(|(state, _)| state.as_str())
    }

    pub fn is_accepting(&self, state: &str) -> bool {
        self.state_ids
            .get(state)
            .map(|&id| self.accepting[id])
            .unwrap_or(false)
    }

    pub fn contains_state(&self, state: &str) -> bool {
        self.state_ids.contains_key(state)
    }

    pub fn contains_symbol(&self, symbol: &str) -> bool {
        self.symbol_ids.contains_key(symbol)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Human-readable description of the automaton
    pub fn describe(&self) -> String {
        self.to_string()
    }

    /// Serializable form of this DFA
    pub fn to_definition(&self) -> DfaDefinition {
        let transitions = self
            .states
            .iter()
            .enumerate()
            .map(|(id, state)| (state.clone(), self.row(id).collect()))
            .collect();

        DfaDefinition {
            states: self.states.iter().cloned().collect(),
            alphabet: self.symbols.iter().cloned().collect(),
            start_state: self.start_state().to_string(),
            accept_states: self.accept_states().map(str::to_string).collect(),
            transitions,
        }
    }

    /// (symbol, next state) pairs of one table row
    fn row(&self, state: StateId) -> impl Iterator<Item = (String, String)> + '_ {
        self.symbols
            .iter()
            .enumerate()
            .filter_map(move |(symbol, label)| {
                self.next_state(state, symbol)
                    .map(|next| (label.clone(), self.states[next].clone()))
            })
    }
}

impl TryFrom<DfaDefinition> for Dfa {
    type Error = DfaError;

    fn try_from(definition: DfaDefinition) -> DfaResult<Self> {
        Self::new(definition)
    }
}

impl fmt::Display for Dfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "States: {{{}}}", self.states.join(", "))?;
        writeln!(f, "Alphabet: {{{}}}", self.symbols.join(", "))?;
        writeln!(f, "Transitions:")?;
        for (id, state) in self.states.iter().enumerate() {
            let row: Vec<String> = self
                .row(id)
                .map(|(symbol, next)| format!("{} -> {}", symbol, next))
                .collect();
            writeln!(f, "  {}: {{{}}}", state, row.join(", "))?;
        }
        writeln!(f, "Start State: {}", self.start_state())?;
        let accepting: Vec<&str> = self.accept_states().collect();
        write!(f, "Accept States: {{{}}}", accepting.join(", "))
    }
}

impl fmt::Debug for Dfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dfa")
            .field("states", &self.states)
            .field("alphabet", &self.symbols)
            .field("start", &self.start_state())
            .field("accept", &self.accept_states().collect::<Vec<_>>())
            .finish()
    }
}

fn intern(labels: BTreeSet<String>) -> (Vec<String>, AHashMap<String, usize>) {
    let ids = labels
        .iter()
        .enumerate()
        .map(|(id, label)| (label.clone(), id))
        .collect();
    (labels.into_iter().collect(), ids)
}

/// Structural checks, in order. The first failure wins.
fn validate(definition: &DfaDefinition, config: &DfaConfig) -> DfaResult<()> {
    let DfaDefinition {
        states,
        alphabet,
        start_state,
        accept_states,
        transitions,
    } = definition;

    if !states.contains(start_state) {
        return Err(DfaError::InvalidStartState(start_state.clone()));
    }

    for (state, row) in transitions {
        if !states.contains(state) {
            return Err(DfaError::UnknownStateInTransitions(state.clone()));
        }
        for (symbol, target) in row {
            if !alphabet.contains(symbol) {
                return Err(DfaError::UnknownSymbolInTransitions {
                    state: state.clone(),
                    symbol: symbol.clone(),
                });
            }
            if !states.contains(target) {
                return Err(DfaError::InvalidTransitionTarget {
                    state: state.clone(),
                    symbol: symbol.clone(),
                    target: target.clone(),
                });
            }
        }
    }

    // Totality. A state without any row is missing its first symbol.
    for state in states {
        let row = transitions.get(state);
        for symbol in alphabet {
            if !row.is_some_and(|row| row.contains_key(symbol)) {
                return Err(DfaError::MissingTransition {
                    state: state.clone(),
                    symbol: symbol.clone(),
                });
            }
        }
    }

    if let Some(state) = accept_states.iter().find(|state| !states.contains(*state)) {
        return Err(DfaError::InvalidAcceptState(state.clone()));
    }

    if config.max_states > 0 && states.len() > config.max_states {
        return Err(DfaError::StateLimitExceeded {
            count: states.len(),
            max: config.max_states,
        });
    }

    if config.max_symbols > 0 && alphabet.len() > config.max_symbols {
        return Err(DfaError::AlphabetLimitExceeded {
            count: alphabet.len(),
            max: config.max_symbols,
        });
    }

    Ok(())
}
