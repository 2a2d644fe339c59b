// DFA Builder
//
// Incremental construction of a DFA definition. Methods chain by value;
// the first conflict is remembered and returned from `build`.

use crate::definition::DfaDefinition;
use crate::dfa::Dfa;
use crate::{DfaConfig, DfaError, DfaResult};

/// Builds a [`Dfa`] one state, symbol and transition at a time
///
/// ```
/// use fsm_engine::DfaBuilder;
///
/// // (ab)*
/// let dfa = DfaBuilder::new()
///     .states(["even", "odd", "dead"])
///     .symbols(["a", "b"])
///     .start("even")
///     .accept("even")
///     .transition("even", "a", "odd")
///     .transition("even", "b", "dead")
///     .transition("odd", "a", "dead")
///     .transition("odd", "b", "even")
///     .transition("dead", "a", "dead")
///     .transition("dead", "b", "dead")
///     .build()
///     .unwrap();
///
/// assert!(dfa.accept_str("abab"));
/// assert!(!dfa.accept_str("aba"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DfaBuilder {
    config: DfaConfig,
    definition: DfaDefinition,
    start: Option<String>,
    error: Option<DfaError>,
}

impl DfaBuilder {
    /// Create a builder with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder that enforces `config` on build
    pub fn with_config(config: DfaConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.definition.states.insert(state.into());
        self
    }

    pub fn states<I>(mut self, states: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.definition
            .states
            .extend(states.into_iter().map(Into::into));
        self
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.definition.alphabet.insert(symbol.into());
        self
    }

    pub fn symbols<I>(mut self, symbols: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.definition
            .alphabet
            .extend(symbols.into_iter().map(Into::into));
        self
    }

    /// Set the start state. A later call replaces an earlier one.
    pub fn start(mut self, state: impl Into<String>) -> Self {
        self.start = Some(state.into());
        self
    }

    pub fn accept(mut self, state: impl Into<String>) -> Self {
        self.definition.accept_states.insert(state.into());
        self
    }

    /// Add `from --symbol--> to`
    ///
    /// Repeating an identical transition is harmless; giving the same
    /// (state, symbol) a different target is a `ConflictingTransition`.
    pub fn transition(
        mut self,
        from: impl Into<String>,
        symbol: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        if self.error.is_some() {
            return self;
        }

        let (from, symbol, to) = (from.into(), symbol.into(), to.into());
        let row = self.definition.transitions.entry(from.clone()).or_default();
        match row.get(&symbol) {
            Some(existing) if *existing != to => {
                self.error = Some(DfaError::ConflictingTransition {
                    state: from,
                    symbol,
                    existing: existing.clone(),
                    target: to,
                });
            }
            Some(_) => {}
            None => {
                row.insert(symbol, to);
            }
        }
        self
    }

    /// Number of transitions registered so far
    pub fn transition_count(&self) -> usize {
        self.definition.transition_count()
    }

    /// The definition as it stands, without validating it
    pub fn definition(&self) -> DfaDefinition {
        let mut definition = self.definition.clone();
        definition.start_state = self.start.clone().unwrap_or_default();
        definition
    }

    /// Validate everything added so far and build the DFA
    pub fn build(self) -> DfaResult<Dfa> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut definition = self.definition;
        definition.start_state = self.start.ok_or(DfaError::MissingStartState)?;
        Dfa::with_config(definition, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggle() -> DfaBuilder {
        DfaBuilder::new()
            .states(["off", "on"])
            .symbol("push")
            .start("off")
            .accept("on")
            .transition("off", "push", "on")
            .transition("on", "push", "off")
    }

    #[test]
    fn test_build() {
        let dfa = toggle().build().unwrap();
        assert!(!dfa.accept(Vec::<&str>::new()));
        assert!(dfa.accept(["push"]));
        assert!(!dfa.accept(["push", "push"]));
    }

    #[test]
    fn test_transition_count() {
        assert_eq!(toggle().transition_count(), 2);
    }

    #[test]
    fn test_duplicate_transition_is_harmless() {
        let dfa = toggle().transition("off", "push", "on").build();
        assert!(dfa.is_ok());
    }

    #[test]
    fn test_conflicting_transition() {
        let err = toggle()
            .transition("off", "push", "off")
            .transition("nowhere", "x", "y")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            DfaError::ConflictingTransition {
                state: "off".to_string(),
                symbol: "push".to_string(),
                existing: "on".to_string(),
                target: "off".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_start_state() {
        let err = DfaBuilder::new()
            .state("a")
            .accept("a")
            .build()
            .unwrap_err();
        assert_eq!(err, DfaError::MissingStartState);
    }

    #[test]
    fn test_build_validates() {
        let err = toggle().state("stuck").build().unwrap_err();
        assert_eq!(
            err,
            DfaError::MissingTransition {
                state: "stuck".to_string(),
                symbol: "push".to_string(),
            }
        );
    }

    #[test]
    fn test_build_respects_config() {
        let err = DfaBuilder::with_config(DfaConfig::default().with_max_states(1))
            .states(["off", "on"])
            .symbol("push")
            .start("off")
            .transition("off", "push", "on")
            .transition("on", "push", "off")
            .build()
            .unwrap_err();
        assert_eq!(err, DfaError::StateLimitExceeded { count: 2, max: 1 });
    }

    #[test]
    fn test_definition_snapshot() {
        let definition = toggle().definition();
        assert_eq!(definition.start_state, "off");
        assert_eq!(definition.transition("on", "push"), Some("off"));
    }
}
