//! Interactive shell
//!
//! Line-based prompt loop around a loaded DFA. Generic over the reader and
//! writer so sessions can be replayed in tests.

use fsm_engine::{Dfa, DfaError, StepObserver, Tokenizer};
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Shell configuration
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// How an input line is split into symbols
    pub tokenizer: Tokenizer,

    /// Print every transition while checking a string
    pub trace: bool,

    /// Prompt for the next input string
    pub prompt: String,

    /// Prompt asking whether to continue
    pub continue_prompt: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            tokenizer: Tokenizer::Chars,
            trace: false,
            prompt: "Enter the input string: ".to_string(),
            continue_prompt: "Do you want to check another string? (y/n): ".to_string(),
        }
    }
}

/// Counters for one shell session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub checked: usize,
    pub accepted: usize,
}

/// Prompt loop over one DFA
pub struct Shell<'a, R, W> {
    dfa: &'a Dfa,
    config: ShellConfig,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(dfa: &'a Dfa, config: ShellConfig, input: R, output: W) -> Self {
        Self {
            dfa,
            config,
            input,
            output,
        }
    }

    /// Run until the operator answers `n` or input ends
    pub fn run(&mut self) -> io::Result<SessionStats> {
        let mut stats = SessionStats::default();

        loop {
            let prompt = self.config.prompt.clone();
            let Some(line) = self.ask(&prompt)? else {
                break;
            };

            stats.checked += 1;
            if self.check(&line)? {
                stats.accepted += 1;
            }

            let prompt = self.config.continue_prompt.clone();
            match self.ask(&prompt)? {
                Some(answer) if answer.trim() == "n" => break,
                Some(_) => {}
                None => break,
            }
        }

        writeln!(self.output, "Exiting the Finite State Machine.")?;
        debug!(checked = stats.checked, accepted = stats.accepted, "Shell session ended");
        Ok(stats)
    }

    /// Check one line and report the result. Returns whether it was accepted.
    pub fn check(&mut self, line: &str) -> io::Result<bool> {
        let dfa = self.dfa;
        let symbols = self.config.tokenizer.tokenize(line);

        // The trace reports unknown symbols itself
        let accepted = if self.config.trace {
            let mut trace = ConsoleTrace::new(&mut self.output);
            let accepted = dfa.accept_with(&symbols, &mut trace);
            trace.finish()?;
            accepted
        } else {
            if let Err(DfaError::UnknownSymbolInInput { symbol, .. }) = dfa.check_input(&symbols) {
                writeln!(self.output, "{}", unknown_symbol_message(&symbol))?;
            }
            dfa.accept(&symbols)
        };

        if accepted {
            writeln!(self.output, "The input string is acceptable.")?;
        } else {
            writeln!(self.output, "The input string is not acceptable.")?;
        }
        Ok(accepted)
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Print `prompt` and read one line without its line ending
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

fn unknown_symbol_message(symbol: &str) -> String {
    format!("Symbol '{}' in input string is not in the alphabet.", symbol)
}

/// Writes every simulation step as a human-readable line
pub struct ConsoleTrace<W: Write> {
    output: W,
    error: Option<io::Error>,
}

impl<W: Write> ConsoleTrace<W> {
    pub fn new(output: W) -> Self {
        Self {
            output,
            error: None,
        }
    }

    /// Surface the first write error, if any
    pub fn finish(self) -> io::Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        if self.error.is_none() {
            if let Err(err) = writeln!(self.output, "{}", args) {
                self.error = Some(err);
            }
        }
    }
}

impl<W: Write> StepObserver for ConsoleTrace<W> {
    fn on_start(&mut self, state: &str) {
        self.line(format_args!("Starting at state: {}", state));
    }

    fn on_step(&mut self, from: &str, symbol: &str, to: &str) {
        self.line(format_args!("Current state: {}, symbol: '{}'", from, symbol));
        self.line(format_args!("Transitioning to state: {}", to));
    }

    fn on_unknown_symbol(&mut self, symbol: &str, _position: usize) {
        self.line(format_args!("{}", unknown_symbol_message(symbol)));
    }

    fn on_missing_transition(&mut self, state: &str, symbol: &str) {
        self.line(format_args!(
            "No valid transition from state {} on symbol '{}'",
            state, symbol
        ));
    }

    fn on_finish(&mut self, _state: &str, accepted: bool) {
        if accepted {
            self.line(format_args!("Reached an accepting state."));
        } else {
            self.line(format_args!("Did not reach an accepting state."));
        }
    }
}
