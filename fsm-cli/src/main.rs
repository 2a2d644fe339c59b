//! FSM CLI
//!
//! Command-line interface for the deterministic finite automaton engine.

mod shell;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fsm_engine::{Dfa, Tokenizer};
use fsm_loader::{DefinitionFormat, DefinitionLoader, LoaderConfig};
use shell::{ConsoleTrace, Shell, ShellConfig};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "fsm")]
#[command(about = "FSM - validate and run deterministic finite automata", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level
    #[arg(short, long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a definition and check strings interactively
    Run {
        /// Definition file (.json, .yaml or .yml)
        #[arg(short, long, default_value = "./dfa.json")]
        definition: PathBuf,

        #[command(flatten)]
        input: InputArgs,

        /// Print every transition
        #[arg(long)]
        trace: bool,
    },

    /// Validate a definition file, or every definition in a directory
    Validate {
        /// Definition file or directory
        #[arg(short, long, default_value = "./dfa.json")]
        definition: PathBuf,
    },

    /// Check the given strings and print one verdict per line
    Check {
        /// Definition file (.json, .yaml or .yml)
        #[arg(short, long, default_value = "./dfa.json")]
        definition: PathBuf,

        #[command(flatten)]
        input: InputArgs,

        /// Print every transition
        #[arg(long)]
        trace: bool,

        /// Input strings
        inputs: Vec<String>,
    },

    /// Print the loaded automaton
    Describe {
        /// Definition file (.json, .yaml or .yml)
        #[arg(short, long, default_value = "./dfa.json")]
        definition: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Args)]
struct InputArgs {
    /// How input strings are split into symbols
    #[arg(long, value_enum, default_value_t = TokenizerKind::Chars)]
    tokenizer: TokenizerKind,

    /// Symbol delimiter for `--tokenizer delimited`
    #[arg(long, default_value = ",")]
    delimiter: String,
}

impl InputArgs {
    fn tokenizer(&self) -> Tokenizer {
        match self.tokenizer {
            TokenizerKind::Chars => Tokenizer::Chars,
            TokenizerKind::Whitespace => Tokenizer::Whitespace,
            TokenizerKind::Delimited => Tokenizer::Delimited(self.delimiter.clone()),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TokenizerKind {
    /// One symbol per character
    Chars,
    /// Symbols separated by whitespace
    Whitespace,
    /// Symbols separated by `--delimiter`
    Delimited,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Yaml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level)?;

    let loader = DefinitionLoader::new(LoaderConfig::default());
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Run {
            definition,
            input,
            trace,
        } => {
            let config = ShellConfig {
                tokenizer: input.tokenizer(),
                trace,
                ..Default::default()
            };
            let stdin = io::stdin();
            run_shell(&loader, &definition, config, stdin.lock(), &mut out)?;
        }
        Commands::Validate { definition } => {
            validate(&loader, &definition, &mut out)?;
        }
        Commands::Check {
            definition,
            input,
            trace,
            inputs,
        } => {
            check_inputs(
                &loader,
                &definition,
                &input.tokenizer(),
                trace,
                &inputs,
                &mut out,
            )?;
        }
        Commands::Describe { definition, format } => {
            describe(&loader, &definition, format, &mut out)?;
        }
    }

    Ok(())
}

fn setup_logging(level: &str) -> Result<()> {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    Ok(())
}

fn load(loader: &DefinitionLoader, path: &Path) -> Result<Dfa> {
    loader
        .load(path)
        .with_context(|| format!("Failed to load DFA definition from {}", path.display()))
}

fn run_shell<R: BufRead, W: Write>(
    loader: &DefinitionLoader,
    path: &Path,
    config: ShellConfig,
    input: R,
    mut out: W,
) -> Result<()> {
    let dfa = load(loader, path)?;

    writeln!(out, "Finite State Machine")?;
    writeln!(out, "{}", dfa)?;

    let mut shell = Shell::new(&dfa, config, input, out);
    let stats = shell.run().context("Shell I/O failed")?;

    info!(
        checked = stats.checked,
        accepted = stats.accepted,
        "Session complete"
    );
    Ok(())
}

fn validate(loader: &DefinitionLoader, path: &Path, out: &mut impl Write) -> Result<()> {
    if path.is_dir() {
        let report = loader.load_dir(path)?;
        for (file, dfa) in &report.loaded {
            writeln!(
                out,
                "{}: valid ({} states, {} symbols)",
                file.display(),
                dfa.state_count(),
                dfa.symbol_count()
            )?;
        }
        for (file, err) in &report.failed {
            writeln!(out, "{}: invalid: {}", file.display(), err)?;
        }
        if !report.is_clean() {
            anyhow::bail!("{} definition(s) failed validation", report.failed.len());
        }
        return Ok(());
    }

    let dfa = load(loader, path)?;
    writeln!(
        out,
        "{}: valid ({} states, {} symbols)",
        path.display(),
        dfa.state_count(),
        dfa.symbol_count()
    )?;
    Ok(())
}

fn check_inputs(
    loader: &DefinitionLoader,
    path: &Path,
    tokenizer: &Tokenizer,
    trace: bool,
    inputs: &[String],
    out: &mut impl Write,
) -> Result<()> {
    let dfa = load(loader, path)?;

    for input in inputs {
        let symbols = tokenizer.tokenize(input);
        let accepted = if trace {
            let mut console = ConsoleTrace::new(&mut *out);
            let accepted = dfa.accept_with(&symbols, &mut console);
            console.finish()?;
            accepted
        } else {
            dfa.accept(&symbols)
        };
        let verdict = if accepted { "accepted" } else { "rejected" };
        writeln!(out, "{}: {}", input, verdict)?;
    }

    Ok(())
}

fn describe(
    loader: &DefinitionLoader,
    path: &Path,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let dfa = load(loader, path)?;
    let rendered = match format {
        OutputFormat::Text => dfa.describe(),
        OutputFormat::Json => DefinitionFormat::Json.render(&dfa.to_definition())?,
        OutputFormat::Yaml => DefinitionFormat::Yaml.render(&dfa.to_definition())?,
    };
    writeln!(out, "{}", rendered)?;
    Ok(())
}
