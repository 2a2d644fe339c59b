//! FSM Definition Loader
//!
//! Reads automaton definitions from disk and hands them to the engine.
//! The file format is chosen by extension:
//!
//! | Extension       | Format |
//! |-----------------|--------|
//! | `.json`         | JSON   |
//! | `.yaml`, `.yml` | YAML   |
//!
//! Both formats use the same top-level keys: `states`, `alphabet`,
//! `startState`, `acceptStates` and `transitions`, where `transitions`
//! maps a state to a map from symbol to next state.

use fsm_engine::{Dfa, DfaConfig, DfaDefinition, DfaError};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Loader configuration
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Limits applied when building the DFA
    pub engine: DfaConfig,

    /// Largest definition file accepted, in bytes (0 = unlimited)
    pub max_file_size: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            engine: DfaConfig::default(),
            max_file_size: 16 * 1024 * 1024, // 16MB
        }
    }
}

/// Serialization format of a definition file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    Json,
    Yaml,
}

impl DefinitionFormat {
    /// Pick a format from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str())? {
            "json" => Some(DefinitionFormat::Json),
            "yaml" | "yml" => Some(DefinitionFormat::Yaml),
            _ => None,
        }
    }

    /// Parse a definition from text
    pub fn parse(self, content: &str) -> Result<DfaDefinition, String> {
        match self {
            DefinitionFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            DefinitionFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }

    /// Render a definition as text
    pub fn render(self, definition: &DfaDefinition) -> LoaderResult<String> {
        let rendered = match self {
            DefinitionFormat::Json => {
                serde_json::to_string_pretty(definition).map_err(|e| e.to_string())
            }
            DefinitionFormat::Yaml => serde_yaml::to_string(definition).map_err(|e| e.to_string()),
        };
        rendered.map_err(LoaderError::Serialize)
    }
}

impl fmt::Display for DefinitionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionFormat::Json => write!(f, "json"),
            DefinitionFormat::Yaml => write!(f, "yaml"),
        }
    }
}

/// Outcome of loading every definition in a directory
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Successfully built automata, in path order
    pub loaded: Vec<(PathBuf, Dfa)>,

    /// Files that failed to load, in path order
    pub failed: Vec<(PathBuf, LoaderError)>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Reads definition files and builds automata from them
#[derive(Debug, Clone, Default)]
pub struct DefinitionLoader {
    config: LoaderConfig,
}

impl DefinitionLoader {
    /// Create a new loader
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Read and parse a definition file without validating it
    pub fn load_definition(&self, path: &Path) -> LoaderResult<DfaDefinition> {
        let format = DefinitionFormat::from_path(path)
            .ok_or_else(|| LoaderError::UnsupportedFormat(path.to_path_buf()))?;

        info!(path = %path.display(), %format, "Loading DFA definition");

        if self.config.max_file_size > 0 {
            let size = std::fs::metadata(path)
                .map_err(|e| LoaderError::Io(path.to_path_buf(), e))?
                .len();
            if size > self.config.max_file_size {
                return Err(LoaderError::FileTooLarge {
                    path: path.to_path_buf(),
                    size,
                    max: self.config.max_file_size,
                });
            }
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| LoaderError::Io(path.to_path_buf(), e))?;

        let definition = format.parse(&content).map_err(|message| LoaderError::Parse {
            origin: path.display().to_string(),
            message,
        })?;

        debug!(
            path = %path.display(),
            states = definition.states.len(),
            symbols = definition.alphabet.len(),
            transitions = definition.transition_count(),
            "Parsed DFA definition"
        );

        Ok(definition)
    }

    /// Read a definition file and build a validated DFA from it
    pub fn load(&self, path: &Path) -> LoaderResult<Dfa> {
        let definition = self.load_definition(path)?;
        self.build(definition, &path.display().to_string())
    }

    /// Parse and build a DFA from in-memory text
    pub fn load_str(&self, content: &str, format: DefinitionFormat) -> LoaderResult<Dfa> {
        let origin = format!("<inline {}>", format);
        let definition = format.parse(content).map_err(|message| LoaderError::Parse {
            origin: origin.clone(),
            message,
        })?;
        self.build(definition, &origin)
    }

    /// Load every `.json`, `.yaml` and `.yml` file in `dir`
    ///
    /// Files with other extensions and subdirectories are skipped. A file
    /// that fails does not stop the others from loading.
    pub fn load_dir(&self, dir: &Path) -> LoaderResult<LoadReport> {
        info!(dir = %dir.display(), "Loading DFA definitions");

        let entries =
            std::fs::read_dir(dir).map_err(|e| LoaderError::Io(dir.to_path_buf(), e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| LoaderError::Io(dir.to_path_buf(), e))?;
            let path = entry.path();
            if path.is_file() && DefinitionFormat::from_path(&path).is_some() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut report = LoadReport::default();
        for path in paths {
            match self.load(&path) {
                Ok(dfa) => {
                    debug!(path = %path.display(), "Loaded definition");
                    report.loaded.push((path, dfa));
                }
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Failed to load definition");
                    report.failed.push((path, e));
                }
            }
        }

        info!(
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            "Definition loading complete"
        );

        Ok(report)
    }

    fn build(&self, definition: DfaDefinition, origin: &str) -> LoaderResult<Dfa> {
        Dfa::with_config(definition, &self.config.engine).map_err(|source| {
            warn!(origin, error = %source, "Definition failed validation");
            LoaderError::Invalid {
                origin: origin.to_string(),
                source,
            }
        })
    }
}

/// Definition loader errors
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("IO error accessing {0:?}: {1}")]
    Io(PathBuf, std::io::Error),

    #[error("Unsupported definition format: {0:?}")]
    UnsupportedFormat(PathBuf),

    #[error("Definition file {path:?} is {size} bytes (max: {max})")]
    FileTooLarge { path: PathBuf, size: u64, max: u64 },

    #[error("Parse error in {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("Invalid definition in {origin}: {source}")]
    Invalid {
        origin: String,
        #[source]
        source: DfaError,
    },

    #[error("Failed to serialize definition: {0}")]
    Serialize(String),
}

impl LoaderError {
    /// The engine validation error, if this is one
    pub fn dfa_error(&self) -> Option<&DfaError> {
        match self {
            LoaderError::Invalid { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;
