//! Compiler engine trait definitions.
//!
//! The build step core never performs lexing, type-checking, or code
//! emission itself; it drives an engine behind this trait. An in-memory
//! fake is provided for testing via the `fakes` module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::grammar::{OptionGrammar, OptionMap};

/// Errors raised by a concrete engine implementation.
///
/// These cover failures of the engine itself (it could not run at all),
/// not problems found in the compiled sources — those are diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("failed to launch compiler process: {0}")]
    Spawn(String),

    #[error("compiler process timed out after {secs} seconds")]
    Timeout { secs: u64 },

    #[error("compiler i/o failure: {0}")]
    Io(String),
}

/// One reported problem, as structured message parts.
///
/// A diagnostic may carry several related lines (the headline plus
/// elaboration); `flatten` joins them with a single newline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineDiagnostic {
    pub parts: Vec<String>,
}

impl EngineDiagnostic {
    /// Single-part diagnostic.
    pub fn new(message: impl Into<String>) -> Self {
        EngineDiagnostic {
            parts: vec![message.into()],
        }
    }

    /// Join all message parts into one human-readable string.
    pub fn flatten(&self) -> String {
        self.parts.join("\n")
    }
}

/// Diagnostics bundle from one compile-and-emit pass, split by phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitReport {
    /// Problems found during semantic analysis, before any artifact is written.
    pub pre_emission: Vec<EngineDiagnostic>,

    /// Problems found while writing output artifacts.
    pub emission: Vec<EngineDiagnostic>,
}

impl EmitReport {
    /// Whether the pass produced no diagnostics at all.
    pub fn is_clean(&self) -> bool {
        self.pre_emission.is_empty() && self.emission.is_empty()
    }
}

/// One compilation unit: an input file list bound to an effective option set.
///
/// Constructed fresh per invocation and used for exactly one
/// compile-and-emit pass; never reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilationUnit {
    pub input_files: Vec<PathBuf>,
    pub options: OptionMap,
}

/// Compiler engine backend.
///
/// Guarantees expected from implementations:
/// - `emit` performs full analysis plus artifact emission in one attempt,
///   returning pre-emission and emission diagnostics separately.
/// - No state is shared between calls; each `CompilationUnit` is independent.
/// - Transient I/O failures while writing individual artifacts surface as
///   emission diagnostics, not as an `EngineError`.
#[async_trait]
pub trait CompilerEngine: Send + Sync {
    /// The option grammar this engine understands.
    fn grammar(&self) -> &OptionGrammar;

    /// Compile and emit one unit.
    async fn emit(&self, unit: CompilationUnit) -> Result<EmitReport, EngineError>;
}
