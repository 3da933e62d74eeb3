//! Error taxonomy for the build step.
//!
//! Every failure class is fatal for the invocation; there is no
//! recoverable/local-only class. Failures propagate as values and are
//! converted to the caller-facing message at the outer boundary only.

use thiserror::Error;
use tsbuild_engine::OptionError;

use crate::diagnostics::{aggregate, Diagnostic};

/// Errors surfaced by one build-step invocation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// The config file is missing, unreadable, or not parseable JSON.
    #[error("failed to read config {path}: {reason}")]
    ConfigRead { path: String, reason: String },

    /// The parsed config violates the expected schema.
    #[error("invalid config {path}: {reason}")]
    ConfigValidation { path: String, reason: String },

    /// A caller-supplied override option is not part of the engine's
    /// option grammar. Raised before any compilation attempt.
    #[error("invalid compiler option override: {0}")]
    InvalidOverride(OptionError),

    /// One or more diagnostics were produced during analysis or emission.
    /// Every entry is preserved, in pre-emission-then-emission order.
    #[error("{}", aggregate(.0))]
    Compilation(Vec<Diagnostic>),
}

impl BuildError {
    /// The caller-facing failure message for the host framework contract.
    pub fn failure_message(&self) -> String {
        format!("TypeScript compilation failed: {self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticPhase;

    #[test]
    fn test_failure_message_prefix() {
        let err = BuildError::ConfigRead {
            path: "tsconfig.json".to_string(),
            reason: "No such file or directory".to_string(),
        };
        let msg = err.failure_message();
        assert!(msg.starts_with("TypeScript compilation failed: "));
        assert!(msg.contains("tsconfig.json"));
    }

    #[test]
    fn test_compilation_error_carries_every_diagnostic() {
        let err = BuildError::Compilation(vec![
            Diagnostic {
                message: "error TS2322: type mismatch".to_string(),
                phase: DiagnosticPhase::PreEmission,
            },
            Diagnostic {
                message: "could not write out/index.js".to_string(),
                phase: DiagnosticPhase::Emission,
            },
        ]);
        let text = err.to_string();
        assert!(text.contains("TS2322"));
        assert!(text.contains("out/index.js"));
        // Entries stay legible: separated by a blank line.
        assert!(text.contains("\n\n"));
    }
}
