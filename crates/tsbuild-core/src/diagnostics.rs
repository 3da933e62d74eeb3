//! Diagnostic collection and classification.
//!
//! Gathers everything the engine reported before and during emission,
//! flattens each diagnostic into one string, and folds the whole run into
//! a single pass/fail outcome.

use serde::{Deserialize, Serialize};
use tsbuild_engine::EmitReport;

/// Which stage of the run produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticPhase {
    /// Found during semantic analysis, before any artifact was written.
    PreEmission,
    /// Found while writing output artifacts.
    Emission,
}

/// One reported problem, flattened to human-readable text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    pub phase: DiagnosticPhase,
}

/// Terminal result of one invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildOutcome {
    Success,
    Failure(Vec<Diagnostic>),
}

/// Fold an emit report into an outcome.
///
/// Pre-emission diagnostics come first: analysis problems are conceptually
/// earlier than emission problems even though both arrive together. No
/// entry is dropped, deduplicated, or reordered.
pub fn collect(report: &EmitReport) -> BuildOutcome {
    let diagnostics: Vec<Diagnostic> = report
        .pre_emission
        .iter()
        .map(|d| Diagnostic {
            message: d.flatten(),
            phase: DiagnosticPhase::PreEmission,
        })
        .chain(report.emission.iter().map(|d| Diagnostic {
            message: d.flatten(),
            phase: DiagnosticPhase::Emission,
        }))
        .collect();

    if diagnostics.is_empty() {
        BuildOutcome::Success
    } else {
        BuildOutcome::Failure(diagnostics)
    }
}

/// Join diagnostic messages into one legible block, blank-line separated.
pub fn aggregate(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.message.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
