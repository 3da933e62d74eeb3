//! Compilation driver: input selection and the single compile-and-emit
//! attempt against the engine.

use std::path::PathBuf;

use tsbuild_engine::{
    CompilationUnit, CompilerEngine, EmitReport, EngineDiagnostic, OptionMap,
};

use crate::config::NormalizedConfig;
use crate::error::BuildError;
use crate::request::BuildRequest;

/// Select the input file set for one invocation.
///
/// An explicit request list fully replaces the configuration-derived
/// list. Partial overlap between the two is not a defined use case;
/// there are no append or merge semantics here.
pub fn select_inputs(
    config: &NormalizedConfig,
    request: &BuildRequest,
) -> Result<Vec<PathBuf>, BuildError> {
    let inputs = match &request.input_files {
        Some(explicit) => explicit.clone(),
        None => config.input_files.clone(),
    };
    if inputs.is_empty() {
        return Err(BuildError::ConfigValidation {
            path: request.config_path.display().to_string(),
            reason: "no input files selected".to_string(),
        });
    }
    Ok(inputs)
}

/// Run one compile-and-emit attempt. No retries.
///
/// A hard engine failure (the compiler could not run at all) is surfaced
/// as a single emission-phase diagnostic rather than swallowed, keeping
/// the caller-facing error taxonomy at the four build-error classes.
pub async fn compile(
    engine: &dyn CompilerEngine,
    input_files: Vec<PathBuf>,
    options: OptionMap,
) -> EmitReport {
    let unit = CompilationUnit {
        input_files,
        options,
    };
    match engine.emit(unit).await {
        Ok(report) => report,
        Err(e) => EmitReport {
            pre_emission: Vec::new(),
            emission: vec![EngineDiagnostic::new(format!(
                "compiler engine failure: {e}"
            ))],
        },
    }
}
