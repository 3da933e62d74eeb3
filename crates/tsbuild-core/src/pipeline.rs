//! Build-step orchestrator.
//!
//! Sequences one invocation: load config → validate and merge overrides →
//! compile → collect diagnostics. A failure at load or merge
//! short-circuits; the engine is never invoked. Logging is a side channel
//! to the host-supplied `BuildLog` and never affects the returned outcome.

use std::sync::Arc;

use tsbuild_engine::CompilerEngine;

use crate::diagnostics::{collect, BuildOutcome};
use crate::error::BuildError;
use crate::request::BuildRequest;
use crate::{config, driver, options};

/// Logging capability the host supplies at construction time.
///
/// Two methods, no formatting requirements beyond passing a string. Using
/// a capability interface instead of a base class keeps the orchestrator
/// fully unit-testable with a recording stub.
pub trait BuildLog: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// `BuildLog` backed by the tracing subscriber.
#[derive(Debug, Default)]
pub struct TracingLog;

impl BuildLog for TracingLog {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// One-shot build step bound to an engine and a log sink.
///
/// Invocations share no mutable state: each `run` builds its own
/// normalized config, effective options, and compilation unit, so
/// concurrent runs targeting distinct output locations are safe.
pub struct BuildStep {
    engine: Arc<dyn CompilerEngine>,
    log: Arc<dyn BuildLog>,
}

impl BuildStep {
    pub fn new(engine: Arc<dyn CompilerEngine>, log: Arc<dyn BuildLog>) -> Self {
        BuildStep { engine, log }
    }

    /// Execute one invocation.
    ///
    /// Emits exactly one info event before compilation begins (naming the
    /// resolved config path) and one info event on overall success; on
    /// compilation failure, one error event per diagnostic before the
    /// aggregated failure is returned.
    pub async fn run(&self, request: &BuildRequest) -> Result<(), BuildError> {
        let grammar = self.engine.grammar();

        let config = config::load(&request.config_path, grammar)?;
        options::validate_overrides(&request.option_overrides, grammar)?;
        let effective = options::merge(
            &config.options,
            &request.option_overrides,
            request.output_location.as_deref(),
        );
        let inputs = driver::select_inputs(&config, request)?;

        self.log.info(&format!(
            "compiling {} file(s) from {}",
            inputs.len(),
            request.config_path.display()
        ));

        let report = driver::compile(self.engine.as_ref(), inputs, effective).await;

        match collect(&report) {
            BuildOutcome::Success => {
                self.log
                    .info(&format!("compilation of {} succeeded", request.config_path.display()));
                Ok(())
            }
            BuildOutcome::Failure(diagnostics) => {
                for diagnostic in &diagnostics {
                    self.log.error(&diagnostic.message);
                }
                Err(BuildError::Compilation(diagnostics))
            }
        }
    }
}
