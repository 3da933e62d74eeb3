//! Tsbuild-Core: configuration resolution and diagnostic aggregation for
//! one TypeScript compilation build step.
//!
//! Pipeline for one invocation:
//! - `config`: load and validate the project configuration file
//! - `options`: layer caller overrides and the output-location override
//!   on top of it with fixed precedence
//! - `driver`: build one compilation unit and run the engine once
//! - `diagnostics`: fold everything reported into a pass/fail outcome
//! - `pipeline`: the `BuildStep` orchestrator tying the stages together
//!
//! The compiler engine itself lives behind `tsbuild_engine::CompilerEngine`;
//! no invocation shares state with any other.

pub mod config;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod fakes;
pub mod options;
pub mod pipeline;
pub mod request;
pub mod telemetry;

pub use config::{load as load_config, NormalizedConfig};
pub use diagnostics::{BuildOutcome, Diagnostic, DiagnosticPhase};
pub use error::BuildError;
pub use pipeline::{BuildLog, BuildStep, TracingLog};
pub use request::BuildRequest;
pub use telemetry::init_tracing;

/// Crate version, for host frameworks that report it.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
