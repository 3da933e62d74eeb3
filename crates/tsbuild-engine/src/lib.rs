//! Tsbuild-Engine: compiler engine seam for the tsbuild build step.
//!
//! This crate defines the boundary between the build-step pipeline and the
//! external compiler that does the actual lexing, type-checking, and code
//! emission.
//!
//! ## Key components
//!
//! - `CompilerEngine`: async trait every engine backend implements
//! - `OptionGrammar`: closed table of recognized compiler options
//! - `TscEngine`: production backend driving a `tsc` binary as a subprocess
//! - `fakes::ScriptedEngine`: in-memory engine for tests

pub mod engine;
pub mod fakes;
pub mod grammar;
pub mod tsc;

pub use engine::{CompilationUnit, CompilerEngine, EmitReport, EngineDiagnostic, EngineError};
pub use grammar::{OptionError, OptionGrammar, OptionMap, OptionValue, OUT_DIR_KEY};
pub use tsc::TscEngine;
