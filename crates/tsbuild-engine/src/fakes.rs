//! In-memory fake engine for testing (no compiler binary required).

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::engine::{CompilationUnit, CompilerEngine, EmitReport, EngineError};
use crate::grammar::{OptionGrammar, OptionValue, OUT_DIR_KEY};

/// Engine that returns a scripted report and records every unit it is
/// handed, so tests can assert on call counts and effective options.
#[derive(Debug)]
pub struct ScriptedEngine {
    grammar: OptionGrammar,
    report: EmitReport,
    failure: Option<EngineError>,
    write_stub_artifacts: bool,
    units: Mutex<Vec<CompilationUnit>>,
}

impl ScriptedEngine {
    /// Engine whose every pass is clean.
    pub fn succeeding() -> Self {
        Self::scripted(EmitReport::default())
    }

    /// Engine that returns the given report on every call.
    pub fn scripted(report: EmitReport) -> Self {
        ScriptedEngine {
            grammar: OptionGrammar::typescript(),
            report,
            failure: None,
            write_stub_artifacts: false,
            units: Mutex::new(Vec::new()),
        }
    }

    /// Engine whose `emit` fails outright with the given error.
    pub fn failing(error: EngineError) -> Self {
        let mut engine = Self::succeeding();
        engine.failure = Some(error);
        engine
    }

    /// Write a stub `.js` artifact per input file under the unit's
    /// `outDir`, so end-to-end tests can observe emitted output.
    pub fn with_stub_artifacts(mut self) -> Self {
        self.write_stub_artifacts = true;
        self
    }

    /// Every compilation unit received so far, in call order.
    pub fn units(&self) -> Vec<CompilationUnit> {
        self.units.lock().unwrap().clone()
    }

    /// Number of `emit` calls received.
    pub fn emit_calls(&self) -> usize {
        self.units.lock().unwrap().len()
    }

    fn write_stubs(&self, unit: &CompilationUnit) -> Result<(), EngineError> {
        let out_dir = match unit.options.get(OUT_DIR_KEY) {
            Some(OptionValue::Text(dir)) => Path::new(dir).to_path_buf(),
            _ => return Ok(()),
        };
        std::fs::create_dir_all(&out_dir).map_err(|e| EngineError::Io(e.to_string()))?;
        for input in &unit.input_files {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "out".to_string());
            let target = out_dir.join(format!("{stem}.js"));
            std::fs::write(&target, b"// emitted by ScriptedEngine\n")
                .map_err(|e| EngineError::Io(e.to_string()))?;
        }
        Ok(())
    }
}

#[async_trait]
impl CompilerEngine for ScriptedEngine {
    fn grammar(&self) -> &OptionGrammar {
        &self.grammar
    }

    async fn emit(&self, unit: CompilationUnit) -> Result<EmitReport, EngineError> {
        self.units.lock().unwrap().push(unit.clone());
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        if self.write_stub_artifacts && self.report.pre_emission.is_empty() {
            self.write_stubs(&unit)?;
        }
        Ok(self.report.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineDiagnostic;
    use crate::grammar::OptionMap;
    use std::path::PathBuf;

    fn unit() -> CompilationUnit {
        CompilationUnit {
            input_files: vec![PathBuf::from("index.ts")],
            options: OptionMap::new(),
        }
    }

    #[tokio::test]
    async fn test_records_every_unit() {
        let engine = ScriptedEngine::succeeding();
        engine.emit(unit()).await.unwrap();
        engine.emit(unit()).await.unwrap();
        assert_eq!(engine.emit_calls(), 2);
        assert_eq!(engine.units()[0].input_files, vec![PathBuf::from("index.ts")]);
    }

    #[tokio::test]
    async fn test_scripted_report_returned_unchanged() {
        let report = EmitReport {
            pre_emission: vec![EngineDiagnostic::new("error TS2322: type mismatch")],
            emission: vec![],
        };
        let engine = ScriptedEngine::scripted(report.clone());
        let got = engine.emit(unit()).await.unwrap();
        assert_eq!(got, report);
    }

    #[tokio::test]
    async fn test_failing_engine_returns_error() {
        let engine = ScriptedEngine::failing(EngineError::Spawn("no such binary".to_string()));
        let err = engine.emit(unit()).await.unwrap_err();
        assert!(matches!(err, EngineError::Spawn(_)));
        assert_eq!(engine.emit_calls(), 1);
    }

    #[tokio::test]
    async fn test_stub_artifacts_written_under_out_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("out");

        let engine = ScriptedEngine::succeeding().with_stub_artifacts();
        let mut options = OptionMap::new();
        options.insert(
            OUT_DIR_KEY.to_string(),
            OptionValue::Text(out_dir.to_string_lossy().into_owned()),
        );
        engine
            .emit(CompilationUnit {
                input_files: vec![PathBuf::from("widget.ts")],
                options,
            })
            .await
            .unwrap();

        assert!(out_dir.join("widget.js").exists());
    }
}
