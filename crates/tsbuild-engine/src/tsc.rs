//! Subprocess-backed engine driving an external `tsc` binary.
//!
//! Runs two passes per compilation unit: an analysis pass (`--noEmit`)
//! whose output becomes the pre-emission diagnostics, then an emit pass
//! whose output becomes the emission diagnostics. The emit pass is skipped
//! when analysis already failed, since `tsc` would repeat the same errors.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::engine::{CompilationUnit, CompilerEngine, EmitReport, EngineDiagnostic, EngineError};
use crate::grammar::{OptionGrammar, OptionValue};

/// Compiler engine that shells out to a TypeScript compiler binary.
#[derive(Debug)]
pub struct TscEngine {
    binary: String,
    timeout_secs: u64,
    grammar: OptionGrammar,
}

impl TscEngine {
    /// Engine driving the given binary with no timeout.
    pub fn new(binary: impl Into<String>) -> Self {
        TscEngine {
            binary: binary.into(),
            timeout_secs: 0,
            grammar: OptionGrammar::typescript(),
        }
    }

    /// Set a per-pass timeout in seconds (0 disables the timeout).
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Build the command-line arguments for one pass.
    fn pass_args(unit: &CompilationUnit, no_emit: bool) -> Vec<String> {
        // --pretty false keeps output in the plain `file(line,col): error ...`
        // form, with elaboration on indented continuation lines.
        let mut args = vec!["--pretty".to_string(), "false".to_string()];
        if no_emit {
            args.push("--noEmit".to_string());
        }
        for (key, value) in &unit.options {
            // The analysis pass never writes artifacts; output-shaping
            // options would be rejected alongside --noEmit.
            if no_emit && key == crate::grammar::OUT_DIR_KEY {
                continue;
            }
            args.push(format!("--{key}"));
            match value {
                OptionValue::Bool(b) => args.push(b.to_string()),
                OptionValue::Number(n) => args.push(format_number(*n)),
                OptionValue::Text(s) => args.push(s.clone()),
                OptionValue::TextList(items) => args.push(items.join(",")),
            }
        }
        for file in &unit.input_files {
            args.push(file.to_string_lossy().into_owned());
        }
        args
    }

    /// Run one pass and return its diagnostics.
    ///
    /// A zero exit status means a clean pass regardless of output; a
    /// non-zero status with no parseable diagnostics is reported as a
    /// single synthesized diagnostic so the failure is never swallowed.
    async fn run_pass(&self, args: &[String]) -> Result<Vec<EngineDiagnostic>, EngineError> {
        debug!(binary = %self.binary, ?args, "running compiler pass");

        let child = Command::new(&self.binary)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| EngineError::Spawn(e.to_string()))?;

        let output = if self.timeout_secs > 0 {
            tokio::time::timeout(
                std::time::Duration::from_secs(self.timeout_secs),
                child.wait_with_output(),
            )
            .await
            .map_err(|_| EngineError::Timeout {
                secs: self.timeout_secs,
            })?
            .map_err(|e| EngineError::Io(e.to_string()))?
        } else {
            child
                .wait_with_output()
                .await
                .map_err(|e| EngineError::Io(e.to_string()))?
        };

        if output.status.success() {
            return Ok(Vec::new());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let mut diagnostics = parse_diagnostics(&stdout);
        if diagnostics.is_empty() {
            diagnostics = parse_diagnostics(&stderr);
        }
        if diagnostics.is_empty() {
            let code = output.status.code().unwrap_or(-1);
            diagnostics.push(EngineDiagnostic::new(format!(
                "compiler exited with status {code} and no diagnostics"
            )));
        }
        Ok(diagnostics)
    }
}

/// Parse plain-form compiler output into diagnostics.
///
/// Non-indented lines start a new diagnostic; indented lines are
/// elaboration belonging to the previous one.
fn parse_diagnostics(output: &str) -> Vec<EngineDiagnostic> {
    let mut diagnostics: Vec<EngineDiagnostic> = Vec::new();
    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let continuation = line.starts_with(' ') || line.starts_with('\t');
        match diagnostics.last_mut() {
            Some(last) if continuation => last.parts.push(line.trim_end().to_string()),
            _ => diagnostics.push(EngineDiagnostic::new(line.trim_end())),
        }
    }
    diagnostics
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[async_trait]
impl CompilerEngine for TscEngine {
    fn grammar(&self) -> &OptionGrammar {
        &self.grammar
    }

    async fn emit(&self, unit: CompilationUnit) -> Result<EmitReport, EngineError> {
        let pre_emission = self.run_pass(&Self::pass_args(&unit, true)).await?;
        let emission = if pre_emission.is_empty() {
            self.run_pass(&Self::pass_args(&unit, false)).await?
        } else {
            Vec::new()
        };
        Ok(EmitReport {
            pre_emission,
            emission,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::OptionMap;
    use std::path::PathBuf;

    fn unit_with(options: OptionMap) -> CompilationUnit {
        CompilationUnit {
            input_files: vec![PathBuf::from("src/index.ts")],
            options,
        }
    }

    #[test]
    fn test_pass_args_include_options_and_files() {
        let mut options = OptionMap::new();
        options.insert("strict".to_string(), OptionValue::Bool(true));
        options.insert(
            "target".to_string(),
            OptionValue::Text("es2020".to_string()),
        );
        options.insert(
            "lib".to_string(),
            OptionValue::TextList(vec!["es2020".to_string(), "dom".to_string()]),
        );

        let args = TscEngine::pass_args(&unit_with(options), false);
        let joined = args.join(" ");
        assert!(joined.contains("--strict true"));
        assert!(joined.contains("--target es2020"));
        assert!(joined.contains("--lib es2020,dom"));
        assert!(joined.ends_with("src/index.ts"));
    }

    #[test]
    fn test_analysis_pass_drops_out_dir() {
        let mut options = OptionMap::new();
        options.insert(
            crate::grammar::OUT_DIR_KEY.to_string(),
            OptionValue::Text("./out".to_string()),
        );

        let analysis = TscEngine::pass_args(&unit_with(options.clone()), true);
        assert!(analysis.contains(&"--noEmit".to_string()));
        assert!(!analysis.iter().any(|a| a == "--outDir"));

        let emit = TscEngine::pass_args(&unit_with(options), false);
        assert!(emit.iter().any(|a| a == "--outDir"));
        assert!(!emit.contains(&"--noEmit".to_string()));
    }

    #[test]
    fn test_parse_diagnostics_folds_continuation_lines() {
        let output = "\
index.ts(3,5): error TS2322: Type 'string' is not assignable to type 'number'.
  The expected type comes from property 'count'.
util.ts(1,1): error TS2304: Cannot find name 'fromble'.
";
        let diags = parse_diagnostics(output);
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].parts.len(), 2);
        assert!(diags[0].flatten().contains("property 'count'"));
        assert_eq!(diags[1].parts.len(), 1);
    }

    #[test]
    fn test_parse_diagnostics_skips_blank_lines() {
        let diags = parse_diagnostics("\n\na.ts(1,1): error TS1005: ';' expected.\n\n");
        assert_eq!(diags.len(), 1);
    }

    #[tokio::test]
    async fn test_clean_exit_yields_clean_report() {
        // Any binary that exits zero stands in for a successful compile.
        let engine = TscEngine::new("true");
        let report = engine
            .emit(unit_with(OptionMap::new()))
            .await
            .expect("emit failed");
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn test_silent_failure_is_synthesized() {
        let engine = TscEngine::new("false");
        let report = engine
            .emit(unit_with(OptionMap::new()))
            .await
            .expect("emit failed");
        assert_eq!(report.pre_emission.len(), 1);
        assert!(report.pre_emission[0]
            .flatten()
            .contains("compiler exited with status"));
        assert!(report.emission.is_empty());
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let engine = TscEngine::new("/nonexistent-compiler-binary");
        let err = engine.emit(unit_with(OptionMap::new())).await.unwrap_err();
        assert!(matches!(err, EngineError::Spawn(_)));
    }
}
