//! Per-invocation build request supplied by the host framework.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tsbuild_engine::{OptionMap, OptionValue};

/// Caller-supplied intent for one invocation. Read-only to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildRequest {
    /// Path to the project configuration file.
    #[serde(default = "default_config_path")]
    pub config_path: PathBuf,

    /// Explicit input file list. When present it fully replaces the
    /// configuration's file selection; it never appends to it.
    #[serde(default)]
    pub input_files: Option<Vec<PathBuf>>,

    /// Output-location override, applied last over any configured outDir.
    #[serde(default)]
    pub output_location: Option<String>,

    /// Compiler option overrides, validated against the engine grammar.
    #[serde(default)]
    pub option_overrides: OptionMap,
}

fn default_config_path() -> PathBuf {
    PathBuf::from("tsconfig.json")
}

impl Default for BuildRequest {
    fn default() -> Self {
        BuildRequest {
            config_path: default_config_path(),
            input_files: None,
            output_location: None,
            option_overrides: OptionMap::new(),
        }
    }
}

impl BuildRequest {
    /// Request for the given config file with no overrides.
    pub fn for_config(config_path: impl Into<PathBuf>) -> Self {
        BuildRequest {
            config_path: config_path.into(),
            ..Default::default()
        }
    }

    pub fn with_output_location(mut self, output_location: impl Into<String>) -> Self {
        self.output_location = Some(output_location.into());
        self
    }

    pub fn with_input_files(mut self, input_files: Vec<PathBuf>) -> Self {
        self.input_files = Some(input_files);
        self
    }

    pub fn with_override(mut self, key: impl Into<String>, value: OptionValue) -> Self {
        self.option_overrides.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path() {
        let request = BuildRequest::default();
        assert_eq!(request.config_path, PathBuf::from("tsconfig.json"));
        assert!(request.input_files.is_none());
        assert!(request.option_overrides.is_empty());
    }

    #[test]
    fn test_builder_helpers() {
        let request = BuildRequest::for_config("project/tsconfig.json")
            .with_output_location("./out")
            .with_override("strict", OptionValue::Bool(true));
        assert_eq!(request.output_location.as_deref(), Some("./out"));
        assert_eq!(
            request.option_overrides.get("strict"),
            Some(&OptionValue::Bool(true))
        );
    }

    #[test]
    fn test_deserializes_with_defaults() {
        let request: BuildRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.config_path, PathBuf::from("tsconfig.json"));

        let request: BuildRequest = serde_json::from_str(
            r#"{ "config_path": "app/tsconfig.json", "output_location": "./dist" }"#,
        )
        .unwrap();
        assert_eq!(request.config_path, PathBuf::from("app/tsconfig.json"));
        assert_eq!(request.output_location.as_deref(), Some("./dist"));
    }
}
