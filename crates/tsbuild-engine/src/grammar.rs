//! Compiler option grammar: the closed set of recognized option keys,
//! their expected value kinds, and allowed values for enumerated options.
//!
//! Both the config loader and the override merger validate against this
//! table, so a misspelled option fails loud instead of being silently
//! dropped.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// The option key that designates the output directory for emitted artifacts.
pub const OUT_DIR_KEY: &str = "outDir";

/// A scalar compiler option value as it appears in config JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Number(f64),
    Text(String),
    TextList(Vec<String>),
}

impl OptionValue {
    /// Name of this value's kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            OptionValue::Bool(_) => "boolean",
            OptionValue::Number(_) => "number",
            OptionValue::Text(_) => "string",
            OptionValue::TextList(_) => "string list",
        }
    }

    /// The text payload, if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Flat option mapping with deterministic iteration order.
pub type OptionMap = BTreeMap<String, OptionValue>;

/// Errors produced when an option fails grammar validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("unrecognized compiler option '{key}'")]
    UnknownKey { key: String },

    #[error("compiler option '{key}' expects a {expected} value, got {found}")]
    WrongKind {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("compiler option '{key}' does not accept '{value}' (allowed: {allowed})")]
    UnknownValue {
        key: String,
        value: String,
        allowed: String,
    },
}

/// Expected shape of one recognized option.
#[derive(Debug, Clone, Copy)]
enum Shape {
    Bool,
    Number,
    Text,
    TextList,
    /// Case-insensitive choice from a fixed set of symbolic constants.
    Enumerated(&'static [&'static str]),
}

impl Shape {
    fn expected_name(&self) -> &'static str {
        match self {
            Shape::Bool => "boolean",
            Shape::Number => "number",
            Shape::Text | Shape::Enumerated(_) => "string",
            Shape::TextList => "string list",
        }
    }
}

const TARGETS: &[&str] = &[
    "es5", "es6", "es2015", "es2016", "es2017", "es2018", "es2019", "es2020", "es2021", "es2022",
    "esnext",
];

const MODULES: &[&str] = &[
    "commonjs", "amd", "umd", "system", "es6", "es2015", "es2020", "es2022", "esnext", "node16",
    "nodenext",
];

const MODULE_RESOLUTIONS: &[&str] = &["classic", "node", "node16", "nodenext", "bundler"];

const JSX_MODES: &[&str] = &["preserve", "react", "react-jsx", "react-jsxdev", "react-native"];

/// Closed table of recognized compiler options.
#[derive(Debug, Clone)]
pub struct OptionGrammar {
    entries: BTreeMap<&'static str, Shape>,
}

impl OptionGrammar {
    /// The grammar understood by the TypeScript compiler surface this
    /// build step drives.
    pub fn typescript() -> Self {
        let mut entries = BTreeMap::new();
        for key in [
            "allowJs",
            "checkJs",
            "composite",
            "declaration",
            "declarationMap",
            "esModuleInterop",
            "experimentalDecorators",
            "forceConsistentCasingInFileNames",
            "isolatedModules",
            "noEmitOnError",
            "noFallthroughCasesInSwitch",
            "noImplicitAny",
            "noImplicitReturns",
            "noUnusedLocals",
            "noUnusedParameters",
            "removeComments",
            "resolveJsonModule",
            "skipLibCheck",
            "sourceMap",
            "strict",
            "strictNullChecks",
        ] {
            entries.insert(key, Shape::Bool);
        }
        entries.insert("maxNodeModuleJsDepth", Shape::Number);
        entries.insert(OUT_DIR_KEY, Shape::Text);
        entries.insert("rootDir", Shape::Text);
        entries.insert("baseUrl", Shape::Text);
        entries.insert("target", Shape::Enumerated(TARGETS));
        entries.insert("module", Shape::Enumerated(MODULES));
        entries.insert("moduleResolution", Shape::Enumerated(MODULE_RESOLUTIONS));
        entries.insert("jsx", Shape::Enumerated(JSX_MODES));
        entries.insert("lib", Shape::TextList);
        entries.insert("types", Shape::TextList);
        OptionGrammar { entries }
    }

    /// Whether `key` is a recognized option name.
    pub fn recognizes(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Validate one key/value pair against the table.
    pub fn validate(&self, key: &str, value: &OptionValue) -> Result<(), OptionError> {
        let shape = self
            .entries
            .get(key)
            .ok_or_else(|| OptionError::UnknownKey {
                key: key.to_string(),
            })?;

        match (shape, value) {
            (Shape::Bool, OptionValue::Bool(_)) => Ok(()),
            (Shape::Number, OptionValue::Number(_)) => Ok(()),
            (Shape::Text, OptionValue::Text(_)) => Ok(()),
            (Shape::TextList, OptionValue::TextList(_)) => Ok(()),
            (Shape::Enumerated(allowed), OptionValue::Text(s)) => {
                if allowed.iter().any(|a| a.eq_ignore_ascii_case(s)) {
                    Ok(())
                } else {
                    Err(OptionError::UnknownValue {
                        key: key.to_string(),
                        value: s.clone(),
                        allowed: allowed.join(", "),
                    })
                }
            }
            _ => Err(OptionError::WrongKind {
                key: key.to_string(),
                expected: shape.expected_name(),
                found: value.kind_name(),
            }),
        }
    }

    /// Validate every entry in a mapping, failing on the first offender.
    pub fn validate_all(&self, options: &OptionMap) -> Result<(), OptionError> {
        for (key, value) in options {
            self.validate(key, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognizes_known_keys() {
        let grammar = OptionGrammar::typescript();
        assert!(grammar.recognizes("strict"));
        assert!(grammar.recognizes(OUT_DIR_KEY));
        assert!(!grammar.recognizes("stricct"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let grammar = OptionGrammar::typescript();
        let err = grammar
            .validate("noImplicitAnyy", &OptionValue::Bool(true))
            .unwrap_err();
        assert!(matches!(err, OptionError::UnknownKey { .. }));
        assert!(err.to_string().contains("noImplicitAnyy"));
    }

    #[test]
    fn test_wrong_kind_rejected() {
        let grammar = OptionGrammar::typescript();
        let err = grammar
            .validate("strict", &OptionValue::Text("yes".to_string()))
            .unwrap_err();
        assert!(matches!(err, OptionError::WrongKind { .. }));
    }

    #[test]
    fn test_enumerated_value_case_insensitive() {
        let grammar = OptionGrammar::typescript();
        assert!(grammar
            .validate("target", &OptionValue::Text("ES2020".to_string()))
            .is_ok());
        let err = grammar
            .validate("target", &OptionValue::Text("es9000".to_string()))
            .unwrap_err();
        assert!(matches!(err, OptionError::UnknownValue { .. }));
    }

    #[test]
    fn test_text_list_shape() {
        let grammar = OptionGrammar::typescript();
        assert!(grammar
            .validate(
                "lib",
                &OptionValue::TextList(vec!["es2020".to_string(), "dom".to_string()])
            )
            .is_ok());
        assert!(grammar
            .validate("lib", &OptionValue::Text("es2020".to_string()))
            .is_err());
    }

    #[test]
    fn test_validate_all_stops_on_first_offender() {
        let grammar = OptionGrammar::typescript();
        let mut options = OptionMap::new();
        options.insert("strict".to_string(), OptionValue::Bool(true));
        options.insert("unknownFlag".to_string(), OptionValue::Bool(false));
        assert!(grammar.validate_all(&options).is_err());
    }

    #[test]
    fn test_option_value_from_json() {
        let v: OptionValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, OptionValue::Bool(true));
        let v: OptionValue = serde_json::from_str("\"es2020\"").unwrap();
        assert_eq!(v, OptionValue::Text("es2020".to_string()));
        let v: OptionValue = serde_json::from_str("[\"dom\"]").unwrap();
        assert_eq!(v, OptionValue::TextList(vec!["dom".to_string()]));
        let v: OptionValue = serde_json::from_str("2").unwrap();
        assert_eq!(v, OptionValue::Number(2.0));
    }
}
