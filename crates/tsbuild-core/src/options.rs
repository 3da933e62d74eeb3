//! Option merging with fixed three-tier precedence:
//! file config < caller overrides < explicit output-location override.

use tsbuild_engine::{OptionGrammar, OptionMap, OptionValue, OUT_DIR_KEY};

use crate::error::BuildError;

/// Validate caller-supplied overrides against the engine's option grammar.
///
/// Runs before any compilation attempt, so a misspelled override never
/// reaches the engine.
pub fn validate_overrides(
    overrides: &OptionMap,
    grammar: &OptionGrammar,
) -> Result<(), BuildError> {
    grammar
        .validate_all(overrides)
        .map_err(BuildError::InvalidOverride)
}

/// Merge the base option set with overrides, then apply the output
/// location last and unconditionally.
///
/// Pure function: on key collision the override wins; no deep merging,
/// since option values are scalar or enumerated.
pub fn merge(
    base: &OptionMap,
    overrides: &OptionMap,
    output_location: Option<&str>,
) -> OptionMap {
    let mut merged = base.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    if let Some(out_dir) = output_location {
        merged.insert(
            OUT_DIR_KEY.to_string(),
            OptionValue::Text(out_dir.to_string()),
        );
    }
    merged
}
