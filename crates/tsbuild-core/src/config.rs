//! Config loader: read, parse, and validate a project configuration file.
//!
//! Produces a `NormalizedConfig` whose option set passed grammar
//! validation and whose input file list is fully resolved to absolute
//! paths. All relative paths in a config resolve against the directory
//! containing that config file, never the process working directory — the
//! same file may be invoked from different working directories by the
//! host pipeline.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tsbuild_engine::{OptionGrammar, OptionMap, OptionValue};

use crate::error::BuildError;

/// Source file extensions selected by the include walk.
const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts"];

/// Validated, fully-resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedConfig {
    /// Recognized compiler options, grammar-validated.
    pub options: OptionMap,

    /// Ordered absolute paths selected by the config's inclusion rules.
    pub input_files: Vec<PathBuf>,
}

/// Load and validate the config file at `config_path`.
pub fn load(config_path: &Path, grammar: &OptionGrammar) -> Result<NormalizedConfig, BuildError> {
    let mut visited = Vec::new();
    let resolved = resolve_chain(config_path, grammar, &mut visited)?;
    let input_files = select_inputs(&resolved, config_path)?;
    Ok(NormalizedConfig {
        options: resolved.options,
        input_files,
    })
}

/// One config file after interpretation, with its `extends` chain applied.
/// Path lists are absolute, resolved against the declaring file's directory.
#[derive(Debug)]
struct ResolvedConfig {
    options: OptionMap,
    files: Option<Vec<PathBuf>>,
    include: Option<Vec<PathBuf>>,
    exclude: Option<Vec<PathBuf>>,
    base_dir: PathBuf,
}

fn resolve_chain(
    config_path: &Path,
    grammar: &OptionGrammar,
    visited: &mut Vec<PathBuf>,
) -> Result<ResolvedConfig, BuildError> {
    let display = config_path.display().to_string();

    let text = std::fs::read_to_string(config_path).map_err(|e| BuildError::ConfigRead {
        path: display.clone(),
        reason: e.to_string(),
    })?;

    // The file exists now, so the cycle check can use its canonical identity.
    let identity = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    if visited.contains(&identity) {
        return Err(BuildError::ConfigValidation {
            path: display,
            reason: "circular `extends` chain".to_string(),
        });
    }
    visited.push(identity);

    let value: Value = serde_json::from_str(&text).map_err(|e| BuildError::ConfigRead {
        path: display.clone(),
        reason: e.to_string(),
    })?;

    let base_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .canonicalize()
        .map_err(|e| BuildError::ConfigRead {
            path: display.clone(),
            reason: e.to_string(),
        })?;

    let interpreted = interpret(&value, &display, grammar)?;

    let mut resolved = ResolvedConfig {
        options: interpreted.options,
        files: interpreted.files.map(|v| resolve_all(&base_dir, v)),
        include: interpreted.include.map(|v| resolve_all(&base_dir, v)),
        exclude: interpreted.exclude.map(|v| resolve_all(&base_dir, v)),
        base_dir: base_dir.clone(),
    };

    if let Some(parent_rel) = interpreted.extends {
        let parent_path = extended_path(&base_dir, &parent_rel);
        let parent = resolve_chain(&parent_path, grammar, visited)?;

        // Options merge per key, child wins; input-selection fields
        // replace wholesale when the child declares them.
        let mut options = parent.options;
        options.extend(std::mem::take(&mut resolved.options));
        resolved.options = options;
        resolved.files = resolved.files.or(parent.files);
        resolved.include = resolved.include.or(parent.include);
        resolved.exclude = resolved.exclude.or(parent.exclude);
    }

    Ok(resolved)
}

/// The raw fields of one config file, before path resolution.
struct Interpreted {
    extends: Option<String>,
    options: OptionMap,
    files: Option<Vec<String>>,
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
}

fn interpret(value: &Value, display: &str, grammar: &OptionGrammar) -> Result<Interpreted, BuildError> {
    let validation = |reason: String| BuildError::ConfigValidation {
        path: display.to_string(),
        reason,
    };

    let object = value
        .as_object()
        .ok_or_else(|| validation("root must be a JSON object".to_string()))?;

    let mut interpreted = Interpreted {
        extends: None,
        options: OptionMap::new(),
        files: None,
        include: None,
        exclude: None,
    };

    for (key, entry) in object {
        match key.as_str() {
            "extends" => {
                let target = entry
                    .as_str()
                    .ok_or_else(|| validation("`extends` must be a string".to_string()))?;
                interpreted.extends = Some(target.to_string());
            }
            "compilerOptions" => {
                let map = entry.as_object().ok_or_else(|| {
                    validation("`compilerOptions` must be an object".to_string())
                })?;
                for (name, raw) in map {
                    let option: OptionValue =
                        serde_json::from_value(raw.clone()).map_err(|_| {
                            validation(format!(
                                "compiler option '{name}' has an unsupported value shape"
                            ))
                        })?;
                    grammar
                        .validate(name, &option)
                        .map_err(|e| validation(e.to_string()))?;
                    interpreted.options.insert(name.clone(), option);
                }
            }
            "files" => interpreted.files = Some(string_list(entry, "files", &validation)?),
            "include" => interpreted.include = Some(string_list(entry, "include", &validation)?),
            "exclude" => interpreted.exclude = Some(string_list(entry, "exclude", &validation)?),
            other => {
                return Err(validation(format!("unsupported config key '{other}'")));
            }
        }
    }

    Ok(interpreted)
}

fn string_list(
    entry: &Value,
    field: &str,
    validation: &impl Fn(String) -> BuildError,
) -> Result<Vec<String>, BuildError> {
    let items = entry
        .as_array()
        .ok_or_else(|| validation(format!("`{field}` must be an array of strings")))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| validation(format!("`{field}` must be an array of strings")))
        })
        .collect()
}

fn resolve_all(base_dir: &Path, entries: Vec<String>) -> Vec<PathBuf> {
    entries.into_iter().map(|e| base_dir.join(e)).collect()
}

/// Resolve an `extends` target, trying a `.json` suffix when the bare
/// path does not exist.
fn extended_path(base_dir: &Path, target: &str) -> PathBuf {
    let direct = base_dir.join(target);
    if direct.exists() || target.ends_with(".json") {
        return direct;
    }
    let with_suffix = base_dir.join(format!("{target}.json"));
    if with_suffix.exists() {
        with_suffix
    } else {
        direct
    }
}

fn select_inputs(resolved: &ResolvedConfig, config_path: &Path) -> Result<Vec<PathBuf>, BuildError> {
    if let Some(files) = &resolved.files {
        // Explicit list: order preserved exactly as declared.
        return Ok(files.clone());
    }

    let roots = resolved
        .include
        .clone()
        .unwrap_or_else(|| vec![resolved.base_dir.clone()]);
    let excludes = resolved.exclude.clone().unwrap_or_default();

    let mut inputs = Vec::new();
    for root in roots {
        if root.is_file() {
            if is_source_file(&root) {
                inputs.push(root);
            }
            continue;
        }
        if !root.is_dir() {
            continue;
        }
        walk_sources(&root, &excludes, &mut inputs).map_err(|e| BuildError::ConfigRead {
            path: config_path.display().to_string(),
            reason: e.to_string(),
        })?;
    }

    inputs.sort();
    inputs.dedup();
    Ok(inputs)
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SOURCE_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

fn is_excluded(path: &Path, excludes: &[PathBuf]) -> bool {
    if path.components().any(|c| c.as_os_str() == "node_modules") {
        return true;
    }
    excludes.iter().any(|prefix| path.starts_with(prefix))
}

fn walk_sources(
    dir: &Path,
    excludes: &[PathBuf],
    out: &mut Vec<PathBuf>,
) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if is_excluded(&path, excludes) {
            continue;
        }
        if path.is_dir() {
            walk_sources(&path, excludes, out)?;
        } else if is_source_file(&path) {
            out.push(path);
        }
    }
    Ok(())
}
