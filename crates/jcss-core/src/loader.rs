use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::{CompileError, Result};

/// Top-level key naming further documents to load first.
pub const IMPORT_KEY: &str = "@import";

/// Load a JSON style document and everything it imports.
///
/// Documents come back in the order they should be added: imports before the
/// file that names them, and each file only once.
pub fn load_with_imports(path: &Path) -> Result<Vec<Value>> {
    let mut visited = HashSet::new();
    let mut stack = HashSet::new();
    let mut documents = Vec::new();
    load_recursive(path, &mut visited, &mut stack, &mut documents)?;
    Ok(documents)
}

fn load_recursive(
    path: &Path,
    visited: &mut HashSet<PathBuf>,
    stack: &mut HashSet<PathBuf>,
    documents: &mut Vec<Value>,
) -> Result<()> {
    let canonical = path.canonicalize().map_err(|source| CompileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if stack.contains(&canonical) {
        return Err(CompileError::RecursiveImport { path: canonical });
    }
    if visited.contains(&canonical) {
        return Ok(());
    }

    stack.insert(canonical.clone());

    let mut document = read_json(&canonical)?;
    let base = canonical.parent().unwrap_or_else(|| Path::new("."));
    for target in take_imports(&mut document) {
        debug!(from = %canonical.display(), import = target.as_str(), "importing");
        load_recursive(&base.join(target), visited, stack, documents)?;
    }
    documents.push(document);

    stack.remove(&canonical);
    visited.insert(canonical);
    Ok(())
}

/// Remove the import key from a top-level map and return its targets.
fn take_imports(document: &mut Value) -> Vec<String> {
    let Some(map) = document.as_object_mut() else {
        return Vec::new();
    };
    match map.shift_remove(IMPORT_KEY) {
        Some(Value::String(target)) => vec![target],
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(target) => Some(target),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

pub(crate) fn read_json(path: &Path) -> Result<Value> {
    let data = fs::read_to_string(path).map_err(|source| CompileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| CompileError::Json {
        path: path.to_path_buf(),
        source,
    })
}
