use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{CompileError, Result};
use crate::loader;

/// Per-compile switches.
///
/// Field names follow the camelCase spelling used in configuration files:
///
/// ```json
/// {"minify": true, "combineSelectors": false, "preventCombining": ["border"]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileOptions {
    /// Compact output without line breaks or indentation.
    pub minify: bool,
    /// Emit property names exactly as authored.
    pub keep_camel_case: bool,
    /// Merge selectors whose declarations are identical.
    pub combine_selectors: bool,
    /// Properties that are never shared between selectors.
    pub prevent_combining: Vec<String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            minify: false,
            keep_camel_case: false,
            combine_selectors: true,
            prevent_combining: Vec::new(),
        }
    }
}

impl CompileOptions {
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(|source| CompileError::InvalidOptions { source })
    }

    /// Read options from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let value = loader::read_json(path)?;
        Self::from_value(&value)
    }

    pub fn minified(mut self) -> Self {
        self.minify = true;
        self
    }

    /// Whether `property` must stay with its own selector.
    pub fn prevents(&self, property: &str) -> bool {
        self.prevent_combining.iter().any(|name| name == property)
    }
}
