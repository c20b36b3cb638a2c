use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// A named transformation from an argument (scalar, list or map) to a
/// fragment that is merged into the invoking node.
pub type Extension = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Extensions by name.
///
/// Cloning is cheap and shares the callables, so two compilers only share a
/// registry when one is explicitly handed a clone of the other's.
#[derive(Clone, Default)]
pub struct Registry {
    extensions: HashMap<String, Extension>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `extension` under `name`, returning the one it replaces.
    pub fn register<F>(&mut self, name: impl Into<String>, extension: F) -> Option<Extension>
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.extensions.insert(name.into(), Arc::new(extension))
    }

    /// `None` means the key is an ordinary property.
    pub fn get(&self, name: &str) -> Option<&Extension> {
        self.extensions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.extensions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.extensions.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Registry").field("extensions", &names).finish()
    }
}
