use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{CompileError, Result};
use crate::loader;

/// A named fragment factory. The result is ordinary input for `add`.
pub type Mixin = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// Named values and mixins an author looks up explicitly.
///
/// Unlike extension keys, a lookup of an unknown name is an error.
#[derive(Clone, Default)]
pub struct Storage {
    values: HashMap<String, Value>,
    mixins: HashMap<String, Mixin>,
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load named values from a JSON file holding a single map.
    pub fn load(path: &Path) -> Result<Self> {
        let value = loader::read_json(path)?;
        let mut storage = Self::new();
        storage.set_many(&value)?;
        debug!(path = %path.display(), values = storage.values.len(), "loaded storage");
        Ok(storage)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(name.into(), value)
    }

    /// Store every entry of a map.
    pub fn set_many(&mut self, values: &Value) -> Result<()> {
        let Value::Object(map) = values else {
            return Err(CompileError::InvalidFragment {
                reason: "storage entries must be given as a map".to_string(),
            });
        };
        for (name, value) in map {
            self.values.insert(name.clone(), value.clone());
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Value> {
        self.values
            .get(name)
            .ok_or_else(|| CompileError::UnknownStorage {
                name: name.to_string(),
            })
    }

    pub fn set_mixin<F>(&mut self, name: impl Into<String>, mixin: F)
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.mixins.insert(name.into(), Arc::new(mixin));
    }

    /// Evaluate the mixin `name` with `args`.
    pub fn apply(&self, name: &str, args: &[Value]) -> Result<Value> {
        let mixin = self
            .mixins
            .get(name)
            .ok_or_else(|| CompileError::UnknownStorage {
                name: name.to_string(),
            })?;
        Ok(mixin(args))
    }

    /// Replace every string value of the form `$name` with the stored value.
    pub fn substitute(&self, value: &Value) -> Result<Value> {
        match value {
            Value::String(text) => match reference_name(text) {
                Some(name) => self.get(name).cloned(),
                None => Ok(value.clone()),
            },
            Value::Array(items) => items
                .iter()
                .map(|item| self.substitute(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (key, item) in map {
                    out.insert(key.clone(), self.substitute(item)?);
                }
                Ok(Value::Object(out))
            }
            other => Ok(other.clone()),
        }
    }
}

fn reference_name(text: &str) -> Option<&str> {
    let name = text.strip_prefix('$')?;
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then_some(name)
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut mixins: Vec<&str> = self.mixins.keys().map(String::as_str).collect();
        mixins.sort_unstable();
        f.debug_struct("Storage")
            .field("values", &self.values)
            .field("mixins", &mixins)
            .finish()
    }
}
