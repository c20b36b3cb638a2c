use serde_json::Value;
use tracing::debug;

use crate::ast::Stylesheet;
use crate::emitter;
use crate::error::{CompileError, Result};
use crate::optimizer;
use crate::options::CompileOptions;
use crate::registry::Registry;
use crate::resolver;
use crate::storage::Storage;
use crate::tree::Document;
use crate::walker;

/// One compiler instance: the document built by `add`, plus the extensions,
/// storage and default options it compiles with.
///
/// The document persists across compiles until [`Compiler::flush`].
#[derive(Debug, Default)]
pub struct Compiler {
    document: Document,
    registry: Registry,
    storage: Storage,
    options: CompileOptions,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CompileOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Start from an existing registry, shared with whoever cloned it.
    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    /// Merge a map (or a sequence of maps) into the document.
    pub fn add(&mut self, fragment: Value) -> Result<&mut Self> {
        self.document.merge(&fragment)?;
        Ok(self)
    }

    /// Append text that is emitted verbatim at this point of the root bucket.
    pub fn raw(&mut self, text: impl Into<String>) -> &mut Self {
        self.document.push_raw(text.into());
        self
    }

    pub fn plugin<F>(&mut self, name: impl Into<String>, extension: F) -> &mut Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.registry.register(name, extension);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn storage_set(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.storage.set(name, value);
        self
    }

    pub fn storage_set_many(&mut self, values: &Value) -> Result<&mut Self> {
        self.storage.set_many(values)?;
        Ok(self)
    }

    pub fn storage_get(&self, name: &str) -> Result<&Value> {
        self.storage.get(name)
    }

    pub fn mixin<F>(&mut self, name: impl Into<String>, mixin: F) -> &mut Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.storage.set_mixin(name, mixin);
        self
    }

    pub fn apply_mixin(&self, name: &str, args: &[Value]) -> Result<Value> {
        self.storage.apply(name, args)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut CompileOptions {
        &mut self.options
    }

    /// Forget everything added so far. Extensions and storage stay.
    pub fn flush(&mut self) -> &mut Self {
        self.document.clear();
        self
    }

    /// Rule tables for the current document, before grouping.
    pub fn rules(&self) -> Result<Stylesheet> {
        self.rules_with(&self.options)
    }

    pub fn rules_with(&self, options: &CompileOptions) -> Result<Stylesheet> {
        let resolved = resolver::resolve(&self.document, &self.registry)?;
        walker::build(&resolved, options)
    }

    pub fn compile(&self) -> Result<String> {
        self.compile_with(&self.options)
    }

    pub fn compile_with(&self, options: &CompileOptions) -> Result<String> {
        let sheet = self.rules_with(options)?;
        let optimized = optimizer::optimize_sheet(&sheet, options);
        let css = emitter::emit_css(&optimized, options.minify);
        debug!(
            bytes = css.len(),
            blocks = optimized.blocks.len(),
            minify = options.minify,
            "compiled stylesheet"
        );
        Ok(css)
    }

    /// The rule snapshot as JSON, keyed `mainstream` for the root bucket and by
    /// condition text for the others.
    pub fn to_json(&self) -> Result<Value> {
        let sheet = self.rules()?;
        serde_json::to_value(&sheet).map_err(|source| CompileError::Encode { source })
    }
}
