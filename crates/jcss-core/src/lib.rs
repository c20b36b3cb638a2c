pub mod ast;
pub mod compiler;
pub mod emitter;
pub mod error;
pub mod loader;
pub mod optimizer;
pub mod options;
pub mod registry;
pub mod resolver;
pub mod selector;
pub mod storage;
pub mod tree;
pub mod walker;

pub use compiler::Compiler;
pub use error::{CompileError, KeyPath, Result};
pub use options::CompileOptions;
pub use registry::Registry;
pub use storage::Storage;
