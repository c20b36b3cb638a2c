use std::fmt;
use std::path::PathBuf;

/// Location of a key inside the authored tree, outermost key first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyPath {
    keys: Vec<String>,
}

impl From<Vec<String>> for KeyPath {
    fn from(keys: Vec<String>) -> Self {
        Self { keys }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.keys.is_empty() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.keys.join(" > "))
        }
    }
}

/// Every way a compile pass (or its input loading) can fail.
///
/// A failed pass never yields partial stylesheet text.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("malformed key '{key}' at {path}: {reason}")]
    MalformedKey {
        key: String,
        path: KeyPath,
        reason: String,
    },

    #[error("extension '{name}' is still expanding at depth {depth}; it probably invokes itself")]
    CyclicExtension { name: String, depth: usize },

    #[error("invalid fragment: {reason}")]
    InvalidFragment { reason: String },

    #[error("invalid compile options: {source}")]
    InvalidOptions {
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown storage entry '{name}'")]
    UnknownStorage { name: String },

    #[error("failed to encode the rule snapshot: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("recursive import detected: {}", .path.display())]
    RecursiveImport { path: PathBuf },
}

pub type Result<T, E = CompileError> = std::result::Result<T, E>;
