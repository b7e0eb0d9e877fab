use thiserror::Error;

/// Errors that can occur while loading or dereferencing a document.
#[derive(Error, Debug)]
pub enum DerefError {
    #[error("file error: {message} (path: {path})")]
    File { message: String, path: String },

    #[error("parse error: {message} (path: {path})")]
    Parse { message: String, path: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("traversal error: {message} (at: {path})")]
    Traversal { message: String, path: String },

    /// Non-fatal: the document was fully traversed and every offending
    /// pointer node was left in place.
    #[error("{count} circular reference(s) detected")]
    CircularReferences { count: usize, paths: Vec<String> },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DerefError {
    /// Returns `true` for the circular-reference report.
    pub fn is_circular(&self) -> bool {
        matches!(self, DerefError::CircularReferences { .. })
    }

    /// Number of rejected substitutions, or zero for any other error.
    pub fn circular_count(&self) -> usize {
        match self {
            DerefError::CircularReferences { count, .. } => *count,
            _ => 0,
        }
    }
}

/// Convenience alias for results using `DerefError`.
pub type Result<T> = std::result::Result<T, DerefError>;
