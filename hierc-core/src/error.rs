use std::path::PathBuf;

use thiserror::Error;

/// Every way a hierarchy build can fail.
///
/// None of these are recoverable: the first one encountered stops the
/// build and is reported to the caller as-is.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("'{path}' doesn't start with '{root}'")]
    MalformedPath { path: PathBuf, root: PathBuf },
    #[error("parser error for {source_class}: {message}")]
    Parse {
        source_class: String,
        message: String,
    },
    #[error("file for source class {0} already registered")]
    DuplicateFile(String),
    #[error("class '{0}' already registered")]
    DuplicateClass(String),
    #[error("parent class '{parent}' of '{class}' not defined")]
    UnresolvedParent { parent: String, class: String },
    #[error("class '{0}' is part of an inheritance cycle")]
    InheritanceCycle(String),
    #[error("tree '{0}' already added")]
    DuplicateTree(String),
    #[error("attempt to inherit from final class '{parent}' by '{child}'")]
    FinalInheritance { parent: String, child: String },
    #[error("exceeded max size of memory arena: requested {requested} bytes of {capacity}")]
    ArenaExhausted { requested: usize, capacity: usize },
    #[error("no source file registered for source class {0}")]
    MissingSourceFile(String),
}

impl CoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Io {
            path: path.into(),
            source,
        }
    }
}
