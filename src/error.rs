//! Error types shared by the loader, the decomposition engines and the writers

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the analyzer can surface to its caller
#[derive(Debug, Error)]
pub enum Error {
    /// Unreadable source or unwritable destination
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed edge-list line (1-based line number)
    #[error("parse error at line {line}: {message}")]
    Parse { line: u64, message: String },

    /// Rejected configuration, reported before any I/O happens
    #[error("configuration error: {0}")]
    Config(String),

    /// Arguments that do not fit the graph they are applied to
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Adjacency structure that breaks the undirected-graph invariants
    #[error("invalid graph: {0}")]
    InvalidGraph(String),
}

impl Error {
    /// Returns a closure that wraps an `io::Error` with the path it happened on
    pub(crate) fn io_at(path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
        move |source| Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn parse(line: u64, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}
