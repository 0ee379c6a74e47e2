//! Structured errors for linesub.
//!
//! Library consumers match on these variants; caller-supplied replacement
//! callables report failures through an opaque `anyhow::Error` so their
//! original error chains survive the trip back out of the engine.

use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to {} {}", .action, .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid pattern: {pattern}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("delimiter {0:?} is not allowed: quote characters cannot delimit sed commands")]
    InvalidDelimiter(char),

    #[error("replacement failed")]
    Replacement(#[source] anyhow::Error),
}

impl Error {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
