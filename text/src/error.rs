//! Errors surfaced by buffer operations.
//!
//! Only failures the caller can act on are represented here. Contract violations
//! (offsets outside the buffer, overlapping transpose ranges) are assertions instead.

use std::{collections::TryReserveError, io, path::PathBuf};
use thiserror::Error;

/// Errors returned by [`crate::TextBuffer`] and the stores it is built on.
#[derive(Debug, Error)]
pub enum TextError {
    /// Growing the backing array, the edit log or the edit text failed.
    ///
    /// The operation that triggered the growth was abandoned and the buffer is
    /// unchanged.
    #[error("out of memory while reserving {requested} bytes")]
    OutOfMemory {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("buffer has no file associated with it")]
    NoFilePath,
}

impl TextError {
    pub(crate) fn out_of_memory(requested: usize, source: TryReserveError) -> Self {
        tracing::error!(requested, "allocation failed");
        Self::OutOfMemory { requested, source }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = TextError> = std::result::Result<T, E>;
