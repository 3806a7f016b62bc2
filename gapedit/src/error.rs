use crate::pool::BufferHandle;
use gapedit_text::TextError;
use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoolError {
    /// The handle is null, stale, or points past the pool.
    #[error("invalid buffer handle {0}")]
    InvalidHandle(BufferHandle),

    #[error(transparent)]
    Text(#[from] TextError),

    #[error("could not open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T, E = PoolError> = std::result::Result<T, E>;
