use std::io;

use thiserror::Error;

/// Errors returned by session operations.
///
/// Decode failures are not part of this type: they are recovered from
/// inside the session and only show up in logs and [`Stats`](crate::Stats).
#[derive(Debug, Error)]
pub enum Error {
    #[error("madstream: staging capacity must be greater than 0")]
    ZeroStagingCapacity,

    #[error("madstream: batch capacity must be greater than 0")]
    ZeroBatchCapacity,

    #[error("madstream: session is not active")]
    Inactive,

    #[error("madstream: no input source registered")]
    NoSource,

    #[error("madstream: io error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
