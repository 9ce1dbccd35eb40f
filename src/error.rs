//! Errors produced by pipes.

use std::{error::Error, io, sync::Arc};

/// Error returned by pipe operations.
///
/// Errors attached with `close_with_error` are delivered verbatim to the
/// opposite end as [`PipeError::Custom`], sharing the same allocation.
#[derive(Clone, Debug, thiserror::Error)]
pub enum PipeError {
    /// The pipe is no longer accepting operations on this side.
    #[error("read/write on closed pipe")]
    Closed,

    /// No more data will ever arrive.
    #[error("end of stream")]
    EndOfStream,

    /// A sink accepted fewer bytes than it was given, without reporting a failure.
    #[error("short write")]
    ShortWrite,

    /// An error supplied by the other end of the pipe.
    #[error(transparent)]
    Custom(Arc<dyn Error + Send + Sync>),
}

impl PipeError {
    /// Wrap an arbitrary error so it can be delivered across the pipe.
    pub fn custom<E>(error: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        let boxed: Box<dyn Error + Send + Sync> = error.into();
        Self::Custom(Arc::from(boxed))
    }

    /// Returns `true` if this is [`PipeError::Closed`].
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns `true` if this is [`PipeError::EndOfStream`].
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }

    /// The `std::io` kind this error maps to.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::Closed => io::ErrorKind::BrokenPipe,
            Self::EndOfStream => io::ErrorKind::UnexpectedEof,
            Self::ShortWrite => io::ErrorKind::WriteZero,
            Self::Custom(_) => io::ErrorKind::Other,
        }
    }
}

impl From<PipeError> for io::Error {
    fn from(e: PipeError) -> Self {
        Self::new(e.kind(), e)
    }
}

impl From<io::Error> for PipeError {
    fn from(e: io::Error) -> Self {
        match e.get_ref().and_then(|inner| inner.downcast_ref::<PipeError>()) {
            Some(pipe_error) => pipe_error.clone(),
            None => Self::custom(e),
        }
    }
}

/// Error returned by a write that stopped before consuming all of its input.
///
/// Carries the number of bytes that were accepted into the pipe before the
/// failure, so callers can tell how far the write got.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{error} (after writing {written} bytes)")]
pub struct WriteError {
    written: usize,
    #[source]
    error: PipeError,
}

impl WriteError {
    /// Create an error for a write that accepted `written` bytes before failing.
    pub fn new(written: usize, error: PipeError) -> Self {
        Self { written, error }
    }

    /// Number of bytes accepted before the failure.
    pub fn written(&self) -> usize {
        self.written
    }

    /// The failure that stopped the write.
    pub fn error(&self) -> &PipeError {
        &self.error
    }

    /// Return the underlying [`PipeError`].
    pub fn into_error(self) -> PipeError {
        self.error
    }
}

impl From<WriteError> for PipeError {
    fn from(e: WriteError) -> Self {
        e.error
    }
}

impl From<WriteError> for io::Error {
    fn from(e: WriteError) -> Self {
        e.error.into()
    }
}

/// Error returned by a bulk transfer that stopped before reaching the end of its source.
///
/// Carries the number of bytes that were delivered before the failure, including any bytes a
/// failing write had already accepted.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{error} (after transferring {transferred} bytes)")]
pub struct TransferError {
    transferred: u64,
    #[source]
    error: PipeError,
}

impl TransferError {
    pub(crate) fn new(transferred: u64, error: PipeError) -> Self {
        Self { transferred, error }
    }

    /// Number of bytes delivered before the failure.
    pub fn transferred(&self) -> u64 {
        self.transferred
    }

    /// The failure that stopped the transfer.
    pub fn error(&self) -> &PipeError {
        &self.error
    }

    /// Return the underlying [`PipeError`].
    pub fn into_error(self) -> PipeError {
        self.error
    }
}

impl From<TransferError> for PipeError {
    fn from(e: TransferError) -> Self {
        e.error
    }
}

impl From<TransferError> for io::Error {
    fn from(e: TransferError) -> Self {
        e.error.into()
    }
}
