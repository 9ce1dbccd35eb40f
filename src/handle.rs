//! The two ends of a pipe.

use crate::{
    error::{PipeError, TransferError, WriteError},
    pipe::{Pipe, PipeState},
    transfer::copy_buffered,
};
use std::{fmt, io, sync::Arc};

/// The read half of a pipe.
///
/// Dropping the reader closes the read side, like [`close`](Self::close).
pub struct PipeReader {
    pub(crate) pipe: Arc<Pipe>,
    transfer_buffer_size: usize,
}

impl PipeReader {
    pub(crate) fn new(pipe: Arc<Pipe>, transfer_buffer_size: usize) -> Self {
        Self {
            pipe,
            transfer_buffer_size,
        }
    }

    /// Read whatever bytes are buffered into `buf`, blocking while the pipe is empty.
    ///
    /// Returns as soon as any bytes are available; it doesn't wait to fill `buf`. An empty `buf`
    /// returns `Ok(0)` immediately.
    ///
    /// Once the buffer is drained, fails with:
    /// * the error attached by [`close_with_error`](Self::close_with_error), or
    ///   [`PipeError::Closed`], if this side was closed,
    /// * otherwise the error attached by [`PipeWriter::close_with_error`], or
    ///   [`PipeError::EndOfStream`], if the write side was closed.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, PipeError> {
        self.pipe.read(buf)
    }

    /// Close the read side. Future and blocked writes fail with [`PipeError::Closed`].
    ///
    /// Equivalent to [`close_with_error`](Self::close_with_error) with [`PipeError::Closed`], so
    /// a later `close_with_error` has no effect. Bytes that are already buffered can still be
    /// read. Always succeeds.
    pub fn close(&self) -> Result<(), PipeError> {
        self.pipe.close_read(PipeError::Closed);
        Ok(())
    }

    /// Close the read side, delivering `error` to future and blocked writes.
    ///
    /// Only the first error attached to this side is kept. Always succeeds.
    pub fn close_with_error(&self, error: impl Into<PipeError>) -> Result<(), PipeError> {
        self.pipe.close_read(error.into());
        Ok(())
    }

    /// Read from the pipe into `sink` until the end of the stream.
    ///
    /// Returns the number of bytes written to `sink`. Reaching the end of the stream is a
    /// success; any other error ends the transfer, reporting how many bytes reached `sink`.
    pub fn write_to<W: io::Write>(&self, mut sink: W) -> Result<u64, TransferError> {
        copy_buffered(
            self.transfer_buffer_size,
            |buf| match self.read(buf) {
                Err(PipeError::EndOfStream) => Ok(0),
                result => result.map_err(io::Error::from),
            },
            |buf| sink.write(buf).map_err(|e| WriteError::new(0, e.into())),
        )
    }

    /// The capacity of the pipe's buffer.
    pub fn capacity(&self) -> usize {
        self.pipe.capacity()
    }

    /// The number of bytes written but not yet read.
    pub fn buffered(&self) -> usize {
        self.pipe.buffered()
    }

    /// Which sides of the pipe are closed.
    pub fn state(&self) -> PipeState {
        self.pipe.state()
    }
}

impl Drop for PipeReader {
    fn drop(&mut self) {
        self.pipe.close_read(PipeError::Closed);
    }
}

impl fmt::Debug for PipeReader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PipeReader")
            .field("state", &self.state())
            .field("buffered", &self.buffered())
            .finish()
    }
}

/// The write half of a pipe.
///
/// Dropping the writer closes the write side, like [`close`](Self::close).
pub struct PipeWriter {
    pub(crate) pipe: Arc<Pipe>,
    transfer_buffer_size: usize,
}

impl PipeWriter {
    pub(crate) fn new(pipe: Arc<Pipe>, transfer_buffer_size: usize) -> Self {
        Self {
            pipe,
            transfer_buffer_size,
        }
    }

    /// Write all of `buf` into the pipe, blocking whenever the buffer is full.
    ///
    /// Fails without waiting for space once the read side is closed, with the error attached by
    /// [`PipeReader::close_with_error`] or [`PipeError::Closed`]. Writing after this side was
    /// closed fails with [`PipeError::Closed`]. On failure, [`WriteError::written`] reports how
    /// many bytes were accepted first.
    pub fn write(&self, buf: &[u8]) -> Result<usize, WriteError> {
        self.pipe.write(buf)
    }

    /// Close the write side. Once the buffer is drained, reads fail with
    /// [`PipeError::EndOfStream`].
    ///
    /// Equivalent to [`close_with_error`](Self::close_with_error) with
    /// [`PipeError::EndOfStream`], so a later `close_with_error` has no effect. Always succeeds.
    pub fn close(&self) -> Result<(), PipeError> {
        self.pipe.close_write(PipeError::EndOfStream);
        Ok(())
    }

    /// Close the write side, delivering `error` to reads once the buffer is drained.
    ///
    /// Only the first error attached to this side is kept. Always succeeds.
    pub fn close_with_error(&self, error: impl Into<PipeError>) -> Result<(), PipeError> {
        self.pipe.close_write(error.into());
        Ok(())
    }

    /// Write everything from `source` into the pipe, until `source` reaches its end.
    ///
    /// Returns the number of bytes written into the pipe. The write side is left open. On
    /// failure, [`TransferError::transferred`] counts the bytes the pipe accepted.
    pub fn read_from<R: io::Read>(&self, mut source: R) -> Result<u64, TransferError> {
        copy_buffered(
            self.transfer_buffer_size,
            |buf| source.read(buf),
            |buf| self.write(buf),
        )
    }

    /// The capacity of the pipe's buffer.
    pub fn capacity(&self) -> usize {
        self.pipe.capacity()
    }

    /// The number of bytes written but not yet read.
    pub fn buffered(&self) -> usize {
        self.pipe.buffered()
    }

    /// Which sides of the pipe are closed.
    pub fn state(&self) -> PipeState {
        self.pipe.state()
    }
}

impl Drop for PipeWriter {
    fn drop(&mut self) {
        self.pipe.close_write(PipeError::EndOfStream);
    }
}

impl fmt::Debug for PipeWriter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PipeWriter")
            .field("state", &self.state())
            .field("buffered", &self.buffered())
            .finish()
    }
}
