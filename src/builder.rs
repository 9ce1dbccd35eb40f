use crate::{
    pipe::Pipe,
    transfer::DEFAULT_TRANSFER_BUFFER_SIZE,
    PipeReader, PipeWriter,
};
use std::sync::Arc;

/// Configures and creates pipes.
///
/// ```
/// let (reader, writer) = bufpipe::Builder::new()
///     .capacity(16)
///     .transfer_buffer_size(1024)
///     .build();
/// assert_eq!(reader.capacity(), 16);
/// # drop(writer);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Builder {
    capacity: usize,
    transfer_buffer_size: usize,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
            transfer_buffer_size: DEFAULT_TRANSFER_BUFFER_SIZE,
        }
    }
}

impl Builder {
    /// Buffer capacity used unless configured otherwise.
    pub const DEFAULT_CAPACITY: usize = 4096;

    /// Create a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of bytes the pipe buffers before writes block.
    ///
    /// A capacity of 0 is treated as 1.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Set the staging buffer size used by [`PipeReader::write_to`] and
    /// [`PipeWriter::read_from`].
    ///
    /// A size of 0 is treated as 1.
    pub fn transfer_buffer_size(mut self, size: usize) -> Self {
        self.transfer_buffer_size = size.max(1);
        self
    }

    /// Create a pipe, returning its read and write halves.
    pub fn build(self) -> (PipeReader, PipeWriter) {
        let pipe = Arc::new(Pipe::new(self.capacity));
        (
            PipeReader::new(pipe.clone(), self.transfer_buffer_size),
            PipeWriter::new(pipe, self.transfer_buffer_size),
        )
    }
}
