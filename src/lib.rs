//! Bufpipe provides synchronous in-memory pipes with a bounded buffer.
//!
//! A pipe behaves like a direct hand-off between a writer and a reader, but buffers up to a fixed
//! number of bytes so a writer can get ahead of a lagging reader without stalling on every call.
//! Writes block only while the buffer is full, and reads block only while it is empty.
//!
//! ```
//! use std::thread;
//!
//! let (reader, writer) = bufpipe::pipe(4);
//! let producer = thread::spawn(move || {
//!     writer.write(b"hello world").unwrap();
//!     writer.close().unwrap();
//! });
//!
//! let mut received = Vec::new();
//! reader.write_to(&mut received).unwrap();
//! producer.join().unwrap();
//! assert_eq!(received, b"hello world");
//! ```
//!
//! Either side may be closed at any time. Bytes already accepted into the buffer are never lost:
//! a reader drains them before it observes the closure. An error attached with
//! `close_with_error` is delivered to the opposite side, and only the first error attached to a
//! side is kept.
//!
//! The handles also implement [`std::io::Read`]/[`std::io::Write`] and, for use from async code,
//! [`futures::io::AsyncRead`]/[`futures::io::AsyncWrite`].

mod builder;
mod handle;
mod pipe;

pub mod circular_buffer;
pub mod error;
pub mod io;
pub mod transfer;

pub use builder::Builder;
pub use error::{PipeError, TransferError, WriteError};
pub use handle::{PipeReader, PipeWriter};
pub use pipe::PipeState;
pub use transfer::DEFAULT_TRANSFER_BUFFER_SIZE;

/// Create a pipe buffering up to `capacity` bytes, returning its read and write halves.
///
/// A capacity of 0 is treated as 1. See [`Builder`] for more options.
pub fn pipe(capacity: usize) -> (PipeReader, PipeWriter) {
    Builder::new().capacity(capacity).build()
}
