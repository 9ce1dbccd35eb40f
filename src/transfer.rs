//! Bulk transfers through a fixed staging buffer.

use crate::error::{PipeError, TransferError, WriteError};
use std::io;

/// Staging buffer size used by bulk transfers unless configured otherwise.
pub const DEFAULT_TRANSFER_BUFFER_SIZE: usize = 32 * 1024;

/// Repeatedly `pull` into a staging buffer and `push` its contents, until `pull` reaches the end
/// of its stream.
///
/// `pull` follows the [`std::io::Read`] convention: `Ok(0)` marks the end of the stream, which
/// ends the transfer successfully. Interrupted pulls are retried. Any other error from either
/// side ends the transfer immediately.
///
/// Every pulled chunk is handed to `push` exactly once. A push that reports fewer bytes than it
/// was given (or more) fails the transfer with [`PipeError::ShortWrite`]. A push that fails
/// reports how many bytes it accepted first through [`WriteError::written`].
///
/// Returns the total number of bytes pushed. On failure, [`TransferError::transferred`] holds
/// the total up to and including the failing push.
pub fn copy_buffered<P, W>(
    buffer_size: usize,
    mut pull: P,
    mut push: W,
) -> Result<u64, TransferError>
where
    P: FnMut(&mut [u8]) -> io::Result<usize>,
    W: FnMut(&[u8]) -> Result<usize, WriteError>,
{
    let mut buffer = vec![0; buffer_size.max(1)];
    let mut total = 0u64;
    loop {
        let pulled = match pull(&mut buffer) {
            Ok(0) => break,
            Ok(pulled) => pulled,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::debug!(total, error = %e, "transfer failed reading");
                return Err(TransferError::new(total, e.into()));
            }
        };

        let pushed = match push(&buffer[..pulled]) {
            Ok(pushed) => pushed,
            Err(e) => {
                total += e.written().min(pulled) as u64;
                tracing::debug!(total, error = %e, "transfer failed writing");
                return Err(TransferError::new(total, e.into_error()));
            }
        };
        if pushed > pulled {
            return Err(TransferError::new(total, PipeError::ShortWrite));
        }
        total += pushed as u64;
        if pushed != pulled {
            tracing::debug!(total, pulled, pushed, "transfer hit a short write");
            return Err(TransferError::new(total, PipeError::ShortWrite));
        }
    }
    tracing::trace!(total, "transfer complete");
    Ok(total)
}
