//! Implementations of the [`std::io`] and [`futures::io`] traits for pipe handles.
//!
//! At the trait boundary, pipe errors follow the conventions of those traits:
//! * reaching the end of the stream reads `Ok(0)`,
//! * a write that fails after accepting some bytes reports those bytes; the failure is
//!   returned by the next write,
//! * other errors become [`std::io::Error`]s wrapping the [`PipeError`].

use crate::{
    error::{PipeError, WriteError},
    PipeReader, PipeWriter,
};
use futures::io::{AsyncRead, AsyncWrite};
use std::{
    io,
    pin::Pin,
    task::{Context, Poll},
};

fn read_result(result: Result<usize, PipeError>) -> io::Result<usize> {
    match result {
        Err(PipeError::EndOfStream) => Ok(0),
        result => result.map_err(io::Error::from),
    }
}

fn write_result(result: Result<usize, WriteError>) -> io::Result<usize> {
    match result {
        Err(e) if e.written() > 0 => Ok(e.written()),
        result => result.map_err(io::Error::from),
    }
}

impl io::Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        read_result(self.pipe.read(buf))
    }
}

impl io::Read for &PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        read_result(self.pipe.read(buf))
    }
}

impl io::Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        write_result(self.pipe.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Write for &PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        write_result(self.pipe.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl AsyncRead for PipeReader {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        self.pipe.poll_read(cx, buf).map(read_result)
    }
}

impl AsyncRead for &PipeReader {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        self.pipe.poll_read(cx, buf).map(read_result)
    }
}

impl AsyncWrite for PipeWriter {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context, buf: &[u8]) -> Poll<io::Result<usize>> {
        self.pipe
            .poll_write(cx, buf)
            .map(|result| result.map_err(io::Error::from))
    }

    fn poll_flush(self: Pin<&mut Self>, _: &mut Context) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _: &mut Context) -> Poll<io::Result<()>> {
        self.pipe.close_write(PipeError::EndOfStream);
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for &PipeWriter {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context, buf: &[u8]) -> Poll<io::Result<usize>> {
        self.pipe
            .poll_write(cx, buf)
            .map(|result| result.map_err(io::Error::from))
    }

    fn poll_flush(self: Pin<&mut Self>, _: &mut Context) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _: &mut Context) -> Poll<io::Result<()>> {
        self.pipe.close_write(PipeError::EndOfStream);
        Poll::Ready(Ok(()))
    }
}
