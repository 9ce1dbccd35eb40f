use crate::{
    circular_buffer::CircularBuffer,
    error::{PipeError, WriteError},
};
use futures::task::AtomicWaker;
use std::{
    sync::{Condvar, Mutex, MutexGuard, PoisonError},
    task::{Context, Poll},
};

/// Which ends of a pipe have been closed.
///
/// Transitions are monotonic: once a side is closed it stays closed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PipeState {
    /// Neither side is closed.
    Open,
    /// The read side is closed; writes fail.
    ReaderClosed,
    /// The write side is closed; reads drain the buffer and then fail.
    WriterClosed,
    /// Both sides are closed.
    BothClosed,
}

// Everything guarded by the pipe's lock
struct State {
    buffer: CircularBuffer,
    reader_closed: bool,
    writer_closed: bool,
    error_for_writer: Option<PipeError>, // set once, by the read side
    error_for_reader: Option<PipeError>, // set once, by the write side
}

impl State {
    // The error a reader facing an empty buffer receives, if it shouldn't wait.
    fn read_error(&self) -> Option<PipeError> {
        if self.reader_closed {
            Some(self.error_for_writer.clone().unwrap_or(PipeError::Closed))
        } else if self.writer_closed {
            Some(
                self.error_for_reader
                    .clone()
                    .unwrap_or(PipeError::EndOfStream),
            )
        } else {
            None
        }
    }

    // The error a writer receives, regardless of free space.
    fn write_error(&self) -> Option<PipeError> {
        if self.reader_closed {
            Some(self.error_for_writer.clone().unwrap_or(PipeError::Closed))
        } else if self.writer_closed {
            Some(PipeError::Closed)
        } else {
            None
        }
    }

    fn pipe_state(&self) -> PipeState {
        match (self.reader_closed, self.writer_closed) {
            (false, false) => PipeState::Open,
            (true, false) => PipeState::ReaderClosed,
            (false, true) => PipeState::WriterClosed,
            (true, true) => PipeState::BothClosed,
        }
    }
}

/// Shared state of a pipe, referenced by both handles.
pub(crate) struct Pipe {
    state: Mutex<State>,
    space_available: Condvar,
    data_available: Condvar,
    read_waker: AtomicWaker,  // async reader waiting for data
    write_waker: AtomicWaker, // async writer waiting for space
}

impl Pipe {
    pub(crate) fn new(capacity: usize) -> Self {
        let buffer = CircularBuffer::new(capacity);
        tracing::trace!(capacity = buffer.capacity(), "created pipe");
        Self {
            state: Mutex::new(State {
                buffer,
                reader_closed: false,
                writer_closed: false,
                error_for_writer: None,
                error_for_reader: None,
            }),
            space_available: Condvar::new(),
            data_available: Condvar::new(),
            read_waker: AtomicWaker::new(),
            write_waker: AtomicWaker::new(),
        }
    }

    // No critical section can leave the state inconsistent, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wake_reader(&self) {
        self.data_available.notify_one();
        self.read_waker.wake();
    }

    fn wake_writer(&self) {
        self.space_available.notify_one();
        self.write_waker.wake();
    }

    fn wake_all(&self) {
        self.data_available.notify_all();
        self.space_available.notify_all();
        self.read_waker.wake();
        self.write_waker.wake();
    }

    // Must be called with a non-empty buffer.
    fn drain(&self, state: &mut State, dst: &mut [u8]) -> usize {
        let was_full = state.buffer.is_full();
        let count = state.buffer.read(dst);
        if was_full {
            self.wake_writer();
        }
        count
    }

    // Must be called with a non-full buffer.
    fn fill(&self, state: &mut State, src: &[u8]) -> usize {
        let was_empty = state.buffer.is_empty();
        let count = state.buffer.write(src);
        if was_empty {
            self.wake_reader();
        }
        count
    }

    pub(crate) fn capacity(&self) -> usize {
        self.lock().buffer.capacity()
    }

    pub(crate) fn buffered(&self) -> usize {
        self.lock().buffer.len()
    }

    pub(crate) fn state(&self) -> PipeState {
        self.lock().pipe_state()
    }

    /// Read whatever is available, blocking only while the buffer is empty.
    ///
    /// Buffered bytes are always delivered before any terminal error, even after a close.
    pub(crate) fn read(&self, dst: &mut [u8]) -> Result<usize, PipeError> {
        if dst.is_empty() {
            return Ok(0);
        }

        let mut state = self.lock();
        while state.buffer.is_empty() {
            if let Some(e) = state.read_error() {
                return Err(e);
            }
            state = self
                .data_available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        Ok(self.drain(&mut state, dst))
    }

    /// Write all of `src`, blocking whenever the buffer is full.
    pub(crate) fn write(&self, mut src: &[u8]) -> Result<usize, WriteError> {
        let mut state = self.lock();
        let mut written = 0;
        while !src.is_empty() {
            loop {
                if let Some(e) = state.write_error() {
                    return Err(WriteError::new(written, e));
                }
                if !state.buffer.is_full() {
                    break;
                }
                state = self
                    .space_available
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }

            let count = self.fill(&mut state, src);
            src = &src[count..];
            written += count;
        }
        Ok(written)
    }

    /// Non-blocking variant of [`read`](Self::read).
    pub(crate) fn poll_read(
        &self,
        cx: &mut Context,
        dst: &mut [u8],
    ) -> Poll<Result<usize, PipeError>> {
        if dst.is_empty() {
            return Poll::Ready(Ok(0));
        }

        let mut state = self.lock();
        if state.buffer.is_empty() {
            if let Some(e) = state.read_error() {
                return Poll::Ready(Err(e));
            }
            // Registered under the lock, so a writer can't fill the buffer in between
            self.read_waker.register(cx.waker());
            return Poll::Pending;
        }
        Poll::Ready(Ok(self.drain(&mut state, dst)))
    }

    /// Non-blocking write of as much of `src` as fits.
    pub(crate) fn poll_write(
        &self,
        cx: &mut Context,
        src: &[u8],
    ) -> Poll<Result<usize, PipeError>> {
        if src.is_empty() {
            return Poll::Ready(Ok(0));
        }

        let mut state = self.lock();
        if let Some(e) = state.write_error() {
            return Poll::Ready(Err(e));
        }
        if state.buffer.is_full() {
            self.write_waker.register(cx.waker());
            return Poll::Pending;
        }
        Poll::Ready(Ok(self.fill(&mut state, src)))
    }

    /// Close the read side, installing `error` as the error future writes receive.
    ///
    /// Only the first installed error is kept.
    pub(crate) fn close_read(&self, error: PipeError) {
        let mut state = self.lock();
        state.reader_closed = true;
        if state.error_for_writer.is_none() {
            tracing::trace!(%error, buffered = state.buffer.len(), "closed read side of pipe");
            state.error_for_writer = Some(error);
        }
        self.wake_all();
    }

    /// Close the write side, installing `error` as the error reads receive once drained.
    ///
    /// Only the first installed error is kept.
    pub(crate) fn close_write(&self, error: PipeError) {
        let mut state = self.lock();
        state.writer_closed = true;
        if state.error_for_reader.is_none() {
            tracing::trace!(%error, buffered = state.buffer.len(), "closed write side of pipe");
            state.error_for_reader = Some(error);
        }
        self.wake_all();
    }
}
