//! Fixed-capacity circular byte buffers.
//!
//! [`CircularBuffer`] is the storage behind every pipe. It performs no synchronization of its
//! own: callers must guarantee exclusive access, and "cannot make progress" is signalled only by
//! a return value of 0.

/// A fixed-capacity byte ring.
///
/// The buffer tracks the number of unread bytes alongside its cursors, so every slot of the
/// backing storage is usable. When `read_pos == write_pos` the buffer is either empty or full,
/// and the length tells the two apart.
#[derive(Clone, Debug)]
pub struct CircularBuffer {
    data: Box<[u8]>,
    read_pos: usize,  // start of unread data
    write_pos: usize, // start of free space
    len: usize,       // unread bytes
}

impl CircularBuffer {
    /// Create a buffer holding up to `capacity` bytes.
    ///
    /// A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity.max(1)].into_boxed_slice(),
            read_pos: 0,
            write_pos: 0,
            len: 0,
        }
    }

    /// The maximum number of bytes the buffer can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// The number of unread bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// The number of bytes that can be written before the buffer is full.
    #[inline]
    pub fn available(&self) -> usize {
        self.capacity() - self.len
    }

    /// Returns `true` if there are no unread bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if no more bytes can be written.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Copy unread bytes into `dst`, returning how many were copied.
    ///
    /// Copies `min(self.len(), dst.len())` bytes, in at most two segments when the unread region
    /// wraps around the end of the storage.
    pub fn read(&mut self, dst: &mut [u8]) -> usize {
        let count = dst.len().min(self.len);
        if count == 0 {
            return 0;
        }

        let first = count.min(self.capacity() - self.read_pos);
        dst[..first].copy_from_slice(&self.data[self.read_pos..self.read_pos + first]);
        dst[first..count].copy_from_slice(&self.data[..count - first]);

        self.read_pos = (self.read_pos + count) % self.capacity();
        self.len -= count;
        count
    }

    /// Copy bytes from `src` into free space, returning how many were copied.
    ///
    /// Copies `min(self.available(), src.len())` bytes, in at most two segments when the free
    /// region wraps around the end of the storage.
    pub fn write(&mut self, src: &[u8]) -> usize {
        let count = src.len().min(self.available());
        if count == 0 {
            return 0;
        }

        let first = count.min(self.capacity() - self.write_pos);
        self.data[self.write_pos..self.write_pos + first].copy_from_slice(&src[..first]);
        self.data[..count - first].copy_from_slice(&src[first..count]);

        self.write_pos = (self.write_pos + count) % self.capacity();
        self.len += count;
        count
    }
}
