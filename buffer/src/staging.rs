//! Fixed-capacity, left-compacting byte buffer.

/// A bounded byte buffer whose occupied bytes always form a contiguous
/// prefix of the underlying storage.
///
/// `StagingBuffer` never grows. Writers append at the tail until the
/// buffer is full; readers consume from the front with [`compact`], which
/// shifts the remaining bytes back to offset 0.
///
/// # Semantics
///
/// - **Append**: copies as much as fits, returns how much was taken
/// - **Compact**: drops bytes from the front, panics on overrun
/// - **Reset**: empties the buffer
///
/// # Example
///
/// ```
/// use madstream_buffer::StagingBuffer;
///
/// let mut buf = StagingBuffer::new(4);
/// assert_eq!(buf.append(&[1, 2, 3, 4, 5]), 4);
/// assert!(buf.is_full());
///
/// buf.compact(2);
/// assert_eq!(buf.as_slice(), &[3, 4]);
/// assert_eq!(buf.append(&[5]), 1);
/// assert_eq!(buf.as_slice(), &[3, 4, 5]);
/// ```
///
/// [`compact`]: StagingBuffer::compact
#[derive(Debug, Clone)]
pub struct StagingBuffer {
    data: Box<[u8]>,
    len: usize,
}

impl StagingBuffer {
    /// Creates an empty buffer with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be greater than 0");
        StagingBuffer {
            data: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// Returns the fixed capacity.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of occupied bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no bytes are buffered.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if no more bytes can be appended.
    pub fn is_full(&self) -> bool {
        self.len == self.data.len()
    }

    /// Returns the free space at the tail.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.len
    }

    /// Returns the occupied bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Appends as many bytes of `chunk` as fit and returns that count.
    ///
    /// The caller retries with the remainder once space has been freed.
    pub fn append(&mut self, chunk: &[u8]) -> usize {
        let n = chunk.len().min(self.remaining());
        self.data[self.len..self.len + n].copy_from_slice(&chunk[..n]);
        self.len += n;
        n
    }

    /// Removes `count` bytes from the front and moves the rest to offset 0.
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds the number of buffered bytes. That is a
    /// logic error in the caller, not a data error.
    pub fn compact(&mut self, count: usize) {
        assert!(
            count <= self.len,
            "compact overrun: {} requested, {} buffered",
            count,
            self.len
        );
        if count == 0 {
            return;
        }
        self.data.copy_within(count..self.len, 0);
        self.len -= count;
    }

    /// Drops all buffered bytes.
    pub fn reset(&mut self) {
        self.len = 0;
    }
}
