//! Fixed-capacity response buffers.
//!
//! A `ResponseBuffer` is sized once, up front, for everything a response
//! will hold (status line, headers, payload). Appends never grow it past
//! that size: an append that would overflow fails and leaves the buffer
//! untouched, so a miscomputed size shows up as an error rather than a
//! silent reallocation.

use bytes::{Bytes, BytesMut};
use std::fmt;

/// Error returned when an append does not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferOverflow {
    /// Bytes the buffer would hold after the append.
    pub needed: usize,
    /// Fixed capacity of the buffer.
    pub capacity: usize,
}

impl fmt::Display for BufferOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "buffer overflow: {} bytes needed, capacity {}",
            self.needed, self.capacity
        )
    }
}

impl std::error::Error for BufferOverflow {}

/// Owned byte buffer with a hard capacity.
#[derive(Debug)]
pub struct ResponseBuffer {
    data: BytesMut,
    capacity: usize,
}

impl ResponseBuffer {
    /// Create an empty buffer that can hold at most `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
            capacity,
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes that can still be appended.
    pub fn remaining(&self) -> usize {
        self.capacity - self.data.len()
    }

    /// Check that `additional` more bytes would fit.
    pub fn reserve_check(&self, additional: usize) -> Result<(), BufferOverflow> {
        let needed = self.data.len() + additional;
        if needed > self.capacity {
            return Err(BufferOverflow {
                needed,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Append `bytes` after the data already written.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), BufferOverflow> {
        self.reserve_check(bytes.len())?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Freeze into an immutable, cheaply cloneable byte view.
    pub fn freeze(self) -> Bytes {
        self.data.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_within_capacity() {
        let mut buf = ResponseBuffer::with_capacity(16);
        assert!(buf.is_empty());

        buf.append(b"hello ").unwrap();
        buf.append(b"world").unwrap();

        assert_eq!(buf.len(), 11);
        assert_eq!(buf.remaining(), 5);
        assert_eq!(buf.as_slice(), b"hello world");
    }

    #[test]
    fn test_append_exact_fit() {
        let mut buf = ResponseBuffer::with_capacity(4);
        buf.append(b"abcd").unwrap();
        assert_eq!(buf.remaining(), 0);
        assert!(buf.append(b"").is_ok());
    }

    #[test]
    fn test_overflow_leaves_buffer_untouched() {
        let mut buf = ResponseBuffer::with_capacity(8);
        buf.append(b"12345").unwrap();

        let err = buf.append(b"6789").unwrap_err();
        assert_eq!(
            err,
            BufferOverflow {
                needed: 9,
                capacity: 8
            }
        );
        assert_eq!(buf.as_slice(), b"12345");
    }

    #[test]
    fn test_freeze() {
        let mut buf = ResponseBuffer::with_capacity(3);
        buf.append(b"abc").unwrap();
        let frozen = buf.freeze();
        assert_eq!(&frozen[..], b"abc");
    }
}
