//! Sequential little endian reader over an in-memory package.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use crate::error::{Error, Result};

/// A cursor over an immutable byte buffer
///
/// Every read is bounds checked up front, so a failed read reports
/// [`Error::Truncated`] and leaves the position where it was.
///
/// ```
/// use ts4_dbpf::cursor::ByteCursor;
///
/// let data = [0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00];
/// let mut cursor = ByteCursor::new(&data);
///
/// assert_eq!(cursor.read_u64_split().unwrap(), 0x0000_0002_0000_0001);
/// assert_eq!(cursor.remaining(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    inner: Cursor<&'a [u8]>,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            inner: Cursor::new(data),
        }
    }

    /// Create a cursor positioned at `position`
    pub fn new_at(data: &'a [u8], position: usize) -> Self {
        let mut cursor = Self::new(data);
        cursor.seek(position);
        cursor
    }

    /// Current offset from the start of the buffer
    pub fn position(&self) -> usize {
        self.inner.position() as usize
    }

    /// Move to an absolute offset. Seeking past the end is allowed, the next read fails.
    pub fn seek(&mut self, position: usize) {
        self.inner.set_position(position as u64);
    }

    /// Total length of the underlying buffer
    pub fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    /// Whether the underlying buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes left between the position and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.position())
    }

    fn ensure(&self, wanted: usize) -> Result<()> {
        let available = self.remaining();
        if available < wanted {
            return Err(Error::Truncated {
                offset: self.position(),
                wanted,
                available,
            });
        }
        Ok(())
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.inner.read_u16::<LittleEndian>()?)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.inner.read_u32::<LittleEndian>()?)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(self.inner.read_i32::<LittleEndian>()?)
    }

    /// Read a 64-bit value stored as two 32-bit words, low word first
    pub fn read_u64_split(&mut self) -> Result<u64> {
        self.ensure(8)?;
        let low = self.inner.read_u32::<LittleEndian>()? as u64;
        let high = self.inner.read_u32::<LittleEndian>()? as u64;
        Ok((high << 32) | low)
    }

    /// Borrow the next `count` bytes and advance past them
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        self.ensure(count)?;
        let start = self.position();
        let data: &'a [u8] = *self.inner.get_ref();
        self.seek(start + count);
        Ok(&data[start..start + count])
    }
}
