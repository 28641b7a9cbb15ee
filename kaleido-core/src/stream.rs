//! Bounded, position-tracked byte cursors
//!
//! Applications serialize their state through [`StreamWriter`] and read it
//! back through [`StreamReader`]. Both wrap a borrowed slice, track their
//! position, and refuse to run past the end, so an app can never write
//! outside the slot region the switcher staged for it.
//!
//! Multi-byte integers are little-endian.

/// Errors from stream cursor operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StreamError {
    /// Not enough bytes left in the underlying slice
    Exhausted,
}

/// Sequential writer over a mutable byte slice
#[derive(Debug)]
pub struct StreamWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> StreamWriter<'a> {
    /// Create a writer over the whole slice, positioned at the start
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Number of bytes written so far
    pub fn written(&self) -> usize {
        self.pos
    }

    /// Number of bytes still available
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Write a single byte
    pub fn write_u8(&mut self, value: u8) -> Result<(), StreamError> {
        if self.remaining() < 1 {
            return Err(StreamError::Exhausted);
        }
        self.buf[self.pos] = value;
        self.pos += 1;
        Ok(())
    }

    /// Write a little-endian u16
    pub fn write_u16(&mut self, value: u16) -> Result<(), StreamError> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Write a little-endian u32
    pub fn write_u32(&mut self, value: u32) -> Result<(), StreamError> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Write a raw byte run
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), StreamError> {
        if self.remaining() < bytes.len() {
            return Err(StreamError::Exhausted);
        }
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }
}

/// Sequential reader over a byte slice
#[derive(Debug)]
pub struct StreamReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> StreamReader<'a> {
    /// Create a reader over the whole slice, positioned at the start
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Number of bytes consumed so far
    pub fn consumed(&self) -> usize {
        self.pos
    }

    /// Number of bytes still available
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8, StreamError> {
        if self.remaining() < 1 {
            return Err(StreamError::Exhausted);
        }
        let value = self.buf[self.pos];
        self.pos += 1;
        Ok(value)
    }

    /// Read a little-endian u16
    pub fn read_u16(&mut self) -> Result<u16, StreamError> {
        let mut bytes = [0u8; 2];
        self.read_bytes(&mut bytes)?;
        Ok(u16::from_le_bytes(bytes))
    }

    /// Read a little-endian u32
    pub fn read_u32(&mut self) -> Result<u32, StreamError> {
        let mut bytes = [0u8; 4];
        self.read_bytes(&mut bytes)?;
        Ok(u32::from_le_bytes(bytes))
    }

    /// Read an exact byte run into `out`
    pub fn read_bytes(&mut self, out: &mut [u8]) -> Result<(), StreamError> {
        if self.remaining() < out.len() {
            return Err(StreamError::Exhausted);
        }
        out.copy_from_slice(&self.buf[self.pos..self.pos + out.len()]);
        self.pos += out.len();
        Ok(())
    }
}
