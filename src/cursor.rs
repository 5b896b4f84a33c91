//! A random-access, bounds-checked view over an immutable byte buffer.

use crate::error::Error;

/// The byte order a [`ByteCursor`] interprets multi-byte reads with.
///
/// Class files are always big-endian; this is nonetheless a property of
/// the *input*, not a hard-coded constant, so that the cursor can also
/// serve formats (or test fixtures) that declare a different order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    /// Most significant byte first. What the JVM class file format uses.
    Big,
    /// Least significant byte first.
    Little,
}

/// A read-only cursor over a borrowed byte slice.
///
/// Holds a position in `[0, buffer.len()]` and reads fixed-width values by
/// copying the declared number of bytes and reversing them only when the
/// stream's declared [`Endianness`] disagrees with the value's natural
/// (big-endian) construction.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    buffer: &'a [u8],
    position: usize,
    endianness: Endianness,
}

impl<'a> ByteCursor<'a> {
    /// Creates a cursor at position 0 over `buffer`, declaring `endianness`
    /// for subsequent typed reads.
    #[must_use]
    pub const fn new(buffer: &'a [u8], endianness: Endianness) -> Self {
        Self {
            buffer,
            position: 0,
            endianness,
        }
    }

    /// The number of unread bytes.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    /// The current absolute position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Moves the cursor to an absolute position, clamped to `[0, len]`.
    pub const fn seek(&mut self, absolute: usize) {
        self.position = if absolute > self.buffer.len() {
            self.buffer.len()
        } else {
            absolute
        };
    }

    /// Moves the cursor by a signed offset relative to its current
    /// position, clamped to `[0, len]`.
    pub fn skip(&mut self, relative: isize) {
        let new_pos = self.position.cast_signed() + relative;
        self.seek(
            new_pos
                .clamp(0, self.buffer.len().cast_signed())
                .cast_unsigned(),
        );
    }

    /// Reads `n` bytes and advances the cursor.
    ///
    /// # Errors
    /// [`Error::EndOfBuffer`] if fewer than `n` bytes remain.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], Error> {
        if self.remaining() < n {
            return Err(Error::EndOfBuffer {
                requested: n,
                remaining: self.remaining(),
                position: self.position,
            });
        }
        let slice = &self.buffer[self.position..self.position + n];
        self.position += n;
        Ok(slice)
    }

    /// Reads `n` bytes verbatim, without endianness reversal. Used for
    /// modified-UTF-8 payloads, which are byte sequences, not numbers.
    ///
    /// # Errors
    /// [`Error::EndOfBuffer`] if fewer than `n` bytes remain.
    pub fn read_utf(&mut self, n: usize) -> Result<&'a [u8], Error> {
        self.read_bytes(n)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.read_bytes(N)?);
        if self.endianness == Endianness::Little {
            array.reverse();
        }
        Ok(array)
    }

    /// Reads one byte.
    ///
    /// # Errors
    /// [`Error::EndOfBuffer`] if the cursor is at the end of the buffer.
    pub fn read_u8(&mut self) -> Result<u8, Error> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Reads a big-endian-declared `u16`, reversing it if the cursor's
    /// declared endianness is little.
    ///
    /// # Errors
    /// [`Error::EndOfBuffer`] if fewer than 2 bytes remain.
    pub fn read_u16(&mut self) -> Result<u16, Error> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Reads a `u32`.
    ///
    /// # Errors
    /// [`Error::EndOfBuffer`] if fewer than 4 bytes remain.
    pub fn read_u32(&mut self) -> Result<u32, Error> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Reads a `u64`.
    ///
    /// # Errors
    /// [`Error::EndOfBuffer`] if fewer than 8 bytes remain.
    pub fn read_u64(&mut self) -> Result<u64, Error> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    /// Reads an `i32`.
    ///
    /// # Errors
    /// [`Error::EndOfBuffer`] if fewer than 4 bytes remain.
    pub fn read_i32(&mut self) -> Result<i32, Error> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    /// Reads an `i64`.
    ///
    /// # Errors
    /// [`Error::EndOfBuffer`] if fewer than 8 bytes remain.
    pub fn read_i64(&mut self) -> Result<i64, Error> {
        Ok(i64::from_be_bytes(self.read_array()?))
    }

    /// Reads an IEEE-754 single-precision float, bit-copied from the
    /// integer of equal width so that NaN bit patterns survive intact.
    ///
    /// # Errors
    /// [`Error::EndOfBuffer`] if fewer than 4 bytes remain.
    pub fn read_f32(&mut self) -> Result<f32, Error> {
        Ok(f32::from_bits(u32::from_be_bytes(self.read_array()?)))
    }

    /// Reads an IEEE-754 double-precision float, bit-copied from the
    /// integer of equal width so that NaN bit patterns survive intact.
    ///
    /// # Errors
    /// [`Error::EndOfBuffer`] if fewer than 8 bytes remain.
    pub fn read_f64(&mut self) -> Result<f64, Error> {
        Ok(f64::from_bits(u64::from_be_bytes(self.read_array()?)))
    }
}
