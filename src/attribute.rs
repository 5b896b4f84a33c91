//! Attributes: named, length-prefixed byte payloads attached to classes,
//! fields, methods, and (transitively) other attributes.
//!
//! Payloads are kept opaque. Decoding `Code`, `LineNumberTable`, or any
//! other attribute's internal structure is left to a downstream consumer;
//! this crate's job ends at handing back the exact bytes the class file
//! declared.

use crate::constant_pool::ConstantPool;
use crate::cursor::ByteCursor;
use crate::error::Error;

/// A single attribute: its name (resolved from the constant pool) and its
/// raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The attribute's name, e.g. `"Code"` or `"ConstantValue"`.
    pub name: String,
    /// The attribute's payload, copied verbatim. Its internal structure
    /// is not interpreted by this crate.
    pub payload: Vec<u8>,
}

impl Attribute {
    /// Parses one attribute: a two-byte name index, a four-byte length,
    /// and exactly that many bytes of payload.
    ///
    /// # Errors
    /// [`Error::EndOfBuffer`] on truncated input, or any error from
    /// resolving the name index against `pool`.
    pub fn parse(cursor: &mut ByteCursor<'_>, pool: &ConstantPool) -> Result<Self, Error> {
        let name_index = cursor.read_u16()?;
        let name = pool.resolve::<String>(name_index)?;
        let length = cursor.read_u32()?;
        let payload = cursor
            .read_bytes(usize::try_from(length).unwrap_or(usize::MAX))?
            .to_vec();
        Ok(Self { name, payload })
    }

    /// Parses the `u16`-counted list of attributes that follows a class,
    /// field, or method's fixed-size header.
    ///
    /// # Errors
    /// Propagates any error from [`Attribute::parse`].
    pub fn parse_table(
        cursor: &mut ByteCursor<'_>,
        pool: &ConstantPool,
    ) -> Result<Vec<Self>, Error> {
        let count = cursor.read_u16()?;
        (0..count).map(|_| Self::parse(cursor, pool)).collect()
    }
}
