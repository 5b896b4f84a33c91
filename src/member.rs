//! Fields and methods: both are an access-flag bitset, a name, a
//! descriptor, and an attribute table, so they share one representation.

use crate::attribute::Attribute;
use crate::constant_pool::ConstantPool;
use crate::cursor::ByteCursor;
use crate::error::Error;

bitflags::bitflags! {
    /// Access and property flags for a field, JVM Specification §4.5 table 4.6-A.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FieldAccessFlags: u16 {
        /// `ACC_PUBLIC`.
        const PUBLIC = 0x0001;
        /// `ACC_PRIVATE`.
        const PRIVATE = 0x0002;
        /// `ACC_PROTECTED`.
        const PROTECTED = 0x0004;
        /// `ACC_STATIC`.
        const STATIC = 0x0008;
        /// `ACC_FINAL`.
        const FINAL = 0x0010;
        /// `ACC_VOLATILE`.
        const VOLATILE = 0x0040;
        /// `ACC_TRANSIENT`.
        const TRANSIENT = 0x0080;
        /// `ACC_SYNTHETIC`.
        const SYNTHETIC = 0x1000;
        /// `ACC_ENUM`.
        const ENUM = 0x4000;
    }
}

bitflags::bitflags! {
    /// Access and property flags for a method, JVM Specification §4.6 table 4.6-B.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MethodAccessFlags: u16 {
        /// `ACC_PUBLIC`.
        const PUBLIC = 0x0001;
        /// `ACC_PRIVATE`.
        const PRIVATE = 0x0002;
        /// `ACC_PROTECTED`.
        const PROTECTED = 0x0004;
        /// `ACC_STATIC`.
        const STATIC = 0x0008;
        /// `ACC_FINAL`.
        const FINAL = 0x0010;
        /// `ACC_SYNCHRONIZED`.
        const SYNCHRONIZED = 0x0020;
        /// `ACC_BRIDGE`.
        const BRIDGE = 0x0040;
        /// `ACC_VARARGS`.
        const VARARGS = 0x0080;
        /// `ACC_NATIVE`.
        const NATIVE = 0x0100;
        /// `ACC_ABSTRACT`.
        const ABSTRACT = 0x0400;
        /// `ACC_STRICT`.
        const STRICT = 0x0800;
        /// `ACC_SYNTHETIC`.
        const SYNTHETIC = 0x1000;
    }
}

/// A field or method declaration: access flags, name, descriptor, and
/// attributes. Both are parsed identically at the file level (JVM
/// Specification §4.5 and §4.6 share this layout byte for byte).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// The raw access flag bits, exactly as declared. Unknown bits are
    /// preserved; use [`FieldAccessFlags::from_bits_retain`] or
    /// [`MethodAccessFlags::from_bits_retain`] to interpret them.
    pub access_flags: u16,
    /// The member's name.
    pub name: String,
    /// The member's raw field or method descriptor, e.g. `"I"` or
    /// `"(Ljava/lang/String;)V"`. Not parsed into a structured type.
    pub descriptor: String,
    /// The member's attributes, in declaration order.
    pub attributes: Vec<Attribute>,
}

impl Member {
    /// Parses one field or method entry: flags, name index, descriptor
    /// index, then an attribute table, in that order.
    ///
    /// # Errors
    /// [`Error::EndOfBuffer`] on truncated input, or any error from
    /// resolving the name/descriptor indices or the attribute table.
    pub fn parse(cursor: &mut ByteCursor<'_>, pool: &ConstantPool) -> Result<Self, Error> {
        let access_flags = cursor.read_u16()?;
        let name_index = cursor.read_u16()?;
        let descriptor_index = cursor.read_u16()?;
        let name = pool.resolve::<String>(name_index)?;
        let descriptor = pool.resolve::<String>(descriptor_index)?;
        let attributes = Attribute::parse_table(cursor, pool)?;
        Ok(Self {
            access_flags,
            name,
            descriptor,
            attributes,
        })
    }

    /// Parses the `u16`-counted list of fields or methods that follows
    /// the superclass/interfaces section of a class file.
    ///
    /// # Errors
    /// Propagates any error from [`Member::parse`].
    pub fn parse_table(
        cursor: &mut ByteCursor<'_>,
        pool: &ConstantPool,
    ) -> Result<Vec<Self>, Error> {
        let count = cursor.read_u16()?;
        (0..count).map(|_| Self::parse(cursor, pool)).collect()
    }

    /// The first attribute with the given name, if any.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
    }
}
