//! The constant pool: a one-based, heterogeneous, self-referential table.

use crate::cursor::ByteCursor;
use crate::error::Error;

/// The recognized discriminants of a constant pool entry.
///
/// Tags 2, 13, and 14 are reserved by the JVM Specification and never
/// appear; any other unrecognized byte is handled by the pool parser's
/// recovery path (see [`ConstantPool::parse`]), not by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
#[non_exhaustive]
pub enum ConstantTag {
    /// `CONSTANT_Utf8`.
    Utf8 = 1,
    /// `CONSTANT_Integer`.
    Integer = 3,
    /// `CONSTANT_Float`.
    Float = 4,
    /// `CONSTANT_Long`. Occupies two pool slots.
    Long = 5,
    /// `CONSTANT_Double`. Occupies two pool slots.
    Double = 6,
    /// `CONSTANT_Class`.
    Class = 7,
    /// `CONSTANT_String`.
    String = 8,
    /// `CONSTANT_Fieldref`.
    FieldReference = 9,
    /// `CONSTANT_Methodref`.
    MethodReference = 10,
    /// `CONSTANT_InterfaceMethodref`.
    InterfaceMethodReference = 11,
    /// `CONSTANT_NameAndType`.
    NameAndType = 12,
    /// `CONSTANT_MethodHandle`.
    MethodHandle = 15,
    /// `CONSTANT_MethodType`.
    MethodType = 16,
    /// `CONSTANT_Dynamic`.
    Dynamic = 17,
    /// `CONSTANT_InvokeDynamic`.
    InvokeDynamic = 18,
    /// `CONSTANT_Module`.
    Module = 19,
    /// `CONSTANT_Package`.
    Package = 20,
    /// Not a real JVM tag: stands in for a slot that failed to parse,
    /// recovered from in non-strict mode. Occupies exactly one slot.
    Malformed,
}

impl TryFrom<u8> for ConstantTag {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Utf8),
            3 => Ok(Self::Integer),
            4 => Ok(Self::Float),
            5 => Ok(Self::Long),
            6 => Ok(Self::Double),
            7 => Ok(Self::Class),
            8 => Ok(Self::String),
            9 => Ok(Self::FieldReference),
            10 => Ok(Self::MethodReference),
            11 => Ok(Self::InterfaceMethodReference),
            12 => Ok(Self::NameAndType),
            15 => Ok(Self::MethodHandle),
            16 => Ok(Self::MethodType),
            17 => Ok(Self::Dynamic),
            18 => Ok(Self::InvokeDynamic),
            19 => Ok(Self::Module),
            20 => Ok(Self::Package),
            _ => Err(()),
        }
    }
}

/// A method handle's reference kind, JVM Specification §4.4.8 table 5.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReferenceKind {
    /// `REF_getField`.
    GetField = 1,
    /// `REF_getStatic`.
    GetStatic = 2,
    /// `REF_putField`.
    PutField = 3,
    /// `REF_putStatic`.
    PutStatic = 4,
    /// `REF_invokeVirtual`.
    InvokeVirtual = 5,
    /// `REF_invokeStatic`.
    InvokeStatic = 6,
    /// `REF_invokeSpecial`.
    InvokeSpecial = 7,
    /// `REF_newInvokeSpecial`.
    NewInvokeSpecial = 8,
    /// `REF_invokeInterface`.
    InvokeInterface = 9,
}

impl TryFrom<u8> for ReferenceKind {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::GetField),
            2 => Ok(Self::GetStatic),
            3 => Ok(Self::PutField),
            4 => Ok(Self::PutStatic),
            5 => Ok(Self::InvokeVirtual),
            6 => Ok(Self::InvokeStatic),
            7 => Ok(Self::InvokeSpecial),
            8 => Ok(Self::NewInvokeSpecial),
            9 => Ok(Self::InvokeInterface),
            _ => Err(()),
        }
    }
}

/// One entry in the [`ConstantPool`].
///
/// The raw bytes of a `Utf8` entry are kept as declared by the class file
/// (modified UTF-8 / CESU-8 with a two-byte NUL); decoding to a standard
/// Rust `String` happens on demand via [`ConstantPoolEntry::as_str`], not
/// at parse time, so that parsing never fails on odd byte content.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum ConstantPoolEntry {
    /// Modified-UTF-8 bytes, exactly as declared.
    Utf8(Vec<u8>),
    /// A 32-bit two's-complement integer.
    Integer(i32),
    /// An IEEE-754 32-bit float.
    Float(f32),
    /// A 64-bit two's-complement integer. Occupies two pool slots.
    Long(i64),
    /// An IEEE-754 64-bit float. Occupies two pool slots.
    Double(f64),
    /// A class or interface, by index to its binary name's `Utf8`.
    Class {
        /// Index of the `Utf8` entry holding the binary name.
        name_index: u16,
    },
    /// A `String` literal, by index to its `Utf8` value.
    String {
        /// Index of the `Utf8` entry holding the string's content.
        string_index: u16,
    },
    /// A field reference.
    FieldReference {
        /// Index of the owning `Class` entry.
        class_index: u16,
        /// Index of the `NameAndType` entry.
        name_and_type_index: u16,
    },
    /// A method reference.
    MethodReference {
        /// Index of the owning `Class` entry.
        class_index: u16,
        /// Index of the `NameAndType` entry.
        name_and_type_index: u16,
    },
    /// An interface method reference.
    InterfaceMethodReference {
        /// Index of the owning `Class` entry.
        class_index: u16,
        /// Index of the `NameAndType` entry.
        name_and_type_index: u16,
    },
    /// A name/descriptor pair.
    NameAndType {
        /// Index of the `Utf8` entry holding the name.
        name_index: u16,
        /// Index of the `Utf8` entry holding the descriptor.
        descriptor_index: u16,
    },
    /// A method handle.
    MethodHandle {
        /// What kind of reference this handle represents.
        reference_kind: ReferenceKind,
        /// Index of the referenced field or method entry.
        reference_index: u16,
    },
    /// A method type, by index to its descriptor's `Utf8`.
    MethodType {
        /// Index of the `Utf8` entry holding the descriptor.
        descriptor_index: u16,
    },
    /// A dynamically computed constant.
    Dynamic {
        /// Index into the class's `BootstrapMethods` attribute table.
        bootstrap_method_attr_index: u16,
        /// Index of the `NameAndType` entry.
        name_and_type_index: u16,
    },
    /// An `invokedynamic` call site specifier.
    InvokeDynamic {
        /// Index into the class's `BootstrapMethods` attribute table.
        bootstrap_method_attr_index: u16,
        /// Index of the `NameAndType` entry.
        name_and_type_index: u16,
    },
    /// A module, by index to its name's `Utf8`.
    Module {
        /// Index of the `Utf8` entry holding the module name.
        name_index: u16,
    },
    /// A package, by index to its name's `Utf8`.
    Package {
        /// Index of the `Utf8` entry holding the package name.
        name_index: u16,
    },
    /// A placeholder for a slot whose tag was unrecognized, inserted by
    /// the pool parser's recovery path.
    Malformed,
}

impl ConstantPoolEntry {
    /// The tag that identifies this entry's shape.
    #[must_use]
    pub const fn tag(&self) -> ConstantTag {
        match self {
            Self::Utf8(_) => ConstantTag::Utf8,
            Self::Integer(_) => ConstantTag::Integer,
            Self::Float(_) => ConstantTag::Float,
            Self::Long(_) => ConstantTag::Long,
            Self::Double(_) => ConstantTag::Double,
            Self::Class { .. } => ConstantTag::Class,
            Self::String { .. } => ConstantTag::String,
            Self::FieldReference { .. } => ConstantTag::FieldReference,
            Self::MethodReference { .. } => ConstantTag::MethodReference,
            Self::InterfaceMethodReference { .. } => ConstantTag::InterfaceMethodReference,
            Self::NameAndType { .. } => ConstantTag::NameAndType,
            Self::MethodHandle { .. } => ConstantTag::MethodHandle,
            Self::MethodType { .. } => ConstantTag::MethodType,
            Self::Dynamic { .. } => ConstantTag::Dynamic,
            Self::InvokeDynamic { .. } => ConstantTag::InvokeDynamic,
            Self::Module { .. } => ConstantTag::Module,
            Self::Package { .. } => ConstantTag::Package,
            Self::Malformed => ConstantTag::Malformed,
        }
    }

    /// Decodes a `Utf8` entry's modified-UTF-8 bytes into a standard Rust
    /// string. Not called at parse time: parsing never fails on byte
    /// content, only lookups that actually need the decoded text do.
    ///
    /// # Errors
    /// Returns the original bytes (wrapped) if they are not valid
    /// modified UTF-8 / CESU-8.
    pub fn decode_utf8(bytes: &[u8]) -> Result<String, cesu8::Cesu8DecodingError> {
        cesu8::from_java_cesu8(bytes).map(std::borrow::Cow::into_owned)
    }
}

#[derive(Clone)]
enum Slot {
    Entry(ConstantPoolEntry),
    Ghost,
}

/// Whether an unrecognized constant pool tag is a hard parse error
/// (`true`) or a recoverable placeholder insertion (`false`).
#[derive(Debug, Clone, Copy)]
pub struct StrictMode(pub bool);

/// The one-based, indexed constant pool table.
///
/// Index 0 is never used; a `Long` or `Double` entry at index `i` also
/// occupies the "ghost" slot `i + 1`, which must never be read.
#[derive(Debug, Clone)]
pub struct ConstantPool {
    slots: Vec<Slot>,
}

impl std::fmt::Debug for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entry(entry) => entry.fmt(f),
            Self::Ghost => f.write_str("Ghost"),
        }
    }
}

impl ConstantPool {
    /// Parses a constant pool from `cursor`.
    ///
    /// `pool_count` is the wire value read just before this call (the
    /// number of addressable entries plus one). In non-strict mode, an
    /// unrecognized tag byte is treated as a single malformed slot: the
    /// cursor rewinds by one byte so that byte is reinterpreted as the
    /// next entry's tag, and parsing continues. In strict mode the same
    /// condition is a hard [`Error::ClassFormat`].
    ///
    /// # Errors
    /// [`Error::EndOfBuffer`] on truncated input; [`Error::ClassFormat`]
    /// on an unrecognized tag in strict mode or an invalid method handle
    /// reference kind in either mode.
    pub fn parse(
        cursor: &mut ByteCursor<'_>,
        pool_count: u16,
        strict: StrictMode,
    ) -> Result<Self, Error> {
        let count = usize::from(pool_count);
        let mut slots = Vec::with_capacity(count);
        slots.push(Slot::Ghost); // index 0 is unused
        while slots.len() < count {
            let entry = Self::parse_entry(cursor, strict)?;
            let is_wide = matches!(
                entry,
                ConstantPoolEntry::Long(_) | ConstantPoolEntry::Double(_)
            );
            slots.push(Slot::Entry(entry));
            if is_wide {
                slots.push(Slot::Ghost);
            }
        }
        // `pool_count - 1` entries were requested but a Long/Double at the
        // very last index can push one ghost slot past `count`; the JVM
        // Specification permits this (the ghost is simply never queried).
        slots.truncate(count.max(slots.len().min(count + 1)));
        Ok(Self { slots })
    }

    fn parse_entry(
        cursor: &mut ByteCursor<'_>,
        strict: StrictMode,
    ) -> Result<ConstantPoolEntry, Error> {
        let start = cursor.position();
        let tag_byte = cursor.read_u8()?;
        match ConstantTag::try_from(tag_byte) {
            Ok(tag) => Self::parse_payload(cursor, tag),
            Err(()) if strict.0 => Err(Error::ClassFormat("invalid constant tag")),
            Err(()) => {
                log::warn!(
                    "Malformed constant pool tag {tag_byte:#x} at offset {start}; inserting placeholder"
                );
                cursor.seek(start);
                Ok(ConstantPoolEntry::Malformed)
            }
        }
    }

    fn parse_payload(
        cursor: &mut ByteCursor<'_>,
        tag: ConstantTag,
    ) -> Result<ConstantPoolEntry, Error> {
        use ConstantPoolEntry as E;
        Ok(match tag {
            ConstantTag::Utf8 => {
                let length = cursor.read_u16()?;
                E::Utf8(cursor.read_utf(usize::from(length))?.to_vec())
            }
            ConstantTag::Integer => E::Integer(cursor.read_i32()?),
            ConstantTag::Float => E::Float(cursor.read_f32()?),
            ConstantTag::Long => E::Long(cursor.read_i64()?),
            ConstantTag::Double => E::Double(cursor.read_f64()?),
            ConstantTag::Class => E::Class {
                name_index: cursor.read_u16()?,
            },
            ConstantTag::String => E::String {
                string_index: cursor.read_u16()?,
            },
            ConstantTag::FieldReference => E::FieldReference {
                class_index: cursor.read_u16()?,
                name_and_type_index: cursor.read_u16()?,
            },
            ConstantTag::MethodReference => E::MethodReference {
                class_index: cursor.read_u16()?,
                name_and_type_index: cursor.read_u16()?,
            },
            ConstantTag::InterfaceMethodReference => E::InterfaceMethodReference {
                class_index: cursor.read_u16()?,
                name_and_type_index: cursor.read_u16()?,
            },
            ConstantTag::NameAndType => E::NameAndType {
                name_index: cursor.read_u16()?,
                descriptor_index: cursor.read_u16()?,
            },
            ConstantTag::MethodHandle => {
                let kind_byte = cursor.read_u8()?;
                let reference_kind = ReferenceKind::try_from(kind_byte)
                    .map_err(|()| Error::ClassFormat("invalid method handle kind"))?;
                E::MethodHandle {
                    reference_kind,
                    reference_index: cursor.read_u16()?,
                }
            }
            ConstantTag::MethodType => E::MethodType {
                descriptor_index: cursor.read_u16()?,
            },
            ConstantTag::Dynamic => E::Dynamic {
                bootstrap_method_attr_index: cursor.read_u16()?,
                name_and_type_index: cursor.read_u16()?,
            },
            ConstantTag::InvokeDynamic => E::InvokeDynamic {
                bootstrap_method_attr_index: cursor.read_u16()?,
                name_and_type_index: cursor.read_u16()?,
            },
            ConstantTag::Module => E::Module {
                name_index: cursor.read_u16()?,
            },
            ConstantTag::Package => E::Package {
                name_index: cursor.read_u16()?,
            },
            ConstantTag::Malformed => unreachable!("Malformed is never a parsed tag byte"),
        })
    }

    /// The number of addressable slots (`pool_count - 1` from the wire).
    #[must_use]
    pub fn len(&self) -> u16 {
        u16::try_from(self.slots.len().saturating_sub(1)).unwrap_or(u16::MAX)
    }

    /// Whether the pool has no addressable entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up the raw entry at `index`.
    ///
    /// # Errors
    /// [`Error::InvalidIndex`] if `index` is 0, out of range, or a ghost
    /// slot.
    pub fn get(&self, index: u16) -> Result<&ConstantPoolEntry, Error> {
        match self.slots.get(usize::from(index)) {
            Some(Slot::Entry(entry)) if index != 0 => Ok(entry),
            _ => Err(Error::InvalidIndex {
                index,
                pool_size: u16::try_from(self.slots.len()).unwrap_or(u16::MAX),
            }),
        }
    }

    /// Resolves `index` to a value of type `T`, following the static
    /// tag mapping `T -> ConstantTag` (`String -> Utf8`, `u32 ->
    /// Integer`, `u64 -> Long`, `f32 -> Float`, `f64 -> Double`), chasing
    /// one level of indirection for `Class`/`String`/`MethodType`/
    /// `Module`/`Package` entries.
    ///
    /// # Errors
    /// [`Error::InvalidIndex`] or [`Error::TagMismatch`].
    pub fn resolve<T: ResolveConstant>(&self, index: u16) -> Result<T, Error> {
        T::resolve(self, index)
    }
}

/// A type that can be produced from a typed [`ConstantPool::resolve`] call.
pub trait ResolveConstant: Sized {
    /// Resolves `index` in `pool` into `Self`.
    ///
    /// # Errors
    /// [`Error::InvalidIndex`] or [`Error::TagMismatch`].
    fn resolve(pool: &ConstantPool, index: u16) -> Result<Self, Error>;
}

fn mismatch(actual: &ConstantPoolEntry, expected: ConstantTag) -> Error {
    Error::TagMismatch {
        expected,
        actual: actual.tag(),
    }
}

impl ResolveConstant for String {
    fn resolve(pool: &ConstantPool, index: u16) -> Result<Self, Error> {
        let entry = pool.get(index)?;
        let utf8_index = match *entry {
            ConstantPoolEntry::Utf8(ref bytes) => {
                return ConstantPoolEntry::decode_utf8(bytes)
                    .map_err(|_| Error::ClassFormat("invalid modified UTF-8 in constant pool"));
            }
            ConstantPoolEntry::Class { name_index }
            | ConstantPoolEntry::String {
                string_index: name_index,
            }
            | ConstantPoolEntry::MethodType {
                descriptor_index: name_index,
            }
            | ConstantPoolEntry::Module { name_index }
            | ConstantPoolEntry::Package { name_index } => name_index,
            _ => return Err(mismatch(entry, ConstantTag::Utf8)),
        };
        String::resolve(pool, utf8_index)
    }
}

impl ResolveConstant for i32 {
    fn resolve(pool: &ConstantPool, index: u16) -> Result<Self, Error> {
        match *pool.get(index)? {
            ConstantPoolEntry::Integer(value) => Ok(value),
            ref other => Err(mismatch(other, ConstantTag::Integer)),
        }
    }
}

impl ResolveConstant for i64 {
    fn resolve(pool: &ConstantPool, index: u16) -> Result<Self, Error> {
        match *pool.get(index)? {
            ConstantPoolEntry::Long(value) => Ok(value),
            ref other => Err(mismatch(other, ConstantTag::Long)),
        }
    }
}

impl ResolveConstant for f32 {
    fn resolve(pool: &ConstantPool, index: u16) -> Result<Self, Error> {
        match *pool.get(index)? {
            ConstantPoolEntry::Float(value) => Ok(value),
            ref other => Err(mismatch(other, ConstantTag::Float)),
        }
    }
}

impl ResolveConstant for f64 {
    fn resolve(pool: &ConstantPool, index: u16) -> Result<Self, Error> {
        match *pool.get(index)? {
            ConstantPoolEntry::Double(value) => Ok(value),
            ref other => Err(mismatch(other, ConstantTag::Double)),
        }
    }
}
