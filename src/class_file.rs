//! The top-level `.class` file: version, constant pool, identity,
//! members, and attributes.

use crate::attribute::Attribute;
use crate::constant_pool::{ConstantPool, StrictMode};
use crate::cursor::{ByteCursor, Endianness};
use crate::error::Error;
use crate::member::Member;

const JAVA_CLASS_MAGIC: u32 = 0xCAFE_BABE;

bitflags::bitflags! {
    /// Access and property flags for a class or interface, JVM Specification
    /// §4.1 table 4.1-A.
    ///
    /// Built with [`ClassAccessFlags::from_bits_retain`] rather than the
    /// stricter `from_bits`, so that bits reserved by older JVM versions
    /// but set by a newer or non-conforming compiler survive unexamined
    /// rather than causing parsing to fail.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClassAccessFlags: u16 {
        /// `ACC_PUBLIC`.
        const PUBLIC = 0x0001;
        /// `ACC_FINAL`.
        const FINAL = 0x0010;
        /// `ACC_SUPER`. Set by every compiler since JDK 1.0.2.
        const SUPER = 0x0020;
        /// `ACC_INTERFACE`.
        const INTERFACE = 0x0200;
        /// `ACC_ABSTRACT`.
        const ABSTRACT = 0x0400;
        /// `ACC_SYNTHETIC`.
        const SYNTHETIC = 0x1000;
        /// `ACC_ANNOTATION`.
        const ANNOTATION = 0x2000;
        /// `ACC_ENUM`.
        const ENUM = 0x4000;
        /// `ACC_MODULE`.
        const MODULE = 0x8000;
    }
}

/// The `minor_version`/`major_version` pair from a class file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassVersion {
    /// The major version, e.g. `61` for Java SE 17.
    pub major: u16,
    /// The minor version. Nonzero only for a handful of preview builds.
    pub minor: u16,
}

impl ClassVersion {
    /// Whether this version marks a preview-features class file (minor
    /// version `0xFFFF`, JVM Specification §4.1).
    #[must_use]
    pub const fn is_preview(self) -> bool {
        self.minor == 0xFFFF
    }
}

/// Toggles for how strictly [`ClassFile::parse`] treats recoverable
/// malformations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// When `true`, an unrecognized constant pool tag is a hard error.
    /// When `false` (the default), it is logged and replaced with a
    /// placeholder so parsing can continue.
    pub strict: bool,
}

/// A fully parsed `.class` file.
#[derive(Debug, Clone)]
pub struct ClassFile {
    /// The class file format version.
    pub version: ClassVersion,
    /// The constant pool referenced by every other section below.
    pub constant_pool: ConstantPool,
    /// The raw access flag bits. Unknown bits are preserved; see
    /// [`ClassAccessFlags::from_bits_retain`].
    pub access_flags: u16,
    /// This class's own binary name, e.g. `"java/lang/Object"`.
    pub this_class: String,
    /// The binary name of the superclass, or `None` only for
    /// `java/lang/Object` itself or a `module-info.class`.
    pub super_class: Option<String>,
    /// The binary names of directly implemented/extended interfaces, in
    /// declaration order.
    pub interfaces: Vec<String>,
    /// The class's declared fields, in declaration order.
    pub fields: Vec<Member>,
    /// The class's declared methods, in declaration order.
    pub methods: Vec<Member>,
    /// The class's own attributes, in declaration order.
    pub attributes: Vec<Attribute>,
}

impl ClassFile {
    /// Parses a complete class file from `bytes` with default
    /// (non-strict) [`ParseOptions`].
    ///
    /// # Errors
    /// See [`ClassFile::parse_with_options`].
    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        Self::parse_with_options(bytes, ParseOptions::default())
    }

    /// Parses a complete class file from `bytes`.
    ///
    /// Follows the fixed field order of JVM Specification §4.1: magic,
    /// version, constant pool, access flags, this/super class,
    /// interfaces, fields, methods, attributes. Nothing is committed
    /// until the whole sequence succeeds; any error discards the
    /// partially built value.
    ///
    /// # Errors
    /// [`Error::ClassFormat`] if the magic number doesn't match or a
    /// structural invariant (e.g. a missing superclass on a non-`Object`,
    /// non-module class) is violated; [`Error::EndOfBuffer`] on truncated
    /// input; any error surfaced while resolving constant pool entries.
    pub fn parse_with_options(bytes: &[u8], options: ParseOptions) -> Result<Self, Error> {
        let mut cursor = ByteCursor::new(bytes, Endianness::Big);

        let magic = cursor.read_u32()?;
        if magic != JAVA_CLASS_MAGIC {
            return Err(Error::ClassFormat("invalid magic number"));
        }

        let minor = cursor.read_u16()?;
        let major = cursor.read_u16()?;
        let version = ClassVersion { major, minor };

        let pool_count = cursor.read_u16()?;
        let constant_pool =
            ConstantPool::parse(&mut cursor, pool_count, StrictMode(options.strict))?;

        let access_flags = cursor.read_u16()?;

        let this_index = cursor.read_u16()?;
        let this_class = constant_pool.resolve::<String>(this_index)?;

        let super_index = cursor.read_u16()?;
        let super_class = match super_index {
            0 if this_class == "java/lang/Object" => None,
            0 if ClassAccessFlags::from_bits_retain(access_flags)
                .contains(ClassAccessFlags::MODULE) =>
            {
                None
            }
            0 => return Err(Error::ClassFormat("missing superclass index")),
            index => Some(constant_pool.resolve::<String>(index)?),
        };

        let interface_count = cursor.read_u16()?;
        let mut interfaces = Vec::with_capacity(usize::from(interface_count));
        for _ in 0..interface_count {
            let index = cursor.read_u16()?;
            interfaces.push(constant_pool.resolve::<String>(index)?);
        }

        let fields = Member::parse_table(&mut cursor, &constant_pool)?;
        let methods = Member::parse_table(&mut cursor, &constant_pool)?;
        let attributes = Attribute::parse_table(&mut cursor, &constant_pool)?;

        Ok(Self {
            version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }

    /// The first method with the given name, if any (there may be
    /// several, differing only by descriptor, due to overloading).
    #[must_use]
    pub fn find_method(&self, name: &str) -> Option<&Member> {
        self.methods.iter().find(|method| method.name == name)
    }

    /// The first class-level attribute with the given name, if any.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
    }
}
