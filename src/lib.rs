#![warn(
    clippy::pedantic,
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms
)]
#![allow(clippy::module_name_repetitions)]

//! A reader for JVM class files and the JAR archives that package them.
//!
//! This crate parses the binary `.class` format (JVM Specification chapter
//! 4) into a fully resolved in-memory model: the constant pool, the class's
//! own identity, its fields and methods, and their attributes. It also reads
//! JAR archives — enumerating entries, streaming class bytes out of them,
//! and parsing `META-INF/MANIFEST.MF`.
//!
//! Bytecode instruction decoding, symbol resolution across classes, and
//! decompilation are out of scope; attribute payloads are kept as opaque
//! bytes for a downstream decoder to interpret.

pub mod attribute;
pub mod class_file;
pub mod constant_pool;
pub mod cursor;
pub mod error;
#[cfg(feature = "jar")]
pub mod jar;
pub mod manifest;
pub mod member;

pub use attribute::Attribute;
pub use class_file::{ClassAccessFlags, ClassFile, ClassVersion, ParseOptions};
pub use constant_pool::{ConstantPool, ConstantPoolEntry, ConstantTag, StrictMode};
pub use cursor::{ByteCursor, Endianness};
pub use error::Error;
#[cfg(feature = "jar")]
pub use jar::Jar;
pub use manifest::Manifest;
pub use member::{FieldAccessFlags, Member, MethodAccessFlags};

#[cfg(test)]
pub(crate) mod test_fixtures;
