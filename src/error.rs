//! The error taxonomy for parsing class files, JARs, and manifests.

use crate::constant_pool::ConstantTag;

/// An error that can occur while ingesting a class file, JAR, or manifest.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The host file could not be opened for reading, or the ZIP central
    /// directory could not be located.
    #[error("Cannot access file at {path}: {reason}")]
    FileInaccessible {
        /// The path that could not be opened.
        path: std::path::PathBuf,
        /// What went wrong, as reported by the underlying I/O or ZIP layer.
        reason: String,
    },
    /// A [`ByteCursor`](crate::cursor::ByteCursor) was asked to read more
    /// bytes than remain in the buffer.
    #[error(
        "End of buffer: requested {requested} bytes, {remaining} remain at position {position}"
    )]
    EndOfBuffer {
        /// The number of bytes requested.
        requested: usize,
        /// The number of bytes actually remaining.
        remaining: usize,
        /// The cursor position at the time of the failed read.
        position: usize,
    },
    /// A well-defined class-file invariant was violated.
    #[error("Malformed class file: {0}")]
    ClassFormat(&'static str),
    /// A constant pool index is out of range, or points at a ghost slot.
    #[error("Invalid constant pool index {index} (pool size {pool_size})")]
    InvalidIndex {
        /// The index that was requested.
        index: u16,
        /// The number of addressable slots in the pool (`pool_count - 1`).
        pool_size: u16,
    },
    /// A typed `resolve` call found an entry whose tag did not match the
    /// expected payload kind.
    #[error("Constant pool tag mismatch: expected {expected:?}, found {actual:?}")]
    TagMismatch {
        /// The tag the caller required.
        expected: ConstantTag,
        /// The tag actually stored at the index.
        actual: ConstantTag,
    },
    /// A manifest line matched no production of the grammar in §4.8.
    #[error("Cannot parse manifest at line {line_no}")]
    ManifestParse {
        /// The 1-based line number of the offending line.
        line_no: usize,
    },
    /// An I/O error that doesn't fit one of the classified cases above
    /// (e.g. a transient failure reading an already-open JAR entry).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
