//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

use crate::compression::CompressionType;
use crate::entry::ResourceKey;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// file does not start with the `DBPF` signature
    #[error("not a DBPF package, expected signature \"DBPF\" but found {found:02X?}")]
    #[diagnostic(help("the first four bytes of a package are always 44 42 50 46"))]
    NotAContainer {
        /// The bytes observed where the signature should be
        found: Vec<u8>,
    },

    /// a read ran past the end of the package
    #[error("package is truncated: needed {wanted} bytes at offset {offset} but only {available} remain")]
    Truncated {
        /// Offset the read started at
        offset: usize,
        /// Number of bytes the read needed
        wanted: usize,
        /// Number of bytes left in the buffer from `offset`
        available: usize,
    },

    /// index flags carry bits that are not understood
    #[error("index flags {0:#010X} contain unknown bits")]
    BadFlags(u32),

    /// a resource points outside of the package
    #[error("resource {key} at offset {offset} with size {size} runs past the end of the {available} byte package")]
    OutOfBounds {
        /// The resource being read
        key: ResourceKey,
        /// Start of the resource data
        offset: u32,
        /// On-disk size of the resource data
        size: u32,
        /// Size of the package buffer
        available: usize,
    },

    /// unable to materialize the bytes of a resource
    #[error("unable to read resource {key}")]
    Decompress {
        /// The resource being read
        key: ResourceKey,
        /// Why the data could not be produced
        #[source]
        #[diagnostic_source]
        source: DecompressError,
    },

    /// unable to find requested resource
    #[error("unable to find resource {0}")]
    ResourceNotFound(ResourceKey),

    /// a search pattern is not a valid regular expression
    #[error(transparent)]
    InvalidPattern(#[from] regex::Error),

    /// {0}
    #[error("{0}")]
    CustomError(String),
}

impl Error {
    /// Whether this error is the known gap for the proprietary compression format
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Error::Decompress {
                source: DecompressError::Unsupported(_),
                ..
            }
        )
    }
}

/// Error type to provide further information when a resource cannot be decompressed
#[derive(Error, Diagnostic, Debug)]
pub enum DecompressError {
    /// the compression method has no decoder
    #[error("{0:?} compression is not supported")]
    #[diagnostic(help("resources stored with the internal compression format cannot be read yet"))]
    Unsupported(CompressionType),

    /// the compression tag is not a known method
    #[error("unknown compression tag {0:#06X}")]
    UnknownTag(u16),

    /// the output length differs from the declared decompressed size
    #[error("expected {expected} bytes after decompression but got {actual}")]
    SizeMismatch {
        /// Size declared by the index entry
        expected: usize,
        /// Size actually produced
        actual: usize,
    },

    /// the compressed stream is damaged
    #[error("corrupt compressed stream")]
    Corrupt(#[source] std::io::Error),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
