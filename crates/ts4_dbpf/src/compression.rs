//! Resource compression handling.

use std::io::Read;

use flate2::read::ZlibDecoder;
use tracing::{instrument, warn};

use crate::error::DecompressError;

/// Identifies the storage format used for a resource inside the package
///
/// The numeric values are the 16-bit tags stored in the index table.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u16)]
pub enum CompressionType {
    /// Stores the data as it is
    #[default]
    Uncompressed = 0x0000,

    /// Streamable compression, read as if uncompressed
    Streamable = 0x5A42,

    /// The game's own compression format
    InternalProprietary = 0x5A43,

    /// Compressed with Zlib
    Zlib = 0x5A44,

    /// Marks an index entry as removed from the package
    DeletedRecord = 0xFFE0,
}

impl CompressionType {
    /// The raw tag as stored in the index
    pub const fn tag(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for CompressionType {
    type Error = DecompressError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0x0000 => Ok(CompressionType::Uncompressed),
            0x5A42 => Ok(CompressionType::Streamable),
            0x5A43 => Ok(CompressionType::InternalProprietary),
            0x5A44 => Ok(CompressionType::Zlib),
            0xFFE0 => Ok(CompressionType::DeletedRecord),
            other => Err(DecompressError::UnknownTag(other)),
        }
    }
}

/// Second byte of a Zlib tagged resource that actually holds the internal format
const INTERNAL_MARKER: u8 = 0xFB;

/// First byte of every zlib stream written with a 32K window
const ZLIB_CMF: u8 = 0x78;

/// Upper bound of the initial output buffer, as a multiple of the stored size
const MAX_RATIO: usize = 16;

/// Resources tagged as Zlib are sometimes stored with the internal format instead.
fn is_internal_stream(raw: &[u8]) -> bool {
    matches!(raw, [first, INTERNAL_MARKER, ..] if *first != ZLIB_CMF)
}

/// Produce the decompressed bytes of a resource
///
/// The result always has exactly `declared_size` bytes, anything else is
/// reported as [`DecompressError::SizeMismatch`] and the output is dropped.
#[instrument(skip(raw), fields(raw_len = raw.len()), err)]
pub fn decompress(
    raw: &[u8],
    declared_size: usize,
    compression: CompressionType,
) -> Result<Vec<u8>, DecompressError> {
    let data = match compression {
        CompressionType::Uncompressed => raw.to_vec(),
        CompressionType::Zlib if is_internal_stream(raw) => {
            return Err(DecompressError::Unsupported(
                CompressionType::InternalProprietary,
            ));
        }
        CompressionType::Zlib => {
            // one byte past the declared size is enough to report a mismatch
            let mut output = Vec::with_capacity(declared_size.min(raw.len().saturating_mul(MAX_RATIO)));
            ZlibDecoder::new(raw)
                .take(declared_size as u64 + 1)
                .read_to_end(&mut output)
                .map_err(DecompressError::Corrupt)?;
            output
        }
        CompressionType::Streamable => {
            warn!("streamable compression is read as uncompressed data");
            raw.to_vec()
        }
        CompressionType::InternalProprietary | CompressionType::DeletedRecord => {
            return Err(DecompressError::Unsupported(compression));
        }
    };

    if data.len() != declared_size {
        return Err(DecompressError::SizeMismatch {
            expected: declared_size,
            actual: data.len(),
        });
    }

    Ok(data)
}

#[cfg(test)]
mod test {
    use flate2::{write::ZlibEncoder, Compression};
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tracing_test::traced_test;

    use crate::compression::{decompress, CompressionType};
    use crate::error::DecompressError;

    #[rustfmt::skip]
    const HELLO_WORLD_ZLIB: [u8; 19] = [
        0x78, 0x9C, 0xF3, 0x48, 0xCD, 0xC9, 0xC9, 0x57, 0x08, 0xCF,
        0x2F, 0xCA, 0x49, 0x01, 0x00, 0x18, 0x0B, 0x04, 0x1D,
    ];

    #[test]
    fn tag_values() {
        assert_eq!(CompressionType::Uncompressed.tag(), 0x0000);
        assert_eq!(CompressionType::Streamable.tag(), 0x5A42);
        assert_eq!(CompressionType::InternalProprietary.tag(), 0x5A43);
        assert_eq!(CompressionType::Zlib.tag(), 0x5A44);
        assert_eq!(CompressionType::DeletedRecord.tag(), 0xFFE0);

        assert!(matches!(
            CompressionType::try_from(0x1234),
            Err(DecompressError::UnknownTag(0x1234))
        ));
    }

    #[test]
    fn uncompressed_is_passthrough() -> Result<(), DecompressError> {
        let data = decompress(b"Hello World", 11, CompressionType::Uncompressed)?;
        assert_eq!(data, b"Hello World");
        Ok(())
    }

    #[test]
    fn inflate_zlib() -> Result<(), DecompressError> {
        let data = decompress(&HELLO_WORLD_ZLIB, 11, CompressionType::Zlib)?;
        assert_eq!(data, b"Hello World");
        Ok(())
    }

    #[test]
    fn zlib_size_mismatch() {
        let result = decompress(&HELLO_WORLD_ZLIB, 12, CompressionType::Zlib);
        assert!(matches!(
            result,
            Err(DecompressError::SizeMismatch {
                expected: 12,
                actual: 11
            })
        ));
    }

    #[test]
    fn zlib_stops_after_declared_size() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(&vec![0u8; 16 * 1024 * 1024]).unwrap();
        let input = encoder.finish().unwrap();

        let result = decompress(&input, 11, CompressionType::Zlib);
        assert!(matches!(
            result,
            Err(DecompressError::SizeMismatch {
                expected: 11,
                actual: 12
            })
        ));
    }

    #[test]
    fn corrupt_zlib() {
        // valid zlib header followed by a deflate block with the reserved type
        let input = [0x78, 0x9C, 0xFF, 0xFF, 0xFF, 0xFF];

        let result = decompress(&input, 11, CompressionType::Zlib);
        assert!(matches!(result, Err(DecompressError::Corrupt(_))));
    }

    #[test]
    fn internal_marker_under_zlib_tag_is_unsupported() {
        let input = [0x10, 0xFB, 0x00, 0x00, 0x0B, 0x48, 0x65];

        let result = decompress(&input, 11, CompressionType::Zlib);
        assert!(matches!(
            result,
            Err(DecompressError::Unsupported(
                CompressionType::InternalProprietary
            ))
        ));
    }

    #[test]
    fn internal_compression_is_never_fabricated() {
        for input in [&b""[..], &b"Hello World"[..], &HELLO_WORLD_ZLIB[..]] {
            let result = decompress(input, input.len(), CompressionType::InternalProprietary);
            assert!(matches!(
                result,
                Err(DecompressError::Unsupported(
                    CompressionType::InternalProprietary
                ))
            ));
        }
    }

    #[traced_test]
    #[test]
    fn streamable_warns() -> Result<(), DecompressError> {
        let data = decompress(b"Hello World", 11, CompressionType::Streamable)?;
        assert_eq!(data, b"Hello World");
        assert!(logs_contain("streamable compression"));
        Ok(())
    }
}
