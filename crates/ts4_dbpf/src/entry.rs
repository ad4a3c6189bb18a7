//! Index entries and the keys that identify them.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::compression::CompressionType;
use crate::error::{DecompressError, Error};
use crate::resource_type::ResourceType;

/// Format a 32-bit value as `0x` followed by 8 upper case hex digits
pub fn hex_u32(value: u32) -> String {
    format!("0x{value:08X}")
}

/// Format a 64-bit value as `0x` followed by 16 upper case hex digits
pub fn hex_u64(value: u64) -> String {
    format!("0x{value:016X}")
}

/// The composite (type, group, instance) key of a resource
///
/// Displays as `0xTTTTTTTT:0xGGGGGGGG:0xIIIIIIIIIIIIIIII` and parses back from
/// that form, with or without the `0x` prefixes.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResourceKey {
    pub type_id: u32,
    pub group: u32,
    pub instance: u64,
}

impl ResourceKey {
    pub const fn new(type_id: u32, group: u32, instance: u64) -> Self {
        Self {
            type_id,
            group,
            instance,
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{:08X}:0x{:08X}:0x{:016X}",
            self.type_id, self.group, self.instance
        )
    }
}

fn parse_hex_part(part: &str) -> Result<u64, Error> {
    let digits = part
        .strip_prefix("0x")
        .or_else(|| part.strip_prefix("0X"))
        .unwrap_or(part);
    u64::from_str_radix(digits, 16)
        .map_err(|e| Error::CustomError(format!("invalid key part {part:?}: {e}")))
}

impl FromStr for ResourceKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.trim().split(':').collect::<Vec<_>>();
        let [type_id, group, instance] = parts.as_slice() else {
            return Err(Error::CustomError(format!(
                "expected a key in the form type:group:instance, got {s:?}"
            )));
        };

        let narrow = |part: &str| -> Result<u32, Error> {
            u32::try_from(parse_hex_part(part)?)
                .map_err(|_| Error::CustomError(format!("key part {part:?} does not fit 32 bits")))
        };

        Ok(ResourceKey {
            type_id: narrow(*type_id)?,
            group: narrow(*group)?,
            instance: parse_hex_part(*instance)?,
        })
    }
}

/// A single live record of the index table
///
/// Two entries compare equal when their keys are equal, whatever their
/// location or compression.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResourceEntry {
    /// Type, group and instance of the resource
    pub key: ResourceKey,
    /// Offset of the resource data from the start of the package
    pub offset: u32,
    /// Size of the resource data in the package
    pub size: u32,
    /// Size of the resource data once decompressed
    pub decompressed_size: u32,
    /// The raw compression tag from the index
    pub compression_tag: u16,
    /// The committed flag from the index
    pub committed: u16,
}

impl ResourceEntry {
    pub fn type_id(&self) -> u32 {
        self.key.type_id
    }

    pub fn group(&self) -> u32 {
        self.key.group
    }

    pub fn instance(&self) -> u64 {
        self.key.instance
    }

    /// Resolve the compression tag into a known method
    pub fn compression(&self) -> Result<CompressionType, DecompressError> {
        CompressionType::try_from(self.compression_tag)
    }

    pub fn is_compressed(&self) -> bool {
        self.compression_tag != CompressionType::Uncompressed.tag()
            && self.compression_tag != CompressionType::DeletedRecord.tag()
    }

    /// Whether the data is streamable compressed, which is read as stored
    pub fn is_streamable(&self) -> bool {
        self.compression_tag == CompressionType::Streamable.tag()
    }

    pub fn is_deleted(&self) -> bool {
        self.compression_tag == CompressionType::DeletedRecord.tag()
    }

    /// The known resource type of this entry, if any
    pub fn resource_type(&self) -> Option<ResourceType> {
        ResourceType::from_id(self.key.type_id)
    }

    /// End offset of the resource data, computed without overflow
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.size as u64
    }
}

impl PartialEq for ResourceEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ResourceEntry {}

impl Hash for ResourceEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for ResourceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.key.fmt(f)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::compression::CompressionType;
    use crate::entry::{hex_u32, hex_u64, ResourceEntry, ResourceKey};
    use crate::error::Result;

    #[test]
    fn key_format() {
        let key = ResourceKey::new(0x0166038C, 0x80000000, 0x00B2D882_0000000F);
        assert_eq!(key.to_string(), "0x0166038C:0x80000000:0x00B2D8820000000F");
        assert_eq!(hex_u32(0xAB), "0x000000AB");
        assert_eq!(hex_u64(0xAB), "0x00000000000000AB");
    }

    #[test]
    fn key_parse() -> Result<()> {
        let key: ResourceKey = "0x0166038C:0x00000000:0x00000000DEADBEEF".parse()?;
        assert_eq!(key, ResourceKey::new(0x0166038C, 0, 0xDEADBEEF));

        let key: ResourceKey = "220557da:1:ffffffffffffffff".parse()?;
        assert_eq!(key, ResourceKey::new(0x220557DA, 1, u64::MAX));

        assert!("0x1:0x2".parse::<ResourceKey>().is_err());
        assert!("0x100000000:0x0:0x0".parse::<ResourceKey>().is_err());
        assert!("zz:0:0".parse::<ResourceKey>().is_err());

        Ok(())
    }

    #[test]
    fn equality_ignores_location() {
        let key = ResourceKey::new(1, 2, 3);
        let first = ResourceEntry {
            key,
            offset: 96,
            size: 10,
            ..Default::default()
        };
        let second = ResourceEntry {
            key,
            offset: 512,
            size: 20,
            compression_tag: CompressionType::Zlib.tag(),
            ..Default::default()
        };
        let other = ResourceEntry {
            key: ResourceKey::new(1, 2, 4),
            ..first.clone()
        };

        assert_eq!(first, second);
        assert!(first != other);
    }

    #[test]
    fn compression_predicates() {
        let mut entry = ResourceEntry::default();
        assert!(!entry.is_compressed());
        assert!(!entry.is_deleted());

        entry.compression_tag = CompressionType::Zlib.tag();
        assert!(entry.is_compressed());

        assert!(!entry.is_streamable());

        entry.compression_tag = CompressionType::Streamable.tag();
        assert!(entry.is_compressed());
        assert!(entry.is_streamable());

        entry.compression_tag = CompressionType::DeletedRecord.tag();
        assert!(!entry.is_compressed());
        assert!(entry.is_deleted());
    }
}
