//! Decoding of the index table.
//!
//! The table starts with a flags word. Each set bit moves one key field out of
//! the records and into the table preamble, where it is stored once for all
//! entries:
//!
//! | Bit | Field stored once                        |
//! |-----|------------------------------------------|
//! | 0   | type                                     |
//! | 1   | group                                    |
//! | 2   | high 32 bits of the instance             |
//!
//! Each record then holds the remaining key fields followed by offset, size
//! and decompressed size. The top bit of the size marks that a compression
//! tag and committed flag follow.

use tracing::{debug, instrument, warn};

use crate::compression::CompressionType;
use crate::cursor::ByteCursor;
use crate::entry::{ResourceEntry, ResourceKey};
use crate::error::{Error, Result};
use crate::header::PackageHeader;

/// Flags word at the start of the index table
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct IndexFlags(u32);

impl IndexFlags {
    pub const CONSTANT_TYPE: u32 = 0x0000_0001;
    pub const CONSTANT_GROUP: u32 = 0x0000_0002;
    pub const CONSTANT_INSTANCE_HIGH: u32 = 0x0000_0004;

    const KNOWN: u32 = Self::CONSTANT_TYPE | Self::CONSTANT_GROUP | Self::CONSTANT_INSTANCE_HIGH;

    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn constant_type(self) -> bool {
        self.0 & Self::CONSTANT_TYPE != 0
    }

    pub const fn constant_group(self) -> bool {
        self.0 & Self::CONSTANT_GROUP != 0
    }

    pub const fn constant_instance_high(self) -> bool {
        self.0 & Self::CONSTANT_INSTANCE_HIGH != 0
    }

    /// Bits this reader does not understand
    pub const fn unknown_bits(self) -> u32 {
        self.0 & !Self::KNOWN
    }
}

/// Top bit of the size field, set when compression metadata follows
const COMPRESSION_PRESENT: u32 = 0x8000_0000;

/// Key fields that are shared by every entry of the table
#[derive(Debug, Default)]
struct SharedKey {
    type_id: Option<u32>,
    group: Option<u32>,
    instance_high: Option<u32>,
}

impl SharedKey {
    fn read(cursor: &mut ByteCursor<'_>, flags: IndexFlags) -> Result<Self> {
        let mut shared = SharedKey::default();
        if flags.constant_type() {
            shared.type_id = Some(cursor.read_u32()?);
        }
        if flags.constant_group() {
            shared.group = Some(cursor.read_u32()?);
        }
        if flags.constant_instance_high() {
            shared.instance_high = Some(cursor.read_u32()?);
        }
        Ok(shared)
    }
}

fn shared_or_read(shared: Option<u32>, cursor: &mut ByteCursor<'_>) -> Result<u32> {
    match shared {
        Some(value) => Ok(value),
        None => cursor.read_u32(),
    }
}

fn read_entry(cursor: &mut ByteCursor<'_>, shared: &SharedKey) -> Result<ResourceEntry> {
    let type_id = shared_or_read(shared.type_id, cursor)?;
    let group = shared_or_read(shared.group, cursor)?;
    let instance_high = shared_or_read(shared.instance_high, cursor)?;
    let instance_low = cursor.read_u32()?;

    let offset = cursor.read_u32()?;
    let size_field = cursor.read_u32()?;
    let decompressed_size = cursor.read_u32()?;

    let (compression_tag, committed) = if size_field & COMPRESSION_PRESENT != 0 {
        (cursor.read_u16()?, cursor.read_u16()?)
    } else {
        (CompressionType::Uncompressed.tag(), 0)
    };

    Ok(ResourceEntry {
        key: ResourceKey {
            type_id,
            group,
            instance: ((instance_high as u64) << 32) | instance_low as u64,
        },
        offset,
        size: size_field & !COMPRESSION_PRESENT,
        decompressed_size,
        compression_tag,
        committed,
    })
}

/// Decode every live entry of the index table
///
/// Deleted records are skipped, everything else is returned in table order.
/// When `strict_flags` is set, unknown flag bits fail with [`Error::BadFlags`]
/// instead of being ignored.
#[instrument(skip(data, header), fields(entries = header.index_entry_count), err)]
pub fn decode_index(
    data: &[u8],
    header: &PackageHeader,
    strict_flags: bool,
) -> Result<Vec<ResourceEntry>> {
    let start = usize::try_from(header.index_position()).unwrap_or(usize::MAX);
    let mut cursor = ByteCursor::new_at(data, start);

    let flags = IndexFlags::new(cursor.read_u32()?);
    if flags.unknown_bits() != 0 {
        if strict_flags {
            return Err(Error::BadFlags(flags.bits()));
        }
        warn!(flags = flags.bits(), "index flags contain unknown bits");
    }

    let shared = SharedKey::read(&mut cursor, flags)?;

    let count = header.index_entry_count as usize;
    let mut entries = Vec::with_capacity(count.min(cursor.remaining() / 16));
    let mut deleted = 0usize;
    for _ in 0..count {
        let entry = read_entry(&mut cursor, &shared)?;
        if entry.is_deleted() {
            deleted += 1;
            continue;
        }
        entries.push(entry);
    }

    let consumed = cursor.position() - start;
    if header.index_size != 0 && consumed != header.index_size as usize {
        warn!(
            consumed,
            declared = header.index_size,
            "index table size differs from the header"
        );
    }
    debug!(live = entries.len(), deleted, "decoded index table");

    Ok(entries)
}
