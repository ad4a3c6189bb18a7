//! The fixed header at the start of every package.

use std::io::Cursor;

use binrw::BinRead;
use tracing::instrument;

use crate::error::{Error, Result};

/// Signature every package starts with
pub const MAGIC: [u8; 4] = *b"DBPF";

/// Size of the header, including the signature
pub const HEADER_SIZE: usize = 96;

/// DBPF file header
///
/// Always starts with "DBPF" and is followed by the version, dates and the
/// location of the index table. All data is stored in little endian format.
#[derive(BinRead, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[br(magic = b"DBPF", little)]
pub struct PackageHeader {
    pub major_version: u32,
    pub minor_version: u32,
    pub unknown1: u32,
    pub unknown2: u32,
    pub unknown3: u32,

    /// Creation time in seconds since the unix epoch
    pub created: u32,

    /// Modification time in seconds since the unix epoch
    pub modified: u32,

    pub index_major_version: u32,

    /// Number of records in the index table, deleted ones included
    pub index_entry_count: u32,

    /// Offset of the index table, zero when the 64-bit position is used
    pub index_offset: u32,

    /// Size of the index table in bytes
    pub index_size: u32,

    pub trash_entry_count: u32,
    pub trash_offset: u32,
    pub trash_size: u32,
    pub index_minor_version: u32,

    /// The first eight bytes hold the 64-bit index position
    pub reserved: [u8; 32],
}

impl PackageHeader {
    pub fn signature(&self) -> [u8; 4] {
        MAGIC
    }

    /// `major.minor` format version
    pub fn version(&self) -> String {
        format!("{}.{}", self.major_version, self.minor_version)
    }

    /// `major.minor` index table version
    pub fn index_version(&self) -> String {
        format!("{}.{}", self.index_major_version, self.index_minor_version)
    }

    /// The 64-bit index position stored in the reserved block
    pub fn index_position_long(&self) -> u64 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.reserved[..8]);
        u64::from_le_bytes(bytes)
    }

    /// Where the index table starts
    ///
    /// Packages written by the game leave the 32-bit offset empty and only fill
    /// the 64-bit position.
    pub fn index_position(&self) -> u64 {
        if self.index_offset != 0 {
            self.index_offset as u64
        } else {
            self.index_position_long()
        }
    }
}

/// Read the header from the start of `data`
#[instrument(skip(data), fields(len = data.len()), err)]
pub fn decode_header(data: &[u8]) -> Result<PackageHeader> {
    let found = &data[..data.len().min(MAGIC.len())];
    if found != MAGIC {
        if found.len() < MAGIC.len() && MAGIC.starts_with(found) {
            return Err(Error::Truncated {
                offset: 0,
                wanted: HEADER_SIZE,
                available: data.len(),
            });
        }
        return Err(Error::NotAContainer {
            found: found.to_vec(),
        });
    }

    if data.len() < HEADER_SIZE {
        return Err(Error::Truncated {
            offset: 0,
            wanted: HEADER_SIZE,
            available: data.len(),
        });
    }

    Ok(PackageHeader::read(&mut Cursor::new(&data[..HEADER_SIZE]))?)
}
