//! Builds package files in memory for tests and benches.
#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::{write::ZlibEncoder, Compression};
use std::io::Write;
use ts4_dbpf::{CompressionType, ResourceKey};

const HEADER_SIZE: usize = 96;

struct Fixture {
    key: ResourceKey,
    stored: Vec<u8>,
    decompressed_size: u32,
    tag: Option<u16>,
    /// Offset and size written to the index instead of the real location
    location: Option<(u32, u32)>,
}

#[derive(Default)]
pub struct PackageBuilder {
    fixtures: Vec<Fixture>,
    long_index_position: bool,
    created: u32,
    modified: u32,
}

pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// A name map payload holding `names`
pub fn name_map_payload(names: &[(u64, &str)]) -> Vec<u8> {
    let mut data = Vec::new();
    data.write_u32::<LittleEndian>(1).unwrap();
    data.write_i32::<LittleEndian>(names.len() as i32).unwrap();
    for (instance, name) in names {
        data.write_u32::<LittleEndian>(*instance as u32).unwrap();
        data.write_u32::<LittleEndian>((*instance >> 32) as u32).unwrap();
        data.write_u32::<LittleEndian>(name.len() as u32).unwrap();
        data.extend_from_slice(name.as_bytes());
    }
    data
}

impl PackageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dates(mut self, created: u32, modified: u32) -> Self {
        self.created = created;
        self.modified = modified;
        self
    }

    /// Store the index position only in the 64-bit header field
    pub fn long_index_position(mut self) -> Self {
        self.long_index_position = true;
        self
    }

    /// A resource stored as is, without compression metadata in the index
    pub fn uncompressed(mut self, key: ResourceKey, data: &[u8]) -> Self {
        self.fixtures.push(Fixture {
            key,
            stored: data.to_vec(),
            decompressed_size: data.len() as u32,
            tag: None,
            location: None,
        });
        self
    }

    /// A resource deflated with zlib
    pub fn zlib(mut self, key: ResourceKey, data: &[u8]) -> Self {
        self.fixtures.push(Fixture {
            key,
            stored: zlib(data),
            decompressed_size: data.len() as u32,
            tag: Some(CompressionType::Zlib.tag()),
            location: None,
        });
        self
    }

    /// A resource with explicit stored bytes, declared size and compression tag
    pub fn raw(mut self, key: ResourceKey, stored: &[u8], decompressed_size: u32, tag: u16) -> Self {
        self.fixtures.push(Fixture {
            key,
            stored: stored.to_vec(),
            decompressed_size,
            tag: Some(tag),
            location: None,
        });
        self
    }

    /// An index record pointing wherever `offset` and `size` say, with no data behind it
    pub fn located(mut self, key: ResourceKey, offset: u32, size: u32) -> Self {
        self.fixtures.push(Fixture {
            key,
            stored: Vec::new(),
            decompressed_size: size,
            tag: None,
            location: Some((offset, size)),
        });
        self
    }

    /// A deleted index record
    pub fn deleted(mut self, key: ResourceKey) -> Self {
        self.fixtures.push(Fixture {
            key,
            stored: Vec::new(),
            decompressed_size: 0,
            tag: Some(CompressionType::DeletedRecord.tag()),
            location: Some((0, 0)),
        });
        self
    }

    pub fn name_map(self, group: u32, instance: u64, names: &[(u64, &str)]) -> Self {
        let key = ResourceKey::new(0x0166038C, group, instance);
        self.uncompressed(key, &name_map_payload(names))
    }

    pub fn build(&self) -> Vec<u8> {
        let mut body = Vec::new();
        let mut index = Vec::new();
        index.write_u32::<LittleEndian>(0).unwrap();

        for fixture in &self.fixtures {
            let (offset, size) = fixture.location.unwrap_or_else(|| {
                let offset = (HEADER_SIZE + body.len()) as u32;
                body.extend_from_slice(&fixture.stored);
                (offset, fixture.stored.len() as u32)
            });

            index.write_u32::<LittleEndian>(fixture.key.type_id).unwrap();
            index.write_u32::<LittleEndian>(fixture.key.group).unwrap();
            index.write_u32::<LittleEndian>((fixture.key.instance >> 32) as u32).unwrap();
            index.write_u32::<LittleEndian>(fixture.key.instance as u32).unwrap();
            index.write_u32::<LittleEndian>(offset).unwrap();
            match fixture.tag {
                Some(tag) => {
                    index.write_u32::<LittleEndian>(size | 0x8000_0000).unwrap();
                    index.write_u32::<LittleEndian>(fixture.decompressed_size).unwrap();
                    index.write_u16::<LittleEndian>(tag).unwrap();
                    index.write_u16::<LittleEndian>(1).unwrap();
                }
                None => {
                    index.write_u32::<LittleEndian>(size).unwrap();
                    index.write_u32::<LittleEndian>(fixture.decompressed_size).unwrap();
                }
            }
        }

        let index_position = (HEADER_SIZE + body.len()) as u32;
        let mut data = Vec::with_capacity(index_position as usize + index.len());
        data.extend_from_slice(b"DBPF");
        for value in [
            2,
            1,
            0,
            0,
            0,
            self.created,
            self.modified,
            0,
            self.fixtures.len() as u32,
            if self.long_index_position { 0 } else { index_position },
            index.len() as u32,
            0,
            0,
            0,
            3,
        ] {
            data.write_u32::<LittleEndian>(value).unwrap();
        }
        data.write_u64::<LittleEndian>(index_position as u64).unwrap();
        data.extend_from_slice(&[0u8; 24]);
        data.extend_from_slice(&body);
        data.extend_from_slice(&index);
        data
    }
}
