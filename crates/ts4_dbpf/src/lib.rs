//! This library handles reading **DBPF** package files used by *The Sims 4*.
//!
//! # DBPF Package Format Documentation
//!
//! A package bundles game resources (tuning, string tables, textures, CAS parts
//! and more) into a single file, typically with the `.package` extension. Each
//! resource is identified by a key made of a 32-bit type, a 32-bit group and a
//! 64-bit instance.
//!
//! ## File Structure
//!
//! A package consists of a fixed header, the resource data and an index table
//! describing where each resource lives.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: 0x46504244 ("DBPF")                               |
//! | 0x0004         | Major Version          | 4 bytes: 2 for The Sims 4                                  |
//! | 0x0008         | Minor Version          | 4 bytes: 1 for The Sims 4                                  |
//! | 0x000C         | Unknown                | 12 bytes                                                   |
//! | 0x0018         | Created                | 4 bytes: seconds since the unix epoch                      |
//! | 0x001C         | Modified               | 4 bytes: seconds since the unix epoch                      |
//! | 0x0020         | Index Major Version    | 4 bytes                                                    |
//! | 0x0024         | Index Entry Count      | 4 bytes: number of index records, deleted ones included    |
//! | 0x0028         | Index Offset           | 4 bytes: start of the index table, 0 when 64-bit is used   |
//! | 0x002C         | Index Size             | 4 bytes: size of the index table                           |
//! | 0x0030         | Trash Entry Count      | 4 bytes                                                    |
//! | 0x0034         | Trash Offset           | 4 bytes                                                    |
//! | 0x0038         | Trash Size             | 4 bytes                                                    |
//! | 0x003C         | Index Minor Version    | 4 bytes                                                    |
//! | 0x0040         | Reserved               | 32 bytes: the first 8 hold the 64-bit index position       |
//!
//! ### Index Table
//!
//! The index table starts with a flags word. Set bits move the type, the group
//! or the high half of the instance into the table preamble, shared by every
//! record. Each record then stores the remaining key fields and:
//!
//! | Field                  | Description                                                     |
//! |------------------------|-----------------------------------------------------------------|
//! | Offset                 | 4 bytes: start of the resource data from the start of the file  |
//! | Size                   | 4 bytes: stored size; the top bit marks extended compression    |
//! | Decompressed Size      | 4 bytes: size once decompressed                                 |
//! | Compression            | 2 bytes, only with the top size bit: compression tag            |
//! | Committed              | 2 bytes, only with the top size bit                             |
//!
//! ### Compression
//!
//! | Tag      | Method                                                              |
//! |----------|---------------------------------------------------------------------|
//! | `0x0000` | None                                                                |
//! | `0x5A42` | Streamable, read as uncompressed                                    |
//! | `0x5A43` | Internal proprietary format, not supported                          |
//! | `0x5A44` | Zlib                                                                |
//! | `0xFFE0` | Deleted record, skipped when reading the index                      |
//!
//! ## Additional Information
//!
//! - **File Extension**: `.package`
//! - **Endianness**: Little-endian for all multi-byte integers
//!

pub mod cache;
pub mod compression;
pub mod cursor;
pub mod entry;
pub mod error;
pub mod header;
pub mod index;
pub mod namemap;
pub mod package;
pub mod query;
pub mod resource_type;
pub mod validate;

pub use compression::CompressionType;
pub use entry::{ResourceEntry, ResourceKey};
pub use namemap::NameMap;
pub use package::{Package, PackageOptions};
pub use query::SearchFilter;
pub use resource_type::ResourceType;
pub use validate::{ValidationIssue, ValidationReport};
