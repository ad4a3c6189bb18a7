//! Types for reading DBPF packages
//!

use bon::Builder;
use std::{
    fmt::{self, Debug},
    fs::File,
    io::Read,
    path::Path,
    sync::{Arc, OnceLock},
};
use tracing::{instrument, warn};

use crate::{
    cache::{CacheStats, ResourceCache},
    compression::decompress,
    entry::{hex_u32, hex_u64, ResourceEntry, ResourceKey},
    error::{Error, Result},
    header::{decode_header, PackageHeader},
    index::decode_index,
    namemap::{decode_name_map, NameMap},
    resource_type::{type_name, ResourceType},
    validate::{PackageStats, TypeStats, DEFAULT_VALIDATION_SAMPLE},
};

/// Options controlling how a package is opened and checked
///
/// ```
/// use ts4_dbpf::package::PackageOptions;
///
/// let options = PackageOptions::builder()
///     .strict_index_flags(true)
///     .validation_sample(10)
///     .build();
/// assert!(options.strict_index_flags);
/// ```
#[derive(Debug, Clone, Copy, Builder)]
pub struct PackageOptions {
    /// Fail on index flag bits this reader does not know instead of ignoring them
    #[builder(default)]
    pub strict_index_flags: bool,

    /// How many entries [`Package::validate`] fully decompresses
    #[builder(default = DEFAULT_VALIDATION_SAMPLE)]
    pub validation_sample: usize,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A resource as presented to consumers, with readable names and hex keys
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResourceInfo {
    pub key: ResourceKey,
    pub type_name: &'static str,
    pub type_hex: String,
    pub group_hex: String,
    pub instance_hex: String,
    pub offset: u32,
    pub size: u32,
    pub decompressed_size: u32,
    pub compressed: bool,
    /// Streamable data is returned as stored, without decompression
    pub streamable: bool,
}

impl From<&ResourceEntry> for ResourceInfo {
    fn from(entry: &ResourceEntry) -> Self {
        Self {
            key: entry.key,
            type_name: type_name(entry.type_id()),
            type_hex: hex_u32(entry.type_id()),
            group_hex: hex_u32(entry.group()),
            instance_hex: hex_u64(entry.instance()),
            offset: entry.offset,
            size: entry.size,
            decompressed_size: entry.decompressed_size,
            compressed: entry.is_compressed(),
            streamable: entry.is_streamable(),
        }
    }
}

/// Summary of a package
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PackageInfo {
    pub version: String,
    pub index_version: String,
    /// Creation time in seconds since the unix epoch
    pub created: u32,
    /// Modification time in seconds since the unix epoch
    pub modified: u32,
    pub total_resources: usize,
    pub package_size: usize,
    pub name_map_count: usize,
    pub cas_part_count: usize,
    /// Whether any resource is stored compressed
    pub compressed: bool,
    pub by_type: indexmap::IndexMap<u32, TypeStats>,
}

/// DBPF package reader
///
/// The whole file is held in memory. Header and index are decoded when the
/// package is opened; resource data is decompressed on first access and kept
/// in a cache until [`Package::clear_cache`].
///
/// ```no_run
/// fn list_package_contents(path: &str) -> ts4_dbpf::error::Result<()> {
///     let package = ts4_dbpf::Package::open(path)?;
///
///     for entry in package.entries() {
///         let data = package.get_bytes(entry)?;
///         println!("{entry}: {} bytes", data.len());
///     }
///
///     Ok(())
/// }
/// ```
pub struct Package {
    data: Vec<u8>,
    header: PackageHeader,
    entries: Vec<ResourceEntry>,
    cache: ResourceCache,
    names: OnceLock<NameMap>,
    options: PackageOptions,
}

impl Debug for Package {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Package")
            .field("size", &self.data.len())
            .field("header", &self.header)
            .field("entries", &self.entries.len())
            .field("cache", &self.cache.stats())
            .finish()
    }
}

impl Package {
    /// Read a package file from disk
    pub fn open(path: impl AsRef<Path>) -> Result<Package> {
        Self::open_with_options(path, PackageOptions::default())
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()), err)]
    pub fn open_with_options(path: impl AsRef<Path>, options: PackageOptions) -> Result<Package> {
        let file = File::open(path.as_ref())?;
        Self::from_reader_with_options(file, options)
    }

    /// Read a package from any reader, consuming it to the end
    pub fn from_reader(reader: impl Read) -> Result<Package> {
        Self::from_reader_with_options(reader, PackageOptions::default())
    }

    pub fn from_reader_with_options(mut reader: impl Read, options: PackageOptions) -> Result<Package> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(data, options)
    }

    /// Decode a package already in memory
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Result<Package> {
        Self::from_bytes_with_options(data, PackageOptions::default())
    }

    pub fn from_bytes_with_options(data: impl Into<Vec<u8>>, options: PackageOptions) -> Result<Package> {
        let data = data.into();
        let header = decode_header(&data)?;
        let entries = decode_index(&data, &header, options.strict_index_flags)?;

        Ok(Package {
            data,
            header,
            entries,
            cache: ResourceCache::new(),
            names: OnceLock::new(),
            options,
        })
    }

    pub fn header(&self) -> &PackageHeader {
        &self.header
    }

    /// Live entries in index order
    pub fn entries(&self) -> &[ResourceEntry] {
        &self.entries
    }

    /// Number of live entries contained in this package
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this package contains no live entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The raw package bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn options(&self) -> &PackageOptions {
        &self.options
    }

    /// Every live entry with readable names and hex keys
    pub fn resources(&self) -> Vec<ResourceInfo> {
        self.entries.iter().map(ResourceInfo::from).collect()
    }

    /// The stored bytes of an entry, before any decompression
    pub fn raw_bytes(&self, entry: &ResourceEntry) -> Result<&[u8]> {
        let start = entry.offset as usize;
        let end = entry.end();
        if end > self.data.len() as u64 {
            return Err(Error::OutOfBounds {
                key: entry.key,
                offset: entry.offset,
                size: entry.size,
                available: self.data.len(),
            });
        }
        Ok(&self.data[start..end as usize])
    }

    fn materialize(&self, entry: &ResourceEntry) -> Result<Vec<u8>> {
        let raw = self.raw_bytes(entry)?;
        if !entry.is_compressed() {
            return Ok(raw.to_vec());
        }

        entry
            .compression()
            .and_then(|compression| {
                decompress(raw, entry.decompressed_size as usize, compression)
            })
            .map_err(|source| Error::Decompress {
                key: entry.key,
                source,
            })
    }

    /// The decompressed data of an entry
    ///
    /// The first call decompresses and caches the data, later calls for the same
    /// key return the cached buffer. Failures are local to the entry and are not
    /// cached.
    pub fn get_bytes(&self, entry: &ResourceEntry) -> Result<Arc<[u8]>> {
        self.cache
            .get_or_try_insert(entry.key, || self.materialize(entry))
    }

    /// The decompressed data of the entry with `key`
    pub fn get_bytes_by_key(&self, key: &ResourceKey) -> Result<Arc<[u8]>> {
        let entry = self
            .find_by_key(key)
            .ok_or(Error::ResourceNotFound(*key))?;
        self.get_bytes(entry)
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop all cached resource data
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Names of instances, merged from every name map resource in the package
    ///
    /// Later name maps replace names from earlier ones. Name maps that cannot be
    /// read are skipped with a warning. Built on first use.
    pub fn name_map(&self) -> &NameMap {
        self.names.get_or_init(|| self.build_name_map())
    }

    fn build_name_map(&self) -> NameMap {
        let mut names = NameMap::default();
        for entry in self.find_by_type(ResourceType::NameMap.id()) {
            match self.get_bytes(entry) {
                Ok(data) => names.merge(decode_name_map(&data)),
                Err(error) => warn!(%entry, %error, "skipping unreadable name map"),
            }
        }
        names
    }

    /// Summary of the package, its dates and contents
    pub fn info(&self) -> PackageInfo {
        let PackageStats {
            total_resources,
            package_size,
            by_type,
            ..
        } = self.stats();

        PackageInfo {
            version: self.header.version(),
            index_version: self.header.index_version(),
            created: self.header.created,
            modified: self.header.modified,
            total_resources,
            package_size,
            name_map_count: self.name_map().len(),
            cas_part_count: self.cas_parts().len(),
            compressed: self.entries.iter().any(ResourceEntry::is_compressed),
            by_type,
        }
    }
}
