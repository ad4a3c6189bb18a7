//! Statistics and structural checks over a decoded package.

use indexmap::IndexMap;
use std::fmt;
use tracing::{instrument, warn};

use crate::entry::ResourceKey;
use crate::package::Package;
use crate::resource_type::type_name;

/// Number of entries [`Package::validate`] decompresses unless configured otherwise
pub const DEFAULT_VALIDATION_SAMPLE: usize = 5;

/// Count and stored size of the entries of one type
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TypeStats {
    pub name: &'static str,
    pub count: usize,
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PackageStats {
    pub total_resources: usize,
    pub package_size: usize,
    /// Sum of the stored sizes of every entry
    pub data_size: u64,
    /// Per type figures in the order types are first seen in the index
    pub by_type: IndexMap<u32, TypeStats>,
}

/// A problem found by [`Package::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ValidationIssue {
    /// The data of an entry runs past the end of the package
    OutOfBounds {
        key: ResourceKey,
        offset: u32,
        size: u32,
        package_size: usize,
    },
    /// Entries with a zero offset or a zero size
    ZeroOffsetOrSize { count: usize },
    /// Sampled entries whose data could not be produced
    DecompressionFailures { count: usize, sampled: usize },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::OutOfBounds {
                key,
                offset,
                size,
                package_size,
            } => write!(
                f,
                "resource {key} extends beyond file bounds (offset {offset}, size {size}, file size {package_size})"
            ),
            ValidationIssue::ZeroOffsetOrSize { count } => {
                write!(f, "found {count} entries with invalid offset/size")
            }
            ValidationIssue::DecompressionFailures { count, sampled } => {
                write!(f, "{count} of {sampled} sampled resources failed to decompress")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ValidationSummary {
    pub total_resources: usize,
    pub invalid_entries: usize,
    pub decompression_errors: usize,
    pub package_size: usize,
}

/// Outcome of [`Package::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ValidationReport {
    /// True when no issue was found
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
    /// Observations that do not make the package invalid
    pub warnings: Vec<String>,
    pub summary: ValidationSummary,
}

impl ValidationReport {
    /// Issues about entries running past the end of the package
    pub fn bounds_violations(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|issue| matches!(issue, ValidationIssue::OutOfBounds { .. }))
    }
}

impl Package {
    /// Entry counts and sizes, per type and overall
    pub fn stats(&self) -> PackageStats {
        let mut by_type: IndexMap<u32, TypeStats> = IndexMap::new();
        let mut data_size = 0u64;

        for entry in self.entries() {
            data_size += entry.size as u64;

            let stats = by_type.entry(entry.type_id()).or_insert_with(|| TypeStats {
                name: type_name(entry.type_id()),
                count: 0,
                bytes: 0,
            });
            stats.count += 1;
            stats.bytes += entry.size as u64;
        }

        PackageStats {
            total_resources: self.len(),
            package_size: self.data().len(),
            data_size,
            by_type,
        }
    }

    /// Check the entries against the package and try to read a sample of them
    ///
    /// Never fails: every problem ends up in the report. A package without
    /// entries is valid and only gets a warning.
    #[instrument(skip(self), fields(entries = self.len()))]
    pub fn validate(&self) -> ValidationReport {
        let package_size = self.data().len();
        let mut issues = Vec::new();
        let mut warnings = Vec::new();

        if self.is_empty() {
            warnings.push("package contains no resources".to_string());
        }

        let invalid_entries = self
            .entries()
            .iter()
            .filter(|entry| entry.offset == 0 || entry.size == 0)
            .count();
        if invalid_entries > 0 {
            issues.push(ValidationIssue::ZeroOffsetOrSize {
                count: invalid_entries,
            });
        }

        issues.extend(
            self.entries()
                .iter()
                .filter(|entry| entry.end() > package_size as u64)
                .map(|entry| ValidationIssue::OutOfBounds {
                    key: entry.key,
                    offset: entry.offset,
                    size: entry.size,
                    package_size,
                }),
        );

        let sample = &self.entries()[..self.len().min(self.options().validation_sample)];
        let mut decompression_errors = 0;
        // out of bounds entries are already reported above
        for entry in sample.iter().filter(|e| e.end() <= package_size as u64) {
            if let Err(error) = self.get_bytes(entry) {
                warn!(%entry, %error, "sampled resource failed to decompress");
                decompression_errors += 1;
            }
        }
        if decompression_errors > 0 {
            issues.push(ValidationIssue::DecompressionFailures {
                count: decompression_errors,
                sampled: sample.len(),
            });
        }

        ValidationReport {
            valid: issues.is_empty(),
            issues,
            warnings,
            summary: ValidationSummary {
                total_resources: self.len(),
                invalid_entries,
                decompression_errors,
                package_size,
            },
        }
    }
}
