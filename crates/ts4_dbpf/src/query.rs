//! Lookup and filtering of the entries of a package.

use bon::Builder;
use regex::{Regex, RegexBuilder};

use crate::entry::{ResourceEntry, ResourceKey};
use crate::error::Result;
use crate::package::Package;
use crate::resource_type::ResourceType;

/// Criteria for [`Package::search`]
///
/// Every criterion that is set must match. Patterns are case-insensitive
/// regular expressions.
///
/// ```
/// use ts4_dbpf::query::SearchFilter;
///
/// let filter = SearchFilter::builder()
///     .type_id(0x220557DA)
///     .name_pattern("^strings_")
///     .build();
/// assert_eq!(filter.group, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct SearchFilter {
    /// Exact resource type
    pub type_id: Option<u32>,

    /// Exact group
    pub group: Option<u32>,

    /// Matched against the instance as lower case hex without prefix and as decimal
    #[builder(into)]
    pub instance_pattern: Option<String>,

    /// Matched against the name the package's name maps give the instance
    #[builder(into)]
    pub name_pattern: Option<String>,
}

fn compile(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

fn instance_matches(pattern: &Regex, instance: u64) -> bool {
    pattern.is_match(&format!("{instance:x}")) || pattern.is_match(&instance.to_string())
}

impl Package {
    /// The entry with exactly this type, group and instance
    pub fn find_exact(&self, type_id: u32, group: u32, instance: u64) -> Option<&ResourceEntry> {
        self.find_by_key(&ResourceKey::new(type_id, group, instance))
    }

    /// The first entry with `key`, in index order
    pub fn find_by_key(&self, key: &ResourceKey) -> Option<&ResourceEntry> {
        self.entries().iter().find(|entry| entry.key == *key)
    }

    /// Every entry of a type, in index order
    pub fn find_by_type(&self, type_id: u32) -> Vec<&ResourceEntry> {
        self.entries()
            .iter()
            .filter(|entry| entry.type_id() == type_id)
            .collect()
    }

    /// Every CAS part entry
    pub fn cas_parts(&self) -> Vec<&ResourceEntry> {
        self.find_by_type(ResourceType::CasPart.id())
    }

    /// Every entry matching all criteria of `filter`, in index order
    ///
    /// Fails with [`crate::error::Error::InvalidPattern`] before looking at any
    /// entry when a pattern does not compile. Entries without a name never match
    /// a name pattern.
    pub fn search(&self, filter: &SearchFilter) -> Result<Vec<&ResourceEntry>> {
        let instance_pattern = filter.instance_pattern.as_deref().map(compile).transpose()?;
        let name_pattern = filter.name_pattern.as_deref().map(compile).transpose()?;
        let names = name_pattern.as_ref().map(|_| self.name_map());

        Ok(self
            .entries()
            .iter()
            .filter(|entry| filter.type_id.map_or(true, |type_id| entry.type_id() == type_id))
            .filter(|entry| filter.group.map_or(true, |group| entry.group() == group))
            .filter(|entry| {
                instance_pattern
                    .as_ref()
                    .map_or(true, |pattern| instance_matches(pattern, entry.instance()))
            })
            .filter(|entry| match (&name_pattern, names) {
                (Some(pattern), Some(names)) => names
                    .name(entry.instance())
                    .is_some_and(|name| pattern.is_match(name)),
                _ => true,
            })
            .collect())
    }
}
