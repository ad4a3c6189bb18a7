//! Known resource type ids.

use std::fmt;

/// Resource types with a known name
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u32)]
pub enum ResourceType {
    StringTable = 0x220557DA,
    CasPart = 0x034AEECB,
    SimData = 0x545AC67A,
    Tuning = 0x62E94D38,
    Dds = 0x00B2D882,
    Dst = 0x00B552EA,
    /// Maps instance ids to names, see [`crate::namemap`]
    NameMap = 0x0166038C,
}

impl ResourceType {
    pub const ALL: [ResourceType; 7] = [
        ResourceType::StringTable,
        ResourceType::CasPart,
        ResourceType::SimData,
        ResourceType::Tuning,
        ResourceType::Dds,
        ResourceType::Dst,
        ResourceType::NameMap,
    ];

    pub const fn id(self) -> u32 {
        self as u32
    }

    pub const fn from_id(id: u32) -> Option<ResourceType> {
        match id {
            0x220557DA => Some(ResourceType::StringTable),
            0x034AEECB => Some(ResourceType::CasPart),
            0x545AC67A => Some(ResourceType::SimData),
            0x62E94D38 => Some(ResourceType::Tuning),
            0x00B2D882 => Some(ResourceType::Dds),
            0x00B552EA => Some(ResourceType::Dst),
            0x0166038C => Some(ResourceType::NameMap),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ResourceType::StringTable => "StringTable",
            ResourceType::CasPart => "CasPart",
            ResourceType::SimData => "SimData",
            ResourceType::Tuning => "Tuning",
            ResourceType::Dds => "DDS",
            ResourceType::Dst => "DST",
            ResourceType::NameMap => "NameMap",
        }
    }

    /// Look a type up by its name, ignoring case
    pub fn from_name(name: &str) -> Option<ResourceType> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }
}

/// Human readable name of a type id, `"Unknown"` when it is not in the table
pub fn type_name(id: u32) -> &'static str {
    ResourceType::from_id(id).map_or("Unknown", ResourceType::name)
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test {
    use crate::resource_type::{type_name, ResourceType};

    #[test]
    fn table_is_bidirectional() {
        for t in ResourceType::ALL {
            assert_eq!(ResourceType::from_id(t.id()), Some(t));
            assert_eq!(ResourceType::from_name(t.name()), Some(t));
        }
    }

    #[test]
    fn unknown_types() {
        assert_eq!(type_name(0x0166038C), "NameMap");
        assert_eq!(type_name(0xDEADBEEF), "Unknown");
        assert_eq!(ResourceType::from_name("dds"), Some(ResourceType::Dds));
        assert_eq!(ResourceType::from_name("nope"), None);
    }
}
