//! Game version numbers and tracking categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric game version such as `1.16.5`.
///
/// Between two and four components are accepted. Missing trailing components
/// sort before any present value, so `1.21 < 1.21.0 < 1.21.6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameVersion {
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Build (patch) component, if given
    pub build: Option<u32>,
    /// Revision component, if given
    pub revision: Option<u32>,
}

impl GameVersion {
    /// Creates a two-component version.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            build: None,
            revision: None,
        }
    }

    /// Creates a three-component version.
    #[must_use]
    pub const fn with_build(major: u32, minor: u32, build: u32) -> Self {
        Self {
            major,
            minor,
            build: Some(build),
            revision: None,
        }
    }

    /// Parses a dotted numeric version.
    ///
    /// Returns `None` for snapshot names (`24w14a`), pre-releases
    /// (`1.20-pre1`) and anything else that is not purely numeric.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let parts = text
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    None
                } else {
                    part.parse::<u32>().ok()
                }
            })
            .collect::<Option<Vec<u32>>>()?;

        match parts.as_slice() {
            [major, minor] => Some(Self::new(*major, *minor)),
            [major, minor, build] => Some(Self::with_build(*major, *minor, *build)),
            [major, minor, build, revision] => Some(Self {
                major: *major,
                minor: *minor,
                build: Some(*build),
                revision: Some(*revision),
            }),
            _ => None,
        }
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(build) = self.build {
            write!(f, ".{build}")?;
        }
        if let Some(revision) = self.revision {
            write!(f, ".{revision}")?;
        }
        Ok(())
    }
}

/// Completion category being tracked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// Every advancement in a modern version.
    #[default]
    AllAdvancements,
    /// Every achievement in a pre-1.12 version.
    AllAchievements,
    /// Every placeable block.
    AllBlocks,
    /// Any other user-defined category, by display name.
    Other(String),
}

impl Category {
    /// Returns the display name, which is also used in configuration keys.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::AllAdvancements => "All Advancements",
            Self::AllAchievements => "All Achievements",
            Self::AllBlocks => "All Blocks",
            Self::Other(name) => name,
        }
    }

    /// Resolves a display name to a category.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "All Advancements" => Self::AllAdvancements,
            "All Achievements" => Self::AllAchievements,
            "All Blocks" => Self::AllBlocks,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.name().to_string()
    }
}
