//! Pinned objectives.
//!
//! Users pin a short list of complex objectives (wither skulls, trident, ...)
//! per category and game version. Lists are stored under keys of the form
//! `"{category} {version}"`, optionally followed by a revision suffix
//! `" v2"`, `" v3"`, ... which lets a shipped default be replaced without
//! invalidating keys saved by older releases.

use aatrack_common::{Category, GameVersion, TrackerError, TrackerResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Pinnable objectives for All Advancements (and any other category).
pub const ALL_ADVANCEMENTS: &[&str] = &[
    "EGap",
    "Trident",
    "NautilusShells",
    "WitherSkulls",
    "AncientDebris",
    "GoldBlocks",
    "Bees",
    "Sniffers",
    "Cats",
    "Foods",
    "Animals",
    "Monsters",
    "Biomes",
    "Cauldrons",
    "ArmorTrims",
    "HeavyCore",
];

/// Pinnable objectives for All Blocks.
pub const ALL_BLOCKS: &[&str] = &[
    "Trident",
    "NautilusShells",
    "ShulkerShells",
    "WitherSkulls",
    "AncientDebris",
    "DeepslateEmerald",
    "SculkBlocks",
    "Mycelium",
    "RedSand",
    "Bees",
    "HeavyCore",
];

/// Pinnable objectives for All Achievements.
pub const ALL_ACHIEVEMENTS: &[&str] = &["EGap", "WitherSkulls", "GoldBlocks", "Biomes"];

/// Version requirement of a pinnable objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionGate {
    /// Available from this version on. Snapshots always pass.
    Since(GameVersion),
    /// Available in exactly this version. Snapshots never pass.
    Only(GameVersion),
}

impl VersionGate {
    /// Checks the gate against a parsed version, `None` meaning a snapshot.
    #[must_use]
    pub fn allows(&self, version: Option<GameVersion>) -> bool {
        match (self, version) {
            (Self::Since(min), Some(current)) => current >= *min,
            (Self::Since(_), None) => true,
            (Self::Only(exact), Some(current)) => current == *exact,
            (Self::Only(_), None) => false,
        }
    }
}

/// Feature gates applied to every category's base list.
pub const VERSION_GATES: &[(&str, VersionGate)] = &[
    ("HeavyCore", VersionGate::Since(GameVersion::new(1, 21))),
    ("ArmorTrims", VersionGate::Since(GameVersion::new(1, 20))),
    ("Sniffers", VersionGate::Since(GameVersion::new(1, 20))),
    ("SculkBlocks", VersionGate::Since(GameVersion::new(1, 19))),
    ("Cauldrons", VersionGate::Only(GameVersion::new(1, 17))),
    ("DeepslateEmerald", VersionGate::Since(GameVersion::new(1, 17))),
    ("AncientDebris", VersionGate::Since(GameVersion::new(1, 16))),
    ("Bees", VersionGate::Since(GameVersion::new(1, 15))),
    ("Cats", VersionGate::Since(GameVersion::new(1, 14))),
    ("Trident", VersionGate::Since(GameVersion::new(1, 13))),
    ("NautilusShells", VersionGate::Since(GameVersion::new(1, 13))),
];

/// Base list of pinnable objectives for a category, before version gating.
#[must_use]
pub fn base_list(category: &Category) -> &'static [&'static str] {
    match category {
        Category::AllBlocks => ALL_BLOCKS,
        Category::AllAchievements => ALL_ACHIEVEMENTS,
        Category::AllAdvancements | Category::Other(_) => ALL_ADVANCEMENTS,
    }
}

/// Every objective that can be pinned in `category` on `version`.
///
/// Versions that do not parse are treated as the latest snapshot.
#[must_use]
pub fn get_all_available(category: &Category, version: &str) -> Vec<&'static str> {
    let parsed = GameVersion::parse(version);
    base_list(category)
        .iter()
        .copied()
        .filter(|name| {
            VERSION_GATES
                .iter()
                .filter(|(feature, _)| feature == name)
                .all(|(_, gate)| gate.allows(parsed))
        })
        .collect()
}

/// Resolves the storage key for a category and version.
///
/// Probes `v2`, `v3`, ... until the first missing revision and returns the
/// last one found, or the unrevisioned key if there is none.
#[must_use]
pub fn resolve_key(category: &str, version: &str, exists: impl Fn(&str) -> bool) -> String {
    let base = format!("{category} {version}");
    (2u32..)
        .map(|revision| format!("{base} v{revision}"))
        .take_while(|key| exists(key.as_str()))
        .last()
        .unwrap_or(base)
}

/// Anything that can supply the name of a pinned objective.
pub trait PinFrame {
    /// Short name of the pinned objective. May be blank.
    fn objective_name(&self) -> &str;
}

impl PinFrame for &str {
    fn objective_name(&self) -> &str {
        self
    }
}

impl PinFrame for String {
    fn objective_name(&self) -> &str {
        self
    }
}

/// Pinned objective lists keyed by category and version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedObjectiveSet {
    /// Ordered short-names by key.
    #[serde(rename = "Pinned", default)]
    pub pinned: BTreeMap<String, Vec<String>>,
}

impl Default for PinnedObjectiveSet {
    fn default() -> Self {
        let pinned = DEFAULT_PINS
            .iter()
            .map(|(key, names)| {
                (
                    (*key).to_string(),
                    names.iter().map(|n| (*n).to_string()).collect(),
                )
            })
            .collect();
        Self { pinned }
    }
}

impl PinnedObjectiveSet {
    /// Creates a set without any lists.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            pinned: BTreeMap::new(),
        }
    }

    /// Parses saved lists and layers them over the shipped defaults.
    ///
    /// Saved keys replace defaults with the same key; defaults the user never
    /// touched (including newer revisions) stay available.
    pub fn from_json(text: &str) -> TrackerResult<Self> {
        let saved: Self =
            serde_json::from_str(text).map_err(|e| TrackerError::Serialization(e.to_string()))?;
        let mut set = Self::default();
        set.pinned.extend(saved.pinned);
        Ok(set)
    }

    /// Serializes all lists.
    pub fn to_json(&self) -> TrackerResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TrackerError::Serialization(e.to_string()))
    }

    /// Storage key for a category and version, honouring revisions.
    #[must_use]
    pub fn get_key(&self, category: &str, version: &str) -> String {
        resolve_key(category, version, |key| self.pinned.contains_key(key))
    }

    /// The pinned list for a category and version, if one exists.
    #[must_use]
    pub fn try_get_current_list(&self, category: &Category, version: &str) -> Option<&[String]> {
        let key = self.get_key(category.name(), version);
        self.pinned.get(&key).map(Vec::as_slice)
    }

    /// Replaces the pinned list for a category and version.
    ///
    /// Blank names are skipped. Returns `true` only when the resulting
    /// sequence differs from the stored one; a missing list counts as
    /// different.
    pub fn try_set_current_list<F: PinFrame>(
        &mut self,
        category: &Category,
        version: &str,
        frames: &[F],
    ) -> bool {
        let names: Vec<String> = frames
            .iter()
            .map(PinFrame::objective_name)
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string)
            .collect();

        let key = self.get_key(category.name(), version);
        if self.pinned.get(&key) == Some(&names) {
            return false;
        }
        debug!("Pinned objectives for '{key}' changed: {names:?}");
        self.pinned.insert(key, names);
        true
    }
}

/// A [`PinnedObjectiveSet`] bound to the file it is persisted in.
#[derive(Debug, Clone)]
pub struct PinnedStore {
    path: PathBuf,
    set: PinnedObjectiveSet,
}

impl PinnedStore {
    /// Loads pinned lists from `path`, falling back to defaults if it is missing.
    pub fn load(path: impl Into<PathBuf>) -> TrackerResult<Self> {
        let path = path.into();
        let set = if path.exists() {
            let text = fs::read_to_string(&path)?;
            let set = PinnedObjectiveSet::from_json(&text)?;
            info!("Pinned objectives loaded from {}", path.display());
            set
        } else {
            info!("Pinned objectives file not found, using defaults");
            PinnedObjectiveSet::default()
        };
        Ok(Self { path, set })
    }

    /// Wraps an in-memory set.
    #[must_use]
    pub fn with_set(path: impl Into<PathBuf>, set: PinnedObjectiveSet) -> Self {
        Self {
            path: path.into(),
            set,
        }
    }

    /// File backing this store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The underlying lists.
    #[must_use]
    pub fn set(&self) -> &PinnedObjectiveSet {
        &self.set
    }

    /// See [`PinnedObjectiveSet::try_get_current_list`].
    #[must_use]
    pub fn current_list(&self, category: &Category, version: &str) -> Option<&[String]> {
        self.set.try_get_current_list(category, version)
    }

    /// Updates the current list and saves when it changed.
    pub fn set_current_list<F: PinFrame>(
        &mut self,
        category: &Category,
        version: &str,
        frames: &[F],
    ) -> TrackerResult<bool> {
        let changed = self.set.try_set_current_list(category, version, frames);
        if changed {
            self.save()?;
        }
        Ok(changed)
    }

    /// Writes every list to disk.
    pub fn save(&self) -> TrackerResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, self.set.to_json()?)?;
        info!("Pinned objectives saved to {}", self.path.display());
        Ok(())
    }
}

/// Lists shipped with the tracker.
const DEFAULT_PINS: &[(&str, &[&str])] = &[
    (
        "All Advancements 1.21.6",
        &["WitherSkulls", "NautilusShells", "Trident", "HeavyCore", "Sniffers", "ArmorTrims"],
    ),
    (
        "All Advancements 1.21 v2",
        &["WitherSkulls", "NautilusShells", "Trident", "HeavyCore", "Sniffers", "ArmorTrims"],
    ),
    (
        "All Advancements 1.21",
        &["WitherSkulls", "NautilusShells", "Trident", "Sniffers", "ArmorTrims"],
    ),
    (
        "All Advancements 1.20.5",
        &["WitherSkulls", "NautilusShells", "Trident", "Sniffers", "ArmorTrims"],
    ),
    (
        "All Advancements 1.20 v2",
        &["WitherSkulls", "NautilusShells", "Trident", "Sniffers", "ArmorTrims"],
    ),
    (
        "All Advancements 1.20",
        &["AncientDebris", "WitherSkulls", "NautilusShells", "Trident", "EGap", "ArmorTrims"],
    ),
    (
        "All Advancements 1.19",
        &["AncientDebris", "WitherSkulls", "NautilusShells", "Trident", "EGap"],
    ),
    (
        "All Advancements 1.18",
        &["AncientDebris", "WitherSkulls", "NautilusShells", "Trident", "EGap"],
    ),
    (
        "All Advancements 1.17",
        &["Cauldrons", "AncientDebris", "WitherSkulls", "NautilusShells", "Trident", "EGap"],
    ),
    (
        "All Advancements 1.16.5",
        &["AncientDebris", "WitherSkulls", "NautilusShells", "Trident", "EGap"],
    ),
    (
        "All Advancements 1.16",
        &["AncientDebris", "WitherSkulls", "NautilusShells", "Trident", "EGap"],
    ),
    (
        "All Advancements 1.15",
        &["GoldBlocks", "WitherSkulls", "NautilusShells", "Trident", "EGap"],
    ),
    (
        "All Advancements 1.14",
        &["Cats", "GoldBlocks", "WitherSkulls", "NautilusShells", "Trident", "EGap"],
    ),
    (
        "All Advancements 1.13",
        &["GoldBlocks", "WitherSkulls", "NautilusShells", "Trident", "EGap"],
    ),
    (
        "All Advancements 1.12",
        &["GoldBlocks", "WitherSkulls", "Monsters", "Biomes", "EGap"],
    ),
    (
        "All Achievements 1.11",
        &["GoldBlocks", "WitherSkulls", "Biomes", "EGap"],
    ),
    (
        "All Blocks 1.21",
        &["DeepslateEmerald", "HeavyCore", "WitherSkulls", "ShulkerShells", "NautilusShells", "Trident"],
    ),
    (
        "All Blocks 1.20",
        &["AncientDebris", "DeepslateEmerald", "WitherSkulls", "ShulkerShells", "NautilusShells", "Trident"],
    ),
    (
        "All Blocks 1.19",
        &["AncientDebris", "DeepslateEmerald", "WitherSkulls", "ShulkerShells", "NautilusShells", "Trident"],
    ),
    (
        "All Blocks 1.18",
        &["AncientDebris", "DeepslateEmerald", "WitherSkulls", "ShulkerShells", "NautilusShells", "Trident"],
    ),
    (
        "All Blocks 1.16",
        &["AncientDebris", "Mycelium", "WitherSkulls", "ShulkerShells", "NautilusShells", "Trident"],
    ),
];
