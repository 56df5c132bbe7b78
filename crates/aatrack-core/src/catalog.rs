//! Advancement catalog and the per-tick aggregation pass.
//!
//! The catalog is built once from static game data (a RON manifest) and owns
//! every [`Advancement`]. Each tick, [`AdvancementCatalog::update_states`]
//! walks one [`WorldState`] through every advancement and criteria set.

use crate::criteria::TrackingMode;
use crate::objective::{Advancement, Criterion, Objective, ObjectiveKey};
use crate::world_state::{CriterionKey, WorldState};
use aatrack_common::{TrackerError, TrackerResult, Uuid};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// A criterion as declared in game data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionDef {
    /// Criterion id.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// An advancement as declared in game data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancementDef {
    /// Advancement id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Section (`story`, `nether`, `end`, `husbandry`, `adventure`).
    pub category: String,
    /// Goal label for the criteria.
    #[serde(default)]
    pub goal: Option<String>,
    /// Criteria in declaration order.
    #[serde(default)]
    pub criteria: Vec<CriterionDef>,
}

/// Static game data for one game version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancementManifest {
    /// Game version the data describes.
    pub version: String,
    /// Advancements in display order.
    pub advancements: Vec<AdvancementDef>,
}

impl AdvancementManifest {
    /// Parses a RON manifest.
    pub fn from_ron(text: &str) -> TrackerResult<Self> {
        ron::from_str(text).map_err(|e| TrackerError::Serialization(e.to_string()))
    }

    /// Loads a RON manifest from disk.
    pub fn load(path: impl AsRef<Path>) -> TrackerResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let manifest = Self::from_ron(&text)?;
        info!(
            "Loaded {} advancements for {} from {}",
            manifest.advancements.len(),
            manifest.version,
            path.display()
        );
        Ok(manifest)
    }
}

/// Every advancement being tracked, with lookup indexes.
#[derive(Debug, Clone, Default)]
pub struct AdvancementCatalog {
    advancements: Vec<Advancement>,
    by_id: AHashMap<String, usize>,
    by_checklist_key: AHashMap<String, CriterionKey>,
    mode: TrackingMode,
}

impl AdvancementCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from game data.
    pub fn from_manifest(manifest: &AdvancementManifest) -> TrackerResult<Self> {
        let mut catalog = Self::new();
        for def in &manifest.advancements {
            let mut advancement = Advancement::new(&def.id, &def.name, &def.category);
            if let Some(goal) = &def.goal {
                advancement = advancement.with_goal(goal);
            }
            for criterion in &def.criteria {
                advancement = advancement.with_criterion(&criterion.id, &criterion.name);
            }
            catalog.insert(advancement)?;
        }
        Ok(catalog)
    }

    /// Adds an advancement. Ids must be unique.
    pub fn insert(&mut self, mut advancement: Advancement) -> TrackerResult<()> {
        if self.by_id.contains_key(advancement.id()) {
            return Err(TrackerError::InvalidData(format!(
                "duplicate advancement id: {}",
                advancement.id()
            )));
        }

        advancement.criteria_mut().set_tracking_mode(self.mode);
        for criterion in advancement.criteria().all() {
            self.by_checklist_key
                .insert(criterion.key().checklist_key(), criterion.key().clone());
        }
        self.by_id
            .insert(advancement.id().to_string(), self.advancements.len());
        self.advancements.push(advancement);
        Ok(())
    }

    /// Number of advancements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.advancements.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.advancements.is_empty()
    }

    /// Advancements in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Advancement> {
        self.advancements.iter()
    }

    /// Looks up an advancement by id.
    #[must_use]
    pub fn try_get(&self, id: &str) -> Option<&Advancement> {
        self.by_id.get(id).map(|&slot| &self.advancements[slot])
    }

    /// Looks up a criterion by owner and id.
    #[must_use]
    pub fn criterion(&self, key: &CriterionKey) -> Option<&Criterion> {
        self.try_get(&key.owner_id)?
            .criteria()
            .get(&key.criterion_id)
    }

    /// Resolves a checklist line (`ownerId` followed by `criterionId`) to a criterion.
    #[must_use]
    pub fn criterion_for_checklist_key(&self, key: &str) -> Option<&CriterionKey> {
        self.by_checklist_key.get(key)
    }

    /// Resolves an owned key to the objective it names.
    #[must_use]
    pub fn resolve(&self, key: &ObjectiveKey) -> Option<Objective<'_>> {
        match key {
            ObjectiveKey::Advancement(id) => self.try_get(id).map(Objective::Advancement),
            ObjectiveKey::Criterion(key) => self.criterion(key).map(Objective::Criterion),
        }
    }

    /// Flattened read-only index of every criterion.
    #[must_use]
    pub fn all_criteria(&self) -> BTreeMap<CriterionKey, &Criterion> {
        let mut index = BTreeMap::new();
        for advancement in &self.advancements {
            advancement.criteria().clone_criteria(&mut index);
        }
        index
    }

    /// Current counting mode.
    #[must_use]
    pub fn tracking_mode(&self) -> TrackingMode {
        self.mode
    }

    /// Switches every criteria set between per-player and manual counting.
    pub fn set_tracking_mode(&mut self, mode: TrackingMode) {
        self.mode = mode;
        for advancement in &mut self.advancements {
            advancement.criteria_mut().set_tracking_mode(mode);
        }
    }

    /// Runs one aggregation pass over every advancement.
    pub fn update_states(&mut self, state: &WorldState) {
        for advancement in &mut self.advancements {
            advancement.update_state(state);
        }
        debug!(
            players = state.players.len(),
            advancements = self.advancements.len(),
            "Aggregation pass complete"
        );
    }

    /// Number of advancements completed by `player`.
    ///
    /// In manual mode every completion belongs to the pseudo-player, so the
    /// argument is ignored.
    #[must_use]
    pub fn completed_count(&self, player: Uuid) -> usize {
        let player = match self.mode {
            TrackingMode::ManualChecklist => Uuid::EMPTY,
            TrackingMode::Automatic => player,
        };
        self.advancements
            .iter()
            .filter(|adv| adv.is_completed_by(player))
            .count()
    }

    /// Whole-number percentage of advancements completed by `player`.
    #[must_use]
    pub fn percent_completed_by(&self, player: Uuid) -> usize {
        if self.advancements.is_empty() {
            return 0;
        }
        self.completed_count(player) * 100 / self.advancements.len()
    }
}
