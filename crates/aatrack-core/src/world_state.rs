//! Progress snapshots.
//!
//! A [`WorldState`] is produced outside the core (from save files, a network
//! peer, or the manual checklist) and handed to the aggregation pass as one
//! immutable value.

use aatrack_common::Uuid;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Identifies a criterion by its owning advancement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CriterionKey {
    /// Owning advancement id.
    pub owner_id: String,
    /// Criterion id within the owner.
    pub criterion_id: String,
}

impl CriterionKey {
    /// Creates a new criterion key.
    #[must_use]
    pub fn new(owner_id: impl Into<String>, criterion_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            criterion_id: criterion_id.into(),
        }
    }

    /// Key used for this criterion in checklist files.
    ///
    /// This is the owner id immediately followed by the criterion id.
    #[must_use]
    pub fn checklist_key(&self) -> String {
        format!("{}{}", self.owner_id, self.criterion_id)
    }
}

/// A player having satisfied an objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Completion {
    /// Player who completed the objective.
    pub player: Uuid,
}

impl Completion {
    /// Creates a completion for a player.
    #[must_use]
    pub const fn new(player: Uuid) -> Self {
        Self { player }
    }
}

/// Everything a single player has completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    /// Player this contribution belongs to.
    pub player: Uuid,
    /// Completed advancement ids.
    #[serde(default)]
    pub advancements: BTreeSet<String>,
    /// Completed criteria.
    #[serde(default)]
    pub criteria: BTreeSet<CriterionKey>,
}

impl Contribution {
    /// Creates an empty contribution.
    #[must_use]
    pub fn new(player: Uuid) -> Self {
        Self {
            player,
            ..Self::default()
        }
    }

    /// Marks an advancement completed.
    #[must_use]
    pub fn with_advancement(mut self, id: impl Into<String>) -> Self {
        self.advancements.insert(id.into());
        self
    }

    /// Marks a criterion completed.
    #[must_use]
    pub fn with_criterion(mut self, owner_id: impl Into<String>, criterion_id: impl Into<String>) -> Self {
        self.criteria.insert(CriterionKey::new(owner_id, criterion_id));
        self
    }

    /// Checks whether the advancement is completed.
    #[must_use]
    pub fn has_advancement(&self, id: &str) -> bool {
        self.advancements.contains(id)
    }

    /// Checks whether the criterion is completed.
    #[must_use]
    pub fn has_criterion(&self, key: &CriterionKey) -> bool {
        self.criteria.contains(key)
    }
}

/// One snapshot of every player's progress.
///
/// The `players` map key is the player's identity; completions are credited
/// to it even when a deserialized contribution carries a different `player`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldState {
    /// Contributions by player, in player id order.
    #[serde(default)]
    pub players: BTreeMap<Uuid, Contribution>,
    /// Advancements completed by anyone.
    #[serde(default)]
    pub advancements: BTreeSet<String>,
    /// Criteria completed by anyone.
    #[serde(default)]
    pub criteria: BTreeSet<CriterionKey>,
}

impl WorldState {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a player's contribution and merges it into the global presence sets.
    pub fn add_contribution(&mut self, contribution: Contribution) {
        self.advancements
            .extend(contribution.advancements.iter().cloned());
        self.criteria.extend(contribution.criteria.iter().cloned());
        self.players.insert(contribution.player, contribution);
    }

    /// Builder form of [`Self::add_contribution`].
    #[must_use]
    pub fn with_contribution(mut self, contribution: Contribution) -> Self {
        self.add_contribution(contribution);
        self
    }

    /// Returns the first player in id order, if any.
    #[must_use]
    pub fn first_player(&self) -> Option<Uuid> {
        self.players.keys().next().copied()
    }

    /// Checks whether nobody is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Completions of an advancement, one per player who finished it.
    pub fn advancement_completions<'a>(&'a self, id: &'a str) -> impl Iterator<Item = Completion> + 'a {
        self.players
            .iter()
            .filter(move |(_, c)| c.has_advancement(id))
            .map(|(&player, _)| Completion::new(player))
    }

    /// Completions of a criterion, one per player who finished it.
    pub fn criterion_completions<'a>(
        &'a self,
        key: &'a CriterionKey,
    ) -> impl Iterator<Item = Completion> + 'a {
        self.players
            .iter()
            .filter(move |(_, c)| c.has_criterion(key))
            .map(|(&player, _)| Completion::new(player))
    }
}
