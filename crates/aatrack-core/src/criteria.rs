//! Criteria sets and per-player criterion progress.
//!
//! Every [`CriteriaSet`] is re-derived from scratch on each aggregation pass:
//! [`CriteriaSet::update_states`] discards the previous progress table and
//! rebuilds it from the snapshot, so derived metrics can never drift from the
//! data they were computed from.

use crate::objective::Criterion;
use crate::world_state::{CriterionKey, WorldState};
use aatrack_common::Uuid;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Goal label used when game data does not provide one.
pub const DEFAULT_GOAL: &str = "Completed";

/// Where completion data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingMode {
    /// Read from game snapshots, one counter per player.
    #[default]
    Automatic,
    /// Ticked by hand; a single global counter under [`Uuid::EMPTY`].
    ManualChecklist,
}

/// The criteria of one advancement plus derived per-player progress.
#[derive(Debug, Clone)]
pub struct CriteriaSet {
    owner_id: String,
    goal: String,
    criteria: Vec<Criterion>,
    index: AHashMap<String, usize>,
    progress: BTreeMap<Uuid, u32>,
    closest_to_completion: Uuid,
    mode: TrackingMode,
}

impl CriteriaSet {
    /// Creates an empty set owned by `owner_id`.
    #[must_use]
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            goal: DEFAULT_GOAL.to_string(),
            criteria: Vec::new(),
            index: AHashMap::new(),
            progress: BTreeMap::new(),
            closest_to_completion: Uuid::EMPTY,
            mode: TrackingMode::default(),
        }
    }

    /// Adds a criterion. Re-declaring an id replaces it in place.
    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        let criterion = Criterion::new(self.owner_id.clone(), id, name);
        match self.index.get(criterion.id()) {
            Some(&slot) => self.criteria[slot] = criterion,
            None => {
                self.index
                    .insert(criterion.id().to_string(), self.criteria.len());
                self.criteria.push(criterion);
            },
        }
    }

    /// Sets the goal label.
    pub fn set_goal(&mut self, goal: impl Into<String>) {
        self.goal = goal.into();
    }

    /// Goal label, e.g. "Biomes" or "Completed".
    #[must_use]
    pub fn goal(&self) -> &str {
        &self.goal
    }

    /// Owning advancement id.
    #[must_use]
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Switches between per-player and manual counting.
    pub fn set_tracking_mode(&mut self, mode: TrackingMode) {
        self.mode = mode;
    }

    /// Current counting mode.
    #[must_use]
    pub fn tracking_mode(&self) -> TrackingMode {
        self.mode
    }

    /// Whether there is at least one criterion.
    #[must_use]
    pub fn any(&self) -> bool {
        !self.criteria.is_empty()
    }

    /// Number of criteria.
    #[must_use]
    pub fn count(&self) -> usize {
        self.criteria.len()
    }

    /// Checks whether a criterion id belongs to this set.
    #[must_use]
    pub fn contains(&self, criterion: &str) -> bool {
        self.index.contains_key(criterion)
    }

    /// Looks up a criterion by id.
    #[must_use]
    pub fn get(&self, criterion: &str) -> Option<&Criterion> {
        self.index.get(criterion).map(|&slot| &self.criteria[slot])
    }

    /// All criteria in declaration order.
    pub fn all(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.iter()
    }

    /// Completed-criteria counts from the last pass.
    #[must_use]
    pub fn progress(&self) -> &BTreeMap<Uuid, u32> {
        &self.progress
    }

    /// Player with the most completed criteria after the last pass.
    #[must_use]
    pub fn closest_to_completion(&self) -> Uuid {
        self.closest_to_completion
    }

    /// Completed count of the closest player.
    #[must_use]
    pub fn most_completed(&self) -> u32 {
        self.number_completed_by(self.closest_to_completion)
    }

    /// Number of criteria completed by `player`.
    ///
    /// In manual mode there is exactly one logical player, so the argument is
    /// ignored and the single stored counter is returned.
    #[must_use]
    pub fn number_completed_by(&self, player: Uuid) -> u32 {
        match self.mode {
            TrackingMode::ManualChecklist => self.progress.values().next().copied().unwrap_or(0),
            TrackingMode::Automatic => self.progress.get(&player).copied().unwrap_or(0),
        }
    }

    /// Whole-number percentage of criteria completed by `player`, truncated.
    #[must_use]
    pub fn percent_completed_by(&self, player: Uuid) -> u32 {
        if self.criteria.is_empty() {
            return 0;
        }
        self.number_completed_by(player) * 100 / self.criteria.len() as u32
    }

    /// Recounts every player's completed criteria from a snapshot.
    pub fn update_states(&mut self, state: &WorldState) {
        if !self.any() {
            return;
        }

        self.progress.clear();
        for criterion in &mut self.criteria {
            criterion.update_state(state);
            for completion in criterion.completions() {
                *self.progress.entry(completion.player).or_insert(0) += 1;
            }
        }
        self.find_player_with_most(state);
    }

    /// Picks the player closest to completing this set.
    ///
    /// Ties go to the player seen last. When nobody has completed anything the
    /// first player in the snapshot is chosen, so a leader exists whenever any
    /// player is present.
    fn find_player_with_most(&mut self, state: &WorldState) {
        let mut leader: Option<(Uuid, u32)> = None;
        for (&player, &completed) in &self.progress {
            if leader.map_or(true, |(_, most)| completed >= most) {
                leader = Some((player, completed));
            }
        }

        self.closest_to_completion = leader
            .map(|(player, _)| player)
            .or_else(|| state.first_player())
            .unwrap_or(Uuid::EMPTY);
    }

    /// Copies read-only references to every criterion into a global index.
    pub fn clone_criteria<'a>(&'a self, target: &mut BTreeMap<CriterionKey, &'a Criterion>) {
        for criterion in &self.criteria {
            target.insert(criterion.key().clone(), criterion);
        }
    }
}
