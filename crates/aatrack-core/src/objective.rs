//! Advancements and their criteria.

use crate::criteria::CriteriaSet;
use crate::world_state::{Completion, CriterionKey, WorldState};
use aatrack_common::Uuid;
use serde::{Deserialize, Serialize};

/// Discriminant of [`Objective`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectiveKind {
    /// A top-level advancement.
    Advancement,
    /// A criterion belonging to an advancement.
    Criterion,
}

/// A single requirement of an advancement, e.g. one biome of Adventuring Time.
#[derive(Debug, Clone)]
pub struct Criterion {
    key: CriterionKey,
    name: String,
    completions: Vec<Completion>,
}

impl Criterion {
    /// Creates a criterion owned by `owner_id`.
    #[must_use]
    pub fn new(owner_id: impl Into<String>, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: CriterionKey::new(owner_id, id),
            name: name.into(),
            completions: Vec::new(),
        }
    }

    /// Criterion id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.key.criterion_id
    }

    /// Owning advancement id.
    #[must_use]
    pub fn owner_id(&self) -> &str {
        &self.key.owner_id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owner-qualified key.
    #[must_use]
    pub fn key(&self) -> &CriterionKey {
        &self.key
    }

    /// Completions found by the last evaluation.
    #[must_use]
    pub fn completions(&self) -> &[Completion] {
        &self.completions
    }

    /// Checks whether a player completed this criterion in the last evaluation.
    #[must_use]
    pub fn is_completed_by(&self, player: Uuid) -> bool {
        self.completions.iter().any(|c| c.player == player)
    }

    /// Re-evaluates this criterion against a snapshot.
    pub fn update_state(&mut self, state: &WorldState) {
        self.completions.clear();
        self.completions
            .extend(state.criterion_completions(&self.key));
    }
}

/// A top-level advancement, optionally split into criteria.
#[derive(Debug, Clone)]
pub struct Advancement {
    id: String,
    name: String,
    category: String,
    criteria: CriteriaSet,
    completions: Vec<Completion>,
}

impl Advancement {
    /// Creates an advancement without criteria.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            criteria: CriteriaSet::new(id.clone()),
            id,
            name: name.into(),
            category: category.into(),
            completions: Vec::new(),
        }
    }

    /// Sets the criteria goal label.
    #[must_use]
    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.criteria.set_goal(goal);
        self
    }

    /// Adds a criterion in declaration order.
    #[must_use]
    pub fn with_criterion(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.criteria.insert(id, name);
        self
    }

    /// Advancement id, e.g. `minecraft:story/mine_stone`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Section this advancement belongs to (`story`, `nether`, ...).
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Criteria of this advancement.
    #[must_use]
    pub fn criteria(&self) -> &CriteriaSet {
        &self.criteria
    }

    /// Mutable criteria access.
    pub fn criteria_mut(&mut self) -> &mut CriteriaSet {
        &mut self.criteria
    }

    /// Whether this advancement is split into criteria.
    #[must_use]
    pub fn has_criteria(&self) -> bool {
        self.criteria.any()
    }

    /// Whether this is a section root such as `minecraft:story/root`.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.id.ends_with("/root")
    }

    /// Completions found by the last evaluation.
    #[must_use]
    pub fn completions(&self) -> &[Completion] {
        &self.completions
    }

    /// Checks whether a player completed this advancement in the last evaluation.
    #[must_use]
    pub fn is_completed_by(&self, player: Uuid) -> bool {
        self.completions.iter().any(|c| c.player == player)
    }

    /// Re-evaluates this advancement and its criteria against a snapshot.
    pub fn update_state(&mut self, state: &WorldState) {
        self.completions.clear();
        self.completions
            .extend(state.advancement_completions(&self.id));
        self.criteria.update_states(state);
    }
}

/// Either kind of objective, borrowed from the catalog.
#[derive(Debug, Clone, Copy)]
pub enum Objective<'a> {
    /// An advancement.
    Advancement(&'a Advancement),
    /// A criterion.
    Criterion(&'a Criterion),
}

impl<'a> Objective<'a> {
    /// Objective id.
    #[must_use]
    pub fn id(&self) -> &'a str {
        match self {
            Self::Advancement(adv) => adv.id(),
            Self::Criterion(crit) => crit.id(),
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &'a str {
        match self {
            Self::Advancement(adv) => adv.name(),
            Self::Criterion(crit) => crit.name(),
        }
    }

    /// Discriminant.
    #[must_use]
    pub const fn kind(&self) -> ObjectiveKind {
        match self {
            Self::Advancement(_) => ObjectiveKind::Advancement,
            Self::Criterion(_) => ObjectiveKind::Criterion,
        }
    }

    /// Whether a user may tick this objective by hand.
    ///
    /// Advancements with criteria are derived from their children and never
    /// toggled directly.
    #[must_use]
    pub fn is_toggleable(&self) -> bool {
        match self {
            Self::Advancement(adv) => !adv.has_criteria(),
            Self::Criterion(_) => true,
        }
    }

    /// Key under which this objective is stored in checklist files.
    #[must_use]
    pub fn checklist_key(&self) -> String {
        match self {
            Self::Advancement(adv) => adv.id().to_string(),
            Self::Criterion(crit) => crit.key().checklist_key(),
        }
    }
}

/// Owned reference to an objective, resolvable through the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectiveKey {
    /// Advancement by id.
    Advancement(String),
    /// Criterion by owner and id.
    Criterion(CriterionKey),
}

impl ObjectiveKey {
    /// Discriminant.
    #[must_use]
    pub const fn kind(&self) -> ObjectiveKind {
        match self {
            Self::Advancement(_) => ObjectiveKind::Advancement,
            Self::Criterion(_) => ObjectiveKind::Criterion,
        }
    }

    /// Key under which this objective is stored in checklist files.
    #[must_use]
    pub fn checklist_key(&self) -> String {
        match self {
            Self::Advancement(id) => id.clone(),
            Self::Criterion(key) => key.checklist_key(),
        }
    }
}
