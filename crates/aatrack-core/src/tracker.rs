//! Tick orchestration.
//!
//! The [`Tracker`] owns all progress state and runs on a single thread. Each
//! call to [`Tracker::tick`] obtains at most one snapshot (from the provider,
//! or from the manual checklist) and runs one aggregation pass over it.

use crate::catalog::AdvancementCatalog;
use crate::checklist::{ManualChecklist, ManualChecklistController};
use crate::criteria::TrackingMode;
use crate::pinned::{get_all_available, PinFrame, PinnedStore};
use crate::registry::{CheckableItem, Point, Rect};
use crate::world_state::WorldState;
use aatrack_common::{Category, TrackerResult};
use tracing::{debug, info};

/// Source of progress snapshots read from the game.
pub trait SnapshotProvider {
    /// Returns a new snapshot, or `None` if nothing changed since the last poll.
    fn poll(&mut self) -> TrackerResult<Option<WorldState>>;
}

/// Owns the catalog, pinned lists and checklist for the active category and version.
#[derive(Debug)]
pub struct Tracker {
    category: Category,
    version: String,
    mode: TrackingMode,
    catalog: AdvancementCatalog,
    checklist: ManualChecklistController,
    pinned: PinnedStore,
    state: WorldState,
    passes: u64,
}

impl Tracker {
    /// Creates a tracker in automatic mode.
    #[must_use]
    pub fn new(
        category: Category,
        version: impl Into<String>,
        catalog: AdvancementCatalog,
        checklist: ManualChecklist,
        pinned: PinnedStore,
    ) -> Self {
        Self {
            category,
            version: version.into(),
            mode: TrackingMode::Automatic,
            catalog,
            checklist: ManualChecklistController::new(checklist),
            pinned,
            state: WorldState::new(),
            passes: 0,
        }
    }

    /// Active category.
    #[must_use]
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Active game version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Active tracking mode.
    #[must_use]
    pub fn mode(&self) -> TrackingMode {
        self.mode
    }

    /// Tracked advancements.
    #[must_use]
    pub fn catalog(&self) -> &AdvancementCatalog {
        &self.catalog
    }

    /// Snapshot used by the last pass.
    #[must_use]
    pub fn state(&self) -> &WorldState {
        &self.state
    }

    /// Number of aggregation passes run so far.
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Manual checklist and its pointer handling.
    #[must_use]
    pub fn checklist(&self) -> &ManualChecklistController {
        &self.checklist
    }

    /// Pinned objective lists.
    #[must_use]
    pub fn pinned(&self) -> &PinnedStore {
        &self.pinned
    }

    /// Switches between automatic and manual tracking.
    pub fn set_mode(&mut self, mode: TrackingMode) {
        if self.mode == mode {
            return;
        }
        info!("Tracking mode changed: {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.catalog.set_tracking_mode(mode);
        self.checklist.checklist_mut().invalidate();
    }

    /// Switches category and version, replacing the catalog.
    pub fn switch(
        &mut self,
        category: Category,
        version: impl Into<String>,
        mut catalog: AdvancementCatalog,
    ) -> TrackerResult<()> {
        let version = version.into();
        info!("Switching to {category} {version}");
        catalog.set_tracking_mode(self.mode);
        self.catalog = catalog;
        self.category = category;
        self.checklist.checklist_mut().switch_version(version.as_str())?;
        self.version = version;
        self.state = WorldState::new();
        Ok(())
    }

    /// Runs one tick. Returns whether an aggregation pass happened.
    pub fn tick(&mut self, provider: &mut dyn SnapshotProvider) -> TrackerResult<bool> {
        let next = match self.mode {
            TrackingMode::Automatic => provider.poll()?,
            TrackingMode::ManualChecklist => {
                if self.checklist.checklist().is_invalidated() {
                    let state = self.checklist.checklist().current_state(&self.catalog)?;
                    // Stays stale until a read succeeds.
                    self.checklist.checklist_mut().take_invalidated();
                    Some(state)
                } else {
                    None
                }
            },
        };

        let Some(state) = next else {
            return Ok(false);
        };
        self.catalog.update_states(&state);
        self.state = state;
        self.passes += 1;
        debug!(pass = self.passes, mode = ?self.mode, "Tick processed snapshot");
        Ok(true)
    }

    /// Layout changed: rebuild the checkable-item indexes.
    pub fn layout_changed(&mut self, items: Vec<CheckableItem>) {
        self.checklist.invalidate(items);
    }

    /// Routes pointer input to the checklist. Ignored outside manual mode.
    pub fn handle_pointer(&mut self, cursor: Point, click_started: bool) -> TrackerResult<bool> {
        if self.mode != TrackingMode::ManualChecklist {
            return Ok(false);
        }
        self.checklist.update(cursor, click_started, &self.catalog)
    }

    /// Outline for the hovered checklist item.
    #[must_use]
    pub fn highlight_bounds(&self) -> Option<Rect> {
        if self.mode != TrackingMode::ManualChecklist {
            return None;
        }
        self.checklist.highlight_bounds(&self.catalog)
    }

    /// Unchecks everything in the manual checklist.
    pub fn clear_checklist(&mut self) -> TrackerResult<()> {
        self.checklist.checklist_mut().clear()
    }

    /// Objectives that can be pinned in the active category and version.
    #[must_use]
    pub fn available_pins(&self) -> Vec<&'static str> {
        get_all_available(&self.category, &self.version)
    }

    /// Pinned objectives to show, falling back to every available one.
    #[must_use]
    pub fn current_pins(&self) -> Vec<String> {
        match self.pinned.current_list(&self.category, &self.version) {
            Some(list) => list.to_vec(),
            None => self
                .available_pins()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Stores a new pin order for the active category and version.
    pub fn set_pins<F: PinFrame>(&mut self, frames: &[F]) -> TrackerResult<bool> {
        self.pinned
            .set_current_list(&self.category, &self.version, frames)
    }
}
