//! Manual checklist.
//!
//! When progress cannot be read from the game, users tick objectives by hand.
//! Checked keys are advancement ids or criterion checklist keys (owner id
//! followed by criterion id), kept per game version in
//! `checklist_{version}.txt`, one key per line. The file is rewritten after
//! every change and is turned into a synthetic [`WorldState`] whose only
//! player is [`Uuid::EMPTY`].

use crate::catalog::AdvancementCatalog;
use crate::objective::Objective;
use crate::registry::{CheckRegistry, CheckableItem, Point, Rect};
use crate::world_state::{Contribution, WorldState};
use aatrack_common::{TrackerResult, Uuid};
use ahash::AHashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Namespace of the section root advancements.
pub const ROOT_NAMESPACE: &str = "minecraft";

/// Sections whose `root` advancement is derived from its children.
pub const ROOT_SECTIONS: [&str; 5] = ["story", "nether", "end", "husbandry", "adventure"];

/// Margin drawn around the hovered item.
pub const HIGHLIGHT_MARGIN: i32 = 3;

/// Insertion-ordered set of checked keys.
#[derive(Debug, Clone, Default)]
struct CheckedKeys {
    order: Vec<String>,
    present: AHashSet<String>,
}

impl CheckedKeys {
    fn contains(&self, key: &str) -> bool {
        self.present.contains(key)
    }

    fn insert(&mut self, key: &str) -> bool {
        if !self.present.insert(key.to_string()) {
            return false;
        }
        self.order.push(key.to_string());
        true
    }

    fn remove(&mut self, key: &str) -> bool {
        if !self.present.remove(key) {
            return false;
        }
        self.order.retain(|k| k != key);
        true
    }

    fn clear(&mut self) {
        self.order.clear();
        self.present.clear();
    }

    fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

/// Checked keys for one game version, bound to their file.
#[derive(Debug, Clone)]
pub struct ManualChecklist {
    folder: PathBuf,
    version: String,
    checks: CheckedKeys,
    invalidated: bool,
}

impl ManualChecklist {
    /// Creates an empty checklist stored under `folder`.
    #[must_use]
    pub fn new(folder: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            version: version.into(),
            checks: CheckedKeys::default(),
            invalidated: true,
        }
    }

    /// Creates a checklist and loads its file.
    pub fn open(folder: impl Into<PathBuf>, version: impl Into<String>) -> TrackerResult<Self> {
        let mut checklist = Self::new(folder, version);
        checklist.load()?;
        Ok(checklist)
    }

    /// Path of the checklist file for `version` inside `folder`.
    #[must_use]
    pub fn path_for(folder: &Path, version: &str) -> PathBuf {
        folder.join(format!("checklist_{version}.txt"))
    }

    /// Path of the current checklist file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        Self::path_for(&self.folder, &self.version)
    }

    /// Game version this checklist belongs to.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Switches to another game version and loads its file.
    pub fn switch_version(&mut self, version: impl Into<String>) -> TrackerResult<()> {
        self.version = version.into();
        self.load()?;
        self.invalidated = true;
        Ok(())
    }

    /// Replaces the in-memory set with the file contents.
    ///
    /// A missing file means nothing is checked.
    pub fn load(&mut self) -> TrackerResult<()> {
        self.checks.clear();
        let path = self.path();
        let Some(text) = read_if_exists(&path)? else {
            debug!("No checklist at {}", path.display());
            return Ok(());
        };

        for key in checklist_lines(&text) {
            self.checks.insert(key);
        }
        info!(
            "Loaded {} checked keys from {}",
            self.checks.order.len(),
            path.display()
        );
        Ok(())
    }

    /// Recomputes root keys and rewrites the whole file.
    pub fn save(&mut self) -> TrackerResult<()> {
        self.handle_root_advancements();

        let path = self.path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = io::BufWriter::new(fs::File::create(&path)?);
        for key in self.checks.iter() {
            writeln!(file, "{key}")?;
        }
        file.flush()?;
        debug!("Saved {} checked keys to {}", self.checks.order.len(), path.display());
        Ok(())
    }

    /// Flips a key, marks consumers stale, and saves.
    pub fn toggle(&mut self, key: &str) -> TrackerResult<()> {
        if !self.checks.remove(key) {
            self.checks.insert(key);
        }
        self.invalidated = true;
        self.save()
    }

    /// Unchecks everything, marks consumers stale, and saves.
    pub fn clear(&mut self) -> TrackerResult<()> {
        self.checks.clear();
        self.invalidated = true;
        self.save()
    }

    /// Keeps each section root checked exactly when one of its children is.
    fn handle_root_advancements(&mut self) {
        for section in ROOT_SECTIONS {
            let root = format!("{ROOT_NAMESPACE}:{section}/root");
            let prefix = format!("{ROOT_NAMESPACE}:{section}/");

            self.checks.remove(&root);
            if self.checks.iter().any(|key| key.starts_with(&prefix)) {
                self.checks.insert(&root);
            }
        }
    }

    /// Checks whether a key is checked.
    #[must_use]
    pub fn is_checked(&self, key: &str) -> bool {
        self.checks.contains(key)
    }

    /// Checked keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.checks.iter()
    }

    /// Number of checked keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.order.len()
    }

    /// Whether nothing is checked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.order.is_empty()
    }

    /// Marks consumers stale, e.g. after a layout change.
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    /// Whether consumers should re-read the state.
    #[must_use]
    pub fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    /// Returns and resets the stale flag.
    pub fn take_invalidated(&mut self) -> bool {
        std::mem::replace(&mut self.invalidated, false)
    }

    /// Builds the synthetic snapshot from the persisted file.
    pub fn current_state(&self, catalog: &AdvancementCatalog) -> TrackerResult<WorldState> {
        match read_if_exists(&self.path())? {
            Some(text) => Ok(state_from_lines(&text, catalog)),
            None => Ok(WorldState::new()),
        }
    }
}

fn read_if_exists(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn checklist_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// Turns checklist lines into a snapshot owned by [`Uuid::EMPTY`].
///
/// Keys that no longer name a known advancement or criterion are skipped.
#[must_use]
pub fn state_from_lines(text: &str, catalog: &AdvancementCatalog) -> WorldState {
    let mut contribution = Contribution::new(Uuid::EMPTY);
    for line in checklist_lines(text) {
        if let Some(advancement) = catalog.try_get(line) {
            contribution
                .advancements
                .insert(advancement.id().to_string());
        } else if let Some(key) = catalog.criterion_for_checklist_key(line) {
            contribution.criteria.insert(key.clone());
        }
    }
    WorldState::new().with_contribution(contribution)
}

/// Pointer-driven toggling on top of a [`ManualChecklist`].
#[derive(Debug, Clone)]
pub struct ManualChecklistController {
    checklist: ManualChecklist,
    registry: CheckRegistry,
    hovered: Option<usize>,
}

impl ManualChecklistController {
    /// Wraps a checklist with an empty registry.
    #[must_use]
    pub fn new(checklist: ManualChecklist) -> Self {
        Self {
            checklist,
            registry: CheckRegistry::new(),
            hovered: None,
        }
    }

    /// The underlying checklist.
    #[must_use]
    pub fn checklist(&self) -> &ManualChecklist {
        &self.checklist
    }

    /// Mutable checklist access.
    pub fn checklist_mut(&mut self) -> &mut ManualChecklist {
        &mut self.checklist
    }

    /// The hit-testing index.
    #[must_use]
    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    /// Layout changed: rebuild the registry from the new items.
    pub fn invalidate(&mut self, items: Vec<CheckableItem>) {
        self.registry.rebuild(items);
        self.hovered = None;
        self.checklist.invalidate();
    }

    /// Item currently under the pointer.
    #[must_use]
    pub fn hovered(&self) -> Option<&CheckableItem> {
        self.hovered.and_then(|slot| self.registry.item(slot))
    }

    /// Updates the hovered item and toggles it on a click.
    ///
    /// Returns whether a key was toggled. Only leaf objectives toggle:
    /// advancements with criteria follow their children instead.
    pub fn update(
        &mut self,
        cursor: Point,
        click_started: bool,
        catalog: &AdvancementCatalog,
    ) -> TrackerResult<bool> {
        self.hovered = self.registry.hit_slot(cursor);
        let Some(item) = self.hovered() else {
            return Ok(false);
        };
        if !click_started {
            return Ok(false);
        }

        let toggleable = item
            .objective
            .as_ref()
            .and_then(|key| catalog.resolve(key))
            .is_some_and(|objective| objective.is_toggleable());
        if !toggleable {
            return Ok(false);
        }

        let key = item.key.clone();
        self.checklist.toggle(&key)?;
        debug!("Toggled '{key}'");
        Ok(true)
    }

    /// Outline to draw around the hovered item, if it can be toggled.
    ///
    /// Section roots are derived and never highlighted.
    #[must_use]
    pub fn highlight_bounds(&self, catalog: &AdvancementCatalog) -> Option<Rect> {
        let item = self.hovered()?;
        let objective = catalog.resolve(item.objective.as_ref()?)?;
        if let Objective::Advancement(adv) = objective {
            if adv.has_criteria() || adv.is_root() {
                return None;
            }
        }
        Some(item.check_bounds.inflate(HIGHLIGHT_MARGIN, HIGHLIGHT_MARGIN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AdvancementManifest;
    use crate::objective::ObjectiveKey;
    use crate::world_state::CriterionKey;
    use aatrack_common::TrackerError;
    use tempfile::TempDir;

    const SAMPLE: &str = include_str!("../../../assets/advancements.ron");

    fn catalog() -> AdvancementCatalog {
        let manifest = AdvancementManifest::from_ron(SAMPLE).expect("sample manifest parses");
        AdvancementCatalog::from_manifest(&manifest).expect("sample manifest is valid")
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let checklist = ManualChecklist::open(temp_dir.path(), "1.21").expect("open");

        assert!(checklist.is_empty());
        let state = checklist.current_state(&catalog()).expect("state");
        assert!(state.is_empty());
    }

    #[test]
    fn test_toggle_persists() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let folder = temp_dir.path().join("checklists");
        let mut checklist = ManualChecklist::new(&folder, "1.21");

        checklist.toggle("minecraft:end/kill_dragon").expect("toggle");

        let path = ManualChecklist::path_for(&folder, "1.21");
        assert!(path.ends_with("checklist_1.21.txt"));
        let reopened = ManualChecklist::open(&folder, "1.21").expect("reopen");
        assert!(reopened.is_checked("minecraft:end/kill_dragon"));
        assert!(reopened.is_checked("minecraft:end/root"));
    }

    #[test]
    fn test_root_follows_children() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut checklist = ManualChecklist::new(temp_dir.path(), "1.21");
        let root = "minecraft:story/root";

        checklist.toggle("minecraft:story/mine_stone").expect("on");
        assert!(checklist.is_checked(root));

        checklist.toggle("minecraft:story/upgrade_tools").expect("on");
        checklist.toggle("minecraft:story/mine_stone").expect("off");
        assert!(checklist.is_checked(root));

        checklist.toggle("minecraft:story/upgrade_tools").expect("off");
        assert!(!checklist.is_checked(root));
        assert!(checklist.is_empty());
    }

    #[test]
    fn test_toggle_on_off_restores_root() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut checklist = ManualChecklist::new(temp_dir.path(), "1.21");
        checklist.toggle("minecraft:nether/return_to_sender").expect("seed");
        let before = checklist.is_checked("minecraft:nether/root");

        checklist.toggle("minecraft:nether/fast_travel").expect("on");
        checklist.toggle("minecraft:nether/fast_travel").expect("off");

        assert_eq!(checklist.is_checked("minecraft:nether/root"), before);
    }

    #[test]
    fn test_root_cannot_be_checked_alone() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut checklist = ManualChecklist::new(temp_dir.path(), "1.21");

        checklist.toggle("minecraft:husbandry/root").expect("toggle");

        assert!(!checklist.is_checked("minecraft:husbandry/root"));
    }

    #[test]
    fn test_criterion_keys_count_toward_root() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut checklist = ManualChecklist::new(temp_dir.path(), "1.21");

        checklist
            .toggle("minecraft:adventure/adventuring_timeminecraft:plains")
            .expect("toggle");

        assert!(checklist.is_checked("minecraft:adventure/root"));
    }

    #[test]
    fn test_current_state_from_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = ManualChecklist::path_for(temp_dir.path(), "1.21");
        fs::write(
            &path,
            "minecraft:story/mine_stone\n\n   \nminecraft:husbandry/balanced_dietapple\nminecraft:story/removed_in_update\n",
        )
        .expect("write");

        let checklist = ManualChecklist::open(temp_dir.path(), "1.21").expect("open");
        let state = checklist.current_state(&catalog()).expect("state");

        assert_eq!(state.players.len(), 1);
        let manual = &state.players[&Uuid::EMPTY];
        assert!(manual.has_advancement("minecraft:story/mine_stone"));
        assert!(!manual.has_advancement("minecraft:story/removed_in_update"));
        assert!(manual.has_criterion(&CriterionKey::new(
            "minecraft:husbandry/balanced_diet",
            "apple"
        )));
        assert_eq!(checklist.len(), 3);
    }

    #[test]
    fn test_write_preserves_insertion_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut checklist = ManualChecklist::new(temp_dir.path(), "1.16");
        checklist.toggle("minecraft:end/kill_dragon").expect("toggle");
        checklist.toggle("minecraft:story/mine_stone").expect("toggle");

        let text = fs::read_to_string(checklist.path()).expect("read");
        let lines: Vec<&str> = text.lines().collect();
        // Roots are re-added after their children on every save.
        assert_eq!(
            lines,
            vec![
                "minecraft:end/kill_dragon",
                "minecraft:story/mine_stone",
                "minecraft:story/root",
                "minecraft:end/root",
            ]
        );
    }

    #[test]
    fn test_clear_and_switch_version() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut checklist = ManualChecklist::new(temp_dir.path(), "1.20");
        checklist.toggle("minecraft:story/mine_stone").expect("toggle");
        assert!(checklist.take_invalidated());
        assert!(!checklist.is_invalidated());

        checklist.switch_version("1.21").expect("switch");
        assert!(checklist.is_empty());
        assert!(checklist.is_invalidated());

        checklist.switch_version("1.20").expect("switch back");
        assert!(checklist.is_checked("minecraft:story/mine_stone"));

        checklist.clear().expect("clear");
        assert!(checklist.is_empty());
        let text = fs::read_to_string(checklist.path()).expect("read");
        assert!(text.is_empty());
    }

    fn controller(temp_dir: &TempDir) -> ManualChecklistController {
        let mut controller =
            ManualChecklistController::new(ManualChecklist::new(temp_dir.path(), "1.21"));
        let panel = Rect::new(0, 0, 200, 100);
        controller.invalidate(vec![
            CheckableItem::for_objective(
                ObjectiveKey::Advancement("minecraft:story/mine_stone".into()),
                panel,
                Rect::new(0, 0, 16, 16),
            ),
            CheckableItem::for_objective(
                ObjectiveKey::Advancement("minecraft:husbandry/balanced_diet".into()),
                panel,
                Rect::new(20, 0, 16, 16),
            ),
            CheckableItem::for_objective(
                ObjectiveKey::Criterion(CriterionKey::new(
                    "minecraft:husbandry/balanced_diet",
                    "bread",
                )),
                panel,
                Rect::new(40, 0, 16, 16),
            ),
            CheckableItem::for_objective(
                ObjectiveKey::Advancement("minecraft:story/root".into()),
                panel,
                Rect::new(60, 0, 16, 16),
            ),
        ]);
        controller
    }

    #[test]
    fn test_click_toggles_leaf_advancement() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let catalog = catalog();
        let mut controller = controller(&temp_dir);

        assert!(!controller
            .update(Point::new(4, 4), false, &catalog)
            .expect("hover"));
        assert_eq!(
            controller.hovered().map(|i| i.key.as_str()),
            Some("minecraft:story/mine_stone")
        );

        assert!(controller
            .update(Point::new(4, 4), true, &catalog)
            .expect("click"));
        assert!(controller.checklist().is_checked("minecraft:story/mine_stone"));
    }

    #[test]
    fn test_click_ignores_parent_with_criteria() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let catalog = catalog();
        let mut controller = controller(&temp_dir);

        assert!(!controller
            .update(Point::new(24, 4), true, &catalog)
            .expect("click"));
        assert!(controller.checklist().is_empty());

        assert!(controller
            .update(Point::new(44, 4), true, &catalog)
            .expect("click"));
        assert!(controller
            .checklist()
            .is_checked("minecraft:husbandry/balanced_dietbread"));
    }

    #[test]
    fn test_hover_tracks_the_item_under_the_pointer() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let catalog = catalog();
        let mut controller =
            ManualChecklistController::new(ManualChecklist::new(temp_dir.path(), "1.21"));
        let key = ObjectiveKey::Advancement("minecraft:story/mine_stone".into());
        controller.invalidate(vec![
            CheckableItem::for_objective(key.clone(), Rect::new(0, 0, 100, 100), Rect::new(0, 0, 16, 16)),
            CheckableItem::for_objective(key, Rect::new(200, 0, 100, 100), Rect::new(200, 0, 16, 16)),
        ]);

        controller.update(Point::new(4, 4), false, &catalog).expect("hover");
        assert_eq!(
            controller.hovered().map(|i| i.check_bounds),
            Some(Rect::new(0, 0, 16, 16))
        );
        assert_eq!(
            controller.highlight_bounds(&catalog),
            Some(Rect::new(-3, -3, 22, 22))
        );

        controller.update(Point::new(204, 4), false, &catalog).expect("hover");
        assert_eq!(
            controller.highlight_bounds(&catalog),
            Some(Rect::new(197, -3, 22, 22))
        );
    }

    #[test]
    fn test_hover_reports_items_without_objective() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let catalog = catalog();
        let mut controller =
            ManualChecklistController::new(ManualChecklist::new(temp_dir.path(), "1.21"));
        let panel = Rect::new(0, 0, 50, 50);
        controller.invalidate(vec![CheckableItem {
            key: "header".to_string(),
            objective: None,
            parent_bounds: panel,
            check_bounds: panel,
        }]);

        assert!(!controller.update(Point::new(5, 5), true, &catalog).expect("click"));
        assert_eq!(controller.hovered().map(|i| i.key.as_str()), Some("header"));
        assert!(controller.highlight_bounds(&catalog).is_none());
        assert!(controller.checklist().is_empty());
    }

    #[test]
    fn test_save_into_unwritable_folder_is_io_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let blocker = temp_dir.path().join("not_a_folder");
        fs::write(&blocker, "").expect("write");
        let mut checklist = ManualChecklist::new(&blocker, "1.21");
        assert!(checklist.take_invalidated());

        let err = checklist.toggle("minecraft:story/mine_stone");

        assert!(matches!(err, Err(TrackerError::Io(_))));
        // The in-memory flip still reaches consumers.
        assert!(checklist.is_checked("minecraft:story/mine_stone"));
        assert!(checklist.is_invalidated());
        assert!(matches!(checklist.clear(), Err(TrackerError::Io(_))));
    }

    #[test]
    fn test_unreadable_checklist_is_io_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(ManualChecklist::path_for(temp_dir.path(), "1.21")).expect("mkdir");

        let checklist = ManualChecklist::new(temp_dir.path(), "1.21");

        assert!(matches!(
            checklist.current_state(&catalog()),
            Err(TrackerError::Io(_))
        ));
    }

    #[test]
    fn test_pointer_outside_clears_hover() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let catalog = catalog();
        let mut controller = controller(&temp_dir);

        controller.update(Point::new(4, 4), false, &catalog).expect("hover");
        controller.update(Point::new(150, 80), true, &catalog).expect("miss");

        assert!(controller.hovered().is_none());
        assert!(controller.checklist().is_empty());
    }

    #[test]
    fn test_highlight_only_for_leaves() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let catalog = catalog();
        let mut controller = controller(&temp_dir);

        controller.update(Point::new(4, 4), false, &catalog).expect("hover");
        assert_eq!(
            controller.highlight_bounds(&catalog),
            Some(Rect::new(-3, -3, 22, 22))
        );

        controller.update(Point::new(24, 4), false, &catalog).expect("hover");
        assert!(controller.highlight_bounds(&catalog).is_none());

        controller.update(Point::new(64, 4), false, &catalog).expect("hover");
        assert!(controller.highlight_bounds(&catalog).is_none());
    }
}
