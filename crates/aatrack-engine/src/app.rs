//! Application loop.
//!
//! Builds the tracker from configuration and drives it on a fixed poll
//! interval, logging a progress summary after every aggregation pass.

use crate::config::TrackerConfig;
use crate::snapshot::FileSnapshotProvider;
use aatrack_core::{
    AdvancementCatalog, AdvancementManifest, ManualChecklist, PinnedStore, SnapshotProvider,
    Tracker,
};
use anyhow::{Context, Result};
use std::thread;
use std::time::Duration;
use tracing::info;

/// Builds a tracker from configuration.
pub fn build_tracker(config: &TrackerConfig) -> Result<Tracker> {
    let manifest = AdvancementManifest::load(&config.manifest_path).with_context(|| {
        format!(
            "failed to load advancement manifest {}",
            config.manifest_path.display()
        )
    })?;
    if manifest.version != config.game_version {
        info!(
            "Manifest describes {}, tracking as {}",
            manifest.version, config.game_version
        );
    }
    let catalog = AdvancementCatalog::from_manifest(&manifest)?;
    let checklist = ManualChecklist::open(&config.checklist_folder, config.game_version.as_str())?;
    let pinned = PinnedStore::load(&config.pinned_path)?;

    let mut tracker = Tracker::new(
        config.category.clone(),
        config.game_version.as_str(),
        catalog,
        checklist,
        pinned,
    );
    tracker.set_mode(config.tracking_mode);
    Ok(tracker)
}

/// Logs a one-line summary per criteria-bearing advancement.
fn log_summary(tracker: &Tracker) {
    let catalog = tracker.catalog();
    for player in tracker.state().players.keys() {
        info!(
            "{player}: {}/{} advancements ({}%)",
            catalog.completed_count(*player),
            catalog.len(),
            catalog.percent_completed_by(*player)
        );
    }
    for advancement in catalog.iter().filter(|a| a.has_criteria()) {
        let criteria = advancement.criteria();
        info!(
            "{}: {}/{} {} (closest: {})",
            advancement.name(),
            criteria.most_completed(),
            criteria.count(),
            criteria.goal(),
            criteria.closest_to_completion()
        );
    }
    info!("Pinned: {}", tracker.current_pins().join(", "));
}

/// Runs the tick loop until `max_ticks` is reached, or forever.
pub fn run(config: &TrackerConfig) -> Result<()> {
    let mut tracker = build_tracker(config)?;
    let mut provider = FileSnapshotProvider::new(&config.snapshot_path);
    info!(
        "Tracking {} {} ({:?})",
        tracker.category(),
        tracker.version(),
        tracker.mode()
    );
    info!("Polling snapshot {}", provider.path().display());

    let interval = Duration::from_millis(config.poll_interval_ms);
    let mut ticks = 0u64;
    loop {
        if tick(&mut tracker, &mut provider)? {
            log_summary(&tracker);
        }
        ticks += 1;
        if config.max_ticks.is_some_and(|max| ticks >= max) {
            break;
        }
        thread::sleep(interval);
    }

    info!("Stopped after {ticks} ticks, {} passes", tracker.passes());
    Ok(())
}

fn tick(tracker: &mut Tracker, provider: &mut dyn SnapshotProvider) -> Result<bool> {
    Ok(tracker.tick(provider)?)
}
