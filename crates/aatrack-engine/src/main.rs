//! # AATrack
//!
//! Entry point for the advancement tracker.
//!
//! Reads the configuration, then polls the snapshot file (or the manual
//! checklist) and logs progress after every aggregation pass.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod snapshot;

use anyhow::Result;
use config::TrackerConfig;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("aatrack=info".parse()?))
        .init();

    info!("AATrack starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Optional config path as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => TrackerConfig::load_from(path),
        None => {
            let path = TrackerConfig::config_path();
            let config = TrackerConfig::load_from(&path);
            if !path.exists() {
                config.save_to(&path)?;
            }
            config
        },
    };

    app::run(&config)?;

    info!("AATrack shutdown complete");
    Ok(())
}
