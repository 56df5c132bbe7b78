//! # AATrack Core
//!
//! Progress model and aggregation engine for the advancement tracker.
//!
//! This crate provides:
//! - Advancements, criteria and per-player criteria progress
//! - The per-tick aggregation pass over a progress snapshot
//! - Version-aware pinned objective lists
//! - The manual checklist and its pointer hit-testing
//! - The tracker that ties them together

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod catalog;
pub mod checklist;
pub mod criteria;
pub mod objective;
pub mod pinned;
pub mod registry;
pub mod tracker;
pub mod world_state;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::catalog::*;
    pub use crate::checklist::*;
    pub use crate::criteria::*;
    pub use crate::objective::*;
    pub use crate::pinned::*;
    pub use crate::registry::*;
    pub use crate::tracker::*;
    pub use crate::world_state::*;
}

pub use prelude::*;
