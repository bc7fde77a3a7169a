//! Headless encounter simulation.
//!
//! Two subsystems cover the core of the world's encounter economy: the
//! encounter manager guarantees that every location periodically offers one
//! exclusive encounter (and recovers encounters whose frontend vanished),
//! and the combat engine resolves a chosen combat option to a definite
//! winner on a fixed tick.

pub mod catalog;
pub mod combat;
pub mod encounters;
pub mod loot;

pub use catalog::{ContentCatalog, SpawnPoint};
pub use combat::{CombatEngine, CombatError, CombatEvent, CombatState, Side};
pub use encounters::{
    EncounterConfig, EncounterEvent, EncounterLock, EncounterManager, Marker, SkipReason,
    SpawnOutcome,
};
pub use loot::{roll_drops, DropAward};
