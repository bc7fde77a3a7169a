//! Encounter lifecycle management.
//!
//! Each location offers at most one exclusive encounter at a time. The
//! manager owns the per-location locks, picks scenario, spawn point, and
//! marker at random, schedules respawns after resolution, and runs a
//! watchdog that recovers encounters whose marker was lost without a
//! resolution signal, so the frontend never has to nudge the world back to
//! life.

mod lock;

pub use lock::EncounterLock;

use std::collections::HashMap;

use log::{debug, info, warn};
use rand::Rng;

use encounter_shared::{Location, WATCHDOG_INTERVAL_SECS};

use crate::catalog::{ContentCatalog, SpawnPoint};

/// Tunables for spawning and recovery
#[derive(Debug, Clone)]
pub struct EncounterConfig {
    /// Delay between successive locations' first spawn at bootstrap
    pub initial_spawn_stagger_secs: f32,
    /// Delay before a location offers a new encounter after one resolves
    pub respawn_delay_secs: f32,
    /// Lock age after which the watchdog forces a respawn; 0 disables
    /// forcing entirely. Must exceed the frontend's expected round-trip
    /// time when enabled.
    pub watchdog_timeout_secs: f32,
    /// Interval between watchdog scans
    pub watchdog_interval_secs: f32,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            initial_spawn_stagger_secs: 2.0,
            respawn_delay_secs: 3.0,
            watchdog_timeout_secs: 0.0,
            watchdog_interval_secs: WATCHDOG_INTERVAL_SECS,
        }
    }
}

/// World-visible marker for a spawned, unresolved encounter
#[derive(Debug, Clone)]
pub struct Marker {
    pub id: u64,
    pub template_id: u32,
    /// Always equals the bound scenario's location; wildcard templates are
    /// specialized at spawn time
    pub location: Location,
    pub position: [f32; 3],
    pub scenario_id: u32,
    /// Cleared when the frontend hides the marker without destroying it
    pub active: bool,
}

/// Why a spawn attempt did not produce an encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyLocked,
    NoSpawnPoint,
    NoScenario,
    NoMarkerTemplate,
}

/// Outcome of a spawn attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned(u64),
    Skipped(SkipReason),
}

/// Events emitted for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum EncounterEvent {
    Spawned {
        location: Location,
        scenario_id: u32,
        marker_id: u64,
        template_id: u32,
        position: [f32; 3],
    },
    Resolved {
        location: Location,
        scenario_id: u32,
    },
    /// Forced respawn of a lost or stuck encounter. Logged distinctly from
    /// normal spawns; the bound scenario is replayed, not rerolled.
    WatchdogRespawn {
        location: Location,
        scenario_id: u32,
        marker_id: u64,
        template_id: u32,
        position: [f32; 3],
    },
}

/// Owns the per-location encounter locks and the live marker table
pub struct EncounterManager {
    catalog: ContentCatalog,
    config: EncounterConfig,
    locks: HashMap<Location, EncounterLock>,
    markers: HashMap<u64, Marker>,
    next_marker_id: u64,
    /// Simulation clock in seconds, advanced by `update`
    clock: f64,
    /// Time since the last watchdog scan
    watchdog_elapsed: f32,
}

impl EncounterManager {
    pub fn new(catalog: ContentCatalog, config: EncounterConfig) -> Self {
        let mut locks = HashMap::new();
        for location in Location::all() {
            locks.insert(location, EncounterLock::default());
        }
        Self {
            catalog,
            config,
            locks,
            markers: HashMap::new(),
            next_marker_id: 1000, // keep marker ids clear of content ids
            clock: 0.0,
            watchdog_elapsed: 0.0,
        }
    }

    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    pub fn now(&self) -> f64 {
        self.clock
    }

    pub fn lock(&self, location: Location) -> Option<&EncounterLock> {
        self.locks.get(&location)
    }

    pub fn marker(&self, id: u64) -> Option<&Marker> {
        self.markers.get(&id)
    }

    pub fn markers(&self) -> Vec<&Marker> {
        self.markers.values().collect()
    }

    /// Remove a marker out of band, as a crashing frontend or a scene
    /// unload would. The lock is left untouched; the watchdog is what
    /// recovers from this.
    pub fn destroy_marker(&mut self, id: u64) -> bool {
        self.markers.remove(&id).is_some()
    }

    pub fn set_marker_active(&mut self, id: u64, active: bool) {
        if let Some(marker) = self.markers.get_mut(&id) {
            marker.active = active;
        }
    }

    /// Attempt one initial spawn per location that has content, honoring
    /// the inter-location stagger delay. Locations without enabled points
    /// or scenarios are logged and skipped.
    pub fn bootstrap(&mut self) -> Vec<EncounterEvent> {
        let mut events = Vec::new();
        let mut staggered: u32 = 0;
        for location in Location::all() {
            if self.catalog.enabled_points_for(location).is_empty() {
                info!(
                    "No enabled spawn points for {}, skipping initial spawn",
                    location.name()
                );
                continue;
            }
            if self.catalog.scenarios_for(location).is_empty() {
                info!("No scenarios for {}, skipping initial spawn", location.name());
                continue;
            }

            let delay = self.config.initial_spawn_stagger_secs * staggered as f32;
            staggered += 1;

            if delay > 0.0 {
                let at = self.clock + delay as f64;
                if let Some(lock) = self.locks.get_mut(&location) {
                    lock.schedule_spawn(at);
                }
                debug!("Initial spawn for {} scheduled in {:.1}s", location.name(), delay);
            } else if let SpawnOutcome::Spawned(marker_id) = self.try_spawn(location) {
                if let Some(event) = self.spawned_event(marker_id) {
                    events.push(event);
                }
            }
        }
        events
    }

    /// Try to claim `location` and spawn a marker for a randomly selected
    /// scenario. Configuration gaps are non-fatal: the attempt is skipped
    /// and logged, and other locations keep operating.
    pub fn try_spawn(&mut self, location: Location) -> SpawnOutcome {
        if self.locks.get(&location).map_or(false, |l| l.is_locked()) {
            debug!("{} already has an active encounter", location.name());
            return SpawnOutcome::Skipped(SkipReason::AlreadyLocked);
        }

        let point = match self.pick_spawn_point(location) {
            Some(p) => p,
            None => {
                warn!("No enabled spawn point for {}", location.name());
                return SpawnOutcome::Skipped(SkipReason::NoSpawnPoint);
            }
        };

        let scenario_id = match self.pick_scenario(location) {
            Some(id) => id,
            None => {
                warn!("No scenario available for {}", location.name());
                return SpawnOutcome::Skipped(SkipReason::NoScenario);
            }
        };

        let template_id = match self.pick_marker_template(location, &point) {
            Some(id) => id,
            None => {
                warn!("No marker templates loaded, cannot spawn at {}", location.name());
                return SpawnOutcome::Skipped(SkipReason::NoMarkerTemplate);
            }
        };

        let now = self.clock;
        let marker_id =
            self.place_marker(location, scenario_id, template_id, point.marker_position());
        if let Some(lock) = self.locks.get_mut(&location) {
            lock.engage(marker_id, scenario_id, now);
        }

        info!(
            "Spawned encounter at {}: scenario {}, marker {} (template {})",
            location.name(),
            scenario_id,
            marker_id,
            template_id
        );
        SpawnOutcome::Spawned(marker_id)
    }

    /// Resolution signal from the presentation layer. Idempotent: a second
    /// call for an already-unlocked location is a no-op.
    pub fn on_resolved(&mut self, location: Location, scenario_id: u32) -> Vec<EncounterEvent> {
        let now = self.clock;
        let marker_id = {
            let lock = match self.locks.get_mut(&location) {
                Some(l) => l,
                None => return Vec::new(),
            };
            if !lock.is_locked() {
                warn!(
                    "Resolution reported for {} but no encounter is active, ignoring",
                    location.name()
                );
                return Vec::new();
            }
            if lock.bound_scenario() != Some(scenario_id) {
                warn!(
                    "Resolution for {} names scenario {} but {:?} is bound",
                    location.name(),
                    scenario_id,
                    lock.bound_scenario()
                );
            }
            let marker_id = lock.active_marker();
            lock.release();
            marker_id
        };
        if let Some(id) = marker_id {
            self.markers.remove(&id);
        }

        info!("Encounter resolved at {} (scenario {})", location.name(), scenario_id);
        let mut events = vec![EncounterEvent::Resolved {
            location,
            scenario_id,
        }];

        let delay = self.config.respawn_delay_secs;
        if delay > 0.0 {
            if let Some(lock) = self.locks.get_mut(&location) {
                lock.schedule_spawn(now + delay as f64);
            }
            debug!("Respawn for {} scheduled in {:.1}s", location.name(), delay);
        } else if let SpawnOutcome::Spawned(marker_id) = self.try_spawn(location) {
            if let Some(event) = self.spawned_event(marker_id) {
                events.push(event);
            }
        }
        events
    }

    /// Advance the clock, firing due scheduled spawns and periodic watchdog
    /// scans. Returns events for the presentation layer.
    pub fn update(&mut self, delta: f32) -> Vec<EncounterEvent> {
        self.clock += delta as f64;
        let mut events = Vec::new();

        let due: Vec<Location> = self
            .locks
            .iter()
            .filter(|(_, lock)| {
                !lock.is_locked()
                    && lock.scheduled_spawn().map_or(false, |at| at <= self.clock)
            })
            .map(|(location, _)| *location)
            .collect();
        for location in due {
            if let Some(lock) = self.locks.get_mut(&location) {
                lock.clear_scheduled_spawn();
            }
            if let SpawnOutcome::Spawned(marker_id) = self.try_spawn(location) {
                if let Some(event) = self.spawned_event(marker_id) {
                    events.push(event);
                }
            }
        }

        self.watchdog_elapsed += delta;
        if self.watchdog_elapsed >= self.config.watchdog_interval_secs {
            self.watchdog_elapsed = 0.0;
            events.extend(self.watchdog_scan());
        }
        events
    }

    /// Scan every locked location and force-respawn encounters whose marker
    /// was lost, or whose lock went stale with the marker still present.
    /// The bound scenario is replayed at a newly drawn enabled point and the
    /// lock is never released in between.
    pub fn watchdog_scan(&mut self) -> Vec<EncounterEvent> {
        let mut events = Vec::new();
        let timeout = self.config.watchdog_timeout_secs as f64;
        if timeout <= 0.0 {
            return events;
        }
        let now = self.clock;

        let locked: Vec<Location> = self
            .locks
            .iter()
            .filter(|(_, lock)| lock.is_locked())
            .map(|(location, _)| *location)
            .collect();

        for location in locked {
            let (in_grace, marker_alive, scenario_id, old_marker, held) =
                match self.locks.get(&location) {
                    Some(lock) => (
                        lock.scheduled_spawn().map_or(false, |at| at > now),
                        lock.active_marker()
                            .and_then(|id| self.markers.get(&id))
                            .map_or(false, |m| m.active),
                        lock.bound_scenario(),
                        lock.active_marker(),
                        lock.held_for(now),
                    ),
                    None => continue,
                };

            if in_grace || held < timeout {
                continue;
            }
            let scenario_id = match scenario_id {
                Some(id) => id,
                None => continue,
            };

            let point = match self.pick_spawn_point(location) {
                Some(p) => p,
                None => {
                    warn!(
                        "Watchdog cannot respawn at {}: no enabled spawn point",
                        location.name()
                    );
                    continue;
                }
            };
            let template_id = match self.pick_marker_template(location, &point) {
                Some(id) => id,
                None => {
                    warn!(
                        "Watchdog cannot respawn at {}: no marker templates",
                        location.name()
                    );
                    continue;
                }
            };

            if let Some(old) = old_marker {
                self.markers.remove(&old);
            }
            let marker_id =
                self.place_marker(location, scenario_id, template_id, point.marker_position());
            if let Some(lock) = self.locks.get_mut(&location) {
                lock.rebind_marker(marker_id, now);
            }

            if marker_alive {
                info!(
                    "Watchdog: encounter at {} stuck for {:.0}s with marker present, respawning scenario {}",
                    location.name(),
                    held,
                    scenario_id
                );
            } else {
                info!(
                    "Watchdog: marker for {} lost without resolution, respawning scenario {}",
                    location.name(),
                    scenario_id
                );
            }

            let position = point.marker_position();
            events.push(EncounterEvent::WatchdogRespawn {
                location,
                scenario_id,
                marker_id,
                template_id,
                position,
            });
        }
        events
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Pick an enabled spawn point for a location uniformly at random
    fn pick_spawn_point(&self, location: Location) -> Option<SpawnPoint> {
        let candidates = self.catalog.enabled_points_for(location);
        if candidates.is_empty() {
            return None;
        }
        let mut rng = rand::thread_rng();
        Some(candidates[rng.gen_range(0..candidates.len())].clone())
    }

    /// Pick a scenario for a location uniformly at random
    fn pick_scenario(&self, location: Location) -> Option<u32> {
        let candidates = self.catalog.scenarios_for(location);
        if candidates.is_empty() {
            return None;
        }
        let mut rng = rand::thread_rng();
        Some(candidates[rng.gen_range(0..candidates.len())].id)
    }

    /// Pick a marker template: the point-level override wins, then a random
    /// compatible template, then any template at all as a last resort.
    fn pick_marker_template(&self, location: Location, point: &SpawnPoint) -> Option<u32> {
        if let Some(id) = point.marker_override {
            if self.catalog.marker_by_id(id).is_some() {
                return Some(id);
            }
            warn!(
                "Spawn point {} overrides unknown marker template {}",
                point.id, id
            );
        }

        let compatible = self.catalog.markers_compatible_with(location);
        let mut rng = rand::thread_rng();
        if !compatible.is_empty() {
            return Some(compatible[rng.gen_range(0..compatible.len())].id);
        }

        let all = self.catalog.markers();
        if all.is_empty() {
            return None;
        }
        warn!(
            "No marker template compatible with {}; falling back to any",
            location.name()
        );
        Some(all[rng.gen_range(0..all.len())].id)
    }

    /// Instantiate a marker bound to a scenario. Wildcard templates are
    /// specialized here: the marker's location always matches the scenario's.
    fn place_marker(
        &mut self,
        location: Location,
        scenario_id: u32,
        template_id: u32,
        position: [f32; 3],
    ) -> u64 {
        let id = self.next_marker_id;
        self.next_marker_id += 1;
        self.markers.insert(
            id,
            Marker {
                id,
                template_id,
                location,
                position,
                scenario_id,
                active: true,
            },
        );
        id
    }

    fn spawned_event(&self, marker_id: u64) -> Option<EncounterEvent> {
        self.markers.get(&marker_id).map(|m| EncounterEvent::Spawned {
            location: m.location,
            scenario_id: m.scenario_id,
            marker_id: m.id,
            template_id: m.template_id,
            position: m.position,
        })
    }
}
