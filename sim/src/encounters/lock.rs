//! Per-location encounter lock state.

/// Runtime claim state for one location. At most one unresolved encounter
/// may exist per location; this lock owns that claim.
///
/// The scenario binding only changes through `engage`/`release`, which keeps
/// the invariant that `bound_scenario` is set exactly while `locked`.
#[derive(Debug, Clone, Default)]
pub struct EncounterLock {
    locked: bool,
    /// Marker currently representing the claimed encounter
    active_marker: Option<u64>,
    /// Scenario exclusively claimed until resolved
    bound_scenario: Option<u32>,
    /// Clock time the current claim started
    lock_start: f64,
    /// Clock time a spawn attempt is scheduled for, if any
    scheduled_spawn: Option<f64>,
}

impl EncounterLock {
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn active_marker(&self) -> Option<u64> {
        self.active_marker
    }

    pub fn bound_scenario(&self) -> Option<u32> {
        self.bound_scenario
    }

    pub fn scheduled_spawn(&self) -> Option<f64> {
        self.scheduled_spawn
    }

    /// Seconds the current claim has been held
    pub fn held_for(&self, now: f64) -> f64 {
        now - self.lock_start
    }

    /// Claim the location for a scenario
    pub fn engage(&mut self, marker_id: u64, scenario_id: u32, now: f64) {
        self.locked = true;
        self.active_marker = Some(marker_id);
        self.bound_scenario = Some(scenario_id);
        self.lock_start = now;
        self.scheduled_spawn = None;
    }

    /// Release the claim, clearing the scenario binding in the same step
    pub fn release(&mut self) {
        self.locked = false;
        self.active_marker = None;
        self.bound_scenario = None;
        self.scheduled_spawn = None;
    }

    /// Swap in a replacement marker while keeping the claim held, restarting
    /// the staleness window
    pub fn rebind_marker(&mut self, marker_id: u64, now: f64) {
        self.active_marker = Some(marker_id);
        self.lock_start = now;
    }

    pub fn schedule_spawn(&mut self, at: f64) {
        self.scheduled_spawn = Some(at);
    }

    pub fn clear_scheduled_spawn(&mut self) {
        self.scheduled_spawn = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_bound_exactly_while_locked() {
        let mut lock = EncounterLock::default();
        assert!(!lock.is_locked());
        assert!(lock.bound_scenario().is_none());

        lock.engage(1001, 7, 5.0);
        assert!(lock.is_locked());
        assert_eq!(lock.bound_scenario(), Some(7));
        assert_eq!(lock.active_marker(), Some(1001));
        assert_eq!(lock.held_for(8.0), 3.0);

        lock.release();
        assert!(!lock.is_locked());
        assert!(lock.bound_scenario().is_none());
        assert!(lock.active_marker().is_none());
    }

    #[test]
    fn engage_clears_pending_schedule() {
        let mut lock = EncounterLock::default();
        lock.schedule_spawn(4.0);
        lock.engage(1001, 7, 4.0);
        assert!(lock.scheduled_spawn().is_none());
    }

    #[test]
    fn rebind_keeps_claim_and_restarts_window() {
        let mut lock = EncounterLock::default();
        lock.engage(1001, 7, 0.0);
        lock.rebind_marker(1002, 30.0);
        assert!(lock.is_locked());
        assert_eq!(lock.bound_scenario(), Some(7));
        assert_eq!(lock.active_marker(), Some(1002));
        assert_eq!(lock.held_for(30.0), 0.0);
    }
}
