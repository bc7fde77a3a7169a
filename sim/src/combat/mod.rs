//! Cooldown-driven combat simulation.
//!
//! Two combatants exchange ability activations on a fixed tick until one
//! side's health reaches zero. Abilities fire in their list order whenever
//! their cooldown has elapsed; the loop emits a health snapshot after every
//! activation and once per tick, so observers see incremental changes.

mod combatant;

pub use combatant::Combatant;

use log::{debug, info, warn};
use thiserror::Error;

use encounter_shared::{CombatantProfile, COMBAT_TICK_SECS};

/// Which side of the combat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Attacker,
    Defender,
}

/// Combat lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatState {
    Idle,
    Running,
    Finished(Side),
}

/// Events emitted while a combat runs
#[derive(Debug, Clone, PartialEq)]
pub enum CombatEvent {
    /// attacker health, attacker max, defender health, defender max
    HealthChanged(f32, f32, f32, f32),
    Finished(Side),
}

/// Rejections from [`CombatEngine::start`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CombatError {
    #[error("a combat is already running")]
    AlreadyRunning,
    #[error("neither combatant has an ability that can deal damage")]
    NoEffectiveAbilities,
}

/// Runs one combat at a time to a definite outcome
pub struct CombatEngine {
    state: CombatState,
    attacker: Option<Combatant>,
    defender: Option<Combatant>,
    /// Combat clock in seconds, advanced one fixed tick at a time
    clock: f64,
    /// Partial-tick accumulator for `update`
    pending: f32,
}

impl CombatEngine {
    pub fn new() -> Self {
        Self {
            state: CombatState::Idle,
            attacker: None,
            defender: None,
            clock: 0.0,
            pending: 0.0,
        }
    }

    pub fn state(&self) -> CombatState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == CombatState::Running
    }

    pub fn attacker(&self) -> Option<&Combatant> {
        self.attacker.as_ref()
    }

    pub fn defender(&self) -> Option<&Combatant> {
        self.defender.as_ref()
    }

    /// Start a combat between two profiles. Valid from `Idle` or `Finished`.
    /// Rejected while a combat is running, and when neither side fields an
    /// ability that can ever deal damage (such a combat could never end).
    pub fn start(
        &mut self,
        attacker: &CombatantProfile,
        defender: &CombatantProfile,
    ) -> Result<(), CombatError> {
        let attacker = Combatant::from_profile(attacker, 0.0);
        let defender = Combatant::from_profile(defender, 0.0);
        self.begin(attacker, defender)
    }

    /// Core start transition. Combatants must have their cooldown stamps at
    /// combat clock zero.
    fn begin(&mut self, attacker: Combatant, defender: Combatant) -> Result<(), CombatError> {
        if self.is_running() {
            warn!("Combat start requested while one is already running");
            return Err(CombatError::AlreadyRunning);
        }
        if !attacker.has_offensive_ability() && !defender.has_offensive_ability() {
            warn!(
                "Combat between '{}' and '{}' has no damaging ability on either side, rejecting",
                attacker.name, defender.name
            );
            return Err(CombatError::NoEffectiveAbilities);
        }

        info!("Combat started: {} vs {}", attacker.name, defender.name);
        self.clock = 0.0;
        self.pending = 0.0;
        self.attacker = Some(attacker);
        self.defender = Some(defender);
        self.state = CombatState::Running;
        Ok(())
    }

    /// Cancel a running combat without declaring a winner. Whatever health
    /// state existed at cancel time is simply discarded; no rollback.
    pub fn stop(&mut self) {
        if self.is_running() {
            info!("Combat stopped before resolution");
        }
        self.state = CombatState::Idle;
        self.attacker = None;
        self.defender = None;
        self.pending = 0.0;
    }

    /// Advance one fixed combat tick
    pub fn tick(&mut self) -> Vec<CombatEvent> {
        if !self.is_running() {
            debug!("Combat tick while not running, ignoring");
            return Vec::new();
        }
        self.clock += COMBAT_TICK_SECS as f64;

        let mut events = Vec::new();
        if let Some(winner) = self.run_side(Side::Attacker, &mut events) {
            self.finish(winner, &mut events);
            return events;
        }
        if let Some(winner) = self.run_side(Side::Defender, &mut events) {
            self.finish(winner, &mut events);
            return events;
        }
        // end-of-tick snapshot, emitted whether or not anything fired
        if let (Some(a), Some(d)) = (&self.attacker, &self.defender) {
            events.push(CombatEvent::HealthChanged(
                a.health,
                a.health_max,
                d.health,
                d.health_max,
            ));
        }
        events
    }

    /// Drive the fixed tick from a variable-rate loop
    pub fn update(&mut self, delta: f32) -> Vec<CombatEvent> {
        let mut events = Vec::new();
        self.pending += delta;
        while self.pending >= COMBAT_TICK_SECS && self.is_running() {
            self.pending -= COMBAT_TICK_SECS;
            events.extend(self.tick());
        }
        events
    }

    /// Run one side's ability loop. Returns the winning side if the target
    /// was defeated mid-loop.
    fn run_side(&mut self, side: Side, events: &mut Vec<CombatEvent>) -> Option<Side> {
        let now = self.clock;
        let (attacker, defender) = match (self.attacker.as_mut(), self.defender.as_mut()) {
            (Some(a), Some(d)) => (a, d),
            _ => return None,
        };
        let (acting, target) = match side {
            Side::Attacker => (attacker, defender),
            Side::Defender => (defender, attacker),
        };

        for index in 0..acting.abilities.len() {
            if !acting.can_activate(index, now) {
                continue;
            }

            let ability = &acting.abilities[index];
            let damage =
                ability.physical_damage(&acting.attributes) + ability.elemental_damage(&acting.attributes);
            let heal = ability.heal_amount(&acting.attributes);
            if damage <= 0 && heal <= 0 {
                // nothing would happen; the cooldown stays untouched
                continue;
            }

            if damage > 0 {
                target.apply_damage(damage);
            }
            if heal > 0 {
                acting.apply_heal(heal);
            }
            acting.record_use(index, now);

            debug!(
                "{} uses {}: damage {} -> {}, heal {} (healths {:.0}/{:.0}, {:.0}/{:.0})",
                acting.name,
                acting.abilities[index].name,
                damage,
                target.name,
                heal,
                acting.health,
                acting.health_max,
                target.health,
                target.health_max
            );

            // snapshot right after this activation, always attacker-first
            let snapshot = match side {
                Side::Attacker => CombatEvent::HealthChanged(
                    acting.health,
                    acting.health_max,
                    target.health,
                    target.health_max,
                ),
                Side::Defender => CombatEvent::HealthChanged(
                    target.health,
                    target.health_max,
                    acting.health,
                    acting.health_max,
                ),
            };
            events.push(snapshot);

            if target.is_defeated() {
                return Some(side);
            }
        }
        None
    }

    fn finish(&mut self, winner: Side, events: &mut Vec<CombatEvent>) {
        if let (Some(a), Some(d)) = (&self.attacker, &self.defender) {
            let (winner_name, loser_name) = match winner {
                Side::Attacker => (a.name.as_str(), d.name.as_str()),
                Side::Defender => (d.name.as_str(), a.name.as_str()),
            };
            info!("{} was defeated, {} wins", loser_name, winner_name);
        }
        self.state = CombatState::Finished(winner);
        events.push(CombatEvent::Finished(winner));
    }
}

impl Default for CombatEngine {
    fn default() -> Self {
        Self::new()
    }
}
