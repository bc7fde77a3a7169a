//! Runtime combatant state for a single combat.

use log::warn;

use encounter_shared::{get_ability_by_id, AbilityDef, AttributeProfile, CombatantProfile};

/// A combatant materialized for one combat run. Built fresh when the combat
/// starts and discarded when it ends; nothing here outlives the combat.
#[derive(Debug, Clone)]
pub struct Combatant {
    pub name: String,
    pub attributes: AttributeProfile,
    pub health_max: f32,
    pub health: f32,
    /// Resolved abilities in activation-priority order
    pub abilities: Vec<AbilityDef>,
    /// Last activation time per ability, on the combat clock. Stamped at
    /// build time so the first cooldown window is respected from tick one.
    last_used: Vec<f64>,
}

impl Combatant {
    /// Build a combatant from resolved parts
    pub fn new(name: String, attributes: AttributeProfile, abilities: Vec<AbilityDef>, now: f64) -> Self {
        let health_max = attributes.max_health();
        let last_used = vec![now; abilities.len()];
        Self {
            name,
            attributes,
            health_max,
            health: health_max,
            abilities,
            last_used,
        }
    }

    /// Build a combatant from its profile, resolving ability ids against the
    /// shared content table. Unknown ids are skipped with a warning.
    pub fn from_profile(profile: &CombatantProfile, now: f64) -> Self {
        let mut abilities = Vec::new();
        for id in &profile.abilities {
            match get_ability_by_id(*id) {
                Some(def) => abilities.push(def),
                None => warn!(
                    "Combatant '{}' references unknown ability {}",
                    profile.name, id
                ),
            }
        }
        Self::new(profile.name.clone(), profile.attributes, abilities, now)
    }

    /// Whether the ability at `index` is off cooldown at `now`
    pub fn can_activate(&self, index: usize, now: f64) -> bool {
        now - self.last_used[index] >= self.abilities[index].cooldown_secs as f64
    }

    pub fn record_use(&mut self, index: usize, now: f64) {
        self.last_used[index] = now;
    }

    /// Apply damage, clamped so health never goes negative
    pub fn apply_damage(&mut self, amount: i32) {
        self.health = (self.health - amount as f32).max(0.0);
    }

    /// Apply a heal, clamped at maximum health
    pub fn apply_heal(&mut self, amount: i32) {
        self.health = (self.health + amount as f32).min(self.health_max);
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0.0
    }

    /// Whether any ability can deal damage against this combatant's own
    /// attribute profile
    pub fn has_offensive_ability(&self) -> bool {
        self.abilities.iter().any(|a| {
            a.physical_damage(&self.attributes) + a.elemental_damage(&self.attributes) > 0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, vitality: i32, abilities: Vec<u32>) -> CombatantProfile {
        CombatantProfile {
            name: name.into(),
            attributes: AttributeProfile {
                vitality,
                ..Default::default()
            },
            abilities,
        }
    }

    #[test]
    fn builds_at_full_health() {
        let combatant = Combatant::from_profile(&profile("Hero", 6, vec![1]), 0.0);
        assert_eq!(combatant.health_max, 60.0);
        assert_eq!(combatant.health, 60.0);
        assert_eq!(combatant.abilities.len(), 1);
    }

    #[test]
    fn unknown_ability_ids_are_skipped() {
        let combatant = Combatant::from_profile(&profile("Hero", 6, vec![1, 9999]), 0.0);
        assert_eq!(combatant.abilities.len(), 1);
    }

    #[test]
    fn cooldown_respected_from_build_time() {
        let combatant = Combatant::from_profile(&profile("Hero", 6, vec![1]), 0.0);
        // Rusty Sword has a 1.0s cooldown; nothing is free at t = 0
        assert!(!combatant.can_activate(0, 0.0));
        assert!(!combatant.can_activate(0, 0.5));
        assert!(combatant.can_activate(0, 1.0));
    }

    #[test]
    fn damage_clamps_at_zero() {
        let mut combatant = Combatant::from_profile(&profile("Hero", 1, vec![]), 0.0);
        combatant.apply_damage(25);
        assert_eq!(combatant.health, 0.0);
        assert!(combatant.is_defeated());
    }

    #[test]
    fn heal_clamps_at_max() {
        let mut combatant = Combatant::from_profile(&profile("Hero", 3, vec![]), 0.0);
        combatant.apply_damage(5);
        combatant.apply_heal(100);
        assert_eq!(combatant.health, combatant.health_max);
    }
}
