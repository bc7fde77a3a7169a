//! Ability definitions shared between content and simulation.

use serde::{Deserialize, Serialize};
use crate::AttributeProfile;

// =============================================================================
// Ability Types
// =============================================================================

/// Primary damage classification of an ability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageType {
    Physical,
    Elemental,
}

/// Elemental alignment for elemental damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Element {
    None,
    Fire,
    Water,
    Earth,
    Air,
}

/// Per-attribute percentage weights (0-100) feeding a damage formula
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeWeights {
    pub strength: f32,
    pub charisma: f32,
    pub wisdom: f32,
    pub intelligence: f32,
    pub vitality: f32,
    pub dexterity: f32,
}

impl AttributeWeights {
    /// Weighted contribution of a profile, in raw attribute points
    pub fn apply(&self, profile: &AttributeProfile) -> f32 {
        profile.strength as f32 * (self.strength / 100.0)
            + profile.charisma as f32 * (self.charisma / 100.0)
            + profile.wisdom as f32 * (self.wisdom / 100.0)
            + profile.intelligence as f32 * (self.intelligence / 100.0)
            + profile.vitality as f32 * (self.vitality / 100.0)
            + profile.dexterity as f32 * (self.dexterity / 100.0)
    }
}

/// Ability definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityDef {
    /// Unique ability ID
    pub id: u32,
    /// Display name
    pub name: String,
    /// Description for tooltip
    pub description: String,
    /// Icon path (relative to the frontend's icon root)
    pub icon: String,
    pub damage_type: DamageType,
    pub element: Element,
    /// Flat physical damage before attribute scaling
    pub base_physical: i32,
    pub physical_weights: AttributeWeights,
    /// Flat elemental damage before attribute scaling
    pub base_elemental: i32,
    pub elemental_weights: AttributeWeights,
    /// Cooldown between activations in seconds
    pub cooldown_secs: f32,
    /// Flat heal applied to the user on activation
    pub heal_base: i32,
    /// Heal bonus as a percentage of the user's vitality (0-500)
    pub heal_vitality_pct: f32,
}

impl AbilityDef {
    /// Physical damage against the given attribute profile, rounded to the
    /// nearest integer (half away from zero).
    pub fn physical_damage(&self, profile: &AttributeProfile) -> i32 {
        self.base_physical + self.physical_weights.apply(profile).round() as i32
    }

    /// Elemental damage against the given attribute profile
    pub fn elemental_damage(&self, profile: &AttributeProfile) -> i32 {
        self.base_elemental + self.elemental_weights.apply(profile).round() as i32
    }

    /// Total self-heal for the given user profile, never negative
    pub fn heal_amount(&self, profile: &AttributeProfile) -> i32 {
        let bonus = (profile.vitality as f32 * (self.heal_vitality_pct / 100.0)).round() as i32;
        let total = self.heal_base + bonus;
        total.max(0)
    }
}

// =============================================================================
// Ability Definitions
// =============================================================================

/// Get all ability definitions
pub fn get_ability_definitions() -> Vec<AbilityDef> {
    vec![
        AbilityDef {
            id: 1,
            name: "Rusty Sword".into(),
            description: "A worn blade. Damage scales with Strength.".into(),
            icon: "rusty_sword.png".into(),
            damage_type: DamageType::Physical,
            element: Element::None,
            base_physical: 3,
            physical_weights: AttributeWeights {
                strength: 50.0,
                ..Default::default()
            },
            base_elemental: 0,
            elemental_weights: AttributeWeights::default(),
            cooldown_secs: 1.0,
            heal_base: 0,
            heal_vitality_pct: 0.0,
        },
        AbilityDef {
            id: 2,
            name: "Ember Wand".into(),
            description: "Hurls a small gout of flame, scaling with Intelligence and Wisdom.".into(),
            icon: "ember_wand.png".into(),
            damage_type: DamageType::Elemental,
            element: Element::Fire,
            base_physical: 0,
            physical_weights: AttributeWeights::default(),
            base_elemental: 2,
            elemental_weights: AttributeWeights {
                intelligence: 40.0,
                wisdom: 20.0,
                ..Default::default()
            },
            cooldown_secs: 1.5,
            heal_base: 0,
            heal_vitality_pct: 0.0,
        },
        AbilityDef {
            id: 3,
            name: "Healing Salve".into(),
            description: "Restores a little health, improved by Vitality.".into(),
            icon: "healing_salve.png".into(),
            damage_type: DamageType::Physical,
            element: Element::None,
            base_physical: 0,
            physical_weights: AttributeWeights::default(),
            base_elemental: 0,
            elemental_weights: AttributeWeights::default(),
            cooldown_secs: 3.0,
            heal_base: 4,
            heal_vitality_pct: 30.0,
        },
        AbilityDef {
            id: 4,
            name: "Hunting Bow".into(),
            description: "A quick shot. Damage scales with Dexterity.".into(),
            icon: "hunting_bow.png".into(),
            damage_type: DamageType::Physical,
            element: Element::Air,
            base_physical: 2,
            physical_weights: AttributeWeights {
                dexterity: 60.0,
                ..Default::default()
            },
            base_elemental: 0,
            elemental_weights: AttributeWeights::default(),
            cooldown_secs: 1.2,
            heal_base: 0,
            heal_vitality_pct: 0.0,
        },
        AbilityDef {
            id: 5,
            name: "Goblin Club".into(),
            description: "A crude bludgeon favored by goblins.".into(),
            icon: "goblin_club.png".into(),
            damage_type: DamageType::Physical,
            element: Element::None,
            base_physical: 2,
            physical_weights: AttributeWeights {
                strength: 40.0,
                ..Default::default()
            },
            base_elemental: 0,
            elemental_weights: AttributeWeights::default(),
            cooldown_secs: 1.0,
            heal_base: 0,
            heal_vitality_pct: 0.0,
        },
        AbilityDef {
            id: 6,
            name: "Wolf Fangs".into(),
            description: "A snapping bite, scaling with Strength and Dexterity.".into(),
            icon: "wolf_fangs.png".into(),
            damage_type: DamageType::Physical,
            element: Element::None,
            base_physical: 1,
            physical_weights: AttributeWeights {
                strength: 30.0,
                dexterity: 30.0,
                ..Default::default()
            },
            base_elemental: 0,
            elemental_weights: AttributeWeights::default(),
            cooldown_secs: 0.8,
            heal_base: 0,
            heal_vitality_pct: 0.0,
        },
        AbilityDef {
            id: 7,
            name: "Thief's Dagger".into(),
            description: "A fast, light blade for quick strikes.".into(),
            icon: "thiefs_dagger.png".into(),
            damage_type: DamageType::Physical,
            element: Element::None,
            base_physical: 1,
            physical_weights: AttributeWeights {
                dexterity: 50.0,
                ..Default::default()
            },
            base_elemental: 0,
            elemental_weights: AttributeWeights::default(),
            cooldown_secs: 0.9,
            heal_base: 0,
            heal_vitality_pct: 0.0,
        },
    ]
}

/// Get ability by ID
pub fn get_ability_by_id(id: u32) -> Option<AbilityDef> {
    get_ability_definitions().into_iter().find(|a| a.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_ability(base_physical: i32, heal_base: i32) -> AbilityDef {
        AbilityDef {
            id: 99,
            name: "Test".into(),
            description: String::new(),
            icon: String::new(),
            damage_type: DamageType::Physical,
            element: Element::None,
            base_physical,
            physical_weights: AttributeWeights::default(),
            base_elemental: 0,
            elemental_weights: AttributeWeights::default(),
            cooldown_secs: 1.0,
            heal_base,
            heal_vitality_pct: 0.0,
        }
    }

    #[test]
    fn damage_adds_weighted_attributes() {
        let mut ability = flat_ability(3, 0);
        ability.physical_weights.strength = 50.0;
        let profile = AttributeProfile {
            strength: 24,
            ..Default::default()
        };
        // 3 + round(24 * 0.5) = 15
        assert_eq!(ability.physical_damage(&profile), 15);
    }

    #[test]
    fn damage_rounds_to_nearest() {
        let mut ability = flat_ability(0, 0);
        ability.physical_weights.strength = 25.0;
        let mut profile = AttributeProfile::default();
        profile.strength = 5; // 1.25 -> 1
        assert_eq!(ability.physical_damage(&profile), 1);
        profile.strength = 7; // 1.75 -> 2
        assert_eq!(ability.physical_damage(&profile), 2);
        profile.strength = 6; // 1.5 -> 2 (half away from zero)
        assert_eq!(ability.physical_damage(&profile), 2);
    }

    #[test]
    fn heal_never_negative() {
        let ability = flat_ability(0, -5);
        let profile = AttributeProfile::default();
        assert_eq!(ability.heal_amount(&profile), 0);
    }

    #[test]
    fn heal_scales_with_vitality() {
        let mut ability = flat_ability(0, 4);
        ability.heal_vitality_pct = 30.0;
        let profile = AttributeProfile {
            vitality: 10,
            ..Default::default()
        };
        // 4 + round(10 * 0.3) = 7
        assert_eq!(ability.heal_amount(&profile), 7);
    }

    #[test]
    fn builtin_ability_ids_are_unique() {
        let defs = get_ability_definitions();
        for (i, a) in defs.iter().enumerate() {
            for b in defs.iter().skip(i + 1) {
                assert_ne!(a.id, b.id, "duplicate ability id {}", a.id);
            }
        }
    }

    #[test]
    fn lookup_by_id() {
        assert!(get_ability_by_id(1).is_some());
        assert!(get_ability_by_id(9999).is_none());
    }
}
