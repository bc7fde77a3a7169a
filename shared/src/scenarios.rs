//! Scenario content: narrative units bound to a location, each offering one
//! or more resolution options (combat or passive).

use serde::{Deserialize, Serialize};
use crate::{Attribute, AttributeProfile, CombatantProfile};

// =============================================================================
// Location
// =============================================================================

/// Logical place in the world. Each location hosts at most one unresolved
/// encounter at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Location {
    Town = 0,
    Forest = 1,
}

impl Location {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Town),
            1 => Some(Self::Forest),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Town => "Town",
            Self::Forest => "Forest",
        }
    }

    /// All defined locations
    pub fn all() -> [Location; 2] {
        [Self::Town, Self::Forest]
    }
}

// =============================================================================
// Options
// =============================================================================

/// How an option resolves when the player picks it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum OptionKind {
    Combat = 0,
    Passive = 1,
}

/// Attribute check attached to a passive option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassiveRequirement {
    pub attribute: Attribute,
    /// Minimum attribute value needed to pass the check
    pub difficulty: i32,
}

impl PassiveRequirement {
    pub fn passes(&self, profile: &AttributeProfile) -> bool {
        profile.value_of(self.attribute) >= self.difficulty
    }
}

/// One entry of an option's drop table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropEntry {
    /// Reward asset that can drop
    pub asset_id: u32,
    pub min_quantity: u32,
    pub max_quantity: u32,
    /// Independent roll chance, 0.0 - 1.0 (1.0 = always)
    pub chance: f32,
}

/// A resolvable branch of a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDef {
    pub label: String,
    pub description: String,
    pub icon: String,
    /// When true the option's own icon overrides the frontend's default
    /// button sprite
    pub use_own_icon: bool,
    pub kind: OptionKind,
    /// Attribute checks applied if kind == Passive
    pub requirements: Vec<PassiveRequirement>,
    /// Possible rewards when this option resolves successfully
    pub drops: Vec<DropEntry>,
}

// =============================================================================
// Scenarios
// =============================================================================

/// Scenario definition. Immutable content once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDef {
    /// Unique scenario ID
    pub id: u32,
    pub name: String,
    pub description: String,
    pub icon: String,
    /// Location where this scenario can occur
    pub location: Location,
    /// Opponent fielded when a combat option is chosen
    pub opponent: Option<CombatantProfile>,
    /// Decision options in presentation order
    pub options: Vec<OptionDef>,
}

impl ScenarioDef {
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    pub fn option(&self, index: usize) -> Option<&OptionDef> {
        self.options.get(index)
    }
}

// =============================================================================
// Scenario Definitions
// =============================================================================

/// Get all scenario definitions
pub fn get_scenario_definitions() -> Vec<ScenarioDef> {
    vec![
        ScenarioDef {
            id: 1,
            name: "Goblin Ambush".into(),
            description: "A goblin leaps from the undergrowth, club raised.".into(),
            icon: "goblin_ambush.png".into(),
            location: Location::Forest,
            opponent: Some(CombatantProfile {
                name: "Goblin".into(),
                attributes: AttributeProfile {
                    strength: 6,
                    charisma: 2,
                    wisdom: 2,
                    intelligence: 3,
                    vitality: 4,
                    dexterity: 6,
                },
                abilities: vec![5], // Goblin Club
            }),
            options: vec![
                OptionDef {
                    label: "Fight the goblin".into(),
                    description: "Draw your weapon and meet the charge.".into(),
                    icon: "crossed_swords.png".into(),
                    use_own_icon: true,
                    kind: OptionKind::Combat,
                    requirements: vec![],
                    drops: vec![
                        DropEntry {
                            asset_id: 3, // Goblin Ear
                            min_quantity: 1,
                            max_quantity: 1,
                            chance: 1.0,
                        },
                        DropEntry {
                            asset_id: 2, // Copper Coins
                            min_quantity: 1,
                            max_quantity: 5,
                            chance: 0.5,
                        },
                    ],
                },
                OptionDef {
                    label: "Slip away".into(),
                    description: "Fade into the brush before it closes in.".into(),
                    icon: "footprints.png".into(),
                    use_own_icon: false,
                    kind: OptionKind::Passive,
                    requirements: vec![PassiveRequirement {
                        attribute: Attribute::Dexterity,
                        difficulty: 8,
                    }],
                    drops: vec![],
                },
            ],
        },
        ScenarioDef {
            id: 2,
            name: "House Fire".into(),
            description: "Smoke pours from a townhouse; shouts come from inside.".into(),
            icon: "house_fire.png".into(),
            location: Location::Town,
            opponent: None,
            options: vec![
                OptionDef {
                    label: "Douse the flames".into(),
                    description: "Organize a bucket line before the fire spreads.".into(),
                    icon: "water_bucket.png".into(),
                    use_own_icon: true,
                    kind: OptionKind::Passive,
                    requirements: vec![PassiveRequirement {
                        attribute: Attribute::Wisdom,
                        difficulty: 6,
                    }],
                    drops: vec![DropEntry {
                        asset_id: 4, // Singed Keepsake
                        min_quantity: 1,
                        max_quantity: 1,
                        chance: 1.0,
                    }],
                },
                OptionDef {
                    label: "Brave the smoke".into(),
                    description: "Push inside and carry the family out.".into(),
                    icon: "smoke.png".into(),
                    use_own_icon: false,
                    kind: OptionKind::Passive,
                    requirements: vec![PassiveRequirement {
                        attribute: Attribute::Vitality,
                        difficulty: 7,
                    }],
                    drops: vec![
                        DropEntry {
                            asset_id: 4, // Singed Keepsake
                            min_quantity: 1,
                            max_quantity: 1,
                            chance: 1.0,
                        },
                        DropEntry {
                            asset_id: 1, // Health Potion
                            min_quantity: 1,
                            max_quantity: 1,
                            chance: 0.3,
                        },
                    ],
                },
            ],
        },
        ScenarioDef {
            id: 3,
            name: "Market Thief".into(),
            description: "A cutpurse bolts through the stalls with a stolen purse.".into(),
            icon: "market_thief.png".into(),
            location: Location::Town,
            opponent: Some(CombatantProfile {
                name: "Cutpurse".into(),
                attributes: AttributeProfile {
                    strength: 3,
                    charisma: 5,
                    wisdom: 3,
                    intelligence: 5,
                    vitality: 3,
                    dexterity: 9,
                },
                abilities: vec![7, 4], // Thief's Dagger, Hunting Bow
            }),
            options: vec![
                OptionDef {
                    label: "Chase him down".into(),
                    description: "Corner the thief and take the purse back by force.".into(),
                    icon: "chase.png".into(),
                    use_own_icon: false,
                    kind: OptionKind::Combat,
                    requirements: vec![],
                    drops: vec![DropEntry {
                        asset_id: 5, // Stolen Purse
                        min_quantity: 1,
                        max_quantity: 1,
                        chance: 1.0,
                    }],
                },
                OptionDef {
                    label: "Alert the guards".into(),
                    description: "Rally the watch to cut off his escape.".into(),
                    icon: "guard_horn.png".into(),
                    use_own_icon: true,
                    kind: OptionKind::Passive,
                    requirements: vec![PassiveRequirement {
                        attribute: Attribute::Charisma,
                        difficulty: 7,
                    }],
                    drops: vec![DropEntry {
                        asset_id: 2, // Copper Coins
                        min_quantity: 1,
                        max_quantity: 3,
                        chance: 0.4,
                    }],
                },
            ],
        },
        ScenarioDef {
            id: 4,
            name: "Wolf Den".into(),
            description: "Fresh tracks lead to a den dug beneath a fallen pine.".into(),
            icon: "wolf_den.png".into(),
            location: Location::Forest,
            opponent: Some(CombatantProfile {
                name: "Old Wolf".into(),
                attributes: AttributeProfile {
                    strength: 7,
                    charisma: 1,
                    wisdom: 4,
                    intelligence: 2,
                    vitality: 5,
                    dexterity: 6,
                },
                abilities: vec![6], // Wolf Fangs
            }),
            options: vec![
                OptionDef {
                    label: "Clear the den".into(),
                    description: "Drive out the old wolf before the pack returns.".into(),
                    icon: "crossed_swords.png".into(),
                    use_own_icon: false,
                    kind: OptionKind::Combat,
                    requirements: vec![],
                    drops: vec![
                        DropEntry {
                            asset_id: 6, // Wolf Pelt
                            min_quantity: 1,
                            max_quantity: 2,
                            chance: 0.8,
                        },
                        DropEntry {
                            asset_id: 1, // Health Potion
                            min_quantity: 1,
                            max_quantity: 1,
                            chance: 0.2,
                        },
                    ],
                },
                OptionDef {
                    label: "Track the pack".into(),
                    description: "Read the trails and mark the hunting routes.".into(),
                    icon: "tracks.png".into(),
                    use_own_icon: false,
                    kind: OptionKind::Passive,
                    requirements: vec![PassiveRequirement {
                        attribute: Attribute::Wisdom,
                        difficulty: 6,
                    }],
                    drops: vec![],
                },
            ],
        },
    ]
}

/// Get scenario by ID
pub fn get_scenario_by_id(id: u32) -> Option<ScenarioDef> {
    get_scenario_definitions().into_iter().find(|s| s.id == id)
}

/// Get scenarios that can occur at a location
pub fn get_scenarios_for(location: Location) -> Vec<ScenarioDef> {
    get_scenario_definitions()
        .into_iter()
        .filter(|s| s.location == location)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_scenario_ids_are_unique() {
        let defs = get_scenario_definitions();
        for (i, a) in defs.iter().enumerate() {
            for b in defs.iter().skip(i + 1) {
                assert_ne!(a.id, b.id, "duplicate scenario id {}", a.id);
            }
        }
    }

    #[test]
    fn every_scenario_has_options() {
        for scenario in get_scenario_definitions() {
            assert!(
                scenario.option_count() > 0,
                "scenario '{}' has no options",
                scenario.name
            );
        }
    }

    #[test]
    fn combat_options_imply_an_opponent() {
        for scenario in get_scenario_definitions() {
            let has_combat = scenario
                .options
                .iter()
                .any(|o| o.kind == OptionKind::Combat);
            if has_combat {
                assert!(
                    scenario.opponent.is_some(),
                    "scenario '{}' offers combat but has no opponent",
                    scenario.name
                );
            }
        }
    }

    #[test]
    fn passive_options_carry_requirements() {
        for scenario in get_scenario_definitions() {
            for option in &scenario.options {
                if option.kind == OptionKind::Passive {
                    assert!(
                        !option.requirements.is_empty(),
                        "passive option '{}' has no requirement",
                        option.label
                    );
                }
            }
        }
    }

    #[test]
    fn drop_quantity_ranges_are_ordered() {
        for scenario in get_scenario_definitions() {
            for option in &scenario.options {
                for drop in &option.drops {
                    assert!(drop.min_quantity >= 1);
                    assert!(drop.max_quantity >= drop.min_quantity);
                    assert!((0.0..=1.0).contains(&drop.chance));
                }
            }
        }
    }

    #[test]
    fn every_location_has_a_scenario() {
        for location in Location::all() {
            assert!(
                !get_scenarios_for(location).is_empty(),
                "no scenarios for {}",
                location.name()
            );
        }
    }

    #[test]
    fn passive_requirement_check() {
        let req = PassiveRequirement {
            attribute: Attribute::Dexterity,
            difficulty: 8,
        };
        let mut profile = AttributeProfile::default();
        profile.dexterity = 8;
        assert!(req.passes(&profile));
        profile.dexterity = 7;
        assert!(!req.passes(&profile));
    }
}
