//! Marker templates: the world-visible objects that represent a spawned,
//! unresolved encounter.

use serde::{Deserialize, Serialize};
use crate::Location;

/// Visual marker template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerTemplate {
    /// Unique template ID
    pub id: u32,
    pub name: String,
    /// Sprite path (relative to the frontend's icon root)
    pub icon: String,
    /// Location this template is tied to. `None` accepts any location and
    /// is specialized to the target location at spawn time.
    pub location: Option<Location>,
}

impl MarkerTemplate {
    pub fn compatible_with(&self, location: Location) -> bool {
        match self.location {
            Some(own) => own == location,
            None => true,
        }
    }
}

/// Get all marker template definitions
pub fn get_marker_definitions() -> Vec<MarkerTemplate> {
    vec![
        MarkerTemplate {
            id: 1,
            name: "Exclamation".into(),
            icon: "marker_exclamation.png".into(),
            location: None,
        },
        MarkerTemplate {
            id: 2,
            name: "Town Bell".into(),
            icon: "marker_town_bell.png".into(),
            location: Some(Location::Town),
        },
        MarkerTemplate {
            id: 3,
            name: "Forest Totem".into(),
            icon: "marker_forest_totem.png".into(),
            location: Some(Location::Forest),
        },
        MarkerTemplate {
            id: 4,
            name: "Torn Banner".into(),
            icon: "marker_torn_banner.png".into(),
            location: None,
        },
    ]
}

/// Get marker template by ID
pub fn get_marker_by_id(id: u32) -> Option<MarkerTemplate> {
    get_marker_definitions().into_iter().find(|m| m.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_is_compatible_everywhere() {
        let template = MarkerTemplate {
            id: 99,
            name: "Test".into(),
            icon: String::new(),
            location: None,
        };
        for location in Location::all() {
            assert!(template.compatible_with(location));
        }
    }

    #[test]
    fn bound_template_matches_only_its_location() {
        let template = MarkerTemplate {
            id: 99,
            name: "Test".into(),
            icon: String::new(),
            location: Some(Location::Town),
        };
        assert!(template.compatible_with(Location::Town));
        assert!(!template.compatible_with(Location::Forest));
    }

    #[test]
    fn builtin_marker_ids_are_unique() {
        let defs = get_marker_definitions();
        for (i, a) in defs.iter().enumerate() {
            for b in defs.iter().skip(i + 1) {
                assert_ne!(a.id, b.id, "duplicate marker id {}", a.id);
            }
        }
    }

    #[test]
    fn every_location_has_a_compatible_marker() {
        let defs = get_marker_definitions();
        for location in Location::all() {
            assert!(defs.iter().any(|m| m.compatible_with(location)));
        }
    }
}
