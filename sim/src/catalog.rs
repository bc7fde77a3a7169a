//! Content registry: scenarios, marker templates, and spawn points.
//!
//! Scenario and marker tables come from the shared content definitions.
//! Spawn points describe where markers may appear in each location; they can
//! be loaded from a JSON file exported by the scene editor, with a hardcoded
//! fallback layout.

use std::collections::HashMap;
use std::path::Path;

use log::{error, info, warn};

use encounter_shared::{
    get_marker_definitions, get_scenario_definitions, Location, MarkerTemplate, ScenarioDef,
};

/// Spawn point for encounter markers within a location
#[derive(Debug, Clone)]
pub struct SpawnPoint {
    pub id: u32,
    pub location: Location,
    /// Base position in world coordinates
    pub position: [f32; 3],
    /// Offset applied to `position` when instantiating a marker
    pub offset: [f32; 3],
    /// Disabled points are ignored by the spawner
    pub enabled: bool,
    /// Forces a specific marker template at this point instead of a random
    /// compatible one
    pub marker_override: Option<u32>,
}

impl SpawnPoint {
    /// World position a marker spawned here ends up at
    pub fn marker_position(&self) -> [f32; 3] {
        [
            self.position[0] + self.offset[0],
            self.position[1] + self.offset[1],
            self.position[2] + self.offset[2],
        ]
    }
}

/// Read-only content catalog consumed by the encounter manager
#[derive(Debug, Clone)]
pub struct ContentCatalog {
    scenarios: Vec<ScenarioDef>,
    markers: Vec<MarkerTemplate>,
    /// Spawn points grouped by location
    spawn_points: HashMap<Location, Vec<SpawnPoint>>,
}

impl ContentCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            scenarios: Vec::new(),
            markers: Vec::new(),
            spawn_points: HashMap::new(),
        }
    }

    /// Catalog with the built-in content tables and hardcoded spawn points
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.load_scenarios(get_scenario_definitions());
        catalog.load_markers(get_marker_definitions());
        catalog.init_hardcoded_spawn_points();
        catalog
    }

    pub fn load_scenarios(&mut self, scenarios: Vec<ScenarioDef>) {
        self.scenarios = scenarios;
    }

    pub fn load_markers(&mut self, markers: Vec<MarkerTemplate>) {
        self.markers = markers;
    }

    pub fn add_spawn_point(&mut self, point: SpawnPoint) {
        self.spawn_points.entry(point.location).or_default().push(point);
    }

    /// Fallback spawn layout used when no spawn_points.json is available
    fn init_hardcoded_spawn_points(&mut self) {
        self.spawn_points.clear();
        // Town: the house by the square and the market gate
        self.add_spawn_point(SpawnPoint {
            id: 1,
            location: Location::Town,
            position: [12.0, 4.0, 0.0],
            offset: [5.0, 7.0, 0.0],
            enabled: true,
            marker_override: None,
        });
        self.add_spawn_point(SpawnPoint {
            id: 2,
            location: Location::Town,
            position: [-8.0, 2.0, 0.0],
            offset: [0.0, 5.0, 0.0],
            enabled: true,
            marker_override: Some(2), // Town Bell
        });
        // Forest: the clearing and an overgrown trailhead (disabled until the
        // second map region ships)
        self.add_spawn_point(SpawnPoint {
            id: 3,
            location: Location::Forest,
            position: [34.0, -6.0, 0.0],
            offset: [5.0, 7.0, 0.0],
            enabled: true,
            marker_override: None,
        });
        self.add_spawn_point(SpawnPoint {
            id: 4,
            location: Location::Forest,
            position: [52.0, -14.0, 0.0],
            offset: [0.0, 6.0, 0.0],
            enabled: false,
            marker_override: None,
        });
    }

    /// Load spawn points from a JSON file exported by the scene editor.
    /// Returns true if successful, false if the file is missing or invalid
    /// (the current points are kept in that case).
    pub fn load_spawn_points_from_json<P: AsRef<Path>>(&mut self, path: P) -> bool {
        let path = path.as_ref();

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read spawn points file {:?}: {}", path, e);
                }
                return false;
            }
        };

        let json: serde_json::Value = match serde_json::from_str(&content) {
            Ok(v) => v,
            Err(e) => {
                error!("Failed to parse {:?}: {}", path, e);
                return false;
            }
        };

        let obj = match json.as_object() {
            Some(o) => o,
            None => {
                error!("{:?} root is not an object", path);
                return false;
            }
        };

        let mut loaded: HashMap<Location, Vec<SpawnPoint>> = HashMap::new();
        let mut point_id = 1;

        for (location_str, points_array) in obj {
            let location = match location_str.to_lowercase().as_str() {
                "town" => Location::Town,
                "forest" => Location::Forest,
                _ => {
                    warn!("Unknown location in {:?}: {}", path, location_str);
                    continue;
                }
            };

            let points = match points_array.as_array() {
                Some(a) => a,
                None => {
                    warn!("Entries for {} are not an array", location.name());
                    continue;
                }
            };

            for point_json in points {
                if let Some(point) = Self::parse_spawn_point(point_json, location, point_id) {
                    loaded.entry(location).or_default().push(point);
                    point_id += 1;
                }
            }
        }

        if loaded.is_empty() {
            warn!("{:?} contained no valid spawn points, keeping current layout", path);
            return false;
        }

        let total: usize = loaded.values().map(|v| v.len()).sum();
        info!("Loaded {} spawn points from {:?}", total, path);
        self.spawn_points = loaded;
        true
    }

    /// Parse a single spawn point entry
    fn parse_spawn_point(
        value: &serde_json::Value,
        location: Location,
        id: u32,
    ) -> Option<SpawnPoint> {
        let obj = value.as_object()?;

        let position_json = obj.get("position")?.as_array()?;
        if position_json.len() < 3 {
            warn!("Spawn point for {} has a short position array", location.name());
            return None;
        }
        let mut position = [0.0f32; 3];
        for (i, coord) in position_json.iter().take(3).enumerate() {
            position[i] = coord.as_f64()? as f32;
        }

        let mut offset = [0.0f32; 3];
        if let Some(offset_json) = obj.get("offset").and_then(|v| v.as_array()) {
            for (i, coord) in offset_json.iter().take(3).enumerate() {
                offset[i] = coord.as_f64().unwrap_or(0.0) as f32;
            }
        }

        let enabled = obj.get("enabled").and_then(|v| v.as_bool()).unwrap_or(true);

        let marker_override = obj
            .get("marker_override")
            .and_then(|v| v.as_u64())
            .map(|v| v as u32);

        Some(SpawnPoint {
            id,
            location,
            position,
            offset,
            enabled,
            marker_override,
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Scenarios that can occur at a location
    pub fn scenarios_for(&self, location: Location) -> Vec<&ScenarioDef> {
        self.scenarios
            .iter()
            .filter(|s| s.location == location)
            .collect()
    }

    pub fn scenario_by_id(&self, id: u32) -> Option<&ScenarioDef> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    /// Marker templates compatible with a location (wildcards included)
    pub fn markers_compatible_with(&self, location: Location) -> Vec<&MarkerTemplate> {
        self.markers
            .iter()
            .filter(|m| m.compatible_with(location))
            .collect()
    }

    pub fn marker_by_id(&self, id: u32) -> Option<&MarkerTemplate> {
        self.markers.iter().find(|m| m.id == id)
    }

    /// All marker templates, compatible or not
    pub fn markers(&self) -> &[MarkerTemplate] {
        &self.markers
    }

    pub fn spawn_points_for(&self, location: Location) -> &[SpawnPoint] {
        self.spawn_points
            .get(&location)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Enabled spawn points for a location
    pub fn enabled_points_for(&self, location: Location) -> Vec<&SpawnPoint> {
        self.spawn_points_for(location)
            .iter()
            .filter(|p| p.enabled)
            .collect()
    }
}

impl Default for ContentCatalog {
    fn default() -> Self {
        Self::new()
    }
}
