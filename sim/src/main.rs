//! Headless encounter simulation demo.
//!
//! Runs the encounter manager and combat engine on a fixed-step loop with a
//! scripted stand-in for the presentation layer: spawned encounters are
//! opened, an option is played out (combat runs to completion, passive
//! checks are rolled), drops are granted, and the resolution is reported
//! back so the next encounter can spawn.

use std::time::{Duration, Instant};

use log::{info, warn};

use encounter_shared::{
    AttributeProfile, CombatantProfile, DropEntry, Location, OptionDef, OptionKind, ScenarioDef,
};
use encounter_sim::{
    roll_drops, CombatEngine, CombatEvent, ContentCatalog, EncounterConfig, EncounterEvent,
    EncounterManager, Side,
};

/// Simulation tick rate in Hz
const TICK_RATE: u32 = 20;

/// Simulated seconds the demo runs before exiting
const RUN_SECS: f32 = 40.0;

/// The demo player: a sturdy all-rounder with a sword and a salve
fn demo_player() -> CombatantProfile {
    CombatantProfile {
        name: "Aldric".into(),
        attributes: AttributeProfile {
            strength: 9,
            charisma: 6,
            wisdom: 6,
            intelligence: 4,
            vitality: 8,
            dexterity: 7,
        },
        abilities: vec![1, 3], // Rusty Sword, Healing Salve
    }
}

/// The option the scripted presenter plays: the first combat option if the
/// scenario has one, the first option otherwise
fn pick_option<'a>(scenario: &'a ScenarioDef) -> Option<(usize, &'a OptionDef)> {
    let index = scenario
        .options
        .iter()
        .position(|o| o.kind == OptionKind::Combat)
        .or(if scenario.options.is_empty() { None } else { Some(0) })?;
    Some((index, &scenario.options[index]))
}

fn grant_drops(drops: &[DropEntry]) {
    for award in roll_drops(drops) {
        info!("Received asset {} x{}", award.asset_id, award.quantity);
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting encounter simulation...");
    info!("Tick rate: {} Hz", TICK_RATE);

    let mut catalog = ContentCatalog::with_defaults();
    if !catalog.load_spawn_points_from_json("spawn_points.json") {
        info!("No spawn_points.json found, using built-in spawn points");
    }

    let config = EncounterConfig {
        watchdog_timeout_secs: 15.0,
        ..Default::default()
    };
    let mut manager = EncounterManager::new(catalog, config);
    let player = demo_player();
    let mut combat = CombatEngine::new();

    let mut events = manager.bootstrap();

    // the encounter the presenter is currently playing out
    let mut open_encounter: Option<(Location, u32, usize)> = None;

    let tick_duration = Duration::from_secs_f64(1.0 / TICK_RATE as f64);
    let mut last_tick = Instant::now();
    let mut elapsed = 0.0f32;

    loop {
        let tick_start = Instant::now();
        let delta = last_tick.elapsed().as_secs_f32();
        last_tick = Instant::now();

        events.extend(manager.update(delta));

        for event in std::mem::take(&mut events) {
            let (location, scenario_id) = match event {
                EncounterEvent::Spawned {
                    location,
                    scenario_id,
                    ..
                }
                | EncounterEvent::WatchdogRespawn {
                    location,
                    scenario_id,
                    ..
                } => (location, scenario_id),
                EncounterEvent::Resolved { .. } => continue,
            };
            // play out one encounter at a time
            if open_encounter.is_some() || combat.is_running() {
                continue;
            }

            let scenario = match manager.catalog().scenario_by_id(scenario_id) {
                Some(s) => s.clone(),
                None => {
                    warn!("Spawned scenario {} is not in the catalog", scenario_id);
                    continue;
                }
            };
            info!("Opening encounter '{}' at {}", scenario.name, location.name());

            let (index, option) = match pick_option(&scenario) {
                Some(picked) => picked,
                None => {
                    warn!("Scenario '{}' has no options, resolving as-is", scenario.name);
                    events.extend(manager.on_resolved(location, scenario_id));
                    continue;
                }
            };
            info!("Choosing option '{}'", option.label);

            match option.kind {
                OptionKind::Combat => match &scenario.opponent {
                    Some(opponent) => match combat.start(&player, opponent) {
                        Ok(()) => open_encounter = Some((location, scenario_id, index)),
                        Err(e) => {
                            warn!("Could not start combat: {}", e);
                            events.extend(manager.on_resolved(location, scenario_id));
                        }
                    },
                    None => {
                        warn!(
                            "Scenario '{}' offers combat but defines no opponent",
                            scenario.name
                        );
                        events.extend(manager.on_resolved(location, scenario_id));
                    }
                },
                OptionKind::Passive => {
                    let passed = option
                        .requirements
                        .iter()
                        .all(|r| r.passes(&player.attributes));
                    if passed {
                        info!("{} passes the check", player.name);
                        grant_drops(&option.drops);
                    } else {
                        info!("{} fails the check, no reward", player.name);
                    }
                    events.extend(manager.on_resolved(location, scenario_id));
                }
            }
        }

        for combat_event in combat.update(delta) {
            if let CombatEvent::Finished(side) = combat_event {
                if let Some((location, scenario_id, index)) = open_encounter.take() {
                    if side == Side::Attacker {
                        info!("{} wins the combat", player.name);
                        let drops = manager
                            .catalog()
                            .scenario_by_id(scenario_id)
                            .and_then(|s| s.option(index))
                            .map(|o| o.drops.clone())
                            .unwrap_or_default();
                        grant_drops(&drops);
                    } else {
                        info!("{} was defeated", player.name);
                    }
                    events.extend(manager.on_resolved(location, scenario_id));
                }
            }
        }

        elapsed += delta;
        if elapsed >= RUN_SECS {
            break;
        }

        let tick_elapsed = tick_start.elapsed();
        if tick_elapsed < tick_duration {
            tokio::time::sleep(tick_duration - tick_elapsed).await;
        }
    }

    info!("Simulation complete after {:.0} simulated seconds", elapsed);
}
