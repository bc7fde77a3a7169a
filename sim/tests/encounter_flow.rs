//! End-to-end runs of the encounter lifecycle: spawn, combat, resolution,
//! respawn, and watchdog recovery after a lost frontend.

use encounter_shared::{get_scenario_by_id, AttributeProfile, CombatantProfile, Location};
use encounter_sim::{
    CombatEngine, CombatState, ContentCatalog, EncounterConfig, EncounterEvent, EncounterManager,
    Side, SkipReason, SpawnOutcome, SpawnPoint,
};

fn forest_catalog() -> ContentCatalog {
    let goblin_ambush = get_scenario_by_id(1).expect("builtin scenario");
    assert_eq!(goblin_ambush.location, Location::Forest);

    let mut catalog = ContentCatalog::new();
    catalog.load_scenarios(vec![goblin_ambush]);
    catalog.load_markers(encounter_shared::get_marker_definitions());
    catalog.add_spawn_point(SpawnPoint {
        id: 1,
        location: Location::Forest,
        position: [30.0, 0.0, 0.0],
        offset: [0.0, 4.0, 0.0],
        enabled: true,
        marker_override: None,
    });
    catalog
}

fn swordsman() -> CombatantProfile {
    CombatantProfile {
        name: "Swordsman".into(),
        attributes: AttributeProfile {
            strength: 24, // Rusty Sword lands for 15
            vitality: 5,
            ..Default::default()
        },
        abilities: vec![1],
    }
}

#[test]
fn spawn_combat_resolve_respawn() {
    let mut manager = EncounterManager::new(
        forest_catalog(),
        EncounterConfig {
            initial_spawn_stagger_secs: 0.0,
            respawn_delay_secs: 1.0,
            ..Default::default()
        },
    );

    let events = manager.bootstrap();
    assert_eq!(events.len(), 1);
    let scenario_id = match &events[0] {
        EncounterEvent::Spawned {
            location,
            scenario_id,
            ..
        } => {
            assert_eq!(*location, Location::Forest);
            *scenario_id
        }
        other => panic!("expected spawn, got {:?}", other),
    };

    // the location is exclusively claimed until the encounter resolves
    assert_eq!(
        manager.try_spawn(Location::Forest),
        SpawnOutcome::Skipped(SkipReason::AlreadyLocked)
    );

    // the player picks the combat option; the scenario's opponent fights
    let scenario = manager
        .catalog()
        .scenario_by_id(scenario_id)
        .expect("scenario")
        .clone();
    let opponent = scenario.opponent.expect("combat scenario has an opponent");

    let mut combat = CombatEngine::new();
    let player = swordsman();
    combat.start(&player, &opponent).expect("combat starts");

    let mut ticks = 0;
    while combat.is_running() {
        combat.tick();
        ticks += 1;
        assert!(ticks < 10_000, "combat must terminate");
    }
    assert_eq!(combat.state(), CombatState::Finished(Side::Attacker));
    assert_eq!(combat.defender().expect("defender").health, 0.0);

    // report the resolution; the lock opens and a respawn is scheduled
    let events = manager.on_resolved(Location::Forest, scenario_id);
    assert_eq!(events.len(), 1);
    assert!(!manager.lock(Location::Forest).expect("lock").is_locked());

    // duplicate resolution from a confused frontend is a no-op
    assert!(manager.on_resolved(Location::Forest, scenario_id).is_empty());

    // after the respawn delay the location offers an encounter again
    assert!(manager.update(0.5).is_empty());
    let events = manager.update(0.6);
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], EncounterEvent::Spawned { .. }));
    assert!(manager.lock(Location::Forest).expect("lock").is_locked());
}

#[test]
fn lost_marker_recovers_without_unlocking() {
    let mut manager = EncounterManager::new(
        forest_catalog(),
        EncounterConfig {
            initial_spawn_stagger_secs: 0.0,
            watchdog_timeout_secs: 5.0,
            watchdog_interval_secs: 10.0,
            ..Default::default()
        },
    );

    let events = manager.bootstrap();
    let (scenario_id, marker_id) = match &events[0] {
        EncounterEvent::Spawned {
            scenario_id,
            marker_id,
            ..
        } => (*scenario_id, *marker_id),
        other => panic!("expected spawn, got {:?}", other),
    };

    // the frontend crashes: the marker disappears, no resolution ever comes
    assert!(manager.destroy_marker(marker_id));

    let mut respawns = Vec::new();
    for _ in 0..10 {
        let events = manager.update(1.0);
        assert!(
            manager.lock(Location::Forest).expect("lock").is_locked(),
            "the lock must never open during recovery"
        );
        respawns.extend(events);
    }

    // one scan fired (at the 10s mark) and produced exactly one recovery
    assert_eq!(respawns.len(), 1);
    match &respawns[0] {
        EncounterEvent::WatchdogRespawn {
            location,
            scenario_id: respawned,
            marker_id: new_marker,
            ..
        } => {
            assert_eq!(*location, Location::Forest);
            assert_eq!(*respawned, scenario_id, "the same scenario is replayed");
            assert!(manager.marker(*new_marker).expect("marker").active);
        }
        other => panic!("expected watchdog respawn, got {:?}", other),
    }

    let lock = manager.lock(Location::Forest).expect("lock");
    assert_eq!(lock.bound_scenario(), Some(scenario_id));
}
