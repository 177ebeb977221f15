//! Scenario tests for the match engine: determinism, termination
//! behaviors, the completion gate, and the watchdog.

use barrage_core::commands::PlayerCommand;
use barrage_core::components::{Buffs, Combatant, Health, Pickup, Projectile, Radiation};
use barrage_core::constants::*;
use barrage_core::enums::{ArchetypeKind, ControlMode, GamePhase, TurnStage};
use barrage_core::events::FxEvent;
use barrage_core::types::Position;
use barrage_core::weapons::WeaponId;

use crate::engine::{MatchConfig, MatchEngine};
use crate::systems::gate;
use crate::world_setup::PlayerSetup;

fn humans(seed: u64) -> MatchConfig {
    MatchConfig {
        seed,
        players: vec![
            PlayerSetup {
                archetype: ArchetypeKind::Trooper,
                control: ControlMode::Human,
            },
            PlayerSetup {
                archetype: ArchetypeKind::Trooper,
                control: ControlMode::Human,
            },
        ],
    }
}

fn bots(seed: u64) -> MatchConfig {
    MatchConfig {
        seed,
        players: vec![
            PlayerSetup {
                archetype: ArchetypeKind::Trooper,
                control: ControlMode::Bot,
            },
            PlayerSetup {
                archetype: ArchetypeKind::Trooper,
                control: ControlMode::Bot,
            },
        ],
    }
}

/// Start a match and consume the setup tick.
fn started(config: MatchConfig) -> MatchEngine {
    let mut engine = MatchEngine::new(config);
    engine.queue_command(PlayerCommand::StartMatch);
    engine.tick();
    engine
}

/// Tick until the turn passes to `player` (or the cap is hit),
/// collecting every event seen along the way.
fn run_until_turn_of(engine: &mut MatchEngine, player: u32, max_ticks: usize) -> Vec<FxEvent> {
    let mut events = Vec::new();
    for _ in 0..max_ticks {
        let snap = engine.tick();
        events.extend(snap.events);
        if snap.turn.active_player == player && snap.turn.stage == TurnStage::Aiming {
            return events;
        }
    }
    events
}

fn explosion_radii(events: &[FxEvent]) -> Vec<f64> {
    events
        .iter()
        .filter_map(|e| match e {
            FxEvent::Explosion { radius, .. } => Some(*radius),
            _ => None,
        })
        .collect()
}

fn index_of_first_turn_start(events: &[FxEvent], player: u32) -> Option<usize> {
    events.iter().position(
        |e| matches!(e, FxEvent::TurnStarted { player_id, .. } if *player_id == player),
    )
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = started(bots(12345));
    let mut engine_b = started(bots(12345));

    for _ in 0..600 {
        let snap_a = engine_a.tick();
        let snap_b = engine_b.tick();

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = started(bots(111));
    let mut engine_b = started(bots(222));

    let mut diverged = false;
    for _ in 0..600 {
        let snap_a = engine_a.tick();
        let snap_b = engine_b.tick();
        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent matches");
}

// ---- Match setup ----

#[test]
fn test_start_match_spawns_roster_on_surface() {
    let engine = started(humans(7));

    let mut count = 0;
    for (_entity, (_c, pos, health)) in
        &mut engine.world().query::<(&Combatant, &Position, &Health)>()
    {
        count += 1;
        assert_eq!(health.hp, MAX_HEALTH);
        let surface = engine.terrain().height_at(pos.x);
        assert!(
            (pos.y + COMBATANT_RADIUS - surface).abs() < 2.0,
            "combatant should stand on the surface: y {} vs surface {}",
            pos.y,
            surface
        );
    }
    assert_eq!(count, 2);
    assert_eq!(engine.phase(), GamePhase::Active);
}

#[test]
fn test_pause_stops_simulation() {
    let mut engine = started(humans(7));
    let t0 = engine.time().tick;

    engine.queue_command(PlayerCommand::Pause);
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, t0, "time should not advance while paused");

    engine.queue_command(PlayerCommand::Resume);
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, t0 + 10);
}

// ---- Firing rules ----

#[test]
fn test_only_active_player_may_fire() {
    let mut engine = started(humans(7));

    // Player 1 is not the active player; nothing may spawn.
    engine.queue_command(PlayerCommand::Fire {
        player_id: 1,
        angle_rad: 1.0,
        power: 0.5,
    });
    engine.tick();
    assert_eq!(engine.world().query::<&Projectile>().iter().count(), 0);
    assert_eq!(engine.turn().stage, TurnStage::Aiming);
}

#[test]
fn test_second_fire_in_turn_is_ignored() {
    let mut engine = started(humans(7));

    engine.queue_command(PlayerCommand::Fire {
        player_id: 0,
        angle_rad: 1.2,
        power: 0.4,
    });
    engine.tick();
    assert_eq!(engine.world().query::<&Projectile>().iter().count(), 1);

    engine.queue_command(PlayerCommand::Fire {
        player_id: 0,
        angle_rad: 1.2,
        power: 0.4,
    });
    engine.tick();
    assert_eq!(
        engine.world().query::<&Projectile>().iter().count(),
        1,
        "resolving stage must reject further shots"
    );
}

// ---- Baseline shell scenario ----

#[test]
fn test_baseline_shell_single_explosion_and_crater() {
    let mut engine = started(humans(7));
    let before = engine.terrain().heights().to_vec();

    engine.queue_command(PlayerCommand::Fire {
        player_id: 0,
        angle_rad: 70.0_f64.to_radians(),
        power: 0.45,
    });
    let events = run_until_turn_of(&mut engine, 1, 2000);

    let radii = explosion_radii(&events);
    assert_eq!(radii.len(), 1, "exactly one terminal explosion");

    // The crater only lowers the surface; no column ever rises.
    let after = engine.terrain().heights();
    let mut deepened = 0;
    for (col, (&b, &a)) in before.iter().zip(after).enumerate() {
        assert!(a >= b - 1e-9, "column {col} rose: {b} -> {a}");
        if a > b + 1e-9 {
            deepened += 1;
        }
    }
    assert!(deepened > 0, "the blast should deform some columns");

    // The turn advanced only after the explosion resolved.
    let explosion_idx = events
        .iter()
        .position(|e| matches!(e, FxEvent::Explosion { .. }))
        .unwrap();
    let turn_idx = index_of_first_turn_start(&events, 1).expect("turn should advance");
    assert!(explosion_idx < turn_idx);
}

// ---- Pinball scenario ----

#[test]
fn test_pinball_explodes_per_bounce_then_enhanced_final() {
    let mut engine = started(humans(7));
    engine.queue_command(PlayerCommand::SelectWeapon {
        player_id: 0,
        weapon: WeaponId::Pinball,
    });
    engine.queue_command(PlayerCommand::Fire {
        player_id: 0,
        angle_rad: 30.0_f64.to_radians(),
        power: 0.35,
    });
    let events = run_until_turn_of(&mut engine, 1, 4000);

    let radii = explosion_radii(&events);
    // max_bounces = 4: four bounce explosions, then the enhanced final.
    assert_eq!(radii.len(), 5, "got radii {radii:?}");
    let base = radii[0];
    for r in &radii[..4] {
        assert!((r - base).abs() < 1e-9, "bounce blasts share the base radius");
    }
    assert!(
        radii[4] > base,
        "final blast must be enhanced: {} vs {}",
        radii[4],
        base
    );

    assert_eq!(
        engine.world().query::<&Projectile>().iter().count(),
        0,
        "the projectile reference must be gone"
    );
}

// ---- Escalator invariants ----

#[test]
fn test_escalator_bonus_never_exceeds_cap() {
    let mut engine = started(humans(7));
    engine.queue_command(PlayerCommand::SelectWeapon {
        player_id: 0,
        weapon: WeaponId::RubberBomb,
    });
    engine.queue_command(PlayerCommand::Fire {
        player_id: 0,
        angle_rad: 40.0_f64.to_radians(),
        power: 0.4,
    });

    for _ in 0..3000 {
        engine.tick();
        for (_e, proj) in &mut engine.world().query::<&Projectile>() {
            assert!(
                proj.bounce_damage_bonus <= ESCALATOR_BONUS_CAP + 1e-9,
                "escalator bonus exceeded its cap: {}",
                proj.bounce_damage_bonus
            );
            assert!(
                proj.bounces <= proj.max_bounces,
                "counted bounces may never exceed the budget"
            );
        }
        if engine.turn().active_player == 1 {
            break;
        }
    }
}

// ---- Free wall bounces ----

#[test]
fn test_wall_bounces_never_consume_budget() {
    let mut engine = started(humans(7));
    // Hard toward the left wall: at least one free wall bounce.
    engine.queue_command(PlayerCommand::Fire {
        player_id: 0,
        angle_rad: 165.0_f64.to_radians(),
        power: 0.9,
    });

    let mut saw_projectile = false;
    for _ in 0..3000 {
        engine.tick();
        for (_e, proj) in &mut engine.world().query::<&Projectile>() {
            saw_projectile = true;
            assert_eq!(proj.bounces, 0, "wall bounces must not count");
        }
        if engine.turn().active_player == 1 {
            break;
        }
    }
    assert!(saw_projectile);
}

// ---- Cluster scenario & the completion gate ----

#[test]
fn test_cluster_fragments_all_resolve_before_turn_advances() {
    let mut engine = started(humans(7));
    engine.queue_command(PlayerCommand::SelectWeapon {
        player_id: 0,
        weapon: WeaponId::ClusterBomb,
    });
    engine.queue_command(PlayerCommand::Fire {
        player_id: 0,
        angle_rad: 55.0_f64.to_radians(),
        power: 0.4,
    });
    let events = run_until_turn_of(&mut engine, 1, 4000);

    // Parent + 6 fragments, each resolving exactly once.
    let radii = explosion_radii(&events);
    assert_eq!(radii.len(), 7, "got radii {radii:?}");

    // Every fragment explosion precedes the turn advancement.
    let turn_idx = index_of_first_turn_start(&events, 1).expect("turn should advance");
    let last_explosion_idx = events
        .iter()
        .rposition(|e| matches!(e, FxEvent::Explosion { .. }))
        .unwrap();
    assert!(last_explosion_idx < turn_idx);
    assert_eq!(engine.world().query::<&Projectile>().iter().count(), 0);
}

#[test]
fn test_split_fan_is_depth_bounded() {
    let mut engine = started(humans(7));
    engine.queue_command(PlayerCommand::SelectWeapon {
        player_id: 0,
        weapon: WeaponId::MirvHead,
    });
    engine.queue_command(PlayerCommand::Fire {
        player_id: 0,
        angle_rad: 60.0_f64.to_radians(),
        power: 0.4,
    });
    let events = run_until_turn_of(&mut engine, 1, 4000);

    // The parent splits (no explosion of its own); each of the 5
    // standard fragments resolves exactly once. Total bounded by
    // branching^depth.
    let radii = explosion_radii(&events);
    assert_eq!(radii.len(), 5, "got radii {radii:?}");
    assert_eq!(engine.world().query::<&Projectile>().iter().count(), 0);
}

// ---- Gate predicate ----

#[test]
fn test_gate_predicate_tracks_collections() {
    let mut engine = started(humans(7));
    assert!(
        !gate::blocked(engine.world()),
        "fresh match has no in-flight artifacts"
    );

    engine.queue_command(PlayerCommand::Fire {
        player_id: 0,
        angle_rad: 1.0,
        power: 0.5,
    });
    engine.tick();
    assert!(gate::blocked(engine.world()), "a shot in flight blocks");

    // The predicate is false iff all in-flight collections are empty.
    run_until_turn_of(&mut engine, 1, 2000);
    let collections_empty = engine.world().query::<&Projectile>().iter().count() == 0
        && engine
            .world()
            .query::<&barrage_core::components::DelayedEffect>()
            .iter()
            .count()
            == 0
        && engine
            .world()
            .query::<&barrage_core::components::Attractor>()
            .iter()
            .count()
            == 0;
    assert_eq!(!gate::blocked(engine.world()), collections_empty);
}

// ---- Watchdog ----

#[test]
fn test_watchdog_force_clears_stuck_resolution() {
    let mut engine = started(humans(7));
    engine.queue_command(PlayerCommand::Fire {
        player_id: 0,
        angle_rad: 1.2,
        power: 0.4,
    });
    engine.tick();
    // Wedge the resolution with an effect that will never complete.
    engine.spawn_stuck_effect(10_000.0);

    let mut tripped = false;
    let budget = ((WATCHDOG_SECS + 3.0) * TICK_RATE as f64) as usize;
    for _ in 0..budget {
        let snap = engine.tick();
        if snap
            .events
            .iter()
            .any(|e| matches!(e, FxEvent::WatchdogTripped))
        {
            tripped = true;
        }
    }
    assert!(tripped, "the watchdog must fire");
    let stuck_remaining = engine
        .world()
        .query::<&barrage_core::components::DelayedEffect>()
        .iter()
        .filter(|(_, e)| e.remaining_secs > 1_000.0)
        .count();
    assert_eq!(stuck_remaining, 0, "force-clear removes the wedged effect");
    assert_eq!(engine.turn().active_player, 1, "the turn must advance");
}

// ---- Beams ----

#[test]
fn test_beam_resolves_instantly_and_only_ablates() {
    let mut engine = started(humans(7));
    let before = engine.terrain().heights().to_vec();

    engine.queue_command(PlayerCommand::SelectWeapon {
        player_id: 0,
        weapon: WeaponId::SunLance,
    });
    engine.queue_command(PlayerCommand::Fire {
        player_id: 0,
        angle_rad: 10.0_f64.to_radians(),
        power: 1.0,
    });
    let snap = engine.tick();

    assert!(
        snap.events
            .iter()
            .any(|e| matches!(e, FxEvent::BeamPath { .. })),
        "the traced path must be reported"
    );
    // Hitscan spawns no projectile and the turn settles immediately.
    assert_eq!(engine.world().query::<&Projectile>().iter().count(), 0);
    assert_eq!(snap.turn.active_player, 1);

    for (col, (&b, &a)) in before.iter().zip(engine.terrain().heights()).enumerate() {
        assert!(a >= b - 1e-9, "beam ablation may only lower: column {col}");
    }
}

// ---- Secondary effects ----

#[test]
fn test_void_surge_raises_void_line() {
    let mut engine = started(humans(7));
    assert_eq!(engine.void_y(), VOID_START_Y);

    engine.queue_command(PlayerCommand::SelectWeapon {
        player_id: 0,
        weapon: WeaponId::VoidTide,
    });
    engine.queue_command(PlayerCommand::Fire {
        player_id: 0,
        angle_rad: 65.0_f64.to_radians(),
        power: 0.4,
    });
    run_until_turn_of(&mut engine, 1, 2000);

    assert!(
        engine.void_y() < VOID_START_Y,
        "the void line should have risen"
    );
}

#[test]
fn test_staged_blast_resolves_each_stage() {
    let mut engine = started(humans(7));
    engine.queue_command(PlayerCommand::SelectWeapon {
        player_id: 0,
        weapon: WeaponId::TsarShell,
    });
    engine.queue_command(PlayerCommand::Fire {
        player_id: 0,
        angle_rad: 60.0_f64.to_radians(),
        power: 0.4,
    });
    let events = run_until_turn_of(&mut engine, 1, 4000);

    // Primary + 3 staged sub-explosions, each radius one step wider.
    let radii = explosion_radii(&events);
    assert_eq!(radii.len(), 4, "got radii {radii:?}");
    for pair in radii.windows(2) {
        assert!(pair[1] > pair[0], "stages widen concentrically: {radii:?}");
    }
}

// ---- Turn-boundary status ----

#[test]
fn test_radiation_ticks_at_turn_boundaries() {
    let mut engine = started(humans(7));

    // Irradiate player 1 directly.
    let victim = {
        let mut query = engine.world().query::<(&Combatant, &Health)>();
        query
            .iter()
            .find(|(_, (c, _))| c.player_id == 1)
            .map(|(e, _)| e)
            .unwrap()
    };
    engine
        .world_mut()
        .insert_one(
            victim,
            Radiation {
                damage_per_turn: 8.0,
                turns_remaining: 2,
            },
        )
        .unwrap();

    // Cycle one turn with a throwaway shot.
    engine.queue_command(PlayerCommand::Fire {
        player_id: 0,
        angle_rad: 70.0_f64.to_radians(),
        power: 0.3,
    });
    run_until_turn_of(&mut engine, 1, 2000);

    let (hp, turns) = {
        let mut query = engine.world().query::<(&Combatant, &Health, &Radiation)>();
        let (_e, (_c, health, radiation)) = query
            .iter()
            .find(|(_, (c, _, _))| c.player_id == 1)
            .expect("victim still radiated");
        (health.hp, radiation.turns_remaining)
    };
    assert!((hp - (MAX_HEALTH - 8.0)).abs() < 1e-9, "hp {hp}");
    assert_eq!(turns, 1, "one radiation turn consumed");
}

#[test]
fn test_pickup_collected_at_turn_boundary() {
    let mut engine = started(humans(7));

    // Drop a crate right next to player 0.
    let owner_pos = {
        let mut query = engine.world().query::<(&Combatant, &Position)>();
        query
            .iter()
            .find(|(_, (c, _))| c.player_id == 0)
            .map(|(_, (_, pos))| *pos)
            .unwrap()
    };
    engine.world_mut().spawn((
        Position::new(owner_pos.x + 20.0, owner_pos.y),
        Pickup {
            loot: barrage_core::enums::LootKind::AegisShield,
        },
    ));

    engine.queue_command(PlayerCommand::Fire {
        player_id: 0,
        angle_rad: 70.0_f64.to_radians(),
        power: 0.3,
    });
    let events = run_until_turn_of(&mut engine, 1, 2000);

    assert!(
        events
            .iter()
            .any(|e| matches!(e, FxEvent::PickupCollected { player_id: 0, .. })),
        "the crate should be claimed at the boundary"
    );
    let shielded = {
        let mut query = engine.world().query::<(&Combatant, &Buffs)>();
        query
            .iter()
            .find(|(_, (c, _))| c.player_id == 0)
            .map(|(_, (_, buffs))| buffs.shield.is_some())
            .unwrap()
    };
    assert!(shielded, "the shield buff should be applied");
}

// ---- Full bot match ----

#[test]
fn test_bot_duel_runs_to_completion() {
    let mut engine = started(bots(31337));

    let mut over = false;
    for _ in 0..60_000 {
        let snap = engine.tick();
        if snap.phase == GamePhase::MatchOver {
            over = true;
            break;
        }
    }
    assert!(over, "a bot duel should reach a conclusion");

    let total_damage: f64 = engine.scores().values().map(|s| s.damage_dealt).sum();
    assert!(total_damage > 0.0, "someone must have landed a hit");
}

// ---- Snapshot ----

#[test]
fn test_snapshot_serializes_compactly() {
    let mut engine = started(humans(7));
    let snap = engine.tick();
    let json = serde_json::to_string(&snap).unwrap();
    let size_kb = json.len() as f64 / 1024.0;
    assert!(size_kb < 200.0, "snapshot too large: {size_kb:.1}KB");
    assert!(size_kb > 1.0, "snapshot suspiciously empty: {size_kb:.1}KB");
}
