//! Effect completion gate and turn advancement.
//!
//! The turn may only advance when no in-flight artifact remains and all
//! combatants have settled. A real-time watchdog force-clears stuck
//! resolutions (an unbreakable tunnel loop, a runaway field) so a match
//! can never wedge.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use barrage_core::components::*;
use barrage_core::constants::*;
use barrage_core::enums::{GamePhase, LootKind, TurnStage};
use barrage_core::events::FxEvent;
use barrage_core::types::Position;
use barrage_terrain::Heightfield;

use crate::systems::locomotion;
use crate::turn::TurnState;

/// The gate predicate: true while any projectile, delayed effect, or
/// attractor is alive.
pub fn blocked(world: &World) -> bool {
    world.query::<&Projectile>().iter().next().is_some()
        || world.query::<&DelayedEffect>().iter().next().is_some()
        || world.query::<&Attractor>().iter().next().is_some()
}

/// Run the gate for one tick.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    terrain: &Heightfield,
    rng: &mut ChaCha8Rng,
    fx: &mut Vec<FxEvent>,
    turn: &mut TurnState,
    phase: &mut GamePhase,
    wind: &mut f64,
    current_tick: u64,
) {
    // The Aiming->Resolving transition is the re-entrancy latch: the
    // advancement below fires at most once per quiescent window.
    if turn.stage != TurnStage::Resolving {
        return;
    }

    let stuck =
        (current_tick.saturating_sub(turn.resolve_start_tick)) as f64 * DT > WATCHDOG_SECS;
    if stuck {
        force_clear(world);
        fx.push(FxEvent::WatchdogTripped);
    } else if blocked(world) || !locomotion::all_settled(world, terrain) {
        return;
    }

    advance_turn(world, terrain, rng, fx, turn, phase, wind);
}

/// Despawn every outstanding in-flight artifact.
fn force_clear(world: &mut World) {
    let doomed: Vec<Entity> = {
        let mut list = Vec::new();
        for (entity, _) in world.query::<&Projectile>().iter() {
            list.push(entity);
        }
        for (entity, _) in world.query::<&DelayedEffect>().iter() {
            list.push(entity);
        }
        for (entity, _) in world.query::<&Attractor>().iter() {
            list.push(entity);
        }
        list
    };
    for entity in doomed {
        let _ = world.despawn(entity);
    }
}

/// Apply turn-boundary effects and hand the turn to the next living
/// combatant (or end the match).
fn advance_turn(
    world: &mut World,
    terrain: &Heightfield,
    rng: &mut ChaCha8Rng,
    fx: &mut Vec<FxEvent>,
    turn: &mut TurnState,
    phase: &mut GamePhase,
    wind: &mut f64,
) {
    tick_radiation(world, fx);
    collect_pickups(world, fx);
    maybe_airdrop(world, terrain, rng);

    // Fresh wind every turn.
    *wind = rng.gen_range(-TURN_WIND_MAX..TURN_WIND_MAX);

    let mut living: Vec<u32> = {
        let mut query = world.query::<(&Combatant, &Health)>();
        query
            .iter()
            .filter(|(_, (_, h))| h.alive())
            .map(|(_, (c, _))| c.player_id)
            .collect()
    };
    living.sort_unstable();

    if living.len() <= 1 {
        *phase = GamePhase::MatchOver;
        fx.push(FxEvent::MatchOver {
            winner: living.first().copied(),
        });
        return;
    }

    // Round-robin to the next living player id.
    let next = living
        .iter()
        .find(|&&id| id > turn.active_player)
        .or_else(|| living.first())
        .copied()
        .unwrap_or(turn.active_player);

    turn.active_player = next;
    turn.number += 1;
    turn.stage = TurnStage::Aiming;
    fx.push(FxEvent::TurnStarted {
        player_id: next,
        turn: turn.number,
    });
}

/// Radiation ticks once per turn boundary, independent of explosion
/// falloff, and bypasses shields.
fn tick_radiation(world: &mut World, fx: &mut Vec<FxEvent>) {
    let mut cured: Vec<Entity> = Vec::new();
    for (entity, (combatant, health, radiation)) in
        world.query_mut::<(&Combatant, &mut Health, &mut Radiation)>()
    {
        if !health.alive() {
            continue;
        }
        let amount = radiation.damage_per_turn.min(health.hp);
        health.hp -= amount;
        fx.push(FxEvent::Hurt {
            player_id: combatant.player_id,
            amount,
        });
        if !health.alive() {
            fx.push(FxEvent::Killed {
                player_id: combatant.player_id,
            });
        }
        radiation.turns_remaining = radiation.turns_remaining.saturating_sub(1);
        if radiation.turns_remaining == 0 {
            cured.push(entity);
        }
    }
    for entity in cured {
        let _ = world.remove_one::<Radiation>(entity);
    }
}

/// Hand each landed crate to the nearest living combatant in range.
fn collect_pickups(world: &mut World, fx: &mut Vec<FxEvent>) {
    let pickups: Vec<(Entity, Position, LootKind)> = {
        let mut query = world.query::<(&Position, &Pickup)>();
        query
            .iter()
            .map(|(entity, (pos, pickup))| (entity, *pos, pickup.loot))
            .collect()
    };
    let combatants: Vec<(Entity, u32, Position)> = crate::systems::explosion::collect_living(world);

    for (pickup_entity, pickup_pos, loot) in pickups {
        let claimant = combatants
            .iter()
            .map(|(entity, player, pos)| (*entity, *player, pickup_pos.range_to(pos)))
            .filter(|(_, _, dist)| *dist <= PICKUP_RADIUS)
            .min_by(|(_, _, a), (_, _, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let Some((entity, player_id, _)) = claimant else {
            continue;
        };
        apply_loot(world, entity, loot);
        fx.push(FxEvent::PickupCollected { player_id, loot });
        let _ = world.despawn(pickup_entity);
    }
}

fn apply_loot(world: &mut World, entity: Entity, loot: LootKind) {
    match loot {
        LootKind::RepairKit => {
            if let Ok(mut health) = world.get::<&mut Health>(entity) {
                health.hp = (health.hp + REPAIR_KIT_HEAL).min(health.max_hp);
            }
        }
        LootKind::DamageBooster => {
            if let Ok(mut buffs) = world.get::<&mut Buffs>(entity) {
                buffs.damage_mult += DAMAGE_BOOST_BONUS;
            }
        }
        LootKind::BlastBooster => {
            if let Ok(mut buffs) = world.get::<&mut Buffs>(entity) {
                buffs.blast_bonus += BLAST_BOOST_BONUS;
            }
        }
        LootKind::AegisShield => {
            if let Ok(mut buffs) = world.get::<&mut Buffs>(entity) {
                buffs.shield = Some(SHIELD_STRENGTH);
            }
        }
    }
}

/// The turn-boundary airdrop lottery.
fn maybe_airdrop(world: &mut World, terrain: &Heightfield, rng: &mut ChaCha8Rng) {
    if rng.gen::<f64>() >= AIRDROP_CHANCE {
        return;
    }
    let x = rng.gen_range(EDGE_MARGIN..WORLD_WIDTH - EDGE_MARGIN);
    let loot = match rng.gen_range(0..4u8) {
        0 => LootKind::RepairKit,
        1 => LootKind::DamageBooster,
        2 => LootKind::BlastBooster,
        _ => LootKind::AegisShield,
    };
    // Drop well above the highest surface so it always falls visibly.
    let drop_y = (terrain.height_at(x) - 500.0).min(-20.0);
    world.spawn((
        Position::new(x, drop_y),
        DelayedEffect {
            kind: EffectKind::AirDrop { loot },
            remaining_secs: AIRDROP_MAX_FALL_SECS,
        },
    ));
}
