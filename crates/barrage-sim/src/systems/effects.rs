//! Delayed-effect system.
//!
//! Every pending artifact — fuses, beacons, airdrops, area fields,
//! attractors — is a record advanced uniformly once per tick. Timing
//! never depends on host scheduling.

use std::collections::HashMap;

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use barrage_core::components::*;
use barrage_core::constants::*;
use barrage_core::enums::BehaviorTag;
use barrage_core::events::FxEvent;
use barrage_core::types::{Position, Velocity};
use barrage_core::weapons::weapon_spec;
use barrage_terrain::Heightfield;

use crate::systems::explosion::{radial_damage, ExplosionRequest};
use crate::turn::PlayerScore;
use crate::world_setup::make_projectile;

/// Advance every delayed effect and attractor by one tick.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    terrain: &mut Heightfield,
    rng: &mut ChaCha8Rng,
    queue: &mut Vec<ExplosionRequest>,
    scores: &mut HashMap<u32, PlayerScore>,
    fx: &mut Vec<FxEvent>,
    despawn: &mut Vec<Entity>,
    void_y: f64,
    current_tick: u64,
) {
    let effects: Vec<(Entity, Position, DelayedEffect)> = {
        let mut query = world.query::<(&Position, &DelayedEffect)>();
        query
            .iter()
            .map(|(entity, (pos, effect))| (entity, *pos, *effect))
            .collect()
    };

    let mut updates: Vec<(Entity, Position, DelayedEffect)> = Vec::new();
    let mut strike_spawns: Vec<(Position, Velocity, Projectile)> = Vec::new();
    let mut pickup_spawns: Vec<(Position, Pickup)> = Vec::new();
    let mut field_damage: Vec<(Position, f64, f64, u32)> = Vec::new();

    for (entity, mut pos, mut effect) in effects {
        effect.remaining_secs -= DT;

        match effect.kind {
            EffectKind::Fuse {
                owner,
                weapon,
                damage,
                radius,
            } => {
                if effect.remaining_secs <= 0.0 {
                    let spec = weapon_spec(weapon);
                    queue.push(ExplosionRequest {
                        x: pos.x,
                        y: pos.y,
                        owner,
                        weapon,
                        // Fuses resolve plainly; they never re-chain.
                        behavior: BehaviorTag::Standard,
                        terrain_effect: spec.terrain_effect,
                        base_damage: damage,
                        base_radius: radius,
                        falloff_floor: spec.falloff_floor,
                        damage_mult: 1.0,
                        blast_bonus: 0.0,
                        split_depth: SPLIT_DEPTH_LIMIT,
                    });
                    despawn.push(entity);
                } else {
                    updates.push((entity, pos, effect));
                }
            }
            EffectKind::Beacon {
                owner,
                weapon,
                ref mut strikes_remaining,
                interval_secs,
            } => {
                if effect.remaining_secs <= 0.0 && *strikes_remaining > 0 {
                    *strikes_remaining -= 1;
                    effect.remaining_secs = interval_secs;

                    let jitter = rng.gen_range(-STRIKE_JITTER..STRIKE_JITTER);
                    let mut strike =
                        make_projectile(owner, weapon, BehaviorTag::Standard, current_tick);
                    strike.split_depth = SPLIT_DEPTH_LIMIT;
                    strike_spawns.push((
                        Position::new((pos.x + jitter).clamp(0.0, WORLD_WIDTH), -20.0),
                        Velocity::new(0.0, STRIKE_FALL_SPEED),
                        strike,
                    ));
                }
                if *strikes_remaining == 0 {
                    despawn.push(entity);
                } else {
                    updates.push((entity, pos, effect));
                }
            }
            EffectKind::AirDrop { loot } => {
                pos.y += AIRDROP_FALL_SPEED * DT;
                if pos.y > void_y || effect.remaining_secs <= 0.0 {
                    // Fell off the world; nothing lands.
                    despawn.push(entity);
                } else if terrain.is_below(pos.x, pos.y + 8.0) {
                    let rest = Position::new(pos.x, terrain.height_at(pos.x) - 8.0);
                    pickup_spawns.push((rest, Pickup { loot }));
                    fx.push(FxEvent::PickupLanded {
                        x: rest.x,
                        y: rest.y,
                    });
                    despawn.push(entity);
                } else {
                    updates.push((entity, pos, effect));
                }
            }
            EffectKind::AreaField {
                owner,
                radius,
                dps,
                erosion_per_sec,
                ..
            } => {
                if effect.remaining_secs <= 0.0 {
                    despawn.push(entity);
                } else {
                    // Anchored to the (eroding) surface.
                    pos.y = terrain.height_at(pos.x);
                    terrain.burn(pos.x, radius, erosion_per_sec, DT);
                    field_damage.push((pos, dps * DT, radius, owner));
                    updates.push((entity, pos, effect));
                }
            }
        }
    }

    for (entity, pos, effect) in updates {
        if let Ok(mut p) = world.get::<&mut Position>(entity) {
            *p = pos;
        }
        if let Ok(mut e) = world.get::<&mut DelayedEffect>(entity) {
            *e = effect;
        }
    }
    for (pos, vel, proj) in strike_spawns {
        world.spawn((pos, vel, proj));
    }
    for (pos, pickup) in pickup_spawns {
        world.spawn((pos, pickup));
    }
    // Field damage-over-time never consumes shields — only explosions do.
    for (center, damage, radius, owner) in field_damage {
        radial_damage(
            world,
            &center,
            damage,
            radius,
            0.0,
            Some(owner),
            false,
            scores,
            fx,
        );
    }

    // Attractor lifetimes.
    let expired: Vec<Entity> = {
        let mut query = world.query::<&Attractor>();
        query
            .iter()
            .filter(|(_, a)| a.remaining_secs - DT <= 0.0)
            .map(|(entity, _)| entity)
            .collect()
    };
    for (_entity, attractor) in world.query_mut::<&mut Attractor>() {
        attractor.remaining_secs -= DT;
    }
    despawn.extend(expired);
}
