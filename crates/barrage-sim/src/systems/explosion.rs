//! Explosion resolver: damage, knockback, terrain mutation, secondary
//! effects, and reward accounting.
//!
//! Exactly one resolution per terminal event. The resolver never
//! re-enters itself: chained work is expressed as delayed effects or
//! child projectiles that resolve on later ticks.

use std::collections::HashMap;

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use barrage_core::archetypes::archetype_profile;
use barrage_core::components::*;
use barrage_core::constants::*;
use barrage_core::enums::{ArchetypeKind, BehaviorTag, TerrainEffect};
use barrage_core::events::FxEvent;
use barrage_core::types::{Position, Velocity};
use barrage_core::weapons::{weapon_spec, WeaponId};
use barrage_terrain::Heightfield;

use crate::turn::PlayerScore;
use crate::world_setup::make_projectile;

/// One pending terminal event. Ephemeral: drained every tick.
#[derive(Debug, Clone, Copy)]
pub struct ExplosionRequest {
    pub x: f64,
    pub y: f64,
    pub owner: u32,
    pub weapon: WeaponId,
    /// Behavior driving secondary effects.
    pub behavior: BehaviorTag,
    pub terrain_effect: TerrainEffect,
    pub base_damage: f64,
    pub base_radius: f64,
    pub falloff_floor: f64,
    /// Owner damage buff captured at fire time.
    pub damage_mult: f64,
    /// Owner blast buff captured at fire time.
    pub blast_bonus: f64,
    pub split_depth: u8,
}

/// Build the terminal request for a projectile at its impact point.
/// `radius_bonus` covers enhanced finals (pinball's last impact).
pub fn terminal_request(proj: &Projectile, pos: &Position, radius_bonus: f64) -> ExplosionRequest {
    let spec = weapon_spec(proj.weapon);
    ExplosionRequest {
        x: pos.x,
        y: pos.y,
        owner: proj.owner,
        weapon: proj.weapon,
        behavior: proj.behavior,
        terrain_effect: spec.terrain_effect,
        base_damage: spec.damage * proj.damage_scale + proj.bounce_damage_bonus,
        base_radius: spec.blast_radius * proj.blast_scale + radius_bonus,
        falloff_floor: spec.falloff_floor,
        damage_mult: proj.damage_mult,
        blast_bonus: proj.blast_bonus,
        split_depth: proj.split_depth,
    }
}

/// Resolve every queued explosion.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    terrain: &mut Heightfield,
    queue: &mut Vec<ExplosionRequest>,
    rng: &mut ChaCha8Rng,
    scores: &mut HashMap<u32, PlayerScore>,
    fx: &mut Vec<FxEvent>,
    void_y: &mut f64,
    current_tick: u64,
) {
    // Chained blasts never land here directly: secondaries spawn
    // delayed effects or projectiles that queue on later ticks.
    let requests = std::mem::take(queue);
    for req in requests {
        resolve_one(world, terrain, &req, rng, scores, fx, void_y, current_tick);
    }
}

#[allow(clippy::too_many_arguments)]
fn resolve_one(
    world: &mut World,
    terrain: &mut Heightfield,
    req: &ExplosionRequest,
    rng: &mut ChaCha8Rng,
    scores: &mut HashMap<u32, PlayerScore>,
    fx: &mut Vec<FxEvent>,
    void_y: &mut f64,
    current_tick: u64,
) {
    // 1. Effective damage and radius from owner buffs and archetype.
    let owner_arch_mult = find_combatant(world, req.owner)
        .map(|(_, _, arch)| archetype_profile(arch).damage_mult)
        .unwrap_or(1.0);
    let damage = req.base_damage * req.damage_mult * owner_arch_mult;
    let radius = (req.base_radius + req.blast_bonus).max(1.0);
    let center = Position::new(req.x, req.y);

    fx.push(FxEvent::Explosion {
        x: req.x,
        y: req.y,
        radius,
    });

    // 2. Falloff damage to every combatant in the blast radius.
    radial_damage(
        world,
        &center,
        damage,
        radius,
        req.falloff_floor,
        Some(req.owner),
        true,
        scores,
        fx,
    );

    // 3. Radial knockback in an enlarged radius.
    apply_knockback(world, &center, radius);

    // 4. Terrain mutation by the weapon's terrain-effect tag.
    match req.terrain_effect {
        TerrainEffect::Destroy => terrain.destroy(req.x, req.y, radius),
        TerrainEffect::Raise => terrain.raise(req.x, req.y, radius),
        TerrainEffect::RaiseJagged => {
            terrain.raise_jagged(req.x, req.y, radius, JAGGED_POINTS, rng)
        }
        TerrainEffect::DigJagged => {
            terrain.dig_jagged(req.x, req.y, radius, JAGGED_POINTS, *void_y, rng)
        }
    }
    let from_col = ((req.x - radius).max(0.0)) as u32;
    let to_col = ((req.x + radius).min(terrain.width().saturating_sub(1) as f64)) as u32;
    fx.push(FxEvent::TerrainScorched { from_col, to_col });

    // 5. Behavior-keyed secondary effects, all deferred.
    spawn_secondaries(world, terrain, req, damage, radius, void_y, current_tick);
}

/// Apply falloff damage around a center point. Shared by the resolver
/// and lightweight pulses (rollers), which skip knockback and terrain.
#[allow(clippy::too_many_arguments)]
pub fn radial_damage(
    world: &mut World,
    center: &Position,
    damage: f64,
    radius: f64,
    falloff_floor: f64,
    attacker: Option<u32>,
    consume_shield: bool,
    scores: &mut HashMap<u32, PlayerScore>,
    fx: &mut Vec<FxEvent>,
) {
    let victims = collect_living(world);
    for (entity, _player, pos) in victims {
        let dist = center.range_to(&pos);
        if dist >= radius {
            continue;
        }
        let falloff = (1.0 - dist / radius).max(falloff_floor);
        let mut amount = damage * falloff;
        if dist < DIRECT_HIT_FRACTION * radius {
            amount *= DIRECT_HIT_MULT;
        }
        apply_damage(world, entity, amount, attacker, consume_shield, scores, fx);
    }
}

/// Damage one combatant, honoring archetype resistance and the shield,
/// then book rewards for the attacker. Returns (actual damage, killed).
pub fn apply_damage(
    world: &mut World,
    entity: Entity,
    amount: f64,
    attacker: Option<u32>,
    consume_shield: bool,
    scores: &mut HashMap<u32, PlayerScore>,
    fx: &mut Vec<FxEvent>,
) -> (f64, bool) {
    let Ok((combatant, health, buffs, arch)) =
        world.query_one_mut::<(&Combatant, &mut Health, &mut Buffs, &ArchetypeKind)>(entity)
    else {
        return (0.0, false);
    };
    if !health.alive() {
        return (0.0, false);
    }

    let mut amount = amount * archetype_profile(*arch).damage_taken_mult;
    if consume_shield {
        if let Some(strength) = buffs.shield.take() {
            // The shield is fully expended regardless of damage magnitude.
            amount = (amount - strength).max(0.0);
        }
    }

    let actual = amount.min(health.hp);
    health.hp = (health.hp - amount).max(0.0);
    let killed = !health.alive();
    let victim = combatant.player_id;

    if actual > 0.0 {
        fx.push(FxEvent::Hurt {
            player_id: victim,
            amount: actual,
        });
    }
    if killed {
        fx.push(FxEvent::Killed { player_id: victim });
    }

    // Reward accounting: enemy damage only; no kill bonus for suicide.
    if let Some(attacker) = attacker {
        if attacker != victim {
            let score = scores.entry(attacker).or_default();
            score.damage_dealt += actual;
            score.currency += actual * CURRENCY_PER_DAMAGE;
            if killed {
                score.kills += 1;
                score.currency += KILL_BONUS;
            }
        }
    }

    (actual, killed)
}

/// Radial impulse on every combatant in the enlarged radius.
fn apply_knockback(world: &mut World, center: &Position, radius: f64) {
    let reach = radius * KNOCKBACK_RADIUS_FACTOR;
    for (_entity, (pos, vel, arch, health)) in
        world.query_mut::<(&Position, &mut Velocity, &ArchetypeKind, &Health)>()
    {
        if !health.alive() {
            continue;
        }
        let dist = center.range_to(pos);
        if dist >= reach {
            continue;
        }
        let falloff = 1.0 - dist / reach;
        let impulse = KNOCKBACK_IMPULSE * falloff * archetype_profile(*arch).knockback_factor;
        let (dir_x, dir_y) = if dist > 1e-6 {
            ((pos.x - center.x) / dist, (pos.y - center.y) / dist)
        } else {
            // Standing exactly on the blast: throw straight up.
            (0.0, -1.0)
        };
        vel.x += dir_x * impulse;
        vel.y += dir_y * impulse * KNOCKBACK_VERTICAL_FACTOR;
    }
}

/// Spawn the behavior-specific secondary effects for one resolution.
#[allow(clippy::too_many_arguments)]
fn spawn_secondaries(
    world: &mut World,
    terrain: &Heightfield,
    req: &ExplosionRequest,
    damage: f64,
    radius: f64,
    void_y: &mut f64,
    current_tick: u64,
) {
    match req.behavior {
        BehaviorTag::StagedBlast {
            stages,
            stage_delay_secs,
            radius_step,
        } => {
            for stage in 1..=stages {
                world.spawn((
                    Position::new(req.x, req.y),
                    DelayedEffect {
                        kind: EffectKind::Fuse {
                            owner: req.owner,
                            weapon: req.weapon,
                            damage: req.base_damage * STAGE_DAMAGE_FACTOR.powi(stage as i32),
                            radius: req.base_radius + radius_step * stage as f64,
                        },
                        remaining_secs: stage_delay_secs * stage as f64,
                    },
                ));
            }
        }
        BehaviorTag::ChainArc {
            jump_range,
            damage_fraction,
        } => {
            let center = Position::new(req.x, req.y);
            // Nearest living target beyond the primary blast.
            let jump_to = collect_living(world)
                .into_iter()
                .filter(|(_, _, pos)| {
                    let d = center.range_to(pos);
                    d >= radius && d <= jump_range
                })
                .min_by(|(_, _, a), (_, _, b)| {
                    center
                        .range_to(a)
                        .partial_cmp(&center.range_to(b))
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
            if let Some((_, _, target_pos)) = jump_to {
                world.spawn((
                    target_pos,
                    DelayedEffect {
                        kind: EffectKind::Fuse {
                            owner: req.owner,
                            weapon: req.weapon,
                            damage: damage * damage_fraction,
                            radius: req.base_radius,
                        },
                        remaining_secs: FUSE_CHAIN_DELAY_SECS,
                    },
                ));
            }
        }
        BehaviorTag::FieldSpawner {
            kind,
            duration_secs,
            dps,
            radius: field_radius,
            erosion_per_sec,
        } => {
            let anchor = Position::new(req.x, terrain.height_at(req.x));
            world.spawn((
                anchor,
                DelayedEffect {
                    kind: EffectKind::AreaField {
                        owner: req.owner,
                        field: kind,
                        radius: field_radius,
                        dps,
                        erosion_per_sec,
                    },
                    remaining_secs: duration_secs,
                },
            ));
        }
        BehaviorTag::Irradiator {
            turns,
            damage_per_turn,
        } => {
            let center = Position::new(req.x, req.y);
            let irradiated: Vec<Entity> = collect_living(world)
                .into_iter()
                .filter(|(_, _, pos)| center.range_to(pos) < radius)
                .map(|(entity, _, _)| entity)
                .collect();
            for entity in irradiated {
                let _ = world.insert_one(
                    entity,
                    Radiation {
                        damage_per_turn,
                        turns_remaining: turns,
                    },
                );
            }
        }
        BehaviorTag::VoidSurge { raise_amount } => {
            *void_y = (*void_y - raise_amount).max(VOID_MIN_Y);
        }
        BehaviorTag::Warp => {
            if let Some((entity, _, _)) = find_combatant(world, req.owner) {
                let landing =
                    Position::new(req.x, terrain.height_at(req.x) - COMBATANT_RADIUS);
                if let Ok(mut pos) = world.get::<&mut Position>(entity) {
                    *pos = landing;
                }
                if let Ok(mut vel) = world.get::<&mut Velocity>(entity) {
                    *vel = Velocity::default();
                }
            }
        }
        BehaviorTag::Cluster { count, inherit } => {
            if req.split_depth < SPLIT_DEPTH_LIMIT {
                spawn_cluster_fan(world, req, count, inherit, current_tick);
            }
        }
        BehaviorTag::Singularity {
            pull_radius,
            strength,
            duration_secs,
        } => {
            world.spawn((
                Position::new(req.x, req.y),
                Attractor {
                    radius: pull_radius,
                    strength,
                    remaining_secs: duration_secs,
                },
            ));
        }
        BehaviorTag::BeaconCall {
            strikes,
            interval_secs,
        } => {
            world.spawn((
                Position::new(req.x, terrain.height_at(req.x)),
                DelayedEffect {
                    kind: EffectKind::Beacon {
                        owner: req.owner,
                        weapon: req.weapon,
                        strikes_remaining: strikes,
                        interval_secs,
                    },
                    remaining_secs: interval_secs,
                },
            ));
        }
        _ => {}
    }
}

/// Fan child projectiles upward out of a cluster detonation.
fn spawn_cluster_fan(
    world: &mut World,
    req: &ExplosionRequest,
    count: u32,
    inherit: f64,
    current_tick: u64,
) {
    let spec = weapon_spec(req.weapon);
    let speed = spec.speed * inherit * 0.45;
    for i in 0..count {
        let t = if count > 1 {
            i as f64 / (count - 1) as f64
        } else {
            0.5
        };
        let angle = std::f64::consts::FRAC_PI_2 + (t * 2.0 - 1.0) * SPLIT_SPREAD_RAD;
        let mut child = make_projectile(req.owner, req.weapon, BehaviorTag::Standard, current_tick);
        child.split_depth = req.split_depth + 1;
        child.damage_mult = req.damage_mult;
        child.damage_scale = CHILD_DAMAGE_FACTOR;
        child.blast_scale = CHILD_RADIUS_FACTOR;
        world.spawn((
            Position::new(req.x, req.y - 6.0),
            Velocity::from_angle_speed(angle, speed),
            child,
        ));
    }
}

/// Snapshot of every living combatant: (entity, player id, position).
pub fn collect_living(world: &World) -> Vec<(Entity, u32, Position)> {
    let mut query = world.query::<(&Combatant, &Position, &Health)>();
    query
        .iter()
        .filter(|(_, (_, _, health))| health.alive())
        .map(|(entity, (combatant, pos, _))| (entity, combatant.player_id, *pos))
        .collect()
}

/// Find a living combatant by player id.
pub fn find_combatant(world: &World, player_id: u32) -> Option<(Entity, Position, ArchetypeKind)> {
    let mut query = world.query::<(&Combatant, &Position, &ArchetypeKind, &Health)>();
    query
        .iter()
        .find(|(_, (c, _, _, h))| c.player_id == player_id && h.alive())
        .map(|(entity, (_, pos, arch, _))| (entity, *pos, *arch))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use hecs::World;

    use barrage_core::components::{Buffs, Combatant, Health};
    use barrage_core::constants::*;
    use barrage_core::enums::{ArchetypeKind, ControlMode};
    use barrage_core::types::{Position, Velocity};

    use super::{apply_damage, radial_damage};

    fn spawn_target(world: &mut World, player_id: u32, x: f64, y: f64) -> hecs::Entity {
        world.spawn((
            Combatant {
                player_id,
                control: ControlMode::Human,
            },
            Position::new(x, y),
            Velocity::default(),
            Health {
                hp: MAX_HEALTH,
                max_hp: MAX_HEALTH,
            },
            Buffs::default(),
            ArchetypeKind::Trooper,
        ))
    }

    #[test]
    fn test_falloff_zero_at_radius() {
        let mut world = World::new();
        let target = spawn_target(&mut world, 1, 100.0, 0.0);
        let mut scores = HashMap::new();
        let mut fx = Vec::new();

        // Exactly on the rim: no damage.
        radial_damage(
            &mut world,
            &Position::new(0.0, 0.0),
            40.0,
            100.0,
            0.0,
            Some(0),
            true,
            &mut scores,
            &mut fx,
        );
        let hp = world.get::<&Health>(target).unwrap().hp;
        assert_eq!(hp, MAX_HEALTH, "damage at distance >= radius must be 0");
    }

    #[test]
    fn test_direct_hit_maximum_at_center() {
        let mut world = World::new();
        let target = spawn_target(&mut world, 1, 0.0, 0.0);
        let mut scores = HashMap::new();
        let mut fx = Vec::new();

        radial_damage(
            &mut world,
            &Position::new(0.0, 0.0),
            40.0,
            100.0,
            0.0,
            Some(0),
            true,
            &mut scores,
            &mut fx,
        );
        let hp = world.get::<&Health>(target).unwrap().hp;
        let expected = MAX_HEALTH - 40.0 * DIRECT_HIT_MULT;
        assert!(
            (hp - expected).abs() < 1e-9,
            "center hit should apply the direct-hit bonus, hp {hp}"
        );
    }

    #[test]
    fn test_shield_fully_expended() {
        let mut world = World::new();
        let target = spawn_target(&mut world, 1, 0.0, 0.0);
        world.get::<&mut Buffs>(target).unwrap().shield = Some(SHIELD_STRENGTH);
        let mut scores = HashMap::new();
        let mut fx = Vec::new();

        // A tiny hit: absorbed entirely, but the shield is still gone.
        apply_damage(&mut world, target, 5.0, Some(0), true, &mut scores, &mut fx);
        assert_eq!(world.get::<&Health>(target).unwrap().hp, MAX_HEALTH);
        assert!(
            world.get::<&Buffs>(target).unwrap().shield.is_none(),
            "shield must be consumed regardless of damage magnitude"
        );
    }

    #[test]
    fn test_rewards_exclude_self_damage() {
        let mut world = World::new();
        let me = spawn_target(&mut world, 0, 0.0, 0.0);
        let mut scores = HashMap::new();
        let mut fx = Vec::new();

        apply_damage(&mut world, me, 20.0, Some(0), true, &mut scores, &mut fx);
        assert!(
            scores.get(&0).map_or(0.0, |s| s.currency) == 0.0,
            "self-damage must not earn currency"
        );
    }

    #[test]
    fn test_kill_bonus_only_for_enemy_kills() {
        let mut world = World::new();
        let enemy = spawn_target(&mut world, 1, 0.0, 0.0);
        let mut scores = HashMap::new();
        let mut fx = Vec::new();

        let (_, killed) = apply_damage(
            &mut world,
            enemy,
            MAX_HEALTH * 2.0,
            Some(0),
            true,
            &mut scores,
            &mut fx,
        );
        assert!(killed);
        let score = scores.get(&0).unwrap();
        assert_eq!(score.kills, 1);
        assert!(
            (score.currency - (MAX_HEALTH * CURRENCY_PER_DAMAGE + KILL_BONUS)).abs() < 1e-9,
            "kill should pay damage plus bonus, got {}",
            score.currency
        );
    }
}
