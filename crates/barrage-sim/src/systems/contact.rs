//! Behavior-specific terrain and contact resolution.
//!
//! Dispatches each projectile on its behavior tag: default terminal
//! explosions, pinball/escalator rebounds, drilling, rolling, burrowing,
//! and fragment splits. Every termination path converges on exactly one
//! explosion request; splits yield children instead and never invoke the
//! resolver for the parent.

use std::collections::HashMap;

use hecs::{Entity, World};

use barrage_core::components::Projectile;
use barrage_core::constants::*;
use barrage_core::enums::{BehaviorTag, FlightPhase, SplitTrigger};
use barrage_core::events::FxEvent;
use barrage_core::types::{Position, Velocity};
use barrage_terrain::Heightfield;

use crate::systems::explosion::{collect_living, radial_damage, terminal_request, ExplosionRequest};
use crate::turn::PlayerScore;
use crate::world_setup::make_projectile;

/// A roller's periodic area-damage pulse, applied after the main pass.
struct Pulse {
    center: Position,
    damage: f64,
    radius: f64,
    owner: u32,
}

/// What happened to a projectile this tick.
enum Outcome {
    Keep,
    /// Terminal: queue one resolution and remove the projectile.
    Explode { radius_bonus: f64 },
    /// Fragments were shed; the parent is removed without resolving.
    Split,
}

/// Run contact resolution for one tick.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    terrain: &mut Heightfield,
    queue: &mut Vec<ExplosionRequest>,
    scores: &mut HashMap<u32, PlayerScore>,
    fx: &mut Vec<FxEvent>,
    despawn: &mut Vec<Entity>,
    void_y: f64,
    current_tick: u64,
) {
    let projectiles: Vec<(Entity, Projectile, Position, Velocity)> = {
        let mut query = world.query::<(&Projectile, &Position, &Velocity)>();
        query
            .iter()
            .map(|(entity, (proj, pos, vel))| (entity, *proj, *pos, *vel))
            .collect()
    };
    let living = collect_living(world);

    let mut updates: Vec<(Entity, Projectile, Position, Velocity)> = Vec::new();
    let mut spawns: Vec<(Position, Velocity, Projectile)> = Vec::new();
    let mut pulses: Vec<Pulse> = Vec::new();

    for (entity, mut proj, mut pos, mut vel) in projectiles {
        let outcome = match proj.phase {
            FlightPhase::Flying | FlightPhase::Locked => airborne_tick(
                terrain,
                &living,
                queue,
                &mut proj,
                &mut pos,
                &mut vel,
                &mut spawns,
                fx,
                void_y,
                current_tick,
            ),
            FlightPhase::Rolling => roller_tick(
                terrain,
                &living,
                &mut proj,
                &mut pos,
                &mut vel,
                &mut pulses,
                void_y,
                current_tick,
            ),
            FlightPhase::Drilling => {
                drill_tick(terrain, &living, &mut proj, &mut pos, &mut vel, void_y)
            }
            FlightPhase::Burrowing => burrow_tick(
                terrain,
                &living,
                &mut proj,
                &mut pos,
                &mut vel,
                void_y,
                current_tick,
            ),
        };

        match outcome {
            Outcome::Keep => updates.push((entity, proj, pos, vel)),
            Outcome::Explode { radius_bonus } => {
                queue.push(terminal_request(&proj, &pos, radius_bonus));
                despawn.push(entity);
            }
            Outcome::Split => despawn.push(entity),
        }
    }

    for (entity, proj, pos, vel) in updates {
        if let Ok(mut p) = world.get::<&mut Projectile>(entity) {
            *p = proj;
        }
        if let Ok(mut p) = world.get::<&mut Position>(entity) {
            *p = pos;
        }
        if let Ok(mut v) = world.get::<&mut Velocity>(entity) {
            *v = vel;
        }
    }
    for (pos, vel, proj) in spawns {
        world.spawn((pos, vel, proj));
    }
    for pulse in pulses {
        fx.push(FxEvent::Explosion {
            x: pulse.center.x,
            y: pulse.center.y,
            radius: pulse.radius,
        });
        radial_damage(
            world,
            &pulse.center,
            pulse.damage,
            pulse.radius,
            0.0,
            Some(pulse.owner),
            true,
            scores,
            fx,
        );
    }
}

/// Contact handling for airborne (`Flying`/`Locked`) projectiles.
#[allow(clippy::too_many_arguments)]
fn airborne_tick(
    terrain: &Heightfield,
    living: &[(Entity, u32, Position)],
    queue: &mut Vec<ExplosionRequest>,
    proj: &mut Projectile,
    pos: &mut Position,
    vel: &mut Velocity,
    spawns: &mut Vec<(Position, Velocity, Projectile)>,
    fx: &mut Vec<FxEvent>,
    void_y: f64,
    current_tick: u64,
) -> Outcome {
    if out_of_world(pos, proj.radius, void_y) {
        return Outcome::Explode { radius_bonus: 0.0 };
    }

    // Apex: vertical velocity sign change (upward is negative y).
    let at_apex = proj.prev_vy < 0.0 && vel.y >= 0.0;

    match proj.behavior {
        BehaviorTag::Splitter {
            trigger: SplitTrigger::Apex,
            count,
            inherit,
            ..
        } if at_apex => {
            return split(proj, pos, vel, count, inherit, spawns, current_tick);
        }
        BehaviorTag::Splitter {
            trigger: SplitTrigger::Proximity,
            count,
            inherit,
            proximity_range,
        } => {
            let near = nearest_enemy(pos, proj.owner, living)
                .map(|(_, d)| d <= proximity_range)
                .unwrap_or(false);
            if near {
                return split(proj, pos, vel, count, inherit, spawns, current_tick);
            }
        }
        BehaviorTag::Seeker {
            min_flight_secs, ..
        } if proj.phase == FlightPhase::Flying => {
            let flown = (current_tick.saturating_sub(proj.spawn_tick)) as f64 * DT;
            if at_apex && flown >= min_flight_secs {
                proj.phase = FlightPhase::Locked;
                proj.phase_start_tick = current_tick;
            }
        }
        _ => {}
    }

    if !terrain.is_below(pos.x, pos.y + proj.radius) {
        return Outcome::Keep;
    }

    // Terrain contact: dispatch by behavior tag.
    match proj.behavior {
        BehaviorTag::Pinball { final_radius_bonus } => {
            if proj.bounces >= proj.max_bounces {
                return Outcome::Explode {
                    radius_bonus: final_radius_bonus,
                };
            }
            reflect_off_terrain(terrain, pos, vel, proj.radius);
            proj.bounces += 1;
            // Pinballs explode at every counted impact and keep flying.
            queue.push(terminal_request(proj, pos, 0.0));
            fx.push(FxEvent::Bounce { x: pos.x, y: pos.y });
            Outcome::Keep
        }
        BehaviorTag::Escalator { bonus_per_bounce } => {
            if proj.bounces >= proj.max_bounces {
                return Outcome::Explode { radius_bonus: 0.0 };
            }
            reflect_off_terrain(terrain, pos, vel, proj.radius);
            proj.bounces += 1;
            proj.bounce_damage_bonus =
                (proj.bounce_damage_bonus + bonus_per_bounce).min(ESCALATOR_BONUS_CAP);
            fx.push(FxEvent::Bounce { x: pos.x, y: pos.y });
            Outcome::Keep
        }
        BehaviorTag::Drill { .. } => {
            proj.phase = FlightPhase::Drilling;
            proj.phase_start_tick = current_tick;
            // Tuck the head under the surface so the exit check sees
            // solid ground, not the contact graze.
            pos.y = terrain.height_at(pos.x) + proj.radius + 1.0;
            Outcome::Keep
        }
        BehaviorTag::Roller { .. } => {
            proj.phase = FlightPhase::Rolling;
            proj.phase_start_tick = current_tick;
            proj.last_pulse_tick = current_tick;
            proj.slow_since_tick = None;
            pos.y = terrain.height_at(pos.x) - proj.radius;
            vel.x *= 0.8;
            vel.y = 0.0;
            Outcome::Keep
        }
        BehaviorTag::Burrower { .. } => {
            proj.phase = FlightPhase::Burrowing;
            proj.phase_start_tick = current_tick;
            pos.y = terrain.height_at(pos.x) + BURROW_DEPTH;
            let dir = nearest_enemy(pos, proj.owner, living)
                .map(|(target, _)| (target.x - pos.x).signum())
                .unwrap_or(0.0);
            vel.x = dir * BURROW_SPEED;
            vel.y = 0.0;
            Outcome::Keep
        }
        BehaviorTag::Splitter {
            trigger: SplitTrigger::Bounce,
            count,
            inherit,
            ..
        } => split(proj, pos, vel, count, inherit, spawns, current_tick),
        _ => Outcome::Explode { radius_bonus: 0.0 },
    }
}

/// Ground-following roller: friction, slope, pulses, stop detection.
#[allow(clippy::too_many_arguments)]
fn roller_tick(
    terrain: &Heightfield,
    living: &[(Entity, u32, Position)],
    proj: &mut Projectile,
    pos: &mut Position,
    vel: &mut Velocity,
    pulses: &mut Vec<Pulse>,
    void_y: f64,
    current_tick: u64,
) -> Outcome {
    let BehaviorTag::Roller {
        pulse_interval_secs,
        pulse_damage,
        pulse_radius,
    } = proj.behavior
    else {
        return Outcome::Explode { radius_bonus: 0.0 };
    };

    // Slope pulls downhill (toward larger stored heights).
    let slope = terrain.slope_at(pos.x, SLOPE_SAMPLE_DX);
    vel.x += slope * ROLLER_SLOPE_ACCEL * DT;
    vel.x *= ROLLER_FRICTION;
    vel.y = 0.0;
    pos.x += vel.x * DT;

    if pos.x < proj.radius {
        pos.x = proj.radius;
        vel.x = -vel.x * WALL_RESTITUTION;
    }
    let right = WORLD_WIDTH - proj.radius;
    if pos.x > right {
        pos.x = right;
        vel.x = -vel.x * WALL_RESTITUTION;
    }

    pos.y = terrain.height_at(pos.x) - proj.radius;
    if pos.y + proj.radius > void_y {
        return Outcome::Explode { radius_bonus: 0.0 };
    }

    // Rolling into any combatant detonates.
    if touches_combatant(pos, proj.radius, living) {
        return Outcome::Explode { radius_bonus: 0.0 };
    }

    // Periodic area-damage pulse.
    let since_pulse = (current_tick.saturating_sub(proj.last_pulse_tick)) as f64 * DT;
    if since_pulse >= pulse_interval_secs {
        proj.last_pulse_tick = current_tick;
        pulses.push(Pulse {
            center: *pos,
            damage: pulse_damage * proj.damage_mult,
            radius: pulse_radius,
            owner: proj.owner,
        });
    }

    // Detonate after lingering below the stop speed for the grace period.
    if vel.x.abs() < ROLLER_STOP_SPEED {
        let slow_since = *proj.slow_since_tick.get_or_insert(current_tick);
        if (current_tick.saturating_sub(slow_since)) as f64 * DT >= ROLLER_STOP_GRACE_SECS {
            return Outcome::Explode { radius_bonus: 0.0 };
        }
    } else {
        proj.slow_since_tick = None;
    }

    Outcome::Keep
}

/// Tunneling drill: erode a channel while velocity decays.
fn drill_tick(
    terrain: &mut Heightfield,
    living: &[(Entity, u32, Position)],
    proj: &mut Projectile,
    pos: &mut Position,
    vel: &mut Velocity,
    void_y: f64,
) -> Outcome {
    let BehaviorTag::Drill {
        channel_width,
        speed_decay,
    } = proj.behavior
    else {
        return Outcome::Explode { radius_bonus: 0.0 };
    };

    // Exit check first, so the channel carved this tick (behind the
    // head) cannot count as "open air".
    if !terrain.is_below(pos.x, pos.y) {
        return Outcome::Explode { radius_bonus: 0.0 };
    }
    if touches_combatant(pos, proj.radius, living) {
        return Outcome::Explode { radius_bonus: 0.0 };
    }
    if pos.y - proj.radius > void_y {
        return Outcome::Explode { radius_bonus: 0.0 };
    }

    terrain.destroy(pos.x, pos.y, channel_width / 2.0);

    vel.x *= speed_decay;
    vel.y *= speed_decay;
    pos.x += vel.x * DT;
    pos.y += vel.y * DT;

    if pos.x < proj.radius {
        pos.x = proj.radius;
        vel.x = -vel.x * WALL_RESTITUTION;
    }
    let right = WORLD_WIDTH - proj.radius;
    if pos.x > right {
        pos.x = right;
        vel.x = -vel.x * WALL_RESTITUTION;
    }

    Outcome::Keep
}

/// Sub-surface burrower tracking the nearest living enemy's column.
#[allow(clippy::too_many_arguments)]
fn burrow_tick(
    terrain: &Heightfield,
    living: &[(Entity, u32, Position)],
    proj: &mut Projectile,
    pos: &mut Position,
    vel: &mut Velocity,
    void_y: f64,
    current_tick: u64,
) -> Outcome {
    let BehaviorTag::Burrower {
        trigger_range,
        timeout_secs,
    } = proj.behavior
    else {
        return Outcome::Explode { radius_bonus: 0.0 };
    };

    let target = nearest_enemy(pos, proj.owner, living);

    if let Some((target_pos, _)) = target {
        let dx = target_pos.x - pos.x;
        // Erupt beneath the victim.
        if dx.abs() <= trigger_range {
            pos.y = terrain.height_at(pos.x) - proj.radius;
            return Outcome::Explode { radius_bonus: 0.0 };
        }
        vel.x = dx.signum() * BURROW_SPEED;
    } else {
        vel.x = 0.0;
    }
    vel.y = 0.0;

    pos.x = (pos.x + vel.x * DT).clamp(proj.radius, WORLD_WIDTH - proj.radius);
    pos.y = terrain.height_at(pos.x) + BURROW_DEPTH;

    if pos.y - proj.radius > void_y {
        return Outcome::Explode { radius_bonus: 0.0 };
    }
    if (current_tick.saturating_sub(proj.phase_start_tick)) as f64 * DT >= timeout_secs {
        pos.y = terrain.height_at(pos.x) - proj.radius;
        return Outcome::Explode { radius_bonus: 0.0 };
    }

    Outcome::Keep
}

/// Shed fragments and remove the parent. Falls back to a terminal
/// explosion once the split depth limit is reached.
fn split(
    proj: &Projectile,
    pos: &Position,
    vel: &Velocity,
    count: u32,
    inherit: f64,
    spawns: &mut Vec<(Position, Velocity, Projectile)>,
    current_tick: u64,
) -> Outcome {
    if proj.split_depth >= SPLIT_DEPTH_LIMIT {
        return Outcome::Explode { radius_bonus: 0.0 };
    }

    let speed = (vel.speed() * inherit).max(60.0);
    // Fan around the parent's heading, flipped upward off the ground.
    let base_angle = vel.y.abs().atan2(vel.x);

    for i in 0..count {
        let t = if count > 1 {
            i as f64 / (count - 1) as f64
        } else {
            0.5
        };
        let angle = base_angle + (t * 2.0 - 1.0) * SPLIT_SPREAD_RAD;
        let mut child = make_projectile(proj.owner, proj.weapon, BehaviorTag::Standard, current_tick);
        child.split_depth = proj.split_depth + 1;
        child.damage_mult = proj.damage_mult;
        child.damage_scale = proj.damage_scale * CHILD_DAMAGE_FACTOR;
        child.blast_scale = proj.blast_scale * CHILD_RADIUS_FACTOR;
        spawns.push((
            Position::new(pos.x, pos.y - 2.0),
            Velocity::from_angle_speed(angle, speed),
            child,
        ));
    }
    Outcome::Split
}

/// Nearest living enemy and its distance.
fn nearest_enemy(
    pos: &Position,
    owner: u32,
    living: &[(Entity, u32, Position)],
) -> Option<(Position, f64)> {
    living
        .iter()
        .filter(|(_, player, _)| *player != owner)
        .map(|(_, _, target)| (*target, pos.range_to(target)))
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
}

fn touches_combatant(pos: &Position, radius: f64, living: &[(Entity, u32, Position)]) -> bool {
    living
        .iter()
        .any(|(_, _, target)| pos.range_to(target) <= radius + COMBATANT_RADIUS)
}

/// Crossing the void line or leaving the vertical bounds is always
/// terminal regardless of behavior.
fn out_of_world(pos: &Position, radius: f64, void_y: f64) -> bool {
    pos.y - radius > void_y || pos.y > WORLD_HEIGHT || pos.y < -WORLD_HEIGHT
}

/// Reflect velocity about the local surface normal with restitution,
/// enforcing a minimum rebound speed, and lift the projectile clear.
fn reflect_off_terrain(terrain: &Heightfield, pos: &mut Position, vel: &mut Velocity, radius: f64) {
    let slope = terrain.slope_at(pos.x, SLOPE_SAMPLE_DX);
    // Surface tangent is (1, slope); the upward normal is (slope, -1).
    let len = (1.0 + slope * slope).sqrt();
    let nx = slope / len;
    let ny = -1.0 / len;

    let dot = vel.x * nx + vel.y * ny;
    vel.x = (vel.x - 2.0 * dot * nx) * TERRAIN_RESTITUTION;
    vel.y = (vel.y - 2.0 * dot * ny) * TERRAIN_RESTITUTION;

    let speed = vel.speed();
    if speed < MIN_REBOUND_SPEED {
        if speed > 1e-9 {
            let scale = MIN_REBOUND_SPEED / speed;
            vel.x *= scale;
            vel.y *= scale;
        } else {
            vel.y = -MIN_REBOUND_SPEED;
        }
    }

    pos.y = terrain.height_at(pos.x) - radius - 0.5;
}
