//! Projectile flight system.
//!
//! Advances every `Flying`/`Locked` projectile one tick. The inner order
//! is load-bearing for determinism: gravity, wind, attractor pull,
//! homing steer, position integration (semi-implicit Euler), then the
//! free world-wall reflection.

use std::collections::HashMap;

use glam::DVec2;
use hecs::World;

use barrage_ai::flight::{apply_ballistic_forces, reflect_world_walls, FlightEnv};
use barrage_core::archetypes::archetype_profile;
use barrage_core::components::{Attractor, Combatant, Health, Projectile};
use barrage_core::constants::DT;
use barrage_core::enums::{ArchetypeKind, BehaviorTag, FlightPhase};
use barrage_core::events::FxEvent;
use barrage_core::types::{Position, Velocity};

/// Run projectile flight for one tick.
pub fn run(world: &mut World, env: &FlightEnv, fx: &mut Vec<FxEvent>) {
    // Snapshots first to avoid borrow conflicts with the mutable pass.
    let attractors: Vec<(Position, Attractor)> = {
        let mut query = world.query::<(&Position, &Attractor)>();
        query.iter().map(|(_, (pos, a))| (*pos, *a)).collect()
    };
    let targets: Vec<(u32, Position)> = {
        let mut query = world.query::<(&Combatant, &Position, &Health)>();
        query
            .iter()
            .filter(|(_, (_, _, h))| h.alive())
            .map(|(_, (c, pos, _))| (c.player_id, *pos))
            .collect()
    };
    let passive_homing: HashMap<u32, f64> = {
        let mut query = world.query::<(&Combatant, &ArchetypeKind)>();
        query
            .iter()
            .map(|(_, (c, arch))| (c.player_id, archetype_profile(*arch).passive_homing))
            .collect()
    };

    for (_entity, (pos, vel, proj)) in
        world.query_mut::<(&mut Position, &mut Velocity, &mut Projectile)>()
    {
        if !matches!(proj.phase, FlightPhase::Flying | FlightPhase::Locked) {
            continue;
        }
        let tick_start_vy = vel.y;

        // 1-2. Gravity, then wind.
        apply_ballistic_forces(env, vel, DT);

        // 3. Attractor pull: inverse-linear falloff, summed.
        for (apos, attractor) in &attractors {
            let to_field = DVec2::new(apos.x - pos.x, apos.y - pos.y);
            let dist = to_field.length();
            if dist > 1e-6 && dist < attractor.radius {
                let pull = attractor.strength * (1.0 - dist / attractor.radius);
                let dir = to_field / dist;
                vel.x += dir.x * pull * DT;
                vel.y += dir.y * pull * DT;
            }
        }

        // 4. Homing steer.
        let steer = steer_strength(proj, &passive_homing);
        if steer > 0.0 {
            steer_toward_nearest(pos, vel, proj.owner, &targets, steer);
        }

        // 5. Integrate position.
        pos.x += vel.x * DT;
        pos.y += vel.y * DT;

        // 6. World-wall reflection — free, never consumes the budget.
        if reflect_world_walls(env, pos, vel, proj.radius) {
            fx.push(FxEvent::Bounce { x: pos.x, y: pos.y });
        }

        proj.prev_vy = tick_start_vy;
    }
}

/// Homing strength for a projectile: its behavior's steer (seekers only
/// once locked) or the owner archetype's passive pull, whichever wins.
fn steer_strength(proj: &Projectile, passive: &HashMap<u32, f64>) -> f64 {
    let behavior_steer = match proj.behavior {
        BehaviorTag::Homing { steer } => steer,
        BehaviorTag::Seeker { steer, .. } if proj.phase == FlightPhase::Locked => steer,
        _ => 0.0,
    };
    behavior_steer.max(passive.get(&proj.owner).copied().unwrap_or(0.0))
}

/// Blend a fraction of velocity toward the nearest living enemy.
fn steer_toward_nearest(
    pos: &Position,
    vel: &mut Velocity,
    owner: u32,
    targets: &[(u32, Position)],
    steer: f64,
) {
    let nearest = targets
        .iter()
        .filter(|(player, _)| *player != owner)
        .min_by(|(_, a), (_, b)| {
            pos.range_to(a)
                .partial_cmp(&pos.range_to(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    let Some((_, target)) = nearest else {
        return;
    };

    let v = DVec2::new(vel.x, vel.y);
    let to_target = DVec2::new(target.x - pos.x, target.y - pos.y);
    let speed = v.length();
    if speed < 1e-6 || to_target.length_squared() < 1e-9 {
        return;
    }
    let desired = to_target.normalize() * speed;
    let steered = v + (desired - v) * steer;
    vel.x = steered.x;
    vel.y = steered.y;
}
