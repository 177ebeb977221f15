//! Combatant knockback physics.
//!
//! Combatants normally rest on the terrain surface. Explosions toss
//! them; gravity brings them back down, walls clamp them in, and the
//! void line kills them. Terrain destroyed beneath a combatant leaves
//! it airborne until it lands again.

use hecs::World;

use barrage_core::components::{Attractor, Combatant, Health};
use barrage_core::constants::*;
use barrage_core::events::FxEvent;
use barrage_core::types::{Position, Velocity};
use barrage_terrain::Heightfield;

/// Run combatant physics for one tick.
pub fn run(
    world: &mut World,
    terrain: &Heightfield,
    void_y: f64,
    fx: &mut Vec<FxEvent>,
) {
    let attractors: Vec<(Position, Attractor)> = {
        let mut query = world.query::<(&Position, &Attractor)>();
        query.iter().map(|(_, (pos, a))| (*pos, *a)).collect()
    };

    for (_entity, (combatant, pos, vel, health)) in
        world.query_mut::<(&Combatant, &mut Position, &mut Velocity, &mut Health)>()
    {
        if !health.alive() {
            continue;
        }

        // Attractor fields drag combatants as well as projectiles.
        for (apos, attractor) in &attractors {
            let dx = apos.x - pos.x;
            let dy = apos.y - pos.y;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist > 1e-6 && dist < attractor.radius {
                let pull = attractor.strength * (1.0 - dist / attractor.radius);
                vel.x += dx / dist * pull * DT;
                vel.y += dy / dist * pull * DT;
            }
        }

        let supported = terrain.is_below(pos.x, pos.y + COMBATANT_RADIUS + 1.0);
        if supported && vel.speed() < SETTLE_SPEED_EPS {
            vel.x = 0.0;
            vel.y = 0.0;
        } else {
            vel.y += GRAVITY * DT;
            pos.x += vel.x * DT;
            pos.y += vel.y * DT;

            // Walls stop combatants dead rather than bouncing them.
            if pos.x < COMBATANT_RADIUS {
                pos.x = COMBATANT_RADIUS;
                vel.x = 0.0;
            }
            let right = WORLD_WIDTH - COMBATANT_RADIUS;
            if pos.x > right {
                pos.x = right;
                vel.x = 0.0;
            }

            if terrain.is_below(pos.x, pos.y + COMBATANT_RADIUS) {
                pos.y = terrain.height_at(pos.x) - COMBATANT_RADIUS;
                vel.x = 0.0;
                vel.y = 0.0;
            }
        }

        // Falling past the void line is death, not landing.
        if pos.y + COMBATANT_RADIUS > void_y {
            health.hp = 0.0;
            fx.push(FxEvent::Killed {
                player_id: combatant.player_id,
            });
        }
    }
}

/// Whether every living combatant is grounded and at rest.
/// The gate refuses to advance the turn until this holds.
pub fn all_settled(world: &World, terrain: &Heightfield) -> bool {
    let mut query = world.query::<(&Combatant, &Position, &Velocity, &Health)>();
    query.iter().all(|(_, (_, pos, vel, health))| {
        !health.alive()
            || (vel.speed() < SETTLE_SPEED_EPS
                && terrain.is_below(pos.x, pos.y + COMBATANT_RADIUS + 1.0))
    })
}
