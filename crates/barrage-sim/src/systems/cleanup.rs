//! Cleanup system: drains the despawn buffer and removes dead combatants.
//!
//! Uses a pre-allocated buffer to avoid per-tick allocation.

use hecs::{Entity, World};

use barrage_core::components::{Combatant, Health};

/// Despawn everything marked this tick, plus combatants whose health
/// reached zero. Death is irreversible within a match.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    for (entity, (_combatant, health)) in world.query_mut::<(&Combatant, &Health)>() {
        if !health.alive() {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
