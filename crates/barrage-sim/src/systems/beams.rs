//! Hitscan beam firing.
//!
//! Beams bypass per-tick integration entirely: the shared trace is
//! marched instantly, terrain along the path is ablated, and every
//! combatant within the hit threshold takes simultaneous full damage.

use std::collections::HashMap;

use hecs::World;

use barrage_ai::beam::{distance_to_trace, trace_beam, BeamTrace};
use barrage_core::constants::*;
use barrage_core::events::FxEvent;
use barrage_core::types::Position;
use barrage_core::weapons::WeaponSpec;
use barrage_terrain::Heightfield;

use crate::systems::explosion::{apply_damage, collect_living};
use crate::turn::PlayerScore;

/// Fire a beam from `origin` and resolve it immediately.
#[allow(clippy::too_many_arguments)]
pub fn fire(
    world: &mut World,
    terrain: &mut Heightfield,
    owner: u32,
    origin: &Position,
    angle_rad: f64,
    spec: &WeaponSpec,
    hit_width: f64,
    void_y: f64,
    scores: &mut HashMap<u32, PlayerScore>,
    fx: &mut Vec<FxEvent>,
) {
    let muzzle = Position::new(
        origin.x + angle_rad.cos() * MUZZLE_OFFSET,
        origin.y - angle_rad.sin() * MUZZLE_OFFSET,
    );
    let trace = trace_beam(
        terrain,
        WORLD_WIDTH,
        void_y,
        &muzzle,
        angle_rad,
        spec.max_bounces,
    );
    fx.push(FxEvent::BeamPath {
        vertices: trace.vertices.clone(),
    });

    ablate_along(terrain, &trace);

    // Simultaneous flat damage to everyone the beam touches. The
    // shooter is exempt — the beam starts at their own muzzle.
    let hit_threshold = hit_width + COMBATANT_RADIUS;
    let victims: Vec<hecs::Entity> = collect_living(world)
        .into_iter()
        .filter(|(_, player, _)| *player != owner)
        .filter(|(_, _, pos)| distance_to_trace(&trace, pos) <= hit_threshold)
        .map(|(entity, _, _)| entity)
        .collect();
    for entity in victims {
        apply_damage(world, entity, spec.damage, Some(owner), true, scores, fx);
    }
}

/// Cut a shallow fissure along every beam segment. The monotonic carve
/// is a no-op wherever the beam runs through open air, so only grazed
/// and struck terrain is ablated.
fn ablate_along(terrain: &mut Heightfield, trace: &BeamTrace) {
    for pair in trace.vertices.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        terrain.carve_fissure(
            a.x,
            a.y + BEAM_ABLATE_RADIUS,
            b.x,
            b.y + BEAM_ABLATE_RADIUS,
        );
    }
}
