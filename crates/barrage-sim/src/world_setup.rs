//! Entity spawn factories for setting up the match world.
//!
//! Creates combatant entities with appropriate component bundles and
//! builds fresh projectile records for fired weapons and fragments.

use hecs::World;

use barrage_core::components::*;
use barrage_core::constants::*;
use barrage_core::enums::{ArchetypeKind, BehaviorTag, ControlMode, FlightPhase};
use barrage_core::types::{Position, Velocity};
use barrage_core::weapons::{weapon_spec, WeaponId};
use barrage_terrain::Heightfield;

/// One roster slot in the match configuration.
#[derive(Debug, Clone, Copy)]
pub struct PlayerSetup {
    pub archetype: ArchetypeKind,
    pub control: ControlMode,
}

/// Evenly spaced spawn columns for `count` combatants, inside the
/// edge margins.
pub fn spawn_columns(count: usize) -> Vec<f64> {
    let inner = WORLD_WIDTH - 2.0 * EDGE_MARGIN;
    (0..count)
        .map(|i| EDGE_MARGIN + inner * (i as f64 + 1.0) / (count as f64 + 1.0))
        .collect()
}

/// Spawn every combatant standing on the terrain surface.
pub fn setup_match(world: &mut World, terrain: &Heightfield, players: &[PlayerSetup]) {
    let columns = spawn_columns(players.len());
    for (i, (setup, &x)) in players.iter().zip(&columns).enumerate() {
        spawn_combatant(world, terrain, i as u32, x, setup);
    }
}

/// Spawn a single combatant at the given column.
pub fn spawn_combatant(
    world: &mut World,
    terrain: &Heightfield,
    player_id: u32,
    x: f64,
    setup: &PlayerSetup,
) -> hecs::Entity {
    let y = terrain.height_at(x) - COMBATANT_RADIUS;
    world.spawn((
        Combatant {
            player_id,
            control: setup.control,
        },
        Position::new(x, y),
        Velocity::default(),
        Health {
            hp: MAX_HEALTH,
            max_hp: MAX_HEALTH,
        },
        Buffs::default(),
        setup.archetype,
        Loadout::default(),
    ))
}

/// Build a fresh projectile record for a fired weapon.
///
/// Callers override the capture fields (buffs, split depth, scales) as
/// needed before spawning.
pub fn make_projectile(
    owner: u32,
    weapon: WeaponId,
    behavior: BehaviorTag,
    spawn_tick: u64,
) -> Projectile {
    let spec = weapon_spec(weapon);
    Projectile {
        owner,
        weapon,
        behavior,
        radius: spec.projectile_radius,
        max_bounces: spec.max_bounces,
        bounces: 0,
        bounce_damage_bonus: 0.0,
        split_depth: 0,
        damage_mult: 1.0,
        blast_bonus: 0.0,
        damage_scale: 1.0,
        blast_scale: 1.0,
        phase: FlightPhase::Flying,
        phase_start_tick: spawn_tick,
        spawn_tick,
        last_pulse_tick: spawn_tick,
        slow_since_tick: None,
        prev_vy: 0.0,
    }
}
