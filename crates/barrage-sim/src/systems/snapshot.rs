//! Snapshot system: queries the ECS world and builds a complete
//! MatchSnapshot.
//!
//! This system is read-only — it never modifies the world.

use std::collections::HashMap;

use hecs::World;

use barrage_core::components::*;
use barrage_core::enums::{ArchetypeKind, GamePhase};
use barrage_core::events::FxEvent;
use barrage_core::state::*;
use barrage_core::types::{Position, SimTime};
use barrage_terrain::Heightfield;

use crate::turn::{PlayerScore, TurnState};

/// Build a complete MatchSnapshot from the current world state.
#[allow(clippy::too_many_arguments)]
pub fn build(
    world: &World,
    terrain: &Heightfield,
    time: &SimTime,
    phase: GamePhase,
    turn: &TurnState,
    wind: f64,
    void_y: f64,
    scores: &HashMap<u32, PlayerScore>,
    events: Vec<FxEvent>,
) -> MatchSnapshot {
    MatchSnapshot {
        time: *time,
        phase,
        turn: TurnView {
            number: turn.number,
            active_player: turn.active_player,
            stage: turn.stage,
        },
        wind,
        void_y,
        terrain: TerrainView {
            width: terrain.width() as u32,
            heights: terrain.heights().iter().map(|&h| h as f32).collect(),
        },
        combatants: build_combatants(world),
        projectiles: build_projectiles(world),
        effects: build_effects(world),
        attractors: build_attractors(world),
        pickups: build_pickups(world),
        scores: build_scores(scores),
        events,
    }
}

fn build_combatants(world: &World) -> Vec<CombatantView> {
    let mut views: Vec<CombatantView> = world
        .query::<(
            &Combatant,
            &Position,
            &Health,
            &Buffs,
            &ArchetypeKind,
            &Loadout,
        )>()
        .iter()
        .map(|(entity, (combatant, pos, health, buffs, arch, loadout))| {
            let radiation_turns = world
                .get::<&Radiation>(entity)
                .map(|r| r.turns_remaining)
                .unwrap_or(0);
            CombatantView {
                player_id: combatant.player_id,
                position: *pos,
                hp: health.hp,
                max_hp: health.max_hp,
                archetype: *arch,
                control: combatant.control,
                selected_weapon: loadout.selected,
                shield: buffs.shield,
                radiation_turns,
            }
        })
        .collect();
    views.sort_by_key(|v| v.player_id);
    views
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut views: Vec<ProjectileView> = world
        .query::<(&Projectile, &Position)>()
        .iter()
        .map(|(_, (proj, pos))| ProjectileView {
            position: *pos,
            owner: proj.owner,
            weapon: proj.weapon,
            phase: proj.phase,
            radius: proj.radius,
        })
        .collect();
    views.sort_by(|a, b| {
        a.position
            .x
            .partial_cmp(&b.position.x)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    views
}

fn build_effects(world: &World) -> Vec<EffectView> {
    let mut views: Vec<EffectView> = world
        .query::<(&Position, &DelayedEffect)>()
        .iter()
        .map(|(_, (pos, effect))| EffectView {
            position: *pos,
            kind: effect.kind,
            remaining_secs: effect.remaining_secs,
        })
        .collect();
    views.sort_by(|a, b| {
        a.position
            .x
            .partial_cmp(&b.position.x)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    views
}

fn build_attractors(world: &World) -> Vec<AttractorView> {
    let mut views: Vec<AttractorView> = world
        .query::<(&Position, &Attractor)>()
        .iter()
        .map(|(_, (pos, attractor))| AttractorView {
            position: *pos,
            radius: attractor.radius,
            remaining_secs: attractor.remaining_secs,
        })
        .collect();
    views.sort_by(|a, b| {
        a.position
            .x
            .partial_cmp(&b.position.x)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    views
}

fn build_pickups(world: &World) -> Vec<PickupView> {
    let mut views: Vec<PickupView> = world
        .query::<(&Position, &Pickup)>()
        .iter()
        .map(|(_, (pos, pickup))| PickupView {
            position: *pos,
            loot: pickup.loot,
        })
        .collect();
    views.sort_by(|a, b| {
        a.position
            .x
            .partial_cmp(&b.position.x)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    views
}

fn build_scores(scores: &HashMap<u32, PlayerScore>) -> Vec<ScoreView> {
    let mut views: Vec<ScoreView> = scores
        .iter()
        .map(|(&player_id, score)| ScoreView {
            player_id,
            damage_dealt: score.damage_dealt,
            kills: score.kills,
            shots_fired: score.shots_fired,
            currency: score.currency,
        })
        .collect();
    views.sort_by_key(|v| v.player_id);
    views
}
