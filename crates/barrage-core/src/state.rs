//! Match state snapshot — the complete visible state sent to the frontend
//! each tick.

use serde::{Deserialize, Serialize};

use crate::components::EffectKind;
use crate::enums::*;
use crate::events::FxEvent;
use crate::types::{Position, SimTime};
use crate::weapons::WeaponId;

/// Complete match state broadcast to the frontend after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub turn: TurnView,
    /// Lateral wind acceleration for the current turn.
    pub wind: f64,
    /// Current void line; anything below is gone.
    pub void_y: f64,
    pub terrain: TerrainView,
    pub combatants: Vec<CombatantView>,
    pub projectiles: Vec<ProjectileView>,
    pub effects: Vec<EffectView>,
    pub attractors: Vec<AttractorView>,
    pub pickups: Vec<PickupView>,
    pub scores: Vec<ScoreView>,
    pub events: Vec<FxEvent>,
}

/// Turn status for display.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TurnView {
    pub number: u32,
    pub active_player: u32,
    pub stage: TurnStage,
}

/// Terrain surface for display. Heights are world-Y per column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerrainView {
    pub width: u32,
    pub heights: Vec<f32>,
}

/// A visible combatant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantView {
    pub player_id: u32,
    pub position: Position,
    pub hp: f64,
    pub max_hp: f64,
    pub archetype: ArchetypeKind,
    pub control: ControlMode,
    pub selected_weapon: WeaponId,
    pub shield: Option<f64>,
    pub radiation_turns: u32,
}

/// A visible projectile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: Position,
    pub owner: u32,
    pub weapon: WeaponId,
    pub phase: FlightPhase,
    pub radius: f64,
}

/// A visible delayed effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectView {
    pub position: Position,
    pub kind: EffectKind,
    pub remaining_secs: f64,
}

/// A visible attractor field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttractorView {
    pub position: Position,
    pub radius: f64,
    pub remaining_secs: f64,
}

/// A landed crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupView {
    pub position: Position,
    pub loot: LootKind,
}

/// Per-player score and economy for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub player_id: u32,
    pub damage_dealt: f64,
    pub kills: u32,
    pub shots_fired: u32,
    pub currency: f64,
}
