//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::weapons::WeaponId;

/// A combatant in the duel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Combatant {
    /// Stable player identifier; also the turn-order key.
    pub player_id: u32,
    pub control: ControlMode,
}

/// Hit points. Death (hp == 0) is irreversible within a match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub hp: f64,
    pub max_hp: f64,
}

impl Health {
    pub fn alive(&self) -> bool {
        self.hp > 0.0
    }
}

/// Active buffs on a combatant.
///
/// Damage and blast boosts are consumed by the next shot fired; the
/// shield is consumed by the next explosion that reaches its bearer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Buffs {
    /// Multiplier on the next shot's damage.
    pub damage_mult: f64,
    /// Added to the next shot's blast radius.
    pub blast_bonus: f64,
    /// Added to the next shot's bounce budget.
    pub extra_bounces: u32,
    /// Remaining shield strength, if any.
    pub shield: Option<f64>,
}

impl Default for Buffs {
    fn default() -> Self {
        Self {
            damage_mult: 1.0,
            blast_bonus: 0.0,
            extra_bounces: 0,
            shield: None,
        }
    }
}

/// Radiation status: damage applied once per turn boundary,
/// independent of explosion falloff.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Radiation {
    pub damage_per_turn: f64,
    pub turns_remaining: u32,
}

/// Currently selected weapon.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Loadout {
    pub selected: WeaponId,
}

/// An in-flight projectile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    /// Player id of the combatant that fired it.
    pub owner: u32,
    pub weapon: WeaponId,
    /// Behavior driving flight and termination. Fragments carry
    /// `Standard` regardless of the parent weapon's tag.
    pub behavior: BehaviorTag,
    pub radius: f64,
    /// Budgeted terrain bounces (wall bounces are free).
    pub max_bounces: u32,
    pub bounces: u32,
    /// Accumulated escalating-bounce damage bonus.
    pub bounce_damage_bonus: f64,
    /// Split generation; children beyond the depth limit explode instead.
    pub split_depth: u8,
    /// Owner damage buff captured at fire time.
    pub damage_mult: f64,
    /// Owner blast buff captured at fire time.
    pub blast_bonus: f64,
    /// Scale on the weapon's base damage (fragments carry < 1.0).
    pub damage_scale: f64,
    /// Scale on the weapon's base blast radius.
    pub blast_scale: f64,
    pub phase: FlightPhase,
    pub phase_start_tick: u64,
    pub spawn_tick: u64,
    /// Tick of the last roller pulse.
    pub last_pulse_tick: u64,
    /// Tick at which a roller dropped below its stop speed, if it has.
    pub slow_since_tick: Option<u64>,
    /// Vertical velocity at the start of the previous tick (apex detection).
    pub prev_vy: f64,
}

/// Kind-specific payload of a delayed effect.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum EffectKind {
    /// A scheduled explosion at the effect's position.
    Fuse {
        owner: u32,
        weapon: WeaponId,
        damage: f64,
        radius: f64,
    },
    /// Calls down a staged sequence of falling strikes on its column.
    Beacon {
        owner: u32,
        weapon: WeaponId,
        strikes_remaining: u32,
        interval_secs: f64,
    },
    /// A crate falling from the sky; lands as a pickup.
    AirDrop { loot: LootKind },
    /// A persistent damaging field anchored to the terrain surface.
    AreaField {
        owner: u32,
        field: FieldKind,
        radius: f64,
        dps: f64,
        erosion_per_sec: f64,
    },
}

/// A pending simulation artifact advanced once per tick.
///
/// All gameplay-affecting timing runs through these records — never
/// through host timers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DelayedEffect {
    pub kind: EffectKind,
    pub remaining_secs: f64,
}

/// A transient zone pulling projectiles inward with inverse-linear falloff.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Attractor {
    pub radius: f64,
    pub strength: f64,
    pub remaining_secs: f64,
}

/// A landed airdrop crate awaiting collection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pickup {
    pub loot: LootKind,
}
