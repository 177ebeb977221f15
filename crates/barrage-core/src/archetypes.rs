//! Archetype-specific combat modifiers.
//!
//! Consolidates per-archetype parameters applied by the explosion
//! resolver and the projectile integrator.

use crate::constants::PASSIVE_HOMING_STEER;
use crate::enums::ArchetypeKind;

/// Combat profile for a combatant archetype.
pub struct ArchetypeProfile {
    /// Multiplier on damage dealt.
    pub damage_mult: f64,
    /// Multiplier on damage taken.
    pub damage_taken_mult: f64,
    /// Multiplier on knockback impulses received.
    pub knockback_factor: f64,
    /// Passive homing steer applied to every owned projectile.
    pub passive_homing: f64,
}

/// Get the combat profile for a given archetype.
pub fn archetype_profile(kind: ArchetypeKind) -> ArchetypeProfile {
    match kind {
        ArchetypeKind::Trooper => ArchetypeProfile {
            damage_mult: 1.0,
            damage_taken_mult: 1.0,
            knockback_factor: 1.0,
            passive_homing: 0.0,
        },
        ArchetypeKind::Berserker => ArchetypeProfile {
            damage_mult: 1.25,
            damage_taken_mult: 1.1,
            knockback_factor: 1.0,
            passive_homing: 0.0,
        },
        ArchetypeKind::Bulwark => ArchetypeProfile {
            damage_mult: 1.0,
            damage_taken_mult: 0.8,
            knockback_factor: 0.7,
            passive_homing: 0.0,
        },
        ArchetypeKind::Phantom => ArchetypeProfile {
            damage_mult: 1.0,
            damage_taken_mult: 1.0,
            knockback_factor: 1.0,
            passive_homing: PASSIVE_HOMING_STEER,
        },
    }
}
