//! Player commands sent from the frontend to the simulation.
//!
//! Commands are validated and queued for processing at the next tick
//! boundary. Invalid commands (wrong phase, wrong player, dead shooter)
//! are dropped without effect.

use serde::{Deserialize, Serialize};

use crate::weapons::WeaponId;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Start (or restart) a match.
    StartMatch,
    /// Change the selected weapon.
    SelectWeapon { player_id: u32, weapon: WeaponId },
    /// Fire the selected weapon. `power` is a fraction of the weapon's
    /// muzzle speed, clamped to (0, 1]. Only honored for the active
    /// combatant during the aiming stage.
    Fire {
        player_id: u32,
        angle_rad: f64,
        power: f64,
    },
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
}
