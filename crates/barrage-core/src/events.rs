//! Events emitted by the simulation for render and audio feedback.
//!
//! Fire-and-forget: the engine behaves identically when these are
//! discarded.

use serde::{Deserialize, Serialize};

use crate::enums::LootKind;
use crate::types::Position;
use crate::weapons::WeaponId;

/// Visual/audio hook events drained into each snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FxEvent {
    /// A combatant fired a weapon.
    Fired { player_id: u32, weapon: WeaponId },
    /// An explosion resolved.
    Explosion { x: f64, y: f64, radius: f64 },
    /// A projectile bounced (wall or terrain).
    Bounce { x: f64, y: f64 },
    /// A hitscan beam was traced; vertices include every reflection.
    BeamPath { vertices: Vec<Position> },
    /// Terrain columns in this span were mutated.
    TerrainScorched { from_col: u32, to_col: u32 },
    /// A combatant took damage.
    Hurt { player_id: u32, amount: f64 },
    /// A combatant died.
    Killed { player_id: u32 },
    /// A new turn began.
    TurnStarted { player_id: u32, turn: u32 },
    /// An airdrop crate touched down.
    PickupLanded { x: f64, y: f64 },
    /// A crate was collected at the turn boundary.
    PickupCollected { player_id: u32, loot: LootKind },
    /// The watchdog force-cleared a stuck resolution.
    WatchdogTripped,
    /// The match ended. `winner` is None on a mutual kill.
    MatchOver { winner: Option<u32> },
}
