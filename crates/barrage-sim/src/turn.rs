//! Turn bookkeeping and per-player score state.

use barrage_core::enums::TurnStage;

/// Whose turn it is and whether the gate is holding it open.
#[derive(Debug, Clone, Copy)]
pub struct TurnState {
    /// 1-based turn counter, incremented on every advancement.
    pub number: u32,
    pub active_player: u32,
    pub stage: TurnStage,
    /// Tick at which the current resolution began (watchdog anchor).
    pub resolve_start_tick: u64,
}

impl Default for TurnState {
    fn default() -> Self {
        Self {
            number: 1,
            active_player: 0,
            stage: TurnStage::Aiming,
            resolve_start_tick: 0,
        }
    }
}

/// Reward accounting for one player.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerScore {
    /// Damage dealt to enemies (self-damage excluded).
    pub damage_dealt: f64,
    pub kills: u32,
    pub shots_fired: u32,
    pub currency: f64,
}
