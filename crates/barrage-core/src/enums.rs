//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Match phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Lobby,
    Active,
    Paused,
    MatchOver,
}

/// Per-turn micro-state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnStage {
    /// The active combatant may fire.
    #[default]
    Aiming,
    /// A shot is in flight; the completion gate holds the turn open.
    Resolving,
}

/// Who steers a combatant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    #[default]
    Human,
    Bot,
}

/// Combatant archetype category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArchetypeKind {
    /// Balanced baseline.
    #[default]
    Trooper,
    /// Hits harder, takes slightly more damage.
    Berserker,
    /// Damage-resistant and hard to push around.
    Bulwark,
    /// Every shot gains a faint homing pull.
    Phantom,
}

/// Terrain mutation applied by an explosion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerrainEffect {
    /// Carve a smooth crater.
    #[default]
    Destroy,
    /// Pile up a smooth mound.
    Raise,
    /// Pile up an irregular rampart.
    RaiseJagged,
    /// Tear an irregular pit, possibly down to the void line.
    DigJagged,
}

/// Projectile flight state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightPhase {
    /// Ballistic flight.
    #[default]
    Flying,
    /// Ground-following surface roll.
    Rolling,
    /// Tunneling through terrain in a straight, decaying line.
    Drilling,
    /// Tracking a target beneath the surface.
    Burrowing,
    /// Seeker head locked; full-strength homing engaged.
    Locked,
}

/// Condition that makes a splitter shed its fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitTrigger {
    /// First terrain contact.
    Bounce,
    /// Vertical velocity sign change after a minimum flight time.
    Apex,
    /// An enemy combatant comes within the trigger range.
    Proximity,
}

/// Flavor of a persistent area field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Napalm,
    Acid,
}

/// Contents of an airdropped crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LootKind {
    /// Restores hit points.
    RepairKit,
    /// Boosts the next shot's damage.
    DamageBooster,
    /// Boosts the next shot's blast radius.
    BlastBooster,
    /// One-shot damage shield.
    AegisShield,
}

/// Flight/termination behavior of a weapon.
///
/// A closed union: the integrator dispatches terrain/contact handling on
/// this tag, and the explosion resolver dispatches secondary effects on it.
/// Fragments spawned by splitters and clusters carry `Standard`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BehaviorTag {
    /// Explode on first terrain contact.
    Standard,
    /// Reflect off terrain and explode at every impact; the final impact
    /// gets an enlarged blast.
    Pinball { final_radius_bonus: f64 },
    /// Reflect off terrain, banking extra damage per bounce instead of
    /// exploding, until the bounce budget runs out.
    Escalator { bonus_per_bounce: f64 },
    /// Erode a channel through terrain while velocity decays; detonate on
    /// exiting into open air or touching a combatant.
    Drill { channel_width: f64, speed_decay: f64 },
    /// Follow the surface, pulsing area damage on an interval.
    Roller {
        pulse_interval_secs: f64,
        pulse_damage: f64,
        pulse_radius: f64,
    },
    /// Travel beneath the surface toward the nearest enemy and erupt.
    Burrower { trigger_range: f64, timeout_secs: f64 },
    /// Shed fragments on the trigger condition instead of exploding.
    Splitter {
        trigger: SplitTrigger,
        count: u32,
        inherit: f64,
        /// Trigger distance for `SplitTrigger::Proximity` (unused otherwise).
        proximity_range: f64,
    },
    /// Constant gentle steering toward the nearest enemy.
    Homing { steer: f64 },
    /// Weak until apex, then locks on with full-strength steering.
    Seeker { steer: f64, min_flight_secs: f64 },
    /// Hitscan beam; resolved instantly, never spawns a projectile.
    Beam { hit_width: f64 },
    /// Concentric delayed sub-explosions at fixed offsets.
    StagedBlast {
        stages: u32,
        stage_delay_secs: f64,
        radius_step: f64,
    },
    /// Single jump to the nearest additional living target.
    ChainArc { jump_range: f64, damage_fraction: f64 },
    /// Leave a damaging, terrain-eroding field anchored to the surface.
    FieldSpawner {
        kind: FieldKind,
        duration_secs: f64,
        dps: f64,
        radius: f64,
        erosion_per_sec: f64,
    },
    /// Apply a per-turn damage-over-time status to everyone in the blast.
    Irradiator { turns: u32, damage_per_turn: f64 },
    /// Raise the void line.
    VoidSurge { raise_amount: f64 },
    /// Teleport the owner to the impact point.
    Warp,
    /// Explode and fan out fragments.
    Cluster { count: u32, inherit: f64 },
    /// Leave a transient attractor field that pulls projectiles inward.
    Singularity {
        pull_radius: f64,
        strength: f64,
        duration_secs: f64,
    },
    /// Plant a beacon that calls down a staged sequence of strikes.
    BeaconCall { strikes: u32, interval_secs: f64 },
}
