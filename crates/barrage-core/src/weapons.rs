//! Static weapon definition table.
//!
//! Pure data, no logic: the integrator and resolver dispatch on the
//! behavior tag, the terrain system on the terrain effect. Tuning lives
//! here rather than in constants so each weapon reads as one block.

use serde::{Deserialize, Serialize};

use crate::enums::{BehaviorTag, FieldKind, SplitTrigger, TerrainEffect};

/// Weapon identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponId {
    #[default]
    Shell,
    HeavyMortar,
    Pinball,
    RubberBomb,
    Driller,
    Roller,
    Sapper,
    MirvHead,
    FragBomb,
    FlakShell,
    Hornet,
    Lancer,
    SunLance,
    TsarShell,
    ArcCaster,
    NapalmShell,
    AcidRain,
    DirtyBomb,
    VoidTide,
    WarpShell,
    ClusterBomb,
    GravityWell,
    DirtSlinger,
    Rampart,
    Quaker,
    SkyHammer,
}

/// Static definition for one weapon.
///
/// Not serialized — snapshots and commands carry `WeaponId` only.
#[derive(Debug, Clone, Copy)]
pub struct WeaponSpec {
    pub name: &'static str,
    /// Base damage at the blast center.
    pub damage: f64,
    /// Base blast radius.
    pub blast_radius: f64,
    /// Muzzle speed at full power (units/s).
    pub speed: f64,
    /// Budgeted terrain bounces before forced detonation.
    pub max_bounces: u32,
    /// Minimum damage falloff fraction inside the blast radius.
    pub falloff_floor: f64,
    /// Projectile collision radius.
    pub projectile_radius: f64,
    pub behavior: BehaviorTag,
    pub terrain_effect: TerrainEffect,
}

/// Look up the static definition for a weapon.
pub fn weapon_spec(id: WeaponId) -> WeaponSpec {
    match id {
        WeaponId::Shell => WeaponSpec {
            name: "Shell",
            damage: 30.0,
            blast_radius: 45.0,
            speed: 780.0,
            max_bounces: 0,
            falloff_floor: 0.0,
            projectile_radius: 5.0,
            behavior: BehaviorTag::Standard,
            terrain_effect: TerrainEffect::Destroy,
        },
        WeaponId::HeavyMortar => WeaponSpec {
            name: "Heavy Mortar",
            damage: 48.0,
            blast_radius: 70.0,
            speed: 640.0,
            max_bounces: 0,
            falloff_floor: 0.1,
            projectile_radius: 7.0,
            behavior: BehaviorTag::Standard,
            terrain_effect: TerrainEffect::Destroy,
        },
        WeaponId::Pinball => WeaponSpec {
            name: "Pinball",
            damage: 22.0,
            blast_radius: 38.0,
            speed: 760.0,
            max_bounces: 4,
            falloff_floor: 0.0,
            projectile_radius: 5.0,
            behavior: BehaviorTag::Pinball {
                final_radius_bonus: 25.0,
            },
            terrain_effect: TerrainEffect::Destroy,
        },
        WeaponId::RubberBomb => WeaponSpec {
            name: "Rubber Bomb",
            damage: 18.0,
            blast_radius: 42.0,
            speed: 740.0,
            max_bounces: 6,
            falloff_floor: 0.0,
            projectile_radius: 5.0,
            behavior: BehaviorTag::Escalator {
                bonus_per_bounce: 7.0,
            },
            terrain_effect: TerrainEffect::Destroy,
        },
        WeaponId::Driller => WeaponSpec {
            name: "Driller",
            damage: 34.0,
            blast_radius: 40.0,
            speed: 820.0,
            max_bounces: 0,
            falloff_floor: 0.0,
            projectile_radius: 5.0,
            behavior: BehaviorTag::Drill {
                channel_width: 12.0,
                speed_decay: 0.992,
            },
            terrain_effect: TerrainEffect::Destroy,
        },
        WeaponId::Roller => WeaponSpec {
            name: "Roller",
            damage: 30.0,
            blast_radius: 44.0,
            speed: 700.0,
            max_bounces: 0,
            falloff_floor: 0.0,
            projectile_radius: 6.0,
            behavior: BehaviorTag::Roller {
                pulse_interval_secs: 0.5,
                pulse_damage: 6.0,
                pulse_radius: 26.0,
            },
            terrain_effect: TerrainEffect::Destroy,
        },
        WeaponId::Sapper => WeaponSpec {
            name: "Sapper",
            damage: 40.0,
            blast_radius: 52.0,
            speed: 720.0,
            max_bounces: 0,
            falloff_floor: 0.0,
            projectile_radius: 5.0,
            behavior: BehaviorTag::Burrower {
                trigger_range: 40.0,
                timeout_secs: 6.0,
            },
            terrain_effect: TerrainEffect::Destroy,
        },
        WeaponId::MirvHead => WeaponSpec {
            name: "MIRV Head",
            damage: 16.0,
            blast_radius: 34.0,
            speed: 760.0,
            max_bounces: 0,
            falloff_floor: 0.0,
            projectile_radius: 5.0,
            behavior: BehaviorTag::Splitter {
                trigger: SplitTrigger::Apex,
                count: 5,
                inherit: 0.85,
                proximity_range: 0.0,
            },
            terrain_effect: TerrainEffect::Destroy,
        },
        WeaponId::FragBomb => WeaponSpec {
            name: "Frag Bomb",
            damage: 14.0,
            blast_radius: 30.0,
            speed: 740.0,
            max_bounces: 0,
            falloff_floor: 0.0,
            projectile_radius: 5.0,
            behavior: BehaviorTag::Splitter {
                trigger: SplitTrigger::Bounce,
                count: 3,
                inherit: 0.6,
                proximity_range: 0.0,
            },
            terrain_effect: TerrainEffect::Destroy,
        },
        WeaponId::FlakShell => WeaponSpec {
            name: "Flak Shell",
            damage: 12.0,
            blast_radius: 28.0,
            speed: 780.0,
            max_bounces: 0,
            falloff_floor: 0.0,
            projectile_radius: 5.0,
            behavior: BehaviorTag::Splitter {
                trigger: SplitTrigger::Proximity,
                count: 4,
                inherit: 0.5,
                proximity_range: 90.0,
            },
            terrain_effect: TerrainEffect::Destroy,
        },
        WeaponId::Hornet => WeaponSpec {
            name: "Hornet",
            damage: 26.0,
            blast_radius: 40.0,
            speed: 700.0,
            max_bounces: 0,
            falloff_floor: 0.0,
            projectile_radius: 5.0,
            behavior: BehaviorTag::Homing { steer: 0.035 },
            terrain_effect: TerrainEffect::Destroy,
        },
        WeaponId::Lancer => WeaponSpec {
            name: "Lancer",
            damage: 32.0,
            blast_radius: 42.0,
            speed: 760.0,
            max_bounces: 0,
            falloff_floor: 0.0,
            projectile_radius: 5.0,
            behavior: BehaviorTag::Seeker {
                steer: 0.06,
                min_flight_secs: 0.45,
            },
            terrain_effect: TerrainEffect::Destroy,
        },
        WeaponId::SunLance => WeaponSpec {
            name: "Sun Lance",
            damage: 36.0,
            blast_radius: 0.0,
            speed: 0.0,
            max_bounces: 3,
            falloff_floor: 0.0,
            projectile_radius: 0.0,
            behavior: BehaviorTag::Beam { hit_width: 6.0 },
            terrain_effect: TerrainEffect::Destroy,
        },
        WeaponId::TsarShell => WeaponSpec {
            name: "Tsar Shell",
            damage: 36.0,
            blast_radius: 55.0,
            speed: 640.0,
            max_bounces: 0,
            falloff_floor: 0.1,
            projectile_radius: 8.0,
            behavior: BehaviorTag::StagedBlast {
                stages: 3,
                stage_delay_secs: 0.45,
                radius_step: 18.0,
            },
            terrain_effect: TerrainEffect::Destroy,
        },
        WeaponId::ArcCaster => WeaponSpec {
            name: "Arc Caster",
            damage: 28.0,
            blast_radius: 36.0,
            speed: 760.0,
            max_bounces: 0,
            falloff_floor: 0.0,
            projectile_radius: 5.0,
            behavior: BehaviorTag::ChainArc {
                jump_range: 260.0,
                damage_fraction: 0.5,
            },
            terrain_effect: TerrainEffect::Destroy,
        },
        WeaponId::NapalmShell => WeaponSpec {
            name: "Napalm Shell",
            damage: 20.0,
            blast_radius: 40.0,
            speed: 720.0,
            max_bounces: 0,
            falloff_floor: 0.0,
            projectile_radius: 6.0,
            behavior: BehaviorTag::FieldSpawner {
                kind: FieldKind::Napalm,
                duration_secs: 4.5,
                dps: 9.0,
                radius: 70.0,
                erosion_per_sec: 6.0,
            },
            terrain_effect: TerrainEffect::Destroy,
        },
        WeaponId::AcidRain => WeaponSpec {
            name: "Acid Rain",
            damage: 14.0,
            blast_radius: 34.0,
            speed: 720.0,
            max_bounces: 0,
            falloff_floor: 0.0,
            projectile_radius: 6.0,
            behavior: BehaviorTag::FieldSpawner {
                kind: FieldKind::Acid,
                duration_secs: 5.5,
                dps: 7.0,
                radius: 85.0,
                erosion_per_sec: 10.0,
            },
            terrain_effect: TerrainEffect::DigJagged,
        },
        WeaponId::DirtyBomb => WeaponSpec {
            name: "Dirty Bomb",
            damage: 22.0,
            blast_radius: 48.0,
            speed: 720.0,
            max_bounces: 0,
            falloff_floor: 0.0,
            projectile_radius: 6.0,
            behavior: BehaviorTag::Irradiator {
                turns: 3,
                damage_per_turn: 8.0,
            },
            terrain_effect: TerrainEffect::Destroy,
        },
        WeaponId::VoidTide => WeaponSpec {
            name: "Void Tide",
            damage: 18.0,
            blast_radius: 40.0,
            speed: 700.0,
            max_bounces: 0,
            falloff_floor: 0.0,
            projectile_radius: 6.0,
            behavior: BehaviorTag::VoidSurge { raise_amount: 60.0 },
            terrain_effect: TerrainEffect::Destroy,
        },
        WeaponId::WarpShell => WeaponSpec {
            name: "Warp Shell",
            damage: 10.0,
            blast_radius: 26.0,
            speed: 780.0,
            max_bounces: 0,
            falloff_floor: 0.0,
            projectile_radius: 5.0,
            behavior: BehaviorTag::Warp,
            terrain_effect: TerrainEffect::Destroy,
        },
        WeaponId::ClusterBomb => WeaponSpec {
            name: "Cluster Bomb",
            damage: 24.0,
            blast_radius: 42.0,
            speed: 720.0,
            max_bounces: 0,
            falloff_floor: 0.0,
            projectile_radius: 6.0,
            behavior: BehaviorTag::Cluster {
                count: 6,
                inherit: 0.7,
            },
            terrain_effect: TerrainEffect::Destroy,
        },
        WeaponId::GravityWell => WeaponSpec {
            name: "Gravity Well",
            damage: 12.0,
            blast_radius: 30.0,
            speed: 700.0,
            max_bounces: 0,
            falloff_floor: 0.0,
            projectile_radius: 6.0,
            behavior: BehaviorTag::Singularity {
                pull_radius: 240.0,
                strength: 520.0,
                duration_secs: 4.0,
            },
            terrain_effect: TerrainEffect::Destroy,
        },
        WeaponId::DirtSlinger => WeaponSpec {
            name: "Dirt Slinger",
            damage: 8.0,
            blast_radius: 60.0,
            speed: 720.0,
            max_bounces: 0,
            falloff_floor: 0.0,
            projectile_radius: 6.0,
            behavior: BehaviorTag::Standard,
            terrain_effect: TerrainEffect::Raise,
        },
        WeaponId::Rampart => WeaponSpec {
            name: "Rampart",
            damage: 6.0,
            blast_radius: 75.0,
            speed: 700.0,
            max_bounces: 0,
            falloff_floor: 0.0,
            projectile_radius: 6.0,
            behavior: BehaviorTag::Standard,
            terrain_effect: TerrainEffect::RaiseJagged,
        },
        WeaponId::Quaker => WeaponSpec {
            name: "Quaker",
            damage: 26.0,
            blast_radius: 65.0,
            speed: 680.0,
            max_bounces: 0,
            falloff_floor: 0.0,
            projectile_radius: 7.0,
            behavior: BehaviorTag::Standard,
            terrain_effect: TerrainEffect::DigJagged,
        },
        WeaponId::SkyHammer => WeaponSpec {
            name: "Sky Hammer",
            damage: 20.0,
            blast_radius: 40.0,
            speed: 720.0,
            max_bounces: 0,
            falloff_floor: 0.0,
            projectile_radius: 5.0,
            behavior: BehaviorTag::BeaconCall {
                strikes: 3,
                interval_secs: 0.5,
            },
            terrain_effect: TerrainEffect::Destroy,
        },
    }
}

/// Every weapon id, for iteration in tests and UI listings.
pub const ALL_WEAPONS: [WeaponId; 26] = [
    WeaponId::Shell,
    WeaponId::HeavyMortar,
    WeaponId::Pinball,
    WeaponId::RubberBomb,
    WeaponId::Driller,
    WeaponId::Roller,
    WeaponId::Sapper,
    WeaponId::MirvHead,
    WeaponId::FragBomb,
    WeaponId::FlakShell,
    WeaponId::Hornet,
    WeaponId::Lancer,
    WeaponId::SunLance,
    WeaponId::TsarShell,
    WeaponId::ArcCaster,
    WeaponId::NapalmShell,
    WeaponId::AcidRain,
    WeaponId::DirtyBomb,
    WeaponId::VoidTide,
    WeaponId::WarpShell,
    WeaponId::ClusterBomb,
    WeaponId::GravityWell,
    WeaponId::DirtSlinger,
    WeaponId::Rampart,
    WeaponId::Quaker,
    WeaponId::SkyHammer,
];
