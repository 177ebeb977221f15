//! Ballistic flight kernel.
//!
//! The exact force/reflection model the runtime integrator applies each
//! tick, factored out so the trajectory solver replays real flights
//! rather than an approximation. Forces are applied to velocity before
//! position (semi-implicit Euler); wall bounces are free.

use barrage_core::constants::{
    AIM_SIM_MAX_SECS, DT, GRAVITY, MUZZLE_OFFSET, VOID_START_Y, WALL_RESTITUTION, WORLD_WIDTH,
};
use barrage_core::types::{Position, Velocity};
use barrage_terrain::Heightfield;

/// Ambient flight environment for one tick or one simulated shot.
#[derive(Debug, Clone, Copy)]
pub struct FlightEnv {
    /// Downward acceleration (units/s²).
    pub gravity: f64,
    /// Lateral wind acceleration (units/s²).
    pub wind: f64,
    pub world_width: f64,
    /// Anything below this y is gone.
    pub void_y: f64,
    pub wall_restitution: f64,
}

impl FlightEnv {
    /// Standard environment with the given wind and void line.
    pub fn standard(wind: f64, void_y: f64) -> Self {
        Self {
            gravity: GRAVITY,
            wind,
            world_width: WORLD_WIDTH,
            void_y,
            wall_restitution: WALL_RESTITUTION,
        }
    }
}

impl Default for FlightEnv {
    fn default() -> Self {
        Self::standard(0.0, VOID_START_Y)
    }
}

/// Apply gravity then wind to a velocity for one step.
pub fn apply_ballistic_forces(env: &FlightEnv, vel: &mut Velocity, dt: f64) {
    vel.y += env.gravity * dt;
    vel.x += env.wind * dt;
}

/// Reflect off the world walls, clamping position.
///
/// Returns true if a bounce happened. Wall bounces never consume the
/// weapon's bounce budget.
pub fn reflect_world_walls(env: &FlightEnv, pos: &mut Position, vel: &mut Velocity, radius: f64) -> bool {
    let mut bounced = false;
    if pos.x < radius && vel.x < 0.0 {
        pos.x = radius;
        vel.x = -vel.x * env.wall_restitution;
        bounced = true;
    }
    let right = env.world_width - radius;
    if pos.x > right && vel.x > 0.0 {
        pos.x = right;
        vel.x = -vel.x * env.wall_restitution;
        bounced = true;
    }
    bounced
}

/// Result of replaying one candidate shot.
#[derive(Debug, Clone, Copy)]
pub struct ShotOutcome {
    /// Terrain impact point, if the shot landed.
    pub impact: Option<Position>,
    /// Impact distance to the target (`f64::MAX` when no impact).
    pub miss_distance: f64,
    /// The shot fell into the void or timed out without landing.
    pub left_world: bool,
}

/// Replay one shot through the runtime flight model until it lands,
/// falls into the void, or times out.
pub fn simulate_shot(
    env: &FlightEnv,
    terrain: &Heightfield,
    origin: &Position,
    angle_rad: f64,
    speed: f64,
    projectile_radius: f64,
    target: &Position,
) -> ShotOutcome {
    let mut pos = Position::new(
        origin.x + angle_rad.cos() * MUZZLE_OFFSET,
        origin.y - angle_rad.sin() * MUZZLE_OFFSET,
    );
    let mut vel = Velocity::from_angle_speed(angle_rad, speed);

    let steps = (AIM_SIM_MAX_SECS / DT) as usize;
    for _ in 0..steps {
        apply_ballistic_forces(env, &mut vel, DT);
        pos.x += vel.x * DT;
        pos.y += vel.y * DT;
        reflect_world_walls(env, &mut pos, &mut vel, projectile_radius);

        if pos.y - projectile_radius > env.void_y {
            return ShotOutcome {
                impact: None,
                miss_distance: f64::MAX,
                left_world: true,
            };
        }
        if terrain.is_below(pos.x, pos.y + projectile_radius) {
            let impact = Position::new(pos.x, terrain.height_at(pos.x) - projectile_radius);
            return ShotOutcome {
                impact: Some(impact),
                miss_distance: impact.range_to(target),
                left_world: false,
            };
        }
    }

    ShotOutcome {
        impact: None,
        miss_distance: f64::MAX,
        left_world: true,
    }
}
