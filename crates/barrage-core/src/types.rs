//! Fundamental geometric and simulation types.
//!
//! The arena uses screen-style coordinates: x grows rightward, y grows
//! downward. Gravity is +y; a terrain column with a larger stored height
//! sits lower in the world.

use serde::{Deserialize, Serialize};

/// 2D position in arena space (world units).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// 2D velocity in arena space (units/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another position.
    pub fn range_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Distance from this point to the segment `a`..`b`.
    ///
    /// Degenerate (near zero-length) segments collapse to a point distance.
    pub fn distance_to_segment(&self, a: &Position, b: &Position) -> f64 {
        let abx = b.x - a.x;
        let aby = b.y - a.y;
        let len_sq = abx * abx + aby * aby;
        if len_sq < 1e-12 {
            return self.range_to(a);
        }
        let t = (((self.x - a.x) * abx + (self.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
        let px = a.x + abx * t;
        let py = a.y + aby * t;
        self.range_to(&Position::new(px, py))
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Build a velocity from a firing angle and speed.
    ///
    /// Angles are measured from +x: 0 fires right, `PI/2` fires straight
    /// up, `PI` fires left. Upward motion is negative y.
    pub fn from_angle_speed(angle_rad: f64, speed: f64) -> Self {
        Self {
            x: angle_rad.cos() * speed,
            y: -angle_rad.sin() * speed,
        }
    }

    /// Speed magnitude (units/s).
    pub fn speed(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl SimTime {
    /// Seconds per tick at the fixed tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}
