//! Trajectory solvers for bot combatants.
//!
//! Ballistic mode: two-phase grid search over (angle, power) replaying
//! the exact runtime flight model, with local refinement, a closed-form
//! fallback, and a self-damage nudge. Beam mode: per-degree ray march
//! with a distance-degraded accuracy roll so bots stay fallible.
//!
//! Both modes are pure functions of the situation; only the beam mode's
//! fumble roll consumes randomness.

use std::f64::consts::PI;

use rand::Rng;

use barrage_core::constants::*;
use barrage_core::types::Position;
use barrage_terrain::Heightfield;

use crate::beam::{distance_to_trace, trace_beam};
use crate::flight::{simulate_shot, FlightEnv, ShotOutcome};

/// Everything a solver needs to know about the world.
pub struct AimSituation<'a> {
    pub terrain: &'a Heightfield,
    pub env: FlightEnv,
    /// The shooter's position.
    pub origin: Position,
    /// The chosen victim's position.
    pub target: Position,
    /// Weapon muzzle speed at full power.
    pub muzzle_speed: f64,
    /// Weapon blast radius (the hit predicate).
    pub blast_radius: f64,
    pub projectile_radius: f64,
}

/// A firing decision.
#[derive(Debug, Clone, Copy)]
pub struct FiringSolution {
    pub angle_rad: f64,
    /// Fraction of the weapon's muzzle speed, in (0, 1].
    pub power: f64,
    /// Simulated impact distance to the target.
    pub miss_distance: f64,
    /// Whether the simulated impact falls within the blast radius.
    pub is_hit: bool,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    angle_rad: f64,
    power: f64,
    miss: f64,
}

/// Solve a ballistic shot.
pub fn solve_ballistic(sit: &AimSituation) -> FiringSolution {
    let deg = PI / 180.0;

    // Direct half-range faces the target; the other half banks off a wall.
    let firing_right = sit.target.x >= sit.origin.x;
    let (direct, bank) = if firing_right {
        ((10.0, 85.0), (95.0, 170.0))
    } else {
        ((95.0, 170.0), (10.0, 85.0))
    };

    let mut best: Option<Candidate> = None;
    for (lo, hi) in [direct, bank] {
        let mut angle_deg = lo;
        while angle_deg <= hi {
            for step in 0..AIM_POWER_STEPS {
                let t = step as f64 / (AIM_POWER_STEPS - 1).max(1) as f64;
                let power = AIM_MIN_POWER + (1.0 - AIM_MIN_POWER) * t;
                consider(sit, angle_deg * deg, power, &mut best);
            }
            angle_deg += AIM_ANGLE_STEP_DEG;
        }
    }

    let Some(coarse) = best else {
        return fallback_solution(sit);
    };

    // Local refinement around the best coarse candidate.
    let mut refined = Some(coarse);
    let mut da = -AIM_REFINE_ANGLE_DEG;
    while da <= AIM_REFINE_ANGLE_DEG {
        let mut dp = -AIM_REFINE_POWER;
        while dp <= AIM_REFINE_POWER {
            let power = (coarse.power + dp).clamp(AIM_MIN_POWER, 1.0);
            consider(sit, coarse.angle_rad + da * deg, power, &mut refined);
            dp += AIM_REFINE_POWER_STEP;
        }
        da += AIM_REFINE_ANGLE_STEP_DEG;
    }

    let safe = nudge_away_from_self(sit, refined.unwrap_or(coarse));
    FiringSolution {
        angle_rad: safe.angle_rad,
        power: safe.power,
        miss_distance: safe.miss,
        is_hit: safe.miss <= sit.blast_radius,
    }
}

/// Evaluate one candidate and keep it if it beats the current best.
fn consider(sit: &AimSituation, angle_rad: f64, power: f64, best: &mut Option<Candidate>) {
    let outcome = replay(sit, angle_rad, power);
    if outcome.impact.is_none() {
        return;
    }
    if outcome.miss_distance < best.map_or(f64::MAX, |b| b.miss) {
        *best = Some(Candidate {
            angle_rad,
            power,
            miss: outcome.miss_distance,
        });
    }
}

fn replay(sit: &AimSituation, angle_rad: f64, power: f64) -> ShotOutcome {
    simulate_shot(
        &sit.env,
        sit.terrain,
        &sit.origin,
        angle_rad,
        power * sit.muzzle_speed,
        sit.projectile_radius,
        &sit.target,
    )
}

/// Closed-form heuristic when the entire grid left the world: a steep
/// lob toward the target with power from flat-ground range geometry.
fn fallback_solution(sit: &AimSituation) -> FiringSolution {
    let firing_right = sit.target.x >= sit.origin.x;
    let angle_rad = if firing_right {
        60.0 * PI / 180.0
    } else {
        120.0 * PI / 180.0
    };
    let range = (sit.target.x - sit.origin.x).abs().max(1.0);
    // R = v² sin(2θ) / g  →  v = sqrt(R g / sin 2θ)
    let sin2 = (2.0 * angle_rad).sin().abs().max(1e-6);
    let v = (range * sit.env.gravity / sin2).sqrt();
    let power = (v / sit.muzzle_speed.max(1e-6)).clamp(AIM_MIN_POWER, 1.0);
    FiringSolution {
        angle_rad,
        power,
        miss_distance: f64::MAX,
        is_hit: false,
    }
}

/// Re-simulate the chosen shot and push power up while the predicted
/// blast would land on the shooter.
fn nudge_away_from_self(sit: &AimSituation, mut chosen: Candidate) -> Candidate {
    for _ in 0..6 {
        let outcome = replay(sit, chosen.angle_rad, chosen.power);
        let self_lethal = outcome
            .impact
            .map(|impact| impact.range_to(&sit.origin) <= sit.blast_radius)
            .unwrap_or(false);
        if !self_lethal {
            chosen.miss = outcome.miss_distance;
            return chosen;
        }
        if chosen.power < 1.0 {
            chosen.power = (chosen.power + 0.1).min(1.0);
        } else {
            // Already at full power: steepen away from the shooter.
            chosen.angle_rad += 5.0 * PI / 180.0;
        }
    }
    chosen
}

/// Solve a hitscan beam shot.
///
/// Marches every whole degree, preferring any angle that truly hits;
/// otherwise the angle with minimal miss. A distance-degraded accuracy
/// roll decides whether the bot commits or fumbles the angle.
pub fn solve_beam(
    sit: &AimSituation,
    max_bounces: u32,
    hit_width: f64,
    rng: &mut impl Rng,
) -> FiringSolution {
    let deg = PI / 180.0;
    let hit_threshold = hit_width + COMBATANT_RADIUS;

    let mut best_angle = PI / 4.0;
    let mut best_miss = f64::MAX;
    let mut hit = false;

    for angle_deg in 0..=180u32 {
        let angle_rad = angle_deg as f64 * deg;
        let trace = trace_beam(
            sit.terrain,
            sit.env.world_width,
            sit.env.void_y,
            &sit.origin,
            angle_rad,
            max_bounces,
        );
        let miss = distance_to_trace(&trace, &sit.target);
        if miss < best_miss {
            best_miss = miss;
            best_angle = angle_rad;
        }
        if miss <= hit_threshold {
            hit = true;
            break;
        }
    }

    let range = sit.origin.range_to(&sit.target);
    let commit_p = (1.0 - range / AIM_ACCURACY_FALLOFF_RANGE)
        .clamp(AIM_ACCURACY_MIN, AIM_ACCURACY_MAX);
    let angle_rad = if rng.gen::<f64>() <= commit_p {
        best_angle
    } else {
        best_angle + rng.gen_range(-AIM_BEAM_ERROR_DEG..AIM_BEAM_ERROR_DEG) * deg
    };

    FiringSolution {
        angle_rad,
        power: 1.0,
        miss_distance: best_miss,
        is_hit: hit,
    }
}
