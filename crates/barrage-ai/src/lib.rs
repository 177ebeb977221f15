//! Aiming intelligence for BARRAGE.
//!
//! Pure functions over the current world state: the ballistic flight
//! kernel shared with the integrator, the hitscan beam trace, and the
//! trajectory solvers used by bot combatants. Nothing here mutates the
//! world, so solvers can be re-run freely within one decision.

pub mod beam;
pub mod flight;
pub mod solver;

pub use solver::{solve_ballistic, solve_beam, AimSituation, FiringSolution};
