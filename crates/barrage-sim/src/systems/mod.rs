//! Simulation systems, run in a fixed order each tick.
//!
//! The ordering inside `MatchEngine::run_systems` is a correctness
//! invariant, not a style choice — see the engine.

pub mod beams;
pub mod cleanup;
pub mod contact;
pub mod effects;
pub mod explosion;
pub mod flight;
pub mod gate;
pub mod locomotion;
pub mod snapshot;
