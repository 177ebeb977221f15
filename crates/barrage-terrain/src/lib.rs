//! Destructible terrain for BARRAGE.
//!
//! A 1D heightfield with interpolated surface queries and the monotonic
//! sculpting primitives explosions dispatch on.

pub use barrage_core as core;

pub mod heightfield;
pub mod sculpt;

// Re-export the key type for convenience.
pub use heightfield::Heightfield;
