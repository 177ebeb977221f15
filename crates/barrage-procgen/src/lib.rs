//! Procedural terrain generation for BARRAGE.
//!
//! Layered value noise shaped for fair artillery duels: the surface
//! fades out near the world walls and spawn platforms are pulled into
//! a common height band.

pub use barrage_core as core;

mod generator;

pub use generator::generate;
