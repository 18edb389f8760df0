//! World Setup
//!
//! Seed world, name lists, and dynasty founding.

pub mod dynasty;
pub mod names;
pub mod world;

pub use dynasty::*;
pub use names::*;
pub use world::*;
