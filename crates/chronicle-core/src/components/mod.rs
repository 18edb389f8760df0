//! ECS Resources
//!
//! World stats, the person arena, and dynasties.

pub mod dynasty;
pub mod person;
pub mod world;

pub use dynasty::*;
pub use person::*;
pub use world::*;
