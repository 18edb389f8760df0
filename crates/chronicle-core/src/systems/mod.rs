//! ECS Systems
//!
//! Yearly systems, chained in this order: marriage market, dynasties, world events.

pub mod dynasty;
pub mod marriage;
pub mod world_events;

pub use dynasty::{
    find_successor, marriage_chance, simulate_dynasties, simulate_dynasty_year, DynastySettings,
    SUCCESSION_MIN_AGE,
};
pub use marriage::{update_marriage_market, MarriageCandidate, MarriageMarket};
pub use world_events::process_world_events;
