//! World Setup
//!
//! Creates the six regions and six factions with their starting stats.

use chronicle_events::{StatValue, TargetKind};

use crate::components::world::WorldState;

pub const REGIONS: [&str; 6] = [
    "Northern Mountains",
    "Central Valley",
    "Eastern Forests",
    "Southern Plains",
    "Western Deserts",
    "Coastal Regions",
];

pub const FACTIONS: [&str; 6] = [
    "Mages' Guild",
    "Noble Houses",
    "Merchant League",
    "Rangers' Order",
    "Temple of Light",
    "Dark Brotherhood",
];

/// Faction and region every dynasty is founded in
pub const ROYAL_FACTION: &str = "Noble Houses";
pub const ROYAL_REGION: &str = "Central Valley";

/// Build the starting world for `start_year`
pub fn create_world(start_year: i32) -> WorldState {
    let mut world = WorldState::new(start_year);

    let regions: [(&str, &[(&str, i64)]); 6] = [
        (
            "Northern Mountains",
            &[
                ("magical_energy", 30),
                ("trade", 40),
                ("fertility", 20),
                ("creature_diversity", 50),
                ("dragon_activity", 10),
            ],
        ),
        (
            "Central Valley",
            &[
                ("magical_energy", 50),
                ("trade", 70),
                ("fertility", 80),
                ("creature_diversity", 40),
            ],
        ),
        (
            "Eastern Forests",
            &[
                ("magical_energy", 60),
                ("trade", 30),
                ("fertility", 55),
                ("creature_diversity", 40),
            ],
        ),
        (
            "Southern Plains",
            &[
                ("magical_energy", 20),
                ("trade", 60),
                ("fertility", 70),
                ("creature_diversity", 30),
            ],
        ),
        (
            "Western Deserts",
            &[
                ("magical_energy", 40),
                ("trade", 40),
                ("fertility", 10),
                ("creature_diversity", 20),
            ],
        ),
        (
            "Coastal Regions",
            &[
                ("magical_energy", 30),
                ("trade", 80),
                ("fertility", 50),
                ("creature_diversity", 50),
            ],
        ),
    ];

    let factions: [(&str, &[(&str, i64)]); 6] = [
        ("Mages' Guild", &[("power", 60), ("influence", 65), ("stability", 70)]),
        ("Noble Houses", &[("power", 65), ("influence", 70), ("stability", 75)]),
        (
            "Merchant League",
            &[
                ("power", 55),
                ("influence", 60),
                ("stability", 80),
                ("trade_income", 70),
            ],
        ),
        ("Rangers' Order", &[("power", 55), ("influence", 50), ("stability", 85)]),
        ("Temple of Light", &[("power", 55), ("influence", 75), ("stability", 85)]),
        ("Dark Brotherhood", &[("power", 50), ("influence", 40), ("stability", 40)]),
    ];

    for (region, stats) in regions {
        for (stat, value) in stats {
            world.set_stat(TargetKind::Region, region, stat, StatValue::Number(*value));
        }
    }
    for (faction, stats) in factions {
        for (stat, value) in stats {
            world.set_stat(TargetKind::Faction, faction, stat, StatValue::Number(*value));
        }
    }
    world.set_stat(
        TargetKind::Faction,
        "Mages' Guild",
        "leader",
        StatValue::from("Archmage Eldrin"),
    );

    tracing::info!(
        target: "world",
        "Created {} regions and {} factions",
        world.regions().len(),
        world.factions().len()
    );
    world
}
