//! Simulation Driver
//!
//! Owns the ECS world and the yearly schedule. Each [`Simulation::step`]
//! runs one year: marriage market, dynasties, then world events.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use chronicle_events::ChronicleEntry;

use crate::components::dynasty::Dynasties;
use crate::components::person::Roster;
use crate::components::world::WorldState;
use crate::config::Config;
use crate::error::SimulationError;
use crate::events::YearChronicle;
use crate::rules::{EventCatalog, RuleEngine};
use crate::setup::{create_world, found_dynasty};
use crate::systems::{
    process_world_events, simulate_dynasties, update_marriage_market, DynastySettings,
    MarriageMarket,
};

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);

/// Resource: the year being simulated and the exclusive end of the run
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimClock {
    pub year: i32,
    pub end_year: i32,
}

impl SimClock {
    pub fn new(start_year: i32, years: u32) -> Self {
        let years = i32::try_from(years).unwrap_or(i32::MAX);
        Self {
            year: start_year,
            end_year: start_year.saturating_add(years),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.year >= self.end_year
    }
}

/// Entries produced by one simulated year
#[derive(Debug, Clone, PartialEq)]
pub struct YearReport {
    pub year: i32,
    pub entries: Vec<ChronicleEntry>,
}

pub struct Simulation {
    world: World,
    schedule: Schedule,
}

impl Simulation {
    /// Builds the seed world and founds the configured dynasties
    pub fn new(config: &Config, catalog: EventCatalog) -> Self {
        let sim = &config.simulation;
        let settings = DynastySettings::from_config(config);
        let mut rng = SmallRng::seed_from_u64(sim.seed);

        let mut roster = Roster::new();
        let mut dynasties = Dynasties::new();
        for name in &sim.dynasties {
            dynasties.push(found_dynasty(name, sim.start_year, &mut roster, &settings.person, &mut rng));
        }

        let mut world = World::new();
        world.insert_resource(SimClock::new(sim.start_year, sim.years));
        world.insert_resource(SimRng(rng));
        world.insert_resource(create_world(sim.start_year));
        world.insert_resource(RuleEngine::new(catalog).with_config(config.engine.clone()));
        world.insert_resource(roster);
        world.insert_resource(dynasties);
        world.insert_resource(MarriageMarket::new());
        world.insert_resource(settings);
        world.insert_resource(YearChronicle::new());

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                update_marriage_market,
                simulate_dynasties,
                process_world_events,
            )
                .chain(),
        );

        tracing::info!(
            target: "simulation",
            "Simulation ready: {} dynasties, years {}..{}, seed {}",
            sim.dynasties.len(),
            sim.start_year,
            sim.start_year.saturating_add(i32::try_from(sim.years).unwrap_or(i32::MAX)),
            sim.seed
        );

        Self { world, schedule }
    }

    /// The year the next step will simulate
    pub fn year(&self) -> i32 {
        self.world.resource::<SimClock>().year
    }

    pub fn is_finished(&self) -> bool {
        self.world.resource::<SimClock>().is_finished()
    }

    /// Runs one year and advances the clock.
    ///
    /// On an engine error the clock stays on the failed year.
    pub fn step(&mut self) -> Result<YearReport, SimulationError> {
        let year = self.year();
        self.schedule.run(&mut self.world);

        let (entries, fault) = self.world.resource_mut::<YearChronicle>().drain();
        if let Some(err) = fault {
            return Err(err.into());
        }

        self.world.resource_mut::<SimClock>().year += 1;
        Ok(YearReport { year, entries })
    }

    /// Runs the remaining years, handing each report to `on_year`
    pub fn run<F>(&mut self, mut on_year: F) -> Result<(), SimulationError>
    where
        F: FnMut(&YearReport) -> Result<(), SimulationError>,
    {
        while !self.is_finished() {
            let report = self.step()?;
            on_year(&report)?;
        }
        tracing::info!(target: "simulation", "Simulation complete at {}", self.year());
        Ok(())
    }

    pub fn world_state(&self) -> &WorldState {
        self.world.resource::<WorldState>()
    }

    pub fn roster(&self) -> &Roster {
        self.world.resource::<Roster>()
    }

    pub fn dynasties(&self) -> &Dynasties {
        self.world.resource::<Dynasties>()
    }

    pub fn engine(&self) -> &RuleEngine {
        self.world.resource::<RuleEngine>()
    }

    /// Direct access to the ECS world (for tests and tooling)
    pub fn ecs_world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
