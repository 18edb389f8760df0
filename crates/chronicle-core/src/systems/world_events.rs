//! World Event System
//!
//! Runs the rule engine for the current year after the dynasties have aged.

use bevy_ecs::prelude::*;

use chronicle_events::ChronicleEntry;

use crate::components::world::WorldState;
use crate::events::YearChronicle;
use crate::rules::RuleEngine;
use crate::simulation::{SimClock, SimRng};

/// System: process world events and append them to the year's chronicle.
///
/// An engine error is recorded as the chronicle's fault; the driver turns
/// it into a failed step.
pub fn process_world_events(
    clock: Res<SimClock>,
    engine: Res<RuleEngine>,
    mut rng: ResMut<SimRng>,
    mut world_state: ResMut<WorldState>,
    mut chronicle: ResMut<YearChronicle>,
) {
    if chronicle.fault.is_some() {
        return;
    }

    match engine.process(&mut world_state, clock.year, &mut rng.0) {
        Ok(triggered) => {
            if !triggered.is_empty() {
                tracing::debug!(
                    target: "world",
                    "Found {} world events in {}",
                    triggered.len(),
                    clock.year
                );
            }
            chronicle.extend(triggered.into_iter().map(ChronicleEntry::World));
        }
        Err(err) => {
            tracing::error!(target: "events", "Rule engine failed in {}: {}", clock.year, err);
            chronicle.fault = Some(err);
        }
    }
}
