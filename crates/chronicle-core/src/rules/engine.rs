//! Rule Engine
//!
//! Runs one simulated year of world events:
//!
//! 1. Drain delayed triggers due this year, in queue order. Each one draws a
//!    single `f64` roll; the entry is removed whether or not it fires.
//! 2. Scan categories in catalog order. A category with eligible events rolls
//!    `category_trigger_chance` (no draw at 1.0), then draws one index
//!    uniformly from its eligible set.
//! 3. A fired event applies its effects, then walks its follow-ups in order:
//!    delayed ones are queued without a draw, immediate ones roll and fire
//!    recursively without re-checking conditions.
//!
//! Follow-ups inherit the category of the event that started the chain.

use bevy_ecs::prelude::*;
use rand::Rng;
use std::sync::Arc;

use chronicle_events::{EventDefinition, TriggerOrigin, TriggeredEvent};

use super::catalog::EventCatalog;
use super::condition::{check_conditions, ConditionLibrary};
use super::effect;
use crate::components::world::{DelayedTrigger, WorldState};
use crate::config::EngineConfig;
use crate::error::EngineError;

/// Resource: the loaded catalog plus the evaluation context
#[derive(Resource, Debug, Clone)]
pub struct RuleEngine {
    catalog: Arc<EventCatalog>,
    conditions: ConditionLibrary,
    config: EngineConfig,
}

impl RuleEngine {
    pub fn new(catalog: impl Into<Arc<EventCatalog>>) -> Self {
        Self {
            catalog: catalog.into(),
            conditions: ConditionLibrary::builtin(),
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    pub fn conditions(&self) -> &ConditionLibrary {
        &self.conditions
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Processes `year` against `world` and returns the triggered events in
    /// the order they fired.
    ///
    /// Fails if `year` is earlier than the world's current year, or if a
    /// follow-up names an event the catalog does not hold.
    pub fn process<R: Rng + ?Sized>(
        &self,
        world: &mut WorldState,
        year: i32,
        rng: &mut R,
    ) -> Result<Vec<TriggeredEvent>, EngineError> {
        if year < world.year {
            return Err(EngineError::YearRegression {
                current: world.year,
                requested: year,
            });
        }
        world.year = year;
        tracing::debug!(target: "world", "Processing events for year {}", year);

        let mut triggered = Vec::new();

        for trigger in world.take_due(year) {
            let roll: f64 = rng.gen();
            if roll >= trigger.probability {
                tracing::debug!(
                    target: "events",
                    "Delayed '{}' from '{}' did not fire (roll {:.3} >= {})",
                    trigger.event_id,
                    trigger.scheduled_by,
                    roll,
                    trigger.probability
                );
                continue;
            }
            let definition = self.resolve(&trigger.event_id, &trigger.scheduled_by)?;
            let origin = TriggerOrigin::Delayed {
                parent: trigger.scheduled_by.clone(),
                scheduled_in: trigger.scheduled_in,
            };
            self.fire(definition, &trigger.category, origin, 0, world, rng, &mut triggered)?;
        }

        let chance = self.config.category_trigger_chance;
        for category in self.catalog.categories() {
            let eligible: Vec<&EventDefinition> = self
                .catalog
                .scan_candidates(category)
                .filter(|definition| check_conditions(&definition.conditions, world, &self.conditions))
                .collect();

            if eligible.is_empty() {
                continue;
            }
            if chance < 1.0 && rng.gen::<f64>() >= chance {
                tracing::debug!(target: "events", "Category '{}' stays quiet this year", category);
                continue;
            }

            let pick = eligible[rng.gen_range(0..eligible.len())];
            self.fire(pick, category, TriggerOrigin::Scan, 0, world, rng, &mut triggered)?;
        }

        Ok(triggered)
    }

    fn resolve(&self, id: &str, referenced_by: &str) -> Result<&EventDefinition, EngineError> {
        self.catalog
            .get_by_id(id)
            .ok_or_else(|| EngineError::UnknownEvent {
                id: id.to_string(),
                referenced_by: referenced_by.to_string(),
            })
    }

    #[allow(clippy::too_many_arguments)]
    fn fire<R: Rng + ?Sized>(
        &self,
        definition: &EventDefinition,
        category: &str,
        origin: TriggerOrigin,
        depth: u32,
        world: &mut WorldState,
        rng: &mut R,
        triggered: &mut Vec<TriggeredEvent>,
    ) -> Result<(), EngineError> {
        tracing::info!(target: "events", "Event triggered: {} ({})", definition.name, category);

        effect::apply_all(&definition.effects, world);
        triggered.push(TriggeredEvent::from_definition(
            definition,
            category,
            world.year,
            origin,
        ));

        for followup in &definition.followups {
            if followup.delay > 0 {
                let delay = i32::try_from(followup.delay).unwrap_or(i32::MAX);
                world.schedule(DelayedTrigger {
                    event_id: followup.id.clone(),
                    trigger_year: world.year.saturating_add(delay),
                    probability: followup.probability,
                    category: category.to_string(),
                    scheduled_by: definition.id.clone(),
                    scheduled_in: world.year,
                });
                continue;
            }

            if depth >= self.config.max_followup_depth {
                tracing::warn!(
                    target: "events",
                    "Follow-up chain through '{}' reached depth {}, dropping '{}'",
                    definition.id,
                    depth,
                    followup.id
                );
                continue;
            }
            if rng.gen::<f64>() >= followup.probability {
                continue;
            }

            let next = self.resolve(&followup.id, &definition.id)?;
            tracing::info!(target: "events", "Followup event triggered: {}", next.name);
            let origin = TriggerOrigin::Followup {
                parent: definition.id.clone(),
            };
            self.fire(next, category, origin, depth + 1, world, rng, triggered)?;
        }

        Ok(())
    }
}
