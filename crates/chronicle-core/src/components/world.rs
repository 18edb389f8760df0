//! World Components
//!
//! Region and faction stats, the current year, and the delayed-event queue.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use chronicle_events::{StatMap, StatValue, TargetKind, WorldStateSnapshot};

/// A follow-up waiting for a future year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayedTrigger {
    /// Event to resolve when due
    pub event_id: String,
    /// First year in which the trigger is resolved
    pub trigger_year: i32,
    /// Chance in `[0, 1]` that it fires once due
    pub probability: f64,
    /// Category the chain was triggered under
    pub category: String,
    /// Event whose follow-up list scheduled this trigger
    pub scheduled_by: String,
    /// Year the trigger was queued
    pub scheduled_in: i32,
}

/// Resource: stats for every region and faction plus pending follow-ups
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct WorldState {
    /// Current simulation year
    pub year: i32,
    regions: BTreeMap<String, StatMap>,
    factions: BTreeMap<String, StatMap>,
    delayed_events: Vec<DelayedTrigger>,
}

impl WorldState {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            ..Default::default()
        }
    }

    /// Builder form of [`WorldState::set_stat`]
    pub fn with_stat(
        mut self,
        kind: TargetKind,
        entity: &str,
        stat: &str,
        value: impl Into<StatValue>,
    ) -> Self {
        self.set_stat(kind, entity, stat, value.into());
        self
    }

    pub fn from_snapshot(snapshot: WorldStateSnapshot) -> Self {
        Self {
            year: snapshot.current_year,
            regions: snapshot.regions,
            factions: snapshot.factions,
            delayed_events: Vec::new(),
        }
    }

    /// Copy of the stat maps at the current year (the queue is not included)
    pub fn snapshot(&self) -> WorldStateSnapshot {
        WorldStateSnapshot {
            current_year: self.year,
            regions: self.regions.clone(),
            factions: self.factions.clone(),
        }
    }

    pub fn regions(&self) -> &BTreeMap<String, StatMap> {
        &self.regions
    }

    pub fn factions(&self) -> &BTreeMap<String, StatMap> {
        &self.factions
    }

    pub fn entities(&self, kind: TargetKind) -> &BTreeMap<String, StatMap> {
        match kind {
            TargetKind::Region => &self.regions,
            TargetKind::Faction => &self.factions,
        }
    }

    fn entities_mut(&mut self, kind: TargetKind) -> &mut BTreeMap<String, StatMap> {
        match kind {
            TargetKind::Region => &mut self.regions,
            TargetKind::Faction => &mut self.factions,
        }
    }

    pub fn entity(&self, kind: TargetKind, name: &str) -> Option<&StatMap> {
        self.entities(kind).get(name)
    }

    /// Raw stat lookup; `None` when the entity or the stat is absent
    pub fn stat(&self, kind: TargetKind, entity: &str, stat: &str) -> Option<&StatValue> {
        self.entity(kind, entity).and_then(|stats| stats.get(stat))
    }

    /// Numeric stat lookup where an absent stat reads as 0.
    ///
    /// String stats also read as 0.
    pub fn numeric_stat(&self, kind: TargetKind, entity: &str, stat: &str) -> i64 {
        self.stat(kind, entity, stat)
            .and_then(StatValue::as_number)
            .unwrap_or(0)
    }

    /// Sets a stat, creating the region or faction entry if needed.
    ///
    /// Returns the previous value.
    pub fn set_stat(
        &mut self,
        kind: TargetKind,
        entity: &str,
        stat: &str,
        value: StatValue,
    ) -> Option<StatValue> {
        self.entities_mut(kind)
            .entry(entity.to_string())
            .or_default()
            .insert(stat.to_string(), value)
    }

    pub fn delayed_events(&self) -> &[DelayedTrigger] {
        &self.delayed_events
    }

    /// Queues a delayed trigger. Triggers set before the current year are
    /// moved up to it.
    pub fn schedule(&mut self, mut trigger: DelayedTrigger) {
        if trigger.trigger_year < self.year {
            tracing::warn!(
                target: "world",
                "Trigger for '{}' set for past year {}, moving to {}",
                trigger.event_id,
                trigger.trigger_year,
                self.year
            );
            trigger.trigger_year = self.year;
        }
        self.delayed_events.push(trigger);
    }

    /// Removes and returns every trigger due by `year`, in queue order
    pub fn take_due(&mut self, year: i32) -> Vec<DelayedTrigger> {
        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.delayed_events)
            .into_iter()
            .partition(|trigger| trigger.trigger_year <= year);
        self.delayed_events = pending;
        due
    }
}
