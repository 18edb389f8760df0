//! Condition Evaluation
//!
//! Pure predicates over [`WorldState`]. Unknown condition types and
//! unresolvable library names evaluate to false; absent stats read as 0.

use std::collections::BTreeMap;

use chronicle_events::{Condition, Operator, StatValue, TargetKind};

use crate::components::world::WorldState;

/// Named, reusable conditions referenced by `{"type": "common"}`
#[derive(Debug, Clone)]
pub struct ConditionLibrary {
    entries: BTreeMap<String, Condition>,
}

impl ConditionLibrary {
    /// The fixed set shipped with the engine
    pub fn builtin() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            "realm_in_crisis".to_string(),
            Condition::faction_stat("Noble Houses", "stability", Operator::Le, 30),
        );
        entries.insert(
            "magical_instability".to_string(),
            Condition::region_stat("Central Valley", "magical_energy", Operator::Ge, 80),
        );
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&Condition> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Default for ConditionLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Evaluates a single condition
pub fn evaluate(condition: &Condition, world: &WorldState, library: &ConditionLibrary) -> bool {
    match condition {
        Condition::Year { operator, value } => operator.compare(&i64::from(world.year), value),
        Condition::Region {
            region,
            stat,
            operator,
            value,
        } => compare_stat(world.stat(TargetKind::Region, region, stat), *operator, value),
        Condition::Faction {
            faction,
            stat,
            operator,
            value,
        } => compare_stat(world.stat(TargetKind::Faction, faction, stat), *operator, value),
        Condition::Common { value } => match library.get(value) {
            Some(inner) => evaluate(inner, world, library),
            None => {
                tracing::debug!(target: "events", "Unknown common condition '{}'", value);
                false
            }
        },
        Condition::Unknown { kind } => {
            tracing::trace!(target: "events", "Condition type '{}' evaluates false", kind);
            false
        }
    }
}

/// Conjunction of all conditions; an empty list holds
pub fn check_conditions(
    conditions: &[Condition],
    world: &WorldState,
    library: &ConditionLibrary,
) -> bool {
    conditions
        .iter()
        .all(|condition| evaluate(condition, world, library))
}

fn compare_stat(actual: Option<&StatValue>, operator: Operator, expected: &StatValue) -> bool {
    let zero = StatValue::Number(0);
    match (actual.unwrap_or(&zero), expected) {
        (StatValue::Number(lhs), StatValue::Number(rhs)) => operator.compare(lhs, rhs),
        (StatValue::Text(lhs), StatValue::Text(rhs)) => operator.compare(lhs.as_str(), rhs.as_str()),
        // Mixed types are only ever unequal
        _ => operator == Operator::Ne,
    }
}
