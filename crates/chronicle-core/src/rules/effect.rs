//! Effect Application
//!
//! `modify_stat` is always a relative delta clamped to the stat bounds.
//! Absolute assignment exists only as `change_leader`.

use chronicle_events::{Effect, StatValue, Target, TargetKind};

use crate::components::world::WorldState;

/// Lowest value a numeric stat can take after an effect
pub const STAT_FLOOR: i64 = 0;
/// Highest value a numeric stat can take after an effect
pub const STAT_CEILING: i64 = 100;

/// What an applied effect did to the world
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatChange {
    Modified {
        target: Target,
        stat: String,
        before: i64,
        after: i64,
    },
    LeaderChanged {
        faction: String,
        previous: Option<String>,
        leader: String,
    },
    /// Unknown effect type, or a delta aimed at a text stat
    Unchanged,
}

/// Clamps a stat to `[STAT_FLOOR, STAT_CEILING]`
pub fn clamp_stat(value: i64) -> i64 {
    value.clamp(STAT_FLOOR, STAT_CEILING)
}

/// Applies one effect, creating the target region or faction if needed
pub fn apply(effect: &Effect, world: &mut WorldState) -> StatChange {
    match effect {
        Effect::ModifyStat {
            target,
            stat,
            value,
        } => modify_stat(world, target, stat, *value),
        Effect::ChangeLeader {
            faction,
            new_leader,
        } => {
            let previous = world.set_stat(
                TargetKind::Faction,
                faction,
                "leader",
                StatValue::Text(new_leader.clone()),
            );
            tracing::debug!(target: "world", "{} is now led by {}", faction, new_leader);
            StatChange::LeaderChanged {
                faction: faction.clone(),
                previous: previous.and_then(|value| value.as_text().map(str::to_string)),
                leader: new_leader.clone(),
            }
        }
        Effect::Unknown { kind } => {
            tracing::debug!(target: "events", "Skipping unknown effect type '{}'", kind);
            StatChange::Unchanged
        }
    }
}

/// Applies effects in declaration order
pub fn apply_all(effects: &[Effect], world: &mut WorldState) -> Vec<StatChange> {
    effects.iter().map(|effect| apply(effect, world)).collect()
}

fn modify_stat(world: &mut WorldState, target: &Target, stat: &str, delta: i64) -> StatChange {
    let kind = target.kind();
    let name = target.name();

    let before = match world.stat(kind, name, stat) {
        None => 0,
        Some(StatValue::Number(n)) => *n,
        Some(StatValue::Text(_)) => {
            tracing::warn!(
                target: "world",
                "Cannot add {} to text stat {}.{}",
                delta,
                name,
                stat
            );
            return StatChange::Unchanged;
        }
    };

    let after = clamp_stat(before.saturating_add(delta));
    world.set_stat(kind, name, stat, StatValue::Number(after));
    tracing::trace!(target: "world", "{}.{}: {} -> {}", name, stat, before, after);

    StatChange::Modified {
        target: target.clone(),
        stat: stat.to_string(),
        before,
        after,
    }
}
