//! Snapshot Types
//!
//! Serialization struct for the world-state boundary shared with the dynasty
//! simulation and display layers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::definition::StatValue;

/// Stat name to value
pub type StatMap = BTreeMap<String, StatValue>;

/// Point-in-time copy of the world stats
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldStateSnapshot {
    pub current_year: i32,
    #[serde(default)]
    pub regions: BTreeMap<String, StatMap>,
    #[serde(default)]
    pub factions: BTreeMap<String, StatMap>,
}

impl WorldStateSnapshot {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_parses_mixed_stats() {
        let json = r#"{
            "current_year": 1000,
            "regions": {"Central Valley": {"magical_energy": 50, "fertility": 80}},
            "factions": {"Mages' Guild": {"power": 60, "leader": "Archmage Eldrin"}}
        }"#;

        let snapshot: WorldStateSnapshot = serde_json::from_str(json).unwrap();

        assert_eq!(snapshot.current_year, 1000);
        assert_eq!(
            snapshot.regions["Central Valley"]["fertility"],
            StatValue::Number(80)
        );
        assert_eq!(
            snapshot.factions["Mages' Guild"]["leader"],
            StatValue::Text("Archmage Eldrin".into())
        );
    }

    #[test]
    fn test_snapshot_missing_maps_default_empty() {
        let snapshot: WorldStateSnapshot = serde_json::from_str(r#"{"current_year": 1}"#).unwrap();
        assert!(snapshot.regions.is_empty());
        assert!(snapshot.factions.is_empty());
    }
}
