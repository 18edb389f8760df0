//! Event Catalog
//!
//! Loads the world-event rule table from JSON, validates it, and exposes
//! read-only lookup by id and by category.
//!
//! Document shape: `{"events": {category: {id: event}}}`. Categories keep
//! their document order. Follow-up references are resolved after the whole
//! document is read, so forward and cross-category references are legal.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use chronicle_events::{
    Condition, Effect, EventDefinition, EventMetadata, FollowupSpec, Operator, StatValue, Target,
};

use crate::error::CatalogError;

/// Probability used when a follow-up omits one
pub const DEFAULT_FOLLOWUP_PROBABILITY: f64 = 0.5;

#[derive(Debug, Clone)]
struct Category {
    name: String,
    events: Vec<EventDefinition>,
}

/// Immutable, validated set of event definitions
#[derive(Debug, Clone, Default)]
pub struct EventCatalog {
    categories: Vec<Category>,
    /// id -> (category index, event index)
    index: HashMap<String, (usize, usize)>,
}

impl EventCatalog {
    /// Reads and validates a catalog file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_str(&content)?;
        tracing::info!(
            target: "events",
            "Loaded {} events in {} categories from {}",
            catalog.len(),
            catalog.categories.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Parses and validates a catalog document
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Validates an already-parsed catalog document
    pub fn from_value(value: Value) -> Result<Self, CatalogError> {
        let Value::Object(mut root) = value else {
            return Err(CatalogError::schema("$", "catalog must be a JSON object"));
        };
        let Some(events) = root.remove("events") else {
            return Err(CatalogError::schema("$", "missing top-level 'events' object"));
        };
        let Value::Object(categories) = events else {
            return Err(CatalogError::schema("events", "'events' must be an object of categories"));
        };

        let mut catalog = EventCatalog::default();

        for (category_name, category_events) in categories {
            let category_path = format!("events.{}", category_name);
            let Value::Object(category_events) = category_events else {
                return Err(CatalogError::schema(
                    category_path,
                    "category must be an object of events",
                ));
            };

            let category_index = catalog.categories.len();
            let mut definitions = Vec::with_capacity(category_events.len());

            for (id, raw) in category_events {
                let path = format!("{}.{}", category_path, id);
                let definition = parse_event(&path, &id, &category_name, raw)?;

                if let Some(&(first, _)) = catalog.index.get(&id) {
                    return Err(CatalogError::DuplicateId {
                        id,
                        first: catalog.categories[first].name.clone(),
                        second: category_name,
                    });
                }
                catalog
                    .index
                    .insert(id, (category_index, definitions.len()));
                definitions.push(definition);
            }

            catalog.categories.push(Category {
                name: category_name,
                events: definitions,
            });
        }

        catalog.check_followups()?;
        Ok(catalog)
    }

    fn check_followups(&self) -> Result<(), CatalogError> {
        for definition in self.iter() {
            for followup in &definition.followups {
                if !self.index.contains_key(&followup.id) {
                    return Err(CatalogError::DanglingFollowup {
                        event: definition.id.clone(),
                        followup: followup.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Looks up a definition in any category
    pub fn get_by_id(&self, id: &str) -> Option<&EventDefinition> {
        let &(category, event) = self.index.get(id)?;
        self.categories.get(category)?.events.get(event)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Every definition in a category, in document order. Unknown categories
    /// yield nothing.
    pub fn all_in_category<'a>(
        &'a self,
        category: &str,
    ) -> impl Iterator<Item = (&'a str, &'a EventDefinition)> + 'a {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .into_iter()
            .flat_map(|c| c.events.iter().map(|e| (e.id.as_str(), e)))
    }

    /// Definitions a yearly scan may pick from (follow-up-only events excluded)
    pub fn scan_candidates<'a>(
        &'a self,
        category: &str,
    ) -> impl Iterator<Item = &'a EventDefinition> + 'a {
        self.all_in_category(category)
            .map(|(_, definition)| definition)
            .filter(|definition| !definition.is_followup)
    }

    /// Category names in document order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// All definitions, category by category
    pub fn iter(&self) -> impl Iterator<Item = &EventDefinition> {
        self.categories.iter().flat_map(|c| c.events.iter())
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

// Raw document records. Every field is optional so that missing fields are
// reported as schema errors with a path instead of serde messages.

#[derive(Debug, Deserialize)]
struct RawEvent {
    id: Option<String>,
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    conditions: Option<Vec<Value>>,
    effects: Option<Vec<Value>>,
    #[serde(default)]
    followup_events: Vec<Value>,
    #[serde(default)]
    is_followup: bool,
    #[serde(flatten)]
    metadata: EventMetadata,
}

#[derive(Debug, Deserialize)]
struct RawCondition {
    #[serde(rename = "type")]
    kind: Option<String>,
    operator: Option<String>,
    value: Option<Value>,
    region: Option<String>,
    faction: Option<String>,
    stat: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEffect {
    #[serde(rename = "type")]
    kind: Option<String>,
    region: Option<String>,
    faction: Option<String>,
    stat: Option<String>,
    value: Option<Value>,
    new_leader: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFollowup {
    id: Option<String>,
    delay: Option<i64>,
    probability: Option<f64>,
}

fn decode<T: for<'de> Deserialize<'de>>(path: &str, value: Value) -> Result<T, CatalogError> {
    if !value.is_object() {
        return Err(CatalogError::schema(path, "expected an object"));
    }
    serde_json::from_value(value).map_err(|e| CatalogError::schema(path, e.to_string()))
}

fn required<T>(path: &str, field: &str, value: Option<T>) -> Result<T, CatalogError> {
    value.ok_or_else(|| CatalogError::schema(path, format!("missing required field '{}'", field)))
}

fn parse_event(
    path: &str,
    id: &str,
    category: &str,
    raw: Value,
) -> Result<EventDefinition, CatalogError> {
    let raw: RawEvent = decode(path, raw)?;

    if let Some(declared) = &raw.id {
        if declared != id {
            return Err(CatalogError::schema(
                path,
                format!("declared id '{}' does not match key '{}'", declared, id),
            ));
        }
    }

    let name = required(path, "name", raw.name)?;

    let conditions = match raw.conditions {
        Some(conditions) => conditions,
        None if raw.is_followup => Vec::new(),
        None => return Err(CatalogError::schema(path, "missing required field 'conditions'")),
    };
    if conditions.is_empty() && !raw.is_followup {
        return Err(CatalogError::schema(
            path,
            "scanned events need at least one condition",
        ));
    }
    let conditions = conditions
        .into_iter()
        .enumerate()
        .map(|(i, c)| parse_condition(&format!("{}.conditions[{}]", path, i), c))
        .collect::<Result<Vec<_>, _>>()?;

    let effects = required(path, "effects", raw.effects)?
        .into_iter()
        .enumerate()
        .map(|(i, e)| parse_effect(&format!("{}.effects[{}]", path, i), e))
        .collect::<Result<Vec<_>, _>>()?;

    let followups = raw
        .followup_events
        .into_iter()
        .enumerate()
        .map(|(i, f)| parse_followup(&format!("{}.followup_events[{}]", path, i), f))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(EventDefinition {
        id: id.to_string(),
        name,
        description: raw.description.unwrap_or_default(),
        category: category.to_string(),
        conditions,
        effects,
        followups,
        is_followup: raw.is_followup,
        metadata: raw.metadata,
    })
}

fn parse_operator(path: &str, operator: Option<String>) -> Result<Operator, CatalogError> {
    let symbol = required(path, "operator", operator)?;
    Operator::from_symbol(&symbol)
        .ok_or_else(|| CatalogError::schema(path, format!("unknown operator '{}'", symbol)))
}

fn parse_integer(path: &str, field: &str, value: Option<Value>) -> Result<i64, CatalogError> {
    required(path, field, value)?
        .as_i64()
        .ok_or_else(|| CatalogError::schema(path, format!("'{}' must be an integer", field)))
}

fn parse_stat_value(path: &str, value: Option<Value>) -> Result<StatValue, CatalogError> {
    match required(path, "value", value)? {
        Value::String(text) => Ok(StatValue::Text(text)),
        other => other
            .as_i64()
            .map(StatValue::Number)
            .ok_or_else(|| CatalogError::schema(path, "'value' must be an integer or a string")),
    }
}

fn parse_condition(path: &str, raw: Value) -> Result<Condition, CatalogError> {
    let raw: RawCondition = decode(path, raw)?;
    let kind = required(path, "type", raw.kind)?;

    match kind.as_str() {
        "year" => Ok(Condition::Year {
            operator: parse_operator(path, raw.operator)?,
            value: parse_integer(path, "value", raw.value)?,
        }),
        "region" => Ok(Condition::Region {
            region: required(path, "region", raw.region)?,
            stat: required(path, "stat", raw.stat)?,
            operator: parse_operator(path, raw.operator)?,
            value: parse_stat_value(path, raw.value)?,
        }),
        "faction" => Ok(Condition::Faction {
            faction: required(path, "faction", raw.faction)?,
            stat: required(path, "stat", raw.stat)?,
            operator: parse_operator(path, raw.operator)?,
            value: parse_stat_value(path, raw.value)?,
        }),
        "common" => match required(path, "value", raw.value)? {
            Value::String(name) => Ok(Condition::Common { value: name }),
            _ => Err(CatalogError::schema(path, "common condition 'value' must be a name")),
        },
        _ => {
            tracing::warn!(
                target: "events",
                "{}: unknown condition type '{}' will never hold",
                path,
                kind
            );
            Ok(Condition::Unknown { kind })
        }
    }
}

fn parse_effect(path: &str, raw: Value) -> Result<Effect, CatalogError> {
    let raw: RawEffect = decode(path, raw)?;
    let kind = required(path, "type", raw.kind)?;

    match kind.as_str() {
        "modify_stat" => {
            let target = match (raw.region, raw.faction) {
                (Some(region), None) => Target::Region(region),
                (None, Some(faction)) => Target::Faction(faction),
                (Some(_), Some(_)) => {
                    return Err(CatalogError::schema(
                        path,
                        "modify_stat names both a region and a faction",
                    ))
                }
                (None, None) => {
                    return Err(CatalogError::schema(
                        path,
                        "modify_stat needs a 'region' or a 'faction'",
                    ))
                }
            };
            Ok(Effect::ModifyStat {
                target,
                stat: required(path, "stat", raw.stat)?,
                value: parse_integer(path, "value", raw.value)?,
            })
        }
        "change_leader" => Ok(Effect::ChangeLeader {
            faction: required(path, "faction", raw.faction)?,
            new_leader: required(path, "new_leader", raw.new_leader)?,
        }),
        _ => {
            tracing::warn!(
                target: "events",
                "{}: unknown effect type '{}' will be ignored",
                path,
                kind
            );
            Ok(Effect::Unknown { kind })
        }
    }
}

fn parse_followup(path: &str, raw: Value) -> Result<FollowupSpec, CatalogError> {
    let raw: RawFollowup = decode(path, raw)?;
    let id = required(path, "id", raw.id)?;

    let delay = raw.delay.unwrap_or(0);
    let delay = u32::try_from(delay)
        .map_err(|_| CatalogError::schema(path, format!("delay must be >= 0, got {}", delay)))?;

    let probability = raw.probability.unwrap_or(DEFAULT_FOLLOWUP_PROBABILITY);
    if !(0.0..=1.0).contains(&probability) {
        return Err(CatalogError::schema(
            path,
            format!("probability must be within [0, 1], got {}", probability),
        ));
    }

    Ok(FollowupSpec {
        id,
        delay,
        probability,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn earthquake() -> Value {
        json!({
            "name": "Earthquake",
            "description": "The ground splits open",
            "severity": "major",
            "conditions": [
                {"type": "region", "region": "Southern Plains", "stat": "magical_energy", "operator": ">=", "value": 50}
            ],
            "effects": [
                {"type": "modify_stat", "region": "Southern Plains", "stat": "fertility", "value": -20}
            ]
        })
    }

    fn catalog_with(event: Value) -> Result<EventCatalog, CatalogError> {
        EventCatalog::from_value(json!({"events": {"natural": {"earthquake": event}}}))
    }

    fn schema_reason(result: Result<EventCatalog, CatalogError>) -> String {
        match result {
            Err(CatalogError::Schema { reason, .. }) => reason,
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_single_event() {
        let catalog = catalog_with(earthquake()).unwrap();
        let event = catalog.get_by_id("earthquake").unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(event.name, "Earthquake");
        assert_eq!(event.category, "natural");
        assert_eq!(event.metadata.severity.as_deref(), Some("major"));
        assert_eq!(
            event.effects,
            vec![Effect::modify_stat(Target::region("Southern Plains"), "fertility", -20)]
        );
        assert!(catalog.get_by_id("flood").is_none());
    }

    #[test]
    fn test_malformed_json() {
        let result = EventCatalog::from_str("{\"events\": {");
        assert!(matches!(result, Err(CatalogError::Malformed(_))));
    }

    #[test]
    fn test_missing_events_object() {
        assert!(matches!(
            EventCatalog::from_value(json!({"categories": {}})),
            Err(CatalogError::Schema { .. })
        ));
        assert!(matches!(
            EventCatalog::from_value(json!([1, 2, 3])),
            Err(CatalogError::Schema { .. })
        ));
        assert!(matches!(
            EventCatalog::from_value(json!({"events": {"natural": []}})),
            Err(CatalogError::Schema { .. })
        ));
    }

    #[test]
    fn test_missing_name() {
        let mut event = earthquake();
        event.as_object_mut().unwrap().remove("name");
        assert!(schema_reason(catalog_with(event)).contains("'name'"));
    }

    #[test]
    fn test_missing_effects() {
        let mut event = earthquake();
        event.as_object_mut().unwrap().remove("effects");
        assert!(schema_reason(catalog_with(event)).contains("'effects'"));
    }

    #[test]
    fn test_empty_effects_allowed() {
        let mut event = earthquake();
        event["effects"] = json!([]);
        assert!(catalog_with(event).is_ok());
    }

    #[test]
    fn test_conditions_required_unless_followup() {
        let mut event = earthquake();
        event.as_object_mut().unwrap().remove("conditions");
        assert!(schema_reason(catalog_with(event.clone())).contains("'conditions'"));

        event["is_followup"] = json!(true);
        let catalog = catalog_with(event).unwrap();
        assert!(catalog.get_by_id("earthquake").unwrap().conditions.is_empty());
        assert_eq!(catalog.scan_candidates("natural").count(), 0);
    }

    #[test]
    fn test_empty_conditions_rejected_for_scanned_event() {
        let mut event = earthquake();
        event["conditions"] = json!([]);
        assert!(matches!(catalog_with(event), Err(CatalogError::Schema { .. })));
    }

    #[test]
    fn test_condition_missing_operator() {
        let mut event = earthquake();
        event["conditions"] = json!([{"type": "year", "value": 1000}]);
        assert!(schema_reason(catalog_with(event)).contains("'operator'"));
    }

    #[test]
    fn test_condition_missing_type() {
        let mut event = earthquake();
        event["conditions"] = json!([{"operator": ">=", "value": 1000}]);
        assert!(schema_reason(catalog_with(event)).contains("'type'"));
    }

    #[test]
    fn test_unknown_operator_rejected() {
        let mut event = earthquake();
        event["conditions"] = json!([{"type": "year", "operator": "=>", "value": 1000}]);
        assert!(schema_reason(catalog_with(event)).contains("unknown operator"));
    }

    #[test]
    fn test_region_condition_missing_stat() {
        let mut event = earthquake();
        event["conditions"] = json!([{"type": "region", "region": "Central Valley", "operator": ">=", "value": 10}]);
        assert!(schema_reason(catalog_with(event)).contains("'stat'"));
    }

    #[test]
    fn test_string_condition_value() {
        let mut event = earthquake();
        event["conditions"] = json!([
            {"type": "faction", "faction": "Mages' Guild", "stat": "leader", "operator": "!=", "value": "Archmage Eldrin"}
        ]);
        let catalog = catalog_with(event).unwrap();
        assert_eq!(
            catalog.get_by_id("earthquake").unwrap().conditions[0],
            Condition::faction_stat("Mages' Guild", "leader", Operator::Ne, "Archmage Eldrin")
        );
    }

    #[test]
    fn test_effect_missing_target() {
        let mut event = earthquake();
        event["effects"] = json!([{"type": "modify_stat", "stat": "fertility", "value": -20}]);
        assert!(matches!(catalog_with(event), Err(CatalogError::Schema { .. })));
    }

    #[test]
    fn test_effect_with_both_targets_rejected() {
        let mut event = earthquake();
        event["effects"] = json!([
            {"type": "modify_stat", "region": "Southern Plains", "faction": "Noble Houses", "stat": "fertility", "value": -20}
        ]);
        assert!(schema_reason(catalog_with(event)).contains("both"));
    }

    #[test]
    fn test_effect_value_must_be_integer() {
        let mut event = earthquake();
        event["effects"] = json!([
            {"type": "modify_stat", "region": "Southern Plains", "stat": "fertility", "value": "lots"}
        ]);
        assert!(schema_reason(catalog_with(event)).contains("integer"));
    }

    #[test]
    fn test_unknown_types_degrade() {
        let mut event = earthquake();
        event["conditions"] = json!([{"type": "season", "value": "winter"}]);
        event["effects"] = json!([{"type": "trigger_event", "id": "flood"}]);

        let catalog = catalog_with(event).unwrap();
        let definition = catalog.get_by_id("earthquake").unwrap();
        assert_eq!(definition.conditions, vec![Condition::Unknown { kind: "season".into() }]);
        assert_eq!(definition.effects, vec![Effect::Unknown { kind: "trigger_event".into() }]);
    }

    #[test]
    fn test_declared_id_must_match_key() {
        let mut event = earthquake();
        event["id"] = json!("earthquake");
        assert!(catalog_with(event.clone()).is_ok());

        event["id"] = json!("tremor");
        assert!(schema_reason(catalog_with(event)).contains("does not match"));
    }

    #[test]
    fn test_dangling_followup() {
        let mut event = earthquake();
        event["followup_events"] = json!([{"id": "aftershock", "delay": 1}]);

        match catalog_with(event) {
            Err(CatalogError::DanglingFollowup { event, followup }) => {
                assert_eq!(event, "earthquake");
                assert_eq!(followup, "aftershock");
            }
            other => panic!("expected dangling follow-up, got {:?}", other),
        }
    }

    #[test]
    fn test_forward_and_cross_category_followups() {
        let mut quake = earthquake();
        quake["followup_events"] = json!([{"id": "refugee_crisis"}]);

        let catalog = EventCatalog::from_value(json!({
            "events": {
                "natural": {"earthquake": quake},
                "political": {
                    "refugee_crisis": {
                        "name": "Refugee Crisis",
                        "is_followup": true,
                        "effects": [{"type": "modify_stat", "faction": "Noble Houses", "stat": "stability", "value": -10}]
                    }
                }
            }
        }))
        .unwrap();

        let followup = &catalog.get_by_id("earthquake").unwrap().followups[0];
        assert_eq!(followup.delay, 0);
        assert_eq!(followup.probability, DEFAULT_FOLLOWUP_PROBABILITY);
        assert_eq!(catalog.get_by_id("refugee_crisis").unwrap().category, "political");
    }

    #[test]
    fn test_followup_bounds() {
        let mut event = earthquake();
        event["followup_events"] = json!([{"id": "earthquake", "delay": -1}]);
        assert!(schema_reason(catalog_with(event.clone())).contains("delay"));

        event["followup_events"] = json!([{"id": "earthquake", "probability": 1.5}]);
        assert!(schema_reason(catalog_with(event)).contains("probability"));
    }

    #[test]
    fn test_duplicate_id_across_categories() {
        let result = EventCatalog::from_value(json!({
            "events": {
                "natural": {"earthquake": earthquake()},
                "magical": {"earthquake": earthquake()}
            }
        }));

        match result {
            Err(CatalogError::DuplicateId { id, first, second }) => {
                assert_eq!(id, "earthquake");
                assert_eq!(first, "natural");
                assert_eq!(second, "magical");
            }
            other => panic!("expected duplicate id, got {:?}", other),
        }
    }

    #[test]
    fn test_categories_keep_document_order() {
        let catalog = EventCatalog::from_str(
            r#"{"events": {
                "political": {},
                "natural": {},
                "magical": {}
            }}"#,
        )
        .unwrap();

        let categories: Vec<&str> = catalog.categories().collect();
        assert_eq!(categories, vec!["political", "natural", "magical"]);
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_all_in_category() {
        let mut flood = earthquake();
        flood["name"] = json!("Flood");
        let catalog = EventCatalog::from_value(json!({
            "events": {"natural": {"earthquake": earthquake(), "flood": flood}}
        }))
        .unwrap();

        let ids: Vec<&str> = catalog.all_in_category("natural").map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["earthquake", "flood"]);
        assert_eq!(catalog.all_in_category("magical").count(), 0);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let document = json!({"events": {"natural": {"earthquake": earthquake()}}});
        write!(file, "{}", document).unwrap();

        let catalog = EventCatalog::load(file.path()).unwrap();
        assert!(catalog.contains("earthquake"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = EventCatalog::load("/nonexistent/event_definitions.json");
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }
}
