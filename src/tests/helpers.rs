//! Shared test utilities for validator and graph testing

use crate::{
    codec::{RecordKind, SchemaCheck},
    properties::{Character, LinkSet, Location, MapDef, RelationsDoc},
    store::{RecordStore, SourceRecord},
    vocab::Vocabulary,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::PathBuf;

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

pub const TEST_VOCAB: &str = r#"
relationship_types: [friend, rival, mentor, family]
tag_prefixes: [role, species, faction, era]
location_types: [realm, region, city, building, room]
link_kinds: [birthplace, current, visited]
link_cardinality:
  birthplace: single
  current: single
  visited: multiple
"#;

pub fn test_vocab() -> Vocabulary {
    Vocabulary::parse(TEST_VOCAB).unwrap()
}

/// Schema stand-in that accepts every instance.
pub struct AcceptAll;

impl SchemaCheck for AcceptAll {
    fn check(&self, _kind: RecordKind, _instance: &Value) -> Vec<String> {
        Vec::new()
    }
}

/// Schema stand-in that requires a non-empty `profile` mapping on every record.
pub struct RequireProfile;

impl SchemaCheck for RequireProfile {
    fn check(&self, kind: RecordKind, instance: &Value) -> Vec<String> {
        if kind == RecordKind::Links {
            return Vec::new();
        }
        match instance.get("profile") {
            Some(Value::Object(map)) if !map.is_empty() => Vec::new(),
            _ => vec!["'profile' is a required property".to_string()],
        }
    }
}

fn record<T: DeserializeOwned>(scope: String, file_id: &str, yaml: &str) -> SourceRecord<T> {
    let raw: Value = serde_yaml::from_str(yaml).unwrap();
    SourceRecord::from_value(PathBuf::from(&scope), scope, file_id.to_string(), raw).unwrap()
}

/// Character record as if read from `characters/<file_id>.yml`.
pub fn character(file_id: &str, yaml: &str) -> SourceRecord<Character> {
    record(format!("characters/{file_id}.yml"), file_id, yaml)
}

/// Location record as if read from `locations/<file_id>.location.yml`.
pub fn location(file_id: &str, yaml: &str) -> SourceRecord<Location> {
    record(format!("locations/{file_id}.location.yml"), file_id, yaml)
}

/// Minimal location with a type and an optional parent.
pub fn simple_location(id: &str, loc_type: &str, parent: Option<&str>) -> SourceRecord<Location> {
    let parent = parent
        .map(|p| format!("\n  parent_id: {p}"))
        .unwrap_or_default();
    location(
        id,
        &format!("id: {id}\nprofile:\n  name: {id}\n  type: {loc_type}{parent}\n"),
    )
}

/// Map record as if read from `maps/<file_id>.map.yml`.
pub fn map_def(file_id: &str, yaml: &str) -> SourceRecord<MapDef> {
    record(format!("maps/{file_id}.map.yml"), file_id, yaml)
}

pub fn link_set(yaml: &str) -> SourceRecord<LinkSet> {
    let scope = "links/character_locations.yml".to_string();
    let raw: Value = serde_yaml::from_str(yaml).unwrap();
    let record = LinkSet::from_value(&raw);
    SourceRecord::new(PathBuf::from(&scope), scope.clone(), scope, raw, record)
}

pub fn relations(yaml: &str) -> SourceRecord<RelationsDoc> {
    let scope = "relations/graph.yml".to_string();
    let raw: Value = serde_yaml::from_str(yaml).unwrap();
    let record = RelationsDoc::from_value(&raw);
    SourceRecord::new(PathBuf::from(&scope), scope.clone(), scope, raw, record)
}

/// Store holding two characters, `alice` and `bob`, who declare each other friends.
pub fn create_friends_store() -> RecordStore {
    init_logging();
    let mut store = RecordStore::default();
    store.push_character(character(
        "alice",
        r#"
id: alice
profile:
  name: Alice
tags: [role/hero]
relationships:
  - target_id: bob
    type: friend
    intensity: 4
    description: Childhood friends
    mutual: true
"#,
    ));
    store.push_character(character(
        "bob",
        r#"
id: bob
profile:
  name:
    display: Bob
    romanized: Bobu
tags: [role/sidekick]
relationships:
  - target_id: alice
    type: friend
    intensity: 2
    description: Looks up to Alice
"#,
    ));
    store
}

/// Store with a small containment tree:
///
/// ```text
/// world (realm)
/// ├── north (region)
/// │   └── frosthold (city)
/// │       └── keep (building)
/// │           └── hall (room)
/// └── south (region)
///     └── port (city)
/// ```
pub fn create_realm_store() -> RecordStore {
    init_logging();
    let mut store = RecordStore::default();
    for (id, loc_type, parent) in [
        ("world", "realm", None),
        ("north", "region", Some("world")),
        ("south", "region", Some("world")),
        ("frosthold", "city", Some("north")),
        ("port", "city", Some("south")),
        ("keep", "building", Some("frosthold")),
        ("hall", "room", Some("keep")),
    ] {
        store.push_location(simple_location(id, loc_type, parent));
    }
    store
}
