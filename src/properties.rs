//! Record types for the narrative corpus.
//!
//! Records are decoded leniently: optional fields are `Option<T>` or defaulted collections, and
//! unknown fields are ignored. Structural strictness is the job of the schema check, which runs
//! on the raw document separately.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::codec::decode_entries;

/// Records that declare their own id.
pub trait Identified {
    fn id(&self) -> &str;
}

/// A character's name: either a plain string or a structured mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersonName {
    Plain(String),
    Structured {
        #[serde(default)]
        display: Option<String>,
        #[serde(default)]
        full: Option<String>,
        #[serde(default)]
        romanized: Option<String>,
    },
}

impl PersonName {
    /// Display form: `display`, then `full`, for structured names.
    pub fn display(&self) -> Option<&str> {
        let name = match self {
            PersonName::Plain(name) => Some(name.as_str()),
            PersonName::Structured { display, full, .. } => {
                display.as_deref().or(full.as_deref())
            }
        };
        name.filter(|name| !name.is_empty())
    }

    pub fn romanized(&self) -> Option<&str> {
        match self {
            PersonName::Plain(_) => None,
            PersonName::Structured { romanized, .. } => romanized.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterProfile {
    pub name: Option<PersonName>,
    pub aliases: Vec<String>,
    pub age: Option<Value>,
    pub role: Option<String>,
    pub affiliation: Option<String>,
}

/// A relationship declared inline on a character. Only ever a source for edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Relationship {
    pub target_id: String,
    #[serde(rename = "type")]
    pub rel_type: Option<String>,
    pub intensity: Option<i64>,
    pub description: Option<String>,
    pub mutual: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    pub created: Option<String>,
    pub updated: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Story {
    pub role_in_narrative: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    pub id: String,
    pub profile: CharacterProfile,
    pub tags: Vec<String>,
    pub relationships: Vec<Relationship>,
    pub meta: Meta,
    pub story: Story,
    pub ai_portrayal: Option<Value>,
    pub personality: Option<Value>,
}

impl Character {
    /// Node label: display name if any, else the id.
    pub fn label(&self) -> &str {
        self.profile
            .name
            .as_ref()
            .and_then(PersonName::display)
            .unwrap_or(&self.id)
    }
}

impl Identified for Character {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationProfile {
    pub name: Option<String>,
    pub short: Option<String>,
    #[serde(rename = "type")]
    pub loc_type: Option<String>,
    pub parent_id: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub id: String,
    pub profile: LocationProfile,
    pub tags: Vec<String>,
    pub lore: Option<Value>,
}

impl Location {
    /// Parent id, with empty strings treated as absent.
    pub fn parent_id(&self) -> Option<&str> {
        self.profile.parent_id.as_deref().filter(|p| !p.is_empty())
    }

    pub fn loc_type(&self) -> Option<&str> {
        self.profile.loc_type.as_deref().filter(|t| !t.is_empty())
    }

    pub fn label(&self) -> &str {
        self.profile
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.id)
    }
}

impl Identified for Location {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Default number of containment levels below a map's root.
pub const DEFAULT_MAP_DEPTH: u32 = 3;

fn default_map_depth() -> u32 {
    DEFAULT_MAP_DEPTH
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapInclude {
    #[serde(default = "default_map_depth")]
    pub depth: u32,
    /// Location types admitted into the map. Empty admits every type.
    #[serde(default)]
    pub types: Vec<String>,
}

impl Default for MapInclude {
    fn default() -> Self {
        MapInclude {
            depth: DEFAULT_MAP_DEPTH,
            types: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapProfile {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapDef {
    pub id: String,
    pub profile: MapProfile,
    pub root_location_id: Option<String>,
    pub include: MapInclude,
    pub display: Option<Value>,
}

impl MapDef {
    pub fn root_location_id(&self) -> Option<&str> {
        self.root_location_id.as_deref().filter(|r| !r.is_empty())
    }
}

impl Identified for MapDef {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A character-location association. Extra authored fields pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub character_id: String,
    #[serde(default)]
    pub location_id: String,
    #[serde(default)]
    pub kind: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// The links document. Entries are decoded one by one: a malformed entry keeps its position as
/// an `Err` and its siblings are still checked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkSet {
    pub links: Vec<Result<Link, String>>,
}

impl LinkSet {
    pub fn from_value(value: &Value) -> Self {
        LinkSet {
            links: decode_entries(value, "links"),
        }
    }

    /// Decoded links with their position in the document.
    pub fn decoded(&self) -> impl Iterator<Item = (usize, &Link)> {
        positioned_ok(&self.links)
    }

    pub fn malformed(&self) -> impl Iterator<Item = (usize, &str)> {
        positioned_err(&self.links)
    }
}

/// An edge declared in the global override file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideEdge {
    pub a: String,
    pub b: String,
    #[serde(rename = "type")]
    pub rel_type: Option<String>,
    pub intensity: Option<i64>,
    pub summary: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationsDoc {
    pub edges: Vec<Result<OverrideEdge, String>>,
}

impl RelationsDoc {
    pub fn from_value(value: &Value) -> Self {
        RelationsDoc {
            edges: decode_entries(value, "edges"),
        }
    }

    pub fn decoded(&self) -> impl Iterator<Item = (usize, &OverrideEdge)> {
        positioned_ok(&self.edges)
    }

    pub fn malformed(&self) -> impl Iterator<Item = (usize, &str)> {
        positioned_err(&self.edges)
    }
}

fn positioned_ok<T>(entries: &[Result<T, String>]) -> impl Iterator<Item = (usize, &T)> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| entry.as_ref().ok().map(|value| (i, value)))
}

fn positioned_err<T>(entries: &[Result<T, String>]) -> impl Iterator<Item = (usize, &str)> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| entry.as_ref().err().map(|e| (i, e.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_person_name_forms() {
        let plain: Character = serde_yaml::from_str("id: alice\nprofile:\n  name: Alice\n").unwrap();
        assert_eq!(plain.label(), "Alice");

        let structured: Character = serde_yaml::from_str(
            "id: kenji\nprofile:\n  name:\n    full: Tanaka Kenji\n    romanized: Kenji\n",
        )
        .unwrap();
        assert_eq!(structured.label(), "Tanaka Kenji");
        assert_eq!(
            structured.profile.name.as_ref().unwrap().romanized(),
            Some("Kenji")
        );

        let unnamed: Character = serde_yaml::from_str("id: ghost\n").unwrap();
        assert_eq!(unnamed.label(), "ghost");
    }

    #[test]
    fn test_relationship_defaults() {
        let character: Character = serde_yaml::from_str(
            "id: alice\nrelationships:\n  - target_id: bob\n    type: friend\n",
        )
        .unwrap();
        let rel = &character.relationships[0];
        assert_eq!(rel.target_id, "bob");
        assert_eq!(rel.rel_type.as_deref(), Some("friend"));
        assert_eq!(rel.intensity, None);
        assert_eq!(rel.mutual, None);
    }

    #[test]
    fn test_map_include_defaults() {
        let map: MapDef = serde_yaml::from_str("id: realm\nroot_location_id: world\n").unwrap();
        assert_eq!(map.include.depth, DEFAULT_MAP_DEPTH);
        assert!(map.include.types.is_empty());

        let map: MapDef =
            serde_yaml::from_str("id: realm\ninclude:\n  types: [city]\n").unwrap();
        assert_eq!(map.include.depth, DEFAULT_MAP_DEPTH);
        assert_eq!(map.include.types, vec!["city".to_string()]);
    }

    #[test]
    fn test_link_extra_fields_round_trip() {
        let raw: Value = serde_yaml::from_str(
            "links:\n  - character_id: alice\n    location_id: keep\n    kind: home\n    note: since childhood\n",
        )
        .unwrap();
        let set = LinkSet::from_value(&raw);
        let (_, link) = set.decoded().next().unwrap();
        assert_eq!(link.extra["note"], "since childhood");
        let value = serde_json::to_value(link).unwrap();
        assert_eq!(value["note"], "since childhood");
        assert_eq!(value["kind"], "home");
    }

    #[test]
    fn test_malformed_entries_keep_their_position() {
        let raw: Value = serde_yaml::from_str(
            r#"
edges:
  - {a: alice, b: bob, type: friend}
  - {a: bob, b: carol, intensity: strong}
  - {a: carol, b: alice, type: rival, intensity: 2}
"#,
        )
        .unwrap();
        let doc = RelationsDoc::from_value(&raw);
        let positions: Vec<usize> = doc.decoded().map(|(i, _)| i).collect();
        assert_eq!(positions, vec![0, 2]);
        let malformed: Vec<(usize, &str)> = doc.malformed().collect();
        assert_eq!(malformed.len(), 1);
        assert_eq!(malformed[0].0, 1);
        assert!(malformed[0].1.contains("invalid type"));

        assert!(LinkSet::from_value(&Value::Null).links.is_empty());
    }

    #[test]
    fn test_location_empty_parent_is_absent() {
        let loc: Location =
            serde_yaml::from_str("id: world\nprofile:\n  parent_id: ''\n  type: realm\n").unwrap();
        assert_eq!(loc.parent_id(), None);
        assert_eq!(loc.loc_type(), Some("realm"));
    }
}
