//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times; subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

pub const VOCAB: &str = r#"
relationship_types: [friend, rival, mentor, family]
tag_prefixes: [role, species, faction]
location_types: [realm, region, city, building, room]
link_kinds: [birthplace, current, visited]
link_cardinality:
  birthplace: single
  current: single
  visited: multiple
"#;

pub const CHARACTER_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "type": "object",
  "required": ["id", "profile"],
  "properties": {
    "id": { "type": "string", "pattern": "^[a-z0-9_]+$" },
    "profile": {
      "type": "object",
      "required": ["name"],
      "properties": {
        "name": { "type": ["string", "object"] },
        "aliases": { "type": "array", "items": { "type": "string" } }
      }
    },
    "tags": { "type": "array", "items": { "type": "string" } },
    "relationships": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["target_id", "type"],
        "properties": {
          "target_id": { "type": "string" },
          "type": { "type": "string" },
          "intensity": { "type": "integer", "minimum": 1, "maximum": 5 },
          "mutual": { "type": "boolean" }
        }
      }
    }
  }
}"#;

pub const LOCATION_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "type": "object",
  "required": ["id", "profile"],
  "properties": {
    "id": { "type": "string" },
    "profile": {
      "type": "object",
      "required": ["name", "type"],
      "properties": {
        "name": { "type": "string" },
        "type": { "type": "string" },
        "parent_id": { "type": ["string", "null"] }
      }
    },
    "tags": { "type": "array", "items": { "type": "string" } }
  }
}"#;

pub const MAP_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "type": "object",
  "required": ["id", "root_location_id"],
  "properties": {
    "id": { "type": "string" },
    "root_location_id": { "type": "string" },
    "include": {
      "type": "object",
      "properties": {
        "depth": { "type": "integer", "minimum": 0 },
        "types": { "type": "array", "items": { "type": "string" } }
      }
    }
  }
}"#;

pub const LINKS_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "type": "object",
  "required": ["links"],
  "properties": {
    "links": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["character_id", "location_id", "kind"],
        "properties": {
          "character_id": { "type": "string" },
          "location_id": { "type": "string" },
          "kind": { "type": "string" }
        }
      }
    }
  }
}"#;

/// A throwaway corpus on disk.
pub struct Corpus {
    dir: TempDir,
}

#[allow(dead_code)]
impl Corpus {
    /// Empty corpus with vocabulary and all four schemas in place.
    pub fn new() -> Self {
        init_logging();
        let corpus = Corpus::bare();
        corpus
            .write("schemas/vocab.yml", VOCAB)
            .write("schemas/character.schema.json", CHARACTER_SCHEMA)
            .write("schemas/location.schema.json", LOCATION_SCHEMA)
            .write("schemas/map.schema.json", MAP_SCHEMA)
            .write("schemas/links.schema.json", LINKS_SCHEMA);
        corpus
    }

    /// Empty directory, no vocabulary or schemas.
    pub fn bare() -> Self {
        Corpus {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn write(&self, rel: &str, content: &str) -> &Self {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
        self
    }

    pub fn remove(&self, rel: &str) -> &Self {
        std::fs::remove_file(self.path(rel)).unwrap();
        self
    }

    pub fn character(&self, file_id: &str, yaml: &str) -> &Self {
        self.write(&format!("characters/{file_id}.yml"), yaml)
    }

    pub fn location(&self, file_id: &str, yaml: &str) -> &Self {
        self.write(&format!("locations/{file_id}.location.yml"), yaml)
    }

    /// Location with a name, type and optional parent.
    pub fn simple_location(&self, id: &str, loc_type: &str, parent: Option<&str>) -> &Self {
        let parent = parent
            .map(|p| format!("\n  parent_id: {p}"))
            .unwrap_or_default();
        self.location(
            id,
            &format!("id: {id}\nprofile:\n  name: {id}\n  type: {loc_type}{parent}\n"),
        )
    }

    pub fn map(&self, file_id: &str, yaml: &str) -> &Self {
        self.write(&format!("maps/{file_id}.map.yml"), yaml)
    }

    pub fn links(&self, yaml: &str) -> &Self {
        self.write("links/character_locations.yml", yaml)
    }

    pub fn relations(&self, yaml: &str) -> &Self {
        self.write("relations/graph.yml", yaml)
    }
}

/// A small corpus that passes every check:
///
/// - characters `alice`, `bob`, `carol`; alice and bob declare each other friends, carol mentors
///   alice
/// - locations `world > north > frosthold > keep > hall` and `world > south > port`
/// - map `realm` rooted at `world`, links for alice and bob
#[allow(dead_code)]
pub fn standard_corpus() -> Corpus {
    let corpus = Corpus::new();
    corpus
        .character(
            "alice",
            r#"
id: alice
profile:
  name: Alice
tags: [role/hero, species/human]
relationships:
  - target_id: bob
    type: friend
    intensity: 4
    description: Childhood friends
    mutual: true
meta:
  created: '2024-01-15'
"#,
        )
        .character(
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
"#,
        )
        .character(
            "carol",
            r#"
id: carol
profile:
  name: Carol
relationships:
  - target_id: alice
    type: mentor
"#,
        )
        .character("_TEMPLATE", "id: template\n")
        .simple_location("world", "realm", None)
        .simple_location("north", "region", Some("world"))
        .simple_location("south", "region", Some("world"))
        .simple_location("frosthold", "city", Some("north"))
        .simple_location("port", "city", Some("south"))
        .simple_location("keep", "building", Some("frosthold"))
        .simple_location("hall", "room", Some("keep"))
        .map(
            "realm",
            "id: realm\nprofile:\n  name: The Realm\nroot_location_id: world\ninclude:\n  depth: 2\n",
        )
        .links(
            r#"
links:
  - character_id: alice
    location_id: frosthold
    kind: birthplace
  - character_id: alice
    location_id: keep
    kind: current
  - character_id: bob
    location_id: port
    kind: visited
  - character_id: bob
    location_id: hall
    kind: visited
"#,
        );
    corpus
}
