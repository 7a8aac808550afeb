//! Site data: the denormalized projection of the corpus consumed by the presentation layer.
//!
//! [`SiteData`] is a pure function of the [`RecordStore`] snapshot. [`OutputWriter`] turns it into
//! pretty-printed JSON files in the output directory.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::LoreError,
    graph::{Hierarchy, LocationGraph, RelationGraph},
    properties::{Character, Link, Location, MapDef, MapInclude, PersonName},
    store::RecordStore,
};

pub const CHARACTERS_FILE: &str = "characters.json";
pub const GRAPH_FILE: &str = "graph.json";
pub const LOCATIONS_FILE: &str = "locations.json";
pub const MAPS_FILE: &str = "maps.json";
pub const LINKS_FILE: &str = "character_locations.json";

const SPECIES_PREFIX: &str = "species/";

/// `location_graph_<map-id>.json`
pub fn location_graph_file(map_id: &str) -> String {
    format!("location_graph_{map_id}.json")
}

/// Index/detail view of a character.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterSummary {
    pub id: String,
    pub name_display: String,
    pub name_romanized: String,
    pub aliases: Vec<String>,
    pub tags: Vec<String>,
    pub role_in_story: String,
    pub ai_summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliation_primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality_summary: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

impl From<&Character> for CharacterSummary {
    fn from(character: &Character) -> Self {
        let name = character.profile.name.as_ref();
        let ai_summary = match character
            .ai_portrayal
            .as_ref()
            .and_then(|p| p.get("guidelines"))
        {
            Some(Value::Array(guidelines)) => guidelines.first().map(value_text),
            Some(Value::Null) | None => None,
            Some(other) => Some(value_text(other)),
        };
        let personality_summary = match &character.personality {
            None => Some(String::new()),
            Some(Value::Object(map)) => Some(map.get("summary").map(value_text).unwrap_or_default()),
            Some(_) => None,
        };

        CharacterSummary {
            id: character.id.clone(),
            name_display: name
                .and_then(PersonName::display)
                .unwrap_or_default()
                .to_string(),
            name_romanized: name
                .and_then(PersonName::romanized)
                .unwrap_or_default()
                .to_string(),
            aliases: character.profile.aliases.clone(),
            tags: character.tags.clone(),
            role_in_story: character.story.role_in_narrative.clone().unwrap_or_default(),
            ai_summary: ai_summary.unwrap_or_default(),
            age: character.profile.age.clone().filter(|a| !a.is_null()),
            species: character
                .tags
                .iter()
                .find_map(|t| t.strip_prefix(SPECIES_PREFIX))
                .map(|s| s.split('/').next().unwrap_or(s).to_string()),
            occupation: non_empty(&character.profile.role),
            affiliation_primary: non_empty(&character.profile.affiliation),
            personality_summary,
        }
    }
}

/// Strings verbatim, anything else as compact JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationSummary {
    pub id: String,
    pub name: String,
    pub short: String,
    #[serde(rename = "type")]
    pub loc_type: String,
    pub parent_id: Option<String>,
    pub description: String,
    pub tags: Vec<String>,
    pub lore: Value,
}

impl From<&Location> for LocationSummary {
    fn from(loc: &Location) -> Self {
        let profile = &loc.profile;
        LocationSummary {
            id: loc.id.clone(),
            name: profile.name.clone().unwrap_or_default(),
            short: profile.short.clone().unwrap_or_default(),
            loc_type: profile.loc_type.clone().unwrap_or_default(),
            parent_id: loc.parent_id().map(str::to_string),
            description: profile.description.clone().unwrap_or_default(),
            tags: loc.tags.clone(),
            lore: loc.lore.clone().unwrap_or_else(|| Value::Object(Default::default())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub root_location_id: String,
    pub include: MapInclude,
    pub display: Value,
}

impl From<&MapDef> for MapSummary {
    fn from(map: &MapDef) -> Self {
        MapSummary {
            id: map.id.clone(),
            name: map.profile.name.clone().unwrap_or_default(),
            description: map.profile.description.clone().unwrap_or_default(),
            root_location_id: map.root_location_id().unwrap_or_default().to_string(),
            include: map.include.clone(),
            display: map
                .display
                .clone()
                .unwrap_or_else(|| Value::Object(Default::default())),
        }
    }
}

/// Everything the presentation layer reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteData {
    pub characters: Vec<CharacterSummary>,
    pub graph: RelationGraph,
    pub locations: Vec<LocationSummary>,
    pub maps: Vec<MapSummary>,
    pub links: Vec<Link>,
    /// Keyed by map id; maps without a root have no entry.
    pub location_graphs: BTreeMap<String, LocationGraph>,
}

impl SiteData {
    pub fn build(store: &RecordStore) -> Self {
        let hierarchy = Hierarchy::build(store);
        let location_graphs = store
            .maps()
            .iter()
            .filter_map(|rec| {
                let graph = hierarchy.extract_map(&rec.record)?;
                Some((rec.record.id.clone(), graph))
            })
            .collect();

        SiteData {
            characters: store
                .characters()
                .iter()
                .map(|rec| CharacterSummary::from(&rec.record))
                .collect(),
            graph: RelationGraph::build(store),
            locations: store
                .locations()
                .iter()
                .map(|rec| LocationSummary::from(&rec.record))
                .collect(),
            maps: store
                .maps()
                .iter()
                .map(|rec| MapSummary::from(&rec.record))
                .collect(),
            links: store
                .links()
                .map(|rec| rec.record.decoded().map(|(_, link)| link.clone()).collect())
                .unwrap_or_default(),
            location_graphs,
        }
    }
}

/// Writes site data files as pretty JSON into one directory.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        OutputWriter {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write_json<T: Serialize + ?Sized>(
        &self,
        file_name: &str,
        value: &T,
    ) -> Result<PathBuf, LoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        let content = serde_json::to_string_pretty(value)?;
        fs::write(&path, content)?;
        tracing::debug!("[OutputWriter] Wrote {:?}", path);
        Ok(path)
    }

    /// Write every site data file; returns the written paths in write order.
    pub fn write_site(&self, data: &SiteData) -> Result<Vec<PathBuf>, LoreError> {
        let mut written = vec![
            self.write_json(CHARACTERS_FILE, &data.characters)?,
            self.write_json(GRAPH_FILE, &data.graph)?,
            self.write_json(LOCATIONS_FILE, &data.locations)?,
            self.write_json(MAPS_FILE, &data.maps)?,
            self.write_json(LINKS_FILE, &data.links)?,
        ];
        for (map_id, graph) in &data.location_graphs {
            written.push(self.write_json(&location_graph_file(map_id), graph)?);
        }
        tracing::info!(
            "[OutputWriter] Generated {} files in {:?} ({} characters, {} edges, {} locations, {} maps)",
            written.len(),
            self.dir,
            data.characters.len(),
            data.graph.edges.len(),
            data.locations.len(),
            data.maps.len()
        );
        Ok(written)
    }
}
