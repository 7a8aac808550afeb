//! Location containment: parent/child index, cycle detection and the per-map subgraph.

use petgraph::{graphmap::GraphMap, Directed, Direction};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::{
    codec::Diagnostic,
    properties::{Location, MapDef},
    store::{RecordStore, SourceRecord},
};

pub const CONTAINS: &str = "contains";
pub const HIERARCHY_SCOPE: &str = "hierarchy";

/// Parent -> child edges. Parents that are not loaded locations still appear as nodes, so
/// their children stay reachable.
pub type ContainmentIndex<'a> = GraphMap<&'a str, (), Directed>;

/// `<parent>__contains__<child>`
pub fn containment_id(parent: &str, child: &str) -> String {
    format!("{parent}__{CONTAINS}__{child}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainmentEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationGraph {
    pub nodes: Vec<LocationNode>,
    pub edges: Vec<ContainmentEdge>,
}

impl LocationGraph {
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }
}

pub struct Hierarchy<'a> {
    /// Locations in load order, first declaration per id
    order: Vec<&'a str>,
    locations: BTreeMap<&'a str, &'a Location>,
    children: ContainmentIndex<'a>,
    /// Locations without a parent
    top_level: Vec<&'a str>,
}

impl<'a> Hierarchy<'a> {
    pub fn build(store: &'a RecordStore) -> Self {
        Self::from_records(store.locations())
    }

    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a SourceRecord<Location>>,
    {
        let mut hierarchy = Hierarchy {
            order: Vec::new(),
            locations: BTreeMap::new(),
            children: ContainmentIndex::new(),
            top_level: Vec::new(),
        };
        for loc in records.into_iter().map(|rec| &rec.record) {
            let id = loc.id.as_str();
            if hierarchy.locations.contains_key(id) {
                continue;
            }
            hierarchy.locations.insert(id, loc);
            hierarchy.order.push(id);
            hierarchy.children.add_node(id);
            match loc.parent_id() {
                Some(parent) => {
                    hierarchy.children.add_edge(parent, id, ());
                }
                None => hierarchy.top_level.push(id),
            }
        }
        hierarchy
    }

    pub fn get(&self, id: &str) -> Option<&'a Location> {
        self.locations.get(id).copied()
    }

    /// Direct children in load order.
    pub fn children(&self, id: &'a str) -> Vec<&'a str> {
        if !self.children.contains_node(id) {
            return Vec::new();
        }
        self.children
            .neighbors_directed(id, Direction::Outgoing)
            .collect()
    }

    pub fn top_level(&self) -> &[&'a str] {
        &self.top_level
    }

    /// Whether following `parent_id` from `start` ever revisits an id.
    pub fn has_cycle(&self, start: &str) -> bool {
        let mut visited = BTreeSet::new();
        let mut current = Some(start);
        while let Some(id) = current {
            if !visited.insert(id) {
                return true;
            }
            current = self.get(id).and_then(Location::parent_id);
        }
        false
    }

    /// Every location whose parent chain loops, in load order. A shared cycle is reported once
    /// per location that reaches it.
    pub fn cyclic_locations(&self) -> Vec<&'a str> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.has_cycle(id))
            .collect()
    }

    pub fn check_cycles(&self) -> Vec<Diagnostic> {
        self.cyclic_locations()
            .into_iter()
            .map(|id| {
                Diagnostic::error(
                    HIERARCHY_SCOPE,
                    format!("Location '{id}': circular reference detected in parent_id chain"),
                )
            })
            .collect()
    }

    /// Depth- and type-bounded subgraph below `root`.
    ///
    /// The root sits at depth 0 and its children at depth 1; nothing deeper than `max_depth` is
    /// visited. A node filtered out by `types` is still descended through.
    pub fn extract(&self, root: &'a str, max_depth: u32, types: &[String]) -> LocationGraph {
        let admits = |loc: &Location| {
            types.is_empty() || loc.loc_type().is_some_and(|t| types.iter().any(|a| a == t))
        };

        let mut included: Vec<&'a Location> = Vec::new();
        let mut included_ids: BTreeSet<&str> = BTreeSet::new();
        if let Some(loc) = self.get(root).filter(|loc| admits(*loc)) {
            included_ids.insert(root);
            included.push(loc);
        }

        // Iterative pre-order walk; children are pushed in reverse to keep load order.
        let mut expanded: BTreeMap<&'a str, u32> = BTreeMap::new();
        let mut stack: Vec<(&'a str, u32)> = self
            .children(root)
            .into_iter()
            .rev()
            .map(|child| (child, 1))
            .collect();
        while let Some((id, depth)) = stack.pop() {
            if depth > max_depth {
                continue;
            }
            let Some(loc) = self.get(id) else {
                continue;
            };
            if admits(loc) && included_ids.insert(loc.id.as_str()) {
                included.push(loc);
            }
            match expanded.get(id) {
                Some(&seen_at) if seen_at <= depth => continue,
                _ => {
                    expanded.insert(id, depth);
                }
            }
            stack.extend(
                self.children(id)
                    .into_iter()
                    .rev()
                    .map(|child| (child, depth + 1)),
            );
        }

        let mut graph = LocationGraph::default();
        for loc in included {
            graph.nodes.push(LocationNode {
                id: loc.id.clone(),
                label: loc.label().to_string(),
                node_type: loc.loc_type().unwrap_or_default().to_string(),
                tags: loc.tags.clone(),
            });
            if let Some(parent) = loc.parent_id().filter(|p| included_ids.contains(p)) {
                graph.edges.push(ContainmentEdge {
                    id: containment_id(parent, &loc.id),
                    source: parent.to_string(),
                    target: loc.id.clone(),
                    edge_type: CONTAINS.to_string(),
                });
            }
        }
        graph
    }

    /// Subgraph for a map definition, or `None` when the map declares no root.
    pub fn extract_map(&self, map: &'a MapDef) -> Option<LocationGraph> {
        let root = map.root_location_id()?;
        Some(self.extract(root, map.include.depth, &map.include.types))
    }
}
