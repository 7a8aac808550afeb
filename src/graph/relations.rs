//! Relationship graph: one undirected, de-duplicated edge set built from the relationships each
//! character declares plus the optional global override file.
//!
//! Merge precedence is insertion order. Declared edges go into the identity-keyed map first,
//! override edges second, so an override replaces any declared edge with the same identity.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::{
    codec::Diagnostic,
    properties::{Character, RelationsDoc},
    store::{RecordStore, SourceRecord},
    vocab::Vocabulary,
};

pub const EDGE_ID_SEPARATOR: &str = "__";
/// Tag appended to a declared edge whose relationship is flagged `mutual`.
pub const MUTUAL_TAG: &str = "dynamic/mutual";
pub const DEFAULT_INTENSITY: i64 = 3;
/// Edge type used when a relationship or override omits one.
pub const UNKNOWN_TYPE: &str = "unknown";
/// Diagnostic scope for findings over the merged edge set.
pub const GRAPH_SCOPE: &str = "graph";

/// Stable edge identity: `<smaller>__<type>__<larger>`, independent of declaration direction.
///
/// ```
/// use lore_core::graph::edge_id;
/// assert_eq!(edge_id("bob", "alice", "friend"), "alice__friend__bob");
/// assert_eq!(edge_id("alice", "bob", "friend"), edge_id("bob", "alice", "friend"));
/// ```
pub fn edge_id(a: &str, b: &str, edge_type: &str) -> String {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    format!("{low}{EDGE_ID_SEPARATOR}{edge_type}{EDGE_ID_SEPARATOR}{high}")
}

/// A merged relationship. `source`/`target` keep the direction as declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: String,
    pub intensity: i64,
    pub summary: String,
    pub tags: Vec<String>,
}

impl Edge {
    pub fn new(source: &str, target: &str, edge_type: &str) -> Self {
        Edge {
            id: edge_id(source, target, edge_type),
            source: source.to_string(),
            target: target.to_string(),
            edge_type: edge_type.to_string(),
            intensity: DEFAULT_INTENSITY,
            summary: String::new(),
            tags: Vec::new(),
        }
    }
}

/// One edge per relationship whose target is a loaded character. Unresolvable targets are
/// skipped silently; the cross-reference check reports them. Within this source the first
/// declaration of an identity wins.
pub fn declared_edges(store: &RecordStore) -> Vec<Edge> {
    let mut seen = BTreeSet::new();
    let mut edges = Vec::new();
    for Character {
        id, relationships, ..
    } in store.characters().iter().map(|rec| &rec.record)
    {
        for rel in relationships {
            if rel.target_id.is_empty() || !store.has_character(&rel.target_id) {
                continue;
            }
            let edge_type = rel
                .rel_type
                .as_deref()
                .filter(|t| !t.is_empty())
                .unwrap_or(UNKNOWN_TYPE);
            let mut edge = Edge::new(id, &rel.target_id, edge_type);
            if !seen.insert(edge.id.clone()) {
                continue;
            }
            edge.intensity = rel.intensity.unwrap_or(DEFAULT_INTENSITY);
            edge.summary = rel.description.clone().unwrap_or_default();
            if rel.mutual == Some(true) {
                edge.tags.push(MUTUAL_TAG.to_string());
            }
            edges.push(edge);
        }
    }
    edges
}

/// Edges from the override file, in file order. Malformed entries and entries missing either
/// endpoint are skipped.
pub fn override_edges(doc: &RelationsDoc) -> Vec<Edge> {
    doc.decoded()
        .map(|(_, raw)| raw)
        .filter(|raw| !raw.a.is_empty() && !raw.b.is_empty())
        .map(|raw| {
            let edge_type = raw
                .rel_type
                .as_deref()
                .filter(|t| !t.is_empty())
                .unwrap_or(UNKNOWN_TYPE);
            let mut edge = Edge::new(&raw.a, &raw.b, edge_type);
            edge.intensity = raw.intensity.unwrap_or(DEFAULT_INTENSITY);
            edge.summary = raw.summary.clone().unwrap_or_default();
            edge.tags = raw.tags.clone();
            edge
        })
        .collect()
}

/// Override-wins merge. The result is ordered by edge id.
pub fn merge_edges(declared: Vec<Edge>, overrides: Vec<Edge>) -> Vec<Edge> {
    let mut by_id: BTreeMap<String, Edge> = BTreeMap::new();
    for edge in declared.into_iter().chain(overrides) {
        by_id.insert(edge.id.clone(), edge);
    }
    by_id.into_values().collect()
}

/// Endpoint and type checks over the merged set, so overrides get the same scrutiny as
/// declared relationships.
pub fn validate_edges(edges: &[Edge], store: &RecordStore, vocab: &Vocabulary) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for edge in edges {
        for (role, endpoint) in [("source", &edge.source), ("target", &edge.target)] {
            if !store.has_character(endpoint) {
                diagnostics.push(Diagnostic::error(
                    GRAPH_SCOPE,
                    format!("Edge {}: {role} '{endpoint}' does not exist", edge.id),
                ));
            }
        }
        if !vocab.is_relationship_type(&edge.edge_type) {
            diagnostics.push(Diagnostic::error(
                GRAPH_SCOPE,
                format!(
                    "Edge {}: type '{}' is not in vocab.yml relationship_types",
                    edge.id, edge.edge_type
                ),
            ));
        }
    }
    diagnostics
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterNode {
    pub id: String,
    pub label: String,
    pub tags: Vec<String>,
}

impl From<&SourceRecord<Character>> for CharacterNode {
    fn from(rec: &SourceRecord<Character>) -> Self {
        CharacterNode {
            id: rec.record.id.clone(),
            label: rec.record.label().to_string(),
            tags: rec.record.tags.clone(),
        }
    }
}

/// Character nodes plus the merged edge set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationGraph {
    pub nodes: Vec<CharacterNode>,
    pub edges: Vec<Edge>,
}

impl RelationGraph {
    pub fn build(store: &RecordStore) -> Self {
        let declared = declared_edges(store);
        let overrides = store
            .relations()
            .map(|rec| override_edges(&rec.record))
            .unwrap_or_default();
        tracing::debug!(
            "[RelationGraph] {} declared edges, {} override edges",
            declared.len(),
            overrides.len()
        );
        RelationGraph {
            nodes: store.characters().iter().map(CharacterNode::from).collect(),
            edges: merge_edges(declared, overrides),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::helpers::*;
    use test_log::test;

    #[test]
    fn test_edge_id_is_symmetric() {
        for (a, b) in [("alice", "bob"), ("zed", "amy"), ("same", "same")] {
            assert_eq!(edge_id(a, b, "rival"), edge_id(b, a, "rival"));
        }
        assert_eq!(edge_id("zed", "amy", "rival"), "amy__rival__zed");
    }

    #[test]
    fn test_mutual_declarations_collapse_to_one_edge() {
        let store = create_friends_store();
        let graph = RelationGraph::build(&store);
        assert_eq!(graph.edges.len(), 1);
        let edge = graph.get("alice__friend__bob").unwrap();
        // alice is loaded first, so her declaration is the one kept.
        assert_eq!(edge.source, "alice");
        assert_eq!(edge.target, "bob");
        assert_eq!(edge.intensity, 4);
        assert_eq!(edge.summary, "Childhood friends");
        assert_eq!(edge.tags, vec![MUTUAL_TAG.to_string()]);
        assert_eq!(graph.nodes[1].label, "Bob");
    }

    #[test]
    fn test_override_wins() {
        let mut store = create_friends_store();
        store.set_relations(relations(
            "edges:\n  - a: bob\n    b: alice\n    type: friend\n    intensity: 5\n",
        ));
        let graph = RelationGraph::build(&store);
        assert_eq!(graph.edges.len(), 1);
        let edge = graph.get("alice__friend__bob").unwrap();
        assert_eq!(edge.intensity, 5);
        assert_eq!(edge.source, "bob");
        assert_eq!(edge.summary, "");
        assert!(edge.tags.is_empty());

        // Merging the same overrides again changes nothing.
        let overrides = override_edges(&store.relations().unwrap().record);
        let again = merge_edges(graph.edges.clone(), overrides);
        assert_eq!(again, graph.edges);
    }

    #[test]
    fn test_declared_edges_skip_unresolved_and_default_type() {
        let mut store = RecordStore::default();
        store.push_character(character(
            "carol",
            r#"
id: carol
relationships:
  - target_id: ghost
    type: friend
  - target_id: dave
  - target_id: dave
    type: rival
"#,
        ));
        store.push_character(character("dave", "id: dave\n"));
        let edges = declared_edges(&store);
        let ids: Vec<&str> = edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["carol__unknown__dave", "carol__rival__dave"]);
        assert_eq!(edges[0].intensity, DEFAULT_INTENSITY);
    }

    #[test]
    fn test_override_edges_skip_missing_endpoints() {
        let doc = relations(
            "edges:\n  - a: alice\n    type: friend\n  - a: bob\n    b: carol\n    tags: [arc/one]\n",
        )
        .record;
        let edges = override_edges(&doc);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].id, "bob__unknown__carol");
        assert_eq!(edges[0].tags, vec!["arc/one".to_string()]);
    }

    #[test]
    fn test_validate_merged_edges() {
        let vocab = test_vocab();
        let mut store = create_friends_store();
        store.set_relations(relations(
            "edges:\n  - a: alice\n    b: mallory\n    type: enemy\n",
        ));
        let graph = RelationGraph::build(&store);
        let diagnostics = validate_edges(&graph.edges, &store, &vocab);
        let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Edge alice__enemy__mallory: target 'mallory' does not exist",
                "Edge alice__enemy__mallory: type 'enemy' is not in vocab.yml relationship_types",
            ]
        );
        assert!(diagnostics.iter().all(|d| d.scope == GRAPH_SCOPE));
    }
}
