//! Derived graphs: the merged character relationship graph and per-map location subgraphs.

pub mod hierarchy;
pub mod relations;

pub use hierarchy::{
    containment_id, ContainmentEdge, Hierarchy, LocationGraph, LocationNode, CONTAINS,
};
pub use relations::{
    declared_edges, edge_id, merge_edges, override_edges, validate_edges, CharacterNode, Edge,
    RelationGraph, MUTUAL_TAG,
};
