//! # lore-core
//!
//! Integrity checker and graph builder for a hand-authored narrative knowledge base.
//!
//! ## Overview
//!
//! A lore corpus is a directory of small YAML records: one file per character, location and map,
//! plus a document of character-location links and an optional global relationship override file.
//! lore-core loads the whole corpus into one immutable snapshot, decides whether it is internally
//! consistent, and derives the graph projections a presentation layer reads.
//!
//! The whole system is a batch, single-pass, offline transform. Nothing watches files, nothing
//! listens on a network.
//!
//! ### What gets checked
//!
//! - **Schema conformance** of every record against a JSON Schema for its kind, with *all*
//!   violations reported
//! - **Identity**: a record's declared `id` must equal the id implied by its file name
//! - **Cross references**: relationship targets, link endpoints, map roots and location parents
//!   must resolve
//! - **Controlled vocabulary**: relationship types, tag prefixes, location types and link kinds
//! - **Cardinality** of single-valued link kinds (e.g. one `birthplace` per character)
//! - **Cycles** in location parent chains
//!
//! Findings are [`codec::Diagnostic`]s with three severities. A run fails iff at least one error
//! exists anywhere; warnings never change the outcome. Only missing or broken *inputs to the
//! checker itself* (vocabulary, schemas, `lore.toml`) abort a run, as a [`LoreError`].
//!
//! ## Architecture
//!
//! Leaves first:
//!
//! - **[`config`]**: corpus layout (`lore.toml`) anchored at a root directory
//! - **[`codec`]**: file discovery, YAML decoding, schema registry, diagnostics
//! - **[`properties`]**: typed records (`Character`, `Location`, `MapDef`, `Link`, ...)
//! - **[`vocab`]**: the controlled vocabulary, read-only after load
//! - **[`store`]**: the loaded snapshot, `RecordStore`
//! - **[`check`]**: identity, cross-reference and cardinality validators
//! - **[`graph`]**: the merged relationship edge set and the location hierarchy
//! - **[`report`]**: ordered aggregation and the pass/fail verdict
//! - **[`site`]**: site data projection and JSON output
//! - **[`compiler`]**: the pipeline tying it all together
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lore_core::compiler::CorpusCompiler;
//!
//! fn main() -> Result<(), lore_core::LoreError> {
//!     // Fails fast if the vocabulary or a schema is missing.
//!     let compiler = CorpusCompiler::open("./lore")?;
//!     let compilation = compiler.compile()?;
//!     print!("{}", compilation.report);
//!
//!     let graph = compilation.relation_graph();
//!     for edge in &graph.edges {
//!         println!("{} ({} -> {}, intensity {})", edge.id, edge.source, edge.target, edge.intensity);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Edge identity
//!
//! Relationship edges are undirected for identity purposes. The id of an edge is
//! `<smaller-endpoint>__<type>__<larger-endpoint>`, so `alice -> bob` and `bob -> alice` of the
//! same type collapse into one edge. When the override file declares an edge with the same id, the
//! override wins. Containment edges in location subgraphs are `<parent>__contains__<child>`.
//!
//! ## Features
//!
//! - **default**: the library
//! - **bin**: the `lore` command line tool (`validate`, `build`, `graph`)

pub mod check;
pub mod codec;
pub mod compiler;
pub mod config;
pub mod error;
pub mod graph;
pub mod properties;
pub mod report;
pub mod site;
pub mod store;
#[cfg(test)]
mod tests;
pub mod vocab;

pub use error::*;
