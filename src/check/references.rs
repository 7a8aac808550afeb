//! Cross-reference checks: ids that must resolve inside the [`RecordStore`] and categorical
//! fields that must be members of the [`Vocabulary`].

use crate::{
    codec::Diagnostic,
    properties::{Character, LinkSet, Location, MapDef, RelationsDoc},
    store::{RecordStore, SourceRecord},
    vocab::Vocabulary,
};

pub struct ReferenceValidator<'a> {
    vocab: &'a Vocabulary,
    store: &'a RecordStore,
}

impl<'a> ReferenceValidator<'a> {
    pub fn new(vocab: &'a Vocabulary, store: &'a RecordStore) -> Self {
        ReferenceValidator { vocab, store }
    }

    /// Relationship targets must be characters, types must be vocabulary members. Empty values
    /// are left to the schema check.
    pub fn check_relationships(&self, rec: &SourceRecord<Character>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for (i, rel) in rec.record.relationships.iter().enumerate() {
            let target = rel.target_id.as_str();
            if !target.is_empty() && !self.store.has_character(target) {
                diagnostics.push(Diagnostic::error(
                    &rec.scope,
                    format!("relationships[{i}].target_id '{target}' does not exist in characters"),
                ));
            }
            if let Some(rel_type) = rel.rel_type.as_deref().filter(|t| !t.is_empty()) {
                if !self.vocab.is_relationship_type(rel_type) {
                    diagnostics.push(Diagnostic::error(
                        &rec.scope,
                        format!(
                            "relationships[{i}].type '{rel_type}' is not in vocab.yml relationship_types"
                        ),
                    ));
                }
            }
        }
        diagnostics
    }

    /// Tags are `prefix/value`. Both a missing separator and an unknown prefix are warnings.
    pub fn check_tags(&self, scope: &str, tags: &[String]) -> Vec<Diagnostic> {
        tags.iter()
            .filter_map(|tag| match tag.split_once('/') {
                None => Some(Diagnostic::warning(
                    scope,
                    format!("Tag '{tag}' is not in prefix/value format"),
                )),
                Some((prefix, _)) if !self.vocab.is_tag_prefix(prefix) => {
                    Some(Diagnostic::warning(
                        scope,
                        format!(
                            "Tag prefix '{prefix}' in tag '{tag}' is not in vocab.yml tag_prefixes (valid: {})",
                            self.vocab.tag_prefixes.join(", ")
                        ),
                    ))
                }
                Some(_) => None,
            })
            .collect()
    }

    pub fn check_location_type(&self, rec: &SourceRecord<Location>) -> Option<Diagnostic> {
        let loc_type = rec.record.loc_type()?;
        if self.vocab.is_location_type(loc_type) {
            return None;
        }
        Some(Diagnostic::error(
            &rec.scope,
            format!("type '{loc_type}' not in vocab.yml location_types"),
        ))
    }

    pub fn check_location_parent(&self, rec: &SourceRecord<Location>) -> Option<Diagnostic> {
        let parent = rec.record.parent_id()?;
        if self.store.has_location(parent) {
            return None;
        }
        Some(Diagnostic::error(
            &rec.scope,
            format!(
                "Location '{}': parent_id '{parent}' does not exist",
                rec.record.id
            ),
        ))
    }

    /// Map root must be a location; unknown include types only warn.
    pub fn check_map(&self, rec: &SourceRecord<MapDef>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        if let Some(root) = rec.record.root_location_id() {
            if !self.store.has_location(root) {
                diagnostics.push(Diagnostic::error(
                    &rec.scope,
                    format!("root_location_id '{root}' does not exist"),
                ));
            }
        }
        for include_type in &rec.record.include.types {
            if !self.vocab.is_location_type(include_type) {
                diagnostics.push(Diagnostic::warning(
                    &rec.scope,
                    format!("include.types '{include_type}' not in vocab.yml location_types"),
                ));
            }
        }
        diagnostics
    }

    /// Endpoint and kind checks per link. A malformed entry is one error at its position and
    /// is otherwise skipped.
    pub fn check_links(&self, rec: &SourceRecord<LinkSet>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for (i, error) in rec.record.malformed() {
            diagnostics.push(Diagnostic::error(
                &rec.scope,
                format!("link[{i}]: entry could not be decoded: {error}"),
            ));
        }
        for (i, link) in rec.record.decoded() {
            if !link.character_id.is_empty() && !self.store.has_character(&link.character_id) {
                diagnostics.push(Diagnostic::error(
                    &rec.scope,
                    format!(
                        "link[{i}]: character_id '{}' does not exist",
                        link.character_id
                    ),
                ));
            }
            if !link.location_id.is_empty() && !self.store.has_location(&link.location_id) {
                diagnostics.push(Diagnostic::error(
                    &rec.scope,
                    format!("link[{i}]: location_id '{}' does not exist", link.location_id),
                ));
            }
            if !link.kind.is_empty() && !self.vocab.is_link_kind(&link.kind) {
                diagnostics.push(Diagnostic::error(
                    &rec.scope,
                    format!("link[{i}]: kind '{}' not in vocab.yml link_kinds", link.kind),
                ));
            }
        }
        diagnostics
    }

    /// Positional checks on the raw override file, before any merge.
    pub fn check_override_file(&self, rec: &SourceRecord<RelationsDoc>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for (i, error) in rec.record.malformed() {
            diagnostics.push(Diagnostic::error(
                &rec.scope,
                format!("edges[{i}]: entry could not be decoded: {error}"),
            ));
        }
        for (i, edge) in rec.record.decoded() {
            for (field, endpoint) in [("a", &edge.a), ("b", &edge.b)] {
                if !endpoint.is_empty() && !self.store.has_character(endpoint) {
                    diagnostics.push(Diagnostic::error(
                        &rec.scope,
                        format!("edges[{i}].{field} '{endpoint}' does not exist in characters"),
                    ));
                }
            }
            if let Some(rel_type) = edge.rel_type.as_deref().filter(|t| !t.is_empty()) {
                if !self.vocab.is_relationship_type(rel_type) {
                    diagnostics.push(Diagnostic::error(
                        &rec.scope,
                        format!("edges[{i}].type '{rel_type}' is not in vocab.yml relationship_types"),
                    ));
                }
            }
        }
        diagnostics
    }
}
