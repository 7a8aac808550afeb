use std::collections::BTreeMap;

use crate::{
    codec::Diagnostic,
    properties::LinkSet,
    store::SourceRecord,
    vocab::{Cardinality, Vocabulary},
};

/// Flags every (character, kind) group with more than one link when the kind is
/// single-cardinality. Links missing either key, and malformed entries, are not grouped.
pub fn check_cardinality(vocab: &Vocabulary, rec: &SourceRecord<LinkSet>) -> Vec<Diagnostic> {
    let mut groups: BTreeMap<(&str, &str), Vec<usize>> = BTreeMap::new();
    for (i, link) in rec.record.decoded() {
        if link.character_id.is_empty() || link.kind.is_empty() {
            continue;
        }
        groups
            .entry((link.character_id.as_str(), link.kind.as_str()))
            .or_default()
            .push(i);
    }

    groups
        .into_iter()
        .filter(|((_, kind), indices)| {
            indices.len() > 1 && vocab.cardinality(kind) == Cardinality::Single
        })
        .map(|((character_id, kind), indices)| {
            let positions = indices
                .iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            Diagnostic::error(
                &rec.scope,
                format!(
                    "character '{character_id}' has {} '{kind}' links (links [{positions}]), but only 1 is allowed",
                    indices.len()
                ),
            )
        })
        .collect()
}
