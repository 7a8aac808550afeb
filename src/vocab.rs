//! Controlled vocabulary shared by every validator.
//!
//! The vocabulary document (`schemas/vocab.yml`) is loaded once before any record is checked and
//! is read-only afterwards. A missing or undecodable vocabulary aborts the run.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, fs::read_to_string, path::Path};

use crate::error::LoreError;

/// Multiplicity rule for a link kind. Any authored rule other than `single` is unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Value")]
pub enum Cardinality {
    /// At most one link of this kind per character
    Single,
    Multiple,
}

impl From<Value> for Cardinality {
    fn from(rule: Value) -> Self {
        match rule.as_str() {
            Some("single") => Cardinality::Single,
            _ => Cardinality::Multiple,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub relationship_types: Vec<String>,
    pub tag_prefixes: Vec<String>,
    pub location_types: Vec<String>,
    pub link_kinds: Vec<String>,
    pub link_cardinality: BTreeMap<String, Cardinality>,
}

impl Vocabulary {
    pub fn load(path: &Path) -> Result<Self, LoreError> {
        if !path.exists() {
            return Err(LoreError::NotFound(format!(
                "vocabulary {} not found",
                path.display()
            )));
        }
        tracing::debug!("[Vocabulary::load] Reading {:?}", path);
        let content = read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, LoreError> {
        let vocab: Option<Vocabulary> = serde_yaml::from_str(content)
            .map_err(|e| LoreError::Vocabulary(format!("Invalid YAML in vocab.yml: {e}")))?;
        vocab.ok_or_else(|| LoreError::Vocabulary("vocab.yml is empty".to_string()))
    }

    pub fn is_relationship_type(&self, value: &str) -> bool {
        self.relationship_types.iter().any(|t| t == value)
    }

    pub fn is_tag_prefix(&self, value: &str) -> bool {
        self.tag_prefixes.iter().any(|t| t == value)
    }

    pub fn is_location_type(&self, value: &str) -> bool {
        self.location_types.iter().any(|t| t == value)
    }

    pub fn is_link_kind(&self, value: &str) -> bool {
        self.link_kinds.iter().any(|t| t == value)
    }

    pub fn cardinality(&self, kind: &str) -> Cardinality {
        self.link_cardinality
            .get(kind)
            .copied()
            .unwrap_or(Cardinality::Multiple)
    }
}
