// Schema registry for record structural validation
//
// Each record kind has a JSON Schema (draft 7) under the schemas directory. The registry compiles
// them once up front; a missing or uncompilable schema aborts the run before any record is read.

use jsonschema::{Draft, Validator};
use serde_json::Value;
use std::{collections::BTreeMap, fs::read_to_string};

use super::RecordKind;
use crate::{config::Project, error::LoreError};

/// Structural conformance check of a decoded record against the shape declared for its kind.
///
/// Implementations return *all* violations, not only the first. An empty list means the instance
/// conforms.
pub trait SchemaCheck {
    fn check(&self, kind: RecordKind, instance: &Value) -> Vec<String>;
}

/// Compiled JSON Schema validators, one per [`RecordKind`].
#[derive(Default)]
pub struct SchemaRegistry {
    validators: BTreeMap<RecordKind, Validator>,
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl SchemaRegistry {
    /// Load and compile the schema of every record kind from the project's schemas directory.
    pub fn load(project: &Project) -> Result<Self, LoreError> {
        let mut registry = SchemaRegistry::default();
        for kind in RecordKind::ALL {
            let path = project.schema_path(kind);
            if !path.exists() {
                return Err(LoreError::NotFound(format!(
                    "{} not found",
                    project.display_path(&path)
                )));
            }
            let content = read_to_string(&path)?;
            let schema: Value = serde_json::from_str(&content).map_err(|e| {
                LoreError::Schema(format!(
                    "Invalid JSON in {}: {e}",
                    project.display_path(&path)
                ))
            })?;
            registry.register(kind, &schema)?;
        }
        tracing::debug!("[SchemaRegistry::load] Compiled {} schemas", registry.validators.len());
        Ok(registry)
    }

    /// Compile and register a schema for `kind`.
    ///
    /// If a schema for this kind already exists it is replaced and a log message emitted.
    pub fn register(&mut self, kind: RecordKind, schema: &Value) -> Result<(), LoreError> {
        let validator = jsonschema::options()
            .with_draft(Draft::Draft7)
            .build(schema)
            .map_err(|e| LoreError::Schema(format!("{kind} schema does not compile: {e}")))?;
        if self.validators.insert(kind, validator).is_some() {
            tracing::info!(
                "[SchemaRegistry::register] Overwriting existing schema: {}",
                kind
            );
        }
        Ok(())
    }

    /// List all registered kinds
    pub fn kinds(&self) -> Vec<RecordKind> {
        self.validators.keys().copied().collect()
    }
}

impl SchemaCheck for SchemaRegistry {
    fn check(&self, kind: RecordKind, instance: &Value) -> Vec<String> {
        let Some(validator) = self.validators.get(&kind) else {
            return vec![format!("No schema registered for {kind} records")];
        };
        validator
            .iter_errors(instance)
            .map(|error| {
                let path = error.instance_path.to_string();
                if path.is_empty() {
                    error.to_string()
                } else {
                    format!("{path}: {error}")
                }
            })
            .collect()
    }
}
