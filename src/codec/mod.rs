//! Record discovery and decoding.
//!
//! The corpus is a set of YAML files, one per record, grouped by kind into directories. This
//! module finds those files, derives the id each file is expected to declare, and decodes the
//! content into a [`serde_json::Value`] (the instance handed to schema validation) and then into
//! the typed records in [`properties`](crate::properties).
//!
//! ## Key Components
//!
//! - [`RecordKind`] - The four record kinds and their file naming conventions
//! - [`iter_record_files`] - Sorted, template-free listing of a record directory
//! - [`read_document`] / [`decode`] - Two-step decoding, YAML to JSON value to typed record
//! - [`decode_entries`] - Per-entry decoding for list documents, so one bad entry hides nothing
//! - [`SchemaRegistry`] - Compiled JSON Schemas per kind, behind the [`SchemaCheck`] trait
//! - [`Diagnostic`] - Non-fatal findings attributed to a file or corpus scope

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};
use walkdir::{DirEntry, WalkDir};

use crate::error::LoreError;

pub mod diagnostic;
pub mod schema_registry;

pub use diagnostic::{Diagnostic, Severity};
pub use schema_registry::{SchemaCheck, SchemaRegistry};

/// Files starting with this prefix are authoring templates and never loaded.
pub const TEMPLATE_PREFIX: &str = "_TEMPLATE";

/// Extensions accepted for record files.
pub const RECORD_EXTENSIONS: &[&str] = &["yml", "yaml"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Character,
    Location,
    Map,
    Links,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [
        RecordKind::Character,
        RecordKind::Location,
        RecordKind::Map,
        RecordKind::Links,
    ];

    /// Infix between the record id and the extension, e.g. `keep.location.yml`.
    pub fn infix(&self) -> Option<&'static str> {
        match self {
            RecordKind::Location => Some("location"),
            RecordKind::Map => Some("map"),
            RecordKind::Character | RecordKind::Links => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Character => "character",
            RecordKind::Location => "location",
            RecordKind::Map => "map",
            RecordKind::Links => "links",
        }
    }

    /// Whether `file_name` is a record file of this kind (templates excluded).
    pub fn matches(&self, file_name: &str) -> bool {
        if file_name.starts_with(TEMPLATE_PREFIX) {
            return false;
        }
        let Some((stem, ext)) = file_name.rsplit_once('.') else {
            return false;
        };
        if !RECORD_EXTENSIONS.contains(&ext) {
            return false;
        }
        match self.infix() {
            Some(infix) => stem
                .rsplit_once('.')
                .is_some_and(|(id, found)| found == infix && !id.is_empty()),
            None => !stem.is_empty(),
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The id a record file is expected to declare, derived from its file name.
///
/// ```
/// # use lore_core::codec::{file_id, RecordKind};
/// # use std::path::Path;
/// assert_eq!(file_id(Path::new("characters/alice.yml"), RecordKind::Character), "alice");
/// assert_eq!(file_id(Path::new("locations/keep.location.yaml"), RecordKind::Location), "keep");
/// ```
pub fn file_id(path: &Path, kind: RecordKind) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    match kind.infix() {
        Some(infix) => stem
            .strip_suffix(&format!(".{infix}"))
            .map(str::to_string)
            .unwrap_or(stem),
        None => stem,
    }
}

/// Lists the record files of `kind` directly inside `dir`, sorted by path.
///
/// Hidden files and `_TEMPLATE*` files are skipped. A missing directory yields an empty list.
pub fn iter_record_files<P: AsRef<Path>>(dir: P, kind: RecordKind) -> Vec<PathBuf> {
    fn is_hidden(entry: &DirEntry) -> bool {
        entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
    }
    if !dir.as_ref().is_dir() {
        tracing::debug!("[codec] {:?} is not a directory, no {} records", dir.as_ref(), kind);
        return Vec::new();
    }
    let mut files = WalkDir::new(&dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_entry(|e| !is_hidden(e) || e.path() == dir.as_ref())
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("[codec] Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_str().is_some_and(|name| kind.matches(name)))
        .map(DirEntry::into_path)
        .collect::<Vec<PathBuf>>();
    files.sort();
    files
}

/// Reads a YAML document into a JSON value.
///
/// Empty documents (no content or an explicit null) are an error: a record file must contain a
/// mapping.
pub fn read_document(path: &Path) -> Result<Value, LoreError> {
    tracing::debug!("Reading {:?}", path);
    let content = read_to_string(path)?;
    parse_document(&content)
}

/// Parses YAML text into a JSON value, rejecting empty documents.
pub fn parse_document(content: &str) -> Result<Value, LoreError> {
    if content.trim().is_empty() {
        return Err(LoreError::Serialization(
            "File is empty or invalid YAML".to_string(),
        ));
    }
    let value: Value = serde_yaml::from_str(content)?;
    if value.is_null() {
        return Err(LoreError::Serialization(
            "File is empty or invalid YAML".to_string(),
        ));
    }
    Ok(value)
}

/// Decodes an already-parsed document into a typed record.
pub fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, LoreError> {
    Ok(serde_json::from_value(value.clone())?)
}

/// Decodes each element of the sequence under `field` on its own, keeping positions.
///
/// A missing or non-sequence `field` yields no entries; the schema check reports that shape.
pub fn decode_entries<T: DeserializeOwned>(value: &Value, field: &str) -> Vec<Result<T, String>> {
    value
        .get(field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| decode(item).map_err(|e| e.to_string()))
                .collect()
        })
        .unwrap_or_default()
}
