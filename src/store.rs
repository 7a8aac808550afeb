//! Record Store: the immutable snapshot of every record in the corpus.
//!
//! Each file is read independently. A file that cannot be read, is not valid YAML or is empty
//! contributes a single warning and is left out of the working set. A file that parses but does
//! not fit its typed record is kept as an [`Undecoded`] record, so the checks that work on the
//! raw document still see it.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use crate::{
    codec::{decode, file_id, iter_record_files, read_document, Diagnostic, RecordKind},
    config::Project,
    error::LoreError,
    properties::{Character, Identified, LinkSet, Location, MapDef, RelationsDoc},
};

/// A decoded record together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord<T> {
    pub path: PathBuf,
    /// Path relative to the corpus root, used as diagnostic scope
    pub scope: String,
    /// Id implied by the file name
    pub file_id: String,
    /// The document as decoded from YAML, before typing
    pub raw: Value,
    pub record: T,
}

impl<T> SourceRecord<T> {
    pub fn new(path: PathBuf, scope: String, file_id: String, raw: Value, record: T) -> Self {
        SourceRecord {
            path,
            scope,
            file_id,
            raw,
            record,
        }
    }
}

impl<T: DeserializeOwned> SourceRecord<T> {
    /// Type a raw document that came from `path`.
    pub fn from_value(
        path: PathBuf,
        scope: String,
        file_id: String,
        raw: Value,
    ) -> Result<Self, LoreError> {
        let record = decode(&raw)?;
        Ok(SourceRecord::new(path, scope, file_id, raw, record))
    }
}

/// A record that is valid YAML but does not fit its typed shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Undecoded {
    pub kind: RecordKind,
    /// The raw `id`, when it is a string
    pub id: Option<String>,
    pub error: String,
}

impl Undecoded {
    pub fn new(kind: RecordKind, raw: &Value, error: String) -> Self {
        Undecoded {
            kind,
            id: raw.get("id").and_then(Value::as_str).map(str::to_string),
            error,
        }
    }
}

impl Identified for Undecoded {
    fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    characters: Vec<SourceRecord<Character>>,
    locations: Vec<SourceRecord<Location>>,
    maps: Vec<SourceRecord<MapDef>>,
    undecoded: Vec<SourceRecord<Undecoded>>,
    links: Option<SourceRecord<LinkSet>>,
    relations: Option<SourceRecord<RelationsDoc>>,
    character_ids: BTreeSet<String>,
    location_ids: BTreeSet<String>,
    diagnostics: Vec<Diagnostic>,
}

impl RecordStore {
    /// Load every record of the project.
    pub fn load(project: &Project) -> Result<Self, LoreError> {
        let mut store = RecordStore::default();
        for kind in [RecordKind::Character, RecordKind::Location, RecordKind::Map] {
            let Some(dir) = project.record_dir(kind) else {
                continue;
            };
            let files = iter_record_files(&dir, kind);
            if files.is_empty() {
                tracing::info!(
                    "[RecordStore] No {} files found (excluding template)",
                    kind
                );
            }
            for path in files {
                let scope = project.display_path(&path);
                let expected = file_id(&path, kind);
                match kind {
                    RecordKind::Character => {
                        if let Some(rec) = store.load_record(kind, path, scope, expected) {
                            store.push_character(rec);
                        }
                    }
                    RecordKind::Location => {
                        if let Some(rec) = store.load_record(kind, path, scope, expected) {
                            store.push_location(rec);
                        }
                    }
                    RecordKind::Map => {
                        if let Some(rec) = store.load_record(kind, path, scope, expected) {
                            store.push_map(rec);
                        }
                    }
                    RecordKind::Links => {}
                }
            }
        }

        let links_path = project.links_path();
        if links_path.exists() {
            let scope = project.display_path(&links_path);
            if let Some(raw) = store.read_raw(&links_path, &scope) {
                let record = LinkSet::from_value(&raw);
                store.links = Some(SourceRecord::new(links_path, scope.clone(), scope, raw, record));
            }
        }
        let relations_path = project.relations_path();
        if relations_path.exists() {
            let scope = project.display_path(&relations_path);
            if let Some(raw) = store.read_raw(&relations_path, &scope) {
                let record = RelationsDoc::from_value(&raw);
                store.relations = Some(SourceRecord::new(
                    relations_path,
                    scope.clone(),
                    scope,
                    raw,
                    record,
                ));
            }
        }

        tracing::info!(
            "[RecordStore] Loaded {} characters, {} locations, {} maps ({} undecoded, {} unreadable)",
            store.characters.len(),
            store.locations.len(),
            store.maps.len(),
            store.undecoded.len(),
            store.diagnostics.len()
        );
        Ok(store)
    }

    /// Read and parse one file. Failures become a warning on `scope`.
    fn read_raw(&mut self, path: &Path, scope: &str) -> Option<Value> {
        match read_document(path) {
            Ok(raw) => Some(raw),
            Err(e) => {
                tracing::warn!("[RecordStore] Failed to load {:?}: {}", path, e);
                self.diagnostics
                    .push(Diagnostic::warning(scope, format!("Failed to decode record: {e}")));
                None
            }
        }
    }

    /// Read and type one record file. A document that parses but does not type is kept as
    /// [`Undecoded`] and `None` is returned.
    fn load_record<T: DeserializeOwned>(
        &mut self,
        kind: RecordKind,
        path: PathBuf,
        scope: String,
        file_id: String,
    ) -> Option<SourceRecord<T>> {
        let raw = self.read_raw(&path, &scope)?;
        match decode(&raw) {
            Ok(record) => Some(SourceRecord::new(path, scope, file_id, raw, record)),
            Err(e) => {
                tracing::debug!("[RecordStore] {:?} does not fit a {} record: {}", path, kind, e);
                let record = Undecoded::new(kind, &raw, e.to_string());
                self.push_undecoded(SourceRecord::new(path, scope, file_id, raw, record));
                None
            }
        }
    }

    pub fn push_character(&mut self, rec: SourceRecord<Character>) {
        if !rec.record.id().is_empty() {
            self.character_ids.insert(rec.record.id().to_string());
        }
        self.characters.push(rec);
    }

    pub fn push_location(&mut self, rec: SourceRecord<Location>) {
        if !rec.record.id().is_empty() {
            self.location_ids.insert(rec.record.id().to_string());
        }
        self.locations.push(rec);
    }

    pub fn push_map(&mut self, rec: SourceRecord<MapDef>) {
        self.maps.push(rec);
    }

    /// Keep a record that failed typing. Its string id still counts as declared.
    pub fn push_undecoded(&mut self, rec: SourceRecord<Undecoded>) {
        if let Some(id) = rec.record.id.as_deref().filter(|id| !id.is_empty()) {
            match rec.record.kind {
                RecordKind::Character => {
                    self.character_ids.insert(id.to_string());
                }
                RecordKind::Location => {
                    self.location_ids.insert(id.to_string());
                }
                RecordKind::Map | RecordKind::Links => {}
            }
        }
        self.undecoded.push(rec);
    }

    pub fn set_links(&mut self, rec: SourceRecord<LinkSet>) {
        self.links = Some(rec);
    }

    pub fn set_relations(&mut self, rec: SourceRecord<RelationsDoc>) {
        self.relations = Some(rec);
    }

    pub fn characters(&self) -> &[SourceRecord<Character>] {
        &self.characters
    }

    pub fn locations(&self) -> &[SourceRecord<Location>] {
        &self.locations
    }

    pub fn maps(&self) -> &[SourceRecord<MapDef>] {
        &self.maps
    }

    /// Records of `kind` that parsed but did not fit their typed shape.
    pub fn undecoded(&self, kind: RecordKind) -> impl Iterator<Item = &SourceRecord<Undecoded>> {
        self.undecoded
            .iter()
            .filter(move |rec| rec.record.kind == kind)
    }

    pub fn links(&self) -> Option<&SourceRecord<LinkSet>> {
        self.links.as_ref()
    }

    pub fn relations(&self) -> Option<&SourceRecord<RelationsDoc>> {
        self.relations.as_ref()
    }

    /// Declared ids of every loaded character.
    pub fn character_ids(&self) -> &BTreeSet<String> {
        &self.character_ids
    }

    /// Declared ids of every loaded location.
    pub fn location_ids(&self) -> &BTreeSet<String> {
        &self.location_ids
    }

    pub fn has_character(&self, id: &str) -> bool {
        self.character_ids.contains(id)
    }

    pub fn has_location(&self, id: &str) -> bool {
        self.location_ids.contains(id)
    }

    /// Warnings for files that were excluded because they could not be read or parsed.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Number of record files of `kind` that were parsed, typed or not. For links, the number
    /// of entries in the links document.
    pub fn count(&self, kind: RecordKind) -> usize {
        let typed = match kind {
            RecordKind::Character => self.characters.len(),
            RecordKind::Location => self.locations.len(),
            RecordKind::Map => self.maps.len(),
            RecordKind::Links => self.links.as_ref().map(|l| l.record.links.len()).unwrap_or(0),
        };
        typed + self.undecoded(kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty() && self.locations.is_empty() && self.maps.is_empty()
    }
}
