//! The validation pipeline: fatal inputs first, then every validator over one immutable
//! [`RecordStore`] snapshot, aggregated into a single [`Report`].

use std::path::{Path, PathBuf};

use crate::{
    check::{check_cardinality, check_duplicate_ids, IdentityValidator, ReferenceValidator},
    codec::{Diagnostic, RecordKind, SchemaCheck, SchemaRegistry},
    config::Project,
    error::LoreError,
    graph::{validate_edges, Hierarchy, LocationGraph, RelationGraph},
    report::Report,
    site::{OutputWriter, SiteData},
    store::RecordStore,
    vocab::Vocabulary,
};

/// Run every validator over `store` and collect the findings in a deterministic order.
///
/// Only a broken validator setup is an `Err`; every finding about the corpus is a diagnostic.
pub fn validate_store(
    store: &RecordStore,
    vocab: &Vocabulary,
    schemas: &dyn SchemaCheck,
) -> Result<Report, LoreError> {
    let identity = IdentityValidator::new(schemas)?;
    let references = ReferenceValidator::new(vocab, store);
    let mut report = Report::new();

    for kind in RecordKind::ALL {
        report.set_files_checked(kind, store.count(kind));
    }
    report.extend(store.diagnostics().iter().cloned());
    for kind in [RecordKind::Character, RecordKind::Location, RecordKind::Map] {
        if store.count(kind) == 0 {
            report.push(Diagnostic::info(
                kind.label(),
                format!("No {kind} files found (excluding template)"),
            ));
        }
    }

    for rec in store.characters() {
        report.extend(identity.check_record(RecordKind::Character, rec));
        report.extend(references.check_relationships(rec));
        report.extend(references.check_tags(&rec.scope, &rec.record.tags));
        report.extend(identity.check_dates(rec));
    }
    for rec in store.undecoded(RecordKind::Character) {
        report.extend(identity.check_undecoded(rec));
    }
    report.extend(check_duplicate_ids(store.characters()));
    if let Some(rec) = store.relations() {
        report.extend(references.check_override_file(rec));
    }

    // Only schema-valid locations take part in the cycle walk.
    let mut schema_valid = Vec::new();
    for rec in store.locations() {
        let violations = identity.check_schema(RecordKind::Location, rec);
        if violations.is_empty() {
            schema_valid.push(rec);
        }
        report.extend(violations);
        report.extend(identity.check_id(rec));
        report.extend(references.check_location_type(rec));
        report.extend(references.check_tags(&rec.scope, &rec.record.tags));
    }
    for rec in store.undecoded(RecordKind::Location) {
        report.extend(identity.check_undecoded(rec));
    }
    report.extend(check_duplicate_ids(store.locations()));
    for rec in store.locations() {
        report.extend(references.check_location_parent(rec));
    }
    report.extend(Hierarchy::from_records(schema_valid).check_cycles());

    for rec in store.maps() {
        report.extend(identity.check_record(RecordKind::Map, rec));
        report.extend(references.check_map(rec));
    }
    for rec in store.undecoded(RecordKind::Map) {
        report.extend(identity.check_undecoded(rec));
    }
    report.extend(check_duplicate_ids(store.maps()));

    if let Some(rec) = store.links() {
        report.extend(identity.check_schema(RecordKind::Links, rec));
        report.extend(references.check_links(rec));
        report.extend(check_cardinality(vocab, rec));
    }

    let graph = RelationGraph::build(store);
    report.extend(validate_edges(&graph.edges, store, vocab));

    tracing::info!(
        "[Pipeline] Checked {} files: {} errors, {} warnings",
        report.total_files_checked(),
        report.errors().count(),
        report.warnings().count()
    );
    Ok(report)
}

/// A validated snapshot: the records and everything found wrong with them.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub store: RecordStore,
    pub report: Report,
}

impl Compilation {
    pub fn passed(&self) -> bool {
        self.report.passed()
    }

    pub fn relation_graph(&self) -> RelationGraph {
        RelationGraph::build(&self.store)
    }

    /// Subgraph of the map with id `map_id`, `None` if no such map or the map has no root.
    pub fn location_graph(&self, map_id: &str) -> Option<LocationGraph> {
        let map = self.store.maps().iter().find(|rec| rec.record.id == map_id)?;
        Hierarchy::build(&self.store).extract_map(&map.record)
    }

    pub fn site_data(&self) -> SiteData {
        SiteData::build(&self.store)
    }
}

/// Result of a build: the report, and the files written when it passed.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub report: Report,
    pub written: Vec<PathBuf>,
}

impl BuildOutcome {
    pub fn passed(&self) -> bool {
        self.report.passed()
    }
}

/// Owns the fatal inputs of a corpus: configuration, vocabulary and schemas.
#[derive(Debug)]
pub struct CorpusCompiler {
    project: Project,
    vocab: Vocabulary,
    schemas: SchemaRegistry,
}

impl CorpusCompiler {
    /// Load configuration, vocabulary and schemas for the corpus at `root`. Any failure here
    /// aborts before a single record is read.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, LoreError> {
        let project = Project::load(root)?;
        tracing::debug!("[Pipeline] Opening corpus at {:?}", project.root());
        let vocab = Vocabulary::load(&project.vocab_path())?;
        let schemas = SchemaRegistry::load(&project)?;
        Ok(Self::new(project, vocab, schemas))
    }

    pub fn new(project: Project, vocab: Vocabulary, schemas: SchemaRegistry) -> Self {
        CorpusCompiler {
            project,
            vocab,
            schemas,
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    pub fn compile(&self) -> Result<Compilation, LoreError> {
        let store = RecordStore::load(&self.project)?;
        let report = validate_store(&store, &self.vocab, &self.schemas)?;
        Ok(Compilation { store, report })
    }

    /// Validate, then write site data into `output` (or the configured output directory).
    /// Nothing is written when the report contains errors.
    pub fn build(&self, output: Option<&Path>) -> Result<BuildOutcome, LoreError> {
        let compilation = self.compile()?;
        if !compilation.passed() {
            tracing::warn!(
                "[Pipeline] Validation failed with {} errors, not writing site data",
                compilation.report.errors().count()
            );
            return Ok(BuildOutcome {
                report: compilation.report,
                written: Vec::new(),
            });
        }
        let dir = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.project.output_dir());
        let written = OutputWriter::new(dir).write_site(&compilation.site_data())?;
        Ok(BuildOutcome {
            report: compilation.report,
            written,
        })
    }
}
