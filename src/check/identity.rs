//! Schema + identity checks, run independently on every record.

use chrono::NaiveDate;
use regex::Regex;
use std::collections::BTreeMap;

use crate::{
    codec::{Diagnostic, RecordKind, SchemaCheck},
    error::LoreError,
    properties::{Character, Identified},
    store::{SourceRecord, Undecoded},
};

const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Runs structural conformance, id/filename agreement and date checks.
///
/// The schema check and the id check are independent: both always run, so a record with a bad
/// shape *and* a mismatched id yields both sets of errors.
pub struct IdentityValidator<'a> {
    schemas: &'a dyn SchemaCheck,
    date_pattern: Regex,
}

impl<'a> IdentityValidator<'a> {
    pub fn new(schemas: &'a dyn SchemaCheck) -> Result<Self, LoreError> {
        Ok(IdentityValidator {
            schemas,
            date_pattern: Regex::new(DATE_PATTERN)?,
        })
    }

    /// One error per schema violation, in the order the schema reports them.
    pub fn check_schema<T>(&self, kind: RecordKind, rec: &SourceRecord<T>) -> Vec<Diagnostic> {
        self.schemas
            .check(kind, &rec.raw)
            .into_iter()
            .map(|violation| {
                Diagnostic::error(&rec.scope, format!("Schema validation failed: {violation}"))
            })
            .collect()
    }

    /// Declared id must equal the file-derived id exactly (case-sensitive).
    pub fn check_id<T: Identified>(&self, rec: &SourceRecord<T>) -> Option<Diagnostic> {
        let declared = rec.record.id();
        if declared == rec.file_id {
            return None;
        }
        let file_name = rec
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| rec.scope.clone());
        Some(Diagnostic::error(
            &rec.scope,
            format!(
                "ID mismatch: file is '{file_name}' but id is '{declared}' (expected id: '{}')",
                rec.file_id
            ),
        ))
    }

    /// Schema conformance followed by the id check.
    pub fn check_record<T: Identified>(
        &self,
        kind: RecordKind,
        rec: &SourceRecord<T>,
    ) -> Vec<Diagnostic> {
        let mut diagnostics = self.check_schema(kind, rec);
        diagnostics.extend(self.check_id(rec));
        diagnostics
    }

    /// Checks for a record that parsed but did not type. The schema check always runs and the
    /// id check runs when the raw id is a string. If the schema finds nothing to explain the
    /// failure, the decode error itself is reported.
    pub fn check_undecoded(&self, rec: &SourceRecord<Undecoded>) -> Vec<Diagnostic> {
        let mut diagnostics = self.check_schema(rec.record.kind, rec);
        let schema_failed = !diagnostics.is_empty();
        if rec.record.id.is_some() {
            diagnostics.extend(self.check_id(rec));
        }
        if !schema_failed {
            diagnostics.push(Diagnostic::error(
                &rec.scope,
                format!("Failed to decode record: {}", rec.record.error),
            ));
        }
        diagnostics
    }

    /// `meta.created` / `meta.updated` must be real `YYYY-MM-DD` dates when present.
    pub fn check_dates(&self, rec: &SourceRecord<Character>) -> Vec<Diagnostic> {
        let meta = &rec.record.meta;
        [("created", &meta.created), ("updated", &meta.updated)]
            .into_iter()
            .filter_map(|(field, value)| {
                let value = value.as_deref().filter(|v| !v.is_empty())?;
                if !self.date_pattern.is_match(value) {
                    Some(Diagnostic::error(
                        &rec.scope,
                        format!("meta.{field} '{value}' is not in YYYY-MM-DD format"),
                    ))
                } else if NaiveDate::parse_from_str(value, DATE_FORMAT).is_err() {
                    Some(Diagnostic::error(
                        &rec.scope,
                        format!("meta.{field} '{value}' is not a valid date"),
                    ))
                } else {
                    None
                }
            })
            .collect()
    }
}

/// Ids are unique within a kind. Every record re-declaring an id already seen is an error.
pub fn check_duplicate_ids<T: Identified>(records: &[SourceRecord<T>]) -> Vec<Diagnostic> {
    let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
    let mut diagnostics = Vec::new();
    for rec in records {
        let id = rec.record.id();
        if id.is_empty() {
            continue;
        }
        if let Some(first) = seen.get(id) {
            diagnostics.push(Diagnostic::error(
                &rec.scope,
                format!("duplicate id '{id}' (already declared by {first})"),
            ));
        } else {
            seen.insert(id, &rec.scope);
        }
    }
    diagnostics
}
