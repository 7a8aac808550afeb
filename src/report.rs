//! Report aggregation: every diagnostic from every validator, in emission order, plus the single
//! pass/fail verdict.

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

use crate::codec::{Diagnostic, RecordKind, Severity};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    diagnostics: Vec<Diagnostic>,
    files_checked: BTreeMap<RecordKind, usize>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn set_files_checked(&mut self, kind: RecordKind, count: usize) {
        self.files_checked.insert(kind, count);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// True iff no error was reported anywhere. Warnings never affect the outcome.
    pub fn passed(&self) -> bool {
        !self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn files_checked(&self, kind: RecordKind) -> usize {
        self.files_checked.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_files_checked(&self) -> usize {
        self.files_checked.values().sum()
    }
}

impl Extend<Diagnostic> for Report {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.diagnostics.extend(iter);
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let checked = RecordKind::ALL
            .iter()
            .map(|kind| format!("{} {}", self.files_checked(*kind), kind.label()))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(f, "Files checked: {checked}")?;

        for severity in [Severity::Info, Severity::Warning, Severity::Error] {
            for diagnostic in self.diagnostics.iter().filter(|d| d.severity == severity) {
                writeln!(f, "{diagnostic}")?;
            }
        }

        let warnings = self.count(Severity::Warning);
        if self.passed() {
            write!(f, "\n✓ All validations passed")?;
            if warnings > 0 {
                write!(f, " ({warnings} warning(s))")?;
            }
            writeln!(f)
        } else {
            writeln!(
                f,
                "\n✗ Validation failed with {} error(s), {warnings} warning(s)",
                self.count(Severity::Error)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_warnings_never_fail() {
        let mut report = Report::new();
        report.push(Diagnostic::warning("characters/a.yml", "Tag 'x' is not in prefix/value format"));
        report.push(Diagnostic::info("maps", "No map files found"));
        assert!(report.passed());
        assert_eq!(report.count(Severity::Warning), 1);

        report.push(Diagnostic::error("hierarchy", "cycle"));
        assert!(!report.passed());
        assert_eq!(report.errors().count(), 1);
    }

    #[test]
    fn test_display_groups_by_severity() {
        let mut report = Report::new();
        report.set_files_checked(RecordKind::Character, 2);
        report.extend([
            Diagnostic::error("graph", "Edge a__x__b: type 'x' is not in vocab.yml relationship_types"),
            Diagnostic::warning("characters/a.yml", "Tag 'x' is not in prefix/value format"),
        ]);
        let rendered = report.to_string();
        let warning_at = rendered.find("WARNING").unwrap();
        let error_at = rendered.find("ERROR").unwrap();
        assert!(warning_at < error_at);
        assert!(rendered.starts_with("Files checked: 2 character, 0 location, 0 map, 0 links"));
        assert!(rendered.contains("Validation failed with 1 error(s), 1 warning(s)"));
        // Emission order is kept in the underlying list.
        assert!(report.diagnostics()[0].is_error());
    }

    #[test]
    fn test_files_checked() {
        let mut report = Report::new();
        report.set_files_checked(RecordKind::Location, 7);
        report.set_files_checked(RecordKind::Map, 1);
        assert_eq!(report.files_checked(RecordKind::Location), 7);
        assert_eq!(report.files_checked(RecordKind::Links), 0);
        assert_eq!(report.total_files_checked(), 8);
    }
}
