//! Diagnostic types produced while validating a corpus.
//!
//! Every non-fatal finding, from a record that failed to decode to a cycle in the location
//! hierarchy, is a [`Diagnostic`]. Fatal conditions are [`LoreError`](crate::LoreError)s and never
//! show up here.

use serde::{Deserialize, Serialize};

/// How much a diagnostic matters to the overall outcome.
///
/// Only [`Severity::Error`] fails a run. Warnings and info messages are reported but never change
/// the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Info => write!(f, "INFO"),
        }
    }
}

/// A single finding, attributed either to a file (path relative to the corpus root) or to a
/// corpus-wide scope such as `graph` or `hierarchy`.
///
/// # Examples
///
/// ```
/// # use lore_core::codec::{Diagnostic, Severity};
/// let diagnostic = Diagnostic::error(
///     "characters/alice.yml",
///     "relationships[0].target_id 'carol' does not exist in characters/ directory",
/// );
/// assert_eq!(diagnostic.severity, Severity::Error);
/// assert!(diagnostic.is_error());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// File path or corpus scope label
    pub scope: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, scope: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic {
            severity,
            scope: scope.into(),
            message: message.into(),
        }
    }

    /// Create an error diagnostic
    pub fn error(scope: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, scope, message)
    }

    /// Create a warning diagnostic
    pub fn warning(scope: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, scope, message)
    }

    /// Create an info diagnostic
    pub fn info(scope: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, scope, message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.scope, self.message)
    }
}
