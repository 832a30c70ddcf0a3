//! Diagnostics reported by the numbering pass
//!
//! Every condition a document author can fix (an unresolved reference, a
//! duplicated identifier, an unsupported heading depth) is reported as a
//! [`Diagnostic`] instead of aborting, so a single run surfaces all of them.

use serde::{Deserialize, Serialize};

/// Diagnostic codes emitted by the numbering pass
pub mod codes {
    /// A reference points at an identifier the walk never visited
    pub const MISSING_REFERENCE_TARGET: &str = "REF001";
    /// More than one chapter anchor heading
    pub const AMBIGUOUS_CHAPTER_ANCHOR: &str = "REF002";
    /// Heading depth outside the supported nesting range
    pub const DEPTH_OUT_OF_RANGE: &str = "REF003";
    /// The same identifier labels two nodes
    pub const DUPLICATE_IDENTIFIER: &str = "REF004";
    /// A reference whose convention does not match its target (example vs. section/float)
    pub const REFERENCE_KIND_MISMATCH: &str = "REF005";
}

/// A diagnostic message from the numbering pass
///
/// # Example
///
/// ```
/// use lingref_core::diagnostics::{Diagnostic, Severity};
///
/// let diag = Diagnostic::new(Severity::Error, "Unresolved reference")
///     .with_code("REF001")
///     .with_subject("sec:intro")
///     .with_help("Check that the target identifier exists");
/// assert!(diag.is_error());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level of the diagnostic
    pub severity: Severity,

    /// The diagnostic message
    pub message: String,

    /// Optional diagnostic code (e.g., "REF001")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Identifier of the node the diagnostic is about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Optional file path of the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Additional help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    /// Related notes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Warning, indicates a potential issue
    Warning,

    /// Error, indicates a problem that should be fixed
    Error,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            code: None,
            subject: None,
            file: None,
            help: None,
            notes: Vec::new(),
        }
    }

    /// Create an error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Create an info diagnostic
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// Set the diagnostic code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the identifier the diagnostic is about
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the file path
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Add a note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Check if this is an error-level diagnostic
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    /// Check if this is a warning-level diagnostic
    pub fn is_warning(&self) -> bool {
        matches!(self.severity, Severity::Warning)
    }

    /// Check whether the diagnostic carries the given code
    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: severity[code]: message
        write!(f, "{}", self.severity)?;
        if let Some(ref code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)?;

        if let Some(ref file) = self.file {
            write!(f, "\n  --> {}", file)?;
            if let Some(ref subject) = self.subject {
                write!(f, "#{}", subject)?;
            }
        }

        if let Some(ref help) = self.help {
            write!(f, "\n  = help: {}", help)?;
        }

        for note in &self.notes {
            write!(f, "\n  = note: {}", note)?;
        }

        Ok(())
    }
}

/// A collection of diagnostics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }

    /// Get the number of errors
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Get the number of warnings
    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }

    /// Diagnostics carrying the given code
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics.iter().filter(move |d| d.has_code(code))
    }

    /// Get all diagnostics
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get the count
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.diagnostics.extend(iter);
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_builder() {
        let diag = Diagnostic::error("Unresolved reference")
            .with_code(codes::MISSING_REFERENCE_TARGET)
            .with_subject("tab:vowels")
            .with_file("phonology.html")
            .with_help("Add the missing label or fix the reference");

        assert!(diag.is_error());
        assert!(diag.has_code("REF001"));
        assert_eq!(diag.subject.as_deref(), Some("tab:vowels"));
        assert!(diag.help.is_some());
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_diagnostics_collection() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::error("Error 1").with_code("REF001"));
        diags.push(Diagnostic::warning("Warning 1").with_code("REF004"));
        diags.push(Diagnostic::error("Error 2").with_code("REF001"));

        assert!(diags.has_errors());
        assert_eq!(diags.error_count(), 2);
        assert_eq!(diags.warning_count(), 1);
        assert_eq!(diags.with_code("REF001").count(), 2);
        assert_eq!(diags.len(), 3);
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error("Reference target not found: sec:x")
            .with_code("REF001")
            .with_file("ch4.html")
            .with_subject("sec:x")
            .with_help("Check the identifier");

        let display = format!("{}", diag);
        assert!(display.contains("error[REF001]"));
        assert!(display.contains("ch4.html#sec:x"));
        assert!(display.contains("help: Check the identifier"));
    }

    #[test]
    fn test_diagnostic_serialize() {
        let diag = Diagnostic::warning("Duplicate identifier").with_code("REF004");

        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"severity\":\"warning\""));
        assert!(json.contains("\"code\":\"REF004\""));
        assert!(!json.contains("subject"));

        let restored: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, diag);
    }

    #[test]
    fn test_diagnostics_serialize_as_list() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::info("note"));
        let json = serde_json::to_string(&diags).unwrap();
        assert!(json.starts_with('['));
    }
}
