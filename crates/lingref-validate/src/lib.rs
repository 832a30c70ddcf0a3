//! lingref-validate - Structural document checks
//!
//! Validators look at a document tree before it is numbered and report
//! authoring problems that numbering would silently work around: skipped
//! heading levels, reused identifiers, several chapter anchors, headings no
//! reference can point at.
//!
//! # Architecture
//!
//! Each check implements the [`Validator`] trait. The [`ValidationEngine`]
//! runs every registered validator and collects their diagnostics.
//!
//! # Example
//!
//! ```
//! use lingref_ast::{Document, Heading};
//! use lingref_validate::{SectionHierarchyValidator, ValidationEngine};
//!
//! let mut engine = ValidationEngine::new();
//! engine.add_validator(Box::new(SectionHierarchyValidator));
//!
//! let doc = Document::from_nodes(vec![
//!     Heading::new(2, "sec:a", "Clauses").into(),
//!     Heading::new(4, "sec:b", "Relative clauses").into(),
//! ]);
//! let diagnostics = engine.validate(&doc);
//! assert_eq!(diagnostics.len(), 1);
//! ```

pub mod hierarchy;
pub mod identifiers;

use lingref_ast::Document;
use lingref_core::diagnostics::Diagnostic;
use serde::Serialize;

pub use hierarchy::{ChapterAnchorValidator, SectionHierarchyValidator};
pub use identifiers::{DuplicateIdentifierValidator, MissingIdentifierValidator};

/// Trait for document validators
///
/// Each validator has a unique code prefix shared by its diagnostics.
pub trait Validator: Send + Sync {
    /// The validator's code prefix (e.g., "DOC1" for document structure)
    fn code(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str {
        "unnamed"
    }

    /// Validate the document and return any diagnostics
    fn validate(&self, doc: &Document) -> Vec<Diagnostic>;
}

/// Result of running every validator over one document
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Names of the validators that ran
    pub validators: Vec<&'static str>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }
}

/// Runs a set of validators
pub struct ValidationEngine {
    validators: Vec<Box<dyn Validator>>,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationEngine {
    /// Create an engine without validators
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    /// Create an engine with every built-in validator
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_validator(Box::new(SectionHierarchyValidator));
        engine.add_validator(Box::new(ChapterAnchorValidator));
        engine.add_validator(Box::new(DuplicateIdentifierValidator));
        engine.add_validator(Box::new(MissingIdentifierValidator));
        engine
    }

    pub fn add_validator(&mut self, validator: Box<dyn Validator>) {
        self.validators.push(validator);
    }

    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }

    pub fn validator_names(&self) -> Vec<&'static str> {
        self.validators.iter().map(|v| v.name()).collect()
    }

    /// Run all validators, in registration order
    pub fn validate(&self, doc: &Document) -> Vec<Diagnostic> {
        self.validators
            .iter()
            .flat_map(|validator| validator.validate(doc))
            .collect()
    }

    /// Run all validators and record which ones ran
    pub fn report(&self, doc: &Document) -> ValidationReport {
        ValidationReport {
            validators: self.validator_names(),
            diagnostics: self.validate(doc),
        }
    }

    pub fn has_errors(&self, doc: &Document) -> bool {
        self.validate(doc).iter().any(|d| d.is_error())
    }

    /// Whether any validator reports anything at all
    pub fn has_issues(&self, doc: &Document) -> bool {
        !self.validate(doc).is_empty()
    }
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
