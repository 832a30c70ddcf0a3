//! Heading structure validators
//!
//! Numbered sections start at depth 2 below an optional depth-1 chapter
//! anchor. Skipping a depth still numbers (the skipped counter stays at 0,
//! giving labels like `2.0.1.`), so it is reported here instead.

use lingref_ast::Document;
use lingref_core::diagnostics::Diagnostic;

use crate::Validator;

/// Depth a document implicitly starts at: the chapter anchor level
const ANCHOR_DEPTH: u8 = 1;

/// Validates section heading hierarchy
///
/// # Diagnostic Codes
///
/// - `DOC101`: Section level jump detected
///
/// # Example
///
/// ```
/// use lingref_ast::{Document, Heading};
/// use lingref_validate::{SectionHierarchyValidator, Validator};
///
/// let doc = Document::from_nodes(vec![
///     Heading::chapter("1", "Introduction").into(),
///     Heading::new(2, "sec:aims", "Aims").into(),
/// ]);
/// assert!(SectionHierarchyValidator.validate(&doc).is_empty());
/// ```
pub struct SectionHierarchyValidator;

impl Validator for SectionHierarchyValidator {
    fn code(&self) -> &'static str {
        "DOC1"
    }

    fn name(&self) -> &'static str {
        "section-hierarchy"
    }

    fn validate(&self, doc: &Document) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut current = ANCHOR_DEPTH;
        let mut seen_section = false;

        for heading in doc.headings() {
            if heading.is_chapter() {
                current = ANCHOR_DEPTH;
                continue;
            }

            if heading.depth > current.saturating_add(1) {
                let message = if seen_section {
                    format!(
                        "Section level jump detected (Level {} -> Level {}). Missing Level {}?",
                        current,
                        heading.depth,
                        current.saturating_add(1)
                    )
                } else {
                    format!(
                        "First section is at heading level {} (expected level 2)",
                        heading.depth
                    )
                };
                let mut diagnostic = Diagnostic::warning(message)
                    .with_code("DOC101")
                    .with_help(
                        "Skipped levels are numbered 0. Add the intermediate heading or adjust the level.",
                    )
                    .with_note(format!("Heading: '{}'", heading.text));
                if let Some(ref id) = heading.id {
                    diagnostic = diagnostic.with_subject(id.clone());
                }
                diagnostics.push(diagnostic);
            }

            seen_section = true;
            current = heading.depth;
        }

        diagnostics
    }
}

/// Reports documents with more than one depth-1 heading
///
/// # Diagnostic Codes
///
/// - `DOC103`: additional chapter anchor
pub struct ChapterAnchorValidator;

impl Validator for ChapterAnchorValidator {
    fn code(&self) -> &'static str {
        "DOC1"
    }

    fn name(&self) -> &'static str {
        "chapter-anchor"
    }

    fn validate(&self, doc: &Document) -> Vec<Diagnostic> {
        let headings = doc.headings();
        let mut anchors = headings.iter().filter(|h| h.is_chapter());
        let Some(first) = anchors.next() else {
            return Vec::new();
        };

        anchors
            .map(|extra| {
                Diagnostic::warning(format!(
                    "Additional top-level heading '{}'; only '{}' sets the chapter number",
                    extra.text, first.text
                ))
                .with_code("DOC103")
                .with_help("Split the document, or demote the heading to level 2")
            })
            .collect()
    }
}
