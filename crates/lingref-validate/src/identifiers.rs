//! Identifier validators

use std::collections::HashMap;

use lingref_ast::Document;
use lingref_core::diagnostics::Diagnostic;

use crate::Validator;

/// Reports identifiers carried by more than one node
///
/// # Diagnostic Codes
///
/// - `DOC102`: duplicate identifier
pub struct DuplicateIdentifierValidator;

impl Validator for DuplicateIdentifierValidator {
    fn code(&self) -> &'static str {
        "DOC1"
    }

    fn name(&self) -> &'static str {
        "duplicate-identifier"
    }

    fn validate(&self, doc: &Document) -> Vec<Diagnostic> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order = Vec::new();
        for id in doc.identifiers() {
            let count = counts.entry(id).or_insert(0);
            if *count == 0 {
                order.push(id);
            }
            *count += 1;
        }

        order
            .into_iter()
            .filter_map(|id| {
                let count = counts[id];
                (count > 1).then(|| {
                    Diagnostic::warning(format!(
                        "Identifier '{}' is used by {} nodes",
                        id, count
                    ))
                    .with_code("DOC102")
                    .with_subject(id)
                    .with_help("References resolve to the last node carrying the identifier")
                })
            })
            .collect()
    }
}

/// Reports numbered headings without an identifier
///
/// Such headings get a label and a TOC entry, but nothing can link to them.
///
/// # Diagnostic Codes
///
/// - `DOC104`: heading without identifier (info)
pub struct MissingIdentifierValidator;

impl Validator for MissingIdentifierValidator {
    fn code(&self) -> &'static str {
        "DOC1"
    }

    fn name(&self) -> &'static str {
        "missing-identifier"
    }

    fn validate(&self, doc: &Document) -> Vec<Diagnostic> {
        doc.headings()
            .into_iter()
            .filter(|h| !h.is_chapter() && h.id.is_none())
            .map(|h| {
                Diagnostic::info(format!("Heading '{}' has no identifier", h.text))
                    .with_code("DOC104")
                    .with_help("Add an id so the section can be cross-referenced")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingref_ast::{Example, FloatKind, FloatObject, Heading, SubExample};

    #[test]
    fn test_unique_identifiers() {
        let doc = Document::from_nodes(vec![
            Heading::new(2, "sec:a", "A").into(),
            FloatObject::new(FloatKind::Table, "tab:a", "T").into(),
        ]);
        assert!(DuplicateIdentifierValidator.validate(&doc).is_empty());
    }

    #[test]
    fn test_duplicates_across_node_kinds() {
        let doc = Document::from_nodes(vec![
            Heading::new(2, "x", "A").into(),
            Example::new("ex:1")
                .with_subexample(SubExample::new("x"))
                .into(),
            FloatObject::new(FloatKind::Figure, "x", "F").into(),
            FloatObject::new(FloatKind::Figure, "ex:1", "G").into(),
        ]);
        let diags = DuplicateIdentifierValidator.validate(&doc);
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].subject.as_deref(), Some("x"));
        assert!(diags[0].message.contains("3 nodes"));
        assert_eq!(diags[1].subject.as_deref(), Some("ex:1"));
    }

    #[test]
    fn test_heading_without_id() {
        let doc = Document::from_nodes(vec![
            Heading::chapter("3", "Anchor without id").into(),
            Heading {
                depth: 2,
                id: None,
                text: "Anonymous".to_string(),
                number: None,
            }
            .into(),
        ]);
        let diags = MissingIdentifierValidator.validate(&doc);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code.as_deref(), Some("DOC104"));
        assert!(!diags[0].is_warning() && !diags[0].is_error());
    }
}
