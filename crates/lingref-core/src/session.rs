//! Numbering session
//!
//! Owns the configuration for a run and sequences the passes:
//!
//! 1. depth screening; any out-of-range heading rejects the document
//!    before it is touched
//! 2. chapter prefix discovery
//! 3. the heading/float walk, which also builds the TOC
//! 4. example numbering
//! 5. reference locations from the configuration
//! 6. reference resolution
//!
//! Nothing is shared between runs, so a session can number any number of
//! documents.

use lingref_ast::Document;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::NumberingConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::examples::ExampleNumbering;
use crate::index::ReferenceIndex;
use crate::resolver::Resolver;
use crate::toc::Toc;
use crate::walker::{check_depths, read_chapter_prefix, DocumentWalker};

/// Everything a run produces besides the mutated document
#[derive(Debug, Clone, Default, Serialize)]
pub struct NumberingOutcome {
    /// Identifier → label table
    pub index: ReferenceIndex,
    pub toc: Toc,
    pub diagnostics: Diagnostics,
}

impl NumberingOutcome {
    /// Whether any error-level diagnostic was reported
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// A configured numbering pass
#[derive(Debug, Clone, Default)]
pub struct NumberingSession {
    config: NumberingConfig,
}

impl NumberingSession {
    pub fn new(config: NumberingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NumberingConfig {
        &self.config
    }

    /// Number `doc` in place.
    ///
    /// Fails with [`Error::Rejected`] if any heading depth is unsupported; in
    /// that case `doc` is left unmodified. Every other problem is reported
    /// in the outcome's diagnostics.
    pub fn run(&self, doc: &mut Document) -> Result<NumberingOutcome> {
        let rejected = check_depths(doc);
        if !rejected.is_empty() {
            info!(errors = rejected.len(), "document rejected");
            return Err(Error::Rejected {
                diagnostics: rejected,
            });
        }

        let mut diagnostics = Diagnostics::new();
        let mut index = ReferenceIndex::new();

        let prefix = read_chapter_prefix(doc, &mut diagnostics);
        debug!(prefix = %prefix, "chapter prefix");

        let mut walker = DocumentWalker::new(&self.config, prefix);
        walker.walk(doc, &mut index, &mut diagnostics)?;
        let toc = walker.finish();

        ExampleNumbering::new().run(doc, &mut index, &mut diagnostics);

        for (id, location) in &self.config.references.locations {
            if !index.set_location(id, location.as_str()) {
                debug!(id = %id, "location configured for unknown identifier");
            }
        }

        Resolver::new(&index, &self.config.references).resolve(doc, &mut diagnostics);

        info!(
            labels = index.len(),
            toc_entries = toc.count(),
            errors = diagnostics.error_count(),
            warnings = diagnostics.warning_count(),
            "numbering complete"
        );

        Ok(NumberingOutcome {
            index,
            toc,
            diagnostics,
        })
    }
}

/// Number `doc` with the given configuration
pub fn number_document(doc: &mut Document, config: &NumberingConfig) -> Result<NumberingOutcome> {
    NumberingSession::new(config.clone()).run(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::codes;
    use lingref_ast::{Example, FloatKind, FloatObject, Heading, Node, Reference, SubExample};

    fn sample() -> Document {
        Document::from_nodes(vec![
            Heading::chapter("4", "Morphology").into(),
            Reference::crossref("sec:verbs").into(),
            Heading::new(2, "sec:nouns", "Nouns").into(),
            FloatObject::new(FloatKind::Table, "tab:case", "Case endings").into(),
            Example::new("ex:1")
                .with_subexample(SubExample::new("ex:1a"))
                .with_subexample(SubExample::new("ex:1b"))
                .into(),
            Heading::new(2, "sec:verbs", "Verbs").into(),
            Reference::example("ex:1a").with_end("ex:1b").into(),
        ])
    }

    fn reference_texts(doc: &Document) -> Vec<String> {
        doc.flatten()
            .into_iter()
            .filter_map(|n| match n {
                Node::Reference(r) => Some(r.text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_full_run() {
        let mut doc = sample();
        let outcome = NumberingSession::default().run(&mut doc).unwrap();
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.index.label("sec:verbs"), Some("4.2."));
        assert_eq!(outcome.index.label("tab:case"), Some("Table 1"));
        assert_eq!(outcome.index.label("ex:1b"), Some("1b"));
        assert_eq!(reference_texts(&doc), vec!["4.2.", "(1a-1b)"]);
        assert_eq!(outcome.toc.count(), 2);
    }

    #[test]
    fn test_rejected_document_left_untouched() {
        let mut doc = Document::from_nodes(vec![
            Heading::new(2, "a", "Fine").into(),
            Heading::new(9, "b", "Too deep").into(),
            Reference::crossref("a").into(),
        ]);
        let before = doc.clone();
        let err = NumberingSession::default().run(&mut doc).unwrap_err();
        match err {
            Error::Rejected { diagnostics } => {
                assert_eq!(diagnostics.len(), 1);
                assert!(diagnostics[0].has_code(codes::DEPTH_OUT_OF_RANGE));
            }
            other => panic!("Expected rejection, got {:?}", other),
        }
        assert_eq!(doc, before);
    }

    #[test]
    fn test_locations_applied() {
        let mut config = NumberingConfig::default();
        config
            .references
            .locations
            .insert("sec:verbs".to_string(), "morphology".to_string());
        let mut doc = sample();
        number_document(&mut doc, &config).unwrap();
        let hrefs: Vec<Option<String>> = doc
            .flatten()
            .into_iter()
            .filter_map(|n| match n {
                Node::Reference(r) => Some(r.href.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            hrefs,
            vec![
                Some("/morphology#sec:verbs".to_string()),
                Some("#ex:1a".to_string())
            ]
        );
    }

    #[test]
    fn test_second_run_is_noop() {
        let mut doc = sample();
        let session = NumberingSession::default();
        let first = session.run(&mut doc).unwrap();
        let once = doc.clone();
        let second = session.run(&mut doc).unwrap();
        assert_eq!(doc, once);
        assert_eq!(first.index, second.index);
    }

    #[test]
    fn test_outcome_serializes() {
        let mut doc = sample();
        let outcome = NumberingSession::default().run(&mut doc).unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["index"]["sec:nouns"]["label"], "4.1.");
        assert!(json["diagnostics"].as_array().unwrap().is_empty());
    }
}
