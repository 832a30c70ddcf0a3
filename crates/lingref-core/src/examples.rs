//! Example and gloss numbering
//!
//! Independent of the heading pass: every example gets a 1-based running
//! ordinal in document order, and every sub-example a 1-based ordinal within
//! its parent, rendered as a letter (`1a`, `1b`, …).

use lingref_ast::{walk_mut, Document, Example, Node};
use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::index::{record_label, IndexEntry, LabelKind, ReferenceIndex};
use crate::label::example_marker;

/// Running example counter
#[derive(Debug, Default)]
pub struct ExampleNumbering {
    count: u32,
}

impl ExampleNumbering {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number every example in `doc` and index their markers.
    ///
    /// Returns the number of top-level examples.
    pub fn run(
        &mut self,
        doc: &mut Document,
        index: &mut ReferenceIndex,
        diagnostics: &mut Diagnostics,
    ) -> u32 {
        walk_mut(&mut doc.nodes, &mut |node| {
            if let Node::Example(example) = node {
                self.visit(example, index, diagnostics);
            }
        });
        debug!(examples = self.count, "numbered examples");
        self.count
    }

    fn visit(
        &mut self,
        example: &mut Example,
        index: &mut ReferenceIndex,
        diagnostics: &mut Diagnostics,
    ) {
        self.count += 1;
        let ordinal = self.count;
        example.ordinal = Some(ordinal);
        if let Some(ref id) = example.id {
            record_label(
                index,
                diagnostics,
                id,
                IndexEntry::new(example_marker(ordinal, None), LabelKind::Example),
            );
        }

        for (position, sub) in example.subexamples.iter_mut().enumerate() {
            let sub_ordinal = position as u32 + 1;
            sub.ordinal = Some(sub_ordinal);
            if let Some(ref id) = sub.id {
                record_label(
                    index,
                    diagnostics,
                    id,
                    IndexEntry::new(
                        example_marker(ordinal, Some(sub_ordinal)),
                        LabelKind::SubExample,
                    ),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingref_ast::{Group, Heading, SubExample};

    fn number(doc: &mut Document) -> (ReferenceIndex, u32) {
        let mut index = ReferenceIndex::new();
        let count = ExampleNumbering::new().run(doc, &mut index, &mut Diagnostics::new());
        (index, count)
    }

    #[test]
    fn test_examples_numbered_in_order() {
        let mut doc = Document::from_nodes(vec![
            Example::new("ex:a").into(),
            Heading::new(2, "s", "Section").into(),
            Group::new(vec![Example::new("ex:b").into()]).into(),
        ]);
        let (index, count) = number(&mut doc);
        assert_eq!(count, 2);
        assert_eq!(index.label("ex:a"), Some("1"));
        assert_eq!(index.label("ex:b"), Some("2"));
    }

    #[test]
    fn test_subexample_lettering() {
        let mut doc = Document::from_nodes(vec![Example::new("ex:1")
            .with_subexample(SubExample::new("ex:1a"))
            .with_subexample(SubExample::new("ex:1b"))
            .with_subexample(SubExample::new("ex:1c"))
            .into()]);
        let (index, _) = number(&mut doc);
        assert_eq!(index.label("ex:1a"), Some("1a"));
        assert_eq!(index.label("ex:1b"), Some("1b"));
        assert_eq!(index.label("ex:1c"), Some("1c"));
        assert_eq!(index.get("ex:1b").map(|e| e.kind), Some(LabelKind::SubExample));

        match &doc.nodes[0] {
            Node::Example(ex) => {
                assert_eq!(ex.ordinal, Some(1));
                let ordinals: Vec<Option<u32>> =
                    ex.subexamples.iter().map(|s| s.ordinal).collect();
                assert_eq!(ordinals, vec![Some(1), Some(2), Some(3)]);
            }
            other => panic!("Expected example, got {:?}", other),
        }
    }

    #[test]
    fn test_subexample_letters_scoped_to_parent() {
        let mut doc = Document::from_nodes(vec![
            Example::new("ex:1")
                .with_subexample(SubExample::new("ex:1a"))
                .into(),
            Example::new("ex:2")
                .with_subexample(SubExample::new("ex:2a"))
                .with_subexample(SubExample::new("ex:2b"))
                .into(),
        ]);
        let (index, _) = number(&mut doc);
        assert_eq!(index.label("ex:2a"), Some("2a"));
        assert_eq!(index.label("ex:2b"), Some("2b"));
    }

    #[test]
    fn test_examples_without_ids_still_counted() {
        let mut doc = Document::from_nodes(vec![
            Example::default().into(),
            Example::new("ex:second").into(),
        ]);
        let (index, count) = number(&mut doc);
        assert_eq!(count, 2);
        assert_eq!(index.len(), 1);
        assert_eq!(index.label("ex:second"), Some("2"));
    }

    #[test]
    fn test_renumbering_is_stable() {
        let mut doc = Document::from_nodes(vec![
            Example::new("ex:a").into(),
            Example::new("ex:b").into(),
        ]);
        let (first, _) = number(&mut doc);
        let (second, _) = number(&mut doc);
        assert_eq!(first, second);
    }
}
