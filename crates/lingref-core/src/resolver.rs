//! Cross-reference resolution
//!
//! Runs after the walk and example numbering have filled the index, so
//! forward references resolve exactly like backward ones. Every reference
//! node gets its display text and link target rewritten; a miss renders the
//! configured placeholder and is reported, and resolution carries on.

use lingref_ast::{walk_mut, Document, Node, Reference, ReferenceKind};
use tracing::{debug, warn};

use crate::config::ReferenceSettings;
use crate::diagnostics::{codes, Diagnostic, Diagnostics};
use crate::index::{IndexEntry, ReferenceIndex};

/// Counts from one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub resolved: usize,
    pub unresolved: usize,
}

/// Rewrites reference nodes from a finished index
pub struct Resolver<'a> {
    index: &'a ReferenceIndex,
    settings: &'a ReferenceSettings,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a ReferenceIndex, settings: &'a ReferenceSettings) -> Self {
        Self { index, settings }
    }

    /// Resolve every reference in `doc`
    pub fn resolve(&self, doc: &mut Document, diagnostics: &mut Diagnostics) -> ResolveStats {
        let mut stats = ResolveStats::default();
        walk_mut(&mut doc.nodes, &mut |node| {
            if let Node::Reference(reference) = node {
                if self.resolve_reference(reference, diagnostics) {
                    stats.resolved += 1;
                } else {
                    stats.unresolved += 1;
                }
            }
        });
        debug!(
            resolved = stats.resolved,
            unresolved = stats.unresolved,
            "resolved references"
        );
        stats
    }

    /// Rewrite one reference. Returns `false` if any endpoint was missing.
    pub fn resolve_reference(&self, reference: &mut Reference, diagnostics: &mut Diagnostics) -> bool {
        let start = self.lookup(reference, &reference.target, diagnostics);
        let mut complete = start.is_some();
        let mut body = self.endpoint_label(start);

        if let Some(ref end) = reference.end {
            let finish = self.lookup(reference, end, diagnostics);
            complete &= finish.is_some();
            body.push_str(&self.settings.range_separator);
            body.push_str(&self.endpoint_label(finish));
        }
        if let Some(ref suffix) = reference.suffix {
            body.push_str(suffix);
        }

        reference.text = match reference.kind {
            ReferenceKind::Crossref => body,
            ReferenceKind::Example => format!("({})", body),
        };
        reference.href = Some(self.href(reference, start));
        complete
    }

    fn endpoint_label(&self, entry: Option<&IndexEntry>) -> String {
        match entry {
            Some(entry) => entry.label.clone(),
            None => self.settings.missing_marker.clone(),
        }
    }

    fn href(&self, reference: &Reference, start: Option<&IndexEntry>) -> String {
        let location = match reference.kind {
            ReferenceKind::Crossref => start.and_then(|e| e.location.as_deref()),
            ReferenceKind::Example => None,
        };
        match location {
            Some(location) => format!("/{}#{}", location, reference.target),
            None => format!("#{}", reference.target),
        }
    }

    fn lookup(
        &self,
        reference: &Reference,
        id: &str,
        diagnostics: &mut Diagnostics,
    ) -> Option<&'a IndexEntry> {
        let Some(entry) = self.index.get(id) else {
            warn!(id, "unresolved reference");
            diagnostics.push(
                Diagnostic::error(format!("Reference target not found: {}", id))
                    .with_code(codes::MISSING_REFERENCE_TARGET)
                    .with_subject(id)
                    .with_help("Check the identifier, or add a label to the intended target"),
            );
            return None;
        };

        let expects_example = reference.kind == ReferenceKind::Example;
        if entry.kind.is_example() != expects_example {
            let (used, wanted) = if expects_example {
                ("an example reference", "a cross-reference")
            } else {
                ("a cross-reference", "an example reference")
            };
            diagnostics.push(
                Diagnostic::warning(format!(
                    "'{}' ({}) is referenced with {}",
                    id, entry.label, used
                ))
                .with_code(codes::REFERENCE_KIND_MISMATCH)
                .with_subject(id)
                .with_help(format!("Use {} for this target", wanted)),
            );
        }
        Some(entry)
    }
}
