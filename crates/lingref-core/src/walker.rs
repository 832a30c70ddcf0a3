//! Document walker
//!
//! A single left-to-right, depth-first pass that numbers headings and
//! floating objects, records their labels in the reference index and feeds
//! the TOC builder. Source order is authoritative; nothing is re-sorted.

use lingref_ast::{walk_mut, Document, FloatObject, Heading, Node};
use regex::Regex;
use tracing::{debug, warn};

use crate::config::NumberingConfig;
use crate::counter::{FloatCounters, SectionCounters};
use crate::diagnostics::{codes, Diagnostic, Diagnostics};
use crate::error::{Error, Result};
use crate::index::{record_label, IndexEntry, LabelKind, ReferenceIndex};
use crate::label::{
    chapter_prefix, format_float_label, format_section_label, prefix_once, stale_float_prefix,
    stale_section_prefix,
};
use crate::toc::{Toc, TocBuilder};

/// Read the chapter prefix from the first depth-1 heading.
///
/// A document without a chapter anchor, or whose anchor has no explicit
/// number, gets an empty prefix. Additional chapter anchors are reported as
/// ambiguous and otherwise ignored.
pub fn read_chapter_prefix(doc: &Document, diagnostics: &mut Diagnostics) -> String {
    let chapters: Vec<&Heading> = doc.headings().into_iter().filter(|h| h.is_chapter()).collect();
    let Some(first) = chapters.first() else {
        return String::new();
    };

    if chapters.len() > 1 {
        warn!(count = chapters.len(), "multiple chapter anchors, using the first");
        diagnostics.push(
            Diagnostic::warning(format!(
                "Found {} top-level headings; '{}' is used as the chapter anchor",
                chapters.len(),
                first.text
            ))
            .with_code(codes::AMBIGUOUS_CHAPTER_ANCHOR)
            .with_help("A document should contain a single top-level heading"),
        );
    }

    first
        .number
        .as_deref()
        .map(chapter_prefix)
        .unwrap_or_default()
}

/// Collect every heading whose depth the counter model cannot represent
pub fn check_depths(doc: &Document) -> Vec<Diagnostic> {
    doc.headings()
        .into_iter()
        .filter(|h| !h.is_chapter() && SectionCounters::check_depth(h.depth).is_err())
        .map(|h| {
            let mut diag = Diagnostic::error(format!(
                "Heading '{}' has depth {}, outside the supported range 2-6",
                h.text, h.depth
            ))
            .with_code(codes::DEPTH_OUT_OF_RANGE);
            if let Some(ref id) = h.id {
                diag = diag.with_subject(id.clone());
            }
            diag
        })
        .collect()
}

/// Heading and float numbering state for one document
pub struct DocumentWalker<'a> {
    config: &'a NumberingConfig,
    prefix: String,
    sections: SectionCounters,
    floats: FloatCounters,
    toc: TocBuilder,
    chapter_seen: bool,
    section_stale: Option<&'static Regex>,
    float_stale: Option<Regex>,
}

impl<'a> DocumentWalker<'a> {
    pub fn new(config: &'a NumberingConfig, prefix: impl Into<String>) -> Self {
        let strip = config.sections.strip_stale;
        Self {
            config,
            prefix: prefix.into(),
            sections: SectionCounters::with_start(config.sections.start),
            floats: FloatCounters::new(),
            toc: TocBuilder::new(),
            chapter_seen: false,
            section_stale: strip.then(stale_section_prefix),
            float_stale: if strip {
                stale_float_prefix(&config.floats.separator).ok()
            } else {
                None
            },
        }
    }

    /// Number every heading and float in `doc`.
    ///
    /// Stops at the first heading the counter model rejects; callers are
    /// expected to screen depths with [`check_depths`] first.
    pub fn walk(
        &mut self,
        doc: &mut Document,
        index: &mut ReferenceIndex,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let mut failure: Option<Error> = None;
        walk_mut(&mut doc.nodes, &mut |node| {
            if failure.is_some() {
                return;
            }
            let visited = match node {
                Node::Heading(heading) => self.visit_heading(heading, index, diagnostics),
                Node::Float(float) => {
                    self.visit_float(float, index, diagnostics);
                    Ok(())
                }
                _ => Ok(()),
            };
            if let Err(e) = visited {
                failure = Some(e);
            }
        });
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Finish the walk and hand back the table of contents
    pub fn finish(self) -> Toc {
        self.toc.finish()
    }

    fn visit_heading(
        &mut self,
        heading: &mut Heading,
        index: &mut ReferenceIndex,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        if heading.is_chapter() {
            self.visit_chapter(heading);
            return Ok(());
        }

        self.sections.bump(heading.depth)?;
        let path = self.sections.current_path(heading.depth)?;
        let label = format_section_label(&self.prefix, &path);

        if let Some(text) = prefix_once(&heading.text, &label, " ", self.section_stale) {
            heading.text = text;
        }
        debug!(depth = heading.depth, label = %label, "numbered heading");

        if self.config.toc.enabled {
            self.toc
                .push(heading.depth, heading.text.clone(), heading.id.clone());
        }
        if let Some(ref id) = heading.id {
            record_label(index, diagnostics, id, IndexEntry::new(label, LabelKind::Section));
        }
        Ok(())
    }

    fn visit_chapter(&mut self, heading: &mut Heading) {
        // Only the first chapter anchor supplies the prefix and is numbered
        if std::mem::replace(&mut self.chapter_seen, true) {
            return;
        }
        if !self.config.sections.number_chapter || self.prefix.is_empty() {
            return;
        }
        if let Some(text) = prefix_once(&heading.text, &self.prefix, " ", self.section_stale) {
            heading.text = text;
        }
    }

    fn visit_float(
        &mut self,
        float: &mut FloatObject,
        index: &mut ReferenceIndex,
        diagnostics: &mut Diagnostics,
    ) {
        let ordinal = self.floats.next(float.kind);
        let label = format_float_label(float.kind, ordinal);
        if let Some(caption) = prefix_once(
            &float.caption,
            &label,
            &self.config.floats.separator,
            self.float_stale.as_ref(),
        ) {
            float.caption = caption;
        }
        debug!(kind = %float.kind, label = %label, "numbered float");

        if let Some(ref id) = float.id {
            record_label(index, diagnostics, id, IndexEntry::new(label, float.kind.into()));
        }
    }
}
