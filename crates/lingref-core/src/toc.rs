//! Table of contents
//!
//! The builder runs in lock-step with the heading walk. It keeps a frontier
//! of the most recent entry at each depth; a new entry attaches under the
//! deepest open entry shallower than itself, and every frontier slot at its
//! depth or deeper is closed. This mirrors the counter reset rule, so the
//! finished forest nests exactly like the labels do.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};

/// One outline entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Numbered heading text
    pub text: String,
    /// Anchor of the heading, if it has an identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TocEntry>,
}

impl TocEntry {
    /// Entries without children need no expand/collapse control
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A finished outline forest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Toc {
    pub entries: Vec<TocEntry>,
}

impl Toc {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of entries at every level
    pub fn count(&self) -> usize {
        fn count(entries: &[TocEntry]) -> usize {
            entries.iter().map(|e| 1 + count(&e.children)).sum()
        }
        count(&self.entries)
    }

    /// Render as navigation markup.
    ///
    /// Each entry becomes `<li id="nav-ID"><a href="#ID">text</a>…</li>`;
    /// children go into an `<ol class="subitems">`, which is omitted for
    /// leaves.
    pub fn to_html(&self) -> String {
        let mut out = String::from("<ol class=\"toc\">\n");
        for entry in &self.entries {
            render_entry(entry, 1, &mut out);
        }
        out.push_str("</ol>\n");
        out
    }
}

fn render_entry(entry: &TocEntry, level: usize, out: &mut String) {
    let indent = "  ".repeat(level);
    let text = escape(entry.text.as_str());
    match entry.target {
        Some(ref target) => {
            let target = escape(target.as_str());
            let _ = write!(
                out,
                "{}<li id=\"nav-{}\"><a href=\"#{}\">{}</a>",
                indent, target, target, text
            );
        }
        None => {
            let _ = write!(out, "{}<li><a>{}</a>", indent, text);
        }
    }
    if entry.is_leaf() {
        out.push_str("</li>\n");
        return;
    }
    out.push('\n');
    let _ = writeln!(out, "{}  <ol class=\"subitems\">", indent);
    for child in &entry.children {
        render_entry(child, level + 2, out);
    }
    let _ = writeln!(out, "{}  </ol>", indent);
    let _ = writeln!(out, "{}</li>", indent);
}

#[derive(Debug)]
struct PendingEntry {
    text: String,
    target: Option<String>,
    children: Vec<usize>,
}

/// Incremental TOC construction
#[derive(Debug, Default)]
pub struct TocBuilder {
    entries: Vec<PendingEntry>,
    roots: Vec<usize>,
    /// depth → index of the open entry at that depth
    frontier: BTreeMap<u8, usize>,
}

impl TocBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry for a heading at `depth`
    pub fn push(&mut self, depth: u8, text: impl Into<String>, target: Option<String>) {
        let index = self.entries.len();
        self.entries.push(PendingEntry {
            text: text.into(),
            target,
            children: Vec::new(),
        });

        match self.frontier.range(..depth).next_back() {
            Some((_, &parent)) => self.entries[parent].children.push(index),
            None => self.roots.push(index),
        }

        // Close this depth and everything deeper, then open the new entry
        self.frontier.retain(|&open, _| open < depth);
        self.frontier.insert(depth, index);
    }

    /// Number of entries added so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Assemble the nested forest
    pub fn finish(self) -> Toc {
        let mut slots: Vec<Option<PendingEntry>> = self.entries.into_iter().map(Some).collect();
        let entries = self
            .roots
            .iter()
            .filter_map(|&root| assemble(root, &mut slots))
            .collect();
        Toc { entries }
    }
}

fn assemble(index: usize, slots: &mut [Option<PendingEntry>]) -> Option<TocEntry> {
    let pending = slots.get_mut(index)?.take()?;
    let children = pending
        .children
        .iter()
        .filter_map(|&child| assemble(child, slots))
        .collect();
    Some(TocEntry {
        text: pending.text,
        target: pending.target,
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(depths: &[u8]) -> Toc {
        let mut builder = TocBuilder::new();
        for (i, &depth) in depths.iter().enumerate() {
            builder.push(depth, format!("h{}", i), Some(format!("s{}", i)));
        }
        builder.finish()
    }

    #[test]
    fn test_nesting_fidelity() {
        let toc = build(&[2, 3, 3, 2, 3]);
        assert_eq!(toc.entries.len(), 2);
        assert_eq!(toc.entries[0].children.len(), 2);
        assert_eq!(toc.entries[1].children.len(), 1);
        assert_eq!(toc.entries[1].children[0].text, "h4");
        assert_eq!(toc.count(), 5);
    }

    #[test]
    fn test_deeper_frontier_closed_by_sibling() {
        // The depth-4 entry must not receive the second depth-4 heading once
        // a new depth-3 sibling has opened.
        let toc = build(&[2, 3, 4, 3, 4]);
        let section = &toc.entries[0];
        assert_eq!(section.children.len(), 2);
        assert_eq!(section.children[0].children.len(), 1);
        assert_eq!(section.children[1].children.len(), 1);
        assert_eq!(section.children[1].children[0].text, "h4");
    }

    #[test]
    fn test_skipped_level_attaches_to_nearest_ancestor() {
        let toc = build(&[2, 4, 3]);
        assert_eq!(toc.entries.len(), 1);
        let children: Vec<&str> = toc.entries[0]
            .children
            .iter()
            .map(|c| c.text.as_str())
            .collect();
        assert_eq!(children, vec!["h1", "h2"]);
    }

    #[test]
    fn test_document_starting_deep() {
        let toc = build(&[4, 2]);
        assert_eq!(toc.entries.len(), 2);
        assert!(toc.entries.iter().all(TocEntry::is_leaf));
    }

    #[test]
    fn test_empty_builder() {
        let builder = TocBuilder::new();
        assert!(builder.is_empty());
        assert!(builder.finish().is_empty());
    }

    #[test]
    fn test_to_html_suppresses_empty_subitems() {
        let toc = build(&[2, 3, 2]);
        let html = toc.to_html();
        assert!(html.contains("<li id=\"nav-s0\"><a href=\"#s0\">h0</a>"));
        assert_eq!(html.matches("<ol class=\"subitems\">").count(), 1);
        assert!(html.contains("<li id=\"nav-s2\"><a href=\"#s2\">h2</a></li>"));
    }

    #[test]
    fn test_to_html_escapes_text() {
        let mut builder = TocBuilder::new();
        builder.push(2, "1. Nouns & verbs", None);
        let html = builder.finish().to_html();
        assert!(html.contains("<li><a>1. Nouns &amp; verbs</a></li>"));
    }

    #[test]
    fn test_serialize_omits_empty_children() {
        let toc = build(&[2]);
        let json = serde_json::to_string(&toc).unwrap();
        assert_eq!(json, r#"[{"text":"h0","target":"s0"}]"#);
    }
}
