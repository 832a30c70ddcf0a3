//! Reference index
//!
//! Maps stable element identifiers to their resolved labels. The walk and
//! example numbering fill it; the resolver only reads it.

use std::collections::BTreeMap;

use lingref_ast::FloatKind;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::diagnostics::{codes, Diagnostic, Diagnostics};

/// What kind of node a label belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelKind {
    Section,
    Table,
    Figure,
    Example,
    SubExample,
}

impl LabelKind {
    /// Whether references to this label use the example convention
    pub fn is_example(self) -> bool {
        matches!(self, LabelKind::Example | LabelKind::SubExample)
    }
}

impl From<FloatKind> for LabelKind {
    fn from(kind: FloatKind) -> Self {
        match kind {
            FloatKind::Table => LabelKind::Table,
            FloatKind::Figure => LabelKind::Figure,
        }
    }
}

/// A resolved label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Display label (`"3.2."`, `"Table 1"`, `"4b"`)
    pub label: String,
    pub kind: LabelKind,
    /// Page or document part the target is rendered on, if not the current one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl IndexEntry {
    pub fn new(label: impl Into<String>, kind: LabelKind) -> Self {
        Self {
            label: label.into(),
            kind,
            location: None,
        }
    }
}

/// Identifier → label table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceIndex {
    entries: BTreeMap<String, IndexEntry>,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a label, returning the entry it replaced if the identifier was
    /// already indexed
    pub fn insert(&mut self, id: impl Into<String>, entry: IndexEntry) -> Option<IndexEntry> {
        self.entries.insert(id.into(), entry)
    }

    pub fn get(&self, id: &str) -> Option<&IndexEntry> {
        self.entries.get(id)
    }

    /// Label for an identifier
    pub fn label(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(|e| e.label.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Attach a location to an indexed identifier. Returns `false` if the
    /// identifier is unknown.
    pub fn set_location(&mut self, id: &str, location: impl Into<String>) -> bool {
        match self.entries.get_mut(id) {
            Some(entry) => {
                entry.location = Some(location.into());
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by identifier
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }
}

/// Index a label, reporting a duplicate identifier when it replaces one
pub(crate) fn record_label(
    index: &mut ReferenceIndex,
    diagnostics: &mut Diagnostics,
    id: &str,
    entry: IndexEntry,
) {
    let label = entry.label.clone();
    if let Some(previous) = index.insert(id, entry) {
        warn!(id, previous = %previous.label, label = %label, "duplicate identifier");
        diagnostics.push(
            Diagnostic::warning(format!(
                "Identifier '{}' labels more than one node ('{}' and '{}')",
                id, previous.label, label
            ))
            .with_code(codes::DUPLICATE_IDENTIFIER)
            .with_subject(id)
            .with_help("References resolve to the later node; give each node its own identifier"),
        );
    }
}
