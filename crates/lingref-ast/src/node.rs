//! Typed document nodes
//!
//! This module defines the closed set of node kinds the numbering pass
//! understands: headings, floating objects, examples with their
//! sub-examples, references, and the transparent containers and prose that
//! hold them together.

use serde::{Deserialize, Serialize};

/// A node of the document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// A section or chapter heading
    Heading(Heading),
    /// A captioned table or figure
    Float(FloatObject),
    /// A numbered interlinear-gloss example
    Example(Example),
    /// An inline reference to another node's label
    Reference(Reference),
    /// A transparent container (section, paragraph, div)
    Group(Group),
    /// Plain prose
    Text(String),
}

/// A heading introducing a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Nesting depth; 1 is the chapter anchor, 2-6 are numbered sections
    pub depth: u8,
    /// Stable identifier for cross-references and TOC anchors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display text, rewritten in place with the computed label
    pub text: String,
    /// Explicit chapter number (only meaningful at depth 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

/// Kinds of floating objects, each with its own counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatKind {
    Table,
    Figure,
}

/// A captioned table or figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatObject {
    pub kind: FloatKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Caption text, rewritten in place with the computed label
    pub caption: String,
}

/// A top-level example
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Example {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// 1-based position among all examples, written by example numbering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<u32>,
    /// Example body (gloss lines, translation, nested references)
    #[serde(default)]
    pub content: Vec<Node>,
    /// Lettered sub-examples, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subexamples: Vec<SubExample>,
}

/// A lettered sub-example scoped to its parent example
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubExample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// 1-based position within the parent, written by example numbering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<u32>,
    #[serde(default)]
    pub content: Vec<Node>,
}

/// What a reference points at, which decides its display convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// Section, table or figure reference; rendered as the bare label
    Crossref,
    /// Example reference; rendered in parentheses
    Example,
}

/// An inline reference whose text is computed from another node's label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub kind: ReferenceKind,
    /// Identifier of the referenced node
    pub target: String,
    /// Identifier closing a range ("figs. 3-5")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// Text appended verbatim to the resolved label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Display text, written by the resolver
    #[serde(default)]
    pub text: String,
    /// Link target, written by the resolver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// A transparent container
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Heading {
    /// Create a heading at the given depth
    pub fn new(depth: u8, id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            depth,
            id: Some(id.into()),
            text: text.into(),
            number: None,
        }
    }

    /// Create a chapter anchor (depth 1) with an explicit number
    pub fn chapter(number: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            depth: 1,
            id: None,
            text: text.into(),
            number: Some(number.into()),
        }
    }

    /// Whether this heading is a chapter anchor rather than a numbered section
    pub fn is_chapter(&self) -> bool {
        self.depth == 1
    }
}

impl FloatKind {
    /// Lowercase kind name, as used in markup classes
    pub fn as_str(self) -> &'static str {
        match self {
            FloatKind::Table => "table",
            FloatKind::Figure => "figure",
        }
    }

    /// Capitalized kind name, as used in labels
    pub fn display_name(self) -> &'static str {
        match self {
            FloatKind::Table => "Table",
            FloatKind::Figure => "Figure",
        }
    }
}

impl std::fmt::Display for FloatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FloatObject {
    pub fn new(kind: FloatKind, id: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            kind,
            id: Some(id.into()),
            caption: caption.into(),
        }
    }
}

impl Example {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Add a sub-example
    pub fn with_subexample(mut self, sub: SubExample) -> Self {
        self.subexamples.push(sub);
        self
    }

    /// Add a content node
    pub fn with_content(mut self, node: Node) -> Self {
        self.content.push(node);
        self
    }
}

impl SubExample {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }
}

impl Reference {
    /// A section/float cross-reference
    pub fn crossref(target: impl Into<String>) -> Self {
        Self::new(ReferenceKind::Crossref, target)
    }

    /// An example reference
    pub fn example(target: impl Into<String>) -> Self {
        Self::new(ReferenceKind::Example, target)
    }

    fn new(kind: ReferenceKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            end: None,
            suffix: None,
            text: String::new(),
            href: None,
        }
    }

    /// Turn this reference into a range ending at `end`
    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    /// Append a verbatim suffix to the resolved label
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }
}

impl Group {
    pub fn new(children: Vec<Node>) -> Self {
        Self { id: None, children }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl From<Heading> for Node {
    fn from(heading: Heading) -> Self {
        Node::Heading(heading)
    }
}

impl From<FloatObject> for Node {
    fn from(float: FloatObject) -> Self {
        Node::Float(float)
    }
}

impl From<Example> for Node {
    fn from(example: Example) -> Self {
        Node::Example(example)
    }
}

impl From<Reference> for Node {
    fn from(reference: Reference) -> Self {
        Node::Reference(reference)
    }
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Node::Group(group)
    }
}
