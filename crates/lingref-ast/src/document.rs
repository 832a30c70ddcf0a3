//! Document root and metadata definitions
//!
//! This module defines the top-level document tree handed to the numbering
//! pass: an ordered forest of typed nodes plus metadata carried over from the
//! rendering collaborator.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::node::{Heading, Node};
use crate::walk::walk;

/// A complete document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata
    #[serde(default)]
    pub metadata: DocumentMeta,
    /// Top-level nodes in document order
    #[serde(default)]
    pub nodes: Vec<Node>,
}

/// Document metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Document title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Identifier of the document part this tree was rendered from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Additional attributes
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from a list of nodes
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self {
            metadata: DocumentMeta::default(),
            nodes,
        }
    }

    /// Add a node to the document
    pub fn push(&mut self, node: impl Into<Node>) {
        self.nodes.push(node.into());
    }

    /// Check if the document is empty (no nodes)
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the number of top-level nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes as a flat sequence in document order
    pub fn flatten(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        walk(&self.nodes, &mut |node| out.push(node));
        out
    }

    /// All headings (chapter anchors included) in document order
    pub fn headings(&self) -> Vec<&Heading> {
        self.flatten()
            .into_iter()
            .filter_map(|node| match node {
                Node::Heading(h) => Some(h),
                _ => None,
            })
            .collect()
    }

    /// Every identifier carried by an identifiable node, in document order.
    ///
    /// Sub-example identifiers follow their parent example's identifier.
    /// Duplicates are kept so callers can detect them.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        walk(&self.nodes, &mut |node| match node {
            Node::Heading(h) => ids.extend(h.id.as_deref()),
            Node::Float(f) => ids.extend(f.id.as_deref()),
            Node::Example(ex) => {
                ids.extend(ex.id.as_deref());
                ids.extend(ex.subexamples.iter().filter_map(|s| s.id.as_deref()));
            }
            Node::Group(_) | Node::Reference(_) | Node::Text(_) => {}
        });
        ids
    }
}

impl DocumentMeta {
    /// Create metadata with just a title
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Set an attribute
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Get an attribute
    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|s| s.as_str())
    }
}
