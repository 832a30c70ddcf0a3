//! lingref-core - Numbering and cross-reference resolution
//!
//! Assigns hierarchical labels to headings, independent counters to tables,
//! figures and examples, builds a nested table of contents, and rewrites
//! every reference node to the label of its target.
//!
//! # Example
//!
//! ```
//! use lingref_ast::{Document, Heading, Node, Reference};
//! use lingref_core::{number_document, NumberingConfig};
//!
//! let mut doc = Document::new();
//! doc.push(Heading::chapter("4", "Syntax"));
//! doc.push(Reference::crossref("sec:order"));
//! doc.push(Heading::new(2, "sec:clauses", "Clauses"));
//! doc.push(Heading::new(2, "sec:order", "Word order"));
//!
//! let outcome = number_document(&mut doc, &NumberingConfig::default()).unwrap();
//! assert_eq!(outcome.index.label("sec:order"), Some("4.2."));
//!
//! match &doc.nodes[1] {
//!     Node::Reference(r) => assert_eq!(r.text, "4.2."),
//!     _ => unreachable!(),
//! }
//! ```

pub mod config;
pub mod counter;
pub mod diagnostics;
pub mod error;
pub mod examples;
pub mod index;
pub mod label;
pub mod markup;
pub mod resolver;
pub mod session;
pub mod toc;
pub mod walker;

pub use config::NumberingConfig;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{Error, Result};
pub use index::{IndexEntry, LabelKind, ReferenceIndex};
pub use session::{number_document, NumberingOutcome, NumberingSession};
pub use toc::{Toc, TocEntry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.1.0");
    }
}
