//! lingref-ast - Document tree definitions
//!
//! This crate provides the typed node model that the numbering pass operates
//! on. Node kinds are decided once, when a collaborator's markup is ingested,
//! and never re-inspected afterwards.

pub mod document;
pub mod node;
pub mod walk;

pub use document::{Document, DocumentMeta};
pub use node::{
    Example, FloatKind, FloatObject, Group, Heading, Node, Reference, ReferenceKind, SubExample,
};
pub use walk::{walk, walk_mut};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
