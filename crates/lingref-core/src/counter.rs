//! Counter model
//!
//! One counter per numbered heading depth and one per floating-object kind.
//! Bumping a heading counter zeroes every deeper counter and leaves the
//! shallower ones untouched. Float counters only ever increase.

use std::collections::BTreeMap;

use lingref_ast::FloatKind;

use crate::error::{Error, Result};

/// Shallowest numbered heading depth (depth 1 is the chapter anchor)
pub const MIN_DEPTH: u8 = 2;
/// Deepest numbered heading depth
pub const MAX_DEPTH: u8 = 6;

const LEVELS: usize = (MAX_DEPTH - MIN_DEPTH + 1) as usize;

/// Hierarchical section counters for depths 2..=6.
///
/// Depths outside that range are rejected with [`Error::DepthOutOfRange`];
/// they are never clamped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionCounters {
    counts: [u32; LEVELS],
}

impl SectionCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters whose depth-2 value starts at `start`
    pub fn with_start(start: u32) -> Self {
        let mut counters = Self::new();
        counters.counts[0] = start;
        counters
    }

    /// Check that `depth` is a numbered heading depth
    pub fn check_depth(depth: u8) -> Result<()> {
        if (MIN_DEPTH..=MAX_DEPTH).contains(&depth) {
            Ok(())
        } else {
            Err(Error::DepthOutOfRange { depth })
        }
    }

    /// Increment the counter at `depth` and zero every deeper counter
    pub fn bump(&mut self, depth: u8) -> Result<()> {
        Self::check_depth(depth)?;
        let slot = slot(depth);
        self.counts[slot] += 1;
        for deeper in &mut self.counts[slot + 1..] {
            *deeper = 0;
        }
        Ok(())
    }

    /// Counter values from depth 2 through `depth` inclusive
    pub fn current_path(&self, depth: u8) -> Result<Vec<u32>> {
        Self::check_depth(depth)?;
        Ok(self.counts[..=slot(depth)].to_vec())
    }
}

fn slot(depth: u8) -> usize {
    (depth - MIN_DEPTH) as usize
}

/// Independent, monotonic counters per floating-object kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FloatCounters {
    counts: BTreeMap<FloatKind, u32>,
}

impl FloatCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the counter for `kind` and return its new value
    pub fn next(&mut self, kind: FloatKind) -> u32 {
        let count = self.counts.entry(kind).or_insert(0);
        *count += 1;
        *count
    }
}
