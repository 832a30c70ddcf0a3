//! Numbering configuration
//!
//! Settings are loaded from `lingref.toml` next to the document sources:
//!
//! ```toml
//! [sections]
//! start = 0
//! number_chapter = true
//! strip_stale = false
//!
//! [floats]
//! separator = ": "
//!
//! [references]
//! range_separator = "-"
//! missing_marker = "??"
//!
//! [references.locations]
//! "sec:intro" = "chapter1"
//!
//! [toc]
//! enabled = true
//! ```
//!
//! Every field has a default, so partial files are accepted.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NumberingConfig {
    pub sections: SectionSettings,
    pub floats: FloatSettings,
    pub references: ReferenceSettings,
    pub toc: TocSettings,
}

impl NumberingConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&content)?)
    }
}

/// Heading numbering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionSettings {
    /// Initial value of the depth-2 counter; the first section gets `start + 1`
    pub start: u32,
    /// Prefix the chapter anchor's own text with its number
    pub number_chapter: bool,
    /// Replace outdated number prefixes left over from an earlier run
    pub strip_stale: bool,
}

impl Default for SectionSettings {
    fn default() -> Self {
        Self {
            start: 0,
            number_chapter: true,
            strip_stale: false,
        }
    }
}

/// Caption numbering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatSettings {
    /// Text between a float label and its caption
    pub separator: String,
}

impl Default for FloatSettings {
    fn default() -> Self {
        Self {
            separator: ": ".to_string(),
        }
    }
}

/// Reference resolution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceSettings {
    /// Text between the two endpoints of a range
    pub range_separator: String,
    /// Placeholder rendered for an unresolved endpoint
    pub missing_marker: String,
    /// Identifier to page/part name, for targets rendered on another page
    pub locations: HashMap<String, String>,
}

impl Default for ReferenceSettings {
    fn default() -> Self {
        Self {
            range_separator: "-".to_string(),
            missing_marker: "??".to_string(),
            locations: HashMap::new(),
        }
    }
}

/// Table of contents settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TocSettings {
    pub enabled: bool,
}

impl Default for TocSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}
