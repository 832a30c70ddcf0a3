//! lingref CLI - Command-line interface library
//!
//! Commands:
//! - Number: label headings, floats and examples and resolve references
//! - Toc: print the table of contents as navigation markup
//! - Check: run structural validators and report numbering diagnostics
//!
//! # Library Usage
//!
//! ```ignore
//! use lingref_cli::{number_command, OutputFormat};
//!
//! let clean = number_command(&input, Some(&output), OutputFormat::Json, None)?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Number a rendered chapter, writing the result as JSON
//! lingref number chapter4.html --output chapter4.json
//!
//! # Print the TOC
//! lingref toc chapter4.html
//!
//! # Check for unresolved references and structural problems
//! lingref check chapter4.html --format json
//! ```

pub mod app;

pub use app::{check_command, check_document, load_config, load_document, number_command, toc_command};
pub use app::{run_cli, OutputFormat};
