//! CLI Application logic
//!
//! Contains the command-line interface implementation. Each command returns
//! whether the document came through without error-level diagnostics; the
//! binary turns that into its exit status.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};

use lingref_ast::Document;
use lingref_core::diagnostics::Diagnostic;
use lingref_core::{markup, Error, NumberingConfig, NumberingOutcome, NumberingSession};
use lingref_validate::{ValidationEngine, ValidationReport};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "lingref")]
#[command(author, version, about = "Numbering and cross-references for linguistic documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Number headings, floats and examples and resolve references
    Number {
        /// Input markup file, or a serialized document (.json)
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Configuration file path (defaults to ./lingref.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the table of contents as navigation markup
    Toc {
        /// Input markup file, or a serialized document (.json)
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file path (defaults to ./lingref.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Check a document for structural and reference problems
    Check {
        /// Input markup file, or a serialized document (.json)
        input: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Configuration file path (defaults to ./lingref.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Parse arguments and run the selected command
pub fn run_cli() -> Result<ExitCode> {
    let cli = Cli::parse();

    let clean = match cli.command {
        Commands::Number {
            input,
            output,
            format,
            config,
        } => number_command(&input, output.as_deref(), format, config.as_deref())?,
        Commands::Toc {
            input,
            output,
            config,
        } => toc_command(&input, output.as_deref(), config.as_deref())?,
        Commands::Check {
            input,
            format,
            config,
        } => check_command(&input, format, config.as_deref())?,
    };

    Ok(if clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// JSON shape of a numbered document
#[derive(Serialize)]
struct NumberedDocument<'a> {
    document: &'a Document,
    #[serde(flatten)]
    outcome: &'a NumberingOutcome,
}

/// Execute the number command
pub fn number_command(
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    config_path: Option<&Path>,
) -> Result<bool> {
    let config = load_config(config_path)?;
    let mut doc = load_document(input)?;

    let Some(outcome) = run_session(&config, &mut doc, input)? else {
        return Ok(false);
    };

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&NumberedDocument {
            document: &doc,
            outcome: &outcome,
        })
        .context("Failed to serialize numbered document to JSON")?,
        OutputFormat::Text => text_report(input, &outcome),
    };
    write_output(output, &rendered)?;

    info!(
        input = %input.display(),
        labels = outcome.index.len(),
        "numbered document"
    );
    Ok(!outcome.has_errors())
}

/// Execute the toc command
pub fn toc_command(input: &Path, output: Option<&Path>, config_path: Option<&Path>) -> Result<bool> {
    let config = load_config(config_path)?;
    let mut doc = load_document(input)?;

    let Some(outcome) = run_session(&config, &mut doc, input)? else {
        return Ok(false);
    };
    for diag in outcome.diagnostics.iter().filter(|d| d.is_error()) {
        eprintln!("{}", diag);
    }

    write_output(output, &outcome.toc.to_html())?;
    Ok(!outcome.has_errors())
}

/// Execute the check command
pub fn check_command(input: &Path, format: OutputFormat, config_path: Option<&Path>) -> Result<bool> {
    let config = load_config(config_path)?;
    let mut doc = load_document(input)?;
    let file = input.display().to_string();

    let mut report = check_document(&mut doc, config)
        .with_context(|| format!("Failed to number {}", input.display()))?;
    report.diagnostics = report
        .diagnostics
        .into_iter()
        .map(|d| d.with_file(file.clone()))
        .collect();

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .context("Failed to serialize check report to JSON")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            if report.diagnostics.is_empty() {
                println!("✓ No issues found in {}", input.display());
            } else {
                for diag in &report.diagnostics {
                    println!("{}", diag);
                    println!();
                }
                let error_count = report.diagnostics.iter().filter(|d| d.is_error()).count();
                let warning_count = report.diagnostics.iter().filter(|d| d.is_warning()).count();
                println!(
                    "Found {} error(s) and {} warning(s)",
                    error_count, warning_count
                );
            }
        }
    }

    Ok(!report.has_errors())
}

/// Run the structural validators, then the numbering pass, and gather both
/// sets of diagnostics into one report. A rejected document contributes the
/// diagnostics it was rejected with.
pub fn check_document(doc: &mut Document, config: NumberingConfig) -> Result<ValidationReport> {
    // Structural checks look at the document before numbering touches it
    let mut report = ValidationEngine::with_defaults().report(doc);
    debug!(validators = ?report.validators, "ran structural validators");

    let numbering: Vec<Diagnostic> = match NumberingSession::new(config).run(doc) {
        Ok(outcome) => outcome.diagnostics.into_iter().collect(),
        Err(Error::Rejected { diagnostics }) => diagnostics,
        Err(e) => return Err(e.into()),
    };
    report.diagnostics.extend(numbering);
    Ok(report)
}

/// Load numbering configuration from `config_path`, or from `lingref.toml`
/// in the working directory when no path is given
pub fn load_config(config_path: Option<&Path>) -> Result<NumberingConfig> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            NumberingConfig::from_toml_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))
        }
        None => {
            let candidates = ["lingref.toml", ".lingref.toml"];
            for candidate in candidates {
                let path = Path::new(candidate);
                if path.exists() {
                    return NumberingConfig::load(path)
                        .with_context(|| format!("Failed to load config: {}", candidate));
                }
            }
            Ok(NumberingConfig::default())
        }
    }
}

/// Read a document: `.json` files hold a serialized tree, anything else is
/// rendered markup
pub fn load_document(input: &Path) -> Result<Document> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;

    let is_json = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let mut doc = if is_json {
        serde_json::from_str::<Document>(&content)
            .with_context(|| format!("Failed to parse document JSON: {}", input.display()))?
    } else {
        markup::parse(&content)
            .with_context(|| format!("Failed to parse markup: {}", input.display()))?
    };

    if doc.metadata.source.is_none() {
        doc.metadata.source = Some(input.display().to_string());
    }
    Ok(doc)
}

/// Run the numbering pass. A rejected document has its diagnostics printed
/// to stderr and yields `None`.
fn run_session(
    config: &NumberingConfig,
    doc: &mut Document,
    input: &Path,
) -> Result<Option<NumberingOutcome>> {
    match NumberingSession::new(config.clone()).run(doc) {
        Ok(outcome) => Ok(Some(outcome)),
        Err(Error::Rejected { diagnostics }) => {
            for diag in diagnostics {
                eprintln!("{}", diag.with_file(input.display().to_string()));
            }
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to number {}", input.display())),
    }
}

fn text_report(input: &Path, outcome: &NumberingOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}: {} label(s)", input.display(), outcome.index.len());
    for (id, entry) in outcome.index.iter() {
        let _ = writeln!(out, "  {:<24} {}", id, entry.label);
    }
    if !outcome.diagnostics.is_empty() {
        out.push('\n');
        for diag in outcome.diagnostics.iter() {
            let _ = writeln!(out, "{}", diag);
        }
        let _ = writeln!(
            out,
            "\nFound {} error(s) and {} warning(s)",
            outcome.diagnostics.error_count(),
            outcome.diagnostics.warning_count()
        );
    }
    out
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("Failed to write output: {}", path.display())),
        None => {
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}
