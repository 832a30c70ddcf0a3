//! lingref CLI binary entry point
//!
//! Installs the log subscriber and hands over to the library's `run_cli()`.

use std::process::ExitCode;

use anyhow::Result;
use lingref_cli::run_cli;

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    run_cli()
}
