//! tagbump - Rule-driven container tag bumper CLI tool
//!
//! Scans a repository for value files matching the configured path patterns,
//! extracts container image references, classifies planned tag changes and
//! runs the resulting post-upgrade task pipelines.

use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use tagbump::cli::CliArgs;
use tagbump::orchestrator::Orchestrator;
use tagbump::output::{create_formatter, OutputConfig};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if args.verbose {
        eprintln!("tagbump v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Target: {}", args.path.display());
        if args.dry_run {
            eprintln!("Mode: dry-run");
        }
    }

    // Configuration problems are fatal before the scan starts
    let orchestrator = Orchestrator::new(args.clone())?;
    let result = orchestrator.run();

    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet, args.dry_run);
    let formatter = create_formatter(output_config);

    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    if args.verbose && !result.errors.is_empty() {
        eprintln!();
        eprintln!("Errors encountered:");
        for error in &result.errors {
            eprintln!("  - {}", error);
        }
    }

    if !result.errors.is_empty() {
        // Partial success - some files or candidates failed
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
