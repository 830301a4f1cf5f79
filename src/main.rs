//! depstat - npm dependency status CLI tool
//!
//! Lists dependencies with newer published versions and, with `update`,
//! installs them.

use clap::Parser;
use depstat::cli::CliArgs;
use depstat::logging;
use depstat::orchestrator::Orchestrator;
use depstat::output::{create_formatter, OutputConfig};
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    if args.print_version {
        println!("{}", CliArgs::version_line());
        return ExitCode::SUCCESS;
    }

    logging::init(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<()> {
    if args.verbose {
        eprintln!("depstat {}", CliArgs::version_line());
        eprintln!("Registry: {}", args.registry);
        if !args.global {
            eprintln!("Target: {}", args.project_dir().display());
        }
    }

    let orchestrator = Orchestrator::new(args.clone())?;
    let report = orchestrator.run().await?;

    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet)
        .with_color(io::stdout().is_terminal());
    let formatter = create_formatter(output_config);

    let mut stdout = io::stdout().lock();
    formatter.format(&report, &mut stdout)?;
    stdout.flush()?;

    Ok(())
}
