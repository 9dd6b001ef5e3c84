//! CLI for gating CI on a Valgrind log.
//!
//! # Usage
//!
//! ```bash
//! # Gate ./log.txt
//! vg-gate
//!
//! # Gate another log, tolerating one error
//! vg-gate check build/valgrind.log --max-errors 1
//!
//! # Run the test binary under valgrind and gate the result
//! vg-gate run --log-file vg.log -- ./build/fs_tests
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use vg_gate::cli::{Cli, Commands, OutputFormat};
use vg_gate::result::EXIT_UNREADABLE;
use vg_gate::{runner, Gate, GateResult, Verdict};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    vg_gate::logging::init(vg_gate::logging::resolve_level(
        cli.log_level.as_deref(),
        cli.verbose,
        cli.quiet,
    ));
    debug!("Arguments: {:?}", cli);

    let config = match cli.gate_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_UNREADABLE);
        }
    };
    let gate = Gate::new(config);

    let result = match &cli.command {
        Some(Commands::Run(args)) => runner::run_and_check(&gate, &args.command).await,
        Some(Commands::Check(_)) | None => gate.check(),
    };

    report(&result, cli.format, cli.quiet);
    ExitCode::from(result.verdict.exit_code())
}

fn report(result: &GateResult, format: OutputFormat, quiet: bool) {
    match result.verdict {
        Verdict::ErrorsFound => eprintln!("{}", result.message),
        Verdict::Unreadable => eprintln!("Error: {}", result.message),
        Verdict::Clean => {}
    }

    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(result) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize result: {}", e),
        },
        OutputFormat::Human if !quiet => println!("{}", result.format_summary()),
        OutputFormat::Human => {}
    }
}
