//! Command-line arguments for the `vg-gate` binary.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use vg_summary::SummaryLocation;

use crate::config::GateConfig;
use crate::error::ConfigError;

/// Fail CI when a Valgrind log reports errors
#[derive(Parser, Debug)]
#[command(
    name = "vg-gate",
    version,
    about = "Fail CI when a Valgrind log reports errors",
    long_about = "Reads the ERROR SUMMARY line at the end of a Valgrind log and exits 1 when \
                  errors were found, 0 when the log is clean and 2 when the log is unusable.\n\n\
                  Examples:\n  \
                  vg-gate\n  \
                  vg-gate check build/valgrind.log\n  \
                  vg-gate run --log-file vg.log -- ./fs_tests"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(
        long,
        global = true,
        value_name = "N",
        help = "Number of errors tolerated before failing [default: 0]"
    )]
    pub max_errors: Option<u64>,

    #[arg(
        long,
        global = true,
        help = "Use the last ERROR SUMMARY line anywhere in the log instead of the final line"
    )]
    pub search: bool,

    #[arg(
        short = 'f',
        long,
        global = true,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormat,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Verbose logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only the failure diagnostic is printed"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Gate an existing log (the default when no command is given)")]
    Check(CheckArgs),

    #[command(about = "Run a command under valgrind, then gate its log")]
    Run(RunArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    #[arg(value_name = "LOG", help = "Valgrind log [default: log.txt]")]
    pub log: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    #[arg(long, value_name = "PATH", help = "Log file for valgrind to write [default: log.txt]")]
    pub log_file: Option<PathBuf>,

    #[arg(long, value_name = "BIN", help = "Valgrind executable")]
    pub valgrind: Option<String>,

    #[arg(
        long = "valgrind-arg",
        value_name = "ARG",
        allow_hyphen_values = true,
        help = "Extra flag for valgrind (repeatable)"
    )]
    pub valgrind_args: Vec<String>,

    #[arg(long, help = "Use full leak checking with origin tracking")]
    pub thorough: bool,

    #[arg(long, value_name = "SECS", help = "Timeout for the valgrind run")]
    pub timeout_secs: Option<u64>,

    #[arg(last = true, required = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

impl Cli {
    /// Build the gate config: defaults, then environment, then flags.
    pub fn gate_config(&self) -> Result<GateConfig, ConfigError> {
        let base = match &self.command {
            Some(Commands::Run(args)) if args.thorough => GateConfig::thorough(),
            _ => GateConfig::default(),
        };
        let mut config = base.with_env_overrides()?;

        if let Some(max_errors) = self.max_errors {
            config.max_errors = max_errors;
        }
        if self.search {
            config.location = SummaryLocation::LastMatch;
        }

        match &self.command {
            Some(Commands::Check(args)) => {
                if let Some(log) = &args.log {
                    config.log_path = log.clone();
                }
            }
            Some(Commands::Run(args)) => {
                if let Some(log) = &args.log_file {
                    config.log_path = log.clone();
                }
                if let Some(bin) = &args.valgrind {
                    config.valgrind_bin = bin.clone();
                }
                config.valgrind_args.extend(args.valgrind_args.iter().cloned());
                if let Some(secs) = args.timeout_secs {
                    config.timeout = Duration::from_secs(secs);
                }
            }
            None => {}
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["vg-gate"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.format, OutputFormat::Human);
    }

    #[test]
    fn test_check_flags() {
        let cli = Cli::try_parse_from(["vg-gate", "check", "vg.log", "--max-errors", "2", "--search"]).unwrap();
        let Some(Commands::Check(args)) = &cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.log, Some(PathBuf::from("vg.log")));

        let config = cli.gate_config().unwrap();
        assert_eq!(config.max_errors, 2);
        assert_eq!(config.location, SummaryLocation::LastMatch);
    }

    #[test]
    fn test_run_args() {
        let cli = Cli::try_parse_from([
            "vg-gate",
            "run",
            "--log-file",
            "out.log",
            "--valgrind-arg",
            "--leak-check=full",
            "--timeout-secs",
            "5",
            "--",
            "./tests",
            "-x",
        ])
        .unwrap();
        let config = cli.gate_config().unwrap();
        assert_eq!(config.log_path, PathBuf::from("out.log"));
        assert!(config.valgrind_args.contains(&"--leak-check=full".to_string()));
        assert_eq!(config.timeout, Duration::from_secs(5));

        let Some(Commands::Run(args)) = &cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.command, vec!["./tests".to_string(), "-x".to_string()]);
    }

    #[test]
    fn test_run_requires_command() {
        assert!(Cli::try_parse_from(["vg-gate", "run"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["vg-gate", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_json_format() {
        let cli = Cli::try_parse_from(["vg-gate", "--format", "json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
