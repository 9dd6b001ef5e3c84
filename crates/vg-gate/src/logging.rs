//! Tracing setup for the binary.

use std::env;
use std::sync::Once;

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable selecting the log level when no flag is given.
pub const ENV_LOG_LEVEL: &str = "VG_GATE_LOG_LEVEL";

/// Pick the level: explicit flag, then `-v`/`-q`, then `VG_GATE_LOG_LEVEL`, then warn.
pub fn resolve_level(log_level: Option<&str>, verbose: bool, quiet: bool) -> Level {
    resolve_level_from(log_level, verbose, quiet, env::var(ENV_LOG_LEVEL).ok())
}

fn resolve_level_from(log_level: Option<&str>, verbose: bool, quiet: bool, env_level: Option<String>) -> Level {
    if let Some(level_str) = log_level {
        parse_level(level_str)
    } else if verbose {
        Level::DEBUG
    } else if quiet {
        Level::ERROR
    } else {
        parse_level(env_level.as_deref().unwrap_or("warn"))
    }
}

/// Install the global subscriber, writing to stderr. `RUST_LOG` wins when set.
pub fn init(level: Level) {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("vg_gate={level},vg_summary={level}")));

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    });
}

fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to WARN. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::WARN
        }
    }
}
