//! Gate configuration.

use std::path::PathBuf;
use std::time::Duration;

use vg_summary::SummaryLocation;

use crate::error::ConfigError;

/// Log read when no path is given.
pub const DEFAULT_LOG_PATH: &str = "log.txt";

/// Environment variable overriding the log path.
pub const ENV_LOG_PATH: &str = "VG_GATE_LOG";

/// Environment variable overriding the error allowance.
pub const ENV_MAX_ERRORS: &str = "VG_GATE_MAX_ERRORS";

/// Configuration for the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// Valgrind log to inspect (and to write, when running valgrind)
    pub log_path: PathBuf,
    /// Which line of the log holds the summary
    pub location: SummaryLocation,
    /// Errors tolerated before the gate fails
    pub max_errors: u64,
    /// Valgrind executable
    pub valgrind_bin: String,
    /// Extra valgrind flags, placed before the command
    pub valgrind_args: Vec<String>,
    /// Timeout for a valgrind run
    pub timeout: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            location: SummaryLocation::LastLine,
            max_errors: 0,
            valgrind_bin: "valgrind".to_string(),
            valgrind_args: Vec::new(),
            timeout: Duration::from_secs(600), // 10 minutes
        }
    }
}

impl GateConfig {
    /// Full leak checking with origin tracking. Slow, so a longer timeout.
    pub fn thorough() -> Self {
        Self {
            valgrind_args: vec![
                "--leak-check=full".to_string(),
                "--show-leak-kinds=all".to_string(),
                "--track-origins=yes".to_string(),
            ],
            timeout: Duration::from_secs(1800), // 30 minutes
            ..Default::default()
        }
    }

    /// Apply `VG_GATE_LOG` and `VG_GATE_MAX_ERRORS` when set.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|var| std::env::var(var).ok())
    }

    fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = lookup(ENV_LOG_PATH).filter(|p| !p.is_empty()) {
            self.log_path = PathBuf::from(path);
        }

        if let Some(value) = lookup(ENV_MAX_ERRORS).filter(|v| !v.trim().is_empty()) {
            self.max_errors = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv {
                    var: ENV_MAX_ERRORS,
                    value,
                })?;
        }

        Ok(self)
    }
}
