//! Applying the gate to a log.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};
use vg_summary::read_summary;

use crate::config::GateConfig;
use crate::result::{GateResult, Verdict};

/// The Valgrind log gate.
pub struct Gate {
    config: GateConfig,
}

impl Gate {
    /// Create a new gate with the given config.
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    /// Gate the configured log.
    pub fn check(&self) -> GateResult {
        self.check_path(&self.config.log_path)
    }

    /// Gate a specific log, using the rest of the config.
    ///
    /// Never panics on malformed input; an unusable log becomes
    /// [`Verdict::Unreadable`].
    pub fn check_path(&self, log_path: &Path) -> GateResult {
        let start = Instant::now();
        debug!(path = %log_path.display(), location = ?self.config.location, "checking valgrind log");

        let result = match read_summary(log_path, self.config.location) {
            Ok(summary) => {
                GateResult::from_summary(log_path, summary, self.config.max_errors, start.elapsed())
            }
            Err(e) => GateResult::unreadable(log_path, e.to_string(), self.config.max_errors, start.elapsed()),
        };

        match result.verdict {
            Verdict::Clean => info!(path = %log_path.display(), "{}", result.message),
            Verdict::ErrorsFound => warn!(
                path = %log_path.display(),
                max_errors = self.config.max_errors,
                "{}",
                result.message
            ),
            Verdict::Unreadable => warn!(path = %log_path.display(), "{}", result.message),
        }

        result
    }

    /// Get the current config.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }
}
