//! Gate outcomes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Serialize, Serializer};
use vg_summary::ErrorSummary;

// Exit codes for CI triage
pub const EXIT_CLEAN: u8 = 0;
pub const EXIT_ERRORS_FOUND: u8 = 1;
pub const EXIT_UNREADABLE: u8 = 2;

/// What the gate decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Error count within the allowance
    Clean,
    /// More errors than allowed
    ErrorsFound,
    /// No usable summary
    Unreadable,
}

impl Verdict {
    /// Process exit code for this verdict.
    pub fn exit_code(self) -> u8 {
        match self {
            Verdict::Clean => EXIT_CLEAN,
            Verdict::ErrorsFound => EXIT_ERRORS_FOUND,
            Verdict::Unreadable => EXIT_UNREADABLE,
        }
    }
}

/// Result of gating one log.
#[derive(Debug, Clone, Serialize)]
pub struct GateResult {
    pub verdict: Verdict,
    /// Log that was inspected
    pub log_path: PathBuf,
    /// Parsed summary, absent when the log was unreadable
    pub summary: Option<ErrorSummary>,
    /// Allowance in effect
    pub max_errors: u64,
    /// One-line explanation
    pub message: String,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl GateResult {
    /// Result for a parsed summary, judged against `max_errors`.
    pub fn from_summary(log_path: &Path, summary: ErrorSummary, max_errors: u64, duration: Duration) -> Self {
        let (verdict, message) = if summary.errors > max_errors {
            (
                Verdict::ErrorsFound,
                format!("Errors found by valgrind: {}", summary.errors),
            )
        } else if summary.errors > 0 {
            (
                Verdict::Clean,
                format!(
                    "{} valgrind errors within allowance of {}",
                    summary.errors, max_errors
                ),
            )
        } else {
            (Verdict::Clean, "All good in valgrind log".to_string())
        };

        Self {
            verdict,
            log_path: log_path.to_path_buf(),
            summary: Some(summary),
            max_errors,
            message,
            duration,
        }
    }

    /// Result for a log that could not be read or parsed.
    pub fn unreadable(log_path: &Path, message: impl Into<String>, max_errors: u64, duration: Duration) -> Self {
        Self {
            verdict: Verdict::Unreadable,
            log_path: log_path.to_path_buf(),
            summary: None,
            max_errors,
            message: message.into(),
            duration,
        }
    }

    /// Human-readable status line.
    pub fn format_summary(&self) -> String {
        let status = match self.verdict {
            Verdict::Clean => "PASS",
            Verdict::ErrorsFound => "FAIL",
            Verdict::Unreadable => "ERROR",
        };
        match &self.summary {
            Some(summary) => format!(
                "[{}] {}: {} ({})",
                status,
                self.log_path.display(),
                summary,
                self.message
            ),
            None => format!("[{}] {}: {}", status, self.log_path.display(), self.message),
        }
    }
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}
