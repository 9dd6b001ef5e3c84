//! The `ERROR SUMMARY:` line.

use std::fmt;
use std::num::IntErrorKind;

use serde::Serialize;

use crate::error::SummaryError;

/// Marker that starts the summary on a Valgrind log line.
pub const SUMMARY_MARKER: &str = "ERROR SUMMARY: ";

/// Text that ends the error count. Valgrind uses the plural even for one.
const COUNT_TERMINATOR: &str = " errors";

const SUPPRESSED_MARKER: &str = "(suppressed: ";

/// Counts reported on a Valgrind `ERROR SUMMARY:` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorSummary {
    /// Number of errors detected
    pub errors: u64,
    /// Number of distinct error contexts, if reported
    pub contexts: Option<u64>,
    /// Errors hidden by suppression files, if reported
    pub suppressed: Option<u64>,
    /// Contexts hidden by suppression files, if reported
    pub suppressed_contexts: Option<u64>,
    /// Process id from the `==PID==` prefix, if present
    pub pid: Option<u32>,
}

impl ErrorSummary {
    /// Summary with only an error count.
    #[must_use]
    pub fn with_errors(errors: u64) -> Self {
        Self {
            errors,
            contexts: None,
            suppressed: None,
            suppressed_contexts: None,
            pid: None,
        }
    }

    /// Parse a summary out of a single log line.
    ///
    /// The count is whatever sits between `ERROR SUMMARY: ` and ` errors`,
    /// with surrounding whitespace ignored. A count too large for `u64`
    /// saturates to `u64::MAX`. The remaining fields are filled
    /// in only when they parse cleanly; they never fail the parse.
    pub fn parse_line(line: &str) -> Result<Self, SummaryError> {
        let (prefix, rest) = line
            .split_once(SUMMARY_MARKER)
            .ok_or_else(|| SummaryError::MissingMarker {
                line: line.to_string(),
            })?;

        let (count_text, tail) = rest.split_once(COUNT_TERMINATOR).unwrap_or((rest, ""));
        let count_text = count_text.trim();
        let errors = match count_text.parse::<u64>() {
            Ok(errors) => errors,
            // Too many to count is still errors
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => u64::MAX,
            Err(source) => {
                return Err(SummaryError::InvalidCount {
                    value: count_text.to_string(),
                    source,
                })
            }
        };

        let contexts = tail
            .trim_start()
            .strip_prefix("from ")
            .and_then(leading_number);

        let (suppressed, suppressed_contexts) = match tail.split_once(SUPPRESSED_MARKER) {
            Some((_, counts)) => {
                let suppressed = leading_number(counts);
                let suppressed_contexts = counts
                    .split_once(" from ")
                    .and_then(|(_, rest)| leading_number(rest));
                (suppressed, suppressed_contexts)
            }
            None => (None, None),
        };

        Ok(Self {
            errors,
            contexts,
            suppressed,
            suppressed_contexts,
            pid: parse_pid(prefix),
        })
    }

    /// True when no errors were reported. Suppressed errors do not count.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }
}

impl fmt::Display for ErrorSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} errors", self.errors)?;
        if let Some(contexts) = self.contexts {
            write!(f, " from {} contexts", contexts)?;
        }
        if let Some(suppressed) = self.suppressed {
            write!(f, " (suppressed: {}", suppressed)?;
            if let Some(suppressed_contexts) = self.suppressed_contexts {
                write!(f, " from {}", suppressed_contexts)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Digits at the start of `s`, after leading whitespace.
fn leading_number(s: &str) -> Option<u64> {
    let s = s.trim_start();
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}

/// `==1234==` prefix.
fn parse_pid(prefix: &str) -> Option<u32> {
    let inner = prefix.trim().strip_prefix("==")?.strip_suffix("==")?;
    inner.parse().ok()
}
