//! # vg-summary
//!
//! Parsing of the `ERROR SUMMARY:` line Valgrind writes at the end of a run.
//!
//! Valgrind ends every log with a line of the form:
//!
//! ```text
//! ==12345== ERROR SUMMARY: 3 errors from 2 contexts (suppressed: 0 from 0)
//! ```
//!
//! Only the error count is required. Everything else on the line is parsed
//! when present and ignored when not.
//!
//! ## Usage
//!
//! ```rust
//! use vg_summary::ErrorSummary;
//!
//! let summary = ErrorSummary::parse_line("==7== ERROR SUMMARY: 0 errors from 0 contexts").unwrap();
//! assert!(summary.is_clean());
//! assert_eq!(summary.pid, Some(7));
//! ```

pub mod error;
pub mod log;
pub mod summary;

pub use error::SummaryError;
pub use log::{find_summary_line, read_last_line, read_summary, SummaryLocation};
pub use summary::{ErrorSummary, SUMMARY_MARKER};
