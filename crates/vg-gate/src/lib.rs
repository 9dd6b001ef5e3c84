//! # vg-gate
//!
//! Fails a CI job when a Valgrind log reports errors.
//!
//! The gate reads the `ERROR SUMMARY:` line of a log and maps it to a
//! [`Verdict`]:
//!
//! | Verdict | Exit | Meaning |
//! |---------|------|---------|
//! | `Clean` | 0 | Error count within the allowance (0 by default) |
//! | `ErrorsFound` | 1 | Valgrind reported more errors than allowed |
//! | `Unreadable` | 2 | Log missing, empty, or without a usable summary |
//!
//! It can also run a command under Valgrind first and gate the log that
//! run produced (see [`runner`]).

pub mod cli;
pub mod config;
pub mod error;
pub mod gate;
pub mod logging;
pub mod result;
pub mod runner;

pub use config::{GateConfig, DEFAULT_LOG_PATH};
pub use error::{ConfigError, RunError};
pub use gate::Gate;
pub use result::{GateResult, Verdict};
