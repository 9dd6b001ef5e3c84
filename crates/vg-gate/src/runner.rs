//! Running a command under Valgrind before gating.
//!
//! Runs `valgrind --log-file=<log> <valgrind args> <command>` and then gates
//! the log it wrote. The command's stdout and stderr pass straight through.
//! Its exit status is logged but does not affect the verdict.

use std::ffi::OsString;
use std::time::Instant;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::GateConfig;
use crate::error::RunError;
use crate::gate::Gate;
use crate::result::GateResult;

/// Arguments passed to valgrind for `command`.
pub fn valgrind_args(config: &GateConfig, command: &[String]) -> Vec<OsString> {
    let mut log_arg = OsString::from("--log-file=");
    log_arg.push(&config.log_path);

    let mut args = Vec::with_capacity(1 + config.valgrind_args.len() + command.len());
    args.push(log_arg);
    args.extend(config.valgrind_args.iter().map(OsString::from));
    args.extend(command.iter().map(OsString::from));
    args
}

/// Run `command` under valgrind, writing the configured log.
pub async fn run_valgrind(config: &GateConfig, command: &[String]) -> Result<(), RunError> {
    if command.is_empty() {
        return Err(RunError::EmptyCommand);
    }

    // First check if valgrind is available
    let version = Command::new(&config.valgrind_bin)
        .arg("--version")
        .output()
        .await
        .map_err(|e| RunError::ValgrindUnavailable {
            bin: config.valgrind_bin.clone(),
            reason: e.to_string(),
        })?;
    if !version.status.success() {
        return Err(RunError::ValgrindUnavailable {
            bin: config.valgrind_bin.clone(),
            reason: format!("--version exited with {}", version.status),
        });
    }
    debug!(version = %String::from_utf8_lossy(&version.stdout).trim(), "found valgrind");

    // A stale log would be gated if valgrind failed to write a new one
    match tokio::fs::remove_file(&config.log_path).await {
        Ok(()) => debug!(path = %config.log_path.display(), "removed previous log"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(RunError::Spawn(e)),
    }

    let args = valgrind_args(config, command);
    info!(bin = %config.valgrind_bin, ?args, "running under valgrind");

    // Child is killed when the timeout drops the future
    let status = tokio::time::timeout(
        config.timeout,
        Command::new(&config.valgrind_bin)
            .args(&args)
            .kill_on_drop(true)
            .status(),
    )
    .await
    .map_err(|_| RunError::Timeout(config.timeout))??;

    if !status.success() {
        warn!(%status, "command under valgrind exited unsuccessfully");
    }

    Ok(())
}

/// Run `command` under valgrind, then gate the log.
///
/// Any failure to produce the log is reported as an unreadable result.
pub async fn run_and_check(gate: &Gate, command: &[String]) -> GateResult {
    let start = Instant::now();
    let config = gate.config();

    match run_valgrind(config, command).await {
        Ok(()) => gate.check(),
        Err(e) => {
            warn!(error = %e, "valgrind run failed");
            GateResult::unreadable(&config.log_path, e.to_string(), config.max_errors, start.elapsed())
        }
    }
}
