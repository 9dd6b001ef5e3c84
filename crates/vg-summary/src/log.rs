//! Locating the summary line inside a log file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::SummaryError;
use crate::summary::{ErrorSummary, SUMMARY_MARKER};

/// Which line of the log holds the summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummaryLocation {
    /// The final line of the file, whatever it contains.
    #[default]
    LastLine,
    /// The last line that contains `ERROR SUMMARY:`.
    ///
    /// Useful when a test harness appends its own output after Valgrind.
    LastMatch,
}

/// Read the final line of a log.
///
/// Trailing `\n` / `\r\n` is stripped. A file ending in a blank line yields
/// an empty string. Invalid UTF-8 is replaced, since logs carry whatever the
/// program under test printed.
pub fn read_last_line(path: &Path) -> Result<String, SummaryError> {
    let mut last = None;
    for_each_line(path, |line| last = Some(line))?;
    last.ok_or_else(|| SummaryError::EmptyLog {
        path: path.to_path_buf(),
    })
}

/// Read the last line of a log that contains `ERROR SUMMARY:`.
pub fn find_summary_line(path: &Path) -> Result<String, SummaryError> {
    let mut seen_any = false;
    let mut last_match = None;
    let mut last_line = String::new();

    for_each_line(path, |line| {
        seen_any = true;
        if line.contains(SUMMARY_MARKER) {
            last_match = Some(line);
        } else {
            last_line = line;
        }
    })?;

    match last_match {
        Some(line) => Ok(line),
        None if !seen_any => Err(SummaryError::EmptyLog {
            path: path.to_path_buf(),
        }),
        None => Err(SummaryError::MissingMarker { line: last_line }),
    }
}

/// Read and parse the summary of a log.
pub fn read_summary(path: &Path, location: SummaryLocation) -> Result<ErrorSummary, SummaryError> {
    let line = match location {
        SummaryLocation::LastLine => read_last_line(path)?,
        SummaryLocation::LastMatch => find_summary_line(path)?,
    };
    debug!(path = %path.display(), ?location, line = %line, "located summary line");

    ErrorSummary::parse_line(&line)
}

fn for_each_line(path: &Path, mut f: impl FnMut(String)) -> Result<(), SummaryError> {
    let io_err = |source| SummaryError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).map_err(io_err)?;
        if read == 0 {
            return Ok(());
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        f(String::from_utf8_lossy(&buf).into_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use tempfile::NamedTempFile;

    fn log_with(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    const VALGRIND_LOG: &str = "\
==4242== Memcheck, a memory error detector
==4242== Invalid read of size 4
==4242==    at 0x109186: main (main.c:6)
==4242==
==4242== HEAP SUMMARY:
==4242==     in use at exit: 0 bytes in 0 blocks
==4242==
==4242== For lists of detected and suppressed errors, rerun with: -s
==4242== ERROR SUMMARY: 1 errors from 1 contexts (suppressed: 0 from 0)
";

    #[test]
    fn test_last_line_of_valgrind_log() {
        let log = log_with(VALGRIND_LOG.as_bytes());
        let summary = read_summary(log.path(), SummaryLocation::LastLine).unwrap();
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.pid, Some(4242));
    }

    #[test]
    fn test_last_line_without_trailing_newline() {
        let log = log_with(b"noise\nERROR SUMMARY: 0 errors");
        assert_eq!(read_last_line(log.path()).unwrap(), "ERROR SUMMARY: 0 errors");
    }

    #[test]
    fn test_crlf_stripped() {
        let log = log_with(b"ERROR SUMMARY: 2 errors\r\n");
        assert_eq!(read_last_line(log.path()).unwrap(), "ERROR SUMMARY: 2 errors");
    }

    #[test]
    fn test_trailing_blank_line_is_last() {
        let log = log_with(b"ERROR SUMMARY: 0 errors\n\n");
        assert_eq!(read_last_line(log.path()).unwrap(), "");

        let err = read_summary(log.path(), SummaryLocation::LastLine).unwrap_err();
        assert!(matches!(err, SummaryError::MissingMarker { .. }));
    }

    #[test]
    fn test_empty_log() {
        let log = log_with(b"");
        let err = read_summary(log.path(), SummaryLocation::LastLine).unwrap_err();
        assert!(matches!(err, SummaryError::EmptyLog { .. }));

        let err = read_summary(log.path(), SummaryLocation::LastMatch).unwrap_err();
        assert!(matches!(err, SummaryError::EmptyLog { .. }));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_last_line(&dir.path().join("log.txt")).unwrap_err();
        assert!(matches!(err, SummaryError::Io { .. }));
    }

    #[test]
    fn test_last_match_skips_trailing_output() {
        let mut contents = VALGRIND_LOG.to_string();
        contents.push_str("make: *** [check] Error 1\n");
        let log = log_with(contents.as_bytes());

        assert!(read_summary(log.path(), SummaryLocation::LastLine).is_err());

        let summary = read_summary(log.path(), SummaryLocation::LastMatch).unwrap();
        assert_eq!(summary.errors, 1);
    }

    #[test]
    fn test_last_match_picks_final_summary() {
        let log = log_with(b"==1== ERROR SUMMARY: 0 errors\n==2== ERROR SUMMARY: 6 errors\ndone\n");
        let summary = read_summary(log.path(), SummaryLocation::LastMatch).unwrap();
        assert_eq!(summary.errors, 6);
        assert_eq!(summary.pid, Some(2));
    }

    #[test]
    fn test_last_match_without_marker() {
        let log = log_with(b"one\ntwo\n");
        match find_summary_line(log.path()).unwrap_err() {
            SummaryError::MissingMarker { line } => assert_eq!(line, "two"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let log = log_with(b"\xff\xfe garbage\nERROR SUMMARY: 0 errors\n");
        let summary = read_summary(log.path(), SummaryLocation::LastLine).unwrap();
        assert!(summary.is_clean());
    }
}
