// ModSleuth - platform/fs.rs
//
// Filesystem helpers shared by the analysis and sort runs.
//
// Error policy:
//   - Transient I/O errors are retried with capped exponential backoff.
//   - Log content is decoded lossily; game logs are not guaranteed UTF-8.
//   - Writes that replace user files go through a temp file + rename so an
//     interrupted write never leaves a truncated file behind.

use crate::util::constants;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Read the full content of a log file as a string.
///
/// Large files are memory-mapped instead of copied into a heap buffer
/// before decoding. Invalid UTF-8 is replaced, never rejected.
pub fn read_log_lossy(path: &Path, is_large: bool) -> io::Result<String> {
    if is_large {
        read_large_file(path)
    } else {
        read_with_retry(path)
    }
}

/// Read using `memmap2` for large files.
fn read_large_file(path: &Path) -> io::Result<String> {
    let file = std::fs::File::open(path)?;
    // SAFETY: the map is read-only and dropped before returning. A game still
    // appending to the log can at worst change bytes we decode lossily.
    let mmap = unsafe { memmap2::Mmap::map(&file)? };
    Ok(String::from_utf8_lossy(&mmap).into_owned())
}

/// Read a file with transient-error retries.
fn read_with_retry(path: &Path) -> io::Result<String> {
    let mut last_err: Option<io::Error> = None;

    for attempt in 0..constants::READ_MAX_RETRIES {
        match std::fs::read(path) {
            Ok(bytes) => return Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if is_transient_error(&e) => {
                tracing::debug!(
                    file = %path.display(),
                    attempt = attempt + 1,
                    error = %e,
                    "Transient I/O error, retrying"
                );
                if let Some(delay) = retry_delay(attempt) {
                    std::thread::sleep(delay);
                }
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_err.unwrap_or_else(|| io::Error::other("Unknown read error")))
}

/// Backoff before the next attempt; `None` after the final one.
fn retry_delay(attempt: u32) -> Option<Duration> {
    if attempt + 1 >= constants::READ_MAX_RETRIES {
        return None;
    }
    constants::READ_RETRY_DELAYS_MS
        .get(attempt as usize)
        .map(|ms| Duration::from_millis(*ms))
}

/// Returns true for transient I/O errors that are worth retrying.
fn is_transient_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
    )
}

/// Read a line-oriented list file (e.g. a modlist).
///
/// Each line is trimmed of surrounding whitespace (including a trailing
/// `\r` from Windows line endings); blank lines are dropped.
pub fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    let content = read_with_retry(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Replace `path` with `lines`, one per line, each terminated by `\n`.
///
/// Writes to a sibling temp file first, then renames over the target.
pub fn write_lines_atomic(path: &Path, lines: &[String]) -> io::Result<()> {
    let tmp_path = temp_sibling(path);

    let result = (|| {
        let file = std::fs::File::create(&tmp_path)?;
        let mut writer = io::BufWriter::new(file);
        for line in lines {
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        writer.get_ref().sync_all()?;
        drop(writer);
        std::fs::rename(&tmp_path, path)
    })();

    if result.is_err() {
        // Best effort; the original file is untouched either way.
        let _ = std::fs::remove_file(&tmp_path);
    }
    result
}

/// `modlist.txt` -> `modlist.txt.tmp`, in the same directory so the rename
/// stays on one filesystem.
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_backoff_after_the_last_attempt() {
        let last = constants::READ_MAX_RETRIES - 1;
        for attempt in 0..last {
            assert_eq!(
                retry_delay(attempt),
                Some(Duration::from_millis(
                    constants::READ_RETRY_DELAYS_MS[attempt as usize]
                ))
            );
        }
        assert_eq!(retry_delay(last), None);
    }

    #[test]
    fn lossy_read_replaces_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.log");
        std::fs::write(&path, b"ok \xff\xfe tail\n").unwrap();

        for is_large in [false, true] {
            let content = read_log_lossy(&path, is_large).unwrap();
            assert!(content.starts_with("ok "));
            assert!(content.contains('\u{FFFD}'));
            assert!(content.ends_with("tail\n"));
        }
    }

    #[test]
    fn read_missing_file_is_not_found() {
        let err = read_log_lossy(Path::new("/nonexistent/modsleuth.log"), false).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn read_lines_trims_and_skips_blanks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modlist.txt");
        std::fs::write(&path, "  b.archive \r\n\r\na.archive\n   \n").unwrap();
        assert_eq!(read_lines(&path).unwrap(), vec!["b.archive", "a.archive"]);
    }

    #[test]
    fn atomic_write_replaces_content_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modlist.txt");
        std::fs::write(&path, "old\n").unwrap();

        write_lines_atomic(&path, &["a".to_string(), "b".to_string()]).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\n");
        assert!(!temp_sibling(&path).exists());
    }

    #[test]
    fn atomic_write_into_missing_dir_fails_cleanly() {
        let path = Path::new("/nonexistent/dir/modlist.txt");
        assert!(write_lines_atomic(path, &["a".to_string()]).is_err());
    }
}
