//! XDG-compliant log directory management
//!
//! Logs are stored in `$XDG_STATE_HOME/pm/logs/` (typically
//! `~/.local/state/pm/logs/`), one `pm-{PID}.log` file per run. Files left
//! behind by earlier runs are removed once they are a day old.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};

/// Minimum age for log files to be cleaned up (24 hours)
const CLEANUP_AGE: Duration = Duration::from_secs(24 * 60 * 60);

const LOG_PREFIX: &str = "pm-";

static LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Base log directory, created on first use.
///
/// Falls back to `~/.local/state/pm/logs/` when `XDG_STATE_HOME` is unset,
/// and to the system temp directory as a last resort.
pub fn log_dir() -> &'static PathBuf {
    LOG_DIR.get_or_init(|| {
        let fallback = std::env::temp_dir().join("pm-logs");
        let dir = xdg_log_dir().unwrap_or_else(|| fallback.clone());

        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!("Failed to create log directory {:?}: {}", dir, e);
            let _ = fs::create_dir_all(&fallback);
            return fallback;
        }
        dir
    })
}

fn xdg_log_dir() -> Option<PathBuf> {
    if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
        let path = PathBuf::from(state_home);
        if path.is_absolute() {
            return Some(path.join("pm").join("logs"));
        }
    }

    dirs::home_dir().map(|home| home.join(".local").join("state").join("pm").join("logs"))
}

/// Log file for this process: `{log_dir}/pm-{PID}.log`
pub fn main_log_path() -> PathBuf {
    log_dir().join(format!("{}{}.log", LOG_PREFIX, std::process::id()))
}

/// Remove log files from earlier runs that are older than a day.
pub fn cleanup_stale_logs() {
    let removed = cleanup_stale_logs_in(log_dir(), std::process::id(), CLEANUP_AGE);
    if removed > 0 {
        tracing::debug!("Cleaned up {} stale log files", removed);
    }
}

/// Remove `pm-{PID}.log` files in `dir` older than `age`, except `current_pid`'s.
///
/// Returns how many files were removed.
pub fn cleanup_stale_logs_in(dir: &Path, current_pid: u32, age: Duration) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();

        let Some(pid) = extract_pid_from_filename(&name) else {
            continue;
        };
        if pid == current_pid {
            continue;
        }

        if entry.file_type().map(|t| t.is_file()).unwrap_or(false)
            && is_file_older_than(&entry.path(), age)
        {
            match fs::remove_file(entry.path()) {
                Ok(()) => removed += 1,
                Err(e) => {
                    tracing::debug!("Failed to clean up stale log {:?}: {}", entry.path(), e)
                }
            }
        }
    }
    removed
}

fn is_file_older_than(path: &Path, age: Duration) -> bool {
    let Ok(modified) = fs::metadata(path).and_then(|m| m.modified()) else {
        return false;
    };

    SystemTime::now()
        .duration_since(modified)
        .map(|elapsed| elapsed > age)
        .unwrap_or(false)
}

/// PID from a file name like `pm-12345.log`
fn extract_pid_from_filename(name: &str) -> Option<u32> {
    name.strip_prefix(LOG_PREFIX)?
        .strip_suffix(".log")?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_is_absolute() {
        assert!(log_dir().is_absolute());
    }

    #[test]
    fn test_main_log_path_contains_pid() {
        let path = main_log_path();
        let name = path.file_name().unwrap().to_string_lossy();
        assert_eq!(name, format!("pm-{}.log", std::process::id()));
    }

    #[test]
    fn test_extract_pid_from_filename() {
        assert_eq!(extract_pid_from_filename("pm-12345.log"), Some(12345));
        assert_eq!(extract_pid_from_filename("pm-1.log"), Some(1));
        assert_eq!(extract_pid_from_filename("other-12.log"), None);
        assert_eq!(extract_pid_from_filename("pm-abc.log"), None);
        assert_eq!(extract_pid_from_filename("pm-12.txt"), None);
    }

    #[test]
    fn test_cleanup_removes_only_foreign_logs() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["pm-100.log", "pm-200.log", "notes.log", "pm-300.txt"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }

        // every file is older than zero seconds once the clock moves on
        std::thread::sleep(Duration::from_millis(20));
        let removed = cleanup_stale_logs_in(dir.path(), 200, Duration::ZERO);

        assert_eq!(removed, 1);
        assert!(!dir.path().join("pm-100.log").exists());
        assert!(dir.path().join("pm-200.log").exists());
        assert!(dir.path().join("notes.log").exists());
        assert!(dir.path().join("pm-300.txt").exists());
    }

    #[test]
    fn test_cleanup_keeps_recent_logs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pm-100.log"), "x").unwrap();
        assert_eq!(cleanup_stale_logs_in(dir.path(), 1, CLEANUP_AGE), 0);
        assert!(dir.path().join("pm-100.log").exists());
    }
}
