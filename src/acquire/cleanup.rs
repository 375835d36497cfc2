//! Clearing a stale working copy before a new clone.
//!
//! Removal escalates: plain recursive remove, then remove after forcing
//! every entry writable, then an external `rm -rf`. If the directory
//! survives every attempt it is renamed aside so the run can continue.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use walkdir::WalkDir;

use crate::config::AcquireConfig;
use crate::context::ServiceContext;
use crate::error::AcquisitionError;

/// What happened to the target path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearOutcome {
    /// Nothing was there.
    Absent,
    /// The stale directory was deleted.
    Removed {
        /// 1-based attempt that succeeded.
        attempt: u32,
    },
    /// The stale directory was moved out of the way.
    RenamedAside(PathBuf),
}

/// Makes sure nothing lives at `path`.
///
/// # Errors
///
/// Returns [`AcquisitionError::CleanupFailed`] if the directory could be
/// neither removed nor renamed aside.
pub fn clear_stale(
    ctx: &ServiceContext,
    config: &AcquireConfig,
    path: &Path,
) -> Result<ClearOutcome, AcquisitionError> {
    clear_with(ctx, config, path, |attempt| remove_attempt(ctx, path, attempt))
}

fn clear_with<F>(
    ctx: &ServiceContext,
    config: &AcquireConfig,
    path: &Path,
    mut remove: F,
) -> Result<ClearOutcome, AcquisitionError>
where
    F: FnMut(u32) -> io::Result<()>,
{
    if !exists(path) {
        return Ok(ClearOutcome::Absent);
    }
    tracing::info!(path = %path.display(), "removing existing directory");

    let attempts = config.cleanup_attempts.max(1);
    for attempt in 0..attempts {
        if let Err(e) = remove(attempt) {
            tracing::warn!(attempt = attempt + 1, "removal attempt failed: {e}");
        }
        if !exists(path) {
            return Ok(ClearOutcome::Removed { attempt: attempt + 1 });
        }
        if attempt + 1 < attempts {
            ctx.clock.sleep(Duration::from_secs(config.cleanup_backoff_secs));
        }
    }

    let aside = backup_path(path, ctx.clock.now().timestamp());
    std::fs::rename(path, &aside).map_err(|e| AcquisitionError::CleanupFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    tracing::warn!(from = %path.display(), to = %aside.display(), "renamed stale directory aside");
    Ok(ClearOutcome::RenamedAside(aside))
}

/// `<name>.backup_<unix-seconds>` next to `path`.
#[must_use]
pub fn backup_path(path: &Path, unix_seconds: i64) -> PathBuf {
    let name = path.file_name().map_or_else(String::new, |n| n.to_string_lossy().into_owned());
    path.with_file_name(format!("{name}.backup_{unix_seconds}"))
}

/// Symlink-aware existence check; a dangling link still blocks the path.
fn exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

fn remove_attempt(ctx: &ServiceContext, path: &Path, attempt: u32) -> io::Result<()> {
    match attempt {
        0 => remove_path(path),
        1 => {
            make_writable(path);
            remove_path(path)
        }
        _ => forced_remove(ctx, path),
    }
}

fn remove_path(path: &Path) -> io::Result<()> {
    let meta = path.symlink_metadata()?;
    if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    }
}

/// Best effort; entries that cannot be changed are left for the next step.
fn make_writable(path: &Path) {
    for entry in WalkDir::new(path).contents_first(true).into_iter().flatten() {
        if entry.path_is_symlink() {
            continue;
        }
        let _ = set_writable(entry.path());
    }
}

#[cfg(unix)]
fn set_writable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o777))
}

#[cfg(not(unix))]
fn set_writable(path: &Path) -> io::Result<()> {
    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_readonly(false);
    std::fs::set_permissions(path, perms)
}

fn forced_remove(ctx: &ServiceContext, path: &Path) -> io::Result<()> {
    let target = path.to_string_lossy();
    let result = if cfg!(windows) {
        ctx.shell.run("cmd", &["/C", "rmdir", "/s", "/q", &target])
    } else {
        ctx.shell.run("rm", &["-rf", &target])
    };
    match result {
        Ok(output) if output.success() => Ok(()),
        Ok(output) => Err(io::Error::other(format!(
            "forced removal exited with {}: {}",
            output.exit_code,
            output.stderr.trim()
        ))),
        Err(e) => Err(io::Error::other(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{replay_context, sleep};
    use serde_json::json;

    #[test]
    fn absent_path_needs_no_work() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = replay_context(&[]);

        let outcome = clear_stale(&ctx, &AcquireConfig::default(), &dir.path().join("none"));
        assert_eq!(outcome.unwrap(), ClearOutcome::Absent);
    }

    #[test]
    fn first_attempt_removes_ordinary_tree() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("widget");
        std::fs::create_dir_all(target.join("src/deep")).unwrap();
        std::fs::write(target.join("src/deep/a.rs"), "fn a() {}").unwrap();
        let ctx = replay_context(&[]);

        let outcome = clear_stale(&ctx, &AcquireConfig::default(), &target).unwrap();
        assert_eq!(outcome, ClearOutcome::Removed { attempt: 1 });
        assert!(!target.exists());
    }

    #[test]
    fn later_attempt_succeeds_after_backoff() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("widget");
        std::fs::create_dir(&target).unwrap();
        let ctx = replay_context(&[sleep(), sleep()]);

        let mut calls = Vec::new();
        let outcome = clear_with(&ctx, &AcquireConfig::default(), &target, |attempt| {
            calls.push(attempt);
            if attempt == 2 {
                std::fs::remove_dir(&target)
            } else {
                Err(io::Error::other("busy"))
            }
        });
        assert_eq!(outcome.unwrap(), ClearOutcome::Removed { attempt: 3 });
        assert_eq!(calls, vec![0, 1, 2]);
    }

    #[test]
    fn stubborn_directory_is_renamed_aside_with_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("widget");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep.txt"), "x").unwrap();
        let ctx = replay_context(&[sleep(), sleep(), ("clock", "now", json!("2023-11-14T22:13:20Z"))]);

        let outcome = clear_with(&ctx, &AcquireConfig::default(), &target, |_| {
            Err(io::Error::other("locked"))
        });

        let aside = dir.path().join("widget.backup_1700000000");
        assert_eq!(outcome.unwrap(), ClearOutcome::RenamedAside(aside.clone()));
        assert!(aside.join("keep.txt").is_file());
        assert!(!target.exists());
    }

    #[test]
    fn backup_path_appends_suffix_to_name() {
        let aside = backup_path(Path::new("/work/widget"), 42);
        assert_eq!(aside, PathBuf::from("/work/widget.backup_42"));
    }

    #[test]
    fn forced_remove_reports_nonzero_exit() {
        let ctx = replay_context(&[(
            "shell",
            "run",
            json!({"Ok": {"exit_code": 1, "stdout": "", "stderr": "rm: busy\n"}}),
        )]);
        let err = forced_remove(&ctx, Path::new("/tmp/whatever")).unwrap_err();
        assert!(err.to_string().contains("rm: busy"));
    }

    #[cfg(unix)]
    #[test]
    fn make_writable_unlocks_read_only_tree() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("locked");
        std::fs::create_dir_all(target.join("inner")).unwrap();
        std::fs::write(target.join("inner/f.txt"), "x").unwrap();
        std::fs::set_permissions(target.join("inner"), std::fs::Permissions::from_mode(0o555))
            .unwrap();

        make_writable(&target);
        let mode = std::fs::metadata(target.join("inner")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o777);
        remove_path(&target).unwrap();
        assert!(!target.exists());
    }
}
