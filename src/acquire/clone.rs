//! Clone with retries, widening the history depth on each attempt.

use std::path::Path;
use std::time::Duration;

use crate::config::AcquireConfig;
use crate::context::ServiceContext;
use crate::error::{AcquisitionError, CopyFailureKind};
use crate::ports::git::{CloneDepth, CloneOutcome};

/// How a failed attempt's stderr is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The destination already had content.
    NotEmpty,
    /// The remote does not exist.
    NotFound,
    /// Authentication or authorization was refused.
    PermissionDenied,
    /// Anything else; worth another try.
    Transient,
}

/// Classifies git stderr, case-insensitively.
#[must_use]
pub fn classify_failure(stderr: &str) -> FailureClass {
    let lower = stderr.to_lowercase();
    if lower.contains("already exists and is not an empty directory") {
        FailureClass::NotEmpty
    } else if lower.contains("not found") || lower.contains("does not exist") {
        FailureClass::NotFound
    } else if lower.contains("permission denied") || lower.contains("forbidden") {
        FailureClass::PermissionDenied
    } else {
        FailureClass::Transient
    }
}

/// Clones `url` into `dest`, retrying with progressively deeper history.
///
/// Returns the 1-based attempt that succeeded.
///
/// # Errors
///
/// * [`AcquisitionError::CopyFailed`] with [`CopyFailureKind::NotFound`] or
///   [`CopyFailureKind::PermissionDenied`] as soon as git reports either.
/// * [`AcquisitionError::CopyTimeout`] when the final attempt times out.
/// * [`AcquisitionError::CopyFailed`] with [`CopyFailureKind::Exhausted`] or
///   [`CopyFailureKind::Spawn`] when every attempt failed otherwise.
pub fn clone_with_retries(
    ctx: &ServiceContext,
    config: &AcquireConfig,
    url: &str,
    dest: &Path,
) -> Result<u32, AcquisitionError> {
    let attempts = config.clone_attempts.max(1);
    let mut last_error = AcquisitionError::CopyFailed {
        kind: CopyFailureKind::Exhausted,
        detail: "no attempt was made".to_string(),
    };

    for attempt in 0..attempts {
        let depth = CloneDepth::for_attempt(attempt);
        let is_last = attempt + 1 == attempts;
        tracing::info!(attempt = attempt + 1, of = attempts, ?depth, "cloning {url}");

        match ctx.git.clone_repo(url, dest, depth, config.clone_timeout()) {
            Ok(CloneOutcome::Finished { success: true, .. }) => {
                tracing::info!(attempt = attempt + 1, "clone succeeded");
                return Ok(attempt + 1);
            }
            // Timeouts go straight to the next, wider attempt.
            Ok(CloneOutcome::TimedOut) => {
                tracing::warn!(attempt = attempt + 1, "clone timed out");
                discard_partial(dest);
                last_error = AcquisitionError::CopyTimeout { attempts: attempt + 1 };
                continue;
            }
            Ok(CloneOutcome::Finished { success: false, stderr }) => {
                let detail = stderr.trim().to_string();
                match classify_failure(&stderr) {
                    FailureClass::NotFound => {
                        return Err(AcquisitionError::CopyFailed {
                            kind: CopyFailureKind::NotFound,
                            detail,
                        });
                    }
                    FailureClass::PermissionDenied => {
                        return Err(AcquisitionError::CopyFailed {
                            kind: CopyFailureKind::PermissionDenied,
                            detail,
                        });
                    }
                    FailureClass::NotEmpty => {
                        tracing::warn!(attempt = attempt + 1, "target not empty, clearing it");
                        discard_partial(dest);
                        last_error =
                            AcquisitionError::CopyFailed { kind: CopyFailureKind::Exhausted, detail };
                        if !is_last {
                            ctx.clock.sleep(Duration::from_secs(config.not_empty_settle_secs));
                        }
                        continue;
                    }
                    FailureClass::Transient => {
                        tracing::warn!(attempt = attempt + 1, "clone failed: {detail}");
                        discard_partial(dest);
                        last_error =
                            AcquisitionError::CopyFailed { kind: CopyFailureKind::Exhausted, detail };
                    }
                }
            }
            Err(e) => {
                tracing::warn!(attempt = attempt + 1, "could not start git: {e}");
                last_error = AcquisitionError::CopyFailed {
                    kind: CopyFailureKind::Spawn,
                    detail: e.to_string(),
                };
                continue;
            }
        }

        if !is_last {
            let wait = backoff(config, attempt);
            if !wait.is_zero() {
                tracing::debug!(secs = wait.as_secs(), "waiting before next attempt");
                ctx.clock.sleep(wait);
            }
        }
    }

    Err(last_error)
}

/// Linear backoff after a failed zero-based `attempt`.
fn backoff(config: &AcquireConfig, attempt: u32) -> Duration {
    Duration::from_secs(u64::from(attempt + 1) * config.clone_backoff_step_secs)
}

fn discard_partial(dest: &Path) {
    if dest.symlink_metadata().is_ok() {
        if let Err(e) = std::fs::remove_dir_all(dest) {
            tracing::warn!(path = %dest.display(), "could not remove partial clone: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{clone_finished, clone_spawn_error, clone_timed_out, replay_context, sleep};

    fn run(entries: &[(&str, &str, serde_json::Value)]) -> (Result<u32, AcquisitionError>, bool) {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("widget");
        let ctx = replay_context(entries);
        let result =
            clone_with_retries(&ctx, &AcquireConfig::default(), "https://github.com/a/widget", &dest);
        (result, dest.join(".git").is_dir())
    }

    #[test]
    fn stderr_classification_is_case_insensitive() {
        assert_eq!(
            classify_failure("fatal: destination path 'x' Already Exists And Is Not An Empty Directory."),
            FailureClass::NotEmpty
        );
        assert_eq!(classify_failure("remote: Repository not found."), FailureClass::NotFound);
        assert_eq!(classify_failure("fatal: repo does not exist"), FailureClass::NotFound);
        assert_eq!(
            classify_failure("git@github.com: Permission denied (publickey)."),
            FailureClass::PermissionDenied
        );
        assert_eq!(classify_failure("HTTP 403 Forbidden"), FailureClass::PermissionDenied);
        assert_eq!(classify_failure("early EOF"), FailureClass::Transient);
    }

    #[test]
    fn first_attempt_success_needs_no_wait() {
        let (result, marker) = run(&[clone_finished(true, "")]);
        assert_eq!(result.unwrap(), 1);
        assert!(marker);
    }

    #[test]
    fn transient_failures_back_off_then_succeed() {
        let (result, _) = run(&[
            clone_finished(false, "fatal: early EOF"),
            sleep(),
            clone_finished(false, "fatal: the remote end hung up"),
            sleep(),
            clone_finished(true, ""),
        ]);
        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn backoff_grows_linearly() {
        let config = AcquireConfig::default();
        assert_eq!(backoff(&config, 0), Duration::from_secs(3));
        assert_eq!(backoff(&config, 1), Duration::from_secs(6));
    }

    #[test]
    fn not_found_stops_immediately() {
        let (result, _) = run(&[clone_finished(false, "remote: Repository not found.")]);
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            AcquisitionError::CopyFailed { kind: CopyFailureKind::NotFound, .. }
        ));
    }

    #[test]
    fn permission_denied_stops_immediately() {
        let (result, _) = run(&[clone_finished(false, "fatal: Permission denied")]);
        assert!(matches!(
            result.unwrap_err(),
            AcquisitionError::CopyFailed { kind: CopyFailureKind::PermissionDenied, .. }
        ));
    }

    #[test]
    fn timeout_on_final_attempt_is_copy_timeout() {
        let (result, _) = run(&[clone_timed_out(), clone_timed_out(), clone_timed_out()]);
        assert!(matches!(result.unwrap_err(), AcquisitionError::CopyTimeout { attempts: 3 }));
    }

    #[test]
    fn earlier_timeout_is_retried_without_waiting() {
        let (result, marker) = run(&[clone_timed_out(), clone_finished(true, "")]);
        assert_eq!(result.unwrap(), 2);
        assert!(marker);
    }

    #[test]
    fn spawn_failure_retries_without_waiting() {
        let (result, marker) =
            run(&[clone_spawn_error("No such file or directory"), clone_finished(true, "")]);
        assert_eq!(result.unwrap(), 2);
        assert!(marker);
    }

    #[test]
    fn spawn_failure_on_every_attempt_is_reported() {
        let (result, _) = run(&[
            clone_spawn_error("git missing"),
            clone_spawn_error("git missing"),
            clone_spawn_error("git still missing"),
        ]);
        match result.unwrap_err() {
            AcquisitionError::CopyFailed { kind: CopyFailureKind::Spawn, detail } => {
                assert_eq!(detail, "git still missing");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn not_empty_target_settles_and_retries() {
        let (result, _) = run(&[
            clone_finished(false, "fatal: destination path 'widget' already exists and is not an empty directory."),
            sleep(),
            clone_finished(true, ""),
        ]);
        assert_eq!(result.unwrap(), 2);
    }

    #[test]
    fn exhausted_attempts_report_last_detail() {
        let (result, _) = run(&[
            clone_finished(false, "boom 1"),
            sleep(),
            clone_finished(false, "boom 2"),
            sleep(),
            clone_finished(false, "boom 3\n"),
        ]);
        match result.unwrap_err() {
            AcquisitionError::CopyFailed { kind: CopyFailureKind::Exhausted, detail } => {
                assert_eq!(detail, "boom 3");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
