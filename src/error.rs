//! Error types for acquisition, configuration, and pipeline runs.

use std::path::PathBuf;

use thiserror::Error;

/// Why a clone attempt sequence stopped for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyFailureKind {
    /// git reported that the remote repository does not exist.
    NotFound,
    /// git reported an authentication or authorization failure.
    PermissionDenied,
    /// Every attempt failed with a transient error.
    Exhausted,
    /// The git process could not be started on the final attempt.
    Spawn,
}

impl std::fmt::Display for CopyFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::NotFound => "repository not found",
            Self::PermissionDenied => "permission denied",
            Self::Exhausted => "all attempts failed",
            Self::Spawn => "git could not be started",
        };
        f.write_str(label)
    }
}

/// Terminal failures of the Acquirer.
///
/// Every variant ends the run; nothing partial is handed to the classifier.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// The reference does not have the `https://<host>/<owner>/<name>` shape.
    #[error("invalid repository reference: {reference}")]
    InvalidReference {
        /// The rejected input.
        reference: String,
    },

    /// The host root could not be reached or did not answer 200.
    #[error("host {host} is unreachable: {detail}")]
    NetworkUnreachable {
        /// Host that was probed.
        host: String,
        /// Status code or transport error text.
        detail: String,
    },

    /// The resource probe answered 404.
    #[error("repository not found: {reference}")]
    ResourceNotFound {
        /// The probed reference.
        reference: String,
    },

    /// The resource probe answered 403.
    #[error("access denied to {reference} (private repository or rate limit)")]
    AccessDenied {
        /// The probed reference.
        reference: String,
    },

    /// The resource probe answered with another non-200 status.
    #[error("repository probe for {reference} returned HTTP {status}")]
    ResourceProbeFailed {
        /// The probed reference.
        reference: String,
        /// The unexpected status code.
        status: u16,
    },

    /// The final clone attempt exceeded its timeout.
    #[error("clone timed out after {attempts} attempts")]
    CopyTimeout {
        /// Number of attempts made.
        attempts: u32,
    },

    /// git failed in a way that retrying will not fix.
    #[error("clone failed ({kind}): {detail}")]
    CopyFailed {
        /// Classification of the failure.
        kind: CopyFailureKind,
        /// Trimmed git stderr or spawn error.
        detail: String,
    },

    /// The working directory could not be prepared: a stale copy could
    /// neither be removed nor renamed aside, or the base could not be created.
    #[error("could not prepare working directory {}: {detail}", path.display())]
    CleanupFailed {
        /// The directory that is still in the way.
        path: PathBuf,
        /// Underlying I/O error text.
        detail: String,
    },

    /// Clone reported success but the target is missing, not a directory, or empty.
    #[error("clone post-condition failed for {}: {detail}", path.display())]
    PostConditionFailed {
        /// Expected working-copy root.
        path: PathBuf,
        /// Which check failed.
        detail: String,
    },
}

impl AcquisitionError {
    /// Short retry guidance for people reading the error in a terminal.
    #[must_use]
    pub fn hint(&self) -> &'static str {
        match self {
            Self::InvalidReference { .. } => {
                "check the URL; expected https://<host>/<owner>/<repository>"
            }
            Self::NetworkUnreachable { .. } => "check your network connection and proxy settings",
            Self::ResourceNotFound { .. } => "check the owner and repository name",
            Self::AccessDenied { .. } => "the repository may be private, or the rate limit was hit",
            Self::ResourceProbeFailed { .. } => "the host answered unexpectedly; try again later",
            Self::CopyTimeout { .. } => "the repository may be too large to clone in time",
            Self::CopyFailed { kind: CopyFailureKind::PermissionDenied, .. } => {
                "the repository may be private"
            }
            Self::CopyFailed { .. } => "check that git is installed and the URL is correct",
            Self::CleanupFailed { .. } => "remove the stale directory by hand and retry",
            Self::PostConditionFailed { .. } => "the remote repository may be empty",
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for [`crate::config::ScoutConfig`].
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },
}

/// Errors raised by a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Acquisition ended the run.
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    /// An operation was requested from a state that does not allow it.
    #[error("cannot {operation} while the run is {state}")]
    InvalidTransition {
        /// The attempted operation.
        operation: &'static str,
        /// The state the run was in.
        state: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_reference_message_names_input() {
        let err = AcquisitionError::InvalidReference { reference: "ftp://x".into() };
        assert_eq!(err.to_string(), "invalid repository reference: ftp://x");
        assert!(err.hint().contains("check the URL"));
    }

    #[test]
    fn copy_failed_hint_depends_on_kind() {
        let private = AcquisitionError::CopyFailed {
            kind: CopyFailureKind::PermissionDenied,
            detail: "fatal: Authentication failed".into(),
        };
        assert!(private.hint().contains("private"));
        assert!(private.to_string().contains("permission denied"));

        let other =
            AcquisitionError::CopyFailed { kind: CopyFailureKind::Exhausted, detail: "x".into() };
        assert!(other.hint().contains("git is installed"));
    }

    #[test]
    fn pipeline_error_wraps_acquisition_transparently() {
        let err: PipelineError =
            AcquisitionError::ResourceNotFound { reference: "https://h/a/b".into() }.into();
        assert_eq!(err.to_string(), "repository not found: https://h/a/b");
    }
}
