//! Git port for materializing a remote repository on disk.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How much history a clone attempt asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloneDepth {
    /// `--depth 1 --single-branch`.
    Shallow,
    /// `--single-branch` with full history.
    SingleBranch,
    /// Plain `git clone`.
    Full,
}

impl CloneDepth {
    /// Strategy for a zero-based attempt index; attempts past the last widen to `Full`.
    #[must_use]
    pub fn for_attempt(attempt: u32) -> Self {
        match attempt {
            0 => Self::Shallow,
            1 => Self::SingleBranch,
            _ => Self::Full,
        }
    }

    /// Extra `git clone` flags for this strategy.
    #[must_use]
    pub fn flags(self) -> &'static [&'static str] {
        match self {
            Self::Shallow => &["--depth", "1", "--single-branch"],
            Self::SingleBranch => &["--single-branch"],
            Self::Full => &[],
        }
    }
}

/// Result of a clone process that was started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloneOutcome {
    /// The process exited on its own.
    Finished {
        /// Whether the exit status was zero.
        success: bool,
        /// Captured standard error.
        stderr: String,
    },
    /// The process was killed after exceeding the timeout.
    TimedOut,
}

/// Clones remote repositories.
pub trait GitCloner: Send + Sync {
    /// Clones `url` into `dest` using `depth`, killing the process after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the git process cannot be started; git-level
    /// failures are reported through [`CloneOutcome::Finished`].
    fn clone_repo(
        &self,
        url: &str,
        dest: &Path,
        depth: CloneDepth,
        timeout: Duration,
    ) -> Result<CloneOutcome, Box<dyn std::error::Error + Send + Sync>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_widens_with_each_attempt() {
        assert_eq!(CloneDepth::for_attempt(0), CloneDepth::Shallow);
        assert_eq!(CloneDepth::for_attempt(1), CloneDepth::SingleBranch);
        assert_eq!(CloneDepth::for_attempt(2), CloneDepth::Full);
        assert_eq!(CloneDepth::for_attempt(7), CloneDepth::Full);
    }

    #[test]
    fn shallow_flags_limit_history() {
        assert_eq!(CloneDepth::Shallow.flags(), &["--depth", "1", "--single-branch"]);
        assert!(CloneDepth::Full.flags().is_empty());
    }
}
