//! Replaying adapter for the `GitCloner` port.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::git::{CloneDepth, CloneOutcome, GitCloner};

/// Replays recorded clone outcomes.
///
/// When a recorded clone succeeded, a `.git` marker directory is created at
/// the destination so post-clone checks see a non-empty working copy.
pub struct ReplayingGitCloner {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingGitCloner {
    /// Creates a new replaying cloner from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl GitCloner for ReplayingGitCloner {
    fn clone_repo(
        &self,
        _url: &str,
        dest: &Path,
        _depth: CloneDepth,
        _timeout: Duration,
    ) -> Result<CloneOutcome, Box<dyn std::error::Error + Send + Sync>> {
        let output = next_output(&self.replayer, "git", "clone_repo");
        let outcome: CloneOutcome = replay_result(&output, "git::clone_repo")?;
        if matches!(outcome, CloneOutcome::Finished { success: true, .. }) {
            std::fs::create_dir_all(dest.join(".git"))?;
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::replaying::test_support::replayer;
    use serde_json::json;

    #[test]
    fn successful_clone_materializes_marker() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("widget");
        let git = ReplayingGitCloner::new(replayer(&[(
            "git",
            "clone_repo",
            json!({"Ok": {"finished": {"success": true, "stderr": ""}}}),
        )]));

        let outcome =
            git.clone_repo("https://x/a/b", &dest, CloneDepth::Shallow, Duration::from_secs(1));
        assert_eq!(outcome.unwrap(), CloneOutcome::Finished { success: true, stderr: String::new() });
        assert!(dest.join(".git").is_dir());
    }

    #[test]
    fn timed_out_clone_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("widget");
        let git =
            ReplayingGitCloner::new(replayer(&[("git", "clone_repo", json!({"Ok": "timed_out"}))]));

        let outcome =
            git.clone_repo("https://x/a/b", &dest, CloneDepth::Full, Duration::from_secs(1));
        assert_eq!(outcome.unwrap(), CloneOutcome::TimedOut);
        assert!(!dest.exists());
    }
}
