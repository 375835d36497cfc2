//! Recording adapter for the `GitCloner` port.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{CloneDepth, CloneOutcome, GitCloner};

/// Records clone interactions while delegating to an inner implementation.
pub struct RecordingGitCloner {
    inner: Box<dyn GitCloner>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingGitCloner {
    /// Creates a new recording cloner wrapping the given implementation.
    pub fn new(inner: Box<dyn GitCloner>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct CloneInput<'a> {
    url: &'a str,
    dest: &'a Path,
    depth: CloneDepth,
    timeout_secs: u64,
}

impl GitCloner for RecordingGitCloner {
    fn clone_repo(
        &self,
        url: &str,
        dest: &Path,
        depth: CloneDepth,
        timeout: Duration,
    ) -> Result<CloneOutcome, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.clone_repo(url, dest, depth, timeout);
        let input = CloneInput { url, dest, depth, timeout_secs: timeout.as_secs() };
        record_result(&self.recorder, "git", "clone_repo", &input, &result);
        result
    }
}
