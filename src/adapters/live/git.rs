//! Live git adapter that shells out to the `git` CLI.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::ports::git::{CloneDepth, CloneOutcome, GitCloner};

/// How often a running clone is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Live git adapter; one `git clone` process per call.
pub struct LiveGitCloner;

impl GitCloner for LiveGitCloner {
    fn clone_repo(
        &self,
        url: &str,
        dest: &Path,
        depth: CloneDepth,
        timeout: Duration,
    ) -> Result<CloneOutcome, Box<dyn std::error::Error + Send + Sync>> {
        let child = Command::new("git")
            .arg("clone")
            .args(depth.flags())
            .arg(url)
            .arg(dest)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        Ok(match wait_with_timeout(child, timeout)? {
            Some((status, stderr)) => CloneOutcome::Finished { success: status.success(), stderr },
            None => CloneOutcome::TimedOut,
        })
    }
}

/// Waits for `child`, collecting its stderr as it runs.
///
/// Returns `None` after killing the child once `timeout` has elapsed.
fn wait_with_timeout(
    mut child: Child,
    timeout: Duration,
) -> std::io::Result<Option<(ExitStatus, String)>> {
    let reader = child.stderr.take().map(drain);

    let started = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if started.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            // The reader is left detached; helpers spawned by git may still hold the pipe.
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    };

    let stderr = reader.and_then(|handle| handle.join().ok()).unwrap_or_default();
    Ok(Some((status, stderr)))
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut bytes = Vec::new();
        let _ = pipe.read_to_end(&mut bytes);
        String::from_utf8_lossy(&bytes).into_owned()
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Child {
        Command::new("sh")
            .args(["-c", script])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap()
    }

    #[test]
    fn large_stderr_does_not_stall_the_child() {
        let child = sh("head -c 200000 /dev/zero | tr '\\0' x >&2; exit 3");
        let (status, stderr) = wait_with_timeout(child, Duration::from_secs(30)).unwrap().unwrap();
        assert_eq!(status.code(), Some(3));
        assert_eq!(stderr.len(), 200_000);
    }

    #[test]
    fn slow_child_times_out() {
        let child = sh("sleep 5");
        assert!(wait_with_timeout(child, Duration::from_millis(200)).unwrap().is_none());
    }
}
