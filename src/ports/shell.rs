//! Shell executor port for running external commands.

use serde::{Deserialize, Serialize};

/// The output of a command execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellOutput {
    /// The exit code of the process (`-1` when killed by a signal).
    pub exit_code: i32,
    /// The captured standard output.
    pub stdout: String,
    /// The captured standard error.
    pub stderr: String,
}

impl ShellOutput {
    /// Returns `true` when the process exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs a program with arguments, without shell interpolation.
///
/// Used as the last-resort removal step for stale working copies.
pub trait ShellExecutor: Send + Sync {
    /// Runs `program` with `args` and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn run(
        &self,
        program: &str,
        args: &[&str],
    ) -> Result<ShellOutput, Box<dyn std::error::Error + Send + Sync>>;
}
