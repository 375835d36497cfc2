//! `reposcout ls` command.

use std::path::Path;

use crate::classify::directory;
use crate::config::ScoutConfig;
use crate::report;

/// Execute the `ls` command: a shallow summary of `root/dir`.
///
/// # Errors
///
/// Returns an error string if the directory cannot be listed.
pub fn run(config: &ScoutConfig, root: &Path, dir: &str) -> Result<(), String> {
    let rel = dir.trim_matches('/');
    let summary = directory::summarize(root, rel, config.classify.directory_scan_limit)
        .map_err(|e| format!("cannot list {}: {e}", root.join(rel).display()))?;
    print!("{}", report::render_directory_summary(&summary));
    Ok(())
}
