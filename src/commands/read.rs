//! `reposcout read` command.

use std::path::Path;

use crate::classify::Classifier;
use crate::config::ScoutConfig;
use crate::report;

/// Execute the `read` command: print the detail report for `root/file`.
///
/// Unreadable files are reported, not treated as command failures.
///
/// # Errors
///
/// Returns an error string if `root` is not a directory.
pub fn run(config: &ScoutConfig, root: &Path, file: &str) -> Result<(), String> {
    if !root.is_dir() {
        return Err(format!("not a directory: {}", root.display()));
    }
    let mut classifier = Classifier::new(root, config.classify.clone());
    print!("{}", report::render_file_detail(&classifier.read_file(file)));
    Ok(())
}
