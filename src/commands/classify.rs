//! `reposcout classify` command.

use std::path::Path;

use crate::acquire::WorkingCopy;
use crate::classify::Classifier;
use crate::config::ScoutConfig;
use crate::pipeline::Analysis;
use crate::report;

/// Execute the `classify` command on a local tree.
///
/// # Errors
///
/// Returns an error string if the path is not a directory or JSON encoding fails.
pub fn run(config: &ScoutConfig, path: &Path, json: bool) -> Result<(), String> {
    if !path.is_dir() {
        return Err(format!("not a directory: {}", path.display()));
    }
    let copy = WorkingCopy::local(path.to_path_buf());
    let mut classifier = Classifier::for_copy(&copy, config.classify.clone());
    let index = classifier.classify();
    let details = classifier.detail_ranked(&index);
    print_analysis(&Analysis { index, details }, json)
}

/// Prints an analysis as JSON or as the text reports.
///
/// # Errors
///
/// Returns an error string if JSON encoding fails.
pub fn print_analysis(analysis: &Analysis, json: bool) -> Result<(), String> {
    if json {
        let text = serde_json::to_string_pretty(analysis)
            .map_err(|e| format!("failed to encode analysis: {e}"))?;
        println!("{text}");
        return Ok(());
    }
    print!("{}", report::render_index(&analysis.index));
    if !analysis.details.is_empty() {
        println!("\n## Ranked files ({})\n", analysis.details.len());
        for detail in &analysis.details {
            println!("{}", report::render_file_detail(detail));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_directory() {
        let err = run(&ScoutConfig::default(), Path::new("/definitely/missing"), false).unwrap_err();
        assert!(err.starts_with("not a directory"));
    }

    #[test]
    fn classifies_a_local_tree() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.py"), "def main():\n    pass\n").unwrap();
        assert!(run(&ScoutConfig::default(), dir.path(), true).is_ok());
    }
}
