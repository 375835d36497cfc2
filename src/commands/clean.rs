//! `reposcout clean` command.

use crate::acquire::clean_workspace;
use crate::config::ScoutConfig;

/// Execute the `clean` command: remove the working directory.
///
/// # Errors
///
/// Returns an error string if the directory exists but cannot be removed.
pub fn run(config: &ScoutConfig) -> Result<(), String> {
    let workdir = &config.workdir;
    match clean_workspace(workdir) {
        Ok(true) => println!("Removed {}", workdir.display()),
        Ok(false) => println!("Nothing to clean at {}", workdir.display()),
        Err(e) => return Err(format!("failed to remove {}: {e}", workdir.display())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_workdir_once() {
        let dir = tempfile::tempdir().unwrap();
        let workdir = dir.path().join("work");
        std::fs::create_dir_all(workdir.join("widget")).unwrap();
        let config = ScoutConfig { workdir: workdir.clone(), ..ScoutConfig::default() };

        run(&config).unwrap();
        assert!(!workdir.exists());
        run(&config).unwrap();
    }
}
