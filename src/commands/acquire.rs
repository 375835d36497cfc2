//! `reposcout acquire` command.

use crate::acquire::Acquirer;
use crate::config::ScoutConfig;
use crate::context::ServiceContext;

/// Execute the `acquire` command: clone `reference` and print the copy's path.
///
/// # Errors
///
/// Returns the acquisition error message followed by retry guidance.
pub fn run(ctx: &ServiceContext, config: &ScoutConfig, reference: &str) -> Result<(), String> {
    let mut acquirer = Acquirer::new(ctx, &config.acquire, &config.workdir);
    match acquirer.acquire(reference) {
        Ok(copy) => {
            println!("{}", copy.root().display());
            Ok(())
        }
        Err(e) => Err(format!("{e}\nhint: {}", e.hint())),
    }
}
