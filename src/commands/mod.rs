//! Command dispatch and handlers.

pub mod acquire;
pub mod classify;
pub mod clean;
pub mod ls;
pub mod read;
pub mod run;

use std::env;
use std::path::PathBuf;

use crate::cli::{Cli, Command};
use crate::config::ScoutConfig;
use crate::context::ServiceContext;

/// Replays port interactions from the named cassette instead of going live.
pub const REPLAY_ENV: &str = "REPOSCOUT_REPLAY";
/// Records port interactions to the named cassette.
pub const RECORD_ENV: &str = "REPOSCOUT_RECORD";

/// Dispatch a parsed command line to its handler.
///
/// # Errors
///
/// Returns an error string if configuration cannot be loaded or the selected
/// command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let config = effective_config(cli)?;
    match &cli.command {
        Command::Acquire { reference } => acquire::run(&context()?, &config, reference),
        Command::Classify { path, json, top } => {
            classify::run(&with_top(config, *top), path, *json)
        }
        Command::Run { reference, json, top, discard } => {
            run::run(&context()?, &with_top(config, *top), reference, *json, *discard)
        }
        Command::Ls { path, dir } => ls::run(&config, path, dir),
        Command::Read { path, file } => read::run(&config, path, file),
        Command::Clean => clean::run(&config),
    }
}

fn effective_config(cli: &Cli) -> Result<ScoutConfig, String> {
    let mut config = ScoutConfig::load(cli.config.as_deref()).map_err(|e| e.to_string())?;
    if let Some(workdir) = &cli.workdir {
        config.workdir.clone_from(workdir);
    }
    Ok(config)
}

fn with_top(mut config: ScoutConfig, top: Option<usize>) -> ScoutConfig {
    if let Some(n) = top {
        config.classify.top_n = n;
    }
    config
}

/// Builds the port context: replaying, recording, or live, in that order.
fn context() -> Result<ServiceContext, String> {
    if let Ok(path) = env::var(REPLAY_ENV) {
        tracing::info!(cassette = %path, "replaying port interactions");
        return ServiceContext::replaying(&PathBuf::from(path));
    }
    if let Ok(path) = env::var(RECORD_ENV) {
        tracing::info!(cassette = %path, "recording port interactions");
        return Ok(ServiceContext::recording(&PathBuf::from(path)));
    }
    Ok(ServiceContext::live())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn workdir_flag_overrides_config() {
        let cli = Cli::parse_from(["reposcout", "--workdir", "/tmp/elsewhere", "clean"]);
        let config = effective_config(&cli).unwrap();
        assert_eq!(config.workdir, PathBuf::from("/tmp/elsewhere"));
    }

    #[test]
    fn top_flag_overrides_ranked_size() {
        let config = with_top(ScoutConfig::default(), Some(3));
        assert_eq!(config.classify.top_n, 3);
        assert_eq!(with_top(ScoutConfig::default(), None).classify.top_n, 15);
    }

    #[test]
    fn missing_config_file_is_reported() {
        let cli = Cli::parse_from(["reposcout", "--config", "/no/such.yaml", "clean"]);
        let err = effective_config(&cli).unwrap_err();
        assert!(err.starts_with("failed to read config"));
    }
}
