//! Binary entrypoint for the `reposcout` CLI.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

/// Set to `1` to emit logs as JSON lines.
const LOG_JSON_ENV: &str = "REPOSCOUT_LOG_JSON";

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "reposcout=info".into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if std::env::var(LOG_JSON_ENV).is_ok_and(|v| v == "1") {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    // Recording and replay are selected in commands::dispatch via REPOSCOUT_RECORD / REPOSCOUT_REPLAY.
    match reposcout::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
