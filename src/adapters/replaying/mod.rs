//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod git;
pub mod http;
pub mod shell;

pub use clock::ReplayingClock;
pub use git::ReplayingGitCloner;
pub use http::ReplayingHttpProbe;
pub use shell::ReplayingShellExecutor;

use std::sync::Mutex;

use crate::cassette::replayer::CassetteReplayer;

/// Pulls the next output for `port::method` out of a shared replayer.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut replayer = replayer.lock().expect("replayer lock poisoned");
    replayer.next_interaction(port, method).output.clone()
}

/// Decodes a recorded `Result` written as `{"Ok": v}` or `{"Err": "msg"}`.
///
/// Lower-case `ok`/`err` keys are accepted for hand-written cassettes.
pub(crate) fn replay_result<T: serde::de::DeserializeOwned>(
    output: &serde_json::Value,
    context: &str,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    if let Some(err) = output.get("Err").or_else(|| output.get("err")) {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("Ok").or_else(|| output.get("ok")).unwrap_or(output);
    serde_json::from_value(value.clone())
        .map_err(|e| format!("{context}: failed to deserialize: {e}").into())
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn replay_result_accepts_both_key_cases() {
        let upper: u16 = replay_result(&json!({"Ok": 200}), "t").unwrap();
        let lower: u16 = replay_result(&json!({"ok": 404}), "t").unwrap();
        assert_eq!((upper, lower), (200, 404));
    }

    #[test]
    fn replay_result_surfaces_recorded_error() {
        let result: Result<u16, _> = replay_result(&json!({"Err": "dns failure"}), "t");
        assert_eq!(result.unwrap_err().to_string(), "dns failure");
    }

    #[test]
    fn replay_result_reports_shape_mismatch() {
        let result: Result<u16, _> = replay_result(&json!({"Ok": "not a number"}), "http");
        assert!(result.unwrap_err().to_string().starts_with("http: failed to deserialize"));
    }
}
