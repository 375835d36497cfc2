//! Test helpers shared by unit tests.

use serde_json::Value;

use crate::adapters::replaying::test_support::replayer;
use crate::adapters::replaying::{
    ReplayingClock, ReplayingGitCloner, ReplayingHttpProbe, ReplayingShellExecutor,
};
use crate::context::ServiceContext;

/// Builds a context whose ports replay `(port, method, output)` triples.
///
/// A port asked for more than was scripted panics with "Cassette exhausted".
pub fn replay_context(entries: &[(&str, &str, Value)]) -> ServiceContext {
    ServiceContext::from_ports(
        Box::new(ReplayingClock::new(replayer(entries))),
        Box::new(ReplayingHttpProbe::new(replayer(entries))),
        Box::new(ReplayingGitCloner::new(replayer(entries))),
        Box::new(ReplayingShellExecutor::new(replayer(entries))),
    )
}

/// Scripted clock sleep.
pub fn sleep() -> (&'static str, &'static str, Value) {
    ("clock", "sleep", Value::Null)
}

/// Scripted HTTP status.
pub fn status(code: u16) -> (&'static str, &'static str, Value) {
    ("http", "get_status", serde_json::json!({ "Ok": code }))
}

/// Scripted HTTP transport failure.
pub fn transport_error(msg: &str) -> (&'static str, &'static str, Value) {
    ("http", "get_status", serde_json::json!({ "Err": msg }))
}

/// Scripted clone that exited with the given status and stderr.
pub fn clone_finished(success: bool, stderr: &str) -> (&'static str, &'static str, Value) {
    (
        "git",
        "clone_repo",
        serde_json::json!({ "Ok": { "finished": { "success": success, "stderr": stderr } } }),
    )
}

/// Scripted clone that hit its timeout.
pub fn clone_timed_out() -> (&'static str, &'static str, Value) {
    ("git", "clone_repo", serde_json::json!({ "Ok": "timed_out" }))
}

/// Scripted clone whose git process could not be started.
pub fn clone_spawn_error(msg: &str) -> (&'static str, &'static str, Value) {
    ("git", "clone_repo", serde_json::json!({ "Err": msg }))
}
