//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::git::LiveGitCloner;
use crate::adapters::live::http::LiveHttpProbe;
use crate::adapters::live::shell::LiveShellExecutor;
use crate::adapters::recording::{
    RecordingClock, RecordingGitCloner, RecordingHttpProbe, RecordingShellExecutor,
};
use crate::adapters::replaying::{
    ReplayingClock, ReplayingGitCloner, ReplayingHttpProbe, ReplayingShellExecutor,
};
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::clock::Clock;
use crate::ports::git::GitCloner;
use crate::ports::http::HttpProbe;
use crate::ports::shell::ShellExecutor;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, recording, replaying).
pub struct ServiceContext {
    /// Clock for timestamps and retry waits.
    pub clock: Box<dyn Clock>,
    /// HTTP probe for reachability and existence checks.
    pub http: Box<dyn HttpProbe>,
    /// Git cloner for materializing working copies.
    pub git: Box<dyn GitCloner>,
    /// Process runner for forced removal.
    pub shell: Box<dyn ShellExecutor>,
    /// Shared recorder; the cassette is written when the context drops.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a live context with real adapters for every port.
    #[must_use]
    pub fn live() -> Self {
        Self::from_ports(
            Box::new(LiveClock),
            Box::new(LiveHttpProbe::new()),
            Box::new(LiveGitCloner),
            Box::new(LiveShellExecutor),
        )
    }

    /// Creates a context from explicit port implementations.
    #[must_use]
    pub fn from_ports(
        clock: Box<dyn Clock>,
        http: Box<dyn HttpProbe>,
        git: Box<dyn GitCloner>,
        shell: Box<dyn ShellExecutor>,
    ) -> Self {
        Self { clock, http, git, shell, recorder: None }
    }

    /// Creates a live context that also records every port interaction.
    ///
    /// The cassette is written to `path` when this context is dropped.
    #[must_use]
    pub fn recording(path: &Path) -> Self {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(path, "reposcout-session")));
        Self {
            clock: Box::new(RecordingClock::new(Box::new(LiveClock), Arc::clone(&recorder))),
            http: Box::new(RecordingHttpProbe::new(
                Box::new(LiveHttpProbe::new()),
                Arc::clone(&recorder),
            )),
            git: Box::new(RecordingGitCloner::new(Box::new(LiveGitCloner), Arc::clone(&recorder))),
            shell: Box::new(RecordingShellExecutor::new(
                Box::new(LiveShellExecutor),
                Arc::clone(&recorder),
            )),
            recorder: Some(recorder),
        }
    }

    /// Creates a replaying context from a cassette file.
    ///
    /// Each port gets its own replayer over the same cassette so per-port
    /// cursors are independent.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        Ok(Self::from_ports(
            Box::new(ReplayingClock::new(CassetteReplayer::new(&cassette))),
            Box::new(ReplayingHttpProbe::new(CassetteReplayer::new(&cassette))),
            Box::new(ReplayingGitCloner::new(CassetteReplayer::new(&cassette))),
            Box::new(ReplayingShellExecutor::new(CassetteReplayer::new(&cassette))),
        ))
    }

    /// Notes the reference being acquired in the cassette, when recording.
    pub fn note_reference(&self, reference: &str) {
        if let Some(recorder) = &self.recorder {
            recorder.lock().expect("recorder lock poisoned").set_reference(reference);
        }
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        if let Some(recorder) = self.recorder.take() {
            let guard = recorder.lock().expect("recorder lock poisoned");
            match guard.write() {
                Ok(path) => tracing::info!(cassette = %path.display(), "recording saved"),
                Err(e) => tracing::warn!("failed to write cassette: {e}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Interaction;
    use chrono::Utc;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn replaying_context_serves_every_port() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("full.cassette.yaml");
        let entries = [
            ("clock", "now", json!("2024-06-15T10:30:00Z")),
            ("http", "get_status", json!({"Ok": 200})),
            ("shell", "run", json!({"Ok": {"exit_code": 0, "stdout": "", "stderr": ""}})),
        ];
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            reference: String::new(),
            interactions: entries
                .iter()
                .enumerate()
                .map(|(seq, (port, method, output))| Interaction {
                    seq: seq as u64,
                    port: (*port).into(),
                    method: (*method).into(),
                    input: json!({}),
                    output: output.clone(),
                })
                .collect(),
        };
        std::fs::write(&path, serde_yaml::to_string(&cassette).unwrap()).unwrap();

        let ctx = ServiceContext::replaying(&path).unwrap();
        assert_eq!(ctx.clock.now().to_rfc3339(), "2024-06-15T10:30:00+00:00");
        assert_eq!(ctx.http.get_status("https://h", Duration::from_secs(1), None).unwrap(), 200);
        assert!(ctx.shell.run("rm", &["-rf", "x"]).unwrap().success());
    }

    #[test]
    fn replaying_missing_cassette_is_an_error() {
        let result = ServiceContext::replaying(Path::new("/no/such/cassette.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn recording_context_writes_cassette_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.cassette.yaml");

        let ctx = ServiceContext::recording(&path);
        ctx.note_reference("https://github.com/acme/widget");
        let _ = ctx.clock.now();
        drop(ctx);

        let cassette = Cassette::load(&path).unwrap();
        assert_eq!(cassette.reference, "https://github.com/acme/widget");
        assert_eq!(cassette.interactions.len(), 1);
        assert_eq!(cassette.interactions[0].port, "clock");
    }
}
