//! Recording adapter for the `HttpProbe` port.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::HttpProbe;

/// Records probe interactions while delegating to an inner implementation.
pub struct RecordingHttpProbe {
    inner: Box<dyn HttpProbe>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingHttpProbe {
    /// Creates a new recording probe wrapping the given implementation.
    pub fn new(inner: Box<dyn HttpProbe>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct ProbeInput<'a> {
    url: &'a str,
    timeout_secs: u64,
}

impl HttpProbe for RecordingHttpProbe {
    fn get_status(
        &self,
        url: &str,
        timeout: Duration,
        user_agent: Option<&str>,
    ) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.get_status(url, timeout, user_agent);
        let input = ProbeInput { url, timeout_secs: timeout.as_secs() };
        record_result(&self.recorder, "http", "get_status", &input, &result);
        result
    }
}
