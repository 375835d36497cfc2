//! Replaying adapter for the `HttpProbe` port.

use std::sync::Mutex;
use std::time::Duration;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::http::HttpProbe;

/// Replays recorded probe statuses and transport errors.
pub struct ReplayingHttpProbe {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingHttpProbe {
    /// Creates a new replaying probe from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl HttpProbe for ReplayingHttpProbe {
    fn get_status(
        &self,
        _url: &str,
        _timeout: Duration,
        _user_agent: Option<&str>,
    ) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        let output = next_output(&self.replayer, "http", "get_status");
        replay_result(&output, "http::get_status")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::replaying::test_support::replayer;
    use serde_json::json;

    #[test]
    fn serves_statuses_in_order() {
        let probe = ReplayingHttpProbe::new(replayer(&[
            ("http", "get_status", json!({"Ok": 200})),
            ("http", "get_status", json!({"Ok": 403})),
        ]));
        let timeout = Duration::from_secs(1);
        assert_eq!(probe.get_status("https://github.com", timeout, None).unwrap(), 200);
        assert_eq!(probe.get_status("https://github.com/a/b", timeout, None).unwrap(), 403);
    }

    #[test]
    fn serves_transport_errors() {
        let probe = ReplayingHttpProbe::new(replayer(&[(
            "http",
            "get_status",
            json!({"Err": "dns error"}),
        )]));
        let err = probe.get_status("https://github.com", Duration::from_secs(1), None);
        assert_eq!(err.unwrap_err().to_string(), "dns error");
    }
}
