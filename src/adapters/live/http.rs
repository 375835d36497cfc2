//! Live HTTP probe backed by a blocking `reqwest` client.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;

use crate::ports::http::HttpProbe;

/// Live probe that performs real GET requests.
pub struct LiveHttpProbe {
    client: Client,
}

impl LiveHttpProbe {
    /// Creates a probe with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self { client: Client::new() }
    }
}

impl Default for LiveHttpProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpProbe for LiveHttpProbe {
    fn get_status(
        &self,
        url: &str,
        timeout: Duration,
        user_agent: Option<&str>,
    ) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        let mut request = self.client.get(url).timeout(timeout);
        if let Some(agent) = user_agent {
            request = request.header(USER_AGENT, agent);
        }
        let response = request.send().map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
            format!("GET {url} failed: {e}").into()
        })?;
        Ok(response.status().as_u16())
    }
}
