//! HTTP probe port for reachability and existence checks.

use std::time::Duration;

/// Issues a GET and reports the response status.
pub trait HttpProbe: Send + Sync {
    /// Sends `GET url` and returns the status code, following redirects.
    ///
    /// Non-2xx statuses are returned as `Ok`; only transport failures
    /// (DNS, TLS, connect, timeout) are errors.
    ///
    /// # Errors
    ///
    /// Returns an error if no HTTP response was received.
    fn get_status(
        &self,
        url: &str,
        timeout: Duration,
        user_agent: Option<&str>,
    ) -> Result<u16, Box<dyn std::error::Error + Send + Sync>>;
}
