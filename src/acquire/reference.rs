//! Repository reference validation and local naming.

use regex::Regex;

use crate::error::AcquisitionError;

/// A validated `https://<host>/<owner>/<name>[/]` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoReference {
    url: String,
    host: String,
    owner: String,
    name: String,
}

impl RepoReference {
    /// Validates `input` against the fixed shape for `host`.
    ///
    /// Surrounding whitespace is ignored. The check is a pure function of
    /// `(input, host)`.
    ///
    /// # Errors
    ///
    /// Returns [`AcquisitionError::InvalidReference`] when the shape does not
    /// match, or when the trailing segment cannot name a local directory.
    pub fn parse(input: &str, host: &str) -> Result<Self, AcquisitionError> {
        let invalid = || AcquisitionError::InvalidReference { reference: input.to_string() };
        let trimmed = input.trim();

        let pattern = format!(r"^https://{}/([\w\-.]+)/([\w\-.]+)/?$", regex::escape(host));
        let re = Regex::new(&pattern).map_err(|_| invalid())?;
        let caps = re.captures(trimmed).ok_or_else(invalid)?;

        let owner = caps[1].to_string();
        let name = caps[2].to_string();
        let local = name.strip_suffix(".git").unwrap_or(&name);
        if local.is_empty() || local == "." || local == ".." || owner == "." || owner == ".." {
            return Err(invalid());
        }

        Ok(Self { url: trimmed.to_string(), host: host.to_string(), owner, name })
    }

    /// The reference as given (trimmed).
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The host the reference points at.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The owner path segment.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Root URL of the host, used for the reachability probe.
    #[must_use]
    pub fn host_root(&self) -> String {
        format!("https://{}", self.host)
    }

    /// Directory name for the working copy: the trailing segment without `.git`.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.name.strip_suffix(".git").unwrap_or(&self.name)
    }
}
