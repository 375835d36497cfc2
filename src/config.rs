//! Layered configuration: defaults, then an optional YAML file, then CLI flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::classify::content::TextEncoding;
use crate::error::ConfigError;

/// Config file looked up in the current directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "reposcout.yaml";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    /// Base directory holding one subdirectory per acquired repository.
    pub workdir: PathBuf,
    /// Acquirer settings.
    pub acquire: AcquireConfig,
    /// Classifier settings.
    pub classify: ClassifyConfig,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            workdir: PathBuf::from("workdir"),
            acquire: AcquireConfig::default(),
            classify: ClassifyConfig::default(),
        }
    }
}

/// Network probe, cleanup, and clone settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquireConfig {
    /// Host every reference must point at.
    pub host: String,
    /// Timeout for the host reachability probe.
    pub connectivity_timeout_secs: u64,
    /// Timeout for the resource existence probe.
    pub probe_timeout_secs: u64,
    /// `User-Agent` header sent with the resource probe.
    pub user_agent: String,
    /// Attempts at removing a stale working copy before renaming it aside.
    pub cleanup_attempts: u32,
    /// Pause between removal attempts.
    pub cleanup_backoff_secs: u64,
    /// Clone attempts (each widening the depth strategy).
    pub clone_attempts: u32,
    /// Linear backoff step; attempt `n` (1-based) waits `n * step`.
    pub clone_backoff_step_secs: u64,
    /// Per-attempt clone timeout.
    pub clone_timeout_secs: u64,
    /// Pause after clearing a target git reported as non-empty.
    pub not_empty_settle_secs: u64,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            host: "github.com".to_string(),
            connectivity_timeout_secs: 10,
            probe_timeout_secs: 15,
            user_agent: "Mozilla/5.0 (compatible; reposcout/0.1)".to_string(),
            cleanup_attempts: 3,
            cleanup_backoff_secs: 1,
            clone_attempts: 3,
            clone_backoff_step_secs: 3,
            clone_timeout_secs: 300,
            not_empty_settle_secs: 2,
        }
    }
}

impl AcquireConfig {
    /// Connectivity probe timeout as a [`Duration`].
    #[must_use]
    pub fn connectivity_timeout(&self) -> Duration {
        Duration::from_secs(self.connectivity_timeout_secs)
    }

    /// Resource probe timeout as a [`Duration`].
    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Per-attempt clone timeout as a [`Duration`].
    #[must_use]
    pub fn clone_timeout(&self) -> Duration {
        Duration::from_secs(self.clone_timeout_secs)
    }
}

/// Walk limits, read ceilings, and output bounds for the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Directories visited before the walk stops and the index is marked partial.
    pub max_dirs: usize,
    /// Largest file whose content is read for a detail report.
    pub content_ceiling_bytes: u64,
    /// Largest file scanned for line and declaration counts.
    pub structural_ceiling_bytes: u64,
    /// Size of the ranked candidate list.
    pub top_n: usize,
    /// Entries admitted to the file-detail cache.
    pub cache_capacity: usize,
    /// Maximum characters of content included in a detail excerpt.
    pub excerpt_chars: usize,
    /// Leading characters inspected for NUL when sniffing binaries.
    pub binary_sniff_chars: usize,
    /// Children inspected by a shallow directory listing.
    pub directory_scan_limit: usize,
    /// Decoders tried in order.
    pub encodings: Vec<TextEncoding>,
    /// Directory names never descended into (hidden directories are always pruned).
    pub excluded_dirs: Vec<String>,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            max_dirs: 2000,
            content_ceiling_bytes: 300 * 1024,
            structural_ceiling_bytes: 500 * 1024,
            top_n: 15,
            cache_capacity: 30,
            excerpt_chars: 4000,
            binary_sniff_chars: 1000,
            directory_scan_limit: 150,
            encodings: vec![
                TextEncoding::Utf8,
                TextEncoding::Latin1,
                TextEncoding::Cp1252,
                TextEncoding::Ascii,
            ],
            excluded_dirs: ["node_modules", "__pycache__", "target", "build", "dist", "vendor"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl ScoutConfig {
    /// Reads a YAML config file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        serde_yaml::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Resolves the effective config: an explicit path must exist; otherwise
    /// [`DEFAULT_CONFIG_FILE`] is used when present, else defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
