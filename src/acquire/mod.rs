//! Acquirer: turns a repository reference into a local working copy.
//!
//! Each step is a hard gate: reference shape, host reachability, resource
//! existence, stale-copy cleanup, clone, post-conditions.

pub mod cleanup;
pub mod clone;
pub mod reference;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::AcquireConfig;
use crate::context::ServiceContext;
use crate::error::AcquisitionError;

pub use reference::RepoReference;

/// Lifecycle of a working copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionStatus {
    /// Nothing has been attempted yet.
    Unacquired,
    /// Probing, cleaning up, or cloning.
    Acquiring,
    /// Cloned and checked.
    Ready,
    /// Acquisition stopped with an error.
    Failed,
}

/// A local directory holding a cloned repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkingCopy {
    reference: String,
    root: PathBuf,
    status: AcquisitionStatus,
}

impl WorkingCopy {
    /// Wraps an existing local tree that was not cloned by this run.
    #[must_use]
    pub fn local(root: PathBuf) -> Self {
        let reference = root.display().to_string();
        Self { reference, root, status: AcquisitionStatus::Ready }
    }

    /// Source reference.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Root of the working copy on disk.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> AcquisitionStatus {
        self.status
    }

    /// Whether the root holds a `.git` directory.
    #[must_use]
    pub fn has_git_marker(&self) -> bool {
        self.root.join(".git").is_dir()
    }

    /// Deletes the working copy from disk.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if removal fails.
    pub fn remove(self) -> std::io::Result<()> {
        if self.root.exists() {
            std::fs::remove_dir_all(&self.root)?;
        }
        tracing::info!(path = %self.root.display(), "working copy removed");
        Ok(())
    }
}

/// Materializes working copies under a fixed base directory.
pub struct Acquirer<'a> {
    ctx: &'a ServiceContext,
    config: &'a AcquireConfig,
    workdir: PathBuf,
    status: AcquisitionStatus,
}

impl<'a> Acquirer<'a> {
    /// Creates an acquirer writing beneath `workdir`.
    ///
    /// A relative `workdir` is resolved against the current directory.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, config: &'a AcquireConfig, workdir: &Path) -> Self {
        Self {
            ctx,
            config,
            workdir: absolute(workdir),
            status: AcquisitionStatus::Unacquired,
        }
    }

    /// Base directory for working copies.
    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Status of the most recent acquisition.
    #[must_use]
    pub fn status(&self) -> AcquisitionStatus {
        self.status
    }

    /// Local path a reference would be cloned to.
    #[must_use]
    pub fn target_for(&self, reference: &RepoReference) -> PathBuf {
        self.workdir.join(reference.local_name())
    }

    /// Acquires `reference`.
    ///
    /// # Errors
    ///
    /// Returns the [`AcquisitionError`] of the first gate that fails. The
    /// target directory may be left on disk after a clone failure.
    pub fn acquire(&mut self, reference: &str) -> Result<WorkingCopy, AcquisitionError> {
        self.status = AcquisitionStatus::Acquiring;
        match self.acquire_inner(reference) {
            Ok(copy) => {
                self.status = AcquisitionStatus::Ready;
                Ok(copy)
            }
            Err(e) => {
                self.status = AcquisitionStatus::Failed;
                tracing::warn!("acquisition failed: {e}");
                Err(e)
            }
        }
    }

    fn acquire_inner(&self, input: &str) -> Result<WorkingCopy, AcquisitionError> {
        let reference = RepoReference::parse(input, &self.config.host)?;
        tracing::info!(
            reference = reference.url(),
            owner = reference.owner(),
            "acquiring repository"
        );
        self.ctx.note_reference(reference.url());

        self.probe_host(&reference)?;
        self.probe_resource(&reference)?;

        std::fs::create_dir_all(&self.workdir).map_err(|e| AcquisitionError::CleanupFailed {
            path: self.workdir.clone(),
            detail: e.to_string(),
        })?;
        let target = self.target_for(&reference);
        cleanup::clear_stale(self.ctx, self.config, &target)?;

        let attempt = clone::clone_with_retries(self.ctx, self.config, reference.url(), &target)?;
        check_post_conditions(&target)?;

        let copy = WorkingCopy {
            reference: reference.url().to_string(),
            root: target,
            status: AcquisitionStatus::Ready,
        };
        if !copy.has_git_marker() {
            tracing::warn!(path = %copy.root.display(), "working copy has no .git directory");
        }
        tracing::info!(path = %copy.root.display(), attempt, "repository ready");
        Ok(copy)
    }

    fn probe_host(&self, reference: &RepoReference) -> Result<(), AcquisitionError> {
        let root = reference.host_root();
        let unreachable = |detail: String| AcquisitionError::NetworkUnreachable {
            host: reference.host().to_string(),
            detail,
        };
        match self.ctx.http.get_status(&root, self.config.connectivity_timeout(), None) {
            Ok(200) => Ok(()),
            Ok(status) => Err(unreachable(format!("HTTP {status}"))),
            Err(e) => Err(unreachable(e.to_string())),
        }
    }

    /// Transport failures pass; only an HTTP answer can reject the resource.
    fn probe_resource(&self, reference: &RepoReference) -> Result<(), AcquisitionError> {
        let url = reference.url();
        let status = match self.ctx.http.get_status(
            url,
            self.config.probe_timeout(),
            Some(&self.config.user_agent),
        ) {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(reference = url, "resource probe failed, continuing: {e}");
                return Ok(());
            }
        };
        match status {
            200 => Ok(()),
            404 => Err(AcquisitionError::ResourceNotFound { reference: url.to_string() }),
            403 => Err(AcquisitionError::AccessDenied { reference: url.to_string() }),
            other => Err(AcquisitionError::ResourceProbeFailed {
                reference: url.to_string(),
                status: other,
            }),
        }
    }
}

fn check_post_conditions(target: &Path) -> Result<(), AcquisitionError> {
    let failed = |detail: &str| AcquisitionError::PostConditionFailed {
        path: target.to_path_buf(),
        detail: detail.to_string(),
    };
    if !target.exists() {
        return Err(failed("target does not exist"));
    }
    if !target.is_dir() {
        return Err(failed("target is not a directory"));
    }
    let mut entries = std::fs::read_dir(target).map_err(|e| failed(&e.to_string()))?;
    if entries.next().is_none() {
        return Err(failed("target is empty"));
    }
    Ok(())
}

/// Removes the whole working directory. Returns `false` if it did not exist.
///
/// # Errors
///
/// Returns the underlying I/O error if removal fails.
pub fn clean_workspace(workdir: &Path) -> std::io::Result<bool> {
    if !workdir.exists() {
        return Ok(false);
    }
    std::fs::remove_dir_all(workdir)?;
    tracing::info!(path = %workdir.display(), "working directory removed");
    Ok(true)
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
}
