//! One pipeline run: acquire a reference, then classify the working copy.

use serde::Serialize;

use crate::acquire::{Acquirer, WorkingCopy};
use crate::classify::{Classifier, FileDetail, RepositoryIndex};
use crate::config::ScoutConfig;
use crate::context::ServiceContext;
use crate::error::PipelineError;

/// Where a run is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Nothing has happened yet.
    Uninitialized,
    /// The Acquirer is working.
    Acquiring,
    /// A working copy is ready.
    Acquired,
    /// Acquisition failed; the run is over.
    AcquisitionFailed,
    /// The Classifier is walking the copy.
    Classifying,
    /// A complete index was produced.
    Indexed,
    /// An index was produced from an incomplete walk.
    PartialIndex,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Uninitialized => "uninitialized",
            Self::Acquiring => "acquiring",
            Self::Acquired => "acquired",
            Self::AcquisitionFailed => "acquisition-failed",
            Self::Classifying => "classifying",
            Self::Indexed => "indexed",
            Self::PartialIndex => "partial-index",
        };
        f.write_str(label)
    }
}

/// Classifier output for a run.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// The repository index.
    pub index: RepositoryIndex,
    /// Detail reports for the ranked files.
    pub details: Vec<FileDetail>,
}

/// A single acquire-then-classify run. Runs are not reusable.
pub struct PipelineRun<'a> {
    ctx: &'a ServiceContext,
    config: &'a ScoutConfig,
    state: RunState,
    copy: Option<WorkingCopy>,
}

impl<'a> PipelineRun<'a> {
    /// Creates a run in [`RunState::Uninitialized`].
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, config: &'a ScoutConfig) -> Self {
        Self { ctx, config, state: RunState::Uninitialized, copy: None }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The acquired working copy, once there is one.
    #[must_use]
    pub fn working_copy(&self) -> Option<&WorkingCopy> {
        self.copy.as_ref()
    }

    /// Acquires `reference`. Allowed only once, from `Uninitialized`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidTransition`] when called in any other
    /// state, or the acquisition error that ended the run.
    pub fn acquire(&mut self, reference: &str) -> Result<&WorkingCopy, PipelineError> {
        self.expect_state("acquire", RunState::Uninitialized)?;
        self.state = RunState::Acquiring;

        let mut acquirer = Acquirer::new(self.ctx, &self.config.acquire, &self.config.workdir);
        match acquirer.acquire(reference) {
            Ok(copy) => {
                self.state = RunState::Acquired;
                Ok(self.copy.insert(copy))
            }
            Err(e) => {
                self.state = RunState::AcquisitionFailed;
                Err(e.into())
            }
        }
    }

    /// Classifies the acquired copy. Allowed only from `Acquired`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidTransition`] when no copy is ready.
    pub fn classify(&mut self) -> Result<Analysis, PipelineError> {
        self.expect_state("classify", RunState::Acquired)?;
        let Some(copy) = self.copy.as_ref() else {
            return Err(self.invalid("classify"));
        };
        self.state = RunState::Classifying;

        let mut classifier = Classifier::for_copy(copy, self.config.classify.clone());
        let index = classifier.classify();
        let details = classifier.detail_ranked(&index);
        self.state = if index.partial { RunState::PartialIndex } else { RunState::Indexed };
        Ok(Analysis { index, details })
    }

    fn expect_state(&self, operation: &'static str, expected: RunState) -> Result<(), PipelineError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(self.invalid(operation))
        }
    }

    fn invalid(&self, operation: &'static str) -> PipelineError {
        PipelineError::InvalidTransition { operation, state: self.state.to_string() }
    }
}

/// Runs a whole pipeline for `reference`.
///
/// # Errors
///
/// Returns the acquisition error if acquisition fails.
pub fn execute(
    ctx: &ServiceContext,
    config: &ScoutConfig,
    reference: &str,
) -> Result<(WorkingCopy, Analysis), PipelineError> {
    let mut run = PipelineRun::new(ctx, config);
    let copy = run.acquire(reference)?.clone();
    let analysis = run.classify()?;
    Ok((copy, analysis))
}
