//! `reposcout run` command.

use crate::config::ScoutConfig;
use crate::context::ServiceContext;
use crate::error::PipelineError;
use crate::pipeline;

/// Execute the `run` command: acquire `reference`, classify it, print reports.
/// With `discard`, the working copy is deleted afterwards.
///
/// # Errors
///
/// Returns the pipeline error message, with retry guidance for acquisition
/// failures, or the error that stopped the copy from being deleted.
pub fn run(
    ctx: &ServiceContext,
    config: &ScoutConfig,
    reference: &str,
    json: bool,
    discard: bool,
) -> Result<(), String> {
    let (copy, analysis) = pipeline::execute(ctx, config, reference).map_err(|e| match e {
        PipelineError::Acquisition(inner) => format!("{inner}\nhint: {}", inner.hint()),
        other => other.to_string(),
    })?;
    tracing::info!(path = %copy.root().display(), "analysis complete");
    super::classify::print_analysis(&analysis, json)?;
    if discard {
        let root = copy.root().to_path_buf();
        copy.remove().map_err(|e| format!("failed to remove {}: {e}", root.display()))?;
    }
    Ok(())
}
