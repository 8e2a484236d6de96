//! Fail-fast wrapper for callers that only proceed on a matching tree.

use camino::Utf8Path;
use dirmatch_domain::{ScanError, TreeView, match_directory};
use dirmatch_types::{DirectoryRequirement, DirectoryScanResult};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum LayoutError {
    /// The tree was scanned but does not match. `message` is the top-level aggregate message.
    #[error("Failed to match directory schema: {message}")]
    Mismatch {
        message: String,
        result: Box<DirectoryScanResult>,
    },

    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Matches `dir` and returns the result only when it succeeded.
pub fn ensure_layout(
    view: &dyn TreeView,
    requirement: &DirectoryRequirement,
    dir: &Utf8Path,
) -> Result<DirectoryScanResult, LayoutError> {
    let result = match_directory(view, requirement, dir)?;
    if result.success {
        info!(path = %dir, "layout matches");
        return Ok(result);
    }
    Err(LayoutError::Mismatch {
        message: result.message.clone(),
        result: Box::new(result),
    })
}
