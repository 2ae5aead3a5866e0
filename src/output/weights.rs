// Weight file: the word -> score JSON object a word cloud renderer consumes.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::words::frequency::FrequencyScores;

/// Serialize scores as a pretty JSON object, highest score first.
pub fn to_json(scores: &FrequencyScores) -> Result<String> {
    serde_json::to_string_pretty(scores).context("Failed to serialize word weights")
}

/// Write the weight file to `path`. The parent directory must already exist.
pub fn write_weights(scores: &FrequencyScores, path: &Path) -> Result<()> {
    let json = to_json(scores)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), words = scores.len(), "Wrote word weights");
    Ok(())
}
