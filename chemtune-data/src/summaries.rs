use std::fs::File;
use std::path::Path;

use chemtune_core::{CoreError, Result, RunSummary};

/// Fixed file name inside the tuner-provided output directory.
pub const SUMMARY_FILE: &str = "summary.json";

pub fn save_summary(outdir: &Path, summary: &RunSummary) -> Result<()> {
    std::fs::create_dir_all(outdir)?;
    let path = outdir.join(SUMMARY_FILE);
    let file = File::create(&path)?;
    serde_json::to_writer_pretty(file, summary)
        .map_err(|e| CoreError::Persistence(format!("{}: {}", path.display(), e)))?;
    tracing::debug!(path = %path.display(), "persisted run summary");
    Ok(())
}

pub fn load_summary(outdir: &Path) -> Result<RunSummary> {
    let path = outdir.join(SUMMARY_FILE);
    let file = File::open(&path)?;
    serde_json::from_reader(file)
        .map_err(|e| CoreError::Persistence(format!("{}: {}", path.display(), e)))
}
