use super::{OutputSink, TrackCollection};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Writes the collection as a single JSON document
///
/// The file is only created when the collection is written, so a failed
/// run leaves no partial output behind.
pub struct JsonFileOutput {
    path: PathBuf,
}

impl JsonFileOutput {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl OutputSink for JsonFileOutput {
    fn write_tracks(&mut self, tracks: &TrackCollection) -> Result<()> {
        let contents = serde_json::to_vec(tracks).context("Failed to serialize tracks")?;

        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write output file {}", self.path.display()))?;

        tracing::debug!("Wrote {} tracks to {}", tracks.tracks.len(), self.path.display());
        Ok(())
    }

    fn destination(&self) -> &Path {
        &self.path
    }
}
