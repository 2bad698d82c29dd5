mod json_file;

pub use json_file::JsonFileOutput;

use crate::session::Tracklet;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tracking result for one video, as persisted
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrackCollection {
    pub video: String,
    pub method: String,
    pub tracks: Vec<Tracklet>,
}

impl TrackCollection {
    pub fn assemble(video: &str, method: &str, tracks: Vec<Tracklet>) -> Self {
        Self {
            video: video.to_string(),
            method: method.to_string(),
            tracks,
        }
    }
}

/// Trait for result destinations
pub trait OutputSink {
    /// Write the complete collection in one go
    fn write_tracks(&mut self, tracks: &TrackCollection) -> Result<()>;

    /// Where results end up, for diagnostics
    fn destination(&self) -> &Path;
}
