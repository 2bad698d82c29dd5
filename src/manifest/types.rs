use crate::geometry::CornerBox;
use serde::{Deserialize, Serialize};

/// A video as a list of frame images under a common root directory
///
/// Frame ids need not be sorted or contiguous.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoManifest {
    #[serde(rename = "video")]
    pub id: String,
    pub root_path: String,
    pub frames: Vec<FrameEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameEntry {
    #[serde(rename = "frame")]
    pub frame_id: i64,
    #[serde(rename = "path")]
    pub relative_path: String,
}

/// Candidate boxes for one video, in document order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProposalSet {
    pub boxes: Vec<Proposal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    #[serde(rename = "frame")]
    pub frame_id: i64,
    #[serde(rename = "bbox")]
    pub corners: CornerBox,
}
