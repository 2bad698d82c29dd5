use crate::geometry::CornerBox;
use serde::{Deserialize, Serialize};

/// Tracked box for one frame of a session
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FrameRecord {
    #[serde(rename = "frame")]
    pub frame_id: i64,
    /// Offset of this frame from the start of its session
    pub anchor: u32,
    /// Always 1.0, the tracker reports no confidence
    #[serde(rename = "scores")]
    pub score: f32,
    pub bbox: CornerBox,
}

/// Records of one session in frame order
pub type Tracklet = Vec<FrameRecord>;
