//! In-memory stand-ins for the frame and tracker seams

use crate::frames::FrameSource;
use crate::geometry::Region;
use crate::manifest::types::{FrameEntry, VideoManifest};
use crate::tracking::Tracker;
use anyhow::{anyhow, bail, Result};
use image::RgbImage;
use std::ops::RangeInclusive;
use std::path::Path;

pub fn manifest(frame_ids: RangeInclusive<i64>) -> VideoManifest {
    VideoManifest {
        id: "test_video".to_string(),
        root_path: "/frames".to_string(),
        frames: frame_ids
            .map(|frame_id| FrameEntry {
                frame_id,
                relative_path: format!("{:06}.jpg", frame_id),
            })
            .collect(),
    }
}

/// Serves blank frames; frame ids listed in `broken` fail to decode
#[derive(Default)]
pub struct FakeFrames {
    pub broken: Vec<i64>,
    pub loaded: usize,
}

impl FrameSource for FakeFrames {
    fn load_frame(&mut self, path: &Path) -> Result<RgbImage> {
        if self
            .broken
            .iter()
            .any(|id| path.ends_with(format!("{:06}.jpg", id)))
        {
            return Err(anyhow!("corrupt image {}", path.display()));
        }

        self.loaded += 1;
        Ok(RgbImage::new(4, 4))
    }
}

/// Moves the region `step` pixels right per update (one by default)
pub struct FakeTracker {
    pub inits: usize,
    pub updates: usize,
    pub seeds: Vec<Region>,
    fail_updates: bool,
    step: f32,
    current: Option<Region>,
}

impl Default for FakeTracker {
    fn default() -> Self {
        Self {
            inits: 0,
            updates: 0,
            seeds: Vec::new(),
            fail_updates: false,
            step: 1.0,
            current: None,
        }
    }
}

impl FakeTracker {
    /// Tracker whose every update fails
    pub fn failing() -> Self {
        Self {
            fail_updates: true,
            ..Self::default()
        }
    }

    /// Tracker moving by a fractional `step` per update
    pub fn drifting(step: f32) -> Self {
        Self {
            step,
            ..Self::default()
        }
    }
}

impl Tracker for FakeTracker {
    fn init(&mut self, seed: Region, _frame: &RgbImage) -> Result<()> {
        self.inits += 1;
        self.seeds.push(seed);
        self.current = Some(seed);
        Ok(())
    }

    fn update(&mut self, _frame: &RgbImage) -> Result<Region> {
        if self.fail_updates {
            bail!("tracker lost");
        }

        let Some(region) = self.current.as_mut() else {
            bail!("update before init");
        };

        self.updates += 1;
        region.x += self.step;
        Ok(*region)
    }

    fn method(&self) -> &str {
        "FAKE"
    }
}
