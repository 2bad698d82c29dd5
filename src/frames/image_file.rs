use super::FrameSource;
use anyhow::{Context, Result};
use image::RgbImage;
use std::path::Path;

/// Reads frames from image files on disk, in whatever format the `image` crate recognizes
#[derive(Debug, Default)]
pub struct ImageFileSource {
    decoded: u64,
}

impl ImageFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames decoded so far
    pub fn decoded(&self) -> u64 {
        self.decoded
    }
}

impl FrameSource for ImageFileSource {
    fn load_frame(&mut self, path: &Path) -> Result<RgbImage> {
        let _span = tracing::debug_span!("decode_frame").entered();

        let frame = image::open(path)
            .with_context(|| format!("Failed to decode frame {}", path.display()))?
            .to_rgb8();

        self.decoded += 1;
        Ok(frame)
    }
}
