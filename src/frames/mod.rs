mod image_file;

pub use image_file::ImageFileSource;

use anyhow::Result;
use image::RgbImage;
use std::path::Path;

/// Trait for frame image sources
pub trait FrameSource {
    /// Decode the frame stored at `path`
    fn load_frame(&mut self, path: &Path) -> Result<RgbImage>;
}
