use super::types::VideoManifest;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Resolves frame ids of one video to image paths
///
/// The lookup table is built once; when a frame id occurs more than once in
/// the manifest the first entry wins.
pub struct FrameLocator {
    paths: HashMap<i64, PathBuf>,
}

impl FrameLocator {
    pub fn new(manifest: &VideoManifest) -> Self {
        let root = Path::new(&manifest.root_path);
        let mut paths = HashMap::with_capacity(manifest.frames.len());

        for entry in &manifest.frames {
            paths
                .entry(entry.frame_id)
                .or_insert_with(|| root.join(&entry.relative_path));
        }

        Self { paths }
    }

    /// Image path for `frame_id`, or `None` if the video has no such frame
    #[inline]
    pub fn resolve(&self, frame_id: i64) -> Option<&Path> {
        self.paths.get(&frame_id).map(PathBuf::as_path)
    }

    pub fn frame_count(&self) -> usize {
        self.paths.len()
    }
}
