mod locator;
pub mod types;

pub use locator::FrameLocator;
pub use types::{ProposalSet, VideoManifest};

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed document {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Load a video manifest (`{"video", "root_path", "frames": [{"frame", "path"}]}`)
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<VideoManifest, ManifestError> {
    load_document(path.as_ref())
}

/// Load a proposal set (`{"boxes": [{"frame", "bbox"}]}`)
pub fn load_proposals<P: AsRef<Path>>(path: P) -> Result<ProposalSet, ManifestError> {
    load_document(path.as_ref())
}

fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, ManifestError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
