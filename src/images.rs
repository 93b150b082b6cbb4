//! Image discovery and payload encoding
//!
//! Generated sequences land on disk under a handful of directory and filename
//! conventions depending on which pipeline produced them, so lookup probes an
//! ordered list of candidates and takes the first hit.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Error type for image payload encoding.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Failed to read image {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Resolves the on-disk image for a (sequence index, step) pair.
pub struct ImageLocator {
    root: PathBuf,
}

impl ImageLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve zero or one path for the given index and step.
    ///
    /// Directory candidates are probed in order (`index_0001`, `index_1`,
    /// `1`, then the root itself), then filename candidates inside the first
    /// existing directory. Returns `None` when nothing matches.
    pub fn locate(&self, index: &str, step: u32) -> Option<PathBuf> {
        let padded = pad_index(index);

        let dir_candidates = [
            self.root.join(format!("index_{padded}")),
            self.root.join(format!("index_{index}")),
            self.root.join(index),
            self.root.clone(),
        ];

        let target_dir = dir_candidates.iter().find(|d| d.exists())?;

        let file_candidates = [
            format!("index_{padded}_step_{step}.png"),
            format!("index_{index}_step_{step}.png"),
            format!("{index}_step_{step}.png"),
            format!("step_{step}.png"),
            format!("{step}.png"),
        ];

        file_candidates
            .iter()
            .map(|name| target_dir.join(name))
            .find(|p| p.exists())
    }

    /// Resolve paths for the given steps; missing steps are absent from the
    /// returned pairs, with a warning per miss.
    pub fn locate_all(&self, index: &str, steps: &[u32]) -> Vec<(u32, PathBuf)> {
        let mut found = Vec::with_capacity(steps.len());
        for &step in steps {
            match self.locate(index, step) {
                Some(path) => found.push((step, path)),
                None => tracing::warn!(
                    "Missing image for index {} step {} under {}",
                    index,
                    step,
                    self.root.display()
                ),
            }
        }
        found
    }
}

/// Zero-pad numeric-looking indices to four characters.
fn pad_index(index: &str) -> String {
    format!("{index:0>4}")
}

/// Read an image file and base64-encode its bytes for embedding in a request.
pub fn encode_image(path: &Path) -> Result<String, ImageError> {
    let bytes = std::fs::read(path).map_err(|source| ImageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(STANDARD.encode(bytes))
}
