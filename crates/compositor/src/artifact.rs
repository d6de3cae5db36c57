//! Ephemeral image artifacts.
//!
//! Every render pass writes its PNGs into a shared artifact root under names
//! carrying a per-pass nonce, so concurrent passes never collide. Each file
//! is owned by an [`ImageArtifact`] handle that deletes it when released or
//! dropped.

use overlay_common::{OverlayError, OverlayResult};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Directory that receives the artifacts of every pass.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store under the system temp directory.
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir().join("raster-overlay-artifacts"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start a pass, creating the root directory if needed.
    pub fn begin_pass(&self) -> OverlayResult<ArtifactPass> {
        fs::create_dir_all(&self.root).map_err(|e| {
            OverlayError::processing(format!(
                "cannot create artifact directory {}: {}",
                self.root.display(),
                e
            ))
        })?;

        Ok(ArtifactPass {
            root: self.root.clone(),
            nonce: Uuid::new_v4(),
            written: 0,
        })
    }
}

/// Artifact namespace of a single render pass.
#[derive(Debug)]
pub struct ArtifactPass {
    root: PathBuf,
    nonce: Uuid,
    written: usize,
}

impl ArtifactPass {
    /// Unique id of this pass.
    pub fn id(&self) -> Uuid {
        self.nonce
    }

    /// Number of artifacts created so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Whether `path` is a file name this pass could have produced.
    pub fn owns(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.contains(&self.nonce.to_string()))
            .unwrap_or(false)
    }

    /// Write `bytes` as a new PNG artifact named after `label`.
    ///
    /// The file is created exclusively; a partially written file is removed
    /// before the error is returned.
    pub fn write_png(&mut self, label: &str, bytes: &[u8]) -> OverlayResult<ImageArtifact> {
        let name = format!("{}-{}-{}.png", slug(label), self.nonce, self.written);
        let path = self.root.join(name);

        let result = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .and_then(|mut file| file.write_all(bytes).and_then(|_| file.sync_all()));

        if let Err(e) = result {
            if e.kind() != ErrorKind::AlreadyExists {
                let _ = fs::remove_file(&path);
            }
            return Err(OverlayError::processing(format!(
                "failed to write artifact {}: {}",
                path.display(),
                e
            )));
        }

        self.written += 1;
        debug!(path = %path.display(), bytes = bytes.len(), "Wrote artifact");
        Ok(ImageArtifact {
            path,
            released: false,
        })
    }
}

/// Owned handle to one artifact file.
#[derive(Debug)]
pub struct ImageArtifact {
    path: PathBuf,
    released: bool,
}

impl ImageArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the encoded image back.
    pub fn read(&self) -> OverlayResult<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }

    /// Delete the file now. A file that is already gone counts as released.
    pub fn release(mut self) -> OverlayResult<()> {
        self.released = true;
        remove_artifact(&self.path)
    }
}

impl Drop for ImageArtifact {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = remove_artifact(&self.path) {
            warn!(path = %self.path.display(), error = %e, "Failed to remove artifact");
        }
    }
}

fn remove_artifact(path: &Path) -> OverlayResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(OverlayError::processing(format!(
            "failed to remove artifact {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Lowercase file-name-safe form of a label.
fn slug(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_matches('-');
    if trimmed.is_empty() {
        "layer".to_string()
    } else {
        trimmed.to_string()
    }
}
