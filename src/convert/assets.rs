// src/convert/assets.rs
//! Copy local images into the flat asset directory under unique names

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::warnings::Warning;

use super::utils::sanitize_timestamp;

/// What happened to one image reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relocation {
    /// Remote or inline reference, left as is
    Remote,
    /// Copied into the asset directory
    Relocated { reference: String },
    /// Resolved path does not exist
    Missing { source: PathBuf },
    /// Copy failed
    Failed { source: PathBuf, reason: String },
}

impl Relocation {
    /// The rewritten reference, if the image was relocated
    pub fn new_reference(&self) -> Option<&str> {
        match self {
            Relocation::Relocated { reference } => Some(reference),
            _ => None,
        }
    }

    /// Warning to record for a skipped local image
    pub fn warning(&self) -> Option<Warning> {
        match self {
            Relocation::Missing { source } => Some(Warning::MissingImage {
                path: source.clone(),
            }),
            Relocation::Failed { source, reason } => Some(Warning::ImageCopyFailed {
                path: source.clone(),
                reason: reason.clone(),
            }),
            _ => None,
        }
    }
}

/// Copies images referenced by notes into `asset_dir`.
///
/// Names are `{sanitized timestamp}_{original file name}`. An existing file
/// with the same name is overwritten (last writer wins).
#[derive(Debug, Clone)]
pub struct AssetRelocator {
    asset_dir: PathBuf,
    subdir_name: String,
}

impl AssetRelocator {
    pub fn new(asset_dir: impl Into<PathBuf>, subdir_name: impl Into<String>) -> Self {
        Self {
            asset_dir: asset_dir.into(),
            subdir_name: subdir_name.into(),
        }
    }

    /// Relocate one `src` value found in `document_path`.
    ///
    /// Relative references resolve against the document's directory, never
    /// against the working directory.
    pub fn relocate(&self, reference: &str, note_stamp: &str, document_path: &Path) -> Relocation {
        if is_remote(reference) {
            debug!(reference, "Leaving remote image reference untouched");
            return Relocation::Remote;
        }

        let source = resolve_reference(reference, document_path);
        if !source.exists() {
            debug!("Image file not found '{}', skipping", source.display());
            return Relocation::Missing { source };
        }

        let original_name = match source.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => {
                return Relocation::Failed {
                    source,
                    reason: "reference has no file name".to_string(),
                }
            }
        };
        let new_name = asset_filename(note_stamp, &original_name);
        let destination = self.asset_dir.join(&new_name);

        if let Err(e) = fs::copy(&source, &destination) {
            debug!("Failed to copy image '{}': {}", source.display(), e);
            return Relocation::Failed {
                source,
                reason: e.to_string(),
            };
        }
        preserve_mtime(&source, &destination);

        info!("Image relocated: {} -> {}", original_name, new_name);
        Relocation::Relocated {
            reference: format!("{}/{}", self.subdir_name, new_name),
        }
    }
}

/// References that need no relocation
pub fn is_remote(reference: &str) -> bool {
    let lower = reference.trim_start().to_ascii_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("data:")
        || lower.starts_with("//")
}

/// Destination file name for an image attached to a note
pub fn asset_filename(note_stamp: &str, original_name: &str) -> String {
    format!("{}_{}", sanitize_timestamp(note_stamp), original_name)
}

fn resolve_reference(reference: &str, document_path: &Path) -> PathBuf {
    let reference = Path::new(reference);
    if reference.is_absolute() {
        return reference.to_path_buf();
    }
    let base = document_path.parent().unwrap_or_else(|| Path::new("."));
    base.join(reference)
}

// fs::copy keeps permissions but not timestamps
fn preserve_mtime(source: &Path, destination: &Path) {
    let modified = match fs::metadata(source).and_then(|m| m.modified()) {
        Ok(modified) => modified,
        Err(_) => return,
    };
    let result = fs::OpenOptions::new()
        .write(true)
        .open(destination)
        .and_then(|file| file.set_modified(modified));
    if let Err(e) = result {
        debug!("Could not preserve mtime on '{}': {}", destination.display(), e);
    }
}
