//! Recoverable problems met during a conversion run.
//!
//! None of these stop a run. They are logged when they happen and kept in
//! the run statistics so the caller can show them afterwards.

use std::path::PathBuf;

use serde::Serialize;

/// A warning about a skipped image or document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A local image reference points at a file that does not exist.
    MissingImage { path: PathBuf },
    /// Copying an image into the asset directory failed.
    ImageCopyFailed { path: PathBuf, reason: String },
    /// A document could not be read or decoded.
    UnreadableDocument { path: PathBuf, reason: String },
    /// The first document has no note container at all.
    UnrecognizedExport { path: PathBuf },
}

/// Format a warning for display.
pub fn format_warning(warning: &Warning) -> String {
    match warning {
        Warning::MissingImage { path } => {
            format!("Warning: image not found '{}', kept original reference", path.display())
        }
        Warning::ImageCopyFailed { path, reason } => {
            format!(
                "Warning: failed to copy image '{}' ({}), kept original reference",
                path.display(),
                reason
            )
        }
        Warning::UnreadableDocument { path, reason } => {
            format!("Warning: skipped document '{}': {}", path.display(), reason)
        }
        Warning::UnrecognizedExport { path } => {
            format!(
                "Warning: '{}' has no note containers - this may not be a flomo export",
                path.display()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_missing_image() {
        let warning = Warning::MissingImage {
            path: PathBuf::from("/export/file/pic.png"),
        };
        let msg = format_warning(&warning);
        assert!(msg.contains("/export/file/pic.png"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_format_copy_failed() {
        let warning = Warning::ImageCopyFailed {
            path: PathBuf::from("a.png"),
            reason: "permission denied".to_string(),
        };
        let msg = format_warning(&warning);
        assert!(msg.contains("a.png"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn test_format_unreadable_document() {
        let warning = Warning::UnreadableDocument {
            path: PathBuf::from("broken.html"),
            reason: "stream did not contain valid UTF-8".to_string(),
        };
        let msg = format_warning(&warning);
        assert!(msg.contains("broken.html"));
        assert!(msg.contains("UTF-8"));
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let warning = Warning::UnrecognizedExport {
            path: PathBuf::from("index.html"),
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "unrecognized_export");
        assert_eq!(json["path"], "index.html");
    }
}
