use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlomoError {
    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("No .html or .htm files found in {}", .0.display())]
    NoDocuments(PathBuf),

    #[error("No valid notes found in the export")]
    NoNotes,

    #[error("Output directory {} is not empty. Use --force to overwrite it.", .0.display())]
    OutputNotEmpty(PathBuf),

    #[error("Output directory {} contains the source export {}", output.display(), source_dir.display())]
    OutputContainsSource { output: PathBuf, source_dir: PathBuf },

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, FlomoError>;
