use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FlomoError, Result};

/// Structural markers of a flomo HTML export.
///
/// This is the one place that changes if flomo changes its export layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportFormat {
    /// Selector for one note block
    pub note_container: String,
    /// Selector for the timestamp element inside a note
    pub date_element: String,
    /// Selector for the rich content element inside a note
    pub content_element: String,
    /// chrono format string the timestamp text must match exactly
    pub date_format: String,
}

impl Default for ExportFormat {
    fn default() -> Self {
        Self {
            note_container: "div.memo".to_string(),
            date_element: "div.time".to_string(),
            content_element: "div.content".to_string(),
            date_format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }
}

/// Fixed names inside a conversion output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputLayout {
    pub markdown_filename: String,
    pub image_subdir: String,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self {
            markdown_filename: "flomo-output.md".to_string(),
            image_subdir: "flomo-images".to_string(),
        }
    }
}

/// Everything a conversion run can be configured with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub format: ExportFormat,
    pub layout: OutputLayout,
    /// Clear a non-empty output directory instead of refusing to run.
    pub overwrite: bool,
}

impl ConvertConfig {
    /// Load a config from a YAML file. Missing keys keep their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            FlomoError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject layouts that would escape the output directory.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("markdown_filename", &self.layout.markdown_filename),
            ("image_subdir", &self.layout.image_subdir),
        ] {
            if value.is_empty() || value.contains('/') || value.contains('\\') || value == ".." {
                return Err(FlomoError::Config(format!(
                    "layout.{} must be a plain file name, got '{}'",
                    field, value
                )));
            }
        }
        if self.format.date_format.is_empty() {
            return Err(FlomoError::Config("format.date_format is empty".to_string()));
        }
        Ok(())
    }
}
