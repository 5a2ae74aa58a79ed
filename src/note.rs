// src/note.rs
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};

/// One journal entry extracted from an export document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub timestamp: NaiveDateTime,
    /// Markdown body, image embeds already appended
    pub content: String,
    /// Image references in the order they appear in the note
    pub image_references: Vec<String>,
    pub source: PathBuf,
}

impl Note {
    pub fn new(timestamp: NaiveDateTime, content: String, source: PathBuf) -> Self {
        Self {
            timestamp,
            content,
            image_references: Vec::new(),
            source,
        }
    }

    /// Calendar day the note belongs to
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}
