// src/convert/extract.rs
//! Note extraction from one export document

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ExportFormat;
use crate::error::{FlomoError, Result};
use crate::note::Note;
use crate::warnings::Warning;

use super::assets::{AssetRelocator, Relocation};
use super::html_md::to_markdown;
use super::ConversionStats;

/// Compiled selectors for an [`ExportFormat`].
#[derive(Debug)]
pub struct NoteExtractor {
    container: Selector,
    date: Selector,
    content: Selector,
    image: Selector,
    date_format: String,
}

/// Structural summary of one document, without touching any image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSurvey {
    pub path: PathBuf,
    pub note_containers: usize,
    pub dated_containers: usize,
}

/// Notes from one document plus what happened along the way
#[derive(Debug, Default)]
pub struct Extraction {
    pub notes: Vec<Note>,
    pub stats: ConversionStats,
}

impl NoteExtractor {
    pub fn new(format: &ExportFormat) -> Result<Self> {
        Ok(Self {
            container: compile(&format.note_container)?,
            date: compile(&format.date_element)?,
            content: compile(&format.content_element)?,
            image: compile("img")?,
            date_format: format.date_format.clone(),
        })
    }

    /// Extract every valid note in `document_path`.
    ///
    /// An unreadable document yields no notes and one warning. Containers
    /// without a parseable timestamp are dropped.
    pub fn extract(&self, document_path: &Path, relocator: &AssetRelocator) -> Extraction {
        info!("Parsing document: {}", document_path.display());
        let mut extraction = Extraction::default();

        let html = match fs::read_to_string(document_path) {
            Ok(html) => html,
            Err(e) => {
                debug!("Failed to read document '{}': {}", document_path.display(), e);
                extraction.stats.documents_failed += 1;
                extraction.stats.warnings.push(Warning::UnreadableDocument {
                    path: document_path.to_path_buf(),
                    reason: e.to_string(),
                });
                return extraction;
            }
        };
        extraction.stats.documents += 1;

        let document = Html::parse_document(&html);
        for container in document.select(&self.container) {
            let Some((stamp, timestamp)) = self.timestamp(container) else {
                debug!("Skipping note container without a valid timestamp");
                extraction.stats.containers_skipped += 1;
                continue;
            };

            let note = self.build_note(
                container,
                &stamp,
                timestamp,
                document_path,
                relocator,
                &mut extraction.stats,
            );
            if note.content.is_empty() {
                debug!(stamp = %stamp, "Skipping empty note");
                extraction.stats.containers_skipped += 1;
                continue;
            }
            extraction.notes.push(note);
        }

        extraction.stats.notes = extraction.notes.len();
        info!("Extracted {} notes", extraction.notes.len());
        extraction
    }

    /// Count note containers and dated containers in a document.
    pub fn survey(&self, document_path: &Path) -> Result<DocumentSurvey> {
        let html = fs::read_to_string(document_path)?;
        let document = Html::parse_document(&html);

        let mut survey = DocumentSurvey {
            path: document_path.to_path_buf(),
            note_containers: 0,
            dated_containers: 0,
        };
        for container in document.select(&self.container) {
            survey.note_containers += 1;
            if self.timestamp(container).is_some() {
                survey.dated_containers += 1;
            }
        }
        Ok(survey)
    }

    /// Raw trimmed date text and its parsed value
    fn timestamp(&self, container: ElementRef<'_>) -> Option<(String, NaiveDateTime)> {
        let element = container.select(&self.date).next()?;
        let stamp = element.text().collect::<String>().trim().to_string();
        let parsed = NaiveDateTime::parse_from_str(&stamp, &self.date_format).ok()?;
        Some((stamp, parsed))
    }

    fn build_note(
        &self,
        container: ElementRef<'_>,
        stamp: &str,
        timestamp: NaiveDateTime,
        document_path: &Path,
        relocator: &AssetRelocator,
        stats: &mut ConversionStats,
    ) -> Note {
        // Relocate first so every embed below sees its final reference.
        let mut rewritten: HashMap<String, String> = HashMap::new();
        let mut embeds = Vec::new();
        for image in container.select(&self.image) {
            let Some(src) = image.value().attr("src").filter(|s| !s.trim().is_empty()) else {
                continue;
            };
            let alt = image.value().attr("alt").unwrap_or("");

            if !rewritten.contains_key(src) {
                let outcome = relocator.relocate(src, stamp, document_path);
                match &outcome {
                    Relocation::Relocated { .. } => stats.images_relocated += 1,
                    Relocation::Remote => stats.images_remote += 1,
                    Relocation::Missing { .. } | Relocation::Failed { .. } => {
                        stats.images_skipped += 1
                    }
                }
                stats.warnings.extend(outcome.warning());
                let reference = outcome.new_reference().unwrap_or(src).to_string();
                rewritten.insert(src.to_string(), reference);
            }
            embeds.push((alt.to_string(), rewritten[src].clone()));
        }

        let mut content = container
            .select(&self.content)
            .next()
            .map(to_markdown)
            .unwrap_or_default();

        let mut note = Note::new(timestamp, String::new(), document_path.to_path_buf());
        for (alt, reference) in embeds {
            content.push_str(&format!("\n\n![{}]({})", alt, reference));
            note.image_references.push(reference);
        }
        note.content = content.trim().to_string();
        note
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| FlomoError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}
