// src/convert/mod.rs
//! Conversion pipeline
//!
//! Turns a directory of flomo HTML export documents into one Markdown file
//! plus a flat directory of relocated images:
//!
//! ```text
//! <output_dir>/
//!   flomo-output.md
//!   flomo-images/            (removed when no image was relocated)
//!     2024-01-01_09-00-00_pic.png
//! ```

pub mod aggregate;
pub mod assets;
pub mod extract;
pub mod html_md;
pub mod render;
pub mod utils;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ConvertConfig;
use crate::error::{FlomoError, Result};
use crate::warnings::Warning;

pub use self::aggregate::{aggregate, DocumentCollection};
pub use self::assets::{AssetRelocator, Relocation};
pub use self::extract::{DocumentSurvey, Extraction, NoteExtractor};
pub use self::render::{render, render_markdown};

/// Counters and warnings collected during a run
#[derive(Debug, Default, Clone, Serialize)]
pub struct ConversionStats {
    pub documents: usize,
    pub documents_failed: usize,
    pub notes: usize,
    pub containers_skipped: usize,
    pub images_relocated: usize,
    pub images_remote: usize,
    pub images_skipped: usize,
    pub warnings: Vec<Warning>,
}

impl ConversionStats {
    /// Fold another document's counters into this one
    pub fn merge(&mut self, other: ConversionStats) {
        self.documents += other.documents;
        self.documents_failed += other.documents_failed;
        self.notes += other.notes;
        self.containers_skipped += other.containers_skipped;
        self.images_relocated += other.images_relocated;
        self.images_remote += other.images_remote;
        self.images_skipped += other.images_skipped;
        self.warnings.extend(other.warnings);
    }
}

/// A successful conversion
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    pub output_dir: PathBuf,
    pub markdown_path: PathBuf,
    /// `None` when no image was relocated and the directory was removed
    pub image_dir: Option<PathBuf>,
    pub stats: ConversionStats,
}

/// Structural survey of an export directory
#[derive(Debug, Clone, Serialize)]
pub struct ExportSurvey {
    pub source_dir: PathBuf,
    pub documents: Vec<DocumentSurvey>,
    pub warnings: Vec<Warning>,
}

impl ExportSurvey {
    pub fn note_containers(&self) -> usize {
        self.documents.iter().map(|d| d.note_containers).sum()
    }

    pub fn dated_containers(&self) -> usize {
        self.documents.iter().map(|d| d.dated_containers).sum()
    }
}

/// Convert the export in `source_dir`.
///
/// This will:
/// 1. Discover `.html`/`.htm` documents directly inside `source_dir`
/// 2. Prepare `output_dir` (a fresh temp dir when `None`) and its image dir
/// 3. Extract, aggregate and render every note
/// 4. Drop the image dir if nothing was relocated into it
///
/// On failure after step 2 the partial output is removed again.
pub fn convert(
    source_dir: &Path,
    output_dir: Option<&Path>,
    config: &ConvertConfig,
) -> Result<Conversion> {
    info!("Converting flomo export in {}", source_dir.display());
    config.validate()?;

    if !source_dir.is_dir() {
        return Err(FlomoError::SourceNotFound(source_dir.to_path_buf()));
    }

    let extractor = NoteExtractor::new(&config.format)?;
    let documents = utils::discover_documents(source_dir)?;
    if documents.is_empty() {
        return Err(FlomoError::NoDocuments(source_dir.to_path_buf()));
    }

    let mut early_warnings = Vec::new();
    if let Some(warning) = sanity_check(&extractor, &documents[0]) {
        early_warnings.push(warning);
    }

    let output_dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::temp_dir().join(format!("flomo_convert_{}", Uuid::new_v4().simple())),
    };
    let created = prepare_output_dir(&output_dir, source_dir, config.overwrite)?;
    let image_dir = output_dir.join(&config.layout.image_subdir);
    let markdown_path = output_dir.join(&config.layout.markdown_filename);

    let result = run(&documents, &extractor, &image_dir, &markdown_path, config);
    let mut stats = match result {
        Ok(stats) => stats,
        Err(e) => {
            cleanup(&output_dir, &image_dir, &markdown_path, created);
            return Err(e);
        }
    };

    let mut warnings = early_warnings;
    warnings.append(&mut stats.warnings);
    stats.warnings = warnings;

    let image_dir = if utils::is_empty_dir(&image_dir)? {
        if image_dir.exists() {
            fs::remove_dir(&image_dir)?;
        }
        None
    } else {
        Some(image_dir)
    };

    info!(
        "Converted {} notes from {} documents into {}",
        stats.notes,
        stats.documents,
        output_dir.display()
    );

    Ok(Conversion {
        output_dir,
        markdown_path,
        image_dir,
        stats,
    })
}

/// Survey `source_dir` without writing anything.
pub fn inspect(source_dir: &Path, config: &ConvertConfig) -> Result<ExportSurvey> {
    if !source_dir.is_dir() {
        return Err(FlomoError::SourceNotFound(source_dir.to_path_buf()));
    }

    let extractor = NoteExtractor::new(&config.format)?;
    let documents = utils::discover_documents(source_dir)?;
    if documents.is_empty() {
        return Err(FlomoError::NoDocuments(source_dir.to_path_buf()));
    }

    let mut survey = ExportSurvey {
        source_dir: source_dir.to_path_buf(),
        documents: Vec::new(),
        warnings: Vec::new(),
    };
    for document in &documents {
        match extractor.survey(document) {
            Ok(doc) => survey.documents.push(doc),
            Err(e) => survey.warnings.push(Warning::UnreadableDocument {
                path: document.clone(),
                reason: e.to_string(),
            }),
        }
    }

    Ok(survey)
}

fn run(
    documents: &[PathBuf],
    extractor: &NoteExtractor,
    image_dir: &Path,
    markdown_path: &Path,
    config: &ConvertConfig,
) -> Result<ConversionStats> {
    fs::create_dir_all(image_dir)?;
    let relocator = AssetRelocator::new(image_dir, config.layout.image_subdir.clone());

    let (mut collection, stats) = aggregate(documents, extractor, &relocator);
    if collection.is_empty() {
        warn!("No valid notes extracted");
        return Err(FlomoError::NoNotes);
    }

    render(&mut collection, markdown_path)?;
    Ok(stats)
}

/// Best-effort check that the first document looks like a flomo export
fn sanity_check(extractor: &NoteExtractor, document: &Path) -> Option<Warning> {
    match extractor.survey(document) {
        Ok(survey) if survey.note_containers == 0 => {
            debug!(
                "'{}' has no note containers, this may not be a flomo export",
                document.display()
            );
            Some(Warning::UnrecognizedExport {
                path: document.to_path_buf(),
            })
        }
        Ok(_) => None,
        Err(e) => {
            warn!("Could not check export structure of '{}': {}", document.display(), e);
            None
        }
    }
}

/// Create `output_dir`, returning whether this run created it.
///
/// An existing `output_dir` that is, or contains, `source_dir` is refused so
/// clearing it can never touch the export being converted.
fn prepare_output_dir(output_dir: &Path, source_dir: &Path, overwrite: bool) -> Result<bool> {
    if !output_dir.exists() {
        fs::create_dir_all(output_dir)?;
        return Ok(true);
    }
    let canonical_output = output_dir.canonicalize()?;
    let canonical_source = source_dir.canonicalize()?;
    if canonical_source.starts_with(&canonical_output) {
        return Err(FlomoError::OutputContainsSource {
            output: output_dir.to_path_buf(),
            source_dir: source_dir.to_path_buf(),
        });
    }
    if !utils::is_empty_dir(output_dir)? {
        if !overwrite {
            return Err(FlomoError::OutputNotEmpty(output_dir.to_path_buf()));
        }
        info!("Clearing existing output in {}", output_dir.display());
        utils::clear_dir(output_dir)?;
    }
    Ok(false)
}

fn cleanup(output_dir: &Path, image_dir: &Path, markdown_path: &Path, created: bool) {
    let result = if created {
        fs::remove_dir_all(output_dir)
    } else {
        let markdown = if markdown_path.exists() {
            fs::remove_file(markdown_path)
        } else {
            Ok(())
        };
        let images = if image_dir.exists() {
            fs::remove_dir_all(image_dir)
        } else {
            Ok(())
        };
        markdown.and(images)
    };
    if let Err(e) = result {
        warn!("Failed to clean up '{}': {}", output_dir.display(), e);
    }
}
