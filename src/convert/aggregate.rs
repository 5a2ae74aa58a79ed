// src/convert/aggregate.rs
//! Collect notes across all export documents

use std::path::PathBuf;

use crate::note::Note;

use super::assets::AssetRelocator;
use super::extract::NoteExtractor;
use super::ConversionStats;

/// All notes of a run, in extraction order until sorted
#[derive(Debug, Default)]
pub struct DocumentCollection {
    notes: Vec<Note>,
}

impl DocumentCollection {
    pub fn new(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Newest first. Stable, so ties keep extraction order.
    pub fn sort_newest_first(&mut self) {
        self.notes.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    }
}

/// Run the extractor over every document in order and concatenate.
///
/// Identical notes in two documents are kept twice.
pub fn aggregate(
    documents: &[PathBuf],
    extractor: &NoteExtractor,
    relocator: &AssetRelocator,
) -> (DocumentCollection, ConversionStats) {
    let mut notes = Vec::new();
    let mut stats = ConversionStats::default();

    for document in documents {
        let extraction = extractor.extract(document, relocator);
        notes.extend(extraction.notes);
        stats.merge(extraction.stats);
    }

    (DocumentCollection::new(notes), stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportFormat;
    use chrono::NaiveDateTime;
    use std::fs;
    use tempfile::TempDir;

    fn note(stamp: &str, content: &str) -> Note {
        let ts = NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").unwrap();
        Note::new(ts, content.to_string(), PathBuf::from("index.html"))
    }

    #[test]
    fn test_sort_newest_first_is_stable() {
        let mut collection = DocumentCollection::new(vec![
            note("2024-01-01 09:00:00", "old"),
            note("2024-01-02 10:00:00", "tie-1"),
            note("2024-01-03 08:00:00", "newest"),
            note("2024-01-02 10:00:00", "tie-2"),
        ]);
        collection.sort_newest_first();

        let order: Vec<_> = collection.notes().iter().map(|n| n.content.as_str()).collect();
        assert_eq!(order, vec!["newest", "tie-1", "tie-2", "old"]);
    }

    #[test]
    fn test_aggregate_concatenates_without_dedup() {
        let tmp = TempDir::new().unwrap();
        let memo = r#"<div class="memo"><div class="time">2024-01-01 09:00:00</div><div class="content"><p>same</p></div></div>"#;
        let a = tmp.path().join("a.html");
        let b = tmp.path().join("b.html");
        let broken = tmp.path().join("missing.html");
        fs::write(&a, memo).unwrap();
        fs::write(&b, memo).unwrap();
        let assets = tmp.path().join("flomo-images");
        fs::create_dir(&assets).unwrap();

        let extractor = NoteExtractor::new(&ExportFormat::default()).unwrap();
        let relocator = AssetRelocator::new(&assets, "flomo-images");
        let (collection, stats) = aggregate(&[a.clone(), broken, b.clone()], &extractor, &relocator);

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.notes()[0].source, a);
        assert_eq!(collection.notes()[1].source, b);
        assert_eq!(stats.documents, 2);
        assert_eq!(stats.documents_failed, 1);
        assert_eq!(stats.notes, 2);
        assert_eq!(stats.warnings.len(), 1);
    }

    #[test]
    fn test_empty_collection() {
        let collection = DocumentCollection::default();
        assert!(collection.is_empty());
        assert_eq!(collection.len(), 0);
    }
}
