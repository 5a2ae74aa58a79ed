// src/convert/render.rs
//! Markdown document rendering

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use crate::error::{FlomoError, Result};

use super::aggregate::DocumentCollection;
use super::utils::{format_date, format_time};

/// Sort the collection newest first and render it as one Markdown document.
///
/// A `# YYYY-MM-DD` header opens each calendar day; every note is a bold
/// time line, its content and a `---` rule.
pub fn render_markdown(collection: &mut DocumentCollection) -> String {
    collection.sort_newest_first();

    let mut out = String::new();
    let mut current_date: Option<NaiveDate> = None;

    for note in collection.notes() {
        let date = note.date();
        if current_date != Some(date) {
            out.push_str(&format!("# {}\n\n", format_date(&date)));
            current_date = Some(date);
        }
        out.push_str(&format!("**{}**\n", format_time(&note.timestamp)));
        out.push_str(&note.content);
        out.push_str("\n\n---\n\n");
    }

    out
}

/// Write the rendered document to `output_path`.
///
/// Fails with [`FlomoError::NoNotes`] on empty input instead of writing an
/// empty file.
pub fn render(collection: &mut DocumentCollection, output_path: &Path) -> Result<()> {
    if collection.is_empty() {
        return Err(FlomoError::NoNotes);
    }

    let markdown = render_markdown(collection);
    fs::write(output_path, markdown).map_err(|source| FlomoError::Write {
        path: output_path.to_path_buf(),
        source,
    })?;

    info!("Wrote {} notes to {}", collection.len(), output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Note;
    use chrono::NaiveDateTime;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn note(stamp: &str, content: &str) -> Note {
        let ts = NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").unwrap();
        Note::new(ts, content.to_string(), PathBuf::from("index.html"))
    }

    #[test]
    fn test_render_groups_by_date() {
        let mut notes = DocumentCollection::new(vec![
            note("2024-02-28 23:59:59", "last of february"),
            note("2024-03-01 09:10:00", "morning\n\n![](flomo-images/x.png)"),
            note("2024-03-01 14:05:30", "afternoon"),
        ]);

        let md = render_markdown(&mut notes);
        let expected = "# 2024-03-01\n\n\
                        **14:05:30**\nafternoon\n\n---\n\n\
                        **09:10:00**\nmorning\n\n![](flomo-images/x.png)\n\n---\n\n\
                        # 2024-02-28\n\n\
                        **23:59:59**\nlast of february\n\n---\n\n";
        assert_eq!(md, expected);
    }

    #[test]
    fn test_render_leaves_collection_sorted() {
        let mut notes = DocumentCollection::new(vec![
            note("2024-01-01 09:00:00", "old"),
            note("2024-01-03 09:00:00", "new"),
        ]);

        render_markdown(&mut notes);
        let order: Vec<_> = notes.notes().iter().map(|n| n.content.as_str()).collect();
        assert_eq!(order, vec!["new", "old"]);
    }

    #[test]
    fn test_render_ties_keep_input_order() {
        let mut notes = DocumentCollection::new(vec![
            note("2024-01-01 09:00:00", "first"),
            note("2024-01-01 09:00:00", "second"),
        ]);

        let md = render_markdown(&mut notes);
        let first = md.find("first").unwrap();
        let second = md.find("second").unwrap();
        assert!(first < second);
        assert_eq!(md.matches("# 2024-01-01").count(), 1);
    }

    #[test]
    fn test_render_writes_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("flomo-output.md");

        let mut notes = DocumentCollection::new(vec![note("2024-01-01 09:00:00", "héllo 你好")]);
        render(&mut notes, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "# 2024-01-01\n\n**09:00:00**\nhéllo 你好\n\n---\n\n");
    }

    #[test]
    fn test_render_empty_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("flomo-output.md");

        let err = render(&mut DocumentCollection::default(), &path).unwrap_err();
        assert!(matches!(err, FlomoError::NoNotes));
        assert!(!path.exists());
    }

    #[test]
    fn test_render_write_failure() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("no-such-dir").join("flomo-output.md");

        let mut notes = DocumentCollection::new(vec![note("2024-01-01 09:00:00", "x")]);
        let err = render(&mut notes, &path).unwrap_err();
        assert!(matches!(err, FlomoError::Write { .. }));
    }
}
