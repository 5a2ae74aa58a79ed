// src/convert/utils.rs
//! Filesystem and formatting helpers for the conversion pipeline

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};

use crate::Result;

/// List `.html`/`.htm` files directly inside `source_dir`, sorted by name.
///
/// Subdirectories are not searched. Extension matching ignores case.
pub fn discover_documents(source_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();

    for entry in fs::read_dir(source_dir)? {
        let path = entry?.path();
        if path.is_file() && is_html_document(&path) {
            documents.push(path);
        }
    }

    documents.sort();
    Ok(documents)
}

fn is_html_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
        .unwrap_or(false)
}

/// True if `dir` is missing or has no entries
pub fn is_empty_dir(dir: &Path) -> Result<bool> {
    if !dir.exists() {
        return Ok(true);
    }
    Ok(fs::read_dir(dir)?.next().is_none())
}

/// Remove everything inside `dir`, keeping the directory itself
pub fn clear_dir(dir: &Path) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Turn timestamp text into a filename prefix: `:` -> `-`, space -> `_`.
///
/// Path separators from custom date formats also become `-` so the prefix
/// never names a subdirectory.
pub fn sanitize_timestamp(stamp: &str) -> String {
    stamp
        .replace([':', '/', '\\'], "-")
        .replace(' ', "_")
}

/// Format a date as YYYY-MM-DD for section headers
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format the time-of-day part as HH:MM:SS
pub fn format_time(dt: &NaiveDateTime) -> String {
    dt.format("%H:%M:%S").to_string()
}
