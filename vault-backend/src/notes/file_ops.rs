//! File operations for the vault
//!
//! Reading/writing note files and enumerating every note under a vault root.

use super::SkippedFile;
use super::error::{NoteError, NoteResult};
use super::identifier::NOTE_EXTENSION;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use walkdir::WalkDir;

/// Create a new note file, creating parent directories as needed.
///
/// Never overwrites: an existing file fails with `ErrorKind::AlreadyExists`.
pub fn create_note_file(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Read a note file, returning `None` if not found
pub fn read_note(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Notes found under a vault root, plus the entries the walk could not enter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub notes: Vec<String>,
    pub skipped: Vec<SkippedFile>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OnEntryError {
    Abort,
    Record,
}

/// List every note under `root` as sorted vault-relative identifiers.
///
/// Entries that cannot be visited are logged and skipped. A root that does
/// not exist yet is an empty vault.
pub fn list_notes(root: &Path) -> Vec<String> {
    match walk(root, OnEntryError::Record) {
        Ok(report) => report.notes,
        Err(e) => {
            log::warn!("[NOTES] {}", e);
            Vec::new()
        }
    }
}

/// Like [`list_notes`], but the first traversal error aborts the scan.
pub fn list_notes_strict(root: &Path) -> NoteResult<Vec<String>> {
    walk(root, OnEntryError::Abort).map(|report| report.notes)
}

/// Scan for bulk operations: an unreadable root fails with `Traversal`,
/// unreadable entries below it are returned in `skipped`.
pub fn scan_notes(root: &Path) -> NoteResult<ScanReport> {
    walk(root, OnEntryError::Record)
}

fn walk(root: &Path, on_error: OnEntryError) -> NoteResult<ScanReport> {
    if !root.exists() {
        return Ok(ScanReport::default());
    }

    let mut report = ScanReport::default();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                if on_error == OnEntryError::Abort || e.depth() == 0 || path == root {
                    return Err(NoteError::Traversal { path, source: e });
                }
                log::warn!("[NOTES] Skipping unreadable vault entry: {}", e);
                let id = relative_path(root, &path).unwrap_or_else(|| path.display().to_string());
                report.skipped.push(SkippedFile::new(id, e.to_string()));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let is_note = entry
            .file_name()
            .to_str()
            .map(|name| name.ends_with(NOTE_EXTENSION) && name.len() > NOTE_EXTENSION.len())
            .unwrap_or(false);
        if !is_note {
            continue;
        }

        if let Some(rel) = relative_path(root, entry.path()) {
            report.notes.push(rel);
        }
    }

    report.notes.sort();
    report.notes.dedup();
    report.skipped.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(report)
}

/// Get the `/`-separated path of `file_path` relative to `root`
pub fn relative_path(root: &Path, file_path: &Path) -> Option<String> {
    let rel = file_path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
