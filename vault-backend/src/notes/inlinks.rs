//! Inlink discovery: which notes link to a given note.

use super::SkippedFile;
use super::error::NoteResult;
use super::file_ops;
use super::identifier::NoteId;
use super::wikilink::LinkPattern;
use futures_util::stream::{self, StreamExt};
use std::collections::BTreeSet;
use std::path::Path;

/// Notes referencing a target, plus the candidates that could not be checked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlinkReport {
    pub inlinks: BTreeSet<String>,
    pub skipped: Vec<SkippedFile>,
}

impl InlinkReport {
    /// False when some candidate was unreadable, so inlinks may be missing
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Scan the vault for notes containing `[[title]]` or `[[title|...]]` for `target`.
///
/// Candidate files are read concurrently, at most `max_concurrency` at a time.
/// An unreadable candidate is recorded in `skipped`; an unreadable vault fails
/// the whole call.
pub async fn find_inlinks(
    vault_dir: &Path,
    target: &NoteId,
    max_concurrency: usize,
) -> NoteResult<InlinkReport> {
    let pattern = LinkPattern::for_title(target.title());
    let candidates: Vec<String> = file_ops::list_notes_strict(vault_dir)?
        .into_iter()
        .filter(|rel| rel != target.as_str())
        .collect();

    if candidates.is_empty() {
        return Ok(InlinkReport::default());
    }

    let limit = candidates.len().min(max_concurrency.max(1));
    log::debug!(
        "[INLINKS] Checking {} candidates for [[{}]] ({} workers)",
        candidates.len(),
        pattern.title(),
        limit
    );

    let pattern = &pattern;
    let checks: Vec<(String, std::io::Result<bool>)> = stream::iter(candidates)
        .map(|rel| async move {
            let path = rel
                .split('/')
                .fold(vault_dir.to_path_buf(), |acc, seg| acc.join(seg));
            let outcome = tokio::fs::read(&path)
                .await
                .map(|bytes| pattern.is_match(&bytes));
            (rel, outcome)
        })
        .buffer_unordered(limit)
        .collect()
        .await;

    let mut report = InlinkReport::default();
    for (rel, outcome) in checks {
        match outcome {
            Ok(true) => {
                report.inlinks.insert(rel);
            }
            Ok(false) => {}
            Err(e) => {
                log::warn!("[INLINKS] Skipping unreadable note {}: {}", rel, e);
                report.skipped.push(SkippedFile::new(rel, e.to_string()));
            }
        }
    }
    report.skipped.sort_by(|a, b| a.id.cmp(&b.id));

    Ok(report)
}
