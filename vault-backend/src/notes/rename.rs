//! Renaming a note while keeping every `[[wikilink]]` to it intact.
//!
//! Links are rewritten before the file moves, so an interruption leaves the
//! original note resolvable. A staging marker at the vault root records the
//! rename in flight; it is cleared only after the file has moved, and
//! [`recover_interrupted_rename`] finishes whatever a crash left behind.

use super::SkippedFile;
use super::error::{NoteError, NoteResult};
use super::file_ops::{self, ScanReport};
use super::identifier::NoteId;
use super::wikilink::LinkPattern;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const RENAME_MARKER: &str = ".vault-rename.json";

/// Contents of the staging marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRename {
    pub old: String,
    pub new: String,
    pub started_at: DateTime<Utc>,
}

/// Notes whose links were rewritten, and the ones that could not be
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameOutcome {
    pub updated: Vec<String>,
    pub failed: Vec<SkippedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Links were re-applied and the file moved
    Completed(RenameOutcome),
    /// The file had already moved; only the marker was left
    AlreadyFinished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovery {
    pub pending: PendingRename,
    pub action: RecoveryAction,
}

/// Rename `old` to `new` and rewrite `[[old]]` / `[[old|alias]]` across the vault.
///
/// Fails without touching anything when `old` is missing, `new` exists, or an
/// earlier rename is still pending. A failure while moving the file is
/// returned as an error even though links were already rewritten; the marker
/// stays behind for recovery.
pub fn rename_note(vault_dir: &Path, old: &NoteId, new: &NoteId) -> NoteResult<RenameOutcome> {
    if let Some(pending) = read_marker(vault_dir)? {
        return Err(NoteError::RenamePending {
            old: pending.old,
            new: pending.new,
        });
    }

    let old_path = old.to_path(vault_dir);
    let new_path = new.to_path(vault_dir);

    if !old_path.is_file() {
        return Err(NoteError::NotFound(old.title().to_string()));
    }
    if new_path.exists() {
        return Err(NoteError::AlreadyExists(new.title().to_string()));
    }

    let scan = file_ops::scan_notes(vault_dir)?;

    let pending = PendingRename {
        old: old.to_string(),
        new: new.to_string(),
        started_at: Utc::now(),
    };
    write_marker(vault_dir, &pending)?;

    let outcome = rewrite_scanned(vault_dir, scan, old, new);
    move_note(&old_path, &new_path)?;
    clear_marker(vault_dir)?;

    log::info!(
        "[RENAME] Renamed {} to {} ({} notes relinked, {} failed)",
        old,
        new,
        outcome.updated.len(),
        outcome.failed.len()
    );
    Ok(outcome)
}

/// Rewrite links to `old` in every other note; writes only notes that change.
///
/// Vault entries the scan could not enter are reported in `failed`, since
/// links inside them were left untouched.
pub fn rewrite_links(vault_dir: &Path, old: &NoteId, new: &NoteId) -> NoteResult<RenameOutcome> {
    let scan = file_ops::scan_notes(vault_dir)?;
    Ok(rewrite_scanned(vault_dir, scan, old, new))
}

fn rewrite_scanned(vault_dir: &Path, scan: ScanReport, old: &NoteId, new: &NoteId) -> RenameOutcome {
    let pattern = LinkPattern::for_title(old.title());
    let mut outcome = RenameOutcome {
        updated: Vec::new(),
        failed: scan.skipped,
    };

    for rel in scan.notes {
        if rel == old.as_str() {
            continue;
        }
        let path = vault_dir.join(&rel);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("[RENAME] Could not update links in {}: {}", rel, e);
                outcome.failed.push(SkippedFile::new(rel, e.to_string()));
                continue;
            }
        };

        let Some(updated) = pattern.rewrite(&content, new.title()) else {
            continue;
        };

        match fs::write(&path, updated) {
            Ok(()) => outcome.updated.push(rel),
            Err(e) => {
                log::warn!("[RENAME] Could not update links in {}: {}", rel, e);
                outcome.failed.push(SkippedFile::new(rel, e.to_string()));
            }
        }
    }

    outcome
}

/// Finish a rename interrupted between link rewriting and the file move.
///
/// Returns `Ok(None)` when no rename was pending.
pub fn recover_interrupted_rename(vault_dir: &Path) -> NoteResult<Option<Recovery>> {
    let Some(pending) = read_marker(vault_dir)? else {
        return Ok(None);
    };

    let conflict = |reason: &str| NoteError::RecoveryConflict {
        old: pending.old.clone(),
        new: pending.new.clone(),
        reason: reason.to_string(),
    };
    let old = NoteId::parse(&pending.old).map_err(|_| conflict("marker names an invalid note"))?;
    let new = NoteId::parse(&pending.new).map_err(|_| conflict("marker names an invalid note"))?;

    let old_path = old.to_path(vault_dir);
    let new_path = new.to_path(vault_dir);

    let action = match (old_path.is_file(), new_path.exists()) {
        (true, false) => {
            log::warn!("[RENAME] Resuming interrupted rename of {} to {}", old, new);
            let outcome = rewrite_links(vault_dir, &old, &new)?;
            move_note(&old_path, &new_path)?;
            RecoveryAction::Completed(outcome)
        }
        (false, true) => {
            log::info!("[RENAME] Rename of {} to {} had already finished", old, new);
            RecoveryAction::AlreadyFinished
        }
        (true, true) => {
            log::error!("[RENAME] Both {} and {} exist; leaving marker in place", old, new);
            return Err(conflict("both notes exist"));
        }
        (false, false) => {
            log::error!("[RENAME] Neither {} nor {} exists; leaving marker in place", old, new);
            return Err(conflict("neither note exists"));
        }
    };

    clear_marker(vault_dir)?;
    Ok(Some(Recovery { pending, action }))
}

/// The rename currently staged in this vault, if any
pub fn pending_rename(vault_dir: &Path) -> NoteResult<Option<PendingRename>> {
    read_marker(vault_dir)
}

fn marker_path(vault_dir: &Path) -> PathBuf {
    vault_dir.join(RENAME_MARKER)
}

fn read_marker(vault_dir: &Path) -> NoteResult<Option<PendingRename>> {
    let path = marker_path(vault_dir);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(NoteError::io("Failed to read rename marker", e)),
    };
    serde_json::from_str(&raw).map(Some).map_err(|e| {
        NoteError::io(
            "Failed to parse rename marker",
            io::Error::new(io::ErrorKind::InvalidData, e),
        )
    })
}

fn write_marker(vault_dir: &Path, pending: &PendingRename) -> NoteResult<()> {
    let body = serde_json::to_string_pretty(pending)
        .map_err(|e| NoteError::io("Failed to encode rename marker", io::Error::other(e)))?;
    fs::write(marker_path(vault_dir), body)
        .map_err(|e| NoteError::io("Failed to write rename marker", e))
}

fn clear_marker(vault_dir: &Path) -> NoteResult<()> {
    match fs::remove_file(marker_path(vault_dir)) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(NoteError::io("Failed to clear rename marker", e)),
    }
}

fn move_note(old_path: &Path, new_path: &Path) -> NoteResult<()> {
    if let Some(parent) = new_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| NoteError::io(format!("Failed to create {}", parent.display()), e))?;
    }
    fs::rename(old_path, new_path).map_err(|e| {
        NoteError::io(
            format!("Failed to rename {} to {}", old_path.display(), new_path.display()),
            e,
        )
    })
}
