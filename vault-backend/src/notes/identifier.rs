//! Note identifiers: vault-relative, `/`-separated paths ending in `.md`.

use super::error::{NoteError, NoteResult};
use std::fmt;
use std::path::{Path, PathBuf};

pub const NOTE_EXTENSION: &str = ".md";

/// Characters that would end or split a `[[target|alias]]` link
const LINK_SYNTAX_CHARS: [char; 3] = ['[', ']', '|'];

/// Canonical identifier of a note inside a vault.
///
/// The same value is the graph key for wikilinks and the physical location
/// of the file, so two spellings of one path always normalize to one id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoteId(String);

impl NoteId {
    /// Normalize a caller-supplied identifier (extension optional).
    pub fn parse(raw: &str) -> NoteResult<Self> {
        let unified = raw.trim().replace('\\', "/");
        let trimmed = unified.trim_start_matches('/');
        if trimmed.is_empty() || trimmed.contains(LINK_SYNTAX_CHARS) {
            return Err(NoteError::InvalidIdentifier(raw.to_string()));
        }

        for segment in trimmed.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(NoteError::InvalidIdentifier(raw.to_string()));
            }
        }

        let canonical = if trimmed.ends_with(NOTE_EXTENSION) {
            trimmed.to_string()
        } else {
            format!("{}{}", trimmed, NOTE_EXTENSION)
        };

        if canonical == NOTE_EXTENSION || canonical.ends_with(&format!("/{}", NOTE_EXTENSION)) {
            return Err(NoteError::InvalidIdentifier(raw.to_string()));
        }

        Ok(NoteId(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier without the extension; this is what `[[...]]` links target.
    pub fn title(&self) -> &str {
        self.0.strip_suffix(NOTE_EXTENSION).unwrap_or(&self.0)
    }

    /// First path segment when the note lives in a sub-tree
    pub fn category(&self) -> Option<&str> {
        self.0.split_once('/').map(|(head, _)| head)
    }

    pub fn to_path(&self, vault_dir: &Path) -> PathBuf {
        self.0.split('/').fold(vault_dir.to_path_buf(), |acc, seg| acc.join(seg))
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
