//! Namespace restriction for note mutations

use super::error::{NoteError, NoteResult};
use super::identifier::NoteId;

/// Which top-level categories accept created, edited, renamed or deleted notes.
/// An empty allow-list leaves the whole vault writable.
#[derive(Debug, Clone, Default)]
pub struct NamespacePolicy {
    writable: Vec<String>,
}

impl NamespacePolicy {
    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn restricted_to<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            writable: categories.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_restricted(&self) -> bool {
        !self.writable.is_empty()
    }

    pub fn check_writable(&self, id: &NoteId) -> NoteResult<()> {
        if !self.is_restricted() {
            return Ok(());
        }
        match id.category() {
            Some(category) if self.writable.iter().any(|c| c == category) => Ok(()),
            _ => Err(NoteError::NamespaceRestricted {
                id: id.to_string(),
                allowed: self.writable.join(", "),
            }),
        }
    }
}
