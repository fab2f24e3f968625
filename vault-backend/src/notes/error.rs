//! Failure reasons surfaced by vault operations.
//!
//! Only whole-operation failures live here. Per-file problems during a bulk
//! scan are absorbed into the operation's report instead.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    #[error("Invalid note identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("Note {0} not found.")]
    NotFound(String),

    #[error("Note {0} already exists.")]
    AlreadyExists(String),

    #[error("No string '{needle}' found in {id}")]
    PatternNotFound { id: String, needle: String },

    #[error("Note {id} is outside the writable categories: {allowed}")]
    NamespaceRestricted { id: String, allowed: String },

    #[error("Failed to scan vault at {}: {source}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("An interrupted rename of {old} to {new} must be recovered first")]
    RenamePending { old: String, new: String },

    #[error("Cannot recover rename of {old} to {new}: {reason}")]
    RecoveryConflict {
        old: String,
        new: String,
        reason: String,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl NoteError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        NoteError::Io {
            context: context.into(),
            source,
        }
    }
}

pub type NoteResult<T> = Result<T, NoteError>;
