//! Notes vault: a tree of markdown notes linked with [[wikilinks]]
//!
//! Nothing is indexed or cached: every query re-reads the vault from disk.
//! The agent creates, edits, renames and deletes notes through the tools
//! layer; users browse the same files in Obsidian.

pub mod error;
pub mod file_ops;
pub mod identifier;
pub mod inlinks;
pub mod policy;
pub mod rename;
pub mod store;
pub mod wikilink;

pub use error::{NoteError, NoteResult};
pub use identifier::NoteId;
pub use inlinks::InlinkReport;
pub use policy::NamespacePolicy;
pub use rename::{RecoveryAction, RenameOutcome};
pub use store::NoteStore;

/// A note a bulk operation had to pass over, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub id: String,
    pub reason: String,
}

impl SkippedFile {
    pub fn new(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
