//! NoteStore: create, read, edit and delete notes by identifier
//!
//! Every call goes straight to the filesystem; the store keeps no copy of
//! note content between calls.

use super::error::{NoteError, NoteResult};
use super::file_ops;
use super::identifier::NoteId;
use super::inlinks::{self, InlinkReport};
use super::policy::NamespacePolicy;
use super::rename::{self, Recovery, RenameOutcome};
use crate::config::defaults;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub struct NoteStore {
    vault_dir: PathBuf,
    policy: NamespacePolicy,
    inlink_concurrency: usize,
}

impl NoteStore {
    pub fn new(vault_dir: impl Into<PathBuf>) -> Self {
        Self {
            vault_dir: vault_dir.into(),
            policy: NamespacePolicy::unrestricted(),
            inlink_concurrency: defaults::MAX_CONCURRENCY,
        }
    }

    pub fn with_policy(mut self, policy: NamespacePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_inlink_concurrency(mut self, workers: usize) -> Self {
        self.inlink_concurrency = workers.clamp(1, defaults::MAX_CONCURRENCY);
        self
    }

    /// Get the vault directory path
    pub fn vault_dir(&self) -> &Path {
        &self.vault_dir
    }

    /// Read a note's content; `Ok(None)` when it does not exist
    pub fn read_note(&self, raw_id: &str) -> NoteResult<Option<String>> {
        let id = NoteId::parse(raw_id)?;
        file_ops::read_note(&id.to_path(&self.vault_dir))
            .map_err(|e| NoteError::io(format!("Failed to read note {}", id.title()), e))
    }

    /// Create a note; never overwrites. Returns the canonical identifier.
    pub fn create_note(&self, raw_id: &str, content: &str) -> NoteResult<NoteId> {
        let id = NoteId::parse(raw_id)?;
        self.policy.check_writable(&id)?;

        let path = id.to_path(&self.vault_dir);
        file_ops::create_note_file(&path, content).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => NoteError::AlreadyExists(id.title().to_string()),
            _ => NoteError::io(format!("Error creating note {}", id.title()), e),
        })?;

        log::info!("[NOTES] Created {}", id);
        Ok(id)
    }

    /// Replace every occurrence of `old` with `new`. Returns how many were replaced.
    pub fn edit_note(&self, raw_id: &str, old: &str, new: &str) -> NoteResult<usize> {
        let id = NoteId::parse(raw_id)?;
        self.policy.check_writable(&id)?;

        let path = id.to_path(&self.vault_dir);
        let content = file_ops::read_note(&path)
            .map_err(|e| NoteError::io(format!("Error editing note {}", id.title()), e))?
            .ok_or_else(|| NoteError::NotFound(id.title().to_string()))?;

        let occurrences = if old.is_empty() { 0 } else { content.matches(old).count() };
        if occurrences == 0 {
            return Err(NoteError::PatternNotFound {
                id: id.title().to_string(),
                needle: old.to_string(),
            });
        }

        let updated = content.replace(old, new);
        fs::write(&path, updated)
            .map_err(|e| NoteError::io(format!("Error editing note {}", id.title()), e))?;

        log::info!("[NOTES] Edited {} ({} replacements)", id, occurrences);
        Ok(occurrences)
    }

    pub fn delete_note(&self, raw_id: &str) -> NoteResult<()> {
        let id = NoteId::parse(raw_id)?;
        self.policy.check_writable(&id)?;

        let path = id.to_path(&self.vault_dir);
        if !path.is_file() {
            return Err(NoteError::NotFound(id.title().to_string()));
        }

        fs::remove_file(&path)
            .map_err(|e| NoteError::io(format!("Error deleting note {}", id.title()), e))?;

        log::info!("[NOTES] Deleted {}", id);
        Ok(())
    }

    /// List all note identifiers, sorted
    pub fn list_notes(&self) -> Vec<String> {
        file_ops::list_notes(&self.vault_dir)
    }

    /// Notes linking to `raw_id`
    pub async fn inlinks(&self, raw_id: &str) -> NoteResult<InlinkReport> {
        let id = NoteId::parse(raw_id)?;
        inlinks::find_inlinks(&self.vault_dir, &id, self.inlink_concurrency).await
    }

    /// Rename a note and rewrite links to it across the vault
    pub fn rename_note(&self, old_raw: &str, new_raw: &str) -> NoteResult<RenameOutcome> {
        let old = NoteId::parse(old_raw)?;
        let new = NoteId::parse(new_raw)?;
        self.policy.check_writable(&old)?;
        self.policy.check_writable(&new)?;
        rename::rename_note(&self.vault_dir, &old, &new)
    }

    pub fn recover_interrupted_rename(&self) -> NoteResult<Option<Recovery>> {
        rename::recover_interrupted_rename(&self.vault_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_and_read() {
        let dir = tempdir().unwrap();
        let store = NoteStore::new(dir.path().join("vault"));

        let id = store.create_note("concept/graph", "# Graph").unwrap();
        assert_eq!(id.as_str(), "concept/graph.md");
        assert!(dir.path().join("vault/concept/graph.md").exists());

        assert_eq!(store.read_note("concept/graph.md").unwrap().unwrap(), "# Graph");
        assert_eq!(store.read_note("/concept/graph").unwrap().unwrap(), "# Graph");
    }

    #[test]
    fn test_read_missing_is_none() {
        let dir = tempdir().unwrap();
        let store = NoteStore::new(dir.path());
        assert!(store.read_note("nothing-here").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_prevention() {
        let dir = tempdir().unwrap();
        let store = NoteStore::new(dir.path());

        store.create_note("Unique Note", "Content").unwrap();
        let err = store.create_note("Unique Note.md", "Different").unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(store.read_note("Unique Note").unwrap().unwrap(), "Content");
    }

    #[test]
    fn test_concurrent_creates_have_one_winner() {
        let dir = tempdir().unwrap();
        let store = std::sync::Arc::new(NoteStore::new(dir.path()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || store.create_note("race", &format!("writer {}", i)))
            })
            .collect();
        let results: Vec<NoteResult<NoteId>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, NoteError::AlreadyExists(_))));
        let content = store.read_note("race").unwrap().unwrap();
        assert!(content.starts_with("writer "));
    }

    #[test]
    fn test_edit_replaces_all_occurrences() {
        let dir = tempdir().unwrap();
        let store = NoteStore::new(dir.path());
        store.create_note("n", "cat and cat and dog").unwrap();

        assert_eq!(store.edit_note("n", "cat", "bird").unwrap(), 2);
        assert_eq!(store.read_note("n").unwrap().unwrap(), "bird and bird and dog");
    }

    #[test]
    fn test_edit_missing_substring_fails_without_writing() {
        let dir = tempdir().unwrap();
        let store = NoteStore::new(dir.path());
        store.create_note("n", "unchanged").unwrap();

        let err = store.edit_note("n", "absent", "x").unwrap_err();
        assert_eq!(err.to_string(), "No string 'absent' found in n");
        assert_eq!(store.read_note("n").unwrap().unwrap(), "unchanged");

        let err = store.edit_note("ghost", "a", "b").unwrap_err();
        assert!(matches!(err, NoteError::NotFound(_)));
    }

    #[test]
    fn test_delete() {
        let dir = tempdir().unwrap();
        let store = NoteStore::new(dir.path());
        store.create_note("gone", "bye").unwrap();

        store.delete_note("gone").unwrap();
        assert!(store.read_note("gone").unwrap().is_none());
        assert_eq!(store.delete_note("gone").unwrap_err().to_string(), "Note gone not found.");
    }

    #[test]
    fn test_policy_blocks_writes_before_touching_disk() {
        let dir = tempdir().unwrap();
        let store = NoteStore::new(dir.path())
            .with_policy(NamespacePolicy::restricted_to(["proposition", "concept"]));

        assert!(store.create_note("concept/ok", "fine").is_ok());
        let err = store.create_note("Sources/md/paper", "nope").unwrap_err();
        assert!(matches!(err, NoteError::NamespaceRestricted { .. }));
        assert!(!dir.path().join("Sources").exists());

        fs::write(dir.path().join("root.md"), "outside").unwrap();
        assert!(store.read_note("root").unwrap().is_some());
        assert!(store.edit_note("root", "outside", "inside").is_err());
        assert!(store.delete_note("root").is_err());
        assert!(store.rename_note("concept/ok", "root-copy").is_err());
        assert!(dir.path().join("concept/ok.md").exists());
    }

    #[test]
    fn test_invalid_identifier_is_rejected() {
        let dir = tempdir().unwrap();
        let store = NoteStore::new(dir.path());
        assert!(matches!(
            store.create_note("../escape", "x"),
            Err(NoteError::InvalidIdentifier(_))
        ));
    }

    #[tokio::test]
    async fn test_rename_then_inlinks_follow_new_title() {
        let dir = tempdir().unwrap();
        let store = NoteStore::new(dir.path());
        store.create_note("a", "see [[b]]").unwrap();
        store.create_note("b", "hello").unwrap();
        store.create_note("c", "[[b|Beta]] link").unwrap();

        let before = store.inlinks("b").await.unwrap();
        assert_eq!(before.inlinks.len(), 2);

        let outcome = store.rename_note("b", "bee").unwrap();
        assert_eq!(outcome.updated, vec!["a.md", "c.md"]);

        let after = store.inlinks("bee").await.unwrap();
        assert!(after.inlinks.contains("a.md"));
        assert!(after.inlinks.contains("c.md"));
        assert_eq!(store.list_notes(), vec!["a.md", "bee.md", "c.md"]);
    }
}
