//! Source ingestion boundary
//!
//! Downloading papers, pulling bibliographic metadata and rendering them into
//! the vault is done by an external source manager. This module defines the
//! interface it is driven through and how prior artifacts are read back when
//! a source was already added.

use crate::notes::NoteError;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};

pub const SOURCES_DIR: &str = "Sources";

/// Everything the source manager produced for one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceArtifacts {
    pub identifier: String,
    pub raw_text: String,
    pub metadata_doc: String,
    pub bibliography_doc: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Source already exists: {identifier}")]
    AlreadyExists { identifier: String },

    #[error("Failed to add source: {0}")]
    Failed(String),
}

#[async_trait]
pub trait SourceManager: Send + Sync {
    async fn add_source(&self, doi: &str) -> Result<SourceArtifacts, SourceError>;
}

/// Vault paths of the three artifacts for `identifier`
pub fn artifact_paths(vault_dir: &Path, identifier: &str) -> (PathBuf, PathBuf, PathBuf) {
    let base = vault_dir.join(SOURCES_DIR);
    (
        base.join("raw").join(format!("{}.txt", identifier)),
        base.join("md").join(format!("{}.md", identifier)),
        base.join("bib").join(format!("{}.bib", identifier)),
    )
}

impl SourceArtifacts {
    /// Read the artifacts of a source added in an earlier run
    pub fn load_existing(vault_dir: &Path, identifier: &str) -> Result<Self, NoteError> {
        let (raw, md, bib) = artifact_paths(vault_dir, identifier);
        Ok(Self {
            identifier: identifier.to_string(),
            raw_text: read_artifact(&raw)?,
            metadata_doc: read_artifact(&md)?,
            bibliography_doc: read_artifact(&bib)?,
        })
    }
}

fn read_artifact(path: &Path) -> Result<String, NoteError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => NoteError::NotFound(path.display().to_string()),
        _ => NoteError::io(format!("Failed to read {}", path.display()), e),
    })
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Source {identifier} exists but its artifacts are unreadable: {source}")]
    Artifacts {
        identifier: String,
        #[source]
        source: NoteError,
    },
}

/// Add a source, or reuse the artifacts already in the vault when it was added before
pub async fn ingest_source(
    manager: &dyn SourceManager,
    vault_dir: &Path,
    doi: &str,
) -> Result<SourceArtifacts, IngestError> {
    match manager.add_source(doi).await {
        Ok(artifacts) => {
            log::info!("[SOURCES] Added {} as {}", doi, artifacts.identifier);
            Ok(artifacts)
        }
        Err(SourceError::AlreadyExists { identifier }) => {
            log::info!("[SOURCES] Source already exists: {}", identifier);
            SourceArtifacts::load_existing(vault_dir, &identifier)
                .map_err(|source| IngestError::Artifacts { identifier, source })
        }
        Err(e) => Err(e.into()),
    }
}
