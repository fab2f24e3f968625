//! Relevance classifier: finds notes relevant to a natural-language query
//!
//! The note list is cut into batches, each batch is sent to a
//! [`ClassificationBackend`] concurrently, and the replies are validated
//! against the batch they answer before being merged.

pub mod backend;
pub mod prompt;

pub use backend::{ClassificationBackend, ClassifierError, OpenAiChatBackend};

use crate::config::{ClassifierConfig, defaults};
use crate::notes::{NoteResult, SkippedFile, file_ops};
use futures_util::stream::{self, StreamExt};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// How one batch ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    /// At least one identifier from the batch was accepted
    Matched,
    /// The call succeeded but nothing in the batch was relevant
    Empty,
    /// The call failed or its reply could not be used
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Position of the batch in submission order
    pub index: usize,
    pub size: usize,
    pub status: BatchStatus,
    pub accepted: Vec<String>,
    /// Returned identifiers that were not part of the batch
    pub discarded: Vec<String>,
}

/// Merged result plus per-batch outcomes (in completion order)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelevanceReport {
    pub notes: Vec<String>,
    pub batches: Vec<BatchOutcome>,
    /// Vault entries the scan could not enter; their notes were never judged
    pub unscanned: Vec<SkippedFile>,
}

impl RelevanceReport {
    pub fn failed_batches(&self) -> impl Iterator<Item = &BatchOutcome> {
        self.batches
            .iter()
            .filter(|b| matches!(b.status, BatchStatus::Failed(_)))
    }

    /// False when some batch failed or part of the vault was unreadable
    pub fn is_complete(&self) -> bool {
        self.failed_batches().next().is_none() && self.unscanned.is_empty()
    }
}

pub struct RelevanceClassifier {
    backend: Arc<dyn ClassificationBackend>,
    batch_size: usize,
    max_concurrency: usize,
}

impl RelevanceClassifier {
    pub fn new(backend: Arc<dyn ClassificationBackend>, config: &ClassifierConfig) -> Self {
        Self {
            backend,
            batch_size: config.batch_size.clamp(1, defaults::CLASSIFIER_BATCH_SIZE),
            max_concurrency: config.max_concurrency.clamp(1, defaults::MAX_CONCURRENCY),
        }
    }

    /// Relevant identifiers, deduplicated in first-seen order
    pub async fn classify(&self, query: &str, identifiers: &[String]) -> Vec<String> {
        self.classify_detailed(query, identifiers).await.notes
    }

    pub async fn classify_detailed(&self, query: &str, identifiers: &[String]) -> RelevanceReport {
        if identifiers.is_empty() {
            return RelevanceReport::default();
        }

        let batches: Vec<&[String]> = identifiers.chunks(self.batch_size).collect();
        let workers = batches.len().min(self.max_concurrency);
        log::info!(
            "[CLASSIFIER] Classifying {} notes in {} batches ({} workers)",
            identifiers.len(),
            batches.len(),
            workers
        );

        let backend = &self.backend;
        let calls: Vec<_> = batches
            .into_iter()
            .enumerate()
            .map(|(index, batch)| async move {
                let reply = backend
                    .classify(prompt::SYSTEM_INSTRUCTION, query, batch)
                    .await;
                judge_batch(index, batch, reply)
            })
            .collect();
        let outcomes: Vec<BatchOutcome> = stream::iter(calls)
            .buffer_unordered(workers)
            .collect()
            .await;

        let mut seen = HashSet::new();
        let mut notes = Vec::new();
        for outcome in &outcomes {
            for id in &outcome.accepted {
                if seen.insert(id.as_str()) {
                    notes.push(id.clone());
                }
            }
        }

        RelevanceReport {
            notes,
            batches: outcomes,
            unscanned: Vec::new(),
        }
    }

    /// Scan the vault and classify every note in it.
    ///
    /// Fails when the vault root cannot be read; unreadable entries below it
    /// are listed in `unscanned`.
    pub async fn list_relevant_notes(
        &self,
        vault_dir: &Path,
        query: &str,
    ) -> NoteResult<RelevanceReport> {
        let scan = file_ops::scan_notes(vault_dir)?;
        let mut report = self.classify_detailed(query, &scan.notes).await;
        report.unscanned = scan.skipped;
        Ok(report)
    }
}

fn judge_batch(
    index: usize,
    batch: &[String],
    reply: Result<Value, ClassifierError>,
) -> BatchOutcome {
    let mut outcome = BatchOutcome {
        index,
        size: batch.len(),
        status: BatchStatus::Empty,
        accepted: Vec::new(),
        discarded: Vec::new(),
    };

    let returned = match reply.and_then(extract_identifiers) {
        Ok(returned) => returned,
        Err(e) => {
            log::warn!("[CLASSIFIER] Batch {} failed: {}", index, e);
            outcome.status = BatchStatus::Failed(e.to_string());
            return outcome;
        }
    };

    for id in returned {
        if batch.contains(&id) {
            outcome.accepted.push(id);
        } else {
            log::warn!("[CLASSIFIER] Batch {} returned unknown note '{}', discarding", index, id);
            outcome.discarded.push(id);
        }
    }

    if !outcome.accepted.is_empty() {
        outcome.status = BatchStatus::Matched;
    }
    outcome
}

/// Accept `["a", "b"]` or `{"notes": ["a", "b"]}`; anything else is malformed
fn extract_identifiers(reply: Value) -> Result<Vec<String>, ClassifierError> {
    let list = match reply {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("notes") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(ClassifierError::Malformed(
                    "expected a \"notes\" list".to_string(),
                ));
            }
        },
        other => {
            return Err(ClassifierError::Malformed(format!(
                "expected a list of strings, got {}",
                other
            )));
        }
    };

    list.into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            other => Err(ClassifierError::Malformed(format!(
                "expected string entries, got {}",
                other
            ))),
        })
        .collect()
}
