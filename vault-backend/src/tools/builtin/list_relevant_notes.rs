use crate::classifier::BatchStatus;
use crate::tools::registry::Tool;
use crate::tools::types::{
    PropertySchema, ToolContext, ToolDefinition, ToolGroup, ToolInputSchema, ToolResult,
    ToolSafetyLevel,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;

/// Asks the language model which vault notes matter for a query
pub struct ListRelevantNotesTool {
    definition: ToolDefinition,
}

impl ListRelevantNotesTool {
    pub fn new() -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            "query".to_string(),
            PropertySchema::string("What you are looking for, in plain language."),
        );

        ListRelevantNotesTool {
            definition: ToolDefinition {
                name: "list_relevant_notes".to_string(),
                description: "List the titles of notes relevant to a query. Every note title in the vault is judged by a language model.".to_string(),
                input_schema: ToolInputSchema {
                    schema_type: "object".to_string(),
                    properties,
                    required: vec!["query".to_string()],
                },
                group: ToolGroup::Search,
            },
        }
    }
}

impl Default for ListRelevantNotesTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct ListRelevantNotesParams {
    query: String,
}

#[async_trait]
impl Tool for ListRelevantNotesTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let params: ListRelevantNotesParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };
        let store = match context.require_notes_store() {
            Ok(store) => store,
            Err(result) => return result,
        };
        let classifier = match context.classifier.as_ref() {
            Some(c) => c,
            None => return ToolResult::error("Relevance classifier not configured."),
        };

        let report = match classifier
            .list_relevant_notes(store.vault_dir(), &params.query)
            .await
        {
            Ok(report) => report,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        let failed: Vec<Value> = report
            .batches
            .iter()
            .filter_map(|b| match &b.status {
                BatchStatus::Failed(reason) => Some(json!({
                    "batch": b.index,
                    "size": b.size,
                    "reason": reason,
                })),
                _ => None,
            })
            .collect();

        let mut output = if report.notes.is_empty() {
            "No relevant notes found.".to_string()
        } else {
            report.notes.join("\n")
        };
        if !failed.is_empty() {
            let skipped: usize = report.failed_batches().map(|b| b.size).sum();
            output.push_str(&format!(
                "\n\n({} of {} batches failed; {} notes were not judged)",
                failed.len(),
                report.batches.len(),
                skipped
            ));
        }

        let unscanned: Vec<&str> = report.unscanned.iter().map(|s| s.id.as_str()).collect();
        if !unscanned.is_empty() {
            output.push_str(&format!(
                "\n\n(could not read part of the vault: {})",
                unscanned.join(", ")
            ));
        }

        ToolResult::success(output).with_metadata(json!({
            "query": params.query,
            "notes": report.notes,
            "batches": report.batches.len(),
            "failed_batches": failed,
            "unscanned": unscanned,
        }))
    }

    fn safety_level(&self) -> ToolSafetyLevel {
        ToolSafetyLevel::ReadOnly
    }
}
