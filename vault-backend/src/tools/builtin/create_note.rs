use crate::tools::registry::Tool;
use crate::tools::types::{
    PropertySchema, ToolContext, ToolDefinition, ToolGroup, ToolInputSchema, ToolResult,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;

pub struct CreateNoteTool {
    definition: ToolDefinition,
}

impl CreateNoteTool {
    pub fn new() -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            "note_title".to_string(),
            PropertySchema::string(
                "Title of the new note. Use 'category/name' to place it in a category folder.",
            ),
        );
        properties.insert(
            "data".to_string(),
            PropertySchema::string("Markdown content of the note. Link other notes with [[title]]."),
        );

        CreateNoteTool {
            definition: ToolDefinition {
                name: "create_note".to_string(),
                description: "Create a new note. Fails if a note with the same title already exists.".to_string(),
                input_schema: ToolInputSchema {
                    schema_type: "object".to_string(),
                    properties,
                    required: vec!["note_title".to_string(), "data".to_string()],
                },
                group: ToolGroup::Notes,
            },
        }
    }
}

impl Default for CreateNoteTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct CreateNoteParams {
    note_title: String,
    data: String,
}

#[async_trait]
impl Tool for CreateNoteTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let params: CreateNoteParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };
        let store = match context.require_notes_store() {
            Ok(store) => store,
            Err(result) => return result,
        };

        match store.create_note(&params.note_title, &params.data) {
            Ok(id) => ToolResult::success(format!("Successfully created {}", id.title()))
                .with_metadata(json!({
                    "note": id.as_str(),
                    "bytes": params.data.len(),
                })),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::{NamespacePolicy, NoteStore};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_note() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(NoteStore::new(dir.path()));
        let context = ToolContext::new().with_notes_store(store.clone());
        let tool = CreateNoteTool::new();

        let result = tool
            .execute(json!({ "note_title": "concept/graph", "data": "# Graph" }), &context)
            .await;
        assert!(result.success);
        assert_eq!(result.content, "Successfully created concept/graph");
        assert_eq!(store.read_note("concept/graph").unwrap().unwrap(), "# Graph");

        let again = tool
            .execute(json!({ "note_title": "concept/graph.md", "data": "other" }), &context)
            .await;
        assert!(!again.success);
        assert_eq!(again.content, "Note concept/graph already exists.");
    }

    #[tokio::test]
    async fn test_create_outside_writable_categories() {
        let dir = TempDir::new().unwrap();
        let store = NoteStore::new(dir.path()).with_policy(NamespacePolicy::restricted_to(["concept"]));
        let context = ToolContext::new().with_notes_store(Arc::new(store));

        let result = CreateNoteTool::new()
            .execute(json!({ "note_title": "Sources/md/x", "data": "x" }), &context)
            .await;
        assert!(!result.success);
        assert!(result.content.contains("writable categories"));
    }

    #[tokio::test]
    async fn test_missing_data_param() {
        let result = CreateNoteTool::new()
            .execute(json!({ "note_title": "x" }), &ToolContext::new())
            .await;
        assert!(!result.success);
        assert!(result.content.starts_with("Invalid parameters"));
    }
}
