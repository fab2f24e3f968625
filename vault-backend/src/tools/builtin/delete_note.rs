use crate::tools::registry::Tool;
use crate::tools::types::{
    PropertySchema, ToolContext, ToolDefinition, ToolGroup, ToolInputSchema, ToolResult,
    ToolSafetyLevel,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;

pub struct DeleteNoteTool {
    definition: ToolDefinition,
}

impl DeleteNoteTool {
    pub fn new() -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            "note_title".to_string(),
            PropertySchema::string("Title of the note to delete."),
        );

        DeleteNoteTool {
            definition: ToolDefinition {
                name: "delete_note".to_string(),
                description: "Delete a note. Links pointing to it are left as they are.".to_string(),
                input_schema: ToolInputSchema {
                    schema_type: "object".to_string(),
                    properties,
                    required: vec!["note_title".to_string()],
                },
                group: ToolGroup::Notes,
            },
        }
    }
}

impl Default for DeleteNoteTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct DeleteNoteParams {
    note_title: String,
}

#[async_trait]
impl Tool for DeleteNoteTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let params: DeleteNoteParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };
        let store = match context.require_notes_store() {
            Ok(store) => store,
            Err(result) => return result,
        };

        match store.delete_note(&params.note_title) {
            Ok(()) => ToolResult::success(format!("Successfully deleted {}", params.note_title))
                .with_metadata(json!({ "note": params.note_title })),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }

    fn safety_level(&self) -> ToolSafetyLevel {
        ToolSafetyLevel::Destructive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::NoteStore;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_delete_note() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(NoteStore::new(dir.path()));
        store.create_note("old", "x").unwrap();
        let context = ToolContext::new().with_notes_store(store.clone());
        let tool = DeleteNoteTool::new();

        let result = tool.execute(json!({ "note_title": "old" }), &context).await;
        assert!(result.success);
        assert!(store.read_note("old").unwrap().is_none());

        let again = tool.execute(json!({ "note_title": "old" }), &context).await;
        assert!(!again.success);
        assert_eq!(again.content, "Note old not found.");
    }
}
