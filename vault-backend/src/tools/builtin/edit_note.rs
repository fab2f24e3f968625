use crate::tools::registry::Tool;
use crate::tools::types::{
    PropertySchema, ToolContext, ToolDefinition, ToolGroup, ToolInputSchema, ToolResult,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;

/// Replace text inside an existing note
pub struct EditNoteTool {
    definition: ToolDefinition,
}

impl EditNoteTool {
    pub fn new() -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            "note_title".to_string(),
            PropertySchema::string("Title of the note to edit."),
        );
        properties.insert(
            "old".to_string(),
            PropertySchema::string("Exact text to replace. Every occurrence is replaced."),
        );
        properties.insert(
            "new".to_string(),
            PropertySchema::string("Replacement text."),
        );

        EditNoteTool {
            definition: ToolDefinition {
                name: "edit_note".to_string(),
                description: "Edit a note by replacing every occurrence of a string with another string.".to_string(),
                input_schema: ToolInputSchema {
                    schema_type: "object".to_string(),
                    properties,
                    required: vec!["note_title".to_string(), "old".to_string(), "new".to_string()],
                },
                group: ToolGroup::Notes,
            },
        }
    }
}

impl Default for EditNoteTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct EditNoteParams {
    note_title: String,
    old: String,
    new: String,
}

#[async_trait]
impl Tool for EditNoteTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let params: EditNoteParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };
        let store = match context.require_notes_store() {
            Ok(store) => store,
            Err(result) => return result,
        };

        match store.edit_note(&params.note_title, &params.old, &params.new) {
            Ok(replaced) => ToolResult::success(format!(
                "Successfully edited {} ({} replacement{})",
                params.note_title,
                replaced,
                if replaced == 1 { "" } else { "s" }
            ))
            .with_metadata(json!({ "note": params.note_title, "replacements": replaced })),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}
