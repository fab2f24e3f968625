use crate::notes::wikilink::extract_wikilinks;
use crate::tools::registry::Tool;
use crate::tools::types::{
    PropertySchema, ToolContext, ToolDefinition, ToolGroup, ToolInputSchema, ToolResult,
    ToolSafetyLevel,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;

/// Reads a note along with the notes that link to it
pub struct ReadNoteTool {
    definition: ToolDefinition,
}

impl ReadNoteTool {
    pub fn new() -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            "note_title".to_string(),
            PropertySchema::string(
                "The title of the note to read, e.g. 'concept/graph' (the .md extension is optional).",
            ),
        );

        ReadNoteTool {
            definition: ToolDefinition {
                name: "read_note".to_string(),
                description: "Get the content of a note with the provided title, plus the notes that link to it.".to_string(),
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

impl Default for ReadNoteTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct ReadNoteParams {
    note_title: String,
}

#[async_trait]
impl Tool for ReadNoteTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let params: ReadNoteParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };
        let store = match context.require_notes_store() {
            Ok(store) => store,
            Err(result) => return result,
        };

        let content = match store.read_note(&params.note_title) {
            Ok(Some(content)) => content,
            Ok(None) => return ToolResult::error(format!("Note not found: {}", params.note_title)),
            Err(e) => return ToolResult::error(format!("Failed to read note: {}", e)),
        };

        let outlinks = extract_wikilinks(&content);
        let mut output = content;

        // Content is still useful when the inlink scan cannot run.
        let (inlinks, complete) = match store.inlinks(&params.note_title).await {
            Ok(report) => {
                let complete = report.is_complete();
                (report.inlinks.into_iter().collect::<Vec<_>>(), complete)
            }
            Err(e) => {
                log::warn!("[TOOLS] Inlink scan for {} failed: {}", params.note_title, e);
                (Vec::new(), false)
            }
        };

        output.push_str("\n\n---\n");
        if inlinks.is_empty() {
            output.push_str("Linked from: (no notes)");
        } else {
            output.push_str(&format!("Linked from: {}", inlinks.join(", ")));
        }
        if !complete {
            output.push_str("\n(some notes could not be checked for links)");
        }

        ToolResult::success(output).with_metadata(json!({
            "note": params.note_title,
            "inlinks": inlinks,
            "inlinks_complete": complete,
            "outlinks": outlinks,
        }))
    }

    fn safety_level(&self) -> ToolSafetyLevel {
        ToolSafetyLevel::ReadOnly
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::NoteStore;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn context_with(notes: &[(&str, &str)]) -> (TempDir, ToolContext) {
        let dir = TempDir::new().unwrap();
        let store = NoteStore::new(dir.path());
        for (id, body) in notes {
            store.create_note(id, body).unwrap();
        }
        let context = ToolContext::new().with_notes_store(Arc::new(store));
        (dir, context)
    }

    #[test]
    fn test_read_note_definition() {
        let def = ReadNoteTool::new().definition();
        assert_eq!(def.name, "read_note");
        assert_eq!(def.group, ToolGroup::Notes);
        assert!(def.input_schema.required.contains(&"note_title".to_string()));
    }

    #[tokio::test]
    async fn test_read_note_with_inlinks() {
        let (_dir, context) = context_with(&[
            ("a", "see [[b]]"),
            ("b", "hello [[a]]"),
            ("c", "[[b|Beta]] link"),
        ]);

        let result = ReadNoteTool::new()
            .execute(json!({ "note_title": "b" }), &context)
            .await;

        assert!(result.success);
        assert!(result.content.starts_with("hello [[a]]"));
        assert!(result.content.contains("Linked from: a.md, c.md"));
        let meta = result.metadata.unwrap();
        assert_eq!(meta["inlinks"], json!(["a.md", "c.md"]));
        assert_eq!(meta["outlinks"], json!(["a"]));
    }

    #[tokio::test]
    async fn test_read_missing_note() {
        let (_dir, context) = context_with(&[]);
        let result = ReadNoteTool::new()
            .execute(json!({ "note_title": "nope" }), &context)
            .await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("Note not found"));
    }

    #[tokio::test]
    async fn test_read_without_store() {
        let result = ReadNoteTool::new()
            .execute(json!({ "note_title": "x" }), &ToolContext::new())
            .await;
        assert!(!result.success);
        assert!(result.content.contains("Notes store not available"));
    }
}
