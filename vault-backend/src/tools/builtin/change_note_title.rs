use crate::tools::registry::Tool;
use crate::tools::types::{
    PropertySchema, ToolContext, ToolDefinition, ToolGroup, ToolInputSchema, ToolResult,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;

/// Renames a note and rewrites every [[link]] pointing at it
pub struct ChangeNoteTitleTool {
    definition: ToolDefinition,
}

impl ChangeNoteTitleTool {
    pub fn new() -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            "note_title".to_string(),
            PropertySchema::string("Current title of the note."),
        );
        properties.insert(
            "new_title".to_string(),
            PropertySchema::string("New title. Must not belong to an existing note."),
        );

        ChangeNoteTitleTool {
            definition: ToolDefinition {
                name: "change_note_title".to_string(),
                description: "Rename a note and update every wikilink to it across the vault. Aliases in [[title|alias]] links are kept.".to_string(),
                input_schema: ToolInputSchema {
                    schema_type: "object".to_string(),
                    properties,
                    required: vec!["note_title".to_string(), "new_title".to_string()],
                },
                group: ToolGroup::Notes,
            },
        }
    }
}

impl Default for ChangeNoteTitleTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct ChangeNoteTitleParams {
    note_title: String,
    new_title: String,
}

#[async_trait]
impl Tool for ChangeNoteTitleTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let params: ChangeNoteTitleParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };
        let store = match context.require_notes_store() {
            Ok(store) => store,
            Err(result) => return result,
        };

        let outcome = match store.rename_note(&params.note_title, &params.new_title) {
            Ok(outcome) => outcome,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        let mut message = format!(
            "Successfully renamed {} to {}.",
            params.note_title, params.new_title
        );
        if outcome.updated.is_empty() {
            message.push_str(" No links found to update.");
        } else {
            message.push_str(&format!(
                " Updated links in {} files: {}",
                outcome.updated.len(),
                outcome.updated.join(", ")
            ));
        }
        if !outcome.failed.is_empty() {
            let failed: Vec<String> = outcome
                .failed
                .iter()
                .map(|f| format!("{} ({})", f.id, f.reason))
                .collect();
            message.push_str(&format!(
                "\nCould not update links in {} files: {}",
                failed.len(),
                failed.join(", ")
            ));
        }

        let failed_ids: Vec<&str> = outcome.failed.iter().map(|f| f.id.as_str()).collect();
        ToolResult::success(message).with_metadata(json!({
            "old": params.note_title,
            "new": params.new_title,
            "updated": outcome.updated,
            "failed": failed_ids,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::NoteStore;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn setup(notes: &[(&str, &str)]) -> (TempDir, Arc<NoteStore>, ToolContext) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(NoteStore::new(dir.path()));
        for (id, body) in notes {
            store.create_note(id, body).unwrap();
        }
        let context = ToolContext::new().with_notes_store(store.clone());
        (dir, store, context)
    }

    #[tokio::test]
    async fn test_rename_updates_links() {
        let (_dir, store, context) = setup(&[
            ("a", "see [[b]]"),
            ("b", "hello"),
            ("c", "[[b|Beta]] link"),
        ]);

        let result = ChangeNoteTitleTool::new()
            .execute(json!({ "note_title": "b", "new_title": "bee" }), &context)
            .await;

        assert!(result.success);
        assert_eq!(
            result.content,
            "Successfully renamed b to bee. Updated links in 2 files: a.md, c.md"
        );
        assert_eq!(store.read_note("a").unwrap().unwrap(), "see [[bee]]");
        assert_eq!(store.read_note("c").unwrap().unwrap(), "[[bee|Beta]] link");
        assert!(store.read_note("b").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rename_without_links() {
        let (_dir, _store, context) = setup(&[("lonely", "nobody links here")]);

        let result = ChangeNoteTitleTool::new()
            .execute(json!({ "note_title": "lonely", "new_title": "solo" }), &context)
            .await;
        assert!(result.success);
        assert_eq!(
            result.content,
            "Successfully renamed lonely to solo. No links found to update."
        );
    }

    #[tokio::test]
    async fn test_rename_to_title_with_link_syntax_is_rejected() {
        let (_dir, store, context) = setup(&[("a", "[[b]]"), ("b", "B")]);

        let result = ChangeNoteTitleTool::new()
            .execute(json!({ "note_title": "b", "new_title": "x|y" }), &context)
            .await;
        assert!(!result.success);
        assert!(result.content.contains("Invalid note identifier"));
        assert_eq!(store.read_note("a").unwrap().unwrap(), "[[b]]");
    }

    #[tokio::test]
    async fn test_rename_onto_existing_note() {
        let (_dir, store, context) = setup(&[("a", "[[b]]"), ("b", "B")]);

        let result = ChangeNoteTitleTool::new()
            .execute(json!({ "note_title": "b", "new_title": "a" }), &context)
            .await;
        assert!(!result.success);
        assert_eq!(result.content, "Note a already exists.");
        assert_eq!(store.read_note("a").unwrap().unwrap(), "[[b]]");
        assert_eq!(store.read_note("b").unwrap().unwrap(), "B");
    }
}
