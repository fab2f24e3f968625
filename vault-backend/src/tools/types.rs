use crate::classifier::RelevanceClassifier;
use crate::notes::NoteStore;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Tool groups for organizing tools in listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolGroup {
    /// Reading and mutating vault notes
    Notes,
    /// Finding notes by meaning
    Search,
}

/// How much damage a tool can do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolSafetyLevel {
    ReadOnly,
    Standard,
    Destructive,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub description: String,
}

impl PropertySchema {
    /// A plain string property
    pub fn string(description: &str) -> Self {
        Self {
            schema_type: "string".to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolInputSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: HashMap<String, PropertySchema>,
    pub required: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: ToolInputSchema,
    pub group: ToolGroup,
}

/// Result of a tool call, as shown to the calling agent
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    pub success: bool,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl ToolResult {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            success: true,
            content: content.into(),
            error: None,
            metadata: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            content: message.clone(),
            error: Some(message),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Shared services handed to every tool call
#[derive(Clone, Default)]
pub struct ToolContext {
    pub notes_store: Option<Arc<NoteStore>>,
    pub classifier: Option<Arc<RelevanceClassifier>>,
}

impl ToolContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notes_store(mut self, store: Arc<NoteStore>) -> Self {
        self.notes_store = Some(store);
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<RelevanceClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// The note store, or the error result every notes tool reports without one
    pub fn require_notes_store(&self) -> Result<&Arc<NoteStore>, ToolResult> {
        self.notes_store.as_ref().ok_or_else(|| {
            ToolResult::error("Notes store not available. The vault must be initialized.")
        })
    }
}
