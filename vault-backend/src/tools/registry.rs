//! Tool registry: the fixed set of tools exposed to agents

use super::builtin;
use super::types::{ToolContext, ToolDefinition, ToolResult, ToolSafetyLevel};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

#[async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult;

    fn safety_level(&self) -> ToolSafetyLevel {
        ToolSafetyLevel::Standard
    }
}

pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registry holding every built-in tool
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        let builtins: Vec<Arc<dyn Tool>> = vec![
            Arc::new(builtin::ReadNoteTool::new()),
            Arc::new(builtin::CreateNoteTool::new()),
            Arc::new(builtin::EditNoteTool::new()),
            Arc::new(builtin::DeleteNoteTool::new()),
            Arc::new(builtin::ChangeNoteTitleTool::new()),
            Arc::new(builtin::ListRelevantNotesTool::new()),
        ];
        for tool in builtins {
            reg.register(tool);
        }
        reg
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.definition().name;
        if self.tools.insert(name.clone(), tool).is_some() {
            log::warn!("[TOOLS] Replaced existing tool: {}", name);
        } else {
            log::debug!("[TOOLS] Registered tool: {}", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Definitions sorted by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self.tools.values().map(|t| t.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    pub async fn execute(&self, name: &str, params: Value, context: &ToolContext) -> ToolResult {
        match self.get(name) {
            Some(tool) => {
                log::info!("[TOOLS] Executing {}", name);
                tool.execute(params, context).await
            }
            None => ToolResult::error(format!("Unknown tool: '{}'", name)),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
