use super::types::McpTool;
use crate::tools::ToolRegistry;

pub fn describe_tools(registry: &ToolRegistry) -> Vec<McpTool> {
    registry
        .list()
        .iter()
        .map(|tool| McpTool {
            name: tool.name.clone(),
            description: Some(tool.description.clone()),
            input_schema: tool.input_schema.clone(),
        })
        .collect()
}
