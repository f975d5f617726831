use crate::config::Config;
use crate::error::{HelloMcpError, Result};
use jsonschema::{Draft, JSONSchema};
use log::{debug, info};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use super::hello::{handle_hello, HELLO_TOOL_DESCRIPTION, HELLO_TOOL_NAME};
use super::joke::{JokeClient, JOKE_TOOL_DESCRIPTION, JOKE_TOOL_NAME};

pub type ToolFuture = Pin<Box<dyn Future<Output = String> + Send>>;
pub type ToolHandler = Box<dyn Fn(&Value) -> ToolFuture + Send + Sync>;

pub struct Tool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub handler: ToolHandler,
}

pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

fn boxed<F>(future: F) -> ToolFuture
where
    F: Future<Output = String> + Send + 'static,
{
    Box::pin(future)
}

fn no_arguments_schema() -> Value {
    json!({
        "type": "object",
        "properties": {}
    })
}

impl ToolRegistry {
    pub fn new(joke_client: Arc<JokeClient>) -> Self {
        let mut registry = Self {
            tools: HashMap::new(),
        };

        registry.register(Tool {
            name: HELLO_TOOL_NAME.to_string(),
            description: HELLO_TOOL_DESCRIPTION.to_string(),
            input_schema: no_arguments_schema(),
            handler: Box::new(|_args: &Value| boxed(async { handle_hello() })),
        });

        registry.register(Tool {
            name: JOKE_TOOL_NAME.to_string(),
            description: JOKE_TOOL_DESCRIPTION.to_string(),
            input_schema: no_arguments_schema(),
            handler: Box::new(move |_args: &Value| {
                let client = Arc::clone(&joke_client);
                boxed(async move { client.handle_funny_quote().await })
            }),
        });

        registry
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = config.joke_api_timeout_secs.map(Duration::from_secs);
        let joke_client = JokeClient::new(config.joke_api_endpoint.clone(), timeout)?;
        info!("Joke API endpoint: {}", joke_client.endpoint());
        Ok(Self::new(Arc::new(joke_client)))
    }

    fn register(&mut self, tool: Tool) {
        debug!("Registering tool: {}", tool.name);
        self.tools.insert(tool.name.clone(), tool);
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// All tools, sorted by name
    pub fn list(&self) -> Vec<&Tool> {
        let mut tools: Vec<&Tool> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    pub fn validate_arguments(&self, tool_name: &str, arguments: &Value) -> Result<()> {
        let tool = self
            .tools
            .get(tool_name)
            .ok_or_else(|| HelloMcpError::ToolError(format!("Tool '{}' not found", tool_name)))?;

        let schema = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&tool.input_schema)
            .map_err(|e| HelloMcpError::ToolError(format!("Invalid tool schema: {}", e)))?;

        if let Err(errors) = schema.validate(arguments) {
            let error_messages: Vec<String> = errors
                .map(|e| format!("{}: {}", e.instance_path, e))
                .collect();
            return Err(HelloMcpError::ToolError(format!(
                "Invalid arguments for '{}': {}",
                tool_name,
                error_messages.join("; ")
            )));
        }

        Ok(())
    }

    pub async fn call(&self, tool_name: &str, arguments: &Value) -> Result<String> {
        self.validate_arguments(tool_name, arguments)?;

        let tool = self
            .get(tool_name)
            .ok_or_else(|| HelloMcpError::ToolError(format!("Tool '{}' not found", tool_name)))?;

        Ok((tool.handler)(arguments).await)
    }
}
