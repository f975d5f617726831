use log::{debug, error, info, warn};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::tools::describe_tools;
use super::types::{
    Implementation, InitializeParams, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, McpToolCall, McpToolResult, ServerCapabilities, ToolContent,
    ToolListResponse, ToolsCapability, JSONRPC_VERSION,
};
use crate::config::Config;
use crate::error::{HelloMcpError, Result};
use crate::tools::ToolRegistry;

// MCP Protocol constants
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// What the serve loop should do after handling one incoming line.
#[derive(Debug)]
pub enum Dispatch {
    Respond(JsonRpcResponse),
    /// Notifications get no reply
    Ignore,
    /// Reply, then stop serving
    Stop(JsonRpcResponse),
}

pub struct McpServer {
    registry: ToolRegistry,
    server_info: Implementation,
}

impl McpServer {
    pub fn new(registry: ToolRegistry, server_info: Implementation) -> Self {
        Self {
            registry,
            server_info,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let registry = ToolRegistry::from_config(config)?;
        Ok(Self::new(
            registry,
            Implementation {
                name: config.server_name.clone(),
                version: config.server_version.clone(),
            },
        ))
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Serve newline-delimited JSON-RPC on stdin/stdout
    pub async fn serve_stdio(&self) -> Result<()> {
        let reader = BufReader::new(tokio::io::stdin());
        self.serve(reader, tokio::io::stdout()).await
    }

    /// Serve until the input closes or a `shutdown` request arrives.
    /// Requests are handled one at a time, in arrival order.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            // A line that is not UTF-8 is a parse error, not a transport failure
            let dispatch = match std::str::from_utf8(&buf) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    self.handle_line(line).await
                }
                Err(e) => {
                    warn!("Incoming message is not valid UTF-8: {}", e);
                    Dispatch::Respond(JsonRpcResponse::failure(
                        Value::Null,
                        JsonRpcError::parse_error(e),
                    ))
                }
            };

            match dispatch {
                Dispatch::Respond(response) => write_message(&mut writer, &response).await?,
                Dispatch::Ignore => {}
                Dispatch::Stop(response) => {
                    write_message(&mut writer, &response).await?;
                    info!("Shutdown requested, stopping MCP server");
                    return Ok(());
                }
            }
        }

        info!("Input closed, stopping MCP server");
        Ok(())
    }

    pub async fn handle_line(&self, line: &str) -> Dispatch {
        let message: Value = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                warn!("Failed to parse incoming message: {}", e);
                return Dispatch::Respond(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::parse_error(e),
                ));
            }
        };

        if !message.is_object() {
            return Dispatch::Respond(JsonRpcResponse::failure(
                Value::Null,
                JsonRpcError::invalid_request("expected a JSON object"),
            ));
        }

        // "id": null is still a request; only an absent id marks a notification
        let is_notification = message.get("id").is_none();
        let raw_id = message.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                return Dispatch::Respond(JsonRpcResponse::failure(
                    raw_id,
                    JsonRpcError::invalid_request(e),
                ))
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Dispatch::Respond(JsonRpcResponse::failure(
                raw_id,
                JsonRpcError::invalid_request(format!(
                    "unsupported jsonrpc version '{}'",
                    request.jsonrpc
                )),
            ));
        }

        if is_notification {
            self.handle_notification(&request.method);
            return Dispatch::Ignore;
        }
        let id = raw_id;

        debug!("Handling request {} ({})", request.method, id);
        let response = match self.dispatch(&request.method, request.params).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => {
                warn!("Request {} failed: {}", request.method, e.message);
                JsonRpcResponse::failure(id, e)
            }
        };

        if request.method == "shutdown" {
            Dispatch::Stop(response)
        } else {
            Dispatch::Respond(response)
        }
    }

    fn handle_notification(&self, method: &str) {
        match method {
            "notifications/initialized" => info!("Client initialized"),
            "notifications/cancelled" => debug!("Client cancelled a request"),
            other => debug!("Ignoring notification: {}", other),
        }
    }

    async fn dispatch(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> std::result::Result<Value, JsonRpcError> {
        match method {
            "initialize" => self.initialize(params),
            "ping" => Ok(json!({})),
            "tools/list" => to_result(&ToolListResponse {
                tools: describe_tools(&self.registry),
            }),
            "tools/call" => self.call_tool(params).await,
            "shutdown" => Ok(json!({})),
            other => Err(JsonRpcError::method_not_found(other)),
        }
    }

    fn initialize(&self, params: Option<Value>) -> std::result::Result<Value, JsonRpcError> {
        let params: InitializeParams = match params {
            Some(params) => serde_json::from_value(params)
                .map_err(|e| JsonRpcError::invalid_params(format!("Invalid initialize params: {}", e)))?,
            None => InitializeParams::default(),
        };

        if let Some(client) = &params.client_info {
            info!("Client connected: {} v{}", client.name, client.version);
        }

        let protocol_version = params
            .protocol_version
            .unwrap_or_else(|| MCP_PROTOCOL_VERSION.to_string());

        to_result(&InitializeResult {
            protocol_version,
            server_info: self.server_info.clone(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> std::result::Result<Value, JsonRpcError> {
        let params = params.ok_or_else(|| JsonRpcError::invalid_params("Missing params for tools/call"))?;
        let tool_call: McpToolCall = serde_json::from_value(params)
            .map_err(|e| JsonRpcError::invalid_params(format!("Invalid tools/call params: {}", e)))?;

        let arguments = if tool_call.arguments.is_null() {
            json!({})
        } else {
            tool_call.arguments
        };

        if self.registry.get(&tool_call.name).is_none() {
            return Err(JsonRpcError::invalid_params(format!(
                "Unknown tool: {}",
                tool_call.name
            )));
        }

        let text = self
            .registry
            .call(&tool_call.name, &arguments)
            .await
            .map_err(|e| match e {
                HelloMcpError::ToolError(msg) => JsonRpcError::invalid_params(msg),
                other => {
                    error!("Tool '{}' failed: {}", tool_call.name, other);
                    JsonRpcError::internal_error(other.to_string())
                }
            })?;

        to_result(&McpToolResult {
            content: vec![ToolContent::text(text)],
            is_error: Some(false),
        })
    }
}

fn to_result<T: Serialize>(value: &T) -> std::result::Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}

async fn write_message<W>(writer: &mut W, response: &JsonRpcResponse) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut message = serde_json::to_string(response)?;
    message.push('\n');
    writer.write_all(message.as_bytes()).await.map_err(|e| {
        HelloMcpError::ProtocolError(format!("Failed to write response: {}", e))
    })?;
    writer.flush().await?;
    Ok(())
}
