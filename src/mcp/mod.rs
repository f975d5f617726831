pub mod server;
pub mod tools;
pub mod types;

pub use server::{Dispatch, McpServer, MCP_PROTOCOL_VERSION};
pub use types::{Implementation, JsonRpcError, JsonRpcResponse, McpTool, McpToolResult};
