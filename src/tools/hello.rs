use log::info;

pub const HELLO_TOOL_NAME: &str = "hello-tool";
pub const HELLO_TOOL_DESCRIPTION: &str = "A tool that returns a hello message from the MCP server";
pub const HELLO_MESSAGE: &str = "Hello from MCP server!";

pub fn handle_hello() -> String {
    info!("{} called", HELLO_TOOL_NAME);
    HELLO_MESSAGE.to_string()
}
