mod hello;
mod joke;
mod registry;

pub use hello::{handle_hello, HELLO_MESSAGE, HELLO_TOOL_DESCRIPTION, HELLO_TOOL_NAME};
pub use joke::{
    JokeClient, JokeResponse, FETCH_FAILED_MESSAGE, JOKE_TOOL_DESCRIPTION, JOKE_TOOL_NAME,
    NO_JOKE_MESSAGE,
};
pub use registry::{Tool, ToolFuture, ToolHandler, ToolRegistry};
