//! hello-mcp: a small MCP server exposing a greeting tool and a joke tool.

pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;
pub mod tools;

pub use error::{HelloMcpError, Result};
