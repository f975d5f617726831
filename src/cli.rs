use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hello-mcp")]
#[command(about = "MCP server exposing a greeting tool and a joke tool", long_about = None)]
#[command(version)]
pub struct Args {
    #[arg(
        long = "config",
        global = true,
        help = "Path to a YAML or JSON config file"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long = "joke-api-endpoint",
        global = true,
        help = "Joke API URL (e.g., http://localhost:8080/joke)"
    )]
    pub joke_api_endpoint: Option<String>,

    #[arg(
        short = 'v',
        long = "verbose",
        global = true,
        help = "Enable debug logging on stderr"
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve MCP over stdio (default)
    Serve,
    /// List the registered tools
    Tools,
    /// Invoke a tool once and print its result
    Call {
        #[arg(help = "Tool name, e.g. hello-tool")]
        tool: String,
    },
    /// Write an example config file to the user config directory
    ConfigInit,
}
