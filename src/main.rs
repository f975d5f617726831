use clap::Parser;
use colored::*;
use log::info;
use serde_json::json;
use std::env;
use std::process;

use hello_mcp::cli::{Args, Command};
use hello_mcp::config::{self, Config};
use hello_mcp::mcp::McpServer;

fn setup_logging(config: &Config) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder
        .parse_filters(&config.log_level)
        .target(env_logger::Target::Stderr);

    // RUST_LOG refines the configured level unless --verbose was given
    if !config.verbose {
        if let Ok(filters) = env::var("RUST_LOG") {
            builder.parse_filters(&filters);
        }
    }

    builder.try_init()?;
    Ok(())
}

fn handle_config_init(args: &Args) -> anyhow::Result<()> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => config::user_config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
            .join("hello-mcp.yaml"),
    };

    config::init_config_file(&path)?;
    println!(
        "{} {}",
        "Config file written:".green(),
        path.display()
    );
    Ok(())
}

fn load_server(args: &Args) -> anyhow::Result<McpServer> {
    let config = Config::from_env_and_args(args)?;
    setup_logging(&config)?;
    Ok(McpServer::from_config(&config)?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let command = args.command.clone().unwrap_or(Command::Serve);

    // config-init must work before any config file exists
    if command == Command::ConfigInit {
        if let Err(e) = handle_config_init(&args) {
            eprintln!("{} {:#}", "Error:".red(), e);
            process::exit(1);
        }
        return Ok(());
    }

    let server = match load_server(&args) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            process::exit(1);
        }
    };

    match command {
        Command::Serve => {
            info!("Hello MCP server started.");
            server.serve_stdio().await?;
        }
        Command::Tools => {
            for tool in server.registry().list() {
                println!("{} - {}", tool.name.bold(), tool.description);
            }
        }
        Command::Call { tool } => {
            if server.registry().get(&tool).is_none() {
                eprintln!("{} Unknown tool: {}", "Error:".red(), tool);
                process::exit(1);
            }
            let result = server.registry().call(&tool, &json!({})).await?;
            println!("{}", result);
        }
        // Handled above
        Command::ConfigInit => {}
    }

    Ok(())
}
