mod defaults;
mod joke_api;
mod server;
mod validation;

use crate::cli::Args;
use crate::error::{HelloMcpError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use defaults::{
    default_joke_api_endpoint, default_log_level, default_server_name, default_server_version,
    DEFAULT_JOKE_API_ENDPOINT,
};
pub use joke_api::JokeApiConfig;
pub use server::{LoggingConfig, ServerConfig};
pub use validation::{expand_env_var_in_string, validate_endpoint};

pub const ENV_JOKE_API_ENDPOINT: &str = "HELLO_MCP_JOKE_API_ENDPOINT";
pub const ENV_JOKE_API_TIMEOUT: &str = "HELLO_MCP_JOKE_API_TIMEOUT";
pub const ENV_LOG_LEVEL: &str = "HELLO_MCP_LOG_LEVEL";

const EXAMPLE_CONFIG: &str = r#"# hello-mcp configuration
server:
  name: hello-mcp

joke_api:
  endpoint: https://icanhazdadjoke.com
  # timeout_secs: 10

logging:
  level: info
"#;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_name: String,
    pub server_version: String,
    pub joke_api_endpoint: String,
    pub joke_api_timeout_secs: Option<u64>,
    pub log_level: String,
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub joke_api: JokeApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> anyhow::Result<Self> {
        let file_config = FileConfig::load(args.config.as_deref())?;
        let config = Self::resolve(args, &file_config, |key| env::var(key).ok())?;
        Ok(config)
    }

    /// Merge settings with precedence CLI args > environment > config file > defaults.
    pub fn resolve<F>(args: &Args, file_config: &FileConfig, env_lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let joke_api_endpoint = args
            .joke_api_endpoint
            .clone()
            .or_else(|| env_lookup(ENV_JOKE_API_ENDPOINT))
            .or_else(|| file_config.joke_api.endpoint.clone())
            .map(|endpoint| expand_env_var_in_string(endpoint.trim()))
            .unwrap_or_else(default_joke_api_endpoint);

        validate_endpoint(&joke_api_endpoint).map_err(HelloMcpError::ConfigError)?;

        // Zero or unparsable values fall back to the client default
        let joke_api_timeout_secs = env_lookup(ENV_JOKE_API_TIMEOUT)
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .or(file_config.joke_api.timeout_secs.filter(|secs| *secs > 0));

        let log_level = if args.verbose {
            "debug".to_string()
        } else {
            env_lookup(ENV_LOG_LEVEL)
                .or_else(|| file_config.logging.level.clone())
                .map(|level| level.to_lowercase())
                .unwrap_or_else(default_log_level)
        };

        if !defaults::is_valid_log_level(&log_level) {
            return Err(HelloMcpError::ConfigError(format!(
                "Unknown log level '{}' (expected off, error, warn, info, debug or trace)",
                log_level
            )));
        }

        let server_name = file_config
            .server
            .name
            .clone()
            .unwrap_or_else(default_server_name);

        let server_version = file_config
            .server
            .version
            .clone()
            .unwrap_or_else(default_server_version);

        Ok(Config {
            server_name,
            server_version,
            joke_api_endpoint,
            joke_api_timeout_secs,
            log_level,
            verbose: args.verbose,
        })
    }
}

impl FileConfig {
    /// Load from an explicit path, or the first config file found on the search path.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            return Self::load_from(path);
        }

        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        // No config file found, return default
        Ok(FileConfig::default())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|s| s.to_str());
        let config: FileConfig = if extension == Some("json") {
            serde_json::from_str(&contents)
                .map_err(HelloMcpError::from)
                .with_context(|| {
                    format!("Failed to parse JSON config file: {}", path.display())
                })?
        } else {
            serde_yaml::from_str(&contents)
                .map_err(HelloMcpError::from)
                .with_context(|| {
                    format!("Failed to parse YAML config file: {}", path.display())
                })?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. Current directory (local override)
        paths.push(PathBuf::from(".hello-mcp.yaml"));
        paths.push(PathBuf::from(".hello-mcp.yml"));
        paths.push(PathBuf::from(".hello-mcp.json"));

        // 2. User's config directory
        if let Some(config_dir) = user_config_dir() {
            paths.push(config_dir.join("hello-mcp.yaml"));
            paths.push(config_dir.join("hello-mcp.yml"));
            paths.push(config_dir.join("hello-mcp.json"));
        }

        paths
    }
}

pub fn user_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("hello-mcp"))
}

/// Write the example config to `path`, refusing to overwrite an existing file.
pub fn init_config_file(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("Config file already exists: {}", path.display());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }

    fs::write(path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    Ok(())
}
